// crates/vantage-core/src/predict/preissues.rs
// ============================================================================
// Module: Vantage Pre-Issue Detection
// Description: Forecast future problems with likelihood and escalation windows.
// Purpose: Emit the preventative half of candidate generation.
// Dependencies: crate::core, crate::derive, serde
// ============================================================================

//! ## Overview
//! Pre-issues are predictions, not facts: each carries a likelihood, a
//! time-to-breach window, an irreversibility estimate, and the preventative
//! resolution keys that defuse it. Escalation dates are absolute so the
//! decide layer can compress time-to-impact and flag imminence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Assumptions;
use crate::core::Company;
use crate::core::CompanyId;
use crate::core::DealId;
use crate::core::DealStatus;
use crate::core::GoalId;
use crate::core::OrgKind;
use crate::core::RawIndex;
use crate::core::Relationship;
use crate::core::RoundStatus;
use crate::core::Timestamp;
use crate::derive::Runway;
use crate::derive::RunwayValue;
use crate::derive::Trajectory;
use crate::derive::trajectory::OnTrack;

// ============================================================================
// SECTION: Pre-Issue Catalogue
// ============================================================================

/// Pre-issue kinds.
///
/// # Invariants
/// - Variants are stable for serialization, preventative-resolution mapping,
///   and structural leverage scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreIssueKind {
    /// Runway will cross the critical line.
    RunwayBreach,
    /// Open round is losing momentum.
    RoundStall,
    /// Late-stage round with no lead investor.
    LeadVacancy,
    /// Active deal is cooling off.
    DealMomentumLoss,
    /// Internal champion is drifting away.
    ChampionDeparture,
    /// Term-sheet commitment looks shaky.
    CommitmentAtRisk,
    /// Strong connection has gone dormant.
    ConnectionDormant,
    /// Relationship strength is decaying toward cold.
    RelationshipDecay,
    /// Goal is projected to miss its due date.
    GoalMiss,
}

impl PreIssueKind {
    /// Returns a stable label for the pre-issue kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunwayBreach => "RUNWAY_BREACH",
            Self::RoundStall => "ROUND_STALL",
            Self::LeadVacancy => "LEAD_VACANCY",
            Self::DealMomentumLoss => "DEAL_MOMENTUM_LOSS",
            Self::ChampionDeparture => "CHAMPION_DEPARTURE",
            Self::CommitmentAtRisk => "COMMITMENT_AT_RISK",
            Self::ConnectionDormant => "CONNECTION_DORMANT",
            Self::RelationshipDecay => "RELATIONSHIP_DECAY",
            Self::GoalMiss => "GOAL_MISS",
        }
    }

    /// Preventative resolution keys that defuse this kind.
    #[must_use]
    pub const fn preventative_resolutions(self) -> &'static [&'static str] {
        match self {
            Self::RunwayBreach => &["res-bridge-plan", "res-fundraise-prep"],
            Self::RoundStall => &["res-round-momentum", "res-investor-update"],
            Self::LeadVacancy => &["res-lead-courtship"],
            Self::DealMomentumLoss => &["res-deal-nudge"],
            Self::ChampionDeparture => &["res-champion-touch"],
            Self::CommitmentAtRisk => &["res-commit-shore"],
            Self::ConnectionDormant | Self::RelationshipDecay => &["res-reconnect"],
            Self::GoalMiss => &["res-goal-unblock", "res-goal-replan"],
        }
    }
}

// ============================================================================
// SECTION: Pre-Issue
// ============================================================================

/// A forecast future problem.
///
/// # Invariants
/// - `likelihood` and `irreversibility` are in [0, 1].
/// - `escalation_at` equals `now` plus `time_to_breach_days`.
/// - `expected_future_cost` is derived from likelihood, severity, and the
///   cost-of-delay multiplier; it is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreIssue {
    /// Pre-issue kind.
    pub kind: PreIssueKind,
    /// Owning company.
    pub company_id: CompanyId,
    /// Probability the breach happens absent action, 0-1.
    pub likelihood: f64,
    /// Severity, 0-3.
    pub severity: u8,
    /// Days until the forecast breach.
    pub time_to_breach_days: f64,
    /// How hard the breach is to reverse, 0-1.
    pub irreversibility: f64,
    /// Cost-of-delay multiplier.
    pub cost_of_delay_multiplier: f64,
    /// Absolute escalation date.
    pub escalation_at: Timestamp,
    /// True when the breach is inside the imminence window.
    pub is_imminent: bool,
    /// Expected future cost in impact points.
    pub expected_future_cost: f64,
    /// Preventative resolution keys.
    pub preventative_resolutions: Vec<String>,
    /// Goal the forecast is scoped to, when applicable.
    pub goal_id: Option<GoalId>,
    /// Deal the forecast is scoped to, when applicable.
    pub deal_id: Option<DealId>,
    /// Human-readable evidence.
    pub evidence: String,
}

// ============================================================================
// SECTION: Rule Constants
// ============================================================================

/// Runway months below which the breach window opens.
const RUNWAY_WATCH_MONTHS: f64 = 9.0;

/// Days inside which a breach reads as imminent.
const IMMINENCE_DAYS: f64 = 7.0;

/// Deal idle window that reads as cooling (before it reads as stale).
const MOMENTUM_LOSS_DAYS: f64 = 14.0;

/// Close probability under which a term sheet reads as shaky.
const COMMITMENT_FLOOR: f64 = 60.0;

/// Strength at which an edge counts as strong.
const STRONG_EDGE: f64 = 60.0;

/// Decayed strength under which an edge reads as cold.
const COLD_EDGE: f64 = 40.0;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Assembles a pre-issue, deriving escalation, imminence, and expected cost.
#[allow(clippy::too_many_arguments, reason = "All pre-issue fields are required at build time.")]
fn build(
    kind: PreIssueKind,
    company_id: &CompanyId,
    likelihood: f64,
    severity: u8,
    time_to_breach_days: f64,
    irreversibility: f64,
    cost_of_delay_multiplier: f64,
    now: Timestamp,
    goal_id: Option<GoalId>,
    deal_id: Option<DealId>,
    evidence: String,
) -> PreIssue {
    let likelihood = likelihood.clamp(0.0, 1.0);
    let time_to_breach_days = time_to_breach_days.max(0.0);
    let expected_future_cost =
        (likelihood * f64::from(severity) * cost_of_delay_multiplier * 10.0).min(62.5);
    PreIssue {
        kind,
        company_id: company_id.clone(),
        likelihood,
        severity,
        time_to_breach_days,
        irreversibility: irreversibility.clamp(0.0, 1.0),
        cost_of_delay_multiplier,
        escalation_at: now.plus_days_f64(time_to_breach_days),
        is_imminent: time_to_breach_days <= IMMINENCE_DAYS,
        expected_future_cost,
        preventative_resolutions: kind
            .preventative_resolutions()
            .iter()
            .map(|key| (*key).to_string())
            .collect(),
        goal_id,
        deal_id,
        evidence,
    }
}

// ============================================================================
// SECTION: Detection
// ============================================================================

/// Detects pre-issues for one company from derived state.
#[must_use]
#[allow(clippy::too_many_lines, reason = "One rule block per catalogue entry.")]
pub fn detect_preissues(
    index: &RawIndex<'_>,
    company: &Company,
    runway: &Runway,
    trajectories: &[Trajectory],
    assumptions: &Assumptions,
    now: Timestamp,
) -> Vec<PreIssue> {
    let mut out = Vec::new();

    // Runway breach window: finite runway between critical and watch lines.
    if let Some(RunwayValue::Months(months)) = runway.value
        && months >= assumptions.cat1_runway_months
        && months < RUNWAY_WATCH_MONTHS
    {
        let window = RUNWAY_WATCH_MONTHS - assumptions.cat1_runway_months;
        let likelihood = 1.0 - (months - assumptions.cat1_runway_months) / window;
        let ttb = (months - assumptions.cat1_runway_months) * 30.0;
        let expected = crate::core::StageParams::for_stage(company.stage).expected_runway_months;
        out.push(build(
            PreIssueKind::RunwayBreach,
            &company.id,
            likelihood,
            3,
            ttb,
            0.8,
            2.0,
            now,
            None,
            None,
            format!(
                "runway {months:.1}mo trends into the critical window; stage expects {expected:.0}mo post-raise"
            ),
        ));
    }

    // Goal misses: off-track trajectories with time still on the clock.
    for trajectory in trajectories {
        if trajectory.on_track != OnTrack::No {
            continue;
        }
        let Some(goal) =
            index.graph().goals.iter().find(|goal| goal.id == trajectory.goal_id)
        else {
            continue;
        };
        let days_to_due = now.days_until(goal.due);
        if days_to_due <= 0.0 {
            continue;
        }
        let gap = if goal.target.abs() < f64::EPSILON {
            1.0
        } else {
            ((goal.target - goal.current) / goal.target).clamp(0.0, 1.0)
        };
        out.push(build(
            PreIssueKind::GoalMiss,
            &company.id,
            0.4 + 0.5 * gap,
            2,
            days_to_due,
            0.3,
            1.5,
            now,
            Some(goal.id.clone()),
            None,
            format!("goal {} projected to miss its due date", goal.goal_type.as_str()),
        ));
    }

    // Round posture.
    let deals = index.deals_for(&company.id);
    for round in index.rounds_for(&company.id) {
        if !matches!(round.status, RoundStatus::Open | RoundStatus::Closing) {
            continue;
        }
        let round_deals: Vec<_> =
            deals.iter().filter(|deal| deal.round_id == round.id).collect();
        let last_motion = round_deals
            .iter()
            .map(|deal| deal.last_activity_at)
            .max()
            .unwrap_or(round.opened_at);
        let idle_days = now.days_since(last_motion);
        if idle_days > MOMENTUM_LOSS_DAYS && idle_days <= 30.0 {
            out.push(build(
                PreIssueKind::RoundStall,
                &company.id,
                (idle_days / 30.0).clamp(0.0, 1.0),
                2,
                30.0 - idle_days,
                0.5,
                1.8,
                now,
                None,
                None,
                format!("round activity cooling; idle {idle_days:.0} days"),
            ));
        }
        let has_late_stage = round_deals
            .iter()
            .any(|deal| matches!(deal.status, DealStatus::Dd | DealStatus::Termsheet));
        if has_late_stage && round.lead_firm_id.is_none() {
            out.push(build(
                PreIssueKind::LeadVacancy,
                &company.id,
                0.6,
                2,
                21.0,
                0.6,
                1.6,
                now,
                None,
                None,
                "late-stage round has no lead investor".to_string(),
            ));
        }
    }

    // Deal posture.
    for deal in &deals {
        if !deal.status.is_active() {
            continue;
        }
        let idle_days = now.days_since(deal.last_activity_at);
        if idle_days > MOMENTUM_LOSS_DAYS && idle_days <= 21.0 {
            out.push(build(
                PreIssueKind::DealMomentumLoss,
                &company.id,
                ((idle_days - MOMENTUM_LOSS_DAYS) / 7.0).clamp(0.2, 0.9),
                1,
                21.0 - idle_days,
                0.4,
                1.4,
                now,
                None,
                Some(deal.id.clone()),
                format!("deal idle {idle_days:.0} days; momentum cooling"),
            ));
        }
        if deal.status == DealStatus::Termsheet && deal.close_probability < COMMITMENT_FLOOR {
            out.push(build(
                PreIssueKind::CommitmentAtRisk,
                &company.id,
                1.0 - deal.close_probability / 100.0,
                2,
                now.days_until(deal.expected_close_at.unwrap_or(now.plus_days(30))).max(0.0),
                0.6,
                1.8,
                now,
                None,
                Some(deal.id.clone()),
                format!("term sheet at {:.0}% close probability", deal.close_probability),
            ));
        }
    }

    // Relationship posture around the company's people.
    let company_people: Vec<_> = index
        .graph()
        .people
        .iter()
        .filter(|person| person.org_kind == OrgKind::Company && person.org_id == company.id.as_str())
        .collect();
    for person in &company_people {
        let edges: Vec<&Relationship> = index
            .graph()
            .relationships
            .iter()
            .filter(|edge| {
                edge.from_person_id == person.id || edge.to_person_id == person.id
            })
            .collect();
        let is_champion = person.tags.iter().any(|tag| tag == "champion");
        if is_champion && !edges.is_empty() {
            let freshest_touch = edges
                .iter()
                .map(|edge| edge.last_touch_at)
                .max()
                .unwrap_or(Timestamp::from_unix_millis(0));
            let silent_days = now.days_since(freshest_touch);
            if silent_days > assumptions.relationship_half_life_days {
                out.push(build(
                    PreIssueKind::ChampionDeparture,
                    &company.id,
                    (silent_days / assumptions.cold_threshold_days).clamp(0.0, 0.9),
                    1,
                    (assumptions.cold_threshold_days - silent_days).max(0.0),
                    0.7,
                    1.5,
                    now,
                    None,
                    None,
                    format!("champion {} silent for {silent_days:.0} days", person.name),
                ));
            }
        }
        for edge in &edges {
            if edge.strength < STRONG_EDGE {
                continue;
            }
            let silent_days = now.days_since(edge.last_touch_at);
            if silent_days > assumptions.cold_threshold_days {
                out.push(build(
                    PreIssueKind::ConnectionDormant,
                    &company.id,
                    0.7,
                    1,
                    0.0,
                    0.4,
                    1.2,
                    now,
                    None,
                    None,
                    format!("strong connection of {} dormant {silent_days:.0} days", person.name),
                ));
                continue;
            }
            let decayed = assumptions.decayed_strength(edge.strength, silent_days);
            let decayed_in_30 = assumptions.decayed_strength(edge.strength, silent_days + 30.0);
            if decayed >= COLD_EDGE && decayed_in_30 < COLD_EDGE {
                let days_to_cold = days_until_decay_below(
                    edge.strength,
                    silent_days,
                    assumptions.relationship_half_life_days,
                );
                out.push(build(
                    PreIssueKind::RelationshipDecay,
                    &company.id,
                    0.6,
                    1,
                    days_to_cold,
                    0.3,
                    1.2,
                    now,
                    None,
                    None,
                    format!(
                        "connection of {} decaying; {decayed:.0} effective strength",
                        person.name
                    ),
                ));
            }
        }
    }

    out.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.goal_id.cmp(&b.goal_id))
            .then_with(|| a.deal_id.cmp(&b.deal_id))
    });
    out
}

/// Days until half-life decay pushes strength below the cold line.
fn days_until_decay_below(strength: f64, silent_days: f64, half_life: f64) -> f64 {
    if strength <= COLD_EDGE {
        return 0.0;
    }
    // strength * 0.5^((silent + d) / half_life) = COLD_EDGE, solved for d.
    let total = half_life * (strength / COLD_EDGE).log2();
    (total - silent_days).max(0.0)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Assumptions;
    use crate::core::Company;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;
    use crate::derive::derive_runway;

    use super::PreIssueKind;
    use super::detect_preissues;

    /// Company with the given cash/burn scalars.
    fn company(cash: f64, burn: f64) -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: Some(cash),
            burn: Some(burn),
            employees: None,
            recurring: None,
            revenue: None,
            raising: false,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    #[test]
    fn runway_inside_watch_window_forecasts_breach() {
        let company = company(60_000.0, 10_000.0);
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, &company, &Assumptions::default(), now);
        let preissues =
            detect_preissues(&index, &company, &runway, &[], &Assumptions::default(), now);
        let breach =
            preissues.iter().find(|p| p.kind == PreIssueKind::RunwayBreach).unwrap();
        assert!((breach.likelihood - 0.5).abs() < 1e-9);
        assert!((breach.time_to_breach_days - 90.0).abs() < 1e-9);
        assert!(!breach.is_imminent);
        assert!(!breach.preventative_resolutions.is_empty());
    }

    #[test]
    fn critical_runway_is_an_issue_not_a_preissue() {
        let company = company(20_000.0, 10_000.0);
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, &company, &Assumptions::default(), now);
        let preissues =
            detect_preissues(&index, &company, &runway, &[], &Assumptions::default(), now);
        assert!(preissues.iter().all(|p| p.kind != PreIssueKind::RunwayBreach));
    }
}
