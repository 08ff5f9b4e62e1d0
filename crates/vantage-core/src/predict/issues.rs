// crates/vantage-core/src/predict/issues.rs
// ============================================================================
// Module: Vantage Issue Detection
// Description: Confirmed present problems detected from derived state.
// Purpose: Emit the reactive half of candidate generation.
// Dependencies: crate::core, crate::derive, serde
// ============================================================================

//! ## Overview
//! Issues are confirmed present problems, detected by fixed rules over
//! derived state. Each issue carries a severity from 0 to 3 and evidence.
//! Issues never predict; forecasts live in the pre-issue catalogue.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Assumptions;
use crate::core::Company;
use crate::core::CompanyId;
use crate::core::DealId;
use crate::core::GoalId;
use crate::core::MetricKey;
use crate::core::RawIndex;
use crate::core::RoundStatus;
use crate::core::Timestamp;
use crate::derive::Runway;
use crate::derive::Trajectory;
use crate::derive::metrics::MetricProvenance;
use crate::derive::metrics::resolve_metric;
use crate::derive::trajectory::OnTrack;

// ============================================================================
// SECTION: Issue Catalogue
// ============================================================================

/// Issue kinds.
///
/// # Invariants
/// - Variants are stable for serialization, resolution mapping, and ripple
///   scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Runway under three months.
    RunwayCritical,
    /// Runway under six months.
    RunwayWarning,
    /// Burn jumped sharply between observations.
    BurnSpike,
    /// Fundraising with no pipeline at all.
    NoPipeline,
    /// Weighted pipeline covers under half the round target.
    PipelineGap,
    /// Active deal without recent activity.
    DealStale,
    /// Goal past due and unmet.
    GoalMissed,
    /// Goal projected to miss its due date.
    GoalBehind,
    /// Goal with no measurable progress.
    GoalStalled,
    /// Required observations are stale.
    DataStale,
    /// Required observations are missing.
    DataMissing,
    /// Portfolio company with no open goals.
    NoGoals,
    /// Open round without momentum.
    RoundStale,
    /// Fundraise deck is old during an active raise.
    DeckStale,
}

impl IssueKind {
    /// Returns a stable label for the issue kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunwayCritical => "RUNWAY_CRITICAL",
            Self::RunwayWarning => "RUNWAY_WARNING",
            Self::BurnSpike => "BURN_SPIKE",
            Self::NoPipeline => "NO_PIPELINE",
            Self::PipelineGap => "PIPELINE_GAP",
            Self::DealStale => "DEAL_STALE",
            Self::GoalMissed => "GOAL_MISSED",
            Self::GoalBehind => "GOAL_BEHIND",
            Self::GoalStalled => "GOAL_STALLED",
            Self::DataStale => "DATA_STALE",
            Self::DataMissing => "DATA_MISSING",
            Self::NoGoals => "NO_GOALS",
            Self::RoundStale => "ROUND_STALE",
            Self::DeckStale => "DECK_STALE",
        }
    }

    /// Returns true for the data-blocker kinds the CAT2 gate inspects.
    #[must_use]
    pub const fn is_data_blocker(self) -> bool {
        matches!(self, Self::DataStale | Self::DataMissing | Self::DeckStale)
    }
}

// ============================================================================
// SECTION: Issue
// ============================================================================

/// A confirmed present problem.
///
/// # Invariants
/// - `severity` is 0-3.
/// - `goal_id`/`deal_id` are set when the rule is goal- or deal-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue kind.
    pub kind: IssueKind,
    /// Owning company.
    pub company_id: CompanyId,
    /// Severity, 0-3.
    pub severity: u8,
    /// Goal the issue is scoped to, when applicable.
    pub goal_id: Option<GoalId>,
    /// Deal the issue is scoped to, when applicable.
    pub deal_id: Option<DealId>,
    /// Human-readable evidence.
    pub evidence: String,
}

// ============================================================================
// SECTION: Rule Constants
// ============================================================================

/// Burn growth factor that reads as a spike.
const BURN_SPIKE_FACTOR: f64 = 1.5;

/// Days of deal inactivity that read as stale.
const DEAL_STALE_DAYS: f64 = 21.0;

/// Days of round inactivity that read as stale.
const ROUND_STALE_DAYS: f64 = 30.0;

/// Pipeline coverage under which a gap is flagged.
const PIPELINE_COVERAGE_FLOOR: f64 = 0.5;

// ============================================================================
// SECTION: Detection
// ============================================================================

/// Detects issues for one company from derived state.
#[must_use]
#[allow(clippy::too_many_lines, reason = "One rule block per catalogue entry.")]
pub fn detect_issues(
    index: &RawIndex<'_>,
    company: &Company,
    runway: &Runway,
    trajectories: &[Trajectory],
    assumptions: &Assumptions,
    now: Timestamp,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Runway severity ladder.
    if let Some(value) = runway.value {
        if value.is_below(3.0) {
            issues.push(Issue {
                kind: IssueKind::RunwayCritical,
                company_id: company.id.clone(),
                severity: 3,
                goal_id: None,
                deal_id: None,
                evidence: runway.explain.clone(),
            });
        } else if value.is_below(6.0) {
            issues.push(Issue {
                kind: IssueKind::RunwayWarning,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: None,
                deal_id: None,
                evidence: runway.explain.clone(),
            });
        }
    }

    // Burn spike between the last two observations.
    let burn_series = index.metric_series(&company.id, MetricKey::Burn);
    if burn_series.len() >= 2
        && let [.., previous, latest] = burn_series.as_slice()
        && previous.value > 0.0
        && latest.value > previous.value * BURN_SPIKE_FACTOR
    {
        issues.push(Issue {
            kind: IssueKind::BurnSpike,
            company_id: company.id.clone(),
            severity: 2,
            goal_id: None,
            deal_id: None,
            evidence: format!(
                "burn jumped {:.0} -> {:.0} between observations",
                previous.value, latest.value
            ),
        });
    }

    // Data gaps: required inputs missing or stale.
    for key in [MetricKey::Cash, MetricKey::Burn] {
        let resolved = resolve_metric(index, company, key);
        if resolved.provenance == MetricProvenance::Missing {
            issues.push(Issue {
                kind: IssueKind::DataMissing,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: None,
                deal_id: None,
                evidence: format!("required metric {} has no source", key.as_str()),
            });
        } else if let Some(age) = resolved.age_days(now)
            && age > assumptions.staleness_horizon_days
        {
            issues.push(Issue {
                kind: IssueKind::DataStale,
                company_id: company.id.clone(),
                severity: 1,
                goal_id: None,
                deal_id: None,
                evidence: format!("{} observation is {age:.0} days old", key.as_str()),
            });
        }
    }

    // Deck freshness during an active raise.
    if company.raising {
        let deck_age = company.deck_updated_at.map(|at| now.days_since(at));
        let is_stale = deck_age.is_none_or(|age| age > assumptions.cat2_deck_age_days);
        if is_stale {
            issues.push(Issue {
                kind: IssueKind::DeckStale,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: None,
                deal_id: None,
                evidence: deck_age.map_or_else(
                    || "no deck update on record during raise".to_string(),
                    |age| format!("deck is {age:.0} days old during raise"),
                ),
            });
        }
    }

    // Goal posture.
    let open_goals = index.open_goals_for(&company.id);
    if open_goals.is_empty() {
        let expected: Vec<&str> = crate::core::StageParams::for_stage(company.stage)
            .expected_goal_mix
            .iter()
            .map(|goal_type| goal_type.as_str())
            .collect();
        issues.push(Issue {
            kind: IssueKind::NoGoals,
            company_id: company.id.clone(),
            severity: 1,
            goal_id: None,
            deal_id: None,
            evidence: format!(
                "no open goals; a {} company usually carries {}",
                company.stage.as_str(),
                expected.join(", ")
            ),
        });
    }
    for goal in &open_goals {
        if now > goal.due && goal.current < goal.target {
            issues.push(Issue {
                kind: IssueKind::GoalMissed,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: Some(goal.id.clone()),
                deal_id: None,
                evidence: format!(
                    "goal {} past due at {:.0}/{:.0}",
                    goal.goal_type.as_str(),
                    goal.current,
                    goal.target
                ),
            });
            continue;
        }
        let Some(trajectory) = trajectories.iter().find(|t| t.goal_id == goal.id) else {
            continue;
        };
        if trajectory.on_track == OnTrack::No {
            let stalled = trajectory
                .velocity_per_day
                .is_some_and(|velocity| velocity.abs() < f64::EPSILON);
            issues.push(Issue {
                kind: if stalled { IssueKind::GoalStalled } else { IssueKind::GoalBehind },
                company_id: company.id.clone(),
                severity: 1,
                goal_id: Some(goal.id.clone()),
                deal_id: None,
                evidence: format!(
                    "goal {} off track at {:.0}/{:.0}",
                    goal.goal_type.as_str(),
                    goal.current,
                    goal.target
                ),
            });
        }
    }

    // Pipeline posture while raising.
    let deals = index.deals_for(&company.id);
    let active_deals: Vec<_> = deals.iter().filter(|deal| deal.status.is_active()).collect();
    if company.raising {
        if active_deals.is_empty() {
            issues.push(Issue {
                kind: IssueKind::NoPipeline,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: None,
                deal_id: None,
                evidence: "raising with no active deals in pipeline".to_string(),
            });
        } else if let Some(target) = company.round_target
            && target > 0.0
        {
            let weighted: f64 = active_deals
                .iter()
                .map(|deal| deal.amount * (deal.close_probability / 100.0))
                .sum();
            if weighted < target * PIPELINE_COVERAGE_FLOOR {
                issues.push(Issue {
                    kind: IssueKind::PipelineGap,
                    company_id: company.id.clone(),
                    severity: 1,
                    goal_id: None,
                    deal_id: None,
                    evidence: format!(
                        "weighted pipeline {weighted:.0} covers under half of target {target:.0}"
                    ),
                });
            }
        }
    }
    for deal in &active_deals {
        let idle_days = now.days_since(deal.last_activity_at);
        if idle_days > DEAL_STALE_DAYS {
            issues.push(Issue {
                kind: IssueKind::DealStale,
                company_id: company.id.clone(),
                severity: 1,
                goal_id: None,
                deal_id: Some(deal.id.clone()),
                evidence: format!("deal idle for {idle_days:.0} days"),
            });
        }
    }

    // Open round without momentum.
    for round in index.rounds_for(&company.id) {
        if !matches!(round.status, RoundStatus::Open | RoundStatus::Closing) {
            continue;
        }
        let last_motion = deals
            .iter()
            .filter(|deal| deal.round_id == round.id)
            .map(|deal| deal.last_activity_at)
            .max()
            .unwrap_or(round.opened_at);
        let idle_days = now.days_since(last_motion);
        if idle_days > ROUND_STALE_DAYS {
            issues.push(Issue {
                kind: IssueKind::RoundStale,
                company_id: company.id.clone(),
                severity: 2,
                goal_id: None,
                deal_id: None,
                evidence: format!("round idle for {idle_days:.0} days"),
            });
        }
    }

    issues.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then_with(|| a.kind.cmp(&b.kind)).then_with(|| {
            a.goal_id.cmp(&b.goal_id).then_with(|| a.deal_id.cmp(&b.deal_id))
        })
    });
    issues
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

    use super::IssueKind;
    use super::detect_issues;

    /// Company with the given cash/burn on an otherwise empty graph.
    fn company(cash: f64, burn: f64, raising: bool) -> Company {
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
            raising,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    #[test]
    fn runway_cliff_raises_critical_issue() {
        let company = company(20_000.0, 10_000.0, false);
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, &company, &Assumptions::default(), now);
        let issues =
            detect_issues(&index, &company, &runway, &[], &Assumptions::default(), now);
        assert!(issues.iter().any(|i| i.kind == IssueKind::RunwayCritical && i.severity == 3));
    }

    #[test]
    fn raising_without_pipeline_is_flagged() {
        let company = company(500_000.0, 10_000.0, true);
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, &company, &Assumptions::default(), now);
        let issues =
            detect_issues(&index, &company, &runway, &[], &Assumptions::default(), now);
        assert!(issues.iter().any(|i| i.kind == IssueKind::NoPipeline));
        assert!(issues.iter().any(|i| i.kind == IssueKind::DeckStale));
    }

    #[test]
    fn no_goals_is_an_issue_not_a_health_penalty() {
        let company = company(1_000_000.0, 10_000.0, false);
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, &company, &Assumptions::default(), now);
        let issues =
            detect_issues(&index, &company, &runway, &[], &Assumptions::default(), now);
        assert!(issues.iter().any(|i| i.kind == IssueKind::NoGoals));
    }
}
