// crates/vantage-core/src/decide/gates.rs
// ============================================================================
// Module: Vantage Urgency Gates
// Description: CAT1/CAT2 gate evaluation, unblock wiring, proactivity checks.
// Purpose: Force reactive work to the top only when conditions truly demand it.
// Dependencies: crate::core, crate::derive, crate::predict, serde
// ============================================================================

//! ## Overview
//! CAT1 (catastrophic) fires on a runway cliff without an active fundraise
//! or a legal deadline inside fourteen days; CAT2 (blocking) fires on stale
//! data blockers or an old deck during a raise. Gates apply to issue-sourced
//! actions only; opportunity-sourced actions are exempt by construction. A
//! CAT2 action must name the opportunity actions it unblocks or it is not
//! gated. After ranking, the proactivity distribution of the top N is
//! validated against the active gate's target; failures are reported as
//! warnings and never mutate the ranking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Assumptions;
use crate::core::Company;
use crate::core::DealStatus;
use crate::core::GoalStatus;
use crate::core::GoalType;
use crate::core::MetricKey;
use crate::core::RankingWeights;
use crate::core::RawIndex;
use crate::core::Timestamp;
use crate::derive::Runway;
use crate::derive::metrics::MetricProvenance;
use crate::derive::metrics::resolve_metric;
use crate::predict::ActionCandidate;
use crate::predict::ActionSource;
use crate::predict::SourceType;

// ============================================================================
// SECTION: Gate Levels
// ============================================================================

/// Urgency gate level.
///
/// # Invariants
/// - `Cat1` outranks `Cat2` when both conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateLevel {
    /// Blocking conditions.
    Cat2,
    /// Catastrophic conditions.
    Cat1,
}

impl GateLevel {
    /// Returns a stable label for the gate level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cat1 => "CAT1",
            Self::Cat2 => "CAT2",
        }
    }
}

// ============================================================================
// SECTION: Company Gate Evaluation
// ============================================================================

/// Evaluates the gate state for one company.
#[must_use]
pub fn evaluate_company_gate(
    index: &RawIndex<'_>,
    company: &Company,
    runway: &Runway,
    assumptions: &Assumptions,
    now: Timestamp,
) -> Option<GateLevel> {
    if cat1_applies(index, company, runway, assumptions, now) {
        return Some(GateLevel::Cat1);
    }
    if cat2_applies(index, company, assumptions, now) {
        return Some(GateLevel::Cat2);
    }
    None
}

/// CAT1: runway cliff without an active fundraise, or a legal deadline.
fn cat1_applies(
    index: &RawIndex<'_>,
    company: &Company,
    runway: &Runway,
    assumptions: &Assumptions,
    now: Timestamp,
) -> bool {
    let cliff = runway
        .value
        .is_some_and(|value| value.is_below(assumptions.cat1_runway_months));
    if cliff {
        let active_fundraise = index.open_goals_for(&company.id).iter().any(|goal| {
            goal.status == GoalStatus::Active
                && matches!(goal.goal_type, GoalType::Fundraise | GoalType::RoundCompletion)
        });
        if !active_fundraise {
            return true;
        }
    }

    // Term-sheet close deadlines are the legal deadlines the raw model carries.
    index.deals_for(&company.id).iter().any(|deal| {
        deal.status == DealStatus::Termsheet
            && deal.expected_close_at.is_some_and(|close| {
                let days = now.days_until(close);
                (0.0..=assumptions.cat1_legal_days).contains(&days)
            })
    })
}

/// CAT2: data blocker stale beyond the grace window, or an old deck mid-raise.
fn cat2_applies(
    index: &RawIndex<'_>,
    company: &Company,
    assumptions: &Assumptions,
    now: Timestamp,
) -> bool {
    for key in [MetricKey::Cash, MetricKey::Burn] {
        let resolved = resolve_metric(index, company, key);
        if resolved.provenance == MetricProvenance::Missing {
            return true;
        }
        if let Some(age) = resolved.age_days(now)
            && age > assumptions.staleness_horizon_days + assumptions.cat2_data_stale_days
        {
            return true;
        }
    }
    if company.raising {
        let deck_age = company.deck_updated_at.map(|at| now.days_since(at));
        if deck_age.is_none_or(|age| age > assumptions.cat2_deck_age_days) {
            return true;
        }
    }
    false
}

// ============================================================================
// SECTION: Action Gating
// ============================================================================

/// Fills `unblocks` on data-blocker candidates with the same-company
/// opportunity actions they enable.
pub fn populate_unblocks(candidates: &mut [ActionCandidate]) {
    let opportunity_ids: Vec<(crate::core::CompanyId, crate::core::ActionId)> = candidates
        .iter()
        .filter(|candidate| candidate.is_opportunity_sourced())
        .map(|candidate| (candidate.company_id.clone(), candidate.id.clone()))
        .collect();

    for candidate in candidates.iter_mut() {
        let is_blocker = candidate.sources.iter().any(|source| {
            matches!(source, ActionSource::Issue { kind, .. } if kind.is_data_blocker())
        });
        if !is_blocker {
            continue;
        }
        candidate.unblocks = opportunity_ids
            .iter()
            .filter(|(company_id, _)| company_id == &candidate.company_id)
            .map(|(_, action_id)| action_id.clone())
            .collect();
    }
}

/// Gate applied to one candidate under its company's gate state.
///
/// Opportunity-sourced actions are never gated. CAT2 gates only data-blocker
/// actions that actually unblock something.
#[must_use]
pub fn action_gate(
    candidate: &ActionCandidate,
    company_gate: Option<GateLevel>,
) -> Option<GateLevel> {
    let gate = company_gate?;
    if candidate.primary_source_type() != Some(SourceType::Issue) {
        return None;
    }
    match gate {
        GateLevel::Cat1 => Some(GateLevel::Cat1),
        GateLevel::Cat2 => {
            let is_blocker = candidate.sources.iter().any(|source| {
                matches!(source, ActionSource::Issue { kind, .. } if kind.is_data_blocker())
            });
            if is_blocker && !candidate.unblocks.is_empty() {
                Some(GateLevel::Cat2)
            } else {
                None
            }
        }
    }
}

// ============================================================================
// SECTION: Proactivity Validation
// ============================================================================

/// Proactivity validation outcome for one run.
///
/// # Invariants
/// - `observed` and `target` are ratios in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProactivityReport {
    /// Gate the target was chosen for.
    pub active_gate: Option<GateLevel>,
    /// Required opportunity-sourced ratio.
    pub target: f64,
    /// Observed opportunity-sourced ratio in the top N.
    pub observed: f64,
    /// Number of top actions inspected.
    pub inspected: usize,
    /// Whether the target was met.
    pub satisfied: bool,
}

/// Validates the proactivity distribution of the ranked top N.
///
/// `opportunity_flags` lists, in rank order, whether each action is
/// opportunity-sourced; only the first `top_n` entries are inspected.
#[must_use]
pub fn validate_proactivity(
    opportunity_flags: &[bool],
    active_gate: Option<GateLevel>,
    weights: &RankingWeights,
) -> ProactivityReport {
    let target = match active_gate {
        None => weights.proactivity_no_gate,
        Some(GateLevel::Cat2) => weights.proactivity_cat2,
        Some(GateLevel::Cat1) => weights.proactivity_cat1,
    };
    let inspected = opportunity_flags.len().min(weights.proactivity_top_n);
    let observed = if inspected == 0 {
        1.0
    } else {
        let hits = opportunity_flags.iter().take(inspected).filter(|flag| **flag).count();
        count_f64(hits) / count_f64(inspected)
    };
    ProactivityReport {
        active_gate,
        target,
        observed,
        inspected,
        satisfied: observed >= target,
    }
}

/// Converts a small count to f64.
#[allow(clippy::cast_precision_loss, reason = "top-N counts are small")]
fn count_f64(value: usize) -> f64 {
    value as f64
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Assumptions;
    use crate::core::Company;
    use crate::core::Goal;
    use crate::core::GoalStatus;
    use crate::core::GoalType;
    use crate::core::Provenance;
    use crate::core::RankingWeights;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;
    use crate::derive::derive_runway;

    use super::GateLevel;
    use super::evaluate_company_gate;
    use super::validate_proactivity;

    /// Runway-cliff company, optionally carrying an active fundraise goal.
    fn graph(with_fundraise_goal: bool) -> RawGraph {
        let company = Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: Some(20_000.0),
            burn: Some(10_000.0),
            employees: None,
            recurring: None,
            revenue: None,
            raising: false,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        };
        let goals = if with_fundraise_goal {
            vec![Goal {
                id: "g1".into(),
                company_id: "c1".into(),
                goal_type: GoalType::Fundraise,
                target: 2_000_000.0,
                current: 0.0,
                due: Timestamp::from_unix_millis(0).plus_days(90),
                status: GoalStatus::Active,
                weight: None,
            }]
        } else {
            Vec::new()
        };
        RawGraph { companies: vec![company], goals, ..RawGraph::default() }
    }

    #[test]
    fn runway_cliff_without_fundraise_is_cat1() {
        let graph = graph(false);
        let index = RawIndex::build(&graph);
        let company = &graph.companies[0];
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, company, &Assumptions::default(), now);
        let gate =
            evaluate_company_gate(&index, company, &runway, &Assumptions::default(), now);
        assert_eq!(gate, Some(GateLevel::Cat1));
    }

    #[test]
    fn active_fundraise_goal_defuses_cat1() {
        let graph = graph(true);
        let index = RawIndex::build(&graph);
        let company = &graph.companies[0];
        let now = Timestamp::from_unix_millis(0);
        let runway = derive_runway(&index, company, &Assumptions::default(), now);
        let gate =
            evaluate_company_gate(&index, company, &runway, &Assumptions::default(), now);
        assert_ne!(gate, Some(GateLevel::Cat1));
    }

    #[test]
    fn proactivity_targets_follow_the_active_gate() {
        let weights = RankingWeights::default();
        let flags = vec![true, true, false, false, false, false, false, false, false, false];
        let no_gate = validate_proactivity(&flags, None, &weights);
        assert!(!no_gate.satisfied);
        let cat1 = validate_proactivity(&flags, Some(GateLevel::Cat1), &weights);
        assert!(cat1.satisfied);
    }
}
