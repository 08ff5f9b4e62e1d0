// crates/vantage-core/src/decide/rank.rs
// ============================================================================
// Module: Vantage Ranking
// Description: Rank-score computation and the total order over actions.
// Purpose: Induce one auditable scalar ordering; nothing else may reorder.
// Dependencies: crate::core, crate::decide, crate::predict, serde, smallvec
// ============================================================================

//! ## Overview
//! The canonical rank of every action is induced by one scalar. Expected net
//! impact combines the seven impact dimensions; the rank score adjusts it by
//! the trust penalty, the execution-friction penalty, the time-criticality
//! boost, the gate boost, and the scaled obviousness penalty. Actions sort
//! by rank score descending with action-identifier ties ascending, giving a
//! total, stable, deterministic order. Every ranked action exposes its full
//! component breakdown for audit; the breakdown is never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::core::ActionId;
use crate::core::CompanyId;
use crate::core::EngineSettings;
use crate::core::GoalId;
use crate::core::ResolutionId;
use crate::decide::impact::ImpactModel;
use crate::decide::weights::CAT1_GATE_BOOST;
use crate::decide::weights::CAT2_GATE_BOOST;
use crate::decide::weights::friction_penalty;
use crate::decide::weights::obviousness_points;
use crate::decide::weights::time_criticality_boost;
use crate::decide::weights::trust_penalty;
use crate::predict::ActionCandidate;
use crate::predict::ActionSource;
use crate::predict::IntroTiming;

use super::gates::GateLevel;

// ============================================================================
// SECTION: Rank Components
// ============================================================================

/// Audit breakdown of one rank score.
///
/// # Invariants
/// - `success_probability` is clamped to the configured component bounds.
/// - `obviousness_penalty` never exceeds the configured cap.
/// - Recomputing `rank_score` from the other fields reproduces it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankComponents {
    /// Upside magnitude.
    pub upside: f64,
    /// Clamped composite success probability (execution x success).
    pub success_probability: f64,
    /// Second-order leverage.
    pub second_order_leverage: f64,
    /// Downside term: downside x (1 - success probability).
    pub downside_term: f64,
    /// Effort cost.
    pub effort_cost: f64,
    /// Saturating time penalty.
    pub time_penalty: f64,
    /// Expected net impact before the adjustment terms.
    pub expected_net_impact: f64,
    /// Trust penalty.
    pub trust_penalty: f64,
    /// Execution-friction penalty.
    pub friction_penalty: f64,
    /// Time-criticality boost.
    pub time_criticality_boost: f64,
    /// Gate boost.
    pub gate_boost: f64,
    /// Obviousness penalty, 0 to cap.
    pub obviousness_penalty: f64,
    /// Final rank score.
    pub rank_score: f64,
}

// ============================================================================
// SECTION: Ranked Action
// ============================================================================

/// A fully scored, ranked action.
///
/// # Invariants
/// - `rank` is 1-based and consistent with the global rank-score order.
/// - Runtime-only; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAction {
    /// Content-derived action identifier.
    pub id: ActionId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display title.
    pub title: String,
    /// Tagged sources.
    pub sources: SmallVec<[ActionSource; 2]>,
    /// Resolution template applied.
    pub resolution_id: ResolutionId,
    /// Step list.
    pub steps: SmallVec<[String; 4]>,
    /// Estimated effort in days.
    pub effort_days: f64,
    /// Goal served, when one is served.
    pub goal_id: Option<GoalId>,
    /// Introduction timing, for introduction actions.
    pub timing: Option<IntroTiming>,
    /// Opportunity actions this action unblocks.
    pub unblocks: Vec<ActionId>,
    /// Gate applied, if any.
    pub gate: Option<GateLevel>,
    /// Impact model.
    pub impact: ImpactModel,
    /// Rank score.
    pub rank_score: f64,
    /// 1-based rank after sorting.
    pub rank: u32,
    /// Component breakdown for audit.
    pub rank_components: RankComponents,
}

impl RankedAction {
    /// Proactive value creation rather than reaction.
    #[must_use]
    pub fn is_opportunity_sourced(&self) -> bool {
        self.sources
            .first()
            .is_some_and(|source| source.source_type().is_opportunity_sourced())
    }
}

// ============================================================================
// SECTION: Scoring
// ============================================================================

/// Per-action decision inputs gathered by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    /// Trust risk in [0, 1] from the context map.
    pub trust_risk: f64,
    /// Execution friction in [0, 1] from outcome history.
    pub friction: f64,
    /// Days until the tightest applicable deadline.
    pub deadline_days: Option<f64>,
    /// Obviousness penalty in [0, cap].
    pub obviousness: f64,
    /// Gate applied to the action.
    pub gate: Option<GateLevel>,
}

/// Scores a candidate into a ranked action (rank assigned later).
#[must_use]
pub fn score_action(
    candidate: ActionCandidate,
    impact: ImpactModel,
    inputs: &ScoreInputs,
    settings: &EngineSettings,
) -> RankedAction {
    let weights = &settings.weights;

    let success = weights
        .clamp_component(impact.execution_probability * impact.probability_of_success);
    let downside_term = impact.downside * (1.0 - success);
    let time_penalty = weights.time_penalty(impact.time_to_impact_days);
    let expected_net_impact = impact.upside * success + impact.second_order_leverage
        - downside_term
        - impact.effort_cost
        - time_penalty;

    let trust = trust_penalty(weights, inputs.trust_risk);
    let friction = friction_penalty(weights, inputs.friction);
    let boost =
        time_criticality_boost(weights, &settings.assumptions, inputs.deadline_days);
    let gate_boost = match inputs.gate {
        Some(GateLevel::Cat1) => CAT1_GATE_BOOST,
        Some(GateLevel::Cat2) => CAT2_GATE_BOOST,
        None => 0.0,
    };
    let obviousness = inputs.obviousness.clamp(0.0, weights.obviousness_cap);
    let obviousness_term = obviousness_points(weights, obviousness);

    let rank_score = round4(
        expected_net_impact - trust - friction + boost + gate_boost - obviousness_term,
    );

    let rank_components = RankComponents {
        upside: round4(impact.upside),
        success_probability: round4(success),
        second_order_leverage: round4(impact.second_order_leverage),
        downside_term: round4(downside_term),
        effort_cost: round4(impact.effort_cost),
        time_penalty: round4(time_penalty),
        expected_net_impact: round4(expected_net_impact),
        trust_penalty: round4(trust),
        friction_penalty: round4(friction),
        time_criticality_boost: round4(boost),
        gate_boost: round4(gate_boost),
        obviousness_penalty: round4(obviousness),
        rank_score,
    };

    RankedAction {
        id: candidate.id,
        company_id: candidate.company_id,
        title: candidate.title,
        sources: candidate.sources,
        resolution_id: candidate.resolution_id,
        steps: candidate.steps,
        effort_days: candidate.effort_days,
        goal_id: candidate.goal_id,
        timing: candidate.timing,
        unblocks: candidate.unblocks,
        gate: inputs.gate,
        impact,
        rank_score,
        rank: 0,
        rank_components,
    }
}

/// Sorts by rank score descending with identifier ties ascending and
/// assigns 1-based ranks.
pub fn assign_ranks(actions: &mut [RankedAction]) {
    actions.sort_by(|a, b| {
        b.rank_score
            .partial_cmp(&a.rank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    for (index, action) in actions.iter_mut().enumerate() {
        action.rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
}

/// Rounds to four decimal places for stable canonical serialization.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use smallvec::smallvec;

    use crate::core::EngineSettings;
    use crate::decide::impact::ImpactModel;
    use crate::predict::ActionCandidate;
    use crate::predict::ActionSource;

    use super::ScoreInputs;
    use super::assign_ranks;
    use super::score_action;

    /// Minimal opportunity candidate with a given identifier.
    fn candidate(id: &str) -> ActionCandidate {
        ActionCandidate {
            id: id.into(),
            company_id: "c1".into(),
            title: "t".into(),
            sources: smallvec![ActionSource::Opportunity {
                company_id: "c1".into(),
                label: "x".into(),
            }],
            resolution_id: "res-intro-path".into(),
            steps: smallvec![],
            effort_days: 1.0,
            goal_id: None,
            timing: None,
            unblocks: Vec::new(),
        }
    }

    /// Neutral impact model fixture.
    fn impact() -> ImpactModel {
        ImpactModel {
            upside: 50.0,
            probability_of_success: 0.6,
            execution_probability: 0.7,
            downside: 10.0,
            time_to_impact_days: 7.0,
            effort_cost: 12.0,
            second_order_leverage: 20.0,
        }
    }

    #[test]
    fn components_recompose_into_the_rank_score() {
        let settings = EngineSettings::default();
        let action =
            score_action(candidate("a1"), impact(), &ScoreInputs::default(), &settings);
        let c = action.rank_components;
        let recomposed = c.expected_net_impact - c.trust_penalty - c.friction_penalty
            + c.time_criticality_boost
            + c.gate_boost
            - settings.weights.obviousness_scale * c.obviousness_penalty;
        assert!((recomposed - c.rank_score).abs() < 1e-3);
    }

    #[test]
    fn ties_break_by_identifier_ascending() {
        let settings = EngineSettings::default();
        let mut actions = vec![
            score_action(candidate("b"), impact(), &ScoreInputs::default(), &settings),
            score_action(candidate("a"), impact(), &ScoreInputs::default(), &settings),
        ];
        assign_ranks(&mut actions);
        assert_eq!(actions[0].id.as_str(), "a");
        assert_eq!(actions[0].rank, 1);
        assert_eq!(actions[1].rank, 2);
    }

    #[test]
    fn obviousness_lowers_the_score_but_never_zeroes_impact() {
        let settings = EngineSettings::default();
        let plain =
            score_action(candidate("a"), impact(), &ScoreInputs::default(), &settings);
        let suppressed = score_action(
            candidate("a"),
            impact(),
            &ScoreInputs { obviousness: 0.8, ..ScoreInputs::default() },
            &settings,
        );
        assert!(suppressed.rank_score < plain.rank_score);
        assert!(suppressed.rank_components.success_probability >= settings.weights.component_floor);
    }
}
