// crates/vantage-core/src/decide/weights.rs
// ============================================================================
// Module: Vantage Ranking Weights
// Description: Boost and penalty terms combined into the rank score.
// Purpose: Keep every rank-score term named, bounded, and in one place.
// Dependencies: crate::core::assumptions
// ============================================================================

//! ## Overview
//! The rank score is expected net impact adjusted by four named terms: a
//! trust penalty, an execution-friction penalty, a time-criticality boost,
//! and the obviousness penalty scaled into points. Urgency gates add a
//! fixed boost so gated actions surface at the top while the ordering
//! surface stays the single scalar.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Assumptions;
use crate::core::RankingWeights;

// ============================================================================
// SECTION: Gate Boosts
// ============================================================================

/// Rank-score boost for CAT1-gated actions.
pub const CAT1_GATE_BOOST: f64 = 400.0;

/// Rank-score boost for CAT2-gated actions.
pub const CAT2_GATE_BOOST: f64 = 120.0;

// ============================================================================
// SECTION: Terms
// ============================================================================

/// Trust penalty in rank-score points from a trust risk in [0, 1].
#[must_use]
pub fn trust_penalty(weights: &RankingWeights, trust_risk: f64) -> f64 {
    weights.trust_penalty_weight * trust_risk.clamp(0.0, 1.0)
}

/// Execution-friction penalty in rank-score points from a friction in [0, 1].
#[must_use]
pub fn friction_penalty(weights: &RankingWeights, friction: f64) -> f64 {
    weights.friction_penalty_weight * friction.clamp(0.0, 1.0)
}

/// Time-criticality boost from days until the tightest deadline.
#[must_use]
pub fn time_criticality_boost(
    weights: &RankingWeights,
    assumptions: &Assumptions,
    days_until_deadline: Option<f64>,
) -> f64 {
    days_until_deadline.map_or(0.0, |days| {
        weights.time_criticality_boost(days, &assumptions.urgency_windows_days)
    })
}

/// Obviousness penalty converted into rank-score points.
#[must_use]
pub fn obviousness_points(weights: &RankingWeights, obviousness: f64) -> f64 {
    weights.obviousness_scale * obviousness.clamp(0.0, weights.obviousness_cap)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::core::Assumptions;
    use crate::core::RankingWeights;

    use super::obviousness_points;
    use super::time_criticality_boost;
    use super::trust_penalty;

    #[test]
    fn trust_penalty_is_bounded_by_weight() {
        let weights = RankingWeights::default();
        assert!(trust_penalty(&weights, 2.0) <= weights.trust_penalty_weight);
        assert!(trust_penalty(&weights, -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nearer_deadlines_boost_more() {
        let weights = RankingWeights::default();
        let assumptions = Assumptions::default();
        let near = time_criticality_boost(&weights, &assumptions, Some(3.0));
        let far = time_criticality_boost(&weights, &assumptions, Some(45.0));
        assert!(near > far);
        assert!(time_criticality_boost(&weights, &assumptions, None).abs() < f64::EPSILON);
    }

    #[test]
    fn obviousness_points_respect_the_cap() {
        let weights = RankingWeights::default();
        let capped = obviousness_points(&weights, 5.0);
        assert!((capped - weights.obviousness_scale * weights.obviousness_cap).abs() < 1e-9);
    }
}
