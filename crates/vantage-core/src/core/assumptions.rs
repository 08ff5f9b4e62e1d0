// crates/vantage-core/src/core/assumptions.rs
// ============================================================================
// Module: Vantage Assumption Policy
// Description: Tunable assumptions and ranking weights for the pipeline.
// Purpose: Centralize every tunable so no magic number reaches a score directly.
// Dependencies: crate::core::{entities, stage}, serde
// ============================================================================

//! ## Overview
//! The assumption policy is a process-wide immutable value. Nothing here
//! flows into a rank score directly; every value is consumed by a derive or
//! decide computation first. Hosts override individual fields through
//! `vantage-config`; the defaults below are the canonical table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::entities::GoalType;
use crate::core::stage::Stage;

// ============================================================================
// SECTION: Assumptions
// ============================================================================

/// Tunable assumptions for derivation and prediction.
///
/// # Invariants
/// - Day-valued fields are positive; `vantage-config` validation enforces
///   ordering of the urgency windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assumptions {
    /// Relationship strength decay half-life, days.
    pub relationship_half_life_days: f64,
    /// Days without touch after which a relationship reads cold.
    pub cold_threshold_days: f64,
    /// Baseline introduction conversion rate.
    pub intro_baseline_conversion: f64,
    /// Per-hop decay applied to multi-hop introduction paths.
    pub second_order_decay: f64,
    /// Required lift over baseline for a second-order path to surface.
    pub second_order_lift_threshold: f64,
    /// Minimum share of second-order candidates that must pass the lift
    /// threshold before the feature is suppressed for the run.
    pub second_order_min_pass_rate: f64,
    /// Timing-window urgency thresholds, days, ascending.
    pub urgency_windows_days: [f64; 4],
    /// CAT1 gate: runway below this many months without an active fundraise.
    pub cat1_runway_months: f64,
    /// CAT1 gate: legal deadline within this many days.
    pub cat1_legal_days: f64,
    /// CAT2 gate: data blocker stale beyond the horizon by this many days.
    pub cat2_data_stale_days: f64,
    /// CAT2 gate: deck older than this many days during a fundraise.
    pub cat2_deck_age_days: f64,
    /// Staleness horizon, days; observations older than this carry full
    /// staleness penalty.
    pub staleness_horizon_days: f64,
    /// Bayesian prior strength for introduction calibration.
    pub calibration_prior_strength: f64,
    /// Minimum observations for an empirical introducer prior.
    pub calibration_min_introducer_obs: u32,
    /// Minimum observations for an empirical path-type prior.
    pub calibration_min_path_obs: u32,
    /// Minimum observations for an empirical target-type prior.
    pub calibration_min_target_obs: u32,
    /// User overrides of per-type base goal weights.
    pub goal_weight_overrides: BTreeMap<GoalType, f64>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            relationship_half_life_days: 90.0,
            cold_threshold_days: 180.0,
            intro_baseline_conversion: 0.15,
            second_order_decay: 0.6,
            second_order_lift_threshold: 1.2,
            second_order_min_pass_rate: 0.2,
            urgency_windows_days: [7.0, 14.0, 30.0, 60.0],
            cat1_runway_months: 3.0,
            cat1_legal_days: 14.0,
            cat2_data_stale_days: 7.0,
            cat2_deck_age_days: 30.0,
            staleness_horizon_days: 30.0,
            calibration_prior_strength: 2.0,
            calibration_min_introducer_obs: 3,
            calibration_min_path_obs: 5,
            calibration_min_target_obs: 5,
            goal_weight_overrides: BTreeMap::new(),
        }
    }
}

impl Assumptions {
    /// Returns the base weight for a goal type, honoring user overrides.
    #[must_use]
    pub fn goal_weight(&self, goal_type: GoalType) -> f64 {
        if let Some(weight) = self.goal_weight_overrides.get(&goal_type) {
            return *weight;
        }
        base_goal_weight(goal_type)
    }

    /// Returns the stage multiplier applied to a goal type's weight.
    #[must_use]
    pub fn stage_goal_multiplier(&self, stage: Stage, goal_type: GoalType) -> f64 {
        match (stage, goal_type) {
            (Stage::PreSeed | Stage::Seed, GoalType::Fundraise | GoalType::RoundCompletion) => 1.3,
            (Stage::PreSeed | Stage::Seed, GoalType::Product) => 1.15,
            (Stage::PreSeed | Stage::Seed, GoalType::Efficiency) => 0.8,
            (Stage::SeriesA, GoalType::Revenue | GoalType::CustomerGrowth) => 1.2,
            (Stage::SeriesA, GoalType::Hiring) => 1.1,
            (Stage::SeriesB | Stage::SeriesC | Stage::SeriesD, GoalType::Revenue) => 1.15,
            (
                Stage::SeriesB | Stage::SeriesC | Stage::SeriesD,
                GoalType::Efficiency | GoalType::Retention,
            ) => 1.1,
            (Stage::SeriesB | Stage::SeriesC | Stage::SeriesD, GoalType::Fundraise) => 0.95,
            _ => 1.0,
        }
    }

    /// Decays a relationship strength for elapsed time since last touch.
    ///
    /// Half-life decay; a 90-day-old touch halves the effective strength.
    #[must_use]
    pub fn decayed_strength(&self, strength: f64, days_since_touch: f64) -> f64 {
        if days_since_touch <= 0.0 {
            return strength;
        }
        strength * 0.5_f64.powf(days_since_touch / self.relationship_half_life_days)
    }
}

/// Canonical base weight per goal type.
const fn base_goal_weight(goal_type: GoalType) -> f64 {
    match goal_type {
        GoalType::Fundraise => 1.0,
        GoalType::RoundCompletion => 0.95,
        GoalType::Revenue | GoalType::DealClose => 0.9,
        GoalType::CustomerGrowth => 0.8,
        GoalType::Product | GoalType::Retention => 0.7,
        GoalType::Hiring | GoalType::Partnership | GoalType::InvestorActivation => 0.6,
        GoalType::Operational | GoalType::Efficiency | GoalType::ChampionCultivation => 0.5,
        GoalType::RelationshipBuild | GoalType::IntroTarget => 0.4,
    }
}

// ============================================================================
// SECTION: Ranking Weights
// ============================================================================

/// Ranking-component weights and bounds.
///
/// # Invariants
/// - `component_floor <= component_ceiling`.
/// - `obviousness_cap` is below 1.0 so no action is fully suppressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankingWeights {
    /// Maximum upside magnitude.
    pub impact_max: f64,
    /// Floor for multiplicative rank components.
    pub component_floor: f64,
    /// Ceiling for multiplicative rank components.
    pub component_ceiling: f64,
    /// Obviousness penalty cap.
    pub obviousness_cap: f64,
    /// Scale converting obviousness penalty into rank-score points.
    pub obviousness_scale: f64,
    /// Weight of the saturating time penalty.
    pub time_penalty_weight: f64,
    /// Knee of the saturating time penalty, days.
    pub time_penalty_knee_days: f64,
    /// Weight converting trust risk into rank-score points.
    pub trust_penalty_weight: f64,
    /// Weight converting execution friction into rank-score points.
    pub friction_penalty_weight: f64,
    /// Boost points for deadlines inside each urgency window, aligned with
    /// [`Assumptions::urgency_windows_days`].
    pub time_criticality_boosts: [f64; 4],
    /// Number of top actions the proactivity validator inspects.
    pub proactivity_top_n: usize,
    /// Required opportunity-sourced ratio with no gate active.
    pub proactivity_no_gate: f64,
    /// Required opportunity-sourced ratio under CAT2.
    pub proactivity_cat2: f64,
    /// Required opportunity-sourced ratio under CAT1.
    pub proactivity_cat1: f64,
    /// Minimum outcome samples before pattern lift applies.
    pub pattern_min_samples: u32,
    /// Minimum outcome samples before friction statistics apply.
    pub friction_min_samples: u32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            impact_max: 100.0,
            component_floor: 0.2,
            component_ceiling: 1.0,
            obviousness_cap: 0.8,
            obviousness_scale: 40.0,
            time_penalty_weight: 20.0,
            time_penalty_knee_days: 14.0,
            trust_penalty_weight: 25.0,
            friction_penalty_weight: 15.0,
            time_criticality_boosts: [15.0, 10.0, 5.0, 2.0],
            proactivity_top_n: 10,
            proactivity_no_gate: 0.7,
            proactivity_cat2: 0.5,
            proactivity_cat1: 0.0,
            pattern_min_samples: 5,
            friction_min_samples: 3,
        }
    }
}

impl RankingWeights {
    /// Saturating time penalty in rank-score points.
    ///
    /// Monotone in days-to-impact and saturating near 60 days.
    #[must_use]
    pub fn time_penalty(&self, days_to_impact: f64) -> f64 {
        let days = days_to_impact.max(0.0);
        self.time_penalty_weight * days / (days + self.time_penalty_knee_days)
    }

    /// Boost points for a deadline this many days out, per urgency window.
    #[must_use]
    pub fn time_criticality_boost(&self, days_until_deadline: f64, windows: &[f64; 4]) -> f64 {
        for (window, boost) in windows.iter().zip(self.time_criticality_boosts.iter()) {
            if days_until_deadline <= *window {
                return *boost;
            }
        }
        0.0
    }

    /// Clamps a multiplicative component into the configured bounds.
    #[must_use]
    pub fn clamp_component(&self, value: f64) -> f64 {
        value.clamp(self.component_floor, self.component_ceiling)
    }
}

// ============================================================================
// SECTION: Engine Settings
// ============================================================================

/// Complete immutable settings bundle consumed by the engine.
///
/// # Invariants
/// - Constructed once per process; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Tunable assumptions.
    pub assumptions: Assumptions,
    /// Ranking weights and bounds.
    pub weights: RankingWeights,
    /// Per-stage bound overrides from configuration.
    pub stage_overrides: BTreeMap<crate::core::stage::Stage, crate::core::stage::StageOverrides>,
    /// Additional forbidden field names contributed by configuration.
    pub extra_forbidden_fields: Vec<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Assumptions;
    use super::RankingWeights;

    #[test]
    fn time_penalty_is_monotone_and_saturating() {
        let weights = RankingWeights::default();
        let mut last = -1.0;
        for days in [0.0, 1.0, 7.0, 14.0, 30.0, 60.0] {
            let penalty = weights.time_penalty(days);
            assert!(penalty >= last);
            last = penalty;
        }
        assert!(weights.time_penalty(60.0) < weights.time_penalty_weight);
    }

    #[test]
    fn strength_decay_halves_at_half_life() {
        let assumptions = Assumptions::default();
        let decayed = assumptions.decayed_strength(80.0, 90.0);
        assert!((decayed - 40.0).abs() < 1e-9);
    }
}
