// crates/vantage-config/src/lib.rs
// ============================================================================
// Module: Vantage Config
// Description: Canonical configuration model, strict loading, validation.
// Purpose: Turn a TOML file into validated engine settings, fail-closed.
// Dependencies: serde, thiserror, toml, vantage-core
// ============================================================================

//! ## Overview
//! Configuration is a single immutable value built from defaults plus an
//! optional TOML file. Loading is strict: path length, file size, and
//! encoding are guarded before parsing, and the parsed value is validated
//! before it can become [`vantage_core::EngineSettings`]. Every failure is a
//! typed [`ConfigError`]; there is no partially applied configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use vantage_core::core::Stage;
use vantage_core::core::StageOverrides;
use vantage_core::Assumptions;
use vantage_core::EngineSettings;
use vantage_core::RankingWeights;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum config path length in bytes.
const MAX_PATH_LEN: usize = 4_096;

/// Maximum length of a single path component in bytes.
const MAX_PATH_COMPONENT_LEN: usize = 255;

/// Maximum config file size in bytes.
const MAX_FILE_SIZE: u64 = 1_048_576;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; messages are matched by
///   the validation test suite.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Path exceeds the maximum length.
    #[error("config path exceeds max length ({0} bytes)")]
    PathTooLong(usize),
    /// One path component exceeds the maximum length.
    #[error("config path component too long: {0}")]
    PathComponentTooLong(String),
    /// File exceeds the size limit.
    #[error("config file exceeds size limit ({0} bytes)")]
    FileTooLarge(u64),
    /// File is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// File could not be read.
    #[error("config read failed: {0}")]
    Io(String),
    /// TOML parsing failed.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A validated value is out of range.
    #[error("config invalid: {field}: {reason}")]
    Invalid {
        /// Offending field path.
        field: &'static str,
        /// What went wrong.
        reason: String,
    },
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// The canonical Vantage configuration.
///
/// # Invariants
/// - `validate` has passed before the value leaves this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct VantageConfig {
    /// Per-stage bound overrides.
    pub stage_params: BTreeMap<Stage, StageOverrides>,
    /// Tunable assumptions.
    pub assumptions: Assumptions,
    /// Ranking weights and bounds.
    pub weights: RankingWeights,
    /// Additional forbidden field names for the export firewall.
    pub forbidden_fields: Vec<String>,
}

impl VantageConfig {
    /// Loads configuration from an optional TOML file.
    ///
    /// `None` yields the validated defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on guard, parse, or validation failure.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };

        let rendered = path.to_string_lossy();
        if rendered.len() > MAX_PATH_LEN {
            return Err(ConfigError::PathTooLong(rendered.len()));
        }
        for component in path.components() {
            let component = component.as_os_str().to_string_lossy();
            if component.len() > MAX_PATH_COMPONENT_LEN {
                return Err(ConfigError::PathComponentTooLong(component.into_owned()));
            }
        }

        let metadata = std::fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::FileTooLarge(metadata.len()));
        }

        let bytes = std::fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        let config: Self =
            toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every tunable range and ordering constraint.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.assumptions;
        require(a.relationship_half_life_days > 0.0, "assumptions.relationshipHalfLifeDays", "must be positive")?;
        require(a.cold_threshold_days > 0.0, "assumptions.coldThresholdDays", "must be positive")?;
        require(
            (0.0..1.0).contains(&a.intro_baseline_conversion) && a.intro_baseline_conversion > 0.0,
            "assumptions.introBaselineConversion",
            "must be in (0, 1)",
        )?;
        require(
            a.second_order_decay > 0.0 && a.second_order_decay <= 1.0,
            "assumptions.secondOrderDecay",
            "must be in (0, 1]",
        )?;
        require(
            a.second_order_lift_threshold >= 1.0,
            "assumptions.secondOrderLiftThreshold",
            "must be at least 1",
        )?;
        require(
            (0.0..=1.0).contains(&a.second_order_min_pass_rate),
            "assumptions.secondOrderMinPassRate",
            "must be in [0, 1]",
        )?;
        let windows = a.urgency_windows_days;
        require(
            windows.windows(2).all(|pair| pair[0] < pair[1]) && windows[0] > 0.0,
            "assumptions.urgencyWindowsDays",
            "must be positive and strictly ascending",
        )?;
        require(a.cat1_runway_months > 0.0, "assumptions.cat1RunwayMonths", "must be positive")?;
        require(a.staleness_horizon_days > 0.0, "assumptions.stalenessHorizonDays", "must be positive")?;
        require(
            a.calibration_prior_strength > 0.0,
            "assumptions.calibrationPriorStrength",
            "must be positive",
        )?;
        for (goal_type, weight) in &a.goal_weight_overrides {
            require(
                (0.0..=3.0).contains(weight),
                "assumptions.goalWeightOverrides",
                format!("{} must be in [0, 3]", goal_type.as_str()),
            )?;
        }

        let w = &self.weights;
        require(w.impact_max > 0.0, "weights.impactMax", "must be positive")?;
        require(
            w.component_floor > 0.0 && w.component_floor <= w.component_ceiling,
            "weights.componentFloor",
            "must be positive and at most the ceiling",
        )?;
        require(
            w.component_ceiling <= 1.0,
            "weights.componentCeiling",
            "must be at most 1",
        )?;
        require(
            w.obviousness_cap > 0.0 && w.obviousness_cap < 1.0,
            "weights.obviousnessCap",
            "must be in (0, 1)",
        )?;
        require(w.time_penalty_knee_days > 0.0, "weights.timePenaltyKneeDays", "must be positive")?;
        require(w.proactivity_top_n >= 1, "weights.proactivityTopN", "must be at least 1")?;
        for (field, ratio) in [
            ("weights.proactivityNoGate", w.proactivity_no_gate),
            ("weights.proactivityCat2", w.proactivity_cat2),
            ("weights.proactivityCat1", w.proactivity_cat1),
        ] {
            require((0.0..=1.0).contains(&ratio), field, "must be in [0, 1]")?;
        }

        for (stage, row) in &self.stage_params {
            for bound in [row.raise, row.burn, row.employees, row.revenue, row.churn, row.nrr]
                .into_iter()
                .flatten()
            {
                if let (Some(min), Some(max)) = (bound.min, bound.max) {
                    require(
                        min <= max,
                        "stageParams",
                        format!("{}: bound min exceeds max", stage.as_str()),
                    )?;
                }
            }
        }

        for field in &self.forbidden_fields {
            require(!field.is_empty(), "forbiddenFields", "entries must be non-empty")?;
        }
        Ok(())
    }

    /// Converts the validated configuration into engine settings.
    #[must_use]
    pub fn into_settings(self) -> EngineSettings {
        EngineSettings {
            assumptions: self.assumptions,
            weights: self.weights,
            stage_overrides: self.stage_params,
            extra_forbidden_fields: self.forbidden_fields,
        }
    }
}

/// Validation helper: fail with a field path and reason.
fn require(
    condition: bool,
    field: &'static str,
    reason: impl Into<String>,
) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: reason.into() })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use super::VantageConfig;

    #[test]
    fn defaults_validate_cleanly() {
        assert!(VantageConfig::load(None).is_ok());
    }

    #[test]
    fn defaults_round_trip_into_settings() {
        let settings = VantageConfig::load(None).unwrap().into_settings();
        assert!((settings.weights.obviousness_cap - 0.8).abs() < f64::EPSILON);
        assert!((settings.assumptions.relationship_half_life_days - 90.0).abs() < f64::EPSILON);
    }
}
