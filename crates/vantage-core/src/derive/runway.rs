// crates/vantage-core/src/derive/runway.rs
// ============================================================================
// Module: Vantage Runway Derivation
// Description: Cash runway in months with confidence and staleness handling.
// Purpose: Produce the single runway figure health and gating depend on.
// Dependencies: crate::core, crate::derive::metrics, serde
// ============================================================================

//! ## Overview
//! Runway is months of cash at the current burn. Missing inputs produce an
//! unknown runway with zero confidence, never a fabricated number. Zero or
//! negative burn reads as unbounded runway at half confidence; negative
//! cash reads as zero months at high confidence. Staleness of the
//! supplying observations erodes confidence linearly over the horizon.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Assumptions;
use crate::core::Company;
use crate::core::MetricKey;
use crate::core::RawIndex;
use crate::core::Timestamp;
use crate::derive::metrics::resolve_metric;

// ============================================================================
// SECTION: Runway Value
// ============================================================================

/// Runway figure.
///
/// # Invariants
/// - `Months` is finite and non-negative, rounded to 0.1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum RunwayValue {
    /// Finite months of runway.
    Months(f64),
    /// Burn is zero or negative; runway is unbounded.
    Unbounded,
}

impl RunwayValue {
    /// Returns the finite months figure, treating unbounded as `None`.
    #[must_use]
    pub const fn months(self) -> Option<f64> {
        match self {
            Self::Months(value) => Some(value),
            Self::Unbounded => None,
        }
    }

    /// Returns true when the runway is below the threshold in months.
    #[must_use]
    pub fn is_below(self, threshold: f64) -> bool {
        match self {
            Self::Months(value) => value < threshold,
            Self::Unbounded => false,
        }
    }
}

// ============================================================================
// SECTION: Runway
// ============================================================================

/// Derived runway with confidence and provenance.
///
/// # Invariants
/// - `value` is `None` exactly when a required input was missing.
/// - `confidence` is in [0, 1]; `staleness_penalty` is in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runway {
    /// Runway figure, when derivable.
    pub value: Option<RunwayValue>,
    /// Confidence in the figure, 0-1.
    pub confidence: f64,
    /// Inputs that supplied values.
    pub used_inputs: Vec<MetricKey>,
    /// Required inputs that were missing.
    pub missing_inputs: Vec<MetricKey>,
    /// Staleness penalty applied, 0-1.
    pub staleness_penalty: f64,
    /// Human-readable derivation trace.
    pub explain: String,
}

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives runway for a company at `now`.
#[must_use]
pub fn derive_runway(
    index: &RawIndex<'_>,
    company: &Company,
    assumptions: &Assumptions,
    now: Timestamp,
) -> Runway {
    let cash = resolve_metric(index, company, MetricKey::Cash);
    let burn = resolve_metric(index, company, MetricKey::Burn);

    let mut missing = Vec::new();
    if cash.value.is_none() {
        missing.push(MetricKey::Cash);
    }
    if burn.value.is_none() {
        missing.push(MetricKey::Burn);
    }
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
        return Runway {
            value: None,
            confidence: 0.0,
            used_inputs: Vec::new(),
            missing_inputs: missing.clone(),
            staleness_penalty: 0.0,
            explain: format!("runway unknown: missing {}", labels.join(", ")),
        };
    }

    let cash_value = cash.value.unwrap_or_default();
    let burn_value = burn.value.unwrap_or_default();
    let used = vec![MetricKey::Cash, MetricKey::Burn];

    if burn_value <= 0.0 {
        return Runway {
            value: Some(RunwayValue::Unbounded),
            confidence: 0.5,
            used_inputs: used,
            missing_inputs: Vec::new(),
            staleness_penalty: 0.0,
            explain: "burn is zero or negative; runway unbounded".to_string(),
        };
    }
    if cash_value < 0.0 {
        return Runway {
            value: Some(RunwayValue::Months(0.0)),
            confidence: 0.9,
            used_inputs: used,
            missing_inputs: Vec::new(),
            staleness_penalty: 0.0,
            explain: "cash is negative; runway exhausted".to_string(),
        };
    }

    let months = round_tenth(cash_value / burn_value);
    let cash_age = cash.age_days(now).unwrap_or(0.0);
    let burn_age = burn.age_days(now).unwrap_or(0.0);
    let staleness = staleness_penalty(cash_age.max(burn_age), assumptions.staleness_horizon_days);
    let confidence = 1.0 - 0.5 * staleness;

    Runway {
        value: Some(RunwayValue::Months(months)),
        confidence,
        used_inputs: used,
        missing_inputs: Vec::new(),
        staleness_penalty: staleness,
        explain: format!(
            "runway {months:.1}mo = cash {cash_value:.0} / burn {burn_value:.0}; staleness {staleness:.2}"
        ),
    }
}

/// Linear staleness penalty reaching 1.0 at the horizon.
#[must_use]
pub fn staleness_penalty(age_days: f64, horizon_days: f64) -> f64 {
    if horizon_days <= 0.0 {
        return 1.0;
    }
    (age_days / horizon_days).clamp(0.0, 1.0)
}

/// Rounds to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
