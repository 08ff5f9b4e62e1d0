// crates/vantage-core/src/core/metrics.rs
// ============================================================================
// Module: Vantage Metric Facts
// Description: Raw metric observations and their closed key/unit/source sets.
// Purpose: Keep derived metric names unrepresentable in the raw time series.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Metric facts are the raw observation time series per company. The key set
//! is closed: only raw, directly-observable metrics can be recorded, so
//! derived names (runway, health, scores) are unrepresentable by
//! construction. Resolution order for a `(company, key)` pair is defined in
//! the derive layer; the latest `asOf` observation always wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CompanyId;
use crate::core::identifiers::MetricFactId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Metric Keys
// ============================================================================

/// Closed set of raw metric keys.
///
/// # Invariants
/// - Variants are stable for serialization and stage-bound matching.
/// - Derived metric names are deliberately absent and cannot be added
///   without widening this enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Bank cash balance.
    Cash,
    /// Monthly net burn.
    Burn,
    /// Recognized revenue.
    Revenue,
    /// Monthly recurring revenue.
    Mrr,
    /// Annual recurring revenue.
    Arr,
    /// Headcount.
    Employees,
    /// Monthly logo churn percentage.
    Churn,
    /// Net revenue retention percentage.
    Nrr,
    /// Open pipeline value.
    PipelineValue,
    /// Open deal count.
    DealCount,
    /// Hiring plan target headcount.
    HeadcountTarget,
}

impl MetricKey {
    /// Returns a stable label for the metric key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Burn => "burn",
            Self::Revenue => "revenue",
            Self::Mrr => "mrr",
            Self::Arr => "arr",
            Self::Employees => "employees",
            Self::Churn => "churn",
            Self::Nrr => "nrr",
            Self::PipelineValue => "pipeline_value",
            Self::DealCount => "deal_count",
            Self::HeadcountTarget => "headcount_target",
        }
    }
}

// ============================================================================
// SECTION: Units and Sources
// ============================================================================

/// Measurement unit for a metric observation.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// United States dollars.
    Usd,
    /// Dimensionless count.
    Count,
    /// Percentage, 0-100 scale.
    Percent,
    /// Calendar months.
    Months,
}

/// Provenance source for a metric observation.
///
/// # Invariants
/// - Variants are stable for serialization and staleness weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// Founder-reported figure.
    Founder,
    /// Bank feed.
    Bank,
    /// Accounting system export.
    Accounting,
    /// CRM export.
    Crm,
    /// Manually entered by an operator.
    Manual,
}

// ============================================================================
// SECTION: Metric Fact
// ============================================================================

/// A single raw metric observation.
///
/// # Invariants
/// - `(company_id, key, as_of)` is unique within a raw graph.
/// - `value` is a finite number; the graph validator rejects non-finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricFact {
    /// Metric fact identifier.
    pub id: MetricFactId,
    /// Company the observation belongs to.
    pub company_id: CompanyId,
    /// Raw metric key.
    pub key: MetricKey,
    /// Observed value.
    pub value: f64,
    /// Measurement unit.
    pub unit: MetricUnit,
    /// Observation source.
    pub source: MetricSource,
    /// Observation timestamp.
    pub as_of: Timestamp,
}
