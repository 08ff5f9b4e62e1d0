// crates/vantage-core/src/derive/anomaly.rs
// ============================================================================
// Module: Vantage Anomaly Detection
// Description: Stage-relative bound breaches and stage-mismatch detection.
// Purpose: Flag metrics far outside what the company's stage predicts.
// Dependencies: crate::core, crate::derive::metrics, serde
// ============================================================================

//! ## Overview
//! Anomalies compare resolved metrics against the canonical stage bounds.
//! Severity is a function of how far outside the bound the actual value
//! sits. Two or more same-direction breaches at MEDIUM or above raise a
//! stage-mismatch anomaly suggesting the adjacent stage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use std::collections::BTreeMap;

use crate::core::Company;
use crate::core::MetricBound;
use crate::core::MetricKey;
use crate::core::RawIndex;
use crate::core::Stage;
use crate::core::StageOverrides;
use crate::core::effective_bound;
use crate::derive::metrics::resolve_metric;

// ============================================================================
// SECTION: Severity and Direction
// ============================================================================

/// Anomaly severity.
///
/// # Invariants
/// - Ordered from most to least severe for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalySeverity {
    /// Far outside the bound.
    Critical,
    /// Well outside the bound.
    High,
    /// Clearly outside the bound.
    Medium,
    /// Marginally outside the bound.
    Low,
}

/// Breach direction against the stage bound.
///
/// # Invariants
/// - Variants are stable for serialization and mismatch counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachDirection {
    /// Actual value below the stage minimum.
    BelowMin,
    /// Actual value above the stage maximum.
    AboveMax,
}

// ============================================================================
// SECTION: Anomalies
// ============================================================================

/// A single stage-relative bound breach.
///
/// # Invariants
/// - `ratio` is actual/min for below-min breaches and actual/max for
///   above-max breaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    /// Breached metric.
    pub metric: MetricKey,
    /// Breach direction.
    pub direction: BreachDirection,
    /// Severity.
    pub severity: AnomalySeverity,
    /// Actual-to-bound ratio.
    pub ratio: f64,
    /// Human-readable evidence.
    pub evidence: String,
}

/// Stage-mismatch suggestion raised by repeated same-direction breaches.
///
/// # Invariants
/// - `breaches` holds the metrics that contributed, at MEDIUM or above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMismatch {
    /// Direction the metrics point.
    pub direction: BreachDirection,
    /// Adjacent stage the metrics suggest.
    pub suggested_stage: Stage,
    /// Contributing metrics.
    pub breaches: Vec<MetricKey>,
}

/// Anomaly detection output for one company.
///
/// # Invariants
/// - `anomalies` is ordered by severity, then metric key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    /// Bound breaches.
    pub anomalies: Vec<Anomaly>,
    /// Stage-mismatch suggestion, when raised.
    pub stage_mismatch: Option<StageMismatch>,
}

// ============================================================================
// SECTION: Detection
// ============================================================================

/// Metrics checked against stage bounds, in stable order.
const BOUNDED_METRICS: &[MetricKey] =
    &[MetricKey::Burn, MetricKey::Employees, MetricKey::Revenue, MetricKey::Churn, MetricKey::Nrr];

/// Detects stage-relative anomalies for a company.
#[must_use]
pub fn detect_anomalies(
    index: &RawIndex<'_>,
    company: &Company,
    overrides: &BTreeMap<Stage, StageOverrides>,
) -> AnomalyReport {
    let mut anomalies = Vec::new();

    for key in BOUNDED_METRICS {
        let Some(bound) = effective_bound(company.stage, *key, overrides) else {
            continue;
        };
        let resolved = resolve_metric(index, company, *key);
        let Some(actual) = resolved.value else {
            continue;
        };
        if let Some(anomaly) = classify(*key, actual, bound) {
            anomalies.push(anomaly);
        }
    }

    anomalies.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.metric.cmp(&b.metric)));
    let stage_mismatch = detect_stage_mismatch(company.stage, &anomalies);
    AnomalyReport { anomalies, stage_mismatch }
}

/// Classifies one metric against its bound.
fn classify(metric: MetricKey, actual: f64, bound: MetricBound) -> Option<Anomaly> {
    if let Some(min) = bound.min
        && min > 0.0
        && actual < min
    {
        let ratio = actual / min;
        let severity = below_min_severity(ratio);
        return Some(Anomaly {
            metric,
            direction: BreachDirection::BelowMin,
            severity,
            ratio,
            evidence: format!("{} {actual:.1} below stage minimum {min:.1}", metric.as_str()),
        });
    }
    if let Some(max) = bound.max
        && max > 0.0
        && actual > max
    {
        let ratio = actual / max;
        let severity = above_max_severity(ratio);
        return Some(Anomaly {
            metric,
            direction: BreachDirection::AboveMax,
            severity,
            ratio,
            evidence: format!("{} {actual:.1} above stage maximum {max:.1}", metric.as_str()),
        });
    }
    None
}

/// Severity for a below-minimum ratio.
const fn below_min_severity(ratio: f64) -> AnomalySeverity {
    if ratio < 0.25 {
        AnomalySeverity::Critical
    } else if ratio < 0.5 {
        AnomalySeverity::High
    } else if ratio < 0.75 {
        AnomalySeverity::Medium
    } else {
        AnomalySeverity::Low
    }
}

/// Severity for an above-maximum ratio.
const fn above_max_severity(ratio: f64) -> AnomalySeverity {
    if ratio > 3.0 {
        AnomalySeverity::Critical
    } else if ratio > 2.0 {
        AnomalySeverity::High
    } else if ratio > 1.5 {
        AnomalySeverity::Medium
    } else {
        AnomalySeverity::Low
    }
}

/// Raises a stage mismatch when two same-direction MEDIUM+ breaches exist.
fn detect_stage_mismatch(stage: Stage, anomalies: &[Anomaly]) -> Option<StageMismatch> {
    let medium_plus = |a: &&Anomaly| a.severity <= AnomalySeverity::Medium;
    let below: Vec<MetricKey> = anomalies
        .iter()
        .filter(medium_plus)
        .filter(|a| a.direction == BreachDirection::BelowMin)
        .map(|a| a.metric)
        .collect();
    let above: Vec<MetricKey> = anomalies
        .iter()
        .filter(medium_plus)
        .filter(|a| a.direction == BreachDirection::AboveMax)
        .map(|a| a.metric)
        .collect();

    if below.len() >= 2
        && let Some(previous) = stage.previous()
    {
        return Some(StageMismatch {
            direction: BreachDirection::BelowMin,
            suggested_stage: previous,
            breaches: below,
        });
    }
    if above.len() >= 2
        && let Some(next) = stage.next()
    {
        return Some(StageMismatch {
            direction: BreachDirection::AboveMax,
            suggested_stage: next,
            breaches: above,
        });
    }
    None
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Company;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;

    use super::AnomalySeverity;
    use super::BreachDirection;
    use super::detect_anomalies;

    /// Series B company with scalars far below stage bounds.
    fn undersized_series_b() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::SeriesB,
            sector: "saas".into(),
            cash: Some(1_000_000.0),
            burn: Some(50_000.0),
            employees: Some(6.0),
            recurring: None,
            revenue: Some(200_000.0),
            raising: false,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    #[test]
    fn deep_below_min_is_critical() {
        let company = undersized_series_b();
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let report = detect_anomalies(&index, &company, &std::collections::BTreeMap::new());
        let burn = report
            .anomalies
            .iter()
            .find(|a| a.metric == crate::core::MetricKey::Burn)
            .unwrap();
        assert_eq!(burn.direction, BreachDirection::BelowMin);
        assert_eq!(burn.severity, AnomalySeverity::Critical);
    }

    #[test]
    fn repeated_below_min_suggests_previous_stage() {
        let company = undersized_series_b();
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let report = detect_anomalies(&index, &company, &std::collections::BTreeMap::new());
        let mismatch = report.stage_mismatch.unwrap();
        assert_eq!(mismatch.suggested_stage, Stage::SeriesA);
        assert!(mismatch.breaches.len() >= 2);
    }
}
