// crates/vantage-core/src/derive/metrics.rs
// ============================================================================
// Module: Vantage Metric Resolver
// Description: Resolution of metric values from time series and scalar fields.
// Purpose: Give every derivation one provenance-tracked source of truth.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The resolver answers "what is the current value of metric K for company
//! C". The observation time series wins when it has any entry (latest
//! `asOf` first), then the company's scalar snapshot field, then nothing.
//! The branch that supplied the value is recorded so downstream
//! explanations can cite provenance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Company;
use crate::core::MetricKey;
use crate::core::RawIndex;
use crate::core::RecurringRevenue;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Which branch supplied a resolved metric value.
///
/// # Invariants
/// - Variants are stable for serialization and explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricProvenance {
    /// Latest observation from the metric-fact time series.
    TimeSeries,
    /// Scalar snapshot field on the company record.
    Scalar,
    /// No source had a value.
    Missing,
}

/// A resolved metric value with provenance.
///
/// # Invariants
/// - `value` is `Some` exactly when `provenance` is not `Missing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetric {
    /// Metric key.
    pub key: MetricKey,
    /// Resolved value, if any source had one.
    pub value: Option<f64>,
    /// Branch that supplied the value.
    pub provenance: MetricProvenance,
    /// Observation timestamp of the supplying source.
    pub as_of: Option<Timestamp>,
}

impl ResolvedMetric {
    /// Returns the age of the resolved value in days at `now`.
    ///
    /// `None` when nothing was resolved.
    #[must_use]
    pub fn age_days(&self, now: Timestamp) -> Option<f64> {
        self.as_of.map(|as_of| now.days_since(as_of).max(0.0))
    }
}

/// Resolves a metric for a company: time series first, scalar fallback, none.
#[must_use]
pub fn resolve_metric(index: &RawIndex<'_>, company: &Company, key: MetricKey) -> ResolvedMetric {
    if let Some(fact) = index.latest_metric(&company.id, key) {
        return ResolvedMetric {
            key,
            value: Some(fact.value),
            provenance: MetricProvenance::TimeSeries,
            as_of: Some(fact.as_of),
        };
    }
    if let Some(value) = scalar_fallback(company, key) {
        return ResolvedMetric {
            key,
            value: Some(value),
            provenance: MetricProvenance::Scalar,
            as_of: Some(company.as_of),
        };
    }
    ResolvedMetric { key, value: None, provenance: MetricProvenance::Missing, as_of: None }
}

/// Scalar snapshot fallback per metric key.
fn scalar_fallback(company: &Company, key: MetricKey) -> Option<f64> {
    match key {
        MetricKey::Cash => company.cash,
        MetricKey::Burn => company.burn,
        MetricKey::Employees => company.employees,
        MetricKey::Revenue => company.revenue,
        MetricKey::Mrr => match company.recurring {
            Some(RecurringRevenue::Mrr(value)) => Some(value),
            _ => None,
        },
        MetricKey::Arr => match company.recurring {
            Some(RecurringRevenue::Arr(value)) => Some(value),
            _ => None,
        },
        MetricKey::Churn
        | MetricKey::Nrr
        | MetricKey::PipelineValue
        | MetricKey::DealCount
        | MetricKey::HeadcountTarget => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Company;
    use crate::core::MetricFact;
    use crate::core::MetricKey;
    use crate::core::MetricSource;
    use crate::core::MetricUnit;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;

    use super::MetricProvenance;
    use super::resolve_metric;

    /// Minimal company with a scalar burn.
    fn company() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: Some(100_000.0),
            burn: Some(20_000.0),
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
    fn latest_observation_beats_scalar() {
        let company = company();
        let graph = RawGraph {
            companies: vec![company.clone()],
            metric_facts: vec![
                MetricFact {
                    id: "m1".into(),
                    company_id: "c1".into(),
                    key: MetricKey::Burn,
                    value: 25_000.0,
                    unit: MetricUnit::Usd,
                    source: MetricSource::Bank,
                    as_of: Timestamp::from_unix_millis(1_000),
                },
                MetricFact {
                    id: "m2".into(),
                    company_id: "c1".into(),
                    key: MetricKey::Burn,
                    value: 30_000.0,
                    unit: MetricUnit::Usd,
                    source: MetricSource::Bank,
                    as_of: Timestamp::from_unix_millis(2_000),
                },
            ],
            ..RawGraph::default()
        };
        let index = RawIndex::build(&graph);
        let resolved = resolve_metric(&index, &company, MetricKey::Burn);
        assert_eq!(resolved.value, Some(30_000.0));
        assert_eq!(resolved.provenance, MetricProvenance::TimeSeries);
    }

    #[test]
    fn scalar_fallback_applies_without_series() {
        let company = company();
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let resolved = resolve_metric(&index, &company, MetricKey::Cash);
        assert_eq!(resolved.value, Some(100_000.0));
        assert_eq!(resolved.provenance, MetricProvenance::Scalar);
    }

    #[test]
    fn missing_everywhere_resolves_to_none() {
        let company = company();
        let graph = RawGraph { companies: vec![company.clone()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let resolved = resolve_metric(&index, &company, MetricKey::Churn);
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.provenance, MetricProvenance::Missing);
    }
}
