// crates/vantage-api/src/telemetry.rs
// ============================================================================
// Module: Vantage API Telemetry
// Description: Observability hooks for compute requests and event writes.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: vantage-core
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for compute counters and
//! latency histograms. It is intentionally dependency-light so downstream
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Telemetry must never observe payload data; labels carry only stable
//! enumerated values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for compute histograms.
pub const COMPUTE_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// API operation classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ApiOperation {
    /// Today-actions request.
    TodayActions,
    /// Event append.
    RecordEvent,
}

impl ApiOperation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TodayActions => "today_actions",
            Self::RecordEvent => "record_event",
        }
    }
}

/// API operation outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ApiOutcome {
    /// Successful operation.
    Ok,
    /// Rejected by validation or policy.
    Rejected,
    /// Failed with an internal error.
    Error,
}

impl ApiOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Telemetry Sink
// ============================================================================

/// Telemetry sink for API operations.
///
/// Implementations must be cheap and must not observe payloads.
pub trait Telemetry: Send + Sync {
    /// Records one operation with its outcome and latency.
    fn record(&self, operation: ApiOperation, outcome: ApiOutcome, latency: Duration);
}

/// No-op telemetry sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record(&self, _operation: ApiOperation, _outcome: ApiOutcome, _latency: Duration) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ApiOperation;
    use super::ApiOutcome;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ApiOperation::TodayActions.as_str(), "today_actions");
        assert_eq!(ApiOutcome::Rejected.as_str(), "rejected");
    }
}
