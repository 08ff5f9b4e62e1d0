// crates/vantage-core/src/core/policy.rs
// ============================================================================
// Module: Vantage Raw Policy
// Description: Forbidden-derived-field set, payload blacklist, deep JSON scan.
// Purpose: Keep derived state out of raw storage, fail-closed.
// Dependencies: crate::core::events, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Derived values must never be stored. The policy layer enforces this with
//! a deep scan over the raw graph's JSON rendering: any occurrence of a
//! forbidden derived key, at any depth, fails the run before derivation.
//! Action-event payloads are additionally checked against an enumerated
//! blacklist at both the compute and record boundaries.
//!
//! Raw input is treated as untrusted on load; the scan reports every hit
//! with its full JSON path so callers can locate the offending writer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::events::ActionEvent;

// ============================================================================
// SECTION: Forbidden Sets
// ============================================================================

/// Forbidden derived field names, the union of every source enumeration.
///
/// Any of these appearing as an object key anywhere in raw input fails the
/// run. The set is case-sensitive; wire keys are camelCase.
pub const FORBIDDEN_FIELDS: &[&str] = &[
    "runway",
    "health",
    "healthScore",
    "priority",
    "priorityScore",
    "impact",
    "impactScore",
    "urgency",
    "risk",
    "riskScore",
    "score",
    "tier",
    "band",
    "rankScore",
    "rank",
    "rankComponents",
    "obviousnessPenalty",
    "expectedNetImpact",
    "rippleScore",
    "executionProbability",
    "probabilityOfSuccess",
    "frictionPenalty",
    "calibratedProbability",
    "trajectory",
    "velocity",
    "onTrack",
    "projectedCompletion",
    "requiredVelocity",
    "likelihood",
    "timeToBreach",
    "expectedFutureCost",
    "irreversibility",
    "anomalies",
    "staleness",
    "stalenessPenalty",
    "confidence",
];

/// Known derived container keys stripped by the export firewall.
pub const DERIVED_CONTAINERS: &[&str] = &[
    "derived",
    "computed",
    "view",
    "output",
    "priorities",
    "issues",
    "preissues",
    "actions",
    "opportunities",
    "todayActions",
];

/// Forbidden action-event payload keys.
pub const PAYLOAD_BLACKLIST: &[&str] = &[
    "rankScore",
    "expectedNetImpact",
    "impactScore",
    "rippleScore",
    "priorityScore",
    "healthScore",
    "executionProbability",
    "frictionPenalty",
    "calibratedProbability",
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy violations found in raw input.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A forbidden derived key was found in raw input.
    #[error("forbidden derived field {key} at {path}")]
    ForbiddenField {
        /// JSON path of the hit.
        path: String,
        /// Offending key.
        key: String,
    },
    /// An action-event payload carries a blacklisted key.
    #[error("event {event} payload carries forbidden key {key}")]
    ForbiddenPayloadKey {
        /// Event identifier.
        event: String,
        /// Offending key.
        key: String,
    },
}

// ============================================================================
// SECTION: Forbidden Hit
// ============================================================================

/// A single forbidden-key occurrence in scanned JSON.
///
/// # Invariants
/// - `path` is a dotted JSON path with `[n]` array segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenHit {
    /// JSON path of the occurrence.
    pub path: String,
    /// Offending key.
    pub key: String,
}

// ============================================================================
// SECTION: Deep Scan
// ============================================================================

/// Scans a JSON value for forbidden derived keys, reporting every hit.
#[must_use]
pub fn scan_forbidden(value: &Value) -> Vec<ForbiddenHit> {
    scan_keys(value, FORBIDDEN_FIELDS)
}

/// Scans a JSON value for any of the given keys, reporting every hit.
#[must_use]
pub fn scan_keys(value: &Value, keys: &[&str]) -> Vec<ForbiddenHit> {
    let mut hits = Vec::new();
    scan_value(value, "$", keys, &mut hits);
    hits
}

/// Recursive scan worker.
fn scan_value(value: &Value, path: &str, keys: &[&str], hits: &mut Vec<ForbiddenHit>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                if keys.contains(&key.as_str()) {
                    hits.push(ForbiddenHit { path: child_path.clone(), key: key.clone() });
                }
                scan_value(child, &child_path, keys, &mut *hits);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                scan_value(child, &format!("{path}[{idx}]"), keys, &mut *hits);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Validates a serialized raw graph against the forbidden-field policy.
///
/// # Errors
///
/// Returns [`PolicyError::ForbiddenField`] for the first hit; the scan is
/// fail-closed and the run must not proceed.
pub fn validate_no_forbidden_fields(raw: &Value) -> Result<(), PolicyError> {
    let hits = scan_forbidden(raw);
    match hits.into_iter().next() {
        Some(hit) => Err(PolicyError::ForbiddenField { path: hit.path, key: hit.key }),
        None => Ok(()),
    }
}

/// Validates an action-event payload against the enumerated blacklist.
///
/// # Errors
///
/// Returns [`PolicyError::ForbiddenPayloadKey`] on the first blacklisted key.
pub fn validate_event_payload(event: &ActionEvent) -> Result<(), PolicyError> {
    for key in event.payload.keys() {
        if PAYLOAD_BLACKLIST.contains(&key.as_str()) {
            return Err(PolicyError::ForbiddenPayloadKey {
                event: event.id.to_string(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use serde_json::json;

    use super::scan_forbidden;
    use super::validate_no_forbidden_fields;

    #[test]
    fn scan_reports_nested_hits_with_paths() {
        let value = json!({
            "companies": [{"id": "c1", "runway": 4.2}],
            "meta": {"inner": {"rankScore": 10}}
        });
        let hits = scan_forbidden(&value);
        let paths: Vec<&str> = hits.iter().map(|hit| hit.path.as_str()).collect();
        assert!(paths.contains(&"$.companies[0].runway"));
        assert!(paths.contains(&"$.meta.inner.rankScore"));
    }

    #[test]
    fn clean_raw_input_passes() {
        let value = json!({"companies": [{"id": "c1", "cash": 100.0}]});
        assert!(validate_no_forbidden_fields(&value).is_ok());
    }

    #[test]
    fn forbidden_key_fails_closed() {
        let value = json!({"companies": [{"id": "c1", "health": "GREEN"}]});
        assert!(validate_no_forbidden_fields(&value).is_err());
    }
}
