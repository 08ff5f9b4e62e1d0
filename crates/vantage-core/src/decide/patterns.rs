// crates/vantage-core/src/decide/patterns.rs
// ============================================================================
// Module: Vantage Pattern Lift
// Description: Per-resolution execution-probability lift from outcome history.
// Purpose: Let repeated success (or failure) nudge execution odds, never stored.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Recorded outcomes are grouped by resolution type; each group's success
//! rate becomes a small multiplicative lift applied to execution
//! probability, and only once the group has enough samples. Lifts are
//! derived at compute time from the raw event log and are never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ActionEvent;

// ============================================================================
// SECTION: Lift
// ============================================================================

/// Lift slope around the neutral success rate of 0.5.
const LIFT_SLOPE: f64 = 0.4;

/// Builds pattern-lift multipliers per resolution type label.
///
/// A resolution with success rate `r` over at least `min_samples` recorded
/// outcomes receives the multiplier `1 + (r - 0.5) * 0.4`, bounded to
/// [0.8, 1.2]; thinner groups are absent and imply a neutral 1.0.
#[must_use]
pub fn pattern_lift_by_resolution(
    events: &[ActionEvent],
    min_samples: u32,
) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for event in events {
        let Some(success) = event.outcome_success() else {
            continue;
        };
        let Some(resolution) = event.resolution_type() else {
            continue;
        };
        let entry = counts.entry(resolution.to_string()).or_insert((0, 0));
        entry.0 += 1;
        if success {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, (total, _))| *total >= min_samples)
        .map(|(resolution, (total, successes))| {
            let rate = f64::from(successes) / f64::from(total);
            let lift = (1.0 + (rate - 0.5) * LIFT_SLOPE).clamp(0.8, 1.2);
            (resolution, lift)
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use std::collections::BTreeMap;

    use crate::core::ActionEvent;
    use crate::core::ActionEventKind;
    use crate::core::Timestamp;

    use super::pattern_lift_by_resolution;

    /// Outcome event fixture.
    fn outcome(id: &str, resolution: &str, success: bool) -> ActionEvent {
        let mut payload = BTreeMap::new();
        payload.insert(
            "outcome".to_string(),
            serde_json::Value::String(if success { "success" } else { "failure" }.to_string()),
        );
        payload
            .insert("resolutionType".to_string(), serde_json::Value::String(resolution.to_string()));
        ActionEvent {
            id: id.into(),
            action_id: "a1".into(),
            kind: ActionEventKind::OutcomeRecorded,
            at: Timestamp::from_unix_millis(0),
            actor: "ops".into(),
            payload,
        }
    }

    #[test]
    fn thin_groups_get_no_lift_entry() {
        let events: Vec<_> = (0..4).map(|i| outcome(&format!("e{i}"), "res-x", true)).collect();
        let lifts = pattern_lift_by_resolution(&events, 5);
        assert!(lifts.get("res-x").is_none());
    }

    #[test]
    fn strong_history_lifts_and_weak_history_drags() {
        let mut events: Vec<_> =
            (0..6).map(|i| outcome(&format!("g{i}"), "res-good", true)).collect();
        events.extend((0..6).map(|i| outcome(&format!("b{i}"), "res-bad", false)));
        let lifts = pattern_lift_by_resolution(&events, 5);
        assert!((lifts.get("res-good").copied().unwrap() - 1.2).abs() < 1e-9);
        assert!((lifts.get("res-bad").copied().unwrap() - 0.8).abs() < 1e-9);
    }
}
