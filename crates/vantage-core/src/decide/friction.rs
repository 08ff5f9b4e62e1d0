// crates/vantage-core/src/decide/friction.rs
// ============================================================================
// Module: Vantage Execution Friction
// Description: Per-resolution friction scores from recorded outcome history.
// Purpose: Penalize action shapes that historically fail, drag, or get dropped.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Friction summarizes how a resolution type has actually behaved:
//! 0.5 x failure rate + 0.3 x normalized average start-to-complete delay
//! + 0.2 x abandon rate. The statistic requires at least three recorded
//! outcomes; thinner history falls back to a low default so new resolution
//! types are not punished for being new.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ActionEvent;
use crate::core::ActionEventKind;
use crate::core::ActionId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default friction when history is too thin.
const DEFAULT_FRICTION: f64 = 0.1;

/// Delay normalization horizon, days.
const DELAY_HORIZON_DAYS: f64 = 30.0;

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Accumulated per-resolution outcome statistics.
#[derive(Debug, Clone, Copy, Default)]
struct ResolutionStats {
    /// Recorded outcomes.
    outcomes: u32,
    /// Failures among them.
    failures: u32,
    /// Completed start-to-complete delays, summed in days.
    delay_sum_days: f64,
    /// Number of measured delays.
    delay_count: u32,
    /// Created events.
    created: u32,
    /// Skipped events.
    skipped: u32,
}

/// Builds per-resolution friction scores from the event log.
///
/// The returned map is keyed by resolution type label; resolutions with
/// fewer than `min_samples` recorded outcomes are absent and take the
/// default.
#[must_use]
pub fn friction_by_resolution(
    events: &[ActionEvent],
    min_samples: u32,
) -> BTreeMap<String, f64> {
    let mut stats: BTreeMap<String, ResolutionStats> = BTreeMap::new();
    let mut started_at: BTreeMap<(&ActionId, &str), crate::core::Timestamp> = BTreeMap::new();

    for event in events {
        let Some(resolution) = event.resolution_type() else {
            continue;
        };
        let entry = stats.entry(resolution.to_string()).or_default();
        match event.kind {
            ActionEventKind::Created => entry.created += 1,
            ActionEventKind::Skipped => entry.skipped += 1,
            ActionEventKind::Started => {
                started_at.insert((&event.action_id, resolution), event.at);
            }
            ActionEventKind::Completed => {
                if let Some(start) = started_at.get(&(&event.action_id, resolution)) {
                    entry.delay_sum_days += event.at.days_since(*start).max(0.0);
                    entry.delay_count += 1;
                }
            }
            ActionEventKind::OutcomeRecorded => {
                if let Some(success) = event.outcome_success() {
                    entry.outcomes += 1;
                    if !success {
                        entry.failures += 1;
                    }
                }
            }
            ActionEventKind::Assigned
            | ActionEventKind::FollowupCreated
            | ActionEventKind::NoteAdded
            | ActionEventKind::Executed => {}
        }
    }

    stats
        .into_iter()
        .filter(|(_, stat)| stat.outcomes >= min_samples)
        .map(|(resolution, stat)| (resolution, score(stat)))
        .collect()
}

/// Friction score for one resolution's statistics.
fn score(stat: ResolutionStats) -> f64 {
    let failure_rate = f64::from(stat.failures) / f64::from(stat.outcomes.max(1));
    let average_delay = if stat.delay_count == 0 {
        0.0
    } else {
        stat.delay_sum_days / f64::from(stat.delay_count)
    };
    let normalized_delay = (average_delay / DELAY_HORIZON_DAYS).clamp(0.0, 1.0);
    let abandon_rate = f64::from(stat.skipped) / f64::from(stat.created.max(1));
    (0.5 * failure_rate + 0.3 * normalized_delay + 0.2 * abandon_rate.min(1.0)).clamp(0.0, 1.0)
}

/// Friction for one resolution, defaulting when history is thin.
#[must_use]
pub fn friction_for(map: &BTreeMap<String, f64>, resolution: &str) -> f64 {
    map.get(resolution).copied().unwrap_or(DEFAULT_FRICTION)
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

    use super::friction_by_resolution;
    use super::friction_for;

    /// Event fixture tagged with a resolution type.
    fn event(id: &str, kind: ActionEventKind, resolution: &str, day: i64) -> ActionEvent {
        let mut payload = BTreeMap::new();
        payload
            .insert("resolutionType".to_string(), serde_json::Value::String(resolution.to_string()));
        if kind == ActionEventKind::OutcomeRecorded {
            payload.insert("outcome".to_string(), serde_json::Value::String("failure".to_string()));
        }
        ActionEvent {
            id: id.into(),
            action_id: "a1".into(),
            kind,
            at: Timestamp::from_unix_millis(0).plus_days(day),
            actor: "ops".into(),
            payload,
        }
    }

    #[test]
    fn thin_history_takes_the_default() {
        let events = vec![event("e1", ActionEventKind::OutcomeRecorded, "res-x", 0)];
        let map = friction_by_resolution(&events, 3);
        assert!((friction_for(&map, "res-x") - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn all_failures_score_half_from_failure_term() {
        let events = vec![
            event("e1", ActionEventKind::OutcomeRecorded, "res-x", 0),
            event("e2", ActionEventKind::OutcomeRecorded, "res-x", 1),
            event("e3", ActionEventKind::OutcomeRecorded, "res-x", 2),
        ];
        let map = friction_by_resolution(&events, 3);
        assert!((friction_for(&map, "res-x") - 0.5).abs() < 1e-9);
    }
}
