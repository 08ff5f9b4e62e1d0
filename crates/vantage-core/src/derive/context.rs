// crates/vantage-core/src/derive/context.rs
// ============================================================================
// Module: Vantage Context Maps
// Description: Per-action trust-risk and deadline lookups built once per run.
// Purpose: Give the decide layer O(1) access to history- and deadline-context.
// Dependencies: crate::core, crate::derive::health
// ============================================================================

//! ## Overview
//! Two per-action lookups are built once per engine run. The trust-risk map
//! scores each action from the bad-outcome ratio of prior actions of the
//! same resolution type plus a company-health component. The deadline map
//! records the tightest applicable deadline (pre-issue escalation or goal
//! due date) in days from `now`.
//!
//! To keep layering strictly downward, this module defines its own seed
//! shape; the engine projects predicted candidates into seeds before
//! calling in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ActionEvent;
use crate::core::ActionId;
use crate::core::CompanyId;
use crate::core::ResolutionId;
use crate::core::Timestamp;
use crate::derive::health::HealthBand;

// ============================================================================
// SECTION: Context Seed
// ============================================================================

/// Projection of one candidate action into the fields context maps need.
///
/// # Invariants
/// - `deadlines` holds absolute timestamps; conversion to days happens here.
#[derive(Debug, Clone)]
pub struct ActionContextSeed {
    /// Action identifier.
    pub action_id: ActionId,
    /// Resolution template the action applies.
    pub resolution_id: ResolutionId,
    /// Owning company, when the action is company-scoped.
    pub company_id: Option<CompanyId>,
    /// Applicable absolute deadlines (goal due dates, escalation dates).
    pub deadlines: Vec<Timestamp>,
}

// ============================================================================
// SECTION: Trust-Risk Map
// ============================================================================

/// Builds the per-action trust-risk map.
///
/// Composition: 0.6 x bad-outcome ratio of prior actions of the same
/// resolution type (requires at least two observations), plus 0.2 when the
/// owning company is RED.
#[must_use]
pub fn trust_risk_by_action(
    seeds: &[ActionContextSeed],
    events: &[ActionEvent],
    health_bands: &BTreeMap<CompanyId, HealthBand>,
) -> BTreeMap<ActionId, f64> {
    let outcome_stats = outcome_stats_by_resolution(events);
    let mut map = BTreeMap::new();
    for seed in seeds {
        let mut risk = 0.0;
        if let Some((total, bad)) = outcome_stats.get(seed.resolution_id.as_str())
            && *total >= 2
        {
            risk += 0.6 * (f64::from(*bad) / f64::from(*total));
        }
        if let Some(company_id) = &seed.company_id
            && health_bands.get(company_id) == Some(&HealthBand::Red)
        {
            risk += 0.2;
        }
        map.insert(seed.action_id.clone(), risk.clamp(0.0, 1.0));
    }
    map
}

/// Tallies `(total, bad)` outcome counts per resolution type label.
fn outcome_stats_by_resolution(events: &[ActionEvent]) -> BTreeMap<String, (u32, u32)> {
    let mut stats: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for event in events {
        let Some(success) = event.outcome_success() else {
            continue;
        };
        let Some(resolution) = event.resolution_type() else {
            continue;
        };
        let entry = stats.entry(resolution.to_string()).or_insert((0, 0));
        entry.0 += 1;
        if !success {
            entry.1 += 1;
        }
    }
    stats
}

// ============================================================================
// SECTION: Deadline Map
// ============================================================================

/// Builds the per-action deadline map in days from `now`.
///
/// The tightest applicable deadline wins; actions with no deadline are
/// absent from the map.
#[must_use]
pub fn deadlines_by_action(
    seeds: &[ActionContextSeed],
    now: Timestamp,
) -> BTreeMap<ActionId, f64> {
    let mut map = BTreeMap::new();
    for seed in seeds {
        let tightest = seed
            .deadlines
            .iter()
            .map(|deadline| now.days_until(*deadline))
            .fold(None::<f64>, |acc, days| match acc {
                Some(current) if current <= days => Some(current),
                _ => Some(days),
            });
        if let Some(days) = tightest {
            map.insert(seed.action_id.clone(), days);
        }
    }
    map
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
    use crate::derive::health::HealthBand;

    use super::ActionContextSeed;
    use super::deadlines_by_action;
    use super::trust_risk_by_action;

    /// Outcome event for the given resolution with the given result.
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
            action_id: "a-old".into(),
            kind: ActionEventKind::OutcomeRecorded,
            at: Timestamp::from_unix_millis(0),
            actor: "ops".into(),
            payload,
        }
    }

    #[test]
    fn bad_history_and_red_company_compose() {
        let seeds = vec![ActionContextSeed {
            action_id: "a1".into(),
            resolution_id: "res-runway".into(),
            company_id: Some("c1".into()),
            deadlines: Vec::new(),
        }];
        let events = vec![
            outcome("e1", "res-runway", false),
            outcome("e2", "res-runway", false),
            outcome("e3", "res-runway", true),
        ];
        let mut bands = BTreeMap::new();
        bands.insert("c1".into(), HealthBand::Red);
        let map = trust_risk_by_action(&seeds, &events, &bands);
        let risk = map.get(&"a1".into()).copied().unwrap();
        assert!((risk - (0.6 * (2.0 / 3.0) + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn single_observation_contributes_nothing() {
        let seeds = vec![ActionContextSeed {
            action_id: "a1".into(),
            resolution_id: "res-runway".into(),
            company_id: None,
            deadlines: Vec::new(),
        }];
        let events = vec![outcome("e1", "res-runway", false)];
        let map = trust_risk_by_action(&seeds, &events, &BTreeMap::new());
        assert!(map.get(&"a1".into()).copied().unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn tightest_deadline_wins() {
        let now = Timestamp::from_unix_millis(0);
        let seeds = vec![ActionContextSeed {
            action_id: "a1".into(),
            resolution_id: "res".into(),
            company_id: None,
            deadlines: vec![now.plus_days(20), now.plus_days(5)],
        }];
        let map = deadlines_by_action(&seeds, now);
        assert!((map.get(&"a1".into()).copied().unwrap() - 5.0).abs() < 1e-9);
    }
}
