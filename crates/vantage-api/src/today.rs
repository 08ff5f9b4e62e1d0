// crates/vantage-api/src/today.rs
// ============================================================================
// Module: Vantage Today Actions
// Description: The consumer surface over the engine and the event store.
// Purpose: Serve the ranked list minus terminally handled actions.
// Dependencies: vantage-core, serde
// ============================================================================

//! ## Overview
//! `today_actions` runs one compute call and filters out actions the event
//! store marks as terminally handled: an `outcome_recorded` or `skipped`
//! event excludes an action; `executed` alone never does, since execution
//! is an intermediate state. `record_event` validates the payload blacklist
//! and passes the event through to the store untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use vantage_core::ComputeOptions;
use vantage_core::Engine;
use vantage_core::EngineError;
use vantage_core::EventStore;
use vantage_core::EventStoreError;
use vantage_core::RankedAction;
use vantage_core::RawGraph;
use vantage_core::Timestamp;
use vantage_core::core::ActionEvent;
use vantage_core::core::ActionEventKind;
use vantage_core::core::ActionId;
use vantage_core::core::DismissalEvent;
use vantage_core::core::PolicyError;
use vantage_core::core::validate_event_payload;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Consumer API errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine compute failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Event store failed.
    #[error(transparent)]
    Store(#[from] EventStoreError),
    /// Event payload carries a blacklisted key.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

// ============================================================================
// SECTION: Request / Response
// ============================================================================

/// Request for the day's ranked actions.
///
/// # Invariants
/// - `now` is caller-supplied; the API never reads wall-clock time for
///   scoring (only for the duration stamp).
#[derive(Debug, Clone, Default)]
pub struct TodayActionsRequest {
    /// Timestamp the ranking is computed at.
    pub now: Timestamp,
    /// Dismissal history.
    pub dismissals: Vec<DismissalEvent>,
    /// Explicitly focused entity identifiers.
    pub focus_entities: Vec<String>,
}

/// Response with the filtered ranked list.
///
/// # Invariants
/// - `actions` preserves engine rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayActionsResponse {
    /// Ranked actions minus terminally handled ones.
    pub actions: Vec<RankedAction>,
    /// Count of returned actions per source type label.
    pub by_source_counts: BTreeMap<String, u32>,
    /// Number of actions excluded by terminal events.
    pub total_excluded: u32,
    /// Timestamp the ranking was computed at.
    pub timestamp: Timestamp,
}

// ============================================================================
// SECTION: Today Actions
// ============================================================================

/// Computes the ranked list and drops terminally handled actions.
///
/// # Errors
///
/// Returns [`ApiError`] when compute fails; store reads are infallible.
pub fn today_actions(
    engine: &Engine,
    raw: &RawGraph,
    store: &dyn EventStore,
    request: &TodayActionsRequest,
) -> Result<TodayActionsResponse, ApiError> {
    let started = Instant::now();
    let events = store.events();
    let excluded = excluded_action_ids(&events);

    let options = ComputeOptions {
        events,
        dismissals: request.dismissals.clone(),
        focus_entities: request.focus_entities.clone(),
    };
    let mut output = engine.compute(raw, request.now, &options)?;
    output.meta.duration_ms =
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut total_excluded = 0u32;
    let mut actions = Vec::with_capacity(output.actions.len());
    let mut by_source_counts: BTreeMap<String, u32> = BTreeMap::new();
    for action in output.actions {
        if excluded.contains(&action.id) {
            total_excluded += 1;
            continue;
        }
        if let Some(source) = action.sources.first() {
            *by_source_counts
                .entry(source.source_type().as_str().to_string())
                .or_insert(0) += 1;
        }
        actions.push(action);
    }

    Ok(TodayActionsResponse {
        actions,
        by_source_counts,
        total_excluded,
        timestamp: request.now,
    })
}

/// Terminal action identifiers: outcome recorded or skipped.
///
/// `executed` is an intermediate state and never excludes on its own.
fn excluded_action_ids(events: &[ActionEvent]) -> BTreeSet<ActionId> {
    events
        .iter()
        .filter(|event| {
            matches!(event.kind, ActionEventKind::OutcomeRecorded | ActionEventKind::Skipped)
        })
        .map(|event| event.action_id.clone())
        .collect()
}

// ============================================================================
// SECTION: Record Event
// ============================================================================

/// Validates and appends one event; otherwise an opaque pass-through.
///
/// # Errors
///
/// Returns [`ApiError`] when the payload carries a blacklisted key or the
/// store rejects the append.
pub fn record_event(store: &mut dyn EventStore, event: ActionEvent) -> Result<(), ApiError> {
    validate_event_payload(&event)?;
    store.append(event)?;
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
