// crates/vantage-api/src/store.rs
// ============================================================================
// Module: Vantage Memory Event Store
// Description: In-memory reference implementation of the event store.
// Purpose: Give hosts and tests an append-only store with full semantics.
// Dependencies: vantage-core
// ============================================================================

//! ## Overview
//! The memory store is the reference [`vantage_core::EventStore`]: reads
//! return a point-in-time snapshot, appends are atomic per event, duplicate
//! identifiers are rejected, and timestamps must not move backwards.
//! Production deployments swap in a persistent backend behind the same
//! trait; the engine never notices.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use vantage_core::EventStore;
use vantage_core::EventStoreError;
use vantage_core::core::ActionEvent;
use vantage_core::core::EventId;

// ============================================================================
// SECTION: Memory Store
// ============================================================================

/// Append-only in-memory event store.
///
/// # Invariants
/// - `events` is in append order; `ids` mirrors its identifiers.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    /// Events in append order.
    events: Vec<ActionEvent>,
    /// Identifiers seen, for duplicate rejection.
    ids: BTreeSet<EventId>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a validated event log.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError`] when the seed violates append-only rules.
    pub fn with_events(events: Vec<ActionEvent>) -> Result<Self, EventStoreError> {
        let mut store = Self::new();
        for event in events {
            store.append(event)?;
        }
        Ok(store)
    }

    /// Number of events currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for MemoryEventStore {
    fn events(&self) -> Vec<ActionEvent> {
        self.events.clone()
    }

    fn append(&mut self, event: ActionEvent) -> Result<(), EventStoreError> {
        if self.ids.contains(&event.id) {
            return Err(EventStoreError::DuplicateEventId(event.id));
        }
        if let Some(last) = self.events.last()
            && event.at < last.at
        {
            return Err(EventStoreError::OutOfOrder(event.id));
        }
        self.ids.insert(event.id.clone());
        self.events.push(event);
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
