// crates/vantage-core/src/interfaces/mod.rs
// ============================================================================
// Module: Vantage Interfaces
// Description: Backend-agnostic interfaces for the external event store.
// Purpose: Define the contract surfaces the engine consumes read-only.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The event store is an external collaborator: the engine reads a
//! point-in-time snapshot per compute call and never writes. Writes happen
//! only at the API boundary, one event at a time, and must preserve the
//! append-only discipline (no edits, no deletes, no reordering, no
//! duplicate identifiers). Implementations must fail closed on invalid
//! appends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ActionEvent;
use crate::core::EventId;

// ============================================================================
// SECTION: Event Store
// ============================================================================

/// Event store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// An event with the same identifier already exists.
    #[error("duplicate event id {0}")]
    DuplicateEventId(EventId),
    /// Appending would break timestamp append order.
    #[error("event {0} is older than the log head")]
    OutOfOrder(EventId),
    /// Store backend reported an error.
    #[error("event store error: {0}")]
    Store(String),
}

/// Append-only action event store.
pub trait EventStore {
    /// Returns the events visible at the time of the call, in append order.
    fn events(&self) -> Vec<ActionEvent>;

    /// Appends one event atomically.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError`] when the append would violate the
    /// append-only discipline or the backend fails.
    fn append(&mut self, event: ActionEvent) -> Result<(), EventStoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), EventStoreError> {
        Ok(())
    }
}
