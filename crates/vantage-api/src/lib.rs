// crates/vantage-api/src/lib.rs
// ============================================================================
// Module: Vantage API
// Description: Consumer surface, reference event store, telemetry hooks.
// Purpose: Everything a thin host needs between the engine and its users.
// Dependencies: serde, thiserror, vantage-core
// ============================================================================

//! ## Overview
//! The API crate is the boundary layer: the `today_actions` consumer call
//! (compute, then drop terminally handled actions), the `record_event`
//! pass-through with payload policy enforcement, the in-memory reference
//! event store, and dependency-light telemetry hooks. No HTTP lives here;
//! hosts mount these functions behind whatever transport they run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;
pub mod telemetry;
pub mod today;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use store::MemoryEventStore;
pub use telemetry::ApiOperation;
pub use telemetry::ApiOutcome;
pub use telemetry::NoopTelemetry;
pub use telemetry::Telemetry;
pub use today::ApiError;
pub use today::TodayActionsRequest;
pub use today::TodayActionsResponse;
pub use today::record_event;
pub use today::today_actions;
