// crates/vantage-core/src/lib.rs
// ============================================================================
// Module: Vantage Core
// Description: Deterministic portfolio decision engine core.
// Purpose: Raw model, derive/predict/decide layers, engine, export firewall.
// Dependencies: serde, serde_json, serde_jcs, sha2, smallvec, thiserror, time
// ============================================================================

//! ## Overview
//! Vantage turns a typed graph of companies, people, firms, rounds, deals,
//! goals, relationships, and metric facts, plus an append-only action-event
//! log, into one ranked list of concrete next actions. The pipeline is four
//! strictly layered stages of pure functions:
//!
//! | Layer | Responsibility |
//! |---|---|
//! | [`core`] | typed raw graph, policy, stage tables, assumptions |
//! | [`derive`] | runway, trajectory, health, anomalies, context maps |
//! | [`predict`] | issues, pre-issues, ripple, trust, intros, candidates |
//! | [`decide`] | impact models, gates, obviousness, the single rank score |
//!
//! [`engine::Engine::compute`] sequences the layers; given the same `(raw,
//! now, events)` it produces byte-identical output. Derived values are
//! runtime-only: the forbidden-field policy rejects them on the way in and
//! the export firewall strips them on the way out.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod decide;
pub mod derive;
pub mod engine;
pub mod interfaces;
pub mod predict;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::Assumptions;
pub use crate::core::EngineSettings;
pub use crate::core::RankingWeights;
pub use crate::core::RawGraph;
pub use crate::core::Timestamp;
pub use crate::decide::RankedAction;
pub use crate::engine::ComputeOptions;
pub use crate::engine::Engine;
pub use crate::engine::EngineError;
pub use crate::engine::export::export_computed;
pub use crate::engine::export::export_raw;
pub use crate::engine::output::EngineOutput;
pub use crate::interfaces::EventStore;
pub use crate::interfaces::EventStoreError;
