// crates/vantage-core/src/decide/mod.rs
// ============================================================================
// Module: Vantage Decide Layer
// Description: Impact attachment, gating, suppression, and the single ranking.
// Purpose: Turn candidates into one totally ordered, auditable action list.
// Dependencies: crate::core, crate::derive, crate::predict, submodules
// ============================================================================

//! ## Overview
//! The decide layer owns everything between a candidate and its final rank:
//! the seven-dimension impact model, urgency gates and proactivity targets,
//! the obviousness penalty, friction and pattern statistics from outcome
//! history, and the rank-score computation that induces the only ordering
//! surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod friction;
pub mod gates;
pub mod impact;
pub mod obviousness;
pub mod patterns;
pub mod rank;
pub mod weights;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use friction::friction_by_resolution;
pub use friction::friction_for;
pub use gates::GateLevel;
pub use gates::ProactivityReport;
pub use gates::action_gate;
pub use gates::evaluate_company_gate;
pub use gates::populate_unblocks;
pub use gates::validate_proactivity;
pub use impact::ImpactContext;
pub use impact::ImpactModel;
pub use impact::attach_impact;
pub use impact::goal_damage;
pub use obviousness::compute_obviousness;
pub use patterns::pattern_lift_by_resolution;
pub use rank::RankComponents;
pub use rank::RankedAction;
pub use rank::ScoreInputs;
pub use rank::assign_ranks;
pub use rank::score_action;
