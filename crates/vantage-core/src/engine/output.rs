// crates/vantage-core/src/engine/output.rs
// ============================================================================
// Module: Vantage Engine Output
// Description: The derived result bundle emitted by one compute call.
// Purpose: Carry derived payload plus metadata; echo no raw input back.
// Dependencies: crate::core, crate::derive, crate::decide, crate::predict, serde
// ============================================================================

//! ## Overview
//! The output bundle holds per-company derived blocks, the globally ranked
//! action list, the pre-issue list, and run metadata. Everything here is
//! derived at runtime and forbidden to persist; the export firewall strips
//! it from anything storage-bound. No raw input field is echoed back into
//! the derived payload.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::CompanyId;
use crate::core::HashDigest;
use crate::core::Timestamp;
use crate::decide::GateLevel;
use crate::decide::ProactivityReport;
use crate::decide::RankedAction;
use crate::derive::AnomalyReport;
use crate::derive::Health;
use crate::derive::HealthBand;
use crate::derive::Runway;
use crate::derive::Trajectory;
use crate::predict::Issue;
use crate::predict::PreIssue;
use crate::predict::RippleEffect;

// ============================================================================
// SECTION: Company Block
// ============================================================================

/// Derived state for one company.
///
/// # Invariants
/// - Runtime-only; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDerived {
    /// Runway derivation.
    pub runway: Runway,
    /// Health derivation.
    pub health: Health,
    /// Goal trajectories in goal order.
    pub trajectories: Vec<Trajectory>,
    /// Stage-relative anomaly report.
    pub anomalies: AnomalyReport,
    /// Confirmed issues.
    pub issues: Vec<Issue>,
    /// Aggregated ripple effect.
    pub ripple: RippleEffect,
    /// Gate state for the company.
    pub gate: Option<GateLevel>,
}

/// One company entry in the output bundle.
///
/// # Invariants
/// - `id` and `name` are the only raw fields repeated, for addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOutput {
    /// Company identifier.
    pub id: CompanyId,
    /// Company display name.
    pub name: String,
    /// Derived block.
    pub derived: CompanyDerived,
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Per-company health band counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCounts {
    /// GREEN companies.
    pub green: u32,
    /// YELLOW companies.
    pub yellow: u32,
    /// RED companies.
    pub red: u32,
}

impl HealthCounts {
    /// Tallies one band.
    pub const fn tally(&mut self, band: HealthBand) {
        match band {
            HealthBand::Green => self.green += 1,
            HealthBand::Yellow => self.yellow += 1,
            HealthBand::Red => self.red += 1,
        }
    }
}

/// Run metadata.
///
/// # Invariants
/// - `duration_ms` is stamped at the API boundary; the pure engine emits 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMeta {
    /// The `now` the run was computed at.
    pub computed_at: Timestamp,
    /// Wall-clock duration; 0 from the pure engine.
    pub duration_ms: u64,
    /// Canonical digest of the raw input graph.
    pub input_hash: HashDigest,
    /// Health band counts across portfolio companies.
    pub health_counts: HealthCounts,
    /// Layer names executed, in order.
    pub layers_executed: Vec<String>,
    /// Proactivity validation outcome.
    pub proactivity: ProactivityReport,
    /// Non-fatal errors (currently always empty; fatal errors abort).
    pub errors: Vec<String>,
    /// Non-fatal warnings collected during the run.
    pub warnings: Vec<String>,
}

// ============================================================================
// SECTION: Output Bundle
// ============================================================================

/// The result bundle of one compute call.
///
/// # Invariants
/// - `actions` is sorted by rank; `companies` by identifier; `preissues`
///   by company then kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOutput {
    /// Per-company derived blocks, identifier-ascending.
    pub companies: Vec<CompanyOutput>,
    /// Globally ranked actions.
    pub actions: Vec<RankedAction>,
    /// Pre-issue list across the portfolio.
    pub preissues: Vec<PreIssue>,
    /// Run metadata.
    pub meta: EngineMeta,
}
