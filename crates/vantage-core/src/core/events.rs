// crates/vantage-core/src/core/events.rs
// ============================================================================
// Module: Vantage Event Records
// Description: Append-only action events, introduction outcomes, dismissals.
// Purpose: Capture observed history for calibration, friction, and obviousness.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Events are the append-only history the engine learns from. Action events
//! record what happened to previously surfaced actions; introduction
//! outcomes feed Bayesian prior calibration; dismissals feed the obviousness
//! penalty. Events are never edited, deleted, or reordered; the raw graph
//! validator rejects duplicate identifiers and out-of-order logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionId;
use crate::core::identifiers::CompanyId;
use crate::core::identifiers::DismissalId;
use crate::core::identifiers::EventId;
use crate::core::identifiers::GoalId;
use crate::core::identifiers::OutcomeId;
use crate::core::identifiers::PersonId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Action Events
// ============================================================================

/// Action event type.
///
/// # Invariants
/// - Variants are stable for serialization and history scans.
/// - `Executed` is an intermediate state; only `OutcomeRecorded` and
///   `Skipped` are terminal for consumer-side exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEventKind {
    /// Action was created/surfaced.
    Created,
    /// Action was assigned to an owner.
    Assigned,
    /// Work started.
    Started,
    /// Work completed.
    Completed,
    /// Outcome was observed and recorded.
    OutcomeRecorded,
    /// A follow-up action was created.
    FollowupCreated,
    /// A note was added.
    NoteAdded,
    /// Action was executed.
    Executed,
    /// Action was skipped.
    Skipped,
}

/// Append-only action event.
///
/// # Invariants
/// - `id` is unique across the log; duplicates fail the run.
/// - `payload` must not contain any forbidden derived key; the policy layer
///   enforces the blacklist before derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    /// Event identifier.
    pub id: EventId,
    /// Action the event refers to.
    pub action_id: ActionId,
    /// Event type.
    pub kind: ActionEventKind,
    /// Event timestamp.
    pub at: Timestamp,
    /// Actor that produced the event.
    pub actor: String,
    /// Opaque event payload.
    #[serde(default)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

impl ActionEvent {
    /// Returns the recorded outcome flag, when this is an outcome event.
    ///
    /// Outcome events carry `{"outcome": "success" | "failure"}` in the
    /// payload; anything else reads as no observation.
    #[must_use]
    pub fn outcome_success(&self) -> Option<bool> {
        if self.kind != ActionEventKind::OutcomeRecorded {
            return None;
        }
        match self.payload.get("outcome").and_then(serde_json::Value::as_str) {
            Some("success") => Some(true),
            Some("failure") => Some(false),
            _ => None,
        }
    }

    /// Returns the resolution type recorded in the payload, if present.
    #[must_use]
    pub fn resolution_type(&self) -> Option<&str> {
        self.payload.get("resolutionType").and_then(serde_json::Value::as_str)
    }
}

// ============================================================================
// SECTION: Introduction Outcomes
// ============================================================================

/// Introduction path type.
///
/// # Invariants
/// - Variants are stable for serialization and calibration grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPathType {
    /// One-hop introduction.
    Direct,
    /// Two-hop introduction through an intermediary.
    SecondOrder,
}

/// Introduction kind, aligned with the goal it serves.
///
/// # Invariants
/// - Variants are stable for serialization and calibration grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroKind {
    /// Investor introduction for a fundraise.
    Fundraise,
    /// Partnership introduction.
    Partnership,
    /// Candidate introduction for hiring.
    Hiring,
    /// Customer introduction.
    Customer,
}

/// Introduction outcome status.
///
/// # Invariants
/// - `Positive`, `Negative`, and `Ghosted` are terminal; the rest are
///   in-flight and excluded from calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroStatus {
    /// Introduction sent.
    Sent,
    /// Target replied.
    Replied,
    /// Meeting happened.
    Meeting,
    /// Terminal: worked out.
    Positive,
    /// Terminal: declined.
    Negative,
    /// Terminal: no response.
    Ghosted,
}

impl IntroStatus {
    /// Returns true for terminal statuses.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Positive | Self::Negative | Self::Ghosted)
    }

    /// Returns true for the terminal success status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Recorded outcome of a past introduction.
///
/// # Invariants
/// - Terminal records feed calibration; non-terminal records are retained
///   but never counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroOutcome {
    /// Outcome identifier.
    pub id: OutcomeId,
    /// Person who made the introduction.
    pub introducer_id: PersonId,
    /// Person who was introduced.
    pub target_id: PersonId,
    /// Path type used.
    pub path_type: IntroPathType,
    /// Introduction kind.
    pub kind: IntroKind,
    /// Outcome status.
    pub status: IntroStatus,
}

// ============================================================================
// SECTION: Dismissals
// ============================================================================

/// Reason a user dismissed an action.
///
/// # Invariants
/// - `NotNow` and `AlreadyDoing` are mild; `NotRelevant` and `Disagree` are
///   strong. Strength and half-life differ accordingly in the decide layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalReason {
    /// Right idea, wrong time.
    NotNow,
    /// Not relevant to this company.
    NotRelevant,
    /// Already underway.
    AlreadyDoing,
    /// User disagrees with the suggestion.
    Disagree,
}

impl DismissalReason {
    /// Returns true for the strong dismissal reasons.
    #[must_use]
    pub const fn is_strong(self) -> bool {
        matches!(self, Self::NotRelevant | Self::Disagree)
    }
}

/// Recorded dismissal of a surfaced action.
///
/// # Invariants
/// - `company_id`, `goal_id`, and `source_type` are denormalized copies of
///   the dismissed action's fields, kept so matching survives regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissalEvent {
    /// Dismissal identifier.
    pub id: DismissalId,
    /// Dismissed action identifier.
    pub action_id: ActionId,
    /// Dismissal reason.
    pub reason: DismissalReason,
    /// User who dismissed.
    pub user_id: String,
    /// When the dismissal happened.
    pub at: Timestamp,
    /// Denormalized company of the dismissed action.
    pub company_id: Option<CompanyId>,
    /// Denormalized goal of the dismissed action.
    pub goal_id: Option<GoalId>,
    /// Denormalized source type label of the dismissed action.
    pub source_type: Option<String>,
}
