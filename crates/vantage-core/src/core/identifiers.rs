// crates/vantage-core/src/core/identifiers.rs
// ============================================================================
// Module: Vantage Identifiers
// Description: Canonical opaque identifiers for Vantage entities and actions.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Vantage.
//! All references between entities are by identifier, never by pointer, so
//! the raw graph stays a value type and runs stay replayable. Identifiers
//! are opaque UTF-8 strings and serialize transparently on the wire.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Macro
// ============================================================================

/// Declares an opaque string identifier with the shared wire contract.
macro_rules! string_identifier {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// # Invariants
        /// - Opaque UTF-8 string; no normalization or validation is applied by this type.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Entity Identifiers
// ============================================================================

string_identifier! {
    /// Company identifier.
    CompanyId
}

string_identifier! {
    /// Person identifier.
    PersonId
}

string_identifier! {
    /// Firm identifier.
    FirmId
}

string_identifier! {
    /// Fundraising round identifier.
    RoundId
}

string_identifier! {
    /// Deal identifier.
    DealId
}

string_identifier! {
    /// Goal identifier.
    GoalId
}

string_identifier! {
    /// Relationship identifier.
    RelationshipId
}

string_identifier! {
    /// Metric fact identifier.
    MetricFactId
}

string_identifier! {
    /// Meeting note identifier.
    MeetingId
}

// ============================================================================
// SECTION: Event and Action Identifiers
// ============================================================================

string_identifier! {
    /// Action identifier.
    ///
    /// Action identifiers are content-derived (company, resolution, source)
    /// so the same candidate regenerated in a later run carries the same
    /// identifier and prior dismissals keep matching.
    ActionId
}

string_identifier! {
    /// Action event identifier.
    EventId
}

string_identifier! {
    /// Introduction outcome identifier.
    OutcomeId
}

string_identifier! {
    /// Dismissal event identifier.
    DismissalId
}

string_identifier! {
    /// Resolution template identifier.
    ResolutionId
}
