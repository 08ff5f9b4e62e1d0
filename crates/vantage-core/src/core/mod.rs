// crates/vantage-core/src/core/mod.rs
// ============================================================================
// Module: Vantage Core Model
// Description: Raw entity model, policy, stage tables, and shared primitives.
// Purpose: Define the raw layer every other layer depends on.
// Dependencies: submodules only
// ============================================================================

//! ## Overview
//! The core module is the raw layer: typed entities, identifiers, time,
//! stage tables, tunable assumptions, the forbidden-field policy, and
//! canonical hashing. It has no knowledge of derivation or ranking; upper
//! layers depend on it, never the reverse.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod assumptions;
pub mod entities;
pub mod events;
pub mod graph;
pub mod hashing;
pub mod identifiers;
pub mod metrics;
pub mod policy;
pub mod stage;
pub mod time;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use assumptions::Assumptions;
pub use assumptions::EngineSettings;
pub use assumptions::RankingWeights;
pub use entities::Company;
pub use entities::Deal;
pub use entities::DealStatus;
pub use entities::Firm;
pub use entities::Goal;
pub use entities::GoalStatus;
pub use entities::GoalType;
pub use entities::Meeting;
pub use entities::OrgKind;
pub use entities::Person;
pub use entities::Provenance;
pub use entities::RecurringRevenue;
pub use entities::Relationship;
pub use entities::RelationshipKind;
pub use entities::Round;
pub use entities::RoundStatus;
pub use events::ActionEvent;
pub use events::ActionEventKind;
pub use events::DismissalEvent;
pub use events::DismissalReason;
pub use events::IntroKind;
pub use events::IntroOutcome;
pub use events::IntroPathType;
pub use events::IntroStatus;
pub use graph::GraphError;
pub use graph::RawGraph;
pub use graph::RawIndex;
pub use graph::validate_event_log;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::canonical_digest;
pub use identifiers::ActionId;
pub use identifiers::CompanyId;
pub use identifiers::DealId;
pub use identifiers::DismissalId;
pub use identifiers::EventId;
pub use identifiers::FirmId;
pub use identifiers::GoalId;
pub use identifiers::MeetingId;
pub use identifiers::MetricFactId;
pub use identifiers::OutcomeId;
pub use identifiers::PersonId;
pub use identifiers::RelationshipId;
pub use identifiers::ResolutionId;
pub use identifiers::RoundId;
pub use metrics::MetricFact;
pub use metrics::MetricKey;
pub use metrics::MetricSource;
pub use metrics::MetricUnit;
pub use policy::FORBIDDEN_FIELDS;
pub use policy::ForbiddenHit;
pub use policy::PAYLOAD_BLACKLIST;
pub use policy::PolicyError;
pub use policy::scan_forbidden;
pub use policy::scan_keys;
pub use policy::validate_event_payload;
pub use policy::validate_no_forbidden_fields;
pub use stage::MetricBound;
pub use stage::Stage;
pub use stage::StageOverrides;
pub use stage::StageParams;
pub use stage::effective_bound;
pub use time::TimeError;
pub use time::Timestamp;
