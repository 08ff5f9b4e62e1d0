// crates/vantage-core/src/predict/mod.rs
// ============================================================================
// Module: Vantage Predict Layer
// Description: Gap and opportunity detection over raw plus derived state.
// Purpose: Emit issues, forecasts, introduction paths, and action candidates.
// Dependencies: crate::core, crate::derive, submodules
// ============================================================================

//! ## Overview
//! The predict layer turns derived state into the inputs of decision-making:
//! confirmed issues, forecast pre-issues, ripple estimates, introduction
//! opportunities with trust risk and calibrated priors, and the typed
//! candidate pool. It depends on the raw and derive layers only; ranking
//! belongs to the decide layer above.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod calibration;
pub mod candidates;
pub mod intros;
pub mod issues;
pub mod preissues;
pub mod ripple;
pub mod trust;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use calibration::IntroPriors;
pub use calibration::Prior;
pub use candidates::ActionCandidate;
pub use candidates::ActionCategory;
pub use candidates::ActionSource;
pub use candidates::ResolutionTemplate;
pub use candidates::SourceType;
pub use candidates::candidates_from_goals;
pub use candidates::candidates_from_intros;
pub use candidates::candidates_from_issues;
pub use candidates::candidates_from_preissues;
pub use candidates::category_resolution;
pub use candidates::dedupe_candidates;
pub use candidates::goal_categories;
pub use candidates::issue_resolution;
pub use candidates::resolution;
pub use intros::IntroGeneration;
pub use intros::IntroOpportunity;
pub use intros::IntroTiming;
pub use intros::generate_intro_opportunities;
pub use intros::intro_kind_for_goal;
pub use intros::suppress_noisy_second_order;
pub use issues::Issue;
pub use issues::IssueKind;
pub use issues::detect_issues;
pub use preissues::PreIssue;
pub use preissues::PreIssueKind;
pub use preissues::detect_preissues;
pub use ripple::RippleEffect;
pub use ripple::aggregate_ripple;
pub use ripple::consequences;
pub use ripple::ripple_score;
pub use trust::IntroducerRecord;
pub use trust::TrustBand;
pub use trust::TrustComponents;
pub use trust::TrustInput;
pub use trust::TrustRisk;
pub use trust::compute_trust_risk;
