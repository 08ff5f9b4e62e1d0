// crates/vantage-core/src/core/entities.rs
// ============================================================================
// Module: Vantage Raw Entities
// Description: Typed raw entity graph for companies, people, firms, and deals.
// Purpose: Represent facts exactly as observed, with no derived state.
// Dependencies: crate::core::{identifiers, stage, time}, serde
// ============================================================================

//! ## Overview
//! Raw entities are value types holding observed facts only. References
//! between entities are stable string identifiers resolved through lookup
//! maps, never pointers. No derived value (runway, health, scores) is
//! representable here; the policy layer additionally deep-scans the raw JSON
//! for forbidden keys before every run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CompanyId;
use crate::core::identifiers::DealId;
use crate::core::identifiers::FirmId;
use crate::core::identifiers::GoalId;
use crate::core::identifiers::MeetingId;
use crate::core::identifiers::PersonId;
use crate::core::identifiers::RelationshipId;
use crate::core::identifiers::RoundId;
use crate::core::stage::Stage;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Provenance
// ============================================================================

/// Provenance tag for a raw company record.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Synced from the platform CRM.
    Crm,
    /// Imported from a portfolio report.
    PortfolioReport,
    /// Entered manually by an operator.
    Manual,
}

// ============================================================================
// SECTION: Company
// ============================================================================

/// Recurring-revenue figure carried by a company.
///
/// A company reports exactly one of MRR or ARR; the exclusivity is
/// structural, not a validation rule.
///
/// # Invariants
/// - Serialized form is a single-key object, `{"mrr": n}` or `{"arr": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurringRevenue {
    /// Monthly recurring revenue in USD.
    Mrr(f64),
    /// Annual recurring revenue in USD.
    Arr(f64),
}

impl RecurringRevenue {
    /// Returns the figure annualized to ARR terms.
    #[must_use]
    pub const fn annualized(self) -> f64 {
        match self {
            Self::Mrr(value) => value * 12.0,
            Self::Arr(value) => value,
        }
    }
}

/// Raw company record.
///
/// # Invariants
/// - Scalar financial fields are snapshots as of `as_of`; the metric fact
///   time series takes precedence when it has a later observation.
/// - `recurring` carries MRR or ARR, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company identifier.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Funding stage.
    pub stage: Stage,
    /// Sector label.
    pub sector: String,
    /// Bank cash balance in USD.
    pub cash: Option<f64>,
    /// Monthly net burn in USD.
    pub burn: Option<f64>,
    /// Headcount.
    pub employees: Option<f64>,
    /// Recurring revenue (MRR or ARR, never both).
    pub recurring: Option<RecurringRevenue>,
    /// Recognized revenue in USD.
    pub revenue: Option<f64>,
    /// Whether the company is actively fundraising.
    pub raising: bool,
    /// Target size of the round being raised, USD.
    pub round_target: Option<f64>,
    /// Whether the company is in the portfolio.
    pub is_portfolio: bool,
    /// When the fundraise deck was last updated.
    pub deck_updated_at: Option<Timestamp>,
    /// Snapshot timestamp for the scalar fields.
    pub as_of: Timestamp,
    /// Record provenance.
    pub provenance: Provenance,
}

// ============================================================================
// SECTION: People and Firms
// ============================================================================

/// Kind of organization a person belongs to.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgKind {
    /// Operating company.
    Company,
    /// Investment firm.
    Firm,
    /// Outside the tracked graph.
    External,
    /// Individual investor.
    Investor,
}

/// Raw person record.
///
/// # Invariants
/// - `org_id` refers to a company or firm identifier depending on `org_kind`;
///   external people carry an opaque organization label instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Person identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Primary organization identifier.
    pub org_id: String,
    /// Organization kind.
    pub org_kind: OrgKind,
    /// Role or title.
    pub role: String,
    /// Free-form tags (seniority, domain, champion markers).
    pub tags: Vec<String>,
}

/// Raw firm record.
///
/// # Invariants
/// - `partners` and `portfolio` are identifier lists resolved via lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    /// Firm identifier.
    pub id: FirmId,
    /// Display name.
    pub name: String,
    /// Investment thesis summary.
    pub thesis: String,
    /// Stages the firm focuses on.
    pub stage_focus: Vec<Stage>,
    /// Sectors the firm focuses on.
    pub sector_focus: Vec<String>,
    /// Partner person identifiers.
    pub partners: Vec<PersonId>,
    /// Portfolio company identifiers.
    pub portfolio: Vec<CompanyId>,
}

// ============================================================================
// SECTION: Rounds and Deals
// ============================================================================

/// Fundraising round lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Round is open and collecting commitments.
    Open,
    /// Round is in final closing.
    Closing,
    /// Round has closed.
    Closed,
    /// Round was abandoned.
    Abandoned,
}

/// Raw fundraising round record.
///
/// # Invariants
/// - `company_id` must resolve in the raw graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Round identifier.
    pub id: RoundId,
    /// Company raising the round.
    pub company_id: CompanyId,
    /// Stage of the round.
    pub stage: Stage,
    /// Target raise in USD.
    pub target: f64,
    /// Committed amount so far, USD.
    pub raised: f64,
    /// Round status.
    pub status: RoundStatus,
    /// Lead investor firm, once one exists.
    pub lead_firm_id: Option<FirmId>,
    /// When the round opened.
    pub opened_at: Timestamp,
}

/// Deal pipeline status.
///
/// # Invariants
/// - Variants are stable for serialization; `Closed` and `Passed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    /// Initial outreach.
    Outreach,
    /// Meetings in progress.
    Meeting,
    /// Due diligence.
    Dd,
    /// Term sheet issued.
    Termsheet,
    /// Deal closed.
    Closed,
    /// Firm passed.
    Passed,
}

impl DealStatus {
    /// Returns true while the deal is still in play.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Outreach | Self::Meeting | Self::Dd | Self::Termsheet)
    }
}

/// Raw deal record connecting a round, a company, and a firm.
///
/// # Invariants
/// - `round_id`, `company_id`, and `firm_id` must all resolve in the raw graph.
/// - `close_probability` is 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Deal identifier.
    pub id: DealId,
    /// Round the deal belongs to.
    pub round_id: RoundId,
    /// Company being invested in.
    pub company_id: CompanyId,
    /// Investing firm.
    pub firm_id: FirmId,
    /// Deal amount in USD.
    pub amount: f64,
    /// Pipeline status.
    pub status: DealStatus,
    /// Close probability, 0-100.
    pub close_probability: f64,
    /// When the deal entered the pipeline.
    pub opened_at: Timestamp,
    /// Last recorded activity on the deal.
    pub last_activity_at: Timestamp,
    /// Expected close date, when one is agreed.
    pub expected_close_at: Option<Timestamp>,
}

// ============================================================================
// SECTION: Goals
// ============================================================================

/// Goal type.
///
/// # Invariants
/// - Variants are stable for serialization, weighting, and category mapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Raise a round.
    Fundraise,
    /// Grow revenue.
    Revenue,
    /// Ship product milestones.
    Product,
    /// Hire against plan.
    Hiring,
    /// Land a partnership.
    Partnership,
    /// Operational milestone.
    Operational,
    /// Improve retention.
    Retention,
    /// Improve efficiency.
    Efficiency,
    /// Grow the customer base.
    CustomerGrowth,
    /// Close a specific deal.
    DealClose,
    /// Complete the open round.
    RoundCompletion,
    /// Activate a passive investor.
    InvestorActivation,
    /// Cultivate an internal champion.
    ChampionCultivation,
    /// Build a specific relationship.
    RelationshipBuild,
    /// Reach a specific introduction target.
    IntroTarget,
}

impl GoalType {
    /// Returns a stable label for the goal type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fundraise => "fundraise",
            Self::Revenue => "revenue",
            Self::Product => "product",
            Self::Hiring => "hiring",
            Self::Partnership => "partnership",
            Self::Operational => "operational",
            Self::Retention => "retention",
            Self::Efficiency => "efficiency",
            Self::CustomerGrowth => "customer_growth",
            Self::DealClose => "deal_close",
            Self::RoundCompletion => "round_completion",
            Self::InvestorActivation => "investor_activation",
            Self::ChampionCultivation => "champion_cultivation",
            Self::RelationshipBuild => "relationship_build",
            Self::IntroTarget => "intro_target",
        }
    }

    /// Returns true for types an introduction can directly serve.
    #[must_use]
    pub const fn is_intro_relevant(self) -> bool {
        matches!(
            self,
            Self::Fundraise
                | Self::Partnership
                | Self::Hiring
                | Self::InvestorActivation
                | Self::IntroTarget
        )
    }
}

/// Goal lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization; only `Active` and `Blocked` goals
///   drive candidate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// In progress.
    Active,
    /// Achieved.
    Completed,
    /// Blocked on something external.
    Blocked,
    /// Abandoned.
    Abandoned,
}

/// Raw goal record.
///
/// # Invariants
/// - `company_id` must resolve in the raw graph.
/// - `target` and `current` share the goal type's natural unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Goal identifier.
    pub id: GoalId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Goal type.
    pub goal_type: GoalType,
    /// Target value.
    pub target: f64,
    /// Current value.
    pub current: f64,
    /// Due date.
    pub due: Timestamp,
    /// Lifecycle status.
    pub status: GoalStatus,
    /// Optional user-set weight override (multiplier, 0-3).
    pub weight: Option<f64>,
}

// ============================================================================
// SECTION: Relationships
// ============================================================================

/// Relationship type between two people.
///
/// # Invariants
/// - Variants are stable for serialization and trust weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Board relationship.
    Board,
    /// Professional acquaintance.
    Professional,
    /// Shared alma mater.
    Alumni,
    /// Co-investor.
    CoInvestor,
    /// Mentor/mentee.
    Mentor,
    /// Personal friend.
    Friend,
    /// Former colleague.
    FormerColleague,
}

/// Raw relationship edge between two people.
///
/// # Invariants
/// - Edges are undirected; the adjacency built by the predict layer inserts
///   both directions.
/// - `strength` is 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Relationship identifier.
    pub id: RelationshipId,
    /// First endpoint.
    pub from_person_id: PersonId,
    /// Second endpoint.
    pub to_person_id: PersonId,
    /// Relationship kind.
    pub kind: RelationshipKind,
    /// Strength, 0-100.
    pub strength: f64,
    /// Last touch timestamp.
    pub last_touch_at: Timestamp,
    /// Introductions asked through this edge in the last 90 days.
    pub intros_asked_90d: u32,
    /// Introductions received through this edge, lifetime.
    pub intros_received: u32,
}

// ============================================================================
// SECTION: Meetings
// ============================================================================

/// Raw meeting note.
///
/// # Invariants
/// - `participants` are person identifiers resolved via lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Meeting identifier.
    pub id: MeetingId,
    /// Meeting title.
    pub title: String,
    /// Meeting date.
    pub date: Timestamp,
    /// Participant person identifiers.
    pub participants: Vec<PersonId>,
    /// Free-form summary.
    pub summary: String,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use super::RecurringRevenue;

    #[test]
    fn recurring_revenue_serializes_single_key() {
        let mrr = serde_json::to_value(RecurringRevenue::Mrr(10_000.0)).unwrap();
        assert_eq!(mrr, serde_json::json!({"mrr": 10_000.0}));
        let arr = serde_json::to_value(RecurringRevenue::Arr(120_000.0)).unwrap();
        assert_eq!(arr, serde_json::json!({"arr": 120_000.0}));
    }

    #[test]
    fn annualized_converts_mrr() {
        assert!((RecurringRevenue::Mrr(1_000.0).annualized() - 12_000.0).abs() < f64::EPSILON);
        assert!((RecurringRevenue::Arr(9_000.0).annualized() - 9_000.0).abs() < f64::EPSILON);
    }
}
