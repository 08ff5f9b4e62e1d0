// crates/vantage-core/src/predict/candidates.rs
// ============================================================================
// Module: Vantage Action Candidates
// Description: Candidate generation from issues, pre-issues, goals, and intros.
// Purpose: Produce the typed action pool the decide layer scores and ranks.
// Dependencies: crate::core, crate::predict::{issues, preissues, intros}, serde, smallvec
// ============================================================================

//! ## Overview
//! Candidates come from four generators: one resolution per issue, one
//! candidate per pre-issue preventative key, exactly three category
//! candidates per open goal, and one candidate per surfaced introduction
//! opportunity. Sources are tagged variants, so the forbidden-field
//! discipline is a compile-time property: candidate types are distinct from
//! raw types and never reach storage.
//!
//! Action identifiers are content-derived from `(company, resolution,
//! source)` so regenerated candidates keep their identity across runs and
//! prior dismissals keep matching.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use smallvec::smallvec;

use crate::core::ActionId;
use crate::core::CompanyId;
use crate::core::DealId;
use crate::core::GoalId;
use crate::core::GoalType;
use crate::core::PersonId;
use crate::core::RawIndex;
use crate::core::ResolutionId;
use crate::core::Timestamp;
use crate::predict::intros::IntroOpportunity;
use crate::predict::intros::IntroTiming;
use crate::predict::issues::Issue;
use crate::predict::issues::IssueKind;
use crate::predict::preissues::PreIssue;
use crate::predict::preissues::PreIssueKind;

// ============================================================================
// SECTION: Source Types
// ============================================================================

/// Source type label carried by every action source.
///
/// # Invariants
/// - Variants are stable for serialization, gating, and proactivity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Reactive: confirmed problem.
    #[serde(rename = "ISSUE")]
    Issue,
    /// Preventative: forecast problem.
    #[serde(rename = "PREISSUE")]
    Preissue,
    /// Proactive: goal progress.
    #[serde(rename = "GOAL")]
    Goal,
    /// Proactive: introduction path.
    #[serde(rename = "INTRODUCTION")]
    Introduction,
    /// Proactive: generic opportunity.
    #[serde(rename = "OPPORTUNITY")]
    Opportunity,
}

impl SourceType {
    /// Returns a stable label for the source type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "ISSUE",
            Self::Preissue => "PREISSUE",
            Self::Goal => "GOAL",
            Self::Introduction => "INTRODUCTION",
            Self::Opportunity => "OPPORTUNITY",
        }
    }

    /// Proactive value creation rather than reaction to a problem.
    #[must_use]
    pub const fn is_opportunity_sourced(self) -> bool {
        matches!(self, Self::Goal | Self::Introduction | Self::Opportunity)
    }
}

/// Tagged action source.
///
/// # Invariants
/// - Each variant is flat, carrying the exact fields the impact model reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "camelCase")]
pub enum ActionSource {
    /// Issue-sourced.
    #[serde(rename = "ISSUE", rename_all = "camelCase")]
    Issue {
        /// Issue kind.
        kind: IssueKind,
        /// Owning company.
        company_id: CompanyId,
        /// Severity, 0-3.
        severity: u8,
        /// Scoped goal, when the issue has one.
        goal_id: Option<GoalId>,
        /// Scoped deal, when the issue has one.
        deal_id: Option<DealId>,
    },
    /// Pre-issue-sourced.
    #[serde(rename = "PREISSUE", rename_all = "camelCase")]
    Preissue {
        /// Pre-issue kind.
        kind: PreIssueKind,
        /// Owning company.
        company_id: CompanyId,
        /// Likelihood, 0-1.
        likelihood: f64,
        /// Severity, 0-3.
        severity: u8,
        /// Days to forecast breach.
        time_to_breach_days: f64,
        /// Irreversibility, 0-1.
        irreversibility: f64,
        /// Cost-of-delay multiplier.
        cost_of_delay_multiplier: f64,
        /// Escalation is inside the imminence window.
        is_imminent: bool,
        /// Expected future cost in impact points.
        expected_future_cost: f64,
        /// Absolute escalation date.
        escalation_at: Timestamp,
        /// Scoped goal, when the forecast has one.
        goal_id: Option<GoalId>,
    },
    /// Goal-sourced, one of the three structural categories.
    #[serde(rename = "GOAL", rename_all = "camelCase")]
    Goal {
        /// Goal served.
        goal_id: GoalId,
        /// Owning company.
        company_id: CompanyId,
        /// Goal type.
        goal_type: GoalType,
        /// Structural category.
        category: ActionCategory,
    },
    /// Introduction-sourced.
    #[serde(rename = "INTRODUCTION", rename_all = "camelCase")]
    Introduction {
        /// Owning company.
        company_id: CompanyId,
        /// Goal served.
        goal_id: GoalId,
        /// Introduction target.
        target_id: PersonId,
        /// First person asked.
        introducer_id: PersonId,
        /// Timing state.
        timing: IntroTiming,
        /// Trust-risk score, 0-100.
        trust_score: f64,
        /// Calibrated success probability.
        calibrated_probability: f64,
        /// Optionality gain, 0-1.
        optionality_gain: f64,
    },
    /// Generic opportunity.
    #[serde(rename = "OPPORTUNITY", rename_all = "camelCase")]
    Opportunity {
        /// Owning company.
        company_id: CompanyId,
        /// Opportunity label.
        label: String,
    },
}

impl ActionSource {
    /// Returns the source type label.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Issue { .. } => SourceType::Issue,
            Self::Preissue { .. } => SourceType::Preissue,
            Self::Goal { .. } => SourceType::Goal,
            Self::Introduction { .. } => SourceType::Introduction,
            Self::Opportunity { .. } => SourceType::Opportunity,
        }
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> &CompanyId {
        match self {
            Self::Issue { company_id, .. }
            | Self::Preissue { company_id, .. }
            | Self::Goal { company_id, .. }
            | Self::Introduction { company_id, .. }
            | Self::Opportunity { company_id, .. } => company_id,
        }
    }

    /// Returns the goal this source serves, when it serves one.
    #[must_use]
    pub const fn goal_id(&self) -> Option<&GoalId> {
        match self {
            Self::Issue { goal_id, .. } | Self::Preissue { goal_id, .. } => goal_id.as_ref(),
            Self::Goal { goal_id, .. } | Self::Introduction { goal_id, .. } => Some(goal_id),
            Self::Opportunity { .. } => None,
        }
    }
}

// ============================================================================
// SECTION: Categories
// ============================================================================

/// Structural action category for goal-sourced candidates.
///
/// # Invariants
/// - Variants are stable for serialization and resolution mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Growth push.
    Growth,
    /// Pipeline building.
    Pipeline,
    /// Data hygiene.
    Data,
    /// Fundraise execution.
    Fundraise,
    /// Introduction paths.
    Intros,
    /// Product milestone.
    Product,
    /// Hiring sprint.
    Hiring,
    /// Partnership outreach.
    Partnership,
    /// Operational review.
    Operations,
    /// Efficiency pass.
    Efficiency,
    /// Retention save.
    Retention,
    /// Customer push.
    Customer,
    /// Deal advancement.
    Deal,
    /// Round momentum.
    Round,
    /// Investor activation.
    Investor,
    /// Champion cultivation.
    Champion,
    /// Relationship building.
    Relationship,
}

impl ActionCategory {
    /// Returns a stable label for the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Pipeline => "pipeline",
            Self::Data => "data",
            Self::Fundraise => "fundraise",
            Self::Intros => "intros",
            Self::Product => "product",
            Self::Hiring => "hiring",
            Self::Partnership => "partnership",
            Self::Operations => "operations",
            Self::Efficiency => "efficiency",
            Self::Retention => "retention",
            Self::Customer => "customer",
            Self::Deal => "deal",
            Self::Round => "round",
            Self::Investor => "investor",
            Self::Champion => "champion",
            Self::Relationship => "relationship",
        }
    }
}

/// The structural three categories for each goal type.
#[must_use]
pub const fn goal_categories(goal_type: GoalType) -> [ActionCategory; 3] {
    match goal_type {
        GoalType::Fundraise => {
            [ActionCategory::Fundraise, ActionCategory::Pipeline, ActionCategory::Intros]
        }
        GoalType::Revenue => {
            [ActionCategory::Growth, ActionCategory::Pipeline, ActionCategory::Data]
        }
        GoalType::Product => {
            [ActionCategory::Product, ActionCategory::Hiring, ActionCategory::Data]
        }
        GoalType::Hiring => {
            [ActionCategory::Hiring, ActionCategory::Intros, ActionCategory::Operations]
        }
        GoalType::Partnership => {
            [ActionCategory::Partnership, ActionCategory::Intros, ActionCategory::Pipeline]
        }
        GoalType::Operational => {
            [ActionCategory::Operations, ActionCategory::Data, ActionCategory::Efficiency]
        }
        GoalType::Retention => {
            [ActionCategory::Retention, ActionCategory::Data, ActionCategory::Customer]
        }
        GoalType::Efficiency => {
            [ActionCategory::Efficiency, ActionCategory::Operations, ActionCategory::Data]
        }
        GoalType::CustomerGrowth => {
            [ActionCategory::Customer, ActionCategory::Growth, ActionCategory::Pipeline]
        }
        GoalType::DealClose => {
            [ActionCategory::Deal, ActionCategory::Pipeline, ActionCategory::Intros]
        }
        GoalType::RoundCompletion => {
            [ActionCategory::Round, ActionCategory::Fundraise, ActionCategory::Investor]
        }
        GoalType::InvestorActivation => {
            [ActionCategory::Investor, ActionCategory::Intros, ActionCategory::Relationship]
        }
        GoalType::ChampionCultivation => {
            [ActionCategory::Champion, ActionCategory::Relationship, ActionCategory::Intros]
        }
        GoalType::RelationshipBuild => {
            [ActionCategory::Relationship, ActionCategory::Intros, ActionCategory::Data]
        }
        GoalType::IntroTarget => {
            [ActionCategory::Intros, ActionCategory::Relationship, ActionCategory::Pipeline]
        }
    }
}

// ============================================================================
// SECTION: Resolution Templates
// ============================================================================

/// A static resolution template.
///
/// # Invariants
/// - `effectiveness` is in [0.2, 1.0]; `effort_days` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionTemplate {
    /// Stable resolution identifier.
    pub id: &'static str,
    /// Title pattern.
    pub title: &'static str,
    /// Step list.
    pub steps: &'static [&'static str],
    /// Estimated effort in days.
    pub effort_days: f64,
    /// Base probability the resolution works when executed.
    pub effectiveness: f64,
}

/// The static resolution registry.
static RESOLUTIONS: &[ResolutionTemplate] = &[
    ResolutionTemplate {
        id: "res-bridge-plan",
        title: "Stand up a bridge and runway extension plan",
        steps: &[
            "model three burn scenarios",
            "line up insider bridge appetite",
            "set a go/no-go date with the founders",
        ],
        effort_days: 5.0,
        effectiveness: 0.75,
    },
    ResolutionTemplate {
        id: "res-burn-review",
        title: "Run a burn review with the founders",
        steps: &["pull the last two burn observations", "walk the variance with finance"],
        effort_days: 3.0,
        effectiveness: 0.7,
    },
    ResolutionTemplate {
        id: "res-spend-audit",
        title: "Audit the spend behind the burn spike",
        steps: &["diff vendor spend month over month", "flag one-off versus structural"],
        effort_days: 2.0,
        effectiveness: 0.7,
    },
    ResolutionTemplate {
        id: "res-pipeline-build",
        title: "Build the investor pipeline from scratch",
        steps: &[
            "assemble a 30-firm target list",
            "rank by stage and sector fit",
            "open the first ten conversations",
        ],
        effort_days: 7.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-pipeline-expand",
        title: "Widen the pipeline to cover the round",
        steps: &["add ten firms to the target list", "revive two cold threads"],
        effort_days: 5.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-deal-nudge",
        title: "Nudge the stalled deal forward",
        steps: &["send the partner a concrete update", "propose a date for next step"],
        effort_days: 1.0,
        effectiveness: 0.65,
    },
    ResolutionTemplate {
        id: "res-goal-replan",
        title: "Rebaseline the missed goal",
        steps: &["review the miss with the owner", "set a revised target and date"],
        effort_days: 2.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-goal-unblock",
        title: "Unblock the off-track goal",
        steps: &["name the top blocker", "assign an owner and a date"],
        effort_days: 3.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-goal-review",
        title: "Review the stalled goal",
        steps: &["confirm the goal still matters", "restart or abandon explicitly"],
        effort_days: 1.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-data-refresh",
        title: "Refresh the stale metrics",
        steps: &["request current figures from the company"],
        effort_days: 1.0,
        effectiveness: 0.85,
    },
    ResolutionTemplate {
        id: "res-data-collect",
        title: "Collect the missing metrics",
        steps: &["ask for cash and burn with a reporting cadence"],
        effort_days: 1.0,
        effectiveness: 0.85,
    },
    ResolutionTemplate {
        id: "res-goal-setting",
        title: "Set goals with the founders",
        steps: &["run a goal-setting session", "record targets and due dates"],
        effort_days: 2.0,
        effectiveness: 0.8,
    },
    ResolutionTemplate {
        id: "res-round-momentum",
        title: "Restart round momentum",
        steps: &["ship an investor update", "stack the next two weeks with meetings"],
        effort_days: 4.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-deck-refresh",
        title: "Refresh the fundraise deck",
        steps: &["update metrics and narrative", "re-test the deck with a friendly firm"],
        effort_days: 3.0,
        effectiveness: 0.75,
    },
    ResolutionTemplate {
        id: "res-fundraise-prep",
        title: "Prepare the fundraise before the window closes",
        steps: &[
            "refresh the model and deck",
            "agree the target list",
            "sequence first partner meetings",
        ],
        effort_days: 7.0,
        effectiveness: 0.65,
    },
    ResolutionTemplate {
        id: "res-investor-update",
        title: "Ship a sharp investor update",
        steps: &["draft the update around one metric", "send to the full list"],
        effort_days: 1.0,
        effectiveness: 0.7,
    },
    ResolutionTemplate {
        id: "res-lead-courtship",
        title: "Court a lead for the round",
        steps: &["pick the two best-fit firms in pipeline", "offer a focused diligence package"],
        effort_days: 5.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-champion-touch",
        title: "Re-engage the champion",
        steps: &["book time with the champion", "bring something useful to the table"],
        effort_days: 1.0,
        effectiveness: 0.7,
    },
    ResolutionTemplate {
        id: "res-commit-shore",
        title: "Shore up the shaky commitment",
        steps: &["surface the firm's open concerns", "close each with evidence"],
        effort_days: 3.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-reconnect",
        title: "Reconnect before the relationship goes cold",
        steps: &["send a no-ask note", "book a catch-up"],
        effort_days: 1.0,
        effectiveness: 0.75,
    },
    ResolutionTemplate {
        id: "res-intro-path",
        title: "Make the introduction",
        steps: &[
            "confirm the introducer is willing",
            "write the forwardable blurb",
            "make the double-opt-in ask",
        ],
        effort_days: 1.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-growth-push",
        title: "Run a focused growth push",
        steps: &["pick the one channel that works", "double down for two weeks"],
        effort_days: 10.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-product-milestone",
        title: "Land the next product milestone",
        steps: &["cut scope to the critical path", "set a ship date"],
        effort_days: 10.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-hiring-sprint",
        title: "Run a hiring sprint for the open role",
        steps: &["tighten the spec", "source twenty candidates", "calibrate after five screens"],
        effort_days: 7.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-partner-outreach",
        title: "Open the partnership conversation",
        steps: &["map the partner's incentive", "get the first meeting"],
        effort_days: 3.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-ops-review",
        title: "Run an operating review",
        steps: &["collect the operating metrics", "walk them with the founders"],
        effort_days: 2.0,
        effectiveness: 0.65,
    },
    ResolutionTemplate {
        id: "res-efficiency-pass",
        title: "Run an efficiency pass on the cost base",
        steps: &["rank costs by leverage", "cut or renegotiate the top three"],
        effort_days: 5.0,
        effectiveness: 0.6,
    },
    ResolutionTemplate {
        id: "res-retention-save",
        title: "Run a retention save on at-risk accounts",
        steps: &["list accounts by churn risk", "assign saves to owners"],
        effort_days: 5.0,
        effectiveness: 0.55,
    },
    ResolutionTemplate {
        id: "res-customer-push",
        title: "Push the customer number",
        steps: &["pick the fastest segment", "run a two-week acquisition push"],
        effort_days: 10.0,
        effectiveness: 0.5,
    },
];

/// Looks up a resolution template by identifier.
#[must_use]
pub fn resolution(id: &str) -> Option<&'static ResolutionTemplate> {
    RESOLUTIONS.iter().find(|template| template.id == id)
}

/// Maps an issue kind to its single resolution template.
#[must_use]
pub const fn issue_resolution(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::RunwayCritical => "res-bridge-plan",
        IssueKind::RunwayWarning => "res-burn-review",
        IssueKind::BurnSpike => "res-spend-audit",
        IssueKind::NoPipeline => "res-pipeline-build",
        IssueKind::PipelineGap => "res-pipeline-expand",
        IssueKind::DealStale => "res-deal-nudge",
        IssueKind::GoalMissed => "res-goal-replan",
        IssueKind::GoalBehind => "res-goal-unblock",
        IssueKind::GoalStalled => "res-goal-review",
        IssueKind::DataStale => "res-data-refresh",
        IssueKind::DataMissing => "res-data-collect",
        IssueKind::NoGoals => "res-goal-setting",
        IssueKind::RoundStale => "res-round-momentum",
        IssueKind::DeckStale => "res-deck-refresh",
    }
}

/// Maps a structural category to its resolution template.
#[must_use]
pub const fn category_resolution(category: ActionCategory) -> &'static str {
    match category {
        ActionCategory::Growth => "res-growth-push",
        ActionCategory::Pipeline => "res-pipeline-build",
        ActionCategory::Data => "res-data-refresh",
        ActionCategory::Fundraise => "res-fundraise-prep",
        ActionCategory::Intros => "res-intro-path",
        ActionCategory::Product => "res-product-milestone",
        ActionCategory::Hiring => "res-hiring-sprint",
        ActionCategory::Partnership => "res-partner-outreach",
        ActionCategory::Operations => "res-ops-review",
        ActionCategory::Efficiency => "res-efficiency-pass",
        ActionCategory::Retention => "res-retention-save",
        ActionCategory::Customer => "res-customer-push",
        ActionCategory::Deal => "res-deal-nudge",
        ActionCategory::Round => "res-round-momentum",
        ActionCategory::Investor => "res-investor-update",
        ActionCategory::Champion => "res-champion-touch",
        ActionCategory::Relationship => "res-reconnect",
    }
}

// ============================================================================
// SECTION: Candidate
// ============================================================================

/// A candidate action awaiting an impact model.
///
/// # Invariants
/// - `id` is content-derived and stable across runs for identical inputs.
/// - `sources` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCandidate {
    /// Content-derived action identifier.
    pub id: ActionId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display title.
    pub title: String,
    /// Tagged sources.
    pub sources: SmallVec<[ActionSource; 2]>,
    /// Resolution template applied.
    pub resolution_id: ResolutionId,
    /// Step list from the template.
    pub steps: SmallVec<[String; 4]>,
    /// Estimated effort in days.
    pub effort_days: f64,
    /// Goal served, when the candidate serves one.
    pub goal_id: Option<GoalId>,
    /// Introduction timing, for introduction candidates.
    pub timing: Option<IntroTiming>,
    /// Opportunity actions this candidate unblocks (CAT2 evidence).
    pub unblocks: Vec<ActionId>,
}

impl ActionCandidate {
    /// Primary source type (first source).
    #[must_use]
    pub fn primary_source_type(&self) -> Option<SourceType> {
        self.sources.first().map(ActionSource::source_type)
    }

    /// Proactive value creation rather than reaction.
    #[must_use]
    pub fn is_opportunity_sourced(&self) -> bool {
        self.primary_source_type().is_some_and(SourceType::is_opportunity_sourced)
    }
}

/// Builds a candidate from a template plus a content-derived suffix.
fn build_candidate(
    company_id: &CompanyId,
    company_name: &str,
    template: &'static ResolutionTemplate,
    suffix: &str,
    source: ActionSource,
    goal_id: Option<GoalId>,
    timing: Option<IntroTiming>,
) -> ActionCandidate {
    ActionCandidate {
        id: ActionId::new(format!("act:{company_id}:{}:{suffix}", template.id)),
        company_id: company_id.clone(),
        title: format!("{} — {company_name}", template.title),
        sources: smallvec![source],
        resolution_id: ResolutionId::new(template.id),
        steps: template.steps.iter().map(|step| (*step).to_string()).collect(),
        effort_days: template.effort_days,
        goal_id,
        timing,
        unblocks: Vec::new(),
    }
}

// ============================================================================
// SECTION: Deduplication
// ============================================================================

/// Merges candidates that share a content-derived identifier.
///
/// Rules that fire several times per company (stale data for two metrics,
/// dormant connections on several edges) produce the same resolution for the
/// same scope; their sources merge onto one candidate. Output is in
/// identifier order.
#[must_use]
pub fn dedupe_candidates(candidates: Vec<ActionCandidate>) -> Vec<ActionCandidate> {
    let mut merged: std::collections::BTreeMap<ActionId, ActionCandidate> =
        std::collections::BTreeMap::new();
    for candidate in candidates {
        match merged.get_mut(&candidate.id) {
            Some(existing) => existing.sources.extend(candidate.sources),
            None => {
                merged.insert(candidate.id.clone(), candidate);
            }
        }
    }
    merged.into_values().collect()
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// One candidate per issue, via the fixed issue-to-resolution map.
#[must_use]
pub fn candidates_from_issues(issues: &[Issue], company_name: &str) -> Vec<ActionCandidate> {
    let mut out = Vec::new();
    for issue in issues {
        let Some(template) = resolution(issue_resolution(issue.kind)) else {
            continue;
        };
        let scope = issue
            .goal_id
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| issue.deal_id.as_ref().map(ToString::to_string));
        let suffix = scope.map_or_else(
            || format!("issue:{}", issue.kind.as_str()),
            |scope| format!("issue:{}:{scope}", issue.kind.as_str()),
        );
        out.push(build_candidate(
            &issue.company_id,
            company_name,
            template,
            &suffix,
            ActionSource::Issue {
                kind: issue.kind,
                company_id: issue.company_id.clone(),
                severity: issue.severity,
                goal_id: issue.goal_id.clone(),
                deal_id: issue.deal_id.clone(),
            },
            issue.goal_id.clone(),
            None,
        ));
    }
    out
}

/// One candidate per pre-issue preventative resolution key.
#[must_use]
pub fn candidates_from_preissues(
    preissues: &[PreIssue],
    company_name: &str,
) -> Vec<ActionCandidate> {
    let mut out = Vec::new();
    for preissue in preissues {
        for key in &preissue.preventative_resolutions {
            let Some(template) = resolution(key) else {
                continue;
            };
            let scope = preissue
                .goal_id
                .as_ref()
                .map(ToString::to_string)
                .or_else(|| preissue.deal_id.as_ref().map(ToString::to_string));
            let suffix = scope.map_or_else(
                || format!("preissue:{}", preissue.kind.as_str()),
                |scope| format!("preissue:{}:{scope}", preissue.kind.as_str()),
            );
            out.push(build_candidate(
                &preissue.company_id,
                company_name,
                template,
                &suffix,
                ActionSource::Preissue {
                    kind: preissue.kind,
                    company_id: preissue.company_id.clone(),
                    likelihood: preissue.likelihood,
                    severity: preissue.severity,
                    time_to_breach_days: preissue.time_to_breach_days,
                    irreversibility: preissue.irreversibility,
                    cost_of_delay_multiplier: preissue.cost_of_delay_multiplier,
                    is_imminent: preissue.is_imminent,
                    expected_future_cost: preissue.expected_future_cost,
                    escalation_at: preissue.escalation_at,
                    goal_id: preissue.goal_id.clone(),
                },
                preissue.goal_id.clone(),
                None,
            ));
        }
    }
    out
}

/// Exactly three category candidates per open goal.
#[must_use]
pub fn candidates_from_goals(index: &RawIndex<'_>, company_id: &CompanyId) -> Vec<ActionCandidate> {
    let company_name =
        index.company(company_id).map_or("", |company| company.name.as_str());
    let mut out = Vec::new();
    for goal in index.open_goals_for(company_id) {
        for category in goal_categories(goal.goal_type) {
            let Some(template) = resolution(category_resolution(category)) else {
                continue;
            };
            let suffix = format!("goal:{}:{}", goal.id, category.as_str());
            out.push(build_candidate(
                company_id,
                company_name,
                template,
                &suffix,
                ActionSource::Goal {
                    goal_id: goal.id.clone(),
                    company_id: company_id.clone(),
                    goal_type: goal.goal_type,
                    category,
                },
                Some(goal.id.clone()),
                None,
            ));
        }
    }
    out
}

/// One candidate per surfaced introduction opportunity.
#[must_use]
pub fn candidates_from_intros(
    opportunities: &[IntroOpportunity],
    company_name: &str,
) -> Vec<ActionCandidate> {
    let mut out = Vec::new();
    for opportunity in opportunities {
        let Some(template) = resolution("res-intro-path") else {
            continue;
        };
        let suffix = format!("intro:{}:{}", opportunity.goal_id, opportunity.target_id);
        let mut candidate = build_candidate(
            &opportunity.company_id,
            company_name,
            template,
            &suffix,
            ActionSource::Introduction {
                company_id: opportunity.company_id.clone(),
                goal_id: opportunity.goal_id.clone(),
                target_id: opportunity.target_id.clone(),
                introducer_id: opportunity.introducer_id.clone(),
                timing: opportunity.timing,
                trust_score: opportunity.trust.score,
                calibrated_probability: opportunity.calibrated_probability,
                optionality_gain: opportunity.optionality_gain,
            },
            Some(opportunity.goal_id.clone()),
            Some(opportunity.timing),
        );
        candidate.title = format!("{} — {}", template.title, opportunity.rationale);
        out.push(candidate);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Company;
    use crate::core::Goal;
    use crate::core::GoalStatus;
    use crate::core::GoalType;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;

    use super::ActionCategory;
    use super::ActionSource;
    use super::candidates_from_goals;
    use super::category_resolution;
    use super::goal_categories;
    use super::issue_resolution;
    use super::resolution;

    #[test]
    fn every_issue_resolution_resolves() {
        use crate::predict::issues::IssueKind;
        for kind in [
            IssueKind::RunwayCritical,
            IssueKind::RunwayWarning,
            IssueKind::BurnSpike,
            IssueKind::NoPipeline,
            IssueKind::PipelineGap,
            IssueKind::DealStale,
            IssueKind::GoalMissed,
            IssueKind::GoalBehind,
            IssueKind::GoalStalled,
            IssueKind::DataStale,
            IssueKind::DataMissing,
            IssueKind::NoGoals,
            IssueKind::RoundStale,
            IssueKind::DeckStale,
        ] {
            assert!(resolution(issue_resolution(kind)).is_some(), "{}", kind.as_str());
        }
    }

    #[test]
    fn every_category_resolution_resolves() {
        for category in [
            ActionCategory::Growth,
            ActionCategory::Pipeline,
            ActionCategory::Data,
            ActionCategory::Fundraise,
            ActionCategory::Intros,
            ActionCategory::Product,
            ActionCategory::Hiring,
            ActionCategory::Partnership,
            ActionCategory::Operations,
            ActionCategory::Efficiency,
            ActionCategory::Retention,
            ActionCategory::Customer,
            ActionCategory::Deal,
            ActionCategory::Round,
            ActionCategory::Investor,
            ActionCategory::Champion,
            ActionCategory::Relationship,
        ] {
            assert!(resolution(category_resolution(category)).is_some(), "{}", category.as_str());
        }
    }

    #[test]
    fn revenue_goal_yields_growth_pipeline_data() {
        let categories = goal_categories(GoalType::Revenue);
        assert_eq!(
            categories,
            [ActionCategory::Growth, ActionCategory::Pipeline, ActionCategory::Data]
        );
    }

    #[test]
    fn one_goal_yields_exactly_three_candidates() {
        let company = Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: None,
            burn: None,
            employees: None,
            recurring: None,
            revenue: None,
            raising: false,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        };
        let graph = RawGraph {
            companies: vec![company],
            goals: vec![Goal {
                id: "g1".into(),
                company_id: "c1".into(),
                goal_type: GoalType::Revenue,
                target: 100.0,
                current: 0.0,
                due: Timestamp::from_unix_millis(0).plus_days(90),
                status: GoalStatus::Active,
                weight: None,
            }],
            ..RawGraph::default()
        };
        let index = RawIndex::build(&graph);
        let candidates = candidates_from_goals(&index, &"c1".into());
        assert_eq!(candidates.len(), 3);
        for candidate in &candidates {
            assert!(matches!(candidate.sources.first(), Some(ActionSource::Goal { .. })));
        }
    }
}
