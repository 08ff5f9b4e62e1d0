// crates/vantage-core/src/decide/impact.rs
// ============================================================================
// Module: Vantage Impact Model
// Description: Seven-dimension impact attachment for candidate actions.
// Purpose: Quantify upside, odds, cost, and leverage per action, pure per run.
// Dependencies: crate::core, crate::derive, crate::predict, serde
// ============================================================================

//! ## Overview
//! Every candidate receives a seven-dimension impact model computed from the
//! candidate and the run context only: upside magnitude across affected
//! goals, probability of success, execution probability (with pattern lift
//! from history), downside magnitude, time to impact, effort cost, and
//! second-order leverage. Dimension bounds are fixed; the ranking layer
//! combines them into the single rank score.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Company;
use crate::core::EngineSettings;
use crate::core::Goal;
use crate::core::GoalId;
use crate::core::GoalType;
use crate::core::RawIndex;
use crate::core::Stage;
use crate::derive::Trajectory;
use crate::derive::trajectory::OnTrack;
use crate::predict::ActionCandidate;
use crate::predict::ActionSource;
use crate::predict::IntroTiming;
use crate::predict::IssueKind;
use crate::predict::PreIssueKind;
use crate::predict::ripple_score;

// ============================================================================
// SECTION: Impact Model
// ============================================================================

/// Seven-dimension impact model.
///
/// # Invariants
/// - Every dimension sits inside its documented bound after attachment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactModel {
    /// Upside magnitude, 0-100 (floored at 10 while goals exist).
    pub upside: f64,
    /// Probability the resolution works, 0.15-0.95.
    pub probability_of_success: f64,
    /// Probability the action actually gets executed, 0.1-0.9.
    pub execution_probability: f64,
    /// Downside magnitude, 2-40.
    pub downside: f64,
    /// Days until impact lands, 1-60.
    pub time_to_impact_days: f64,
    /// Effort cost, 5-85.
    pub effort_cost: f64,
    /// Second-order leverage, 5-80.
    pub second_order_leverage: f64,
}

// ============================================================================
// SECTION: Impact Context
// ============================================================================

/// Run context consumed by impact attachment.
///
/// # Invariants
/// - All maps are built once per run from derived and predicted state.
#[derive(Debug)]
pub struct ImpactContext<'a> {
    /// Raw index for goal and company lookup.
    pub index: &'a RawIndex<'a>,
    /// Trajectories keyed by goal.
    pub trajectories: &'a BTreeMap<GoalId, Trajectory>,
    /// Pattern-lift multipliers keyed by resolution type label.
    pub pattern_lift: &'a BTreeMap<String, f64>,
    /// Engine settings.
    pub settings: &'a EngineSettings,
}

// ============================================================================
// SECTION: Goal Damage Table
// ============================================================================

/// Static issue-to-goal damage table, flat-keyed by `(issue, goalType)`.
///
/// Returns the probability delta an issue inflicts on a goal type, when the
/// pair has a tabled entry; the severity heuristic applies otherwise.
#[must_use]
pub const fn goal_damage(issue: IssueKind, goal_type: GoalType) -> Option<f64> {
    match (issue, goal_type) {
        (IssueKind::RunwayCritical, GoalType::Fundraise) => Some(0.40),
        (IssueKind::RunwayCritical, GoalType::RoundCompletion) => Some(0.35),
        (IssueKind::RunwayCritical, GoalType::Hiring) => Some(0.25),
        (IssueKind::RunwayCritical, GoalType::Revenue) => Some(0.20),
        (IssueKind::RunwayWarning, GoalType::Fundraise) => Some(0.25),
        (IssueKind::RunwayWarning, GoalType::Hiring) => Some(0.15),
        (IssueKind::RunwayWarning, GoalType::Revenue) => Some(0.10),
        (IssueKind::NoPipeline, GoalType::Fundraise) => Some(0.35),
        (IssueKind::NoPipeline, GoalType::RoundCompletion) => Some(0.30),
        (IssueKind::PipelineGap, GoalType::Fundraise | GoalType::RoundCompletion) => Some(0.20),
        (IssueKind::RoundStale, GoalType::Fundraise) => Some(0.25),
        (IssueKind::RoundStale, GoalType::RoundCompletion) => Some(0.30),
        (IssueKind::DeckStale, GoalType::Fundraise) => Some(0.15),
        (IssueKind::BurnSpike, GoalType::Efficiency) => Some(0.20),
        (IssueKind::BurnSpike, GoalType::Fundraise) => Some(0.10),
        (IssueKind::DealStale, GoalType::DealClose) => Some(0.25),
        (IssueKind::DealStale, GoalType::RoundCompletion) => Some(0.15),
        _ => None,
    }
}

/// Severity heuristic lift when no damage entry exists.
const fn severity_lift(severity: u8) -> f64 {
    match severity {
        0 => 0.12,
        1 => 0.18,
        2 => 0.28,
        _ => 0.40,
    }
}

// ============================================================================
// SECTION: Attachment
// ============================================================================

/// Attaches the impact model to a candidate.
#[must_use]
pub fn attach_impact(candidate: &ActionCandidate, context: &ImpactContext<'_>) -> ImpactModel {
    let company = context.index.company(&candidate.company_id);
    let stage = company.map_or(Stage::Seed, |company| company.stage);
    let open_goals = context.index.open_goals_for(&candidate.company_id);

    ImpactModel {
        upside: upside(candidate, company, &open_goals, context),
        probability_of_success: probability_of_success(candidate, stage, &open_goals, context),
        execution_probability: execution_probability(candidate, stage, context),
        downside: downside(candidate),
        time_to_impact_days: time_to_impact(candidate, stage),
        effort_cost: effort_cost(candidate, stage),
        second_order_leverage: second_order_leverage(candidate, &open_goals),
    }
}

/// Probability a goal gets hit, read from its trajectory.
fn probability_of_hit(goal: &Goal, context: &ImpactContext<'_>) -> f64 {
    if goal.current >= goal.target {
        return 0.95;
    }
    match context.trajectories.get(&goal.id).map(|t| t.on_track) {
        Some(OnTrack::Yes) => 0.75,
        Some(OnTrack::No) => 0.25,
        Some(OnTrack::Unknown) | None => 0.5,
    }
}

/// Combined goal weight: base x stage multiplier x user override.
fn goal_weight(goal: &Goal, stage: Stage, context: &ImpactContext<'_>) -> f64 {
    let assumptions = &context.settings.assumptions;
    assumptions.goal_weight(goal.goal_type)
        * assumptions.stage_goal_multiplier(stage, goal.goal_type)
        * goal.weight.unwrap_or(1.0)
}

/// Goals a source affects: the scoped goal when one exists, else all open.
fn affected_goals<'a>(
    source: &ActionSource,
    open_goals: &[&'a Goal],
) -> Vec<&'a Goal> {
    match source.goal_id() {
        Some(goal_id) => {
            open_goals.iter().filter(|goal| &goal.id == goal_id).copied().collect()
        }
        None => open_goals.to_vec(),
    }
}

/// Upside magnitude across affected goals.
fn upside(
    candidate: &ActionCandidate,
    company: Option<&Company>,
    open_goals: &[&Goal],
    context: &ImpactContext<'_>,
) -> f64 {
    let stage = company.map_or(Stage::Seed, |company| company.stage);
    let weights = &context.settings.weights;
    let mut total = 0.0;
    let mut timing_multiplier = 1.0;

    for source in &candidate.sources {
        let goals = affected_goals(source, open_goals);
        let lift_for = |goal: &Goal| -> f64 {
            match source {
                ActionSource::Issue { kind, severity, .. } => {
                    goal_damage(*kind, goal.goal_type).unwrap_or_else(|| severity_lift(*severity))
                }
                ActionSource::Preissue { likelihood, severity, .. } => {
                    let base = if *severity >= 3 { 0.15 } else { 0.08 };
                    likelihood * base
                }
                ActionSource::Goal { .. } => (1.0 - probability_of_hit(goal, context)) * 0.25,
                ActionSource::Introduction { .. } | ActionSource::Opportunity { .. } => 0.10,
            }
        };
        if let ActionSource::Introduction { timing, .. } = source {
            timing_multiplier = timing.upside_multiplier();
        }

        if goals.is_empty() {
            // Stage-based implicit goal when the company carries none.
            let implicit = if stage.is_early() { GoalType::Fundraise } else { GoalType::Operational };
            let weight = context.settings.assumptions.goal_weight(implicit)
                * context.settings.assumptions.stage_goal_multiplier(stage, implicit);
            let lift = match source {
                ActionSource::Issue { kind, severity, .. } => goal_damage(*kind, implicit)
                    .unwrap_or_else(|| severity_lift(*severity)),
                ActionSource::Preissue { likelihood, severity, .. } => {
                    likelihood * if *severity >= 3 { 0.15 } else { 0.08 }
                }
                ActionSource::Goal { .. } => 0.125,
                ActionSource::Introduction { .. } | ActionSource::Opportunity { .. } => 0.10,
            };
            total += weight * lift;
        } else {
            for goal in goals {
                total += goal_weight(goal, stage, context) * lift_for(goal);
            }
        }
    }

    let scaled = (total * 100.0).clamp(10.0, weights.impact_max);
    (scaled * timing_multiplier).min(weights.impact_max)
}

/// Probability-of-success dimension.
fn probability_of_success(
    candidate: &ActionCandidate,
    stage: Stage,
    open_goals: &[&Goal],
    context: &ImpactContext<'_>,
) -> f64 {
    let base = crate::predict::resolution(candidate.resolution_id.as_str())
        .map_or(0.5, |template| template.effectiveness);
    let mut probability = base;

    if let Some(severity) = max_issue_severity(candidate) {
        probability += f64::from(severity) * 0.02;
    }
    if let Some(likelihood) = max_preissue_likelihood(candidate) {
        probability += likelihood * 0.05;
    }
    probability += stage_success_shift(stage);

    let off_track = candidate.sources.iter().any(|source| {
        affected_goals(source, open_goals)
            .into_iter()
            .any(|goal| probability_of_hit(goal, context) < 0.2)
    });
    if off_track {
        probability -= 0.08;
    }

    probability.clamp(0.15, 0.95)
}

/// Stage shift for probability of success.
const fn stage_success_shift(stage: Stage) -> f64 {
    match stage {
        Stage::PreSeed => -0.08,
        Stage::Seed => -0.04,
        Stage::SeriesA => 0.0,
        Stage::SeriesB => 0.03,
        Stage::SeriesC | Stage::SeriesD => 0.05,
    }
}

/// Execution-probability dimension.
fn execution_probability(
    candidate: &ActionCandidate,
    stage: Stage,
    context: &ImpactContext<'_>,
) -> f64 {
    let mut probability = effort_base(candidate.effort_days);

    let steps = candidate.steps.len();
    if steps > 3 {
        probability -= 0.02 * usize_f64(steps - 3);
    }
    if stage.is_early() {
        probability += 0.05;
    } else {
        probability -= 0.02;
    }
    if candidate.sources.iter().any(|source| matches!(
        source,
        ActionSource::Preissue { is_imminent: true, .. }
    )) {
        probability += 0.12;
    }
    match max_issue_severity(candidate) {
        Some(3) => probability += 0.15,
        Some(2) => probability += 0.08,
        _ => {}
    }
    if candidate.resolution_id.as_str().starts_with("res-data") {
        probability += 0.05;
    }
    if let Some(timing) = candidate.timing {
        probability += match timing {
            IntroTiming::Now => 0.1,
            IntroTiming::Soon => 0.0,
            IntroTiming::Later => -0.15,
            IntroTiming::Never => -1.0,
        };
    }
    if let Some(lift) = context.pattern_lift.get(candidate.resolution_id.as_str()) {
        probability *= lift;
    }

    probability.clamp(0.1, 0.9)
}

/// Effort-keyed execution base.
fn effort_base(effort_days: f64) -> f64 {
    if effort_days <= 1.0 {
        0.75
    } else if effort_days <= 3.0 {
        0.65
    } else if effort_days <= 7.0 {
        0.55
    } else if effort_days <= 14.0 {
        0.45
    } else {
        0.35
    }
}

/// Downside-magnitude dimension.
fn downside(candidate: &ActionCandidate) -> f64 {
    let mut worst = 5.0_f64;
    for source in &candidate.sources {
        let value = match source {
            ActionSource::Issue { severity, .. } => 5.0 + f64::from(*severity) * 5.0,
            ActionSource::Preissue { irreversibility, cost_of_delay_multiplier, .. } => {
                3.0 + irreversibility * 15.0 + cost_of_delay_multiplier.min(3.0) * 3.0
            }
            ActionSource::Goal { .. } | ActionSource::Opportunity { .. } => 5.0,
            ActionSource::Introduction { .. } => 10.0,
        };
        worst = worst.max(value);
    }
    if candidate.effort_days >= 21.0 {
        worst += 5.0;
    } else if candidate.effort_days >= 14.0 {
        worst += 3.0;
    }
    if candidate.sources.iter().any(|source| matches!(
        source,
        ActionSource::Issue { deal_id: Some(_), .. }
    )) {
        worst += 3.0;
    }
    worst.clamp(2.0, 40.0)
}

/// Time-to-impact dimension.
fn time_to_impact(candidate: &ActionCandidate, stage: Stage) -> f64 {
    let mut days = (candidate.effort_days * 1.5).round();

    for source in &candidate.sources {
        if let ActionSource::Preissue { time_to_breach_days, .. } = source {
            days = days.min((time_to_breach_days * 0.7).round());
        }
    }

    let urgent = candidate.sources.iter().any(|source| match source {
        ActionSource::Issue { severity, .. } => *severity >= 3,
        ActionSource::Preissue { is_imminent, .. } => *is_imminent,
        _ => false,
    });
    if urgent {
        days = days.max(7.0);
    }

    (days * stage_time_scale(stage)).round().clamp(1.0, 60.0)
}

/// Stage scale for time to impact.
const fn stage_time_scale(stage: Stage) -> f64 {
    match stage {
        Stage::PreSeed => 0.7,
        Stage::Seed => 0.8,
        Stage::SeriesA => 0.9,
        Stage::SeriesB => 1.0,
        Stage::SeriesC | Stage::SeriesD => 1.2,
    }
}

/// Effort-cost dimension.
fn effort_cost(candidate: &ActionCandidate, stage: Stage) -> f64 {
    let mut cost = 10.0 + candidate.effort_days.min(30.0) * 2.0;
    cost += usize_f64(candidate.steps.len());
    cost += match stage {
        Stage::PreSeed | Stage::Seed => 0.0,
        Stage::SeriesA => 2.0,
        Stage::SeriesB => 5.0,
        Stage::SeriesC | Stage::SeriesD => 8.0,
    };
    for source in &candidate.sources {
        match source {
            ActionSource::Preissue { irreversibility, .. } => cost += irreversibility * 5.0,
            ActionSource::Issue { severity, .. } => cost += f64::from(*severity) * 2.0,
            ActionSource::Introduction { .. } => cost += 3.0,
            ActionSource::Goal { .. } | ActionSource::Opportunity { .. } => {}
        }
    }
    cost.clamp(5.0, 85.0)
}

/// Second-order-leverage dimension: the strongest applicable claim wins.
fn second_order_leverage(candidate: &ActionCandidate, open_goals: &[&Goal]) -> f64 {
    let mut leverage = 5.0_f64;

    for source in &candidate.sources {
        match source {
            ActionSource::Issue { kind, .. } => {
                leverage = leverage.max(10.0 + ripple_score(*kind) * 70.0);
                leverage = leverage.max(structural_issue_bonus(*kind));
                let damage_count = open_goals
                    .iter()
                    .filter(|goal| goal_damage(*kind, goal.goal_type).is_some())
                    .count();
                if damage_count > 1 {
                    leverage = leverage.max(20.0 + 10.0 * usize_f64(damage_count));
                }
            }
            ActionSource::Preissue { kind, expected_future_cost, .. } => {
                leverage = leverage.max((15.0 + expected_future_cost * 0.8).min(65.0));
                leverage = leverage.max(structural_preissue_bonus(*kind));
            }
            ActionSource::Goal { .. }
            | ActionSource::Introduction { .. }
            | ActionSource::Opportunity { .. } => {}
        }
    }

    if open_goals.len() > 1 {
        let multi = 25.0 + 8.0 * usize_f64(open_goals.len());
        let touches_all = candidate
            .sources
            .iter()
            .any(|source| source.goal_id().is_none());
        if touches_all {
            leverage = leverage.max(multi);
        }
    }

    leverage.clamp(5.0, 80.0)
}

/// Structural leverage bonus per issue kind.
const fn structural_issue_bonus(kind: IssueKind) -> f64 {
    match kind {
        IssueKind::RunwayCritical | IssueKind::RunwayWarning => 60.0,
        IssueKind::NoPipeline | IssueKind::PipelineGap => 45.0,
        IssueKind::RoundStale => 40.0,
        _ => 0.0,
    }
}

/// Structural leverage bonus per pre-issue kind.
const fn structural_preissue_bonus(kind: PreIssueKind) -> f64 {
    match kind {
        PreIssueKind::RunwayBreach => 55.0,
        PreIssueKind::RoundStall => 45.0,
        PreIssueKind::LeadVacancy | PreIssueKind::CommitmentAtRisk => 40.0,
        PreIssueKind::ChampionDeparture => 35.0,
        PreIssueKind::DealMomentumLoss | PreIssueKind::GoalMiss => 30.0,
        PreIssueKind::ConnectionDormant | PreIssueKind::RelationshipDecay => 20.0,
    }
}

/// Helper: max issue severity across sources.
fn max_issue_severity(candidate: &ActionCandidate) -> Option<u8> {
    candidate
        .sources
        .iter()
        .filter_map(|source| match source {
            ActionSource::Issue { severity, .. } => Some(*severity),
            _ => None,
        })
        .max()
}

/// Helper: max pre-issue likelihood across sources.
fn max_preissue_likelihood(candidate: &ActionCandidate) -> Option<f64> {
    candidate
        .sources
        .iter()
        .filter_map(|source| match source {
            ActionSource::Preissue { likelihood, .. } => Some(*likelihood),
            _ => None,
        })
        .fold(None, |acc, value| Some(acc.map_or(value, |current: f64| current.max(value))))
}

/// Converts a small count to f64.
#[allow(clippy::cast_precision_loss, reason = "counts here are small")]
fn usize_f64(value: usize) -> f64 {
    value as f64
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use std::collections::BTreeMap;

    use crate::core::Company;
    use crate::core::EngineSettings;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Stage;
    use crate::core::Timestamp;
    use crate::predict::candidates_from_issues;
    use crate::predict::issues::Issue;
    use crate::predict::issues::IssueKind;

    use super::ImpactContext;
    use super::attach_impact;

    /// Pre-seed company with no goals.
    fn company() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::PreSeed,
            sector: "saas".into(),
            cash: Some(20_000.0),
            burn: Some(10_000.0),
            employees: None,
            recurring: None,
            revenue: None,
            raising: false,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    #[test]
    fn critical_runway_issue_scores_high_leverage_and_bounded_dimensions() {
        let graph = RawGraph { companies: vec![company()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let issues = vec![Issue {
            kind: IssueKind::RunwayCritical,
            company_id: "c1".into(),
            severity: 3,
            goal_id: None,
            deal_id: None,
            evidence: String::new(),
        }];
        let candidates = candidates_from_issues(&issues, "Acme");
        let settings = EngineSettings::default();
        let trajectories = BTreeMap::new();
        let pattern_lift = BTreeMap::new();
        let context = ImpactContext {
            index: &index,
            trajectories: &trajectories,
            pattern_lift: &pattern_lift,
            settings: &settings,
        };
        let impact = attach_impact(&candidates[0], &context);

        assert!((10.0..=100.0).contains(&impact.upside));
        assert!((0.15..=0.95).contains(&impact.probability_of_success));
        assert!((0.1..=0.9).contains(&impact.execution_probability));
        assert!((2.0..=40.0).contains(&impact.downside));
        assert!((1.0..=60.0).contains(&impact.time_to_impact_days));
        assert!((5.0..=85.0).contains(&impact.effort_cost));
        assert!((60.0..=80.0).contains(&impact.second_order_leverage));
    }

    #[test]
    fn downside_grows_with_issue_severity() {
        let graph = RawGraph { companies: vec![company()], ..RawGraph::default() };
        let index = RawIndex::build(&graph);
        let settings = EngineSettings::default();
        let trajectories = BTreeMap::new();
        let pattern_lift = BTreeMap::new();
        let context = ImpactContext {
            index: &index,
            trajectories: &trajectories,
            pattern_lift: &pattern_lift,
            settings: &settings,
        };
        let mut last = 0.0;
        for severity in [1, 2, 3] {
            let issues = vec![Issue {
                kind: IssueKind::RunwayWarning,
                company_id: "c1".into(),
                severity,
                goal_id: None,
                deal_id: None,
                evidence: String::new(),
            }];
            let candidates = candidates_from_issues(&issues, "Acme");
            let impact = attach_impact(&candidates[0], &context);
            assert!(impact.downside > last);
            last = impact.downside;
        }
    }
}
