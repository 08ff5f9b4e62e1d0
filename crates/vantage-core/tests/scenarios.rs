// crates/vantage-core/tests/scenarios.rs
// ============================================================================
// Module: Engine Seed Scenarios
// Description: End-to-end scenarios pinning the documented behaviors.
// Purpose: Keep the headline behaviors from drifting.
// ============================================================================

//! Seed-scenario tests for `Engine::compute`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use vantage_core::ComputeOptions;
use vantage_core::Engine;
use vantage_core::core::DismissalEvent;
use vantage_core::core::DismissalReason;
use vantage_core::core::GoalType;
use vantage_core::core::IntroStatus;
use vantage_core::decide::GateLevel;
use vantage_core::derive::HealthBand;
use vantage_core::predict::ActionSource;
use vantage_core::predict::IssueKind;
use vantage_core::predict::SourceType;

// ============================================================================
// SECTION: Scenario 1 - Runway cliff, no fundraise
// ============================================================================

#[test]
fn runway_cliff_without_fundraise_forces_issue_to_the_top() {
    let graph = common::cliff_graph(false, false);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();

    let company = &output.companies[0];
    assert_eq!(company.derived.health.band, HealthBand::Red);
    assert!(
        company.derived.issues.iter().any(|issue| issue.kind == IssueKind::RunwayCritical)
    );
    assert_eq!(company.derived.gate, Some(GateLevel::Cat1));

    let top = &output.actions[0];
    assert_eq!(top.sources[0].source_type(), SourceType::Issue);
    assert_eq!(top.resolution_id.as_str(), "res-bridge-plan");
    assert_eq!(top.gate, Some(GateLevel::Cat1));
}

#[test]
fn no_opportunity_sourced_action_is_ever_cat1_gated() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    for action in &output.actions {
        if action.is_opportunity_sourced() {
            assert_ne!(action.gate, Some(GateLevel::Cat1), "{}", action.id);
        }
    }
}

// ============================================================================
// SECTION: Scenario 2 - Runway cliff, active fundraise
// ============================================================================

#[test]
fn active_fundraise_goal_defuses_cat1_and_allows_introductions() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();

    let company = &output.companies[0];
    assert_ne!(company.derived.gate, Some(GateLevel::Cat1));
    assert!(output.actions.iter().all(|action| action.gate != Some(GateLevel::Cat1)));

    let has_intro = output
        .actions
        .iter()
        .any(|action| action.sources[0].source_type() == SourceType::Introduction);
    assert!(has_intro);
}

// ============================================================================
// SECTION: Scenario 3 - Strong-dismissal suppression
// ============================================================================

/// The structural growth action id for the revenue goal in the fixture.
const GROWTH_ACTION: &str = "act:c1:res-growth-push:goal:g1:growth";

#[test]
fn strong_dismissal_suppresses_and_decays_by_half_lives() {
    let graph = common::healthy_single_goal_graph(GoalType::Revenue);
    let engine = Engine::default();
    let now = common::now();

    let dismissal = DismissalEvent {
        id: "d1".into(),
        action_id: GROWTH_ACTION.into(),
        reason: DismissalReason::Disagree,
        user_id: "u1".into(),
        at: now.plus_days(-1),
        company_id: Some("c1".into()),
        goal_id: Some("g1".into()),
        source_type: Some("GOAL".into()),
    };
    let options = ComputeOptions { dismissals: vec![dismissal], ..ComputeOptions::default() };

    let fresh = engine.compute(&graph, now, &options).unwrap();
    let fresh_penalty = fresh
        .actions
        .iter()
        .find(|action| action.id.as_str() == GROWTH_ACTION)
        .unwrap()
        .rank_components
        .obviousness_penalty;
    assert!((0.3..=0.8).contains(&fresh_penalty));

    let later = engine.compute(&graph, now.plus_days(60), &options).unwrap();
    let later_penalty = later
        .actions
        .iter()
        .find(|action| action.id.as_str() == GROWTH_ACTION)
        .unwrap()
        .rank_components
        .obviousness_penalty;
    assert!((later_penalty - fresh_penalty / 2.0).abs() < 0.05);
}

// ============================================================================
// SECTION: Scenario 4 - Three-per-goal structural rule
// ============================================================================

#[test]
fn single_revenue_goal_yields_exactly_three_goal_sourced_actions() {
    let graph = common::healthy_single_goal_graph(GoalType::Revenue);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();

    let mut categories: Vec<&str> = output
        .actions
        .iter()
        .filter_map(|action| match &action.sources[0] {
            ActionSource::Goal { goal_id, category, .. } if goal_id.as_str() == "g1" => {
                Some(category.as_str())
            }
            _ => None,
        })
        .collect();
    categories.sort_unstable();
    assert_eq!(categories, vec!["data", "growth", "pipeline"]);
}

// ============================================================================
// SECTION: Scenario 5 - Calibration dominance
// ============================================================================

#[test]
fn perfect_introducer_history_dominates_and_absence_falls_back() {
    let mut graph = common::cliff_graph(true, true);
    graph.intro_outcomes = (0..10)
        .map(|i| common::intro_outcome(&format!("o{i}"), "founder", IntroStatus::Positive))
        .collect();
    let engine = Engine::default();

    let calibrated = |output: &vantage_core::EngineOutput| -> f64 {
        output
            .actions
            .iter()
            .find_map(|action| match &action.sources[0] {
                ActionSource::Introduction { calibrated_probability, .. } => {
                    Some(*calibrated_probability)
                }
                _ => None,
            })
            .unwrap()
    };

    let with_history =
        engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    assert!((calibrated(&with_history) - 0.85).abs() < 1e-9);

    graph.intro_outcomes.clear();
    let without_history =
        engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    assert!((calibrated(&without_history) - 0.15).abs() < 1e-9);
}

// ============================================================================
// SECTION: Cross-cutting bounds
// ============================================================================

#[test]
fn obviousness_and_success_components_stay_inside_their_bounds() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    for action in &output.actions {
        let components = &action.rank_components;
        assert!((0.0..=0.8).contains(&components.obviousness_penalty));
        assert!(
            (0.2..=1.0).contains(&components.success_probability),
            "{}",
            action.id
        );
    }
}

#[test]
fn proactivity_shortfalls_are_reported_never_mutated() {
    // Reactive-only graph: the proactivity target cannot be met without a
    // gate, so a warning must appear and ranks stay dense.
    let graph = common::cliff_graph(true, false);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    if !output.meta.proactivity.satisfied {
        assert!(output.meta.warnings.iter().any(|w| w.contains("proactivity")));
    }
    for (index, action) in output.actions.iter().enumerate() {
        assert_eq!(usize::try_from(action.rank).unwrap(), index + 1);
    }
}
