// crates/vantage-core/tests/common/mod.rs
// ============================================================================
// Module: Shared Engine Test Fixtures
// Description: Raw graph builders used across the integration suites.
// Purpose: Keep scenario construction consistent and deterministic.
// ============================================================================

//! Shared fixtures for vantage-core integration tests.

#![allow(dead_code, reason = "Each integration binary uses a subset of the fixtures.")]

use vantage_core::core::Company;
use vantage_core::core::Goal;
use vantage_core::core::GoalStatus;
use vantage_core::core::GoalType;
use vantage_core::core::IntroKind;
use vantage_core::core::IntroOutcome;
use vantage_core::core::IntroPathType;
use vantage_core::core::IntroStatus;
use vantage_core::core::OrgKind;
use vantage_core::core::Person;
use vantage_core::core::Provenance;
use vantage_core::core::Relationship;
use vantage_core::core::RelationshipKind;
use vantage_core::core::Stage;
use vantage_core::RawGraph;
use vantage_core::Timestamp;

/// Deterministic "now" shared by the suites.
#[must_use]
pub fn now() -> Timestamp {
    Timestamp::from_unix_millis(0).plus_days(400)
}

/// Portfolio seed company with the given financials observed at `now`.
#[must_use]
pub fn company(id: &str, cash: f64, burn: f64, raising: bool) -> Company {
    Company {
        id: id.into(),
        name: format!("Company {id}"),
        stage: Stage::Seed,
        sector: "saas".into(),
        cash: Some(cash),
        burn: Some(burn),
        employees: None,
        recurring: None,
        revenue: None,
        raising,
        round_target: None,
        is_portfolio: true,
        deck_updated_at: None,
        as_of: now(),
        provenance: Provenance::Crm,
    }
}

/// Active goal of the given type due `due_days` after `now`.
#[must_use]
pub fn goal(id: &str, company_id: &str, goal_type: GoalType, due_days: i64) -> Goal {
    Goal {
        id: id.into(),
        company_id: company_id.into(),
        goal_type,
        target: 1_000_000.0,
        current: 100_000.0,
        due: now().plus_days(due_days),
        status: GoalStatus::Active,
        weight: None,
    }
}

/// Person at an organization.
#[must_use]
pub fn person(id: &str, org_id: &str, org_kind: OrgKind, tags: &[&str]) -> Person {
    Person {
        id: id.into(),
        name: format!("Person {id}"),
        org_id: org_id.to_string(),
        org_kind,
        role: "operator".into(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}

/// Fresh, strong relationship edge.
#[must_use]
pub fn edge(id: &str, from: &str, to: &str, strength: f64) -> Relationship {
    Relationship {
        id: id.into(),
        from_person_id: from.into(),
        to_person_id: to.into(),
        kind: RelationshipKind::Professional,
        strength,
        last_touch_at: now().plus_days(-5),
        intros_asked_90d: 0,
        intros_received: 0,
    }
}

/// Terminal introduction outcome for calibration fixtures.
#[must_use]
pub fn intro_outcome(id: &str, introducer: &str, status: IntroStatus) -> IntroOutcome {
    IntroOutcome {
        id: id.into(),
        introducer_id: introducer.into(),
        target_id: "target".into(),
        path_type: IntroPathType::Direct,
        kind: IntroKind::Fundraise,
        status,
    }
}

/// Scenario graph: runway-cliff company, optionally with an active
/// fundraise goal and an investor network.
#[must_use]
pub fn cliff_graph(with_fundraise_goal: bool, with_network: bool) -> RawGraph {
    let mut graph = RawGraph {
        companies: vec![company("c1", 20_000.0, 10_000.0, false)],
        ..RawGraph::default()
    };
    if with_fundraise_goal {
        graph.goals.push(goal("g1", "c1", GoalType::Fundraise, 90));
    }
    if with_network {
        graph.people.push(person("founder", "c1", OrgKind::Company, &[]));
        graph.people.push(person("angel", "ext", OrgKind::Investor, &["investor"]));
        graph.relationships.push(edge("r1", "founder", "angel", 85.0));
    }
    graph
}

/// Healthy single-goal graph for the structural three-per-goal scenario.
#[must_use]
pub fn healthy_single_goal_graph(goal_type: GoalType) -> RawGraph {
    RawGraph {
        companies: vec![company("c1", 1_800_000.0, 100_000.0, false)],
        goals: vec![goal("g1", "c1", goal_type, 90)],
        ..RawGraph::default()
    }
}
