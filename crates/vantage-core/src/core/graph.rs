// crates/vantage-core/src/core/graph.rs
// ============================================================================
// Module: Vantage Raw Graph
// Description: Owning raw entity collections, referential validation, indexes.
// Purpose: Provide the immutable, validated input snapshot for one compute run.
// Dependencies: crate::core::{entities, events, identifiers, metrics, time}, serde, thiserror
// ============================================================================

//! ## Overview
//! The raw graph owns every raw entity collection for a run. It is a value
//! type: the engine never mutates it, and all cross-entity references are
//! resolved through [`RawIndex`], which is built once per run and iterates
//! in identifier order so downstream output is deterministic.
//!
//! Validation is fail-closed: dangling references, duplicate metric
//! observations, and malformed event logs abort the run before derivation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::entities::Company;
use crate::core::entities::Deal;
use crate::core::entities::Firm;
use crate::core::entities::Goal;
use crate::core::entities::GoalStatus;
use crate::core::entities::Meeting;
use crate::core::entities::Person;
use crate::core::entities::Relationship;
use crate::core::entities::Round;
use crate::core::events::ActionEvent;
use crate::core::events::IntroOutcome;
use crate::core::identifiers::CompanyId;
use crate::core::identifiers::EventId;
use crate::core::identifiers::FirmId;
use crate::core::identifiers::PersonId;
use crate::core::metrics::MetricFact;
use crate::core::metrics::MetricKey;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Raw graph validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Every variant names the offending identifier for caller context.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An entity references an identifier that does not resolve.
    #[error("{kind} {id} references missing {missing}")]
    InvalidReference {
        /// Kind of the referencing entity.
        kind: &'static str,
        /// Identifier of the referencing entity.
        id: String,
        /// Description of the missing reference.
        missing: String,
    },
    /// Two metric facts share `(company, key, asOf)`.
    #[error("duplicate metric observation for {company_id} {key} at {as_of}")]
    DuplicateMetricFact {
        /// Company identifier.
        company_id: String,
        /// Metric key label.
        key: &'static str,
        /// Observation timestamp in unix millis.
        as_of: i64,
    },
    /// A metric fact carries a non-finite value.
    #[error("non-finite metric value for fact {0}")]
    NonFiniteMetric(String),
    /// Two events share an identifier.
    #[error("duplicate event id {0}")]
    DuplicateEventId(EventId),
    /// Event log is not in append order.
    #[error("event {0} is out of append order")]
    EventOutOfOrder(EventId),
}

// ============================================================================
// SECTION: Raw Graph
// ============================================================================

/// Immutable raw entity graph for one compute run.
///
/// # Invariants
/// - Collections are facts only; derived values are unrepresentable.
/// - The graph is validated before any derivation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGraph {
    /// Companies.
    pub companies: Vec<Company>,
    /// People.
    pub people: Vec<Person>,
    /// Firms.
    pub firms: Vec<Firm>,
    /// Fundraising rounds.
    pub rounds: Vec<Round>,
    /// Deals.
    pub deals: Vec<Deal>,
    /// Goals.
    pub goals: Vec<Goal>,
    /// Relationship edges.
    pub relationships: Vec<Relationship>,
    /// Metric observation time series.
    pub metric_facts: Vec<MetricFact>,
    /// Meeting notes.
    pub meetings: Vec<Meeting>,
    /// Recorded introduction outcomes.
    pub intro_outcomes: Vec<IntroOutcome>,
}

// ============================================================================
// SECTION: Raw Index
// ============================================================================

/// Identifier-ordered lookup index over a [`RawGraph`].
///
/// # Invariants
/// - Built once per run; all iteration orders are identifier-ascending.
/// - Metric positions per `(company, key)` are sorted by `asOf` ascending.
#[derive(Debug)]
pub struct RawIndex<'a> {
    /// The indexed graph.
    graph: &'a RawGraph,
    /// Company positions by identifier.
    companies: BTreeMap<&'a CompanyId, usize>,
    /// Person positions by identifier.
    people: BTreeMap<&'a PersonId, usize>,
    /// Firm positions by identifier.
    firms: BTreeMap<&'a FirmId, usize>,
    /// Round positions by identifier.
    rounds: BTreeMap<&'a str, usize>,
    /// Goal positions per company, in input order.
    goals_by_company: BTreeMap<&'a CompanyId, Vec<usize>>,
    /// Deal positions per company, in input order.
    deals_by_company: BTreeMap<&'a CompanyId, Vec<usize>>,
    /// Round positions per company, in input order.
    rounds_by_company: BTreeMap<&'a CompanyId, Vec<usize>>,
    /// Metric fact positions per `(company, key)`, sorted by `asOf`.
    facts_by_series: BTreeMap<(CompanyId, MetricKey), Vec<usize>>,
}

impl<'a> RawIndex<'a> {
    /// Builds the index for a graph.
    #[must_use]
    pub fn build(graph: &'a RawGraph) -> Self {
        let mut companies = BTreeMap::new();
        for (pos, company) in graph.companies.iter().enumerate() {
            companies.insert(&company.id, pos);
        }
        let mut people = BTreeMap::new();
        for (pos, person) in graph.people.iter().enumerate() {
            people.insert(&person.id, pos);
        }
        let mut firms = BTreeMap::new();
        for (pos, firm) in graph.firms.iter().enumerate() {
            firms.insert(&firm.id, pos);
        }
        let mut rounds = BTreeMap::new();
        let mut rounds_by_company: BTreeMap<&CompanyId, Vec<usize>> = BTreeMap::new();
        for (pos, round) in graph.rounds.iter().enumerate() {
            rounds.insert(round.id.as_str(), pos);
            rounds_by_company.entry(&round.company_id).or_default().push(pos);
        }
        let mut goals_by_company: BTreeMap<&CompanyId, Vec<usize>> = BTreeMap::new();
        for (pos, goal) in graph.goals.iter().enumerate() {
            goals_by_company.entry(&goal.company_id).or_default().push(pos);
        }
        let mut deals_by_company: BTreeMap<&CompanyId, Vec<usize>> = BTreeMap::new();
        for (pos, deal) in graph.deals.iter().enumerate() {
            deals_by_company.entry(&deal.company_id).or_default().push(pos);
        }
        let mut facts_by_series: BTreeMap<(CompanyId, MetricKey), Vec<usize>> = BTreeMap::new();
        for (pos, fact) in graph.metric_facts.iter().enumerate() {
            facts_by_series.entry((fact.company_id.clone(), fact.key)).or_default().push(pos);
        }
        for positions in facts_by_series.values_mut() {
            positions.sort_by_key(|pos| {
                graph.metric_facts.get(*pos).map_or(Timestamp::default(), |fact| fact.as_of)
            });
        }
        Self {
            graph,
            companies,
            people,
            firms,
            rounds,
            goals_by_company,
            deals_by_company,
            rounds_by_company,
            facts_by_series,
        }
    }

    /// Returns the indexed graph.
    #[must_use]
    pub const fn graph(&self) -> &'a RawGraph {
        self.graph
    }

    /// Looks up a company by identifier.
    #[must_use]
    pub fn company(&self, id: &CompanyId) -> Option<&'a Company> {
        self.companies.get(id).and_then(|pos| self.graph.companies.get(*pos))
    }

    /// Looks up a person by identifier.
    #[must_use]
    pub fn person(&self, id: &PersonId) -> Option<&'a Person> {
        self.people.get(id).and_then(|pos| self.graph.people.get(*pos))
    }

    /// Looks up a firm by identifier.
    #[must_use]
    pub fn firm(&self, id: &FirmId) -> Option<&'a Firm> {
        self.firms.get(id).and_then(|pos| self.graph.firms.get(*pos))
    }

    /// Looks up a round by identifier.
    #[must_use]
    pub fn round(&self, id: &crate::core::identifiers::RoundId) -> Option<&'a Round> {
        self.rounds.get(id.as_str()).and_then(|pos| self.graph.rounds.get(*pos))
    }

    /// Returns portfolio companies in identifier order.
    #[must_use]
    pub fn portfolio_companies(&self) -> Vec<&'a Company> {
        self.companies
            .values()
            .filter_map(|pos| self.graph.companies.get(*pos))
            .filter(|company| company.is_portfolio)
            .collect()
    }

    /// Returns a company's goals in input (ownership) order.
    #[must_use]
    pub fn goals_for(&self, id: &CompanyId) -> Vec<&'a Goal> {
        self.goals_by_company
            .get(id)
            .map(|positions| positions.iter().filter_map(|pos| self.graph.goals.get(*pos)).collect())
            .unwrap_or_default()
    }

    /// Returns a company's active or blocked goals in ownership order.
    #[must_use]
    pub fn open_goals_for(&self, id: &CompanyId) -> Vec<&'a Goal> {
        self.goals_for(id)
            .into_iter()
            .filter(|goal| matches!(goal.status, GoalStatus::Active | GoalStatus::Blocked))
            .collect()
    }

    /// Returns a company's deals in input order.
    #[must_use]
    pub fn deals_for(&self, id: &CompanyId) -> Vec<&'a Deal> {
        self.deals_by_company
            .get(id)
            .map(|positions| positions.iter().filter_map(|pos| self.graph.deals.get(*pos)).collect())
            .unwrap_or_default()
    }

    /// Returns a company's rounds in input order.
    #[must_use]
    pub fn rounds_for(&self, id: &CompanyId) -> Vec<&'a Round> {
        self.rounds_by_company
            .get(id)
            .map(|positions| positions.iter().filter_map(|pos| self.graph.rounds.get(*pos)).collect())
            .unwrap_or_default()
    }

    /// Returns the observation series for a `(company, key)` pair, oldest first.
    #[must_use]
    pub fn metric_series(&self, id: &CompanyId, key: MetricKey) -> Vec<&'a MetricFact> {
        self.facts_by_series
            .get(&(id.clone(), key))
            .map(|positions| {
                positions.iter().filter_map(|pos| self.graph.metric_facts.get(*pos)).collect()
            })
            .unwrap_or_default()
    }

    /// Returns the latest observation for a `(company, key)` pair.
    #[must_use]
    pub fn latest_metric(&self, id: &CompanyId, key: MetricKey) -> Option<&'a MetricFact> {
        self.metric_series(id, key).last().copied()
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl RawGraph {
    /// Validates referential integrity and metric uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] encountered; the run must not proceed.
    pub fn validate(&self) -> Result<(), GraphError> {
        let index = RawIndex::build(self);
        for round in &self.rounds {
            if index.company(&round.company_id).is_none() {
                return Err(GraphError::InvalidReference {
                    kind: "round",
                    id: round.id.to_string(),
                    missing: format!("company {}", round.company_id),
                });
            }
            if let Some(lead) = &round.lead_firm_id
                && index.firm(lead).is_none()
            {
                return Err(GraphError::InvalidReference {
                    kind: "round",
                    id: round.id.to_string(),
                    missing: format!("firm {lead}"),
                });
            }
        }
        for deal in &self.deals {
            if !index.rounds.contains_key(deal.round_id.as_str()) {
                return Err(GraphError::InvalidReference {
                    kind: "deal",
                    id: deal.id.to_string(),
                    missing: format!("round {}", deal.round_id),
                });
            }
            if index.company(&deal.company_id).is_none() {
                return Err(GraphError::InvalidReference {
                    kind: "deal",
                    id: deal.id.to_string(),
                    missing: format!("company {}", deal.company_id),
                });
            }
            if index.firm(&deal.firm_id).is_none() {
                return Err(GraphError::InvalidReference {
                    kind: "deal",
                    id: deal.id.to_string(),
                    missing: format!("firm {}", deal.firm_id),
                });
            }
        }
        for goal in &self.goals {
            if index.company(&goal.company_id).is_none() {
                return Err(GraphError::InvalidReference {
                    kind: "goal",
                    id: goal.id.to_string(),
                    missing: format!("company {}", goal.company_id),
                });
            }
        }
        for relationship in &self.relationships {
            for endpoint in [&relationship.from_person_id, &relationship.to_person_id] {
                if index.person(endpoint).is_none() {
                    return Err(GraphError::InvalidReference {
                        kind: "relationship",
                        id: relationship.id.to_string(),
                        missing: format!("person {endpoint}"),
                    });
                }
            }
        }
        let mut seen = BTreeSet::new();
        for fact in &self.metric_facts {
            if !fact.value.is_finite() {
                return Err(GraphError::NonFiniteMetric(fact.id.to_string()));
            }
            if index.company(&fact.company_id).is_none() {
                return Err(GraphError::InvalidReference {
                    kind: "metricFact",
                    id: fact.id.to_string(),
                    missing: format!("company {}", fact.company_id),
                });
            }
            let slot = (fact.company_id.clone(), fact.key, fact.as_of);
            if !seen.insert(slot) {
                return Err(GraphError::DuplicateMetricFact {
                    company_id: fact.company_id.to_string(),
                    key: fact.key.as_str(),
                    as_of: fact.as_of.as_unix_millis(),
                });
            }
        }
        Ok(())
    }
}

/// Validates the append-only discipline of an event log snapshot.
///
/// Identifiers must be unique and timestamps must be non-decreasing.
///
/// # Errors
///
/// Returns [`GraphError::DuplicateEventId`] or [`GraphError::EventOutOfOrder`].
pub fn validate_event_log(events: &[ActionEvent]) -> Result<(), GraphError> {
    let mut seen = BTreeSet::new();
    let mut last = None;
    for event in events {
        if !seen.insert(event.id.clone()) {
            return Err(GraphError::DuplicateEventId(event.id.clone()));
        }
        if let Some(previous) = last
            && event.at < previous
        {
            return Err(GraphError::EventOutOfOrder(event.id.clone()));
        }
        last = Some(event.at);
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::entities::Goal;
    use crate::core::entities::GoalStatus;
    use crate::core::entities::GoalType;
    use crate::core::events::ActionEvent;
    use crate::core::events::ActionEventKind;
    use crate::core::time::Timestamp;

    use super::RawGraph;
    use super::validate_event_log;

    /// Minimal goal referencing a company that does not exist.
    fn dangling_goal() -> Goal {
        Goal {
            id: "g1".into(),
            company_id: "missing".into(),
            goal_type: GoalType::Revenue,
            target: 100.0,
            current: 10.0,
            due: Timestamp::from_unix_millis(0),
            status: GoalStatus::Active,
            weight: None,
        }
    }

    #[test]
    fn dangling_goal_reference_fails_validation() {
        let graph = RawGraph { goals: vec![dangling_goal()], ..RawGraph::default() };
        let error = graph.validate().unwrap_err();
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn duplicate_event_ids_are_rejected() {
        let event = ActionEvent {
            id: "e1".into(),
            action_id: "a1".into(),
            kind: ActionEventKind::Created,
            at: Timestamp::from_unix_millis(10),
            actor: "ops".into(),
            payload: std::collections::BTreeMap::new(),
        };
        let error = validate_event_log(&[event.clone(), event]).unwrap_err();
        assert!(error.to_string().contains("duplicate event id"));
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let first = ActionEvent {
            id: "e1".into(),
            action_id: "a1".into(),
            kind: ActionEventKind::Created,
            at: Timestamp::from_unix_millis(10),
            actor: "ops".into(),
            payload: std::collections::BTreeMap::new(),
        };
        let second = ActionEvent {
            id: "e2".into(),
            at: Timestamp::from_unix_millis(5),
            ..first.clone()
        };
        let error = validate_event_log(&[first, second]).unwrap_err();
        assert!(error.to_string().contains("append order"));
    }
}
