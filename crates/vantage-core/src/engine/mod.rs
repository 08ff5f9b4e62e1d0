// crates/vantage-core/src/engine/mod.rs
// ============================================================================
// Module: Vantage Engine Orchestration
// Description: The compute pipeline sequencing raw, derive, predict, decide.
// Purpose: One pure, deterministic call from raw graph to ranked output.
// Dependencies: crate::core, crate::derive, crate::predict, crate::decide, submodules
// ============================================================================

//! ## Overview
//! `Engine::compute` is referentially transparent: identical `(raw, now,
//! options)` produce byte-identical output. The pipeline validates raw input
//! fail-closed, derives per-company state in identifier order, predicts
//! issues and opportunities, attaches impact models, applies gates and
//! suppression, and emits one totally ordered action list with a full audit
//! trail. Non-fatal findings become warnings in metadata; fatal findings
//! abort with typed errors and no partial output.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod export;
pub mod output;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::ActionEvent;
use crate::core::CompanyId;
use crate::core::DismissalEvent;
use crate::core::EngineSettings;
use crate::core::GoalId;
use crate::core::GraphError;
use crate::core::HashError;
use crate::core::PolicyError;
use crate::core::RawGraph;
use crate::core::RawIndex;
use crate::core::Timestamp;
use crate::core::canonical_digest;
use crate::core::policy;
use crate::core::validate_event_log;
use crate::decide::GateLevel;
use crate::decide::ImpactContext;
use crate::decide::RankedAction;
use crate::decide::ScoreInputs;
use crate::decide::action_gate;
use crate::decide::assign_ranks;
use crate::decide::attach_impact;
use crate::decide::compute_obviousness;
use crate::decide::evaluate_company_gate;
use crate::decide::friction_by_resolution;
use crate::decide::friction_for;
use crate::decide::pattern_lift_by_resolution;
use crate::decide::populate_unblocks;
use crate::decide::score_action;
use crate::decide::validate_proactivity;
use crate::derive::ActionContextSeed;
use crate::derive::GoalObservation;
use crate::derive::HealthBand;
use crate::derive::Trajectory;
use crate::derive::deadlines_by_action;
use crate::derive::derive_health;
use crate::derive::derive_runway;
use crate::derive::derive_trajectory;
use crate::derive::detect_anomalies;
use crate::derive::tracking_metric;
use crate::derive::trust_risk_by_action;
use crate::predict::ActionCandidate;
use crate::predict::ActionSource;
use crate::predict::IntroPriors;
use crate::predict::aggregate_ripple;
use crate::predict::candidates_from_goals;
use crate::predict::candidates_from_intros;
use crate::predict::candidates_from_issues;
use crate::predict::candidates_from_preissues;
use crate::predict::dedupe_candidates;
use crate::predict::detect_issues;
use crate::predict::detect_preissues;
use crate::predict::generate_intro_opportunities;
use crate::predict::suppress_noisy_second_order;

use self::output::CompanyDerived;
use self::output::CompanyOutput;
use self::output::EngineMeta;
use self::output::EngineOutput;
use self::output::HealthCounts;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal compute errors; no partial output is produced.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Raw input carries derived state or a blacklisted payload key.
    #[error(transparent)]
    Policy(#[from] PolicyError),
    /// Raw graph or event log failed structural validation.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Canonical hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// Raw input could not be rendered as JSON for the policy scan.
    #[error("raw input serialization failed: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Compute Options
// ============================================================================

/// Per-call context beyond the raw graph.
///
/// # Invariants
/// - `events` is a point-in-time snapshot in append order.
#[derive(Debug, Clone, Default)]
pub struct ComputeOptions {
    /// Action event log snapshot.
    pub events: Vec<ActionEvent>,
    /// Dismissal history.
    pub dismissals: Vec<DismissalEvent>,
    /// Explicitly focused entity identifiers.
    pub focus_entities: Vec<String>,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// The portfolio decision engine.
///
/// # Invariants
/// - Settings are immutable for the engine's lifetime.
/// - `compute` never mutates its inputs and never reads wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Immutable settings bundle.
    settings: EngineSettings,
}

impl Engine {
    /// Creates an engine with the provided settings.
    #[must_use]
    pub const fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Returns the engine's settings.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Runs the full pipeline over a raw graph at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on forbidden derived fields in raw input,
    /// referential or append-order violations, blacklisted event payload
    /// keys, or canonical hashing failure. No partial output is produced.
    #[allow(clippy::too_many_lines, reason = "The orchestration sequence reads top to bottom.")]
    pub fn compute(
        &self,
        raw: &RawGraph,
        now: Timestamp,
        options: &ComputeOptions,
    ) -> Result<EngineOutput, EngineError> {
        let assumptions = &self.settings.assumptions;
        let weights = &self.settings.weights;
        let mut warnings: Vec<String> = Vec::new();

        // Stage 1: fail-closed validation of everything raw.
        let raw_value =
            serde_json::to_value(raw).map_err(|err| EngineError::Serialize(err.to_string()))?;
        policy::validate_no_forbidden_fields(&raw_value)?;
        if !self.settings.extra_forbidden_fields.is_empty() {
            let extra: Vec<&str> =
                self.settings.extra_forbidden_fields.iter().map(String::as_str).collect();
            if let Some(hit) = policy::scan_keys(&raw_value, &extra).into_iter().next() {
                return Err(EngineError::Policy(PolicyError::ForbiddenField {
                    path: hit.path,
                    key: hit.key,
                }));
            }
        }
        raw.validate()?;
        validate_event_log(&options.events)?;
        for event in &options.events {
            policy::validate_event_payload(event)?;
        }
        let input_hash = canonical_digest(raw)?;

        // Stage 2: run-wide indexes and history statistics.
        let index = RawIndex::build(raw);
        let priors = IntroPriors::from_outcomes(&raw.intro_outcomes, assumptions);
        let pattern_lift =
            pattern_lift_by_resolution(&options.events, weights.pattern_min_samples);
        let friction_map =
            friction_by_resolution(&options.events, weights.friction_min_samples);

        // Stage 3: per-company derivation and prediction, identifier order.
        let mut companies = Vec::new();
        let mut preissues_all = Vec::new();
        let mut candidates: Vec<ActionCandidate> = Vec::new();
        let mut health_bands: BTreeMap<CompanyId, HealthBand> = BTreeMap::new();
        let mut health_counts = HealthCounts::default();
        let mut company_gates: BTreeMap<CompanyId, Option<GateLevel>> = BTreeMap::new();
        let mut trajectories_by_goal: BTreeMap<GoalId, Trajectory> = BTreeMap::new();
        let mut goal_dues: BTreeMap<GoalId, Timestamp> = BTreeMap::new();
        let mut second_order_considered = 0u32;
        let mut second_order_passed = 0u32;
        let mut intro_opportunities = Vec::new();

        for company in index.portfolio_companies() {
            let runway = derive_runway(&index, company, assumptions, now);
            let health = derive_health(&runway);
            health_counts.tally(health.band);
            health_bands.insert(company.id.clone(), health.band);

            let mut trajectories = Vec::new();
            for goal in index.open_goals_for(&company.id) {
                goal_dues.insert(goal.id.clone(), goal.due);
                let observations = goal_observations(&index, company, goal);
                let trajectory = derive_trajectory(goal, &observations, now);
                trajectories_by_goal.insert(goal.id.clone(), trajectory.clone());
                trajectories.push(trajectory);
            }

            let anomalies = detect_anomalies(&index, company, &self.settings.stage_overrides);
            let issues =
                detect_issues(&index, company, &runway, &trajectories, assumptions, now);
            let preissues =
                detect_preissues(&index, company, &runway, &trajectories, assumptions, now);
            let ripple = aggregate_ripple(&issues);
            let gate = evaluate_company_gate(&index, company, &runway, assumptions, now);
            company_gates.insert(company.id.clone(), gate);

            let generation = generate_intro_opportunities(
                &index,
                company,
                &trajectories,
                &priors,
                assumptions,
                now,
            );
            second_order_considered += generation.second_order_considered;
            second_order_passed += generation.second_order_passed;
            intro_opportunities.push((company.id.clone(), company.name.clone(), generation));

            candidates.extend(candidates_from_issues(&issues, &company.name));
            candidates.extend(candidates_from_preissues(&preissues, &company.name));
            candidates.extend(candidates_from_goals(&index, &company.id));

            preissues_all.extend(preissues.clone());
            companies.push(CompanyOutput {
                id: company.id.clone(),
                name: company.name.clone(),
                derived: CompanyDerived {
                    runway,
                    health,
                    trajectories,
                    anomalies,
                    issues,
                    ripple,
                    gate,
                },
            });
        }

        // Stage 3b: run-wide second-order suppression, then intro candidates.
        for (_, company_name, generation) in &mut intro_opportunities {
            let suppressed = suppress_noisy_second_order(
                &mut generation.opportunities,
                second_order_considered,
                second_order_passed,
                assumptions.second_order_min_pass_rate,
            );
            if suppressed && !warnings.iter().any(|w| w.contains("second-order")) {
                warnings.push(
                    "second-order introductions suppressed for this run: noise exceeded signal"
                        .to_string(),
                );
            }
            candidates
                .extend(candidates_from_intros(&generation.opportunities, company_name));
        }

        // Stage 4: context maps, gates, impact, obviousness, scoring.
        let mut candidates = dedupe_candidates(candidates);
        populate_unblocks(&mut candidates);

        let seeds: Vec<ActionContextSeed> = candidates
            .iter()
            .map(|candidate| ActionContextSeed {
                action_id: candidate.id.clone(),
                resolution_id: candidate.resolution_id.clone(),
                company_id: Some(candidate.company_id.clone()),
                deadlines: candidate_deadlines(candidate, &goal_dues),
            })
            .collect();
        let trust_map = trust_risk_by_action(&seeds, &options.events, &health_bands);
        let deadline_map = deadlines_by_action(&seeds, now);

        let impact_context = ImpactContext {
            index: &index,
            trajectories: &trajectories_by_goal,
            pattern_lift: &pattern_lift,
            settings: &self.settings,
        };

        let known_ids: BTreeSet<&str> =
            candidates.iter().map(|candidate| candidate.id.as_str()).collect();
        let orphaned = options
            .events
            .iter()
            .filter(|event| !known_ids.contains(event.action_id.as_str()))
            .count();
        if orphaned > 0 {
            warnings.push(format!(
                "{orphaned} event(s) reference action ids outside this run's candidate set"
            ));
        }

        let mut actions: Vec<RankedAction> = Vec::new();
        for candidate in candidates {
            let impact = attach_impact(&candidate, &impact_context);
            let trust_risk = intro_trust_override(&candidate)
                .or_else(|| trust_map.get(&candidate.id).copied())
                .unwrap_or(0.0);
            let inputs = ScoreInputs {
                trust_risk,
                friction: friction_for(&friction_map, candidate.resolution_id.as_str()),
                deadline_days: deadline_map.get(&candidate.id).copied(),
                obviousness: compute_obviousness(
                    &candidate,
                    &options.dismissals,
                    &options.events,
                    &options.focus_entities,
                    weights.obviousness_cap,
                    now,
                ),
                gate: action_gate(
                    &candidate,
                    company_gates.get(&candidate.company_id).copied().flatten(),
                ),
            };
            actions.push(score_action(candidate, impact, &inputs, &self.settings));
        }

        // Stage 5: the single ordering surface, then validation.
        assign_ranks(&mut actions);
        let active_gate = company_gates.values().filter_map(|gate| *gate).max();
        let opportunity_flags: Vec<bool> =
            actions.iter().map(RankedAction::is_opportunity_sourced).collect();
        let proactivity = validate_proactivity(&opportunity_flags, active_gate, weights);
        if !proactivity.satisfied {
            warnings.push(format!(
                "proactivity below target: {:.2} observed vs {:.2} required in top {}",
                proactivity.observed, proactivity.target, proactivity.inspected
            ));
        }

        preissues_all.sort_by(|a, b| {
            a.company_id.cmp(&b.company_id).then_with(|| a.kind.cmp(&b.kind)).then_with(|| {
                a.goal_id.cmp(&b.goal_id).then_with(|| a.deal_id.cmp(&b.deal_id))
            })
        });

        Ok(EngineOutput {
            companies,
            actions,
            preissues: preissues_all,
            meta: EngineMeta {
                computed_at: now,
                duration_ms: 0,
                input_hash,
                health_counts,
                layers_executed: vec![
                    "raw".to_string(),
                    "derive".to_string(),
                    "predict".to_string(),
                    "decide".to_string(),
                ],
                proactivity,
                errors: Vec::new(),
                warnings,
            },
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Goal progress observations: the tracking metric series, else the goal's
/// own current-value point.
fn goal_observations(
    index: &RawIndex<'_>,
    company: &crate::core::Company,
    goal: &crate::core::Goal,
) -> Vec<GoalObservation> {
    if let Some(key) = tracking_metric(goal.goal_type) {
        let series = index.metric_series(&company.id, key);
        if !series.is_empty() {
            return series
                .iter()
                .map(|fact| GoalObservation { at: fact.as_of, value: fact.value })
                .collect();
        }
    }
    vec![GoalObservation { at: company.as_of, value: goal.current }]
}

/// Absolute deadlines applicable to a candidate: its goal's due date plus
/// any pre-issue escalation dates among its sources.
fn candidate_deadlines(
    candidate: &ActionCandidate,
    goal_dues: &BTreeMap<GoalId, Timestamp>,
) -> Vec<Timestamp> {
    let mut deadlines = Vec::new();
    if let Some(goal_id) = &candidate.goal_id
        && let Some(due) = goal_dues.get(goal_id)
    {
        deadlines.push(*due);
    }
    for source in &candidate.sources {
        if let ActionSource::Preissue { escalation_at, .. } = source {
            deadlines.push(*escalation_at);
        }
    }
    deadlines
}

/// Introduction actions carry their own trust-risk score on the source.
fn intro_trust_override(candidate: &ActionCandidate) -> Option<f64> {
    candidate.sources.iter().find_map(|source| match source {
        ActionSource::Introduction { trust_score, .. } => Some(trust_score / 100.0),
        _ => None,
    })
}
