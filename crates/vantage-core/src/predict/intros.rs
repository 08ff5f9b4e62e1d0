// crates/vantage-core/src/predict/intros.rs
// ============================================================================
// Module: Vantage Introduction Opportunities
// Description: Goal-driven introduction path search over the relationship graph.
// Purpose: Generate the proactive half of candidate generation.
// Dependencies: crate::core, crate::predict::{calibration, trust}, serde, time
// ============================================================================

//! ## Overview
//! For each open goal of an introduction-relevant type, the generator walks
//! the bidirectional relationship graph from the company's people up to two
//! hops, keeps targets that match the goal, scores each path by the
//! geometric mean of edge strengths with a length penalty, attaches trust
//! risk and a calibrated probability, and decides a timing state from
//! weighted evidence. Uncertainty defaults to LATER; prohibitive trust risk
//! forces NEVER. Second-order paths must clear a conversion lift threshold,
//! and the whole second-order feature is suppressed for the run when most
//! of its candidates fail the bar.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::Assumptions;
use crate::core::Company;
use crate::core::CompanyId;
use crate::core::FirmId;
use crate::core::Goal;
use crate::core::GoalId;
use crate::core::GoalType;
use crate::core::IntroKind;
use crate::core::IntroOutcome;
use crate::core::IntroPathType;
use crate::core::OrgKind;
use crate::core::Person;
use crate::core::PersonId;
use crate::core::RawIndex;
use crate::core::Relationship;
use crate::core::Timestamp;
use crate::derive::Trajectory;
use crate::predict::calibration::IntroPriors;
use crate::predict::trust::IntroducerRecord;
use crate::predict::trust::TrustInput;
use crate::predict::trust::TrustRisk;
use crate::predict::trust::compute_trust_risk;

// ============================================================================
// SECTION: Timing
// ============================================================================

/// Timing state for an introduction opportunity.
///
/// # Invariants
/// - `Later` is the default under uncertainty; `Never` is forced by
///   prohibitive trust risk and zeroes upside downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntroTiming {
    /// Act now.
    Now,
    /// Act within the next few weeks.
    Soon,
    /// Park it.
    Later,
    /// Do not make this introduction.
    Never,
}

impl IntroTiming {
    /// Returns a stable label for the timing state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Now => "NOW",
            Self::Soon => "SOON",
            Self::Later => "LATER",
            Self::Never => "NEVER",
        }
    }

    /// Upside multiplier applied by the impact model.
    #[must_use]
    pub const fn upside_multiplier(self) -> f64 {
        match self {
            Self::Now => 1.2,
            Self::Soon => 1.0,
            Self::Later => 0.7,
            Self::Never => 0.0,
        }
    }
}

// ============================================================================
// SECTION: Opportunity
// ============================================================================

/// A scored introduction opportunity.
///
/// # Invariants
/// - `rationale` is always populated and names goal, target relevance, path,
///   risk band, and timing cause.
/// - `hops` is 1 or 2; `via` is set exactly for two-hop paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroOpportunity {
    /// Company the introduction serves.
    pub company_id: CompanyId,
    /// Goal the introduction serves.
    pub goal_id: GoalId,
    /// Introduction kind.
    pub kind: IntroKind,
    /// First person asked.
    pub introducer_id: PersonId,
    /// Intermediary for two-hop paths.
    pub via: Option<PersonId>,
    /// Final target.
    pub target_id: PersonId,
    /// Path length in hops.
    pub hops: usize,
    /// Path type for calibration grouping.
    pub path_type: IntroPathType,
    /// Geometric-mean path score with length penalty, 0-1.
    pub path_score: f64,
    /// Expected conversion probability for the path.
    pub expected_conversion: f64,
    /// Trust-risk assessment.
    pub trust: TrustRisk,
    /// Calibrated success probability from priors.
    pub calibrated_probability: f64,
    /// Optionality gain from the target's own reach, 0-1.
    pub optionality_gain: f64,
    /// Timing state.
    pub timing: IntroTiming,
    /// Compulsory rationale.
    pub rationale: String,
}

/// Generator output with run-level second-order counters.
///
/// # Invariants
/// - `second_order_passed <= second_order_considered`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntroGeneration {
    /// Surfaced opportunities.
    pub opportunities: Vec<IntroOpportunity>,
    /// Two-hop candidates evaluated against the lift threshold.
    pub second_order_considered: u32,
    /// Two-hop candidates that passed the lift threshold.
    pub second_order_passed: u32,
}

// ============================================================================
// SECTION: Goal-to-Kind Mapping
// ============================================================================

/// Maps a goal type to the introduction kind that serves it.
#[must_use]
pub const fn intro_kind_for_goal(goal_type: GoalType) -> Option<IntroKind> {
    match goal_type {
        GoalType::Fundraise | GoalType::RoundCompletion | GoalType::InvestorActivation => {
            Some(IntroKind::Fundraise)
        }
        GoalType::Partnership => Some(IntroKind::Partnership),
        GoalType::Hiring => Some(IntroKind::Hiring),
        GoalType::IntroTarget => Some(IntroKind::Customer),
        GoalType::Revenue
        | GoalType::Product
        | GoalType::Operational
        | GoalType::Retention
        | GoalType::Efficiency
        | GoalType::CustomerGrowth
        | GoalType::DealClose
        | GoalType::ChampionCultivation
        | GoalType::RelationshipBuild => None,
    }
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates introduction opportunities for one company.
#[must_use]
pub fn generate_intro_opportunities(
    index: &RawIndex<'_>,
    company: &Company,
    trajectories: &[Trajectory],
    priors: &IntroPriors,
    assumptions: &Assumptions,
    now: Timestamp,
) -> IntroGeneration {
    let adjacency = build_adjacency(&index.graph().relationships);
    let records = introducer_records(&index.graph().intro_outcomes);
    let company_people: Vec<&Person> = index
        .graph()
        .people
        .iter()
        .filter(|person| person.org_kind == OrgKind::Company && person.org_id == company.id.as_str())
        .collect();

    let mut generation = IntroGeneration::default();
    let mut best: BTreeMap<(GoalId, PersonId), IntroOpportunity> = BTreeMap::new();

    for goal in index.open_goals_for(&company.id) {
        let Some(kind) = intro_kind_for_goal(goal.goal_type) else {
            continue;
        };
        for start in company_people.iter().copied() {
            for path in enumerate_paths(&adjacency, &start.id) {
                let Some(target) = index.person(&path.target) else {
                    continue;
                };
                if !target_matches(index, target, company, kind) {
                    continue;
                }
                let candidate = score_path(
                    index,
                    company,
                    goal,
                    kind,
                    start,
                    target,
                    &path,
                    &records,
                    priors,
                    trajectories,
                    assumptions,
                    now,
                );
                let Some(candidate) = candidate else {
                    continue;
                };
                if candidate.hops == 2 {
                    generation.second_order_considered += 1;
                    // Lift is measured against the baseline at the same hop
                    // count, so the hop decay cancels out of the comparison.
                    let hop_baseline = assumptions.intro_baseline_conversion
                        * assumptions.second_order_decay;
                    let lift_bar = assumptions.second_order_lift_threshold * hop_baseline;
                    if candidate.expected_conversion <= lift_bar {
                        continue;
                    }
                    generation.second_order_passed += 1;
                }
                let slot = (goal.id.clone(), candidate.target_id.clone());
                match best.get(&slot) {
                    Some(existing) if existing.path_score >= candidate.path_score => {}
                    _ => {
                        best.insert(slot, candidate);
                    }
                }
            }
        }
    }

    generation.opportunities = best.into_values().collect();
    generation
}

/// Drops all second-order opportunities when noise exceeds signal run-wide.
///
/// Returns true when suppression fired.
pub fn suppress_noisy_second_order(
    opportunities: &mut Vec<IntroOpportunity>,
    considered: u32,
    passed: u32,
    min_pass_rate: f64,
) -> bool {
    if considered == 0 {
        return false;
    }
    let pass_rate = f64::from(passed) / f64::from(considered);
    if pass_rate >= min_pass_rate {
        return false;
    }
    opportunities.retain(|opp| opp.path_type != IntroPathType::SecondOrder);
    true
}

// ============================================================================
// SECTION: Path Enumeration
// ============================================================================

/// One enumerated path from a company person to a potential target.
#[derive(Debug, Clone)]
struct Path {
    /// Edge sequence, introducer-first.
    edges: Vec<RelationshipRef>,
    /// Intermediary, for two-hop paths.
    via: Option<PersonId>,
    /// Final target person.
    target: PersonId,
}

/// Position of a relationship within the raw graph's edge list.
type RelationshipRef = usize;

/// Bidirectional adjacency: person to (neighbor, edge position) pairs.
fn build_adjacency(
    relationships: &[Relationship],
) -> BTreeMap<PersonId, Vec<(PersonId, RelationshipRef)>> {
    let mut adjacency: BTreeMap<PersonId, Vec<(PersonId, RelationshipRef)>> = BTreeMap::new();
    for (pos, edge) in relationships.iter().enumerate() {
        adjacency
            .entry(edge.from_person_id.clone())
            .or_default()
            .push((edge.to_person_id.clone(), pos));
        adjacency
            .entry(edge.to_person_id.clone())
            .or_default()
            .push((edge.from_person_id.clone(), pos));
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort();
    }
    adjacency
}

/// Enumerates one- and two-hop paths from a start person.
fn enumerate_paths(
    adjacency: &BTreeMap<PersonId, Vec<(PersonId, RelationshipRef)>>,
    start: &PersonId,
) -> Vec<Path> {
    let mut paths = Vec::new();
    let Some(first_hops) = adjacency.get(start) else {
        return paths;
    };
    for (neighbor, first_edge) in first_hops {
        if neighbor == start {
            continue;
        }
        paths.push(Path {
            edges: vec![*first_edge],
            via: None,
            target: neighbor.clone(),
        });
        let Some(second_hops) = adjacency.get(neighbor) else {
            continue;
        };
        for (second_neighbor, second_edge) in second_hops {
            if second_neighbor == start || second_neighbor == neighbor {
                continue;
            }
            paths.push(Path {
                edges: vec![*first_edge, *second_edge],
                via: Some(neighbor.clone()),
                target: second_neighbor.clone(),
            });
        }
    }
    paths
}

// ============================================================================
// SECTION: Target Matching
// ============================================================================

/// Whether a person is a sensible target for the introduction kind.
fn target_matches(
    index: &RawIndex<'_>,
    target: &Person,
    company: &Company,
    kind: IntroKind,
) -> bool {
    if target.org_kind == OrgKind::Company && target.org_id == company.id.as_str() {
        return false;
    }
    match kind {
        IntroKind::Fundraise => match target.org_kind {
            OrgKind::Investor => true,
            OrgKind::Firm => target_firm(index, target)
                .is_none_or(|firm| firm.stage_focus.is_empty() || firm.stage_focus.contains(&company.stage)),
            OrgKind::Company | OrgKind::External => false,
        },
        IntroKind::Partnership => {
            target.org_kind == OrgKind::Company || target.tags.iter().any(|tag| tag == "partner")
        }
        IntroKind::Hiring => target.tags.iter().any(|tag| tag == "candidate"),
        IntroKind::Customer => {
            target.tags.iter().any(|tag| tag == "buyer") || target.org_kind == OrgKind::Company
        }
    }
}

/// Resolves the firm a person sits at, when they sit at one.
fn target_firm<'a>(index: &RawIndex<'a>, person: &Person) -> Option<&'a crate::core::Firm> {
    if person.org_kind != OrgKind::Firm {
        return None;
    }
    index.firm(&FirmId::new(person.org_id.clone()))
}

// ============================================================================
// SECTION: Path Scoring
// ============================================================================

/// Scores one path into an opportunity; `None` when edges cannot resolve.
#[allow(clippy::too_many_arguments, reason = "Scoring reads the full predict context.")]
fn score_path(
    index: &RawIndex<'_>,
    company: &Company,
    goal: &Goal,
    kind: IntroKind,
    start: &Person,
    target: &Person,
    path: &Path,
    records: &BTreeMap<PersonId, IntroducerRecord>,
    priors: &IntroPriors,
    trajectories: &[Trajectory],
    assumptions: &Assumptions,
    now: Timestamp,
) -> Option<IntroOpportunity> {
    let relationships = &index.graph().relationships;
    let edges: Vec<&Relationship> =
        path.edges.iter().filter_map(|pos| relationships.get(*pos)).collect();
    if edges.len() != path.edges.len() || edges.is_empty() {
        return None;
    }

    let hops = edges.len();
    let path_type =
        if hops == 1 { IntroPathType::Direct } else { IntroPathType::SecondOrder };

    let normalized: Vec<f64> = edges.iter().map(|edge| (edge.strength / 100.0).clamp(0.0, 1.0)).collect();
    let chain_strength: f64 = normalized.iter().product();
    let geo_mean = chain_strength.powf(1.0 / hops_f64(hops));
    let length_penalty = assumptions.second_order_decay.powf(hops_f64(hops) - 1.0);
    let path_score = geo_mean * length_penalty;

    let avg_strength =
        edges.iter().map(|edge| edge.strength).sum::<f64>() / hops_f64(hops);
    let expected_conversion = assumptions.intro_baseline_conversion
        * chain_strength
        * assumptions.second_order_decay.powf(hops_f64(hops) - 1.0)
        * (avg_strength / 50.0);

    let record = records.get(&start.id).copied().unwrap_or_default();
    let trust_input = TrustInput {
        edges: &edges,
        introducer: start,
        target,
        target_firm: target_firm(index, target),
        company,
        kind,
        record,
    };
    let trust = compute_trust_risk(&trust_input, now);
    let calibrated =
        priors.calibrated_probability(&start.id, path_type, kind, assumptions);

    let degree = index
        .graph()
        .relationships
        .iter()
        .filter(|edge| edge.from_person_id == target.id || edge.to_person_id == target.id)
        .count();
    let optionality_gain = (degree_f64(degree) / 10.0).min(1.0);

    let trajectory = trajectories.iter().find(|t| t.goal_id == goal.id);
    let (timing, cause) = decide_timing(
        index, company, goal, kind, &trust, calibrated, trajectory, assumptions, now,
    );

    let path_label = path.via.as_ref().map_or_else(
        || format!("{} -> {}", start.name, target.name),
        |via| format!("{} -> {via} -> {}", start.name, target.name),
    );
    let rationale = format!(
        "goal {}: target {} fits {} search; path {path_label} ({hops} hop); trust {}; timing {}: {cause}",
        goal.goal_type.as_str(),
        target.name,
        kind_label(kind),
        trust.score.round(),
        timing.as_str(),
    );

    Some(IntroOpportunity {
        company_id: company.id.clone(),
        goal_id: goal.id.clone(),
        kind,
        introducer_id: start.id.clone(),
        via: path.via.clone(),
        target_id: target.id.clone(),
        hops,
        path_type,
        path_score,
        expected_conversion,
        trust,
        calibrated_probability: calibrated,
        optionality_gain,
        timing,
        rationale,
    })
}

/// Human label for an introduction kind.
const fn kind_label(kind: IntroKind) -> &'static str {
    match kind {
        IntroKind::Fundraise => "investor",
        IntroKind::Partnership => "partner",
        IntroKind::Hiring => "candidate",
        IntroKind::Customer => "customer",
    }
}

/// Introducer track records from recorded terminal outcomes.
fn introducer_records(outcomes: &[IntroOutcome]) -> BTreeMap<PersonId, IntroducerRecord> {
    let mut records: BTreeMap<PersonId, IntroducerRecord> = BTreeMap::new();
    for outcome in outcomes {
        if !outcome.status.is_terminal() {
            continue;
        }
        let record = records.entry(outcome.introducer_id.clone()).or_default();
        record.terminal_outcomes += 1;
        if outcome.status.is_success() {
            record.successes += 1;
        }
    }
    records
}

// ============================================================================
// SECTION: Timing Decision
// ============================================================================

/// Decides the timing state from weighted evidence.
#[allow(clippy::too_many_arguments, reason = "Timing weighs the full evidence set.")]
fn decide_timing(
    index: &RawIndex<'_>,
    company: &Company,
    goal: &Goal,
    kind: IntroKind,
    trust: &TrustRisk,
    calibrated: f64,
    trajectory: Option<&Trajectory>,
    _assumptions: &Assumptions,
    now: Timestamp,
) -> (IntroTiming, String) {
    if trust.score > 80.0 {
        return (IntroTiming::Never, "trust risk prohibitive".to_string());
    }

    let mut score = 0i32;
    let mut causes: Vec<&str> = Vec::new();

    let gap_ratio = if goal.target.abs() < f64::EPSILON {
        1.0
    } else {
        ((goal.target - goal.current) / goal.target).clamp(0.0, 1.0)
    };
    if gap_ratio > 0.5 {
        score += 2;
        causes.push("large goal gap");
    }

    let days_remaining = now.days_until(goal.due);
    if days_remaining < 30.0 {
        score += 3;
        causes.push("deadline inside 30 days");
    } else if days_remaining < 60.0 {
        score += 2;
        causes.push("deadline inside 60 days");
    }

    if trajectory.is_some_and(|t| t.velocity_per_day.is_some_and(|v| v <= 0.0)) {
        score += 1;
        causes.push("no goal velocity");
    }

    if kind == IntroKind::Fundraise {
        if fundraise_season(now) {
            score += 1;
            causes.push("fundraise season");
        }
        let active_deals = index
            .deals_for(&company.id)
            .iter()
            .filter(|deal| deal.status.is_active())
            .count();
        if active_deals == 0 {
            score += 1;
            causes.push("empty pipeline");
        }
    }

    if trust.score > 60.0 {
        score -= 2;
        causes.push("elevated trust risk");
    }
    if calibrated >= 0.3 {
        score += 1;
        causes.push("strong calibrated odds");
    }

    let timing = if score >= 5 {
        IntroTiming::Now
    } else if score >= 3 {
        IntroTiming::Soon
    } else {
        IntroTiming::Later
    };
    let cause = if causes.is_empty() { "no pressing evidence".to_string() } else { causes.join(", ") };
    (timing, cause)
}

/// September through November reads as fundraise season.
fn fundraise_season(now: Timestamp) -> bool {
    let nanos = i128::from(now.as_unix_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map(|datetime| {
            let month = u8::from(datetime.month());
            (9..=11).contains(&month)
        })
        .unwrap_or(false)
}

/// Hop count as f64 for ratio math.
#[allow(clippy::cast_precision_loss, reason = "hop counts are 1 or 2")]
fn hops_f64(hops: usize) -> f64 {
    hops as f64
}

/// Degree as f64 for ratio math.
#[allow(clippy::cast_precision_loss, reason = "graph degrees are small")]
fn degree_f64(degree: usize) -> f64 {
    degree as f64
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Assumptions;
    use crate::core::Company;
    use crate::core::Goal;
    use crate::core::GoalStatus;
    use crate::core::GoalType;
    use crate::core::OrgKind;
    use crate::core::Person;
    use crate::core::Provenance;
    use crate::core::RawGraph;
    use crate::core::RawIndex;
    use crate::core::Relationship;
    use crate::core::RelationshipKind;
    use crate::core::Stage;
    use crate::core::Timestamp;
    use crate::predict::calibration::IntroPriors;

    use super::IntroTiming;
    use super::generate_intro_opportunities;
    use super::suppress_noisy_second_order;

    /// Raising seed company with a fundraise goal.
    fn company() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: Some(500_000.0),
            burn: Some(50_000.0),
            employees: None,
            recurring: None,
            revenue: None,
            raising: true,
            round_target: Some(3_000_000.0),
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    /// Person fixture.
    fn person(id: &str, org_id: &str, org_kind: OrgKind, tags: &[&str]) -> Person {
        Person {
            id: id.into(),
            name: id.to_string(),
            org_id: org_id.to_string(),
            org_kind,
            role: "operator".into(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Strong, fresh edge fixture.
    fn edge(id: &str, from: &str, to: &str, strength: f64, now: Timestamp) -> Relationship {
        Relationship {
            id: id.into(),
            from_person_id: from.into(),
            to_person_id: to.into(),
            kind: RelationshipKind::Professional,
            strength,
            last_touch_at: now.plus_days(-5),
            intros_asked_90d: 0,
            intros_received: 0,
        }
    }

    /// Graph: founder at c1 knows an investor directly.
    fn graph(now: Timestamp) -> RawGraph {
        RawGraph {
            companies: vec![company()],
            people: vec![
                person("founder", "c1", OrgKind::Company, &[]),
                person("angel", "ext", OrgKind::Investor, &["investor"]),
            ],
            relationships: vec![edge("r1", "founder", "angel", 85.0, now)],
            goals: vec![Goal {
                id: "g1".into(),
                company_id: "c1".into(),
                goal_type: GoalType::Fundraise,
                target: 3_000_000.0,
                current: 0.0,
                due: now.plus_days(45),
                status: GoalStatus::Active,
                weight: None,
            }],
            ..RawGraph::default()
        }
    }

    #[test]
    fn direct_investor_path_is_surfaced_with_rationale() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let graph = graph(now);
        let index = RawIndex::build(&graph);
        let company = company();
        let generation = generate_intro_opportunities(
            &index,
            &company,
            &[],
            &IntroPriors::default(),
            &Assumptions::default(),
            now,
        );
        assert_eq!(generation.opportunities.len(), 1);
        let opp = &generation.opportunities[0];
        assert_eq!(opp.hops, 1);
        assert!(opp.rationale.contains("investor"));
        assert_ne!(opp.timing, IntroTiming::Never);
    }

    #[test]
    fn gap_and_deadline_push_timing_forward() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let graph = graph(now);
        let index = RawIndex::build(&graph);
        let company = company();
        let generation = generate_intro_opportunities(
            &index,
            &company,
            &[],
            &IntroPriors::default(),
            &Assumptions::default(),
            now,
        );
        // Large gap (+2), deadline inside 60 (+2), empty pipeline (+1).
        assert_eq!(generation.opportunities[0].timing, IntroTiming::Now);
    }

    #[test]
    fn suppression_drops_second_order_when_noisy() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let graph = graph(now);
        let index = RawIndex::build(&graph);
        let company = company();
        let mut generation = generate_intro_opportunities(
            &index,
            &company,
            &[],
            &IntroPriors::default(),
            &Assumptions::default(),
            now,
        );
        let suppressed =
            suppress_noisy_second_order(&mut generation.opportunities, 10, 1, 0.2);
        assert!(suppressed);
        assert!(generation
            .opportunities
            .iter()
            .all(|o| o.path_type == crate::core::IntroPathType::Direct));
    }
}
