// crates/vantage-core/src/predict/ripple.rs
// ============================================================================
// Module: Vantage Ripple Engine
// Description: Rule-based downstream-consequence estimates per issue.
// Purpose: Quantify how far an issue's damage spreads beyond itself.
// Dependencies: crate::predict::issues, serde
// ============================================================================

//! ## Overview
//! Every issue kind carries a static ripple score in [0, 1] and a list of
//! downstream consequences. Per company, contributions are aggregated with
//! geometric falloff: the i-th issue (sorted by ripple descending)
//! contributes `score * 0.5^i`, the sum is clamped to 1.0, and explanations
//! are deduplicated from contributors with ripple at or above 0.3.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::predict::issues::Issue;
use crate::predict::issues::IssueKind;

// ============================================================================
// SECTION: Ripple Table
// ============================================================================

/// Static ripple score for an issue kind.
#[must_use]
pub const fn ripple_score(kind: IssueKind) -> f64 {
    match kind {
        IssueKind::RunwayCritical => 0.9,
        IssueKind::NoPipeline => 0.7,
        IssueKind::RunwayWarning => 0.6,
        IssueKind::BurnSpike => 0.55,
        IssueKind::PipelineGap | IssueKind::RoundStale => 0.5,
        IssueKind::GoalMissed => 0.45,
        IssueKind::DealStale => 0.35,
        IssueKind::GoalBehind | IssueKind::DataMissing | IssueKind::DeckStale => 0.3,
        IssueKind::GoalStalled | IssueKind::NoGoals => 0.25,
        IssueKind::DataStale => 0.2,
    }
}

/// Downstream consequences for an issue kind.
#[must_use]
pub const fn consequences(kind: IssueKind) -> &'static [&'static str] {
    match kind {
        IssueKind::RunwayCritical => {
            &["forced bridge or down round", "payroll risk", "team attrition"]
        }
        IssueKind::RunwayWarning => &["weak negotiating position", "forced bridge or down round"],
        IssueKind::BurnSpike => &["runway compression", "budget credibility loss"],
        IssueKind::NoPipeline => &["raise slips a quarter", "runway compression"],
        IssueKind::PipelineGap => &["undersubscribed round", "raise slips a quarter"],
        IssueKind::DealStale => &["investor interest cools", "signal risk to other firms"],
        IssueKind::GoalMissed => &["board confidence loss", "plan rebaselining"],
        IssueKind::GoalBehind => &["plan rebaselining"],
        IssueKind::GoalStalled => &["plan rebaselining"],
        IssueKind::DataStale => &["decisions on stale numbers"],
        IssueKind::DataMissing => &["decisions on missing numbers", "hidden runway risk"],
        IssueKind::NoGoals => &["no steering signal", "drift"],
        IssueKind::RoundStale => &["investor interest cools", "raise slips a quarter"],
        IssueKind::DeckStale => &["stale story in market", "investor interest cools"],
    }
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Aggregated ripple effect for one company.
///
/// # Invariants
/// - `score` is in [0, 1].
/// - `explanations` is deduplicated and ordered by first contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RippleEffect {
    /// Aggregate ripple score, 0-1.
    pub score: f64,
    /// Deduplicated downstream consequences from significant contributors.
    pub explanations: Vec<String>,
}

/// Ripple threshold above which an issue contributes explanations.
const EXPLANATION_FLOOR: f64 = 0.3;

/// Aggregates ripple across a company's issues.
#[must_use]
pub fn aggregate_ripple(issues: &[Issue]) -> RippleEffect {
    let mut scored: Vec<(f64, IssueKind)> =
        issues.iter().map(|issue| (ripple_score(issue.kind), issue.kind)).collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1))
    });

    let mut total = 0.0;
    let mut falloff = 1.0;
    let mut explanations: Vec<String> = Vec::new();
    for (score, kind) in scored {
        total += score * falloff;
        falloff *= 0.5;
        if score >= EXPLANATION_FLOOR {
            for consequence in consequences(kind) {
                if !explanations.iter().any(|existing| existing == consequence) {
                    explanations.push((*consequence).to_string());
                }
            }
        }
    }

    RippleEffect { score: total.clamp(0.0, 1.0), explanations }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::predict::issues::Issue;
    use crate::predict::issues::IssueKind;

    use super::aggregate_ripple;
    use super::ripple_score;

    /// Issue fixture of the given kind.
    fn issue(kind: IssueKind) -> Issue {
        Issue {
            kind,
            company_id: "c1".into(),
            severity: 2,
            goal_id: None,
            deal_id: None,
            evidence: String::new(),
        }
    }

    #[test]
    fn contributions_fall_off_geometrically() {
        let issues =
            vec![issue(IssueKind::RunwayCritical), issue(IssueKind::NoPipeline)];
        let ripple = aggregate_ripple(&issues);
        let expected = ripple_score(IssueKind::RunwayCritical)
            + ripple_score(IssueKind::NoPipeline) * 0.5;
        assert!((ripple.score - expected.min(1.0)).abs() < 1e-9);
    }

    #[test]
    fn explanations_are_deduplicated() {
        let issues = vec![issue(IssueKind::DealStale), issue(IssueKind::RoundStale)];
        let ripple = aggregate_ripple(&issues);
        let cools =
            ripple.explanations.iter().filter(|e| e.as_str() == "investor interest cools").count();
        assert_eq!(cools, 1);
    }

    #[test]
    fn score_is_clamped_to_one() {
        let issues = vec![
            issue(IssueKind::RunwayCritical),
            issue(IssueKind::NoPipeline),
            issue(IssueKind::RoundStale),
            issue(IssueKind::PipelineGap),
            issue(IssueKind::GoalMissed),
        ];
        assert!(aggregate_ripple(&issues).score <= 1.0);
    }
}
