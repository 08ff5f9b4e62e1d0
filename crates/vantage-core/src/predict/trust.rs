// crates/vantage-core/src/predict/trust.rs
// ============================================================================
// Module: Vantage Introduction Trust Risk
// Description: Social-capital downside model for introduction paths.
// Purpose: Keep the engine from spending relationship capital it cannot see.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Trust risk scores the social-capital downside of asking for an
//! introduction along a specific path. Six weighted sources compose the
//! score: weakest-edge strength, recency of touch, recent ask frequency,
//! path length, fit mismatch, and reputational asymmetry informed by the
//! introducer's history. Bands are low (<=30), medium (<=60), and high;
//! high-band paths must not be amplified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Company;
use crate::core::Firm;
use crate::core::IntroKind;
use crate::core::Person;
use crate::core::Relationship;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Trust Band
// ============================================================================

/// Trust-risk band.
///
/// # Invariants
/// - Variants are stable for serialization; `High` implies no amplification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustBand {
    /// Score at or under 30.
    Low,
    /// Score at or under 60.
    Medium,
    /// Score above 60.
    High,
}

impl TrustBand {
    /// Classifies a score into a band.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Low
        } else if score <= 60.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

// ============================================================================
// SECTION: Trust Risk
// ============================================================================

/// Per-component breakdown of a trust-risk score.
///
/// # Invariants
/// - Components sum to `score` before the 0-100 clamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustComponents {
    /// Weakest-edge strength penalty.
    pub strength: f64,
    /// Recency-of-touch penalty.
    pub recency: f64,
    /// Ask-frequency penalty.
    pub frequency: f64,
    /// Path-length penalty.
    pub path_length: f64,
    /// Fit-mismatch penalty.
    pub fit: f64,
    /// Reputational-asymmetry penalty.
    pub asymmetry: f64,
}

/// Trust-risk assessment for one introduction path.
///
/// # Invariants
/// - `score` is in [0, 100]; `band` matches `score`.
/// - `block_amplification` is true exactly for the high band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustRisk {
    /// Composite score, 0-100.
    pub score: f64,
    /// Band classification.
    pub band: TrustBand,
    /// Component breakdown.
    pub components: TrustComponents,
    /// High-band paths must not be amplified.
    pub block_amplification: bool,
}

// ============================================================================
// SECTION: Introducer History
// ============================================================================

/// Introducer track record summary fed into the asymmetry component.
///
/// # Invariants
/// - `terminal_outcomes` counts only terminal introduction outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntroducerRecord {
    /// Terminal outcomes recorded for the introducer.
    pub terminal_outcomes: u32,
    /// Successes among them.
    pub successes: u32,
}

impl IntroducerRecord {
    /// Success rate when enough history exists.
    #[must_use]
    pub fn success_rate(self) -> Option<f64> {
        if self.terminal_outcomes >= 3 {
            Some(f64::from(self.successes) / f64::from(self.terminal_outcomes))
        } else {
            None
        }
    }
}

// ============================================================================
// SECTION: Scoring
// ============================================================================

/// Inputs describing one introduction path for trust scoring.
#[derive(Debug, Clone, Copy)]
pub struct TrustInput<'a> {
    /// Edges along the path, introducer-first.
    pub edges: &'a [&'a Relationship],
    /// Introducer (first person asked).
    pub introducer: &'a Person,
    /// Final target of the introduction.
    pub target: &'a Person,
    /// Target's firm, when the target sits at one.
    pub target_firm: Option<&'a Firm>,
    /// Company the introduction serves.
    pub company: &'a Company,
    /// Introduction kind.
    pub kind: IntroKind,
    /// Introducer track record.
    pub record: IntroducerRecord,
}

/// Computes trust risk for a path at `now`.
#[must_use]
pub fn compute_trust_risk(input: &TrustInput<'_>, now: Timestamp) -> TrustRisk {
    let weakest = input
        .edges
        .iter()
        .map(|edge| edge.strength)
        .fold(f64::INFINITY, f64::min)
        .min(100.0);
    let first_edge = input.edges.first();

    let strength = (100.0 - weakest).max(0.0) * 0.3;
    let recency = first_edge.map_or(40.0, |edge| {
        recency_penalty(now.days_since(edge.last_touch_at))
    });
    let frequency = first_edge.map_or(0.0, |edge| frequency_penalty(edge.intros_asked_90d));
    let path_length = path_length_penalty(input.edges.len());
    let fit = fit_penalty(input);
    let asymmetry = asymmetry_penalty(input, weakest);

    let components =
        TrustComponents { strength, recency, frequency, path_length, fit, asymmetry };
    let score = (strength + recency + frequency + path_length + fit + asymmetry).clamp(0.0, 100.0);
    let band = TrustBand::for_score(score);
    TrustRisk { score, band, components, block_amplification: band == TrustBand::High }
}

/// Bucketed penalty for days since last touch on the first edge.
fn recency_penalty(days: f64) -> f64 {
    if days <= 7.0 {
        0.0
    } else if days <= 30.0 {
        10.0
    } else if days <= 90.0 {
        25.0
    } else {
        40.0
    }
}

/// Bucketed penalty for asks through the first edge in the last 90 days.
fn frequency_penalty(asks: u32) -> f64 {
    match asks {
        0 => 0.0,
        1 => 5.0,
        2 => 15.0,
        3 => 30.0,
        _ => 50.0,
    }
}

/// Bucketed penalty for path length in hops.
fn path_length_penalty(hops: usize) -> f64 {
    match hops {
        0 | 1 => 0.0,
        2 => 15.0,
        3 => 35.0,
        _ => 50.0,
    }
}

/// Fit-mismatch penalty from tag overlap and sector adjacency.
fn fit_penalty(input: &TrustInput<'_>) -> f64 {
    let kind_tag = match input.kind {
        IntroKind::Fundraise => "investor",
        IntroKind::Partnership => "partner",
        IntroKind::Hiring => "candidate",
        IntroKind::Customer => "buyer",
    };
    let tag_match = input.target.tags.iter().any(|tag| tag == kind_tag);
    let sector_match = input.target_firm.is_some_and(|firm| {
        firm.sector_focus.iter().any(|sector| sector == &input.company.sector)
    });
    let stage_match = input
        .target_firm
        .is_some_and(|firm| firm.stage_focus.contains(&input.company.stage));

    if tag_match && (sector_match || stage_match) {
        0.0
    } else if tag_match || sector_match || stage_match {
        10.0
    } else {
        20.0
    }
}

/// Seniority markers read from a person's role and tags.
fn is_senior(person: &Person) -> bool {
    let role = person.role.to_lowercase();
    ["partner", "founder", "ceo", "gp"].iter().any(|marker| role.contains(marker))
        || person.tags.iter().any(|tag| tag == "senior")
}

/// Reputational-asymmetry penalty plus introducer track record.
fn asymmetry_penalty(input: &TrustInput<'_>, weakest_strength: f64) -> f64 {
    let mut penalty = 0.0;
    if is_senior(input.introducer) && weakest_strength <= 60.0 {
        penalty += 10.0;
    }
    penalty += input
        .record
        .success_rate()
        .map_or(5.0, |rate| (1.0 - rate) * 10.0);
    penalty
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Company;
    use crate::core::IntroKind;
    use crate::core::OrgKind;
    use crate::core::Person;
    use crate::core::Provenance;
    use crate::core::Relationship;
    use crate::core::RelationshipKind;
    use crate::core::Stage;
    use crate::core::Timestamp;

    use super::IntroducerRecord;
    use super::TrustBand;
    use super::TrustInput;
    use super::compute_trust_risk;

    /// Relationship edge fixture.
    fn edge(strength: f64, touched_days_ago: i64, asks: u32, now: Timestamp) -> Relationship {
        Relationship {
            id: "r1".into(),
            from_person_id: "alice".into(),
            to_person_id: "bob".into(),
            kind: RelationshipKind::Professional,
            strength,
            last_touch_at: now.plus_days(-touched_days_ago),
            intros_asked_90d: asks,
            intros_received: 0,
        }
    }

    /// Person fixture.
    fn person(id: &str, role: &str, tags: &[&str]) -> Person {
        Person {
            id: id.into(),
            name: id.to_string(),
            org_id: "ext".into(),
            org_kind: OrgKind::External,
            role: role.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Company fixture.
    fn company() -> Company {
        Company {
            id: "c1".into(),
            name: "Acme".into(),
            stage: Stage::Seed,
            sector: "saas".into(),
            cash: None,
            burn: None,
            employees: None,
            recurring: None,
            revenue: None,
            raising: true,
            round_target: None,
            is_portfolio: true,
            deck_updated_at: None,
            as_of: Timestamp::from_unix_millis(0),
            provenance: Provenance::Crm,
        }
    }

    #[test]
    fn strong_fresh_single_hop_is_low_band() {
        let now = Timestamp::from_unix_millis(0).plus_days(365);
        let edge = edge(95.0, 3, 0, now);
        let introducer = person("alice", "engineer", &[]);
        let target = person("bob", "partner", &["investor"]);
        let company = company();
        let input = TrustInput {
            edges: &[&edge],
            introducer: &introducer,
            target: &target,
            target_firm: None,
            company: &company,
            kind: IntroKind::Fundraise,
            record: IntroducerRecord { terminal_outcomes: 5, successes: 5 },
        };
        let risk = compute_trust_risk(&input, now);
        assert_eq!(risk.band, TrustBand::Low);
    }

    #[test]
    fn stronger_edge_never_raises_risk() {
        let now = Timestamp::from_unix_millis(0).plus_days(365);
        let introducer = person("alice", "engineer", &[]);
        let target = person("bob", "partner", &[]);
        let company = company();
        let mut last_score = f64::INFINITY;
        for strength in [20.0, 40.0, 60.0, 80.0, 100.0] {
            let edge = edge(strength, 10, 1, now);
            let input = TrustInput {
                edges: &[&edge],
                introducer: &introducer,
                target: &target,
                target_firm: None,
                company: &company,
                kind: IntroKind::Fundraise,
                record: IntroducerRecord::default(),
            };
            let score = compute_trust_risk(&input, now).score;
            assert!(score <= last_score);
            last_score = score;
        }
    }

    #[test]
    fn cold_two_hop_overasked_path_is_high_band() {
        let now = Timestamp::from_unix_millis(0).plus_days(365);
        let first = edge(35.0, 120, 4, now);
        let second = edge(30.0, 120, 0, now);
        let introducer = person("alice", "partner", &[]);
        let target = person("carol", "operator", &[]);
        let company = company();
        let input = TrustInput {
            edges: &[&first, &second],
            introducer: &introducer,
            target: &target,
            target_firm: None,
            company: &company,
            kind: IntroKind::Partnership,
            record: IntroducerRecord::default(),
        };
        let risk = compute_trust_risk(&input, now);
        assert_eq!(risk.band, TrustBand::High);
        assert!(risk.block_amplification);
    }
}
