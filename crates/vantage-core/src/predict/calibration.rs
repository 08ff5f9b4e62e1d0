// crates/vantage-core/src/predict/calibration.rs
// ============================================================================
// Module: Vantage Introduction Prior Calibration
// Description: Bayesian-smoothed introduction success priors from outcomes.
// Purpose: Let observed history sharpen path probabilities, with safe fallback.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Terminal introduction outcomes are grouped three ways (introducer,
//! path type, target kind) and each group's success rate is Bayesian-smoothed
//! toward the baseline. A group becomes empirical only past its observation
//! threshold; below it, the baseline applies. A per-path calibrated
//! probability is the mean of the applicable empirical priors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Assumptions;
use crate::core::IntroKind;
use crate::core::IntroOutcome;
use crate::core::IntroPathType;
use crate::core::PersonId;

// ============================================================================
// SECTION: Prior
// ============================================================================

/// Rate bounds for smoothed priors.
const RATE_FLOOR: f64 = 0.05;

/// Upper clamp for smoothed priors.
const RATE_CEILING: f64 = 0.85;

/// A smoothed success prior for one calibration group.
///
/// # Invariants
/// - `rate` is in [0.05, 0.85].
/// - `empirical` is true only past the group's observation threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prior {
    /// Smoothed success rate.
    pub rate: f64,
    /// Terminal observations in the group.
    pub observations: u32,
    /// Successes in the group.
    pub successes: u32,
    /// Whether the group crossed its empirical threshold.
    pub empirical: bool,
}

/// Computes a Bayesian-smoothed prior from counts.
fn smoothed(successes: u32, total: u32, threshold: u32, assumptions: &Assumptions) -> Prior {
    let strength = assumptions.calibration_prior_strength;
    let baseline = assumptions.intro_baseline_conversion;
    let rate = (f64::from(successes) + strength * baseline) / (f64::from(total) + strength);
    Prior {
        rate: rate.clamp(RATE_FLOOR, RATE_CEILING),
        observations: total,
        successes,
        empirical: total >= threshold,
    }
}

// ============================================================================
// SECTION: Calibration Table
// ============================================================================

/// Calibrated introduction priors for one run.
///
/// # Invariants
/// - Built once per run from the terminal outcomes in raw input; never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroPriors {
    /// Priors keyed by introducer.
    pub by_introducer: BTreeMap<PersonId, Prior>,
    /// Priors keyed by path type.
    pub by_path_type: BTreeMap<IntroPathType, Prior>,
    /// Priors keyed by introduction kind.
    pub by_target_kind: BTreeMap<IntroKind, Prior>,
}

impl IntroPriors {
    /// Builds priors from the terminal subset of recorded outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[IntroOutcome], assumptions: &Assumptions) -> Self {
        let mut introducer: BTreeMap<PersonId, (u32, u32)> = BTreeMap::new();
        let mut path: BTreeMap<IntroPathType, (u32, u32)> = BTreeMap::new();
        let mut target: BTreeMap<IntroKind, (u32, u32)> = BTreeMap::new();

        for outcome in outcomes {
            if !outcome.status.is_terminal() {
                continue;
            }
            let success = outcome.status.is_success();
            for entry in [
                introducer.entry(outcome.introducer_id.clone()).or_insert((0, 0)),
                path.entry(outcome.path_type).or_insert((0, 0)),
                target.entry(outcome.kind).or_insert((0, 0)),
            ] {
                entry.0 += 1;
                if success {
                    entry.1 += 1;
                }
            }
        }

        Self {
            by_introducer: introducer
                .into_iter()
                .map(|(key, (total, successes))| {
                    (
                        key,
                        smoothed(
                            successes,
                            total,
                            assumptions.calibration_min_introducer_obs,
                            assumptions,
                        ),
                    )
                })
                .collect(),
            by_path_type: path
                .into_iter()
                .map(|(key, (total, successes))| {
                    (key, smoothed(successes, total, assumptions.calibration_min_path_obs, assumptions))
                })
                .collect(),
            by_target_kind: target
                .into_iter()
                .map(|(key, (total, successes))| {
                    (
                        key,
                        smoothed(successes, total, assumptions.calibration_min_target_obs, assumptions),
                    )
                })
                .collect(),
        }
    }

    /// Calibrated probability for a path: mean of applicable empirical priors,
    /// baseline when none apply.
    #[must_use]
    pub fn calibrated_probability(
        &self,
        introducer: &PersonId,
        path_type: IntroPathType,
        kind: IntroKind,
        assumptions: &Assumptions,
    ) -> f64 {
        let mut rates = Vec::new();
        if let Some(prior) = self.by_introducer.get(introducer)
            && prior.empirical
        {
            rates.push(prior.rate);
        }
        if let Some(prior) = self.by_path_type.get(&path_type)
            && prior.empirical
        {
            rates.push(prior.rate);
        }
        if let Some(prior) = self.by_target_kind.get(&kind)
            && prior.empirical
        {
            rates.push(prior.rate);
        }
        if rates.is_empty() {
            return assumptions.intro_baseline_conversion;
        }
        let count = f64::from(u32::try_from(rates.len()).unwrap_or(u32::MAX));
        rates.iter().sum::<f64>() / count
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
