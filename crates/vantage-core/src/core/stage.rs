// crates/vantage-core/src/core/stage.rs
// ============================================================================
// Module: Vantage Stage Model
// Description: Company stage sequence and canonical per-stage parameter table.
// Purpose: Provide the single stage-relative bounds table used by derivation.
// Dependencies: crate::core::metrics, serde
// ============================================================================

//! ## Overview
//! Stages form a fixed ordered sequence (Pre-seed through Series D). The
//! canonical [`StageParams`] table carries the stage-relative bounds used by
//! anomaly detection and the expected goal mix used by candidate generation.
//! There is exactly one table; no value here flows directly into a rank
//! score, it must pass through the derive or decide layer first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::metrics::MetricKey;

// ============================================================================
// SECTION: Stage Sequence
// ============================================================================

/// Company funding stage.
///
/// # Invariants
/// - Variants are stable for serialization and ordered by maturity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Pre-seed.
    PreSeed,
    /// Seed.
    Seed,
    /// Series A.
    SeriesA,
    /// Series B.
    SeriesB,
    /// Series C.
    SeriesC,
    /// Series D.
    SeriesD,
}

impl Stage {
    /// All stages in maturity order.
    pub const ALL: [Self; 6] =
        [Self::PreSeed, Self::Seed, Self::SeriesA, Self::SeriesB, Self::SeriesC, Self::SeriesD];

    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreSeed => "pre-seed",
            Self::Seed => "seed",
            Self::SeriesA => "series-a",
            Self::SeriesB => "series-b",
            Self::SeriesC => "series-c",
            Self::SeriesD => "series-d",
        }
    }

    /// Returns the next stage in the sequence, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreSeed => Some(Self::Seed),
            Self::Seed => Some(Self::SeriesA),
            Self::SeriesA => Some(Self::SeriesB),
            Self::SeriesB => Some(Self::SeriesC),
            Self::SeriesC => Some(Self::SeriesD),
            Self::SeriesD => None,
        }
    }

    /// Returns the previous stage in the sequence, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::PreSeed => None,
            Self::Seed => Some(Self::PreSeed),
            Self::SeriesA => Some(Self::Seed),
            Self::SeriesB => Some(Self::SeriesA),
            Self::SeriesC => Some(Self::SeriesB),
            Self::SeriesD => Some(Self::SeriesC),
        }
    }

    /// Returns true when the stage is early (pre-seed through Series A).
    #[must_use]
    pub const fn is_early(self) -> bool {
        matches!(self, Self::PreSeed | Self::Seed | Self::SeriesA)
    }
}

// ============================================================================
// SECTION: Metric Bounds
// ============================================================================

/// Inclusive bound pair for a stage-relative metric.
///
/// # Invariants
/// - When both ends are present, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBound {
    /// Lower bound, if the stage defines one.
    pub min: Option<f64>,
    /// Upper bound, if the stage defines one.
    pub max: Option<f64>,
}

impl MetricBound {
    /// Builds a bound with both ends.
    #[must_use]
    pub const fn range(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Builds a bound with only a lower end.
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self { min: Some(min), max: None }
    }

    /// Builds a bound with only an upper end.
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self { min: None, max: Some(max) }
    }
}

// ============================================================================
// SECTION: Stage Parameters
// ============================================================================

/// Canonical per-stage parameter set.
///
/// # Invariants
/// - One static table per process; configuration overrides individual
///   bounds via [`StageOverrides`], never the table itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageParams {
    /// Typical raise size bounds in USD.
    pub raise: MetricBound,
    /// Monthly burn bounds in USD.
    pub burn: MetricBound,
    /// Headcount bounds.
    pub employees: MetricBound,
    /// Expected runway months after a raise.
    pub expected_runway_months: f64,
    /// Revenue bounds in USD (annualized).
    pub revenue: MetricBound,
    /// Monthly churn upper bound, percent.
    pub churn: MetricBound,
    /// Net revenue retention lower bound, percent.
    pub nrr: MetricBound,
    /// Goal types a healthy company at this stage is expected to carry.
    pub expected_goal_mix: &'static [crate::core::entities::GoalType],
}

impl StageParams {
    /// Returns the canonical parameter row for a stage.
    #[must_use]
    pub const fn for_stage(stage: Stage) -> &'static Self {
        match stage {
            Stage::PreSeed => &PRE_SEED,
            Stage::Seed => &SEED,
            Stage::SeriesA => &SERIES_A,
            Stage::SeriesB => &SERIES_B,
            Stage::SeriesC => &SERIES_C,
            Stage::SeriesD => &SERIES_D,
        }
    }

    /// Returns the stage-relative bound for a metric key, if one is defined.
    #[must_use]
    pub const fn bound_for(&self, key: MetricKey) -> Option<MetricBound> {
        match key {
            MetricKey::Burn => Some(self.burn),
            MetricKey::Employees => Some(self.employees),
            MetricKey::Revenue | MetricKey::Arr => Some(self.revenue),
            MetricKey::Churn => Some(self.churn),
            MetricKey::Nrr => Some(self.nrr),
            MetricKey::Cash
            | MetricKey::Mrr
            | MetricKey::PipelineValue
            | MetricKey::DealCount
            | MetricKey::HeadcountTarget => None,
        }
    }
}

// ============================================================================
// SECTION: Stage Overrides
// ============================================================================

/// Configuration-supplied overrides for individual stage bounds.
///
/// # Invariants
/// - Absent fields fall back to the canonical table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageOverrides {
    /// Raise-size bound override.
    pub raise: Option<MetricBound>,
    /// Burn bound override.
    pub burn: Option<MetricBound>,
    /// Headcount bound override.
    pub employees: Option<MetricBound>,
    /// Revenue bound override.
    pub revenue: Option<MetricBound>,
    /// Churn bound override.
    pub churn: Option<MetricBound>,
    /// Net revenue retention bound override.
    pub nrr: Option<MetricBound>,
    /// Expected post-raise runway override, months.
    pub expected_runway_months: Option<f64>,
}

impl StageOverrides {
    /// Override for a metric key, when one is present.
    #[must_use]
    pub const fn bound_for(&self, key: MetricKey) -> Option<MetricBound> {
        match key {
            MetricKey::Burn => self.burn,
            MetricKey::Employees => self.employees,
            MetricKey::Revenue | MetricKey::Arr => self.revenue,
            MetricKey::Churn => self.churn,
            MetricKey::Nrr => self.nrr,
            MetricKey::Cash
            | MetricKey::Mrr
            | MetricKey::PipelineValue
            | MetricKey::DealCount
            | MetricKey::HeadcountTarget => None,
        }
    }
}

/// Effective bound for a stage and key: the override wins, then the table.
#[must_use]
pub fn effective_bound(
    stage: Stage,
    key: MetricKey,
    overrides: &std::collections::BTreeMap<Stage, StageOverrides>,
) -> Option<MetricBound> {
    if let Some(row) = overrides.get(&stage)
        && let Some(bound) = row.bound_for(key)
    {
        return Some(bound);
    }
    StageParams::for_stage(stage).bound_for(key)
}

/// Pre-seed parameter row.
static PRE_SEED: StageParams = StageParams {
    raise: MetricBound::range(250_000.0, 1_500_000.0),
    burn: MetricBound::range(10_000.0, 80_000.0),
    employees: MetricBound::range(1.0, 8.0),
    expected_runway_months: 18.0,
    revenue: MetricBound::range(0.0, 250_000.0),
    churn: MetricBound::at_most(12.0),
    nrr: MetricBound::at_least(70.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Fundraise,
        crate::core::entities::GoalType::Product,
    ],
};

/// Seed parameter row.
static SEED: StageParams = StageParams {
    raise: MetricBound::range(1_000_000.0, 5_000_000.0),
    burn: MetricBound::range(40_000.0, 250_000.0),
    employees: MetricBound::range(3.0, 25.0),
    expected_runway_months: 18.0,
    revenue: MetricBound::range(0.0, 1_500_000.0),
    churn: MetricBound::at_most(9.0),
    nrr: MetricBound::at_least(85.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Fundraise,
        crate::core::entities::GoalType::Revenue,
        crate::core::entities::GoalType::Product,
    ],
};

/// Series A parameter row.
static SERIES_A: StageParams = StageParams {
    raise: MetricBound::range(5_000_000.0, 20_000_000.0),
    burn: MetricBound::range(150_000.0, 900_000.0),
    employees: MetricBound::range(15.0, 80.0),
    expected_runway_months: 24.0,
    revenue: MetricBound::range(500_000.0, 8_000_000.0),
    churn: MetricBound::at_most(6.0),
    nrr: MetricBound::at_least(95.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Revenue,
        crate::core::entities::GoalType::Hiring,
        crate::core::entities::GoalType::CustomerGrowth,
    ],
};

/// Series B parameter row.
static SERIES_B: StageParams = StageParams {
    raise: MetricBound::range(15_000_000.0, 60_000_000.0),
    burn: MetricBound::range(400_000.0, 2_500_000.0),
    employees: MetricBound::range(40.0, 250.0),
    expected_runway_months: 24.0,
    revenue: MetricBound::range(3_000_000.0, 30_000_000.0),
    churn: MetricBound::at_most(4.0),
    nrr: MetricBound::at_least(100.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Revenue,
        crate::core::entities::GoalType::Efficiency,
        crate::core::entities::GoalType::Retention,
    ],
};

/// Series C parameter row.
static SERIES_C: StageParams = StageParams {
    raise: MetricBound::range(40_000_000.0, 150_000_000.0),
    burn: MetricBound::range(1_000_000.0, 6_000_000.0),
    employees: MetricBound::range(120.0, 700.0),
    expected_runway_months: 30.0,
    revenue: MetricBound::range(15_000_000.0, 120_000_000.0),
    churn: MetricBound::at_most(3.0),
    nrr: MetricBound::at_least(105.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Revenue,
        crate::core::entities::GoalType::Efficiency,
        crate::core::entities::GoalType::Operational,
    ],
};

/// Series D parameter row.
static SERIES_D: StageParams = StageParams {
    raise: MetricBound::range(75_000_000.0, 400_000_000.0),
    burn: MetricBound::range(2_000_000.0, 12_000_000.0),
    employees: MetricBound::range(250.0, 2_000.0),
    expected_runway_months: 30.0,
    revenue: MetricBound::range(40_000_000.0, 400_000_000.0),
    churn: MetricBound::at_most(2.5),
    nrr: MetricBound::at_least(110.0),
    expected_goal_mix: &[
        crate::core::entities::GoalType::Revenue,
        crate::core::entities::GoalType::Efficiency,
        crate::core::entities::GoalType::Operational,
    ],
};
