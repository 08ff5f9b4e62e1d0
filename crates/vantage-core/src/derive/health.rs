// crates/vantage-core/src/derive/health.rs
// ============================================================================
// Module: Vantage Health Derivation
// Description: Present-state health band derived from runway alone.
// Purpose: Reflect coherent present state; gaps become issues, not penalties.
// Dependencies: crate::core, crate::derive::runway, serde
// ============================================================================

//! ## Overview
//! Health is a present-state band: RED under six months of runway, YELLOW
//! under twelve, GREEN otherwise. It never predicts and never penalizes
//! absence; when inputs are missing the band stays GREEN at 0.3 confidence
//! and the gap surfaces as a DATA_MISSING issue in the predict layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::derive::runway::Runway;
use crate::derive::runway::RunwayValue;

// ============================================================================
// SECTION: Health Band
// ============================================================================

/// Present-state health band.
///
/// # Invariants
/// - Variants are stable for serialization and gate checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthBand {
    /// Healthy.
    Green,
    /// Under twelve months of runway.
    Yellow,
    /// Under six months of runway.
    Red,
}

impl HealthBand {
    /// Returns a stable label for the band.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

// ============================================================================
// SECTION: Health
// ============================================================================

/// Derived health for a company.
///
/// # Invariants
/// - Derived from runway only; missing data lowers confidence, never the band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Health band.
    pub band: HealthBand,
    /// Confidence in the band, 0-1.
    pub confidence: f64,
    /// Descriptive signal tags supporting the band.
    pub signals: Vec<String>,
}

/// Derives health from runway.
#[must_use]
pub fn derive_health(runway: &Runway) -> Health {
    match runway.value {
        None => Health {
            band: HealthBand::Green,
            confidence: 0.3,
            signals: vec!["runway unknown; inputs missing".to_string()],
        },
        Some(RunwayValue::Unbounded) => Health {
            band: HealthBand::Green,
            confidence: runway.confidence,
            signals: vec!["runway unbounded at current burn".to_string()],
        },
        Some(RunwayValue::Months(months)) => {
            let band = if months < 6.0 {
                HealthBand::Red
            } else if months < 12.0 {
                HealthBand::Yellow
            } else {
                HealthBand::Green
            };
            Health {
                band,
                confidence: runway.confidence,
                signals: vec![format!("runway {months:.1} months")],
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::derive::runway::Runway;
    use crate::derive::runway::RunwayValue;

    use super::HealthBand;
    use super::derive_health;

    /// Runway fixture with a finite months figure.
    fn runway(months: f64) -> Runway {
        Runway {
            value: Some(RunwayValue::Months(months)),
            confidence: 1.0,
            used_inputs: Vec::new(),
            missing_inputs: Vec::new(),
            staleness_penalty: 0.0,
            explain: String::new(),
        }
    }

    #[test]
    fn bands_follow_runway_thresholds() {
        assert_eq!(derive_health(&runway(2.0)).band, HealthBand::Red);
        assert_eq!(derive_health(&runway(8.0)).band, HealthBand::Yellow);
        assert_eq!(derive_health(&runway(18.0)).band, HealthBand::Green);
    }

    #[test]
    fn missing_runway_never_penalizes_band() {
        let missing = Runway {
            value: None,
            confidence: 0.0,
            used_inputs: Vec::new(),
            missing_inputs: Vec::new(),
            staleness_penalty: 0.0,
            explain: String::new(),
        };
        let health = derive_health(&missing);
        assert_eq!(health.band, HealthBand::Green);
        assert!((health.confidence - 0.3).abs() < f64::EPSILON);
    }
}
