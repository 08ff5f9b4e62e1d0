// crates/vantage-core/src/core/time.rs
// ============================================================================
// Module: Vantage Time Model
// Description: Canonical timestamp representation for raw facts and runs.
// Purpose: Provide deterministic, replayable time values across Vantage records.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Vantage uses explicit time values embedded in raw facts and compute calls
//! to keep ranking deterministic. The engine never reads wall-clock time
//! directly; hosts must supply `now` at the invocation boundary. Timestamps
//! are unix-epoch milliseconds with RFC3339 parse/format helpers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Milliseconds per day, used for day-resolution arithmetic.
const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Timestamp conversion errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TimeError {
    /// RFC3339 input could not be parsed.
    #[error("invalid rfc3339 timestamp: {0}")]
    Parse(String),
    /// Timestamp is outside the representable RFC3339 range.
    #[error("timestamp out of rfc3339 range: {0}")]
    OutOfRange(i64),
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp used across Vantage raw facts and engine output.
///
/// # Invariants
/// - Values are explicitly provided by callers; the engine never reads wall-clock time.
/// - No monotonicity is enforced; ordering is a caller responsibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Parses an RFC3339 date-time string into a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Parse`] when the input is not valid RFC3339.
    pub fn parse_rfc3339(value: &str) -> Result<Self, TimeError> {
        let parsed = OffsetDateTime::parse(value, &Rfc3339)
            .map_err(|err| TimeError::Parse(err.to_string()))?;
        let nanos = parsed.unix_timestamp_nanos();
        let millis = nanos / 1_000_000;
        i64::try_from(millis).map(Self).map_err(|_| TimeError::Parse(value.to_string()))
    }

    /// Formats the timestamp as an RFC3339 date-time string.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::OutOfRange`] when the value cannot be represented.
    pub fn format_rfc3339(self) -> Result<String, TimeError> {
        let nanos = i128::from(self.0) * 1_000_000;
        let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| TimeError::OutOfRange(self.0))?;
        datetime.format(&Rfc3339).map_err(|_| TimeError::OutOfRange(self.0))
    }

    /// Returns the fractional number of days elapsed since `earlier`.
    ///
    /// Negative when `earlier` is in the future relative to `self`.
    #[must_use]
    pub fn days_since(self, earlier: Self) -> f64 {
        let delta = self.0 - earlier.0;
        to_f64(delta) / MILLIS_PER_DAY
    }

    /// Returns the fractional number of days from `self` until `later`.
    ///
    /// Negative when `later` is already in the past relative to `self`.
    #[must_use]
    pub fn days_until(self, later: Self) -> f64 {
        later.days_since(self)
    }

    /// Returns a timestamp shifted forward by the given whole number of days.
    #[must_use]
    pub const fn plus_days(self, days: i64) -> Self {
        Self(self.0 + days * 86_400_000)
    }

    /// Returns a timestamp shifted forward by a fractional number of days.
    #[must_use]
    pub fn plus_days_f64(self, days: f64) -> Self {
        let shift = (days * MILLIS_PER_DAY).round();
        if shift >= to_f64(i64::MAX) {
            return Self(i64::MAX);
        }
        if shift <= to_f64(i64::MIN) {
            return Self(i64::MIN);
        }
        // Bounds checked above, so the conversion cannot truncate.
        #[allow(clippy::cast_possible_truncation, reason = "shift is bounds-checked above")]
        Self(self.0.saturating_add(shift as i64))
    }
}

/// Converts an `i64` to `f64` for day-resolution arithmetic.
#[allow(clippy::cast_precision_loss, reason = "day arithmetic tolerates sub-millisecond loss")]
fn to_f64(value: i64) -> f64 {
    value as f64
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use super::Timestamp;

    #[test]
    fn rfc3339_round_trip_preserves_millis() {
        let ts = Timestamp::parse_rfc3339("2026-03-01T12:30:00Z").unwrap();
        let rendered = ts.format_rfc3339().unwrap();
        let reparsed = Timestamp::parse_rfc3339(&rendered).unwrap();
        assert_eq!(ts, reparsed);
    }

    #[test]
    fn day_arithmetic_is_symmetric() {
        let start = Timestamp::from_unix_millis(0);
        let later = start.plus_days(30);
        assert!((later.days_since(start) - 30.0).abs() < f64::EPSILON);
        assert!((start.days_until(later) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fractional_shift_rounds_to_millis() {
        let start = Timestamp::from_unix_millis(0);
        let later = start.plus_days_f64(1.5);
        assert_eq!(later.as_unix_millis(), 129_600_000);
    }
}
