// crates/vantage-core/src/derive/trajectory.rs
// ============================================================================
// Module: Vantage Goal Trajectory
// Description: Velocity, projected completion, and on-track state for goals.
// Purpose: Turn goal observation series into a tri-valued on-track verdict.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! A trajectory is derived from the time-ordered observation series tracking
//! a goal (the metric series of the goal type's tracking metric, or the
//! goal's single current-value point when no series exists). Velocity is the
//! first-to-last slope; completion is linear extrapolation. With fewer than
//! two observations, on-track is `Unknown` and the required velocity to hit
//! the target is reported instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Goal;
use crate::core::GoalType;
use crate::core::MetricKey;
use crate::core::Timestamp;

// ============================================================================
// SECTION: On-Track State
// ============================================================================

/// Tri-valued on-track verdict.
///
/// # Invariants
/// - `Unknown` is the only verdict permitted with fewer than two data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnTrack {
    /// Projected to complete by the due date.
    Yes,
    /// Projected to miss the due date, or unachievable at current velocity.
    No,
    /// Not enough data to project.
    Unknown,
}

// ============================================================================
// SECTION: Observations
// ============================================================================

/// A single goal progress observation.
///
/// # Invariants
/// - Series passed to [`derive_trajectory`] must be time-ascending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalObservation {
    /// Observation timestamp.
    pub at: Timestamp,
    /// Observed progress value in the goal's unit.
    pub value: f64,
}

/// Maps a goal type to the raw metric series that tracks its progress.
///
/// Types with no natural tracking metric fall back to the goal's own
/// current-value point.
#[must_use]
pub const fn tracking_metric(goal_type: GoalType) -> Option<MetricKey> {
    match goal_type {
        GoalType::Revenue => Some(MetricKey::Revenue),
        GoalType::CustomerGrowth => Some(MetricKey::Mrr),
        GoalType::Hiring => Some(MetricKey::Employees),
        GoalType::Efficiency => Some(MetricKey::Burn),
        GoalType::Retention => Some(MetricKey::Nrr),
        GoalType::Fundraise | GoalType::DealClose | GoalType::RoundCompletion => {
            Some(MetricKey::PipelineValue)
        }
        GoalType::Product
        | GoalType::Partnership
        | GoalType::Operational
        | GoalType::InvestorActivation
        | GoalType::ChampionCultivation
        | GoalType::RelationshipBuild
        | GoalType::IntroTarget => None,
    }
}

// ============================================================================
// SECTION: Trajectory
// ============================================================================

/// Derived goal trajectory.
///
/// # Invariants
/// - `confidence` is in [0, 1].
/// - `required_velocity_per_day` is reported exactly when data is too thin
///   to measure velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trajectory {
    /// Goal the trajectory describes.
    pub goal_id: crate::core::GoalId,
    /// Measured velocity per day, when measurable.
    pub velocity_per_day: Option<f64>,
    /// Projected completion date, when achievable.
    pub projected_completion: Option<Timestamp>,
    /// On-track verdict.
    pub on_track: OnTrack,
    /// Confidence in the verdict, 0-1.
    pub confidence: f64,
    /// Velocity per day required to hit the target by the due date.
    pub required_velocity_per_day: Option<f64>,
    /// Number of observations used.
    pub data_points: usize,
}

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives a trajectory for a goal from its observation series.
#[must_use]
pub fn derive_trajectory(goal: &Goal, observations: &[GoalObservation], now: Timestamp) -> Trajectory {
    let days_to_due = now.days_until(goal.due);
    let data_points = observations.len();

    if data_points < 2 {
        return Trajectory {
            goal_id: goal.id.clone(),
            velocity_per_day: None,
            projected_completion: None,
            on_track: OnTrack::Unknown,
            confidence: thin_confidence(data_points),
            required_velocity_per_day: required_velocity(goal, days_to_due),
            data_points,
        };
    }

    let (first, last) = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Trajectory {
                goal_id: goal.id.clone(),
                velocity_per_day: None,
                projected_completion: None,
                on_track: OnTrack::Unknown,
                confidence: thin_confidence(data_points),
                required_velocity_per_day: required_velocity(goal, days_to_due),
                data_points,
            };
        }
    };
    let span_days = last.at.days_since(first.at);
    if span_days <= 0.0 {
        return Trajectory {
            goal_id: goal.id.clone(),
            velocity_per_day: None,
            projected_completion: None,
            on_track: OnTrack::Unknown,
            confidence: thin_confidence(data_points),
            required_velocity_per_day: required_velocity(goal, days_to_due),
            data_points,
        };
    }

    let velocity = (last.value - first.value) / span_days;
    let current = last.value;

    // Already met: completion is today.
    if current >= goal.target {
        return Trajectory {
            goal_id: goal.id.clone(),
            velocity_per_day: Some(velocity),
            projected_completion: Some(now),
            on_track: OnTrack::Yes,
            confidence: confidence(data_points, span_days, days_to_due, observations),
            required_velocity_per_day: None,
            data_points,
        };
    }

    // Unachievable at current velocity.
    if velocity <= 0.0 {
        return Trajectory {
            goal_id: goal.id.clone(),
            velocity_per_day: Some(velocity),
            projected_completion: None,
            on_track: OnTrack::No,
            confidence: confidence(data_points, span_days, days_to_due, observations),
            required_velocity_per_day: required_velocity(goal, days_to_due),
            data_points,
        };
    }

    let days_to_target = (goal.target - current) / velocity;
    let projected = now.plus_days_f64(days_to_target);
    let on_track = if projected <= goal.due { OnTrack::Yes } else { OnTrack::No };

    Trajectory {
        goal_id: goal.id.clone(),
        velocity_per_day: Some(velocity),
        projected_completion: Some(projected),
        on_track,
        confidence: confidence(data_points, span_days, days_to_due, observations),
        required_velocity_per_day: None,
        data_points,
    }
}

/// Required velocity to reach target by the due date, when days remain.
fn required_velocity(goal: &Goal, days_to_due: f64) -> Option<f64> {
    if days_to_due <= 0.0 {
        return None;
    }
    Some((goal.target - goal.current).max(0.0) / days_to_due)
}

/// Confidence with fewer than two observations.
fn thin_confidence(data_points: usize) -> f64 {
    if data_points == 0 { 0.0 } else { 0.3 }
}

/// Confidence formula over data quantity, span coverage, and noise.
fn confidence(
    data_points: usize,
    span_days: f64,
    days_to_due: f64,
    observations: &[GoalObservation],
) -> f64 {
    let points_term = (points_f64(data_points) / 10.0).min(1.0) * 0.2;
    let span_term = if days_to_due > 0.0 {
        (span_days / days_to_due).clamp(0.0, 1.0) * 0.2
    } else {
        0.2
    };
    let noise_term = (1.0 - velocity_variance(observations)) * 0.1;
    (0.5 + points_term + span_term + noise_term).clamp(0.0, 1.0)
}

/// Normalized variance of segment velocities, 0 (steady) to 1 (noisy).
fn velocity_variance(observations: &[GoalObservation]) -> f64 {
    let mut segments = Vec::new();
    for pair in observations.windows(2) {
        if let [a, b] = pair {
            let span = b.at.days_since(a.at);
            if span > 0.0 {
                segments.push((b.value - a.value) / span);
            }
        }
    }
    if segments.len() < 2 {
        return 0.0;
    }
    let count = points_f64(segments.len());
    let mean = segments.iter().sum::<f64>() / count;
    let variance = segments.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    if mean.abs() < f64::EPSILON {
        return 1.0;
    }
    (variance.sqrt() / mean.abs()).clamp(0.0, 1.0)
}

/// Converts an observation count to f64 for ratio math.
#[allow(clippy::cast_precision_loss, reason = "observation counts are small")]
fn points_f64(count: usize) -> f64 {
    count as f64
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use crate::core::Goal;
    use crate::core::GoalStatus;
    use crate::core::GoalType;
    use crate::core::Timestamp;

    use super::GoalObservation;
    use super::OnTrack;
    use super::derive_trajectory;

    /// Revenue goal due 100 days from epoch.
    fn goal(target: f64, current: f64) -> Goal {
        Goal {
            id: "g1".into(),
            company_id: "c1".into(),
            goal_type: GoalType::Revenue,
            target,
            current,
            due: Timestamp::from_unix_millis(0).plus_days(100),
            status: GoalStatus::Active,
            weight: None,
        }
    }

    /// Observation at day `d` with value `v`.
    fn obs(d: i64, v: f64) -> GoalObservation {
        GoalObservation { at: Timestamp::from_unix_millis(0).plus_days(d), value: v }
    }

    #[test]
    fn single_point_is_unknown_with_required_velocity() {
        let trajectory =
            derive_trajectory(&goal(1_000.0, 100.0), &[obs(0, 100.0)], Timestamp::from_unix_millis(0));
        assert_eq!(trajectory.on_track, OnTrack::Unknown);
        let required = trajectory.required_velocity_per_day.unwrap();
        assert!((required - 9.0).abs() < 1e-9);
    }

    #[test]
    fn positive_velocity_projects_completion() {
        let now = Timestamp::from_unix_millis(0).plus_days(10);
        let trajectory =
            derive_trajectory(&goal(1_000.0, 0.0), &[obs(0, 0.0), obs(10, 200.0)], now);
        assert_eq!(trajectory.on_track, OnTrack::Yes);
        let projected = trajectory.projected_completion.unwrap();
        assert!((now.days_until(projected) - 40.0).abs() < 0.01);
    }

    #[test]
    fn negative_velocity_under_target_is_off_track() {
        let now = Timestamp::from_unix_millis(0).plus_days(10);
        let trajectory =
            derive_trajectory(&goal(1_000.0, 100.0), &[obs(0, 300.0), obs(10, 100.0)], now);
        assert_eq!(trajectory.on_track, OnTrack::No);
        assert!(trajectory.projected_completion.is_none());
    }

    #[test]
    fn already_met_completes_today() {
        let now = Timestamp::from_unix_millis(0).plus_days(10);
        let trajectory =
            derive_trajectory(&goal(100.0, 150.0), &[obs(0, 90.0), obs(10, 150.0)], now);
        assert_eq!(trajectory.on_track, OnTrack::Yes);
        assert_eq!(trajectory.projected_completion, Some(now));
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        let now = Timestamp::from_unix_millis(0).plus_days(50);
        let series: Vec<_> =
            (0i32..12).map(|i| obs(i64::from(i) * 4, f64::from(i) * 50.0)).collect();
        let trajectory = derive_trajectory(&goal(5_000.0, 550.0), &series, now);
        assert!((0.0..=1.0).contains(&trajectory.confidence));
    }
}
