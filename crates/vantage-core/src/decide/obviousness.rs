// crates/vantage-core/src/decide/obviousness.rs
// ============================================================================
// Module: Vantage Obviousness Penalty
// Description: Suppression signal from dismissals, surfacing, and focus history.
// Purpose: Stop re-surfacing what the user has already seen, judged, or done.
// Dependencies: crate::core, crate::predict
// ============================================================================

//! ## Overview
//! The obviousness penalty accumulates decay-weighted evidence that an
//! action is already obvious to the user: prior dismissals (mild reasons
//! decay fast, strong reasons slowly), recent surfacing without dismissal,
//! recent user activity on the same company-goal pair, and explicit focus
//! pinning. The sum is capped at 0.8 so no action is ever fully suppressed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ActionEvent;
use crate::core::ActionEventKind;
use crate::core::DismissalEvent;
use crate::core::Timestamp;
use crate::predict::ActionCandidate;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Penalty strength for mild dismissal reasons.
const MILD_STRENGTH: f64 = 0.1;

/// Penalty strength for strong dismissal reasons.
const STRONG_STRENGTH: f64 = 0.35;

/// Half-life for mild dismissal decay, days.
const MILD_HALF_LIFE_DAYS: f64 = 14.0;

/// Half-life for strong dismissal decay, days.
const STRONG_HALF_LIFE_DAYS: f64 = 60.0;

/// Contribution of one recent un-dismissed surfacing, before decay.
const SURFACE_STRENGTH: f64 = 0.05;

/// Half-life for surfacing decay, days.
const SURFACE_HALF_LIFE_DAYS: f64 = 7.0;

/// Contribution when the user recently acted on the same company-goal pair.
const RECENT_ACTION_STRENGTH: f64 = 0.4;

/// Window for recent user action, days.
const RECENT_ACTION_DAYS: f64 = 14.0;

/// Contribution when the action's entity is explicitly focused.
const FOCUS_STRENGTH: f64 = 0.1;

// ============================================================================
// SECTION: Computation
// ============================================================================

/// Computes the obviousness penalty for a candidate, in [0, cap].
#[must_use]
pub fn compute_obviousness(
    candidate: &ActionCandidate,
    dismissals: &[DismissalEvent],
    events: &[ActionEvent],
    focus_entities: &[String],
    cap: f64,
    now: Timestamp,
) -> f64 {
    let mut penalty = 0.0;

    // Dismissal decay: every prior dismissal of this exact action.
    for dismissal in dismissals {
        if dismissal.action_id != candidate.id {
            continue;
        }
        let days_since = now.days_since(dismissal.at).max(0.0);
        let (strength, half_life) = if dismissal.reason.is_strong() {
            (STRONG_STRENGTH, STRONG_HALF_LIFE_DAYS)
        } else {
            (MILD_STRENGTH, MILD_HALF_LIFE_DAYS)
        };
        penalty += strength * 0.5_f64.powf(days_since / half_life);
    }

    // Recent surfacing without dismissal.
    let dismissed = dismissals.iter().any(|dismissal| dismissal.action_id == candidate.id);
    if !dismissed {
        for event in events {
            if event.action_id != candidate.id || event.kind != ActionEventKind::Created {
                continue;
            }
            let days_since = now.days_since(event.at).max(0.0);
            penalty += SURFACE_STRENGTH * 0.5_f64.powf(days_since / SURFACE_HALF_LIFE_DAYS);
        }
    }

    // Recent user action on the same company-goal pair. Action identifiers
    // are content-derived, so the pair is matched on the identifier prefix.
    if let Some(goal_id) = &candidate.goal_id {
        let company_prefix = format!("act:{}:", candidate.company_id);
        let goal_marker = format!(":goal:{goal_id}");
        let intro_marker = format!(":intro:{goal_id}");
        let recently_worked = events.iter().any(|event| {
            matches!(
                event.kind,
                ActionEventKind::Started | ActionEventKind::Completed | ActionEventKind::Executed
            ) && now.days_since(event.at) <= RECENT_ACTION_DAYS
                && event.action_id.as_str().starts_with(&company_prefix)
                && (event.action_id.as_str().contains(&goal_marker)
                    || event.action_id.as_str().contains(&intro_marker))
        });
        if recently_worked {
            penalty += RECENT_ACTION_STRENGTH;
        }
    }

    // Explicit focus pinning makes the suggestion redundant.
    if focus_entities.iter().any(|entity| entity == candidate.company_id.as_str()) {
        penalty += FOCUS_STRENGTH;
    }

    penalty.min(cap)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use smallvec::smallvec;

    use crate::core::DismissalEvent;
    use crate::core::DismissalReason;
    use crate::core::Timestamp;
    use crate::predict::ActionCandidate;
    use crate::predict::ActionSource;

    use super::compute_obviousness;

    /// Minimal goal-sourced candidate.
    fn candidate() -> ActionCandidate {
        ActionCandidate {
            id: "act:c1:res-growth-push:goal:g1:growth".into(),
            company_id: "c1".into(),
            title: "Run a focused growth push — Acme".into(),
            sources: smallvec![ActionSource::Goal {
                goal_id: "g1".into(),
                company_id: "c1".into(),
                goal_type: crate::core::GoalType::Revenue,
                category: crate::predict::ActionCategory::Growth,
            }],
            resolution_id: "res-growth-push".into(),
            steps: smallvec![],
            effort_days: 10.0,
            goal_id: Some("g1".into()),
            timing: None,
            unblocks: Vec::new(),
        }
    }

    /// Dismissal of the candidate, `days_ago` days before `now`.
    fn dismissal(reason: DismissalReason, days_ago: i64, now: Timestamp) -> DismissalEvent {
        DismissalEvent {
            id: "d1".into(),
            action_id: "act:c1:res-growth-push:goal:g1:growth".into(),
            reason,
            user_id: "u1".into(),
            at: now.plus_days(-days_ago),
            company_id: Some("c1".into()),
            goal_id: Some("g1".into()),
            source_type: Some("GOAL".into()),
        }
    }

    #[test]
    fn strong_dismissal_yesterday_lands_in_band() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let penalty = compute_obviousness(
            &candidate(),
            &[dismissal(DismissalReason::Disagree, 1, now)],
            &[],
            &[],
            0.8,
            now,
        );
        assert!((0.3..=0.8).contains(&penalty));
    }

    #[test]
    fn strong_dismissal_halves_after_a_half_life() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let fresh = compute_obviousness(
            &candidate(),
            &[dismissal(DismissalReason::Disagree, 0, now)],
            &[],
            &[],
            0.8,
            now,
        );
        let later = compute_obviousness(
            &candidate(),
            &[dismissal(DismissalReason::Disagree, 60, now)],
            &[],
            &[],
            0.8,
            now,
        );
        assert!((later - fresh / 2.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_never_exceeds_the_cap() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let dismissals: Vec<_> = (0..10)
            .map(|i| {
                let mut d = dismissal(DismissalReason::Disagree, 0, now);
                d.id = format!("d{i}").into();
                d
            })
            .collect();
        let penalty =
            compute_obviousness(&candidate(), &dismissals, &[], &[], 0.8, now);
        assert!((penalty - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn focus_contributes_a_small_penalty() {
        let now = Timestamp::from_unix_millis(0).plus_days(100);
        let penalty = compute_obviousness(
            &candidate(),
            &[],
            &[],
            &["c1".to_string()],
            0.8,
            now,
        );
        assert!((penalty - 0.1).abs() < 1e-9);
    }
}
