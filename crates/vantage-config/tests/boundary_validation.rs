//! Config boundary validation tests for vantage-config.
// crates/vantage-config/tests/boundary_validation.rs
// =============================================================================
// Module: Config Boundary Validation Tests
// Description: Validate range and ordering checks on tunable values.
// Purpose: Ensure invalid tunables never become engine settings.
// =============================================================================

use vantage_config::ConfigError;
use vantage_config::VantageConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn rejects_non_positive_half_life() -> TestResult {
    let mut config = VantageConfig::default();
    config.assumptions.relationship_half_life_days = 0.0;
    assert_invalid(config.validate(), "relationshipHalfLifeDays")?;
    Ok(())
}

#[test]
fn rejects_unordered_urgency_windows() -> TestResult {
    let mut config = VantageConfig::default();
    config.assumptions.urgency_windows_days = [14.0, 7.0, 30.0, 60.0];
    assert_invalid(config.validate(), "urgencyWindowsDays")?;
    Ok(())
}

#[test]
fn rejects_baseline_conversion_of_one() -> TestResult {
    let mut config = VantageConfig::default();
    config.assumptions.intro_baseline_conversion = 1.0;
    assert_invalid(config.validate(), "introBaselineConversion")?;
    Ok(())
}

#[test]
fn rejects_component_floor_above_ceiling() -> TestResult {
    let mut config = VantageConfig::default();
    config.weights.component_floor = 0.9;
    config.weights.component_ceiling = 0.5;
    assert_invalid(config.validate(), "componentFloor")?;
    Ok(())
}

#[test]
fn rejects_obviousness_cap_of_one() -> TestResult {
    let mut config = VantageConfig::default();
    config.weights.obviousness_cap = 1.0;
    assert_invalid(config.validate(), "obviousnessCap")?;
    Ok(())
}

#[test]
fn rejects_proactivity_ratio_above_one() -> TestResult {
    let mut config = VantageConfig::default();
    config.weights.proactivity_no_gate = 1.5;
    assert_invalid(config.validate(), "proactivityNoGate")?;
    Ok(())
}

#[test]
fn rejects_zero_top_n() -> TestResult {
    let mut config = VantageConfig::default();
    config.weights.proactivity_top_n = 0;
    assert_invalid(config.validate(), "proactivityTopN")?;
    Ok(())
}

#[test]
fn rejects_inverted_stage_bound() -> TestResult {
    use vantage_core::core::MetricBound;
    use vantage_core::core::Stage;
    use vantage_core::core::StageOverrides;

    let mut config = VantageConfig::default();
    config.stage_params.insert(
        Stage::Seed,
        StageOverrides { burn: Some(MetricBound::range(100.0, 10.0)), ..StageOverrides::default() },
    );
    assert_invalid(config.validate(), "bound min exceeds max")?;
    Ok(())
}

#[test]
fn rejects_out_of_range_goal_weight_override() -> TestResult {
    use vantage_core::core::GoalType;

    let mut config = VantageConfig::default();
    config.assumptions.goal_weight_overrides.insert(GoalType::Revenue, 5.0);
    assert_invalid(config.validate(), "goalWeightOverrides")?;
    Ok(())
}

#[test]
fn rejects_empty_forbidden_field_entry() -> TestResult {
    let mut config = VantageConfig::default();
    config.forbidden_fields.push(String::new());
    assert_invalid(config.validate(), "forbiddenFields")?;
    Ok(())
}
