//! Config load validation tests for vantage-config.
// crates/vantage-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use vantage_config::ConfigError;
use vantage_config::VantageConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<VantageConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(VantageConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(VantageConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(VantageConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(VantageConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[assumptions\n").map_err(|err| err.to_string())?;
    assert_invalid(VantageConfig::load(Some(file.path())), "config parse failed")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"surprise = true\n").map_err(|err| err.to_string())?;
    assert_invalid(VantageConfig::load(Some(file.path())), "config parse failed")?;
    Ok(())
}

#[test]
fn load_accepts_partial_overrides() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(
        b"[assumptions]\nrelationshipHalfLifeDays = 120.0\n\n[weights]\nobviousnessCap = 0.7\n",
    )
    .map_err(|err| err.to_string())?;
    let config = VantageConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if (config.assumptions.relationship_half_life_days - 120.0).abs() > f64::EPSILON {
        return Err("half-life override not applied".to_string());
    }
    if (config.weights.obviousness_cap - 0.7).abs() > f64::EPSILON {
        return Err("obviousness cap override not applied".to_string());
    }
    if (config.weights.component_floor - 0.2).abs() > f64::EPSILON {
        return Err("untouched weight lost its default".to_string());
    }
    Ok(())
}
