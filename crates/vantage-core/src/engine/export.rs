// crates/vantage-core/src/engine/export.rs
// ============================================================================
// Module: Vantage Export Firewall
// Description: The only two exits: stripped raw JSON and derived payload.
// Purpose: Make persisting a derived value structurally impossible.
// Dependencies: crate::core::policy, crate::engine::output, serde_json
// ============================================================================

//! ## Overview
//! Two exporters exist. `export_raw` deep-strips every forbidden derived key
//! and every known derived container from a JSON value and is the only
//! function permitted to produce storage-bound JSON; it is idempotent, so
//! `export_raw(export_raw(x)) == export_raw(x)`. `export_computed` extracts
//! the derived payload plus metadata for consumers and never touches
//! storage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::core::policy::DERIVED_CONTAINERS;
use crate::core::policy::FORBIDDEN_FIELDS;
use crate::engine::output::EngineOutput;

// ============================================================================
// SECTION: Raw Export
// ============================================================================

/// Deep-strips forbidden derived keys and derived containers.
///
/// The result is safe to persist; applying the function twice is a no-op.
#[must_use]
pub fn export_raw(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut stripped = Map::new();
            for (key, child) in map {
                if FORBIDDEN_FIELDS.contains(&key.as_str())
                    || DERIVED_CONTAINERS.contains(&key.as_str())
                {
                    continue;
                }
                stripped.insert(key.clone(), export_raw(child));
            }
            Value::Object(stripped)
        }
        Value::Array(items) => Value::Array(items.iter().map(export_raw).collect()),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

// ============================================================================
// SECTION: Computed Export
// ============================================================================

/// Extracts the derived payload plus metadata from engine output.
///
/// # Errors
///
/// Returns a serialization error message when the output cannot be rendered
/// as JSON (non-finite floats would be the only cause and are excluded by
/// construction).
pub fn export_computed(output: &EngineOutput) -> Result<Value, String> {
    let companies = serde_json::to_value(&output.companies).map_err(|err| err.to_string())?;
    let priorities = serde_json::to_value(&output.actions).map_err(|err| err.to_string())?;
    let preissues = serde_json::to_value(&output.preissues).map_err(|err| err.to_string())?;
    let today: Vec<&crate::decide::RankedAction> = output.actions.iter().take(10).collect();
    let today_actions = serde_json::to_value(&today).map_err(|err| err.to_string())?;
    let meta = serde_json::to_value(&output.meta).map_err(|err| err.to_string())?;
    Ok(json!({
        "derived": {
            "companies": companies,
            "priorities": priorities,
            "preissues": preissues,
            "todayActions": today_actions,
        },
        "meta": meta,
    }))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use serde_json::json;

    use crate::core::policy::scan_forbidden;

    use super::export_raw;

    #[test]
    fn forbidden_keys_are_stripped_at_depth() {
        let value = json!({
            "companies": [{"id": "c1", "cash": 10.0, "runway": 3.0}],
            "derived": {"anything": 1},
            "nested": {"issues": [1, 2, 3], "keep": true}
        });
        let stripped = export_raw(&value);
        assert!(scan_forbidden(&stripped).is_empty());
        assert_eq!(stripped["companies"][0]["cash"], json!(10.0));
        assert!(stripped.get("derived").is_none());
        assert!(stripped["nested"].get("issues").is_none());
        assert_eq!(stripped["nested"]["keep"], json!(true));
    }

    #[test]
    fn export_raw_is_idempotent() {
        let value = json!({
            "companies": [{"id": "c1", "health": "RED", "deals": [{"impact": 5}]}],
            "actions": [1, 2],
        });
        let once = export_raw(&value);
        let twice = export_raw(&once);
        assert_eq!(once, twice);
    }
}
