// crates/vantage-core/tests/export_firewall.rs
// ============================================================================
// Module: Export Firewall Tests
// Description: The two exporters and the no-derived-in-raw property.
// Purpose: Ensure derived state can never reach storage-bound JSON.
// ============================================================================

//! Export firewall tests for `export_raw` and `export_computed`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use vantage_core::ComputeOptions;
use vantage_core::Engine;
use vantage_core::core::scan_forbidden;
use vantage_core::core::validate_no_forbidden_fields;
use vantage_core::export_computed;
use vantage_core::export_raw;

#[test]
fn raw_graph_passes_the_forbidden_scan_after_export() {
    let graph = common::cliff_graph(true, true);
    let value = serde_json::to_value(&graph).unwrap();
    let exported = export_raw(&value);
    assert!(validate_no_forbidden_fields(&exported).is_ok());
}

#[test]
fn engine_output_is_fully_stripped_by_export_raw() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();

    let value = serde_json::to_value(&output).unwrap();
    assert!(!scan_forbidden(&value).is_empty(), "derived payload must carry derived keys");

    let stripped = export_raw(&value);
    assert!(scan_forbidden(&stripped).is_empty());
    assert!(stripped.get("actions").is_none());
}

#[test]
fn export_raw_round_trips_to_a_fixed_point() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    let value = serde_json::to_value(&output).unwrap();

    let once = export_raw(&value);
    let twice = export_raw(&once);
    assert_eq!(once, twice);
}

#[test]
fn export_computed_exposes_derived_payload_and_meta() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();

    let computed = export_computed(&output).unwrap();
    assert!(computed["derived"]["companies"].is_array());
    assert!(computed["derived"]["priorities"].is_array());
    assert!(computed["derived"]["todayActions"].is_array());
    assert!(computed["meta"]["inputHash"].is_string());
    // Nothing raw leaks: the computed payload never echoes raw scalars.
    assert!(computed["derived"]["companies"][0].get("cash").is_none());
}

#[test]
fn forbidden_raw_json_is_rejected_with_its_path() {
    // Hand-built payloads are the threat model: the typed graph cannot carry
    // derived keys, so the JSON-level validator is the boundary that must
    // catch them before anything reaches the engine.
    let raw_value = serde_json::json!({"companies": [{"id": "c1", "runway": 2.0}]});
    let error = validate_no_forbidden_fields(&raw_value).unwrap_err();
    assert!(error.to_string().contains("$.companies[0].runway"));
}
