// crates/vantage-core/tests/determinism.rs
// ============================================================================
// Module: Engine Determinism Tests
// Description: Byte-identical output for identical inputs.
// Purpose: Pin the referential-transparency contract of compute.
// ============================================================================

//! Determinism tests for `Engine::compute`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use vantage_core::ComputeOptions;
use vantage_core::Engine;
use vantage_core::core::canonical_digest;

#[test]
fn identical_inputs_produce_byte_identical_output() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let options = ComputeOptions::default();

    let first = engine.compute(&graph, common::now(), &options).unwrap();
    let second = engine.compute(&graph, common::now(), &options).unwrap();

    let first_digest = canonical_digest(&first).unwrap();
    let second_digest = canonical_digest(&second).unwrap();
    assert_eq!(first_digest, second_digest);
}

#[test]
fn ranked_triples_are_identical_across_runs() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let options = ComputeOptions::default();

    let first = engine.compute(&graph, common::now(), &options).unwrap();
    let second = engine.compute(&graph, common::now(), &options).unwrap();

    let triples = |output: &vantage_core::EngineOutput| -> Vec<(String, u32, f64)> {
        output
            .actions
            .iter()
            .map(|action| (action.id.to_string(), action.rank, action.rank_score))
            .collect()
    };
    assert_eq!(triples(&first), triples(&second));
    assert!(!first.actions.is_empty());
}

#[test]
fn input_hash_is_stable_and_changes_with_input() {
    let graph = common::cliff_graph(true, false);
    let engine = Engine::default();
    let options = ComputeOptions::default();

    let first = engine.compute(&graph, common::now(), &options).unwrap();
    let second = engine.compute(&graph, common::now(), &options).unwrap();
    assert_eq!(first.meta.input_hash, second.meta.input_hash);

    let changed = common::cliff_graph(false, false);
    let third = engine.compute(&changed, common::now(), &options).unwrap();
    assert_ne!(first.meta.input_hash, third.meta.input_hash);
}

#[test]
fn ranks_are_dense_from_one() {
    let graph = common::cliff_graph(true, true);
    let engine = Engine::default();
    let output = engine.compute(&graph, common::now(), &ComputeOptions::default()).unwrap();
    for (index, action) in output.actions.iter().enumerate() {
        assert_eq!(usize::try_from(action.rank).unwrap(), index + 1);
    }
}
