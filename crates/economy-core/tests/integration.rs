//! Integration tests for the economy engine.
//!
//! These exercise the public API end to end: building graphs, resolving
//! requests, running productions, filtering events and exporting DOT.

use economy_core::engine::ProductionEngine;
use economy_core::graph::{GraphError, ItemGraphBuilder};
use economy_core::observer::{Level, OperationFilter, RecordingObserver};
use economy_core::producer::FnProducer;
use economy_core::reference::{reference_graph, REFERENCE_EDGES};
use economy_core::test_utils::*;
use std::cell::Cell;
use std::rc::Rc;

// ===========================================================================
// Test 1: Reference meal
// ===========================================================================
//
// make("meal") runs the seven ancestors and never the meal producer.

#[test]
fn reference_meal_production() {
    let engine = ProductionEngine::new(reference_graph().unwrap(), RecordingObserver::new());
    let report = engine.make("meal").unwrap();

    let items: Vec<&str> = report.items().collect();
    assert_eq!(items.len(), 7);
    assert!(!items.contains(&"meal"));

    let pos = |name: &str| items.iter().position(|i| *i == name).unwrap();
    for (producer, consumer) in REFERENCE_EDGES {
        if consumer != "meal" {
            assert!(pos(producer) < pos(consumer), "{producer} before {consumer}");
        }
    }

    let ops = produced_operations(engine.observer());
    assert!(!ops.iter().any(|op| op == "have_meal"));
    assert_eq!(report.steps.iter().filter(|s| s.produced == Some(1)).count(), 7);
}

// ===========================================================================
// Test 2: Whitelist filter mirrors per-operation logging
// ===========================================================================

#[test]
fn operation_whitelist_during_production() {
    let recorder = RecordingObserver::new();
    let observer = OperationFilter::new(["make", "mine_iron", "kill_cow"], &recorder);
    let engine = ProductionEngine::new(reference_graph().unwrap(), observer);

    engine.make("meal").unwrap();

    let info_ops = recorder.operations_at(Level::Info);
    assert_eq!(info_ops, vec!["kill_cow".to_string(), "mine_iron".to_string()]);
    // make: one "making a" event plus one per ancestor.
    assert_eq!(recorder.operations_at(Level::Debug).len(), 8);
}

// ===========================================================================
// Test 3: Repeated calls are independent full productions
// ===========================================================================

#[test]
fn repeated_makes_rerun_everything() {
    let count = Rc::new(Cell::new(0u32));
    let mut builder = ItemGraphBuilder::new();
    for name in ["ore", "plate", "gear"] {
        let count = Rc::clone(&count);
        builder
            .add_item(
                name,
                FnProducer::new(name, move |ctx| {
                    count.set(count.get() + 1);
                    ctx.info(format!("made {}", ctx.item));
                    Some(1)
                }),
            )
            .unwrap();
    }
    builder.add_dependency("ore", "plate").unwrap();
    builder.add_dependency("plate", "gear").unwrap();
    let engine = ProductionEngine::new(builder.build(), RecordingObserver::new());

    for round in 1..=3 {
        engine.make("gear").unwrap();
        assert_eq!(count.get(), round * 2);
    }
}

// ===========================================================================
// Test 4: Failures are structural and leave no trace
// ===========================================================================

#[test]
fn failed_make_has_no_side_effects() {
    let graph = graph_from_edges(
        &["a", "b", "sink", "ok"],
        &[("a", "b"), ("b", "a"), ("b", "sink")],
    );
    let engine = ProductionEngine::new(graph, RecordingObserver::new());

    let err = engine.make("sink").unwrap_err();
    assert_eq!(
        err,
        GraphError::CycleDetected {
            remaining: vec!["a".to_string(), "b".to_string()]
        }
    );
    assert!(produced_operations(engine.observer()).is_empty());

    // Unrelated parts of the graph keep working.
    assert!(engine.make("ok").unwrap().is_empty());
    assert_eq!(engine.graph().item_count(), 4);
    assert_eq!(engine.graph().edge_count(), 3);
}

#[test]
fn rejected_dependency_keeps_graph_intact() {
    let mut builder = ItemGraphBuilder::new();
    economy_core::reference::register_reference(&mut builder).unwrap();

    assert_eq!(
        builder.add_dependency("gold", "table"),
        Err(GraphError::UnknownItem("gold".to_string()))
    );
    assert_eq!(
        builder.add_dependency("table", "palace"),
        Err(GraphError::UnknownItem("palace".to_string()))
    );
    assert_eq!(builder.item_count(), 8);
    assert_eq!(builder.edge_count(), 7);
}

// ===========================================================================
// Test 5: Larger graphs
// ===========================================================================

#[test]
fn long_chain_runs_in_order() {
    let graph = chain_graph(200);
    let engine = ProductionEngine::new(graph, RecordingObserver::new());
    let report = engine.make("item_0199").unwrap();

    assert_eq!(report.len(), 199);
    let items: Vec<&str> = report.items().collect();
    let mut sorted = items.clone();
    sorted.sort();
    assert_eq!(items, sorted);
}

#[test]
fn layered_graph_respects_layers() {
    let graph = layered_graph(5, 4);
    let engine = ProductionEngine::new(graph, RecordingObserver::new());
    let report = engine.make("l004_w000").unwrap();

    assert_eq!(report.len(), 16);
    let layers: Vec<&str> = report.items().map(|i| &i[..4]).collect();
    let mut sorted = layers.clone();
    sorted.sort();
    assert_eq!(layers, sorted);
}

// ===========================================================================
// Test 6: DOT export
// ===========================================================================

#[test]
fn dot_export_round_trips_structure() {
    let graph = reference_graph().unwrap();
    let mut out = Vec::new();
    economy_core::export::write_dot(&graph, &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();

    for (producer, consumer) in REFERENCE_EDGES {
        assert!(dot.contains(&format!("\"{producer}\" -> \"{consumer}\";")));
    }
    assert_eq!(dot.lines().filter(|l| l.contains("[handler=")).count(), 8);
}
