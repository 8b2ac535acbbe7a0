//! Property-based tests for dependency resolution.
//!
//! Generates random DAGs (edges only ever point from a lower to a higher
//! index) and random cyclic graphs, then checks the resolver invariants.

use economy_core::engine::ProductionEngine;
use economy_core::graph::{GraphError, ItemGraph};
use economy_core::id::ItemId;
use economy_core::observer::RecordingObserver;
use economy_core::test_utils::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ===========================================================================
// Generators
// ===========================================================================

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("n{i:02}")).collect()
}

/// Random DAG with up to `max_nodes` items.
fn arb_dag(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2..=max_nodes).prop_flat_map(|n| {
        let edges = proptest::collection::vec((0..n, 0..n), 0..n * 2).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect::<Vec<_>>()
        });
        (Just(n), edges)
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> (ItemGraph, Vec<String>) {
    let names = names(n);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let edge_refs: Vec<(&str, &str)> = edges.iter().map(|&(a, b)| (refs[a], refs[b])).collect();
    (graph_from_edges(&refs, &edge_refs), names)
}

/// Reference ancestor computation by fixpoint iteration over the edge list.
fn naive_ancestors(n: usize, edges: &[(usize, usize)], target: usize) -> BTreeSet<usize> {
    let mut reach: BTreeSet<usize> = BTreeSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for &(a, b) in edges {
            if (b == target || reach.contains(&b)) && a != target && a < n && reach.insert(a) {
                changed = true;
            }
        }
    }
    reach
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Ancestor closure matches a naive fixpoint computation.
    #[test]
    fn ancestors_match_fixpoint((n, edges) in arb_dag(24), pick in 0..24usize) {
        let target = pick % n;
        let (graph, names) = build(n, &edges);

        let got: BTreeSet<String> = graph
            .names_of(&graph.ancestors_of(&names[target]).unwrap())
            .into_iter()
            .map(String::from)
            .collect();
        let expected: BTreeSet<String> = naive_ancestors(n, &edges, target)
            .into_iter()
            .map(|i| names[i].clone())
            .collect();

        prop_assert_eq!(got, expected);
    }

    /// Every internal edge points forward and every member appears once.
    #[test]
    fn order_respects_edges((n, edges) in arb_dag(24)) {
        let (graph, _) = build(n, &edges);
        let all: Vec<ItemId> = graph.items().map(|(id, _)| id).collect();
        let order = graph.topological_order(all.iter().copied()).unwrap();

        prop_assert_eq!(order.len(), n);
        let unique: BTreeSet<ItemId> = order.iter().collect();
        prop_assert_eq!(unique.len(), n);

        for edge in graph.edges() {
            let from = order.position(edge.producer).unwrap();
            let to = order.position(edge.consumer).unwrap();
            prop_assert!(from < to);
        }
    }

    /// The same graph always yields the same order.
    #[test]
    fn order_is_deterministic((n, edges) in arb_dag(16)) {
        let (a, names) = build(n, &edges);
        let (b, _) = build(n, &edges);
        let target = &names[n - 1];

        let order_a = a.names_of(a.resolve(target).unwrap().order.iter());
        let order_b = b.names_of(b.resolve(target).unwrap().order.iter());
        prop_assert_eq!(order_a, order_b);
    }

    /// make(target) produces exactly the ancestor set, never the target.
    #[test]
    fn make_produces_exactly_ancestors((n, edges) in arb_dag(16), pick in 0..16usize) {
        let target = pick % n;
        let (graph, names) = build(n, &edges);
        let expected = naive_ancestors(n, &edges, target).len();
        let engine = ProductionEngine::new(graph, RecordingObserver::new());

        let report = engine.make(&names[target]).unwrap();
        prop_assert_eq!(report.len(), expected);
        prop_assert!(report.items().all(|i| i != names[target]));
        prop_assert_eq!(produced_operations(engine.observer()).len(), expected);
    }

    /// Closing a path back on itself is always reported as a cycle.
    #[test]
    fn back_edge_creates_cycle(len in 2..12usize) {
        let mut edges: Vec<(usize, usize)> = (0..len - 1).map(|i| (i, i + 1)).collect();
        edges.push((len - 1, 0));
        let (graph, _) = build(len, &edges);
        let all: Vec<ItemId> = graph.items().map(|(id, _)| id).collect();

        let result = graph.topological_order(all);
        let is_cycle = matches!(result, Err(GraphError::CycleDetected { .. }));
        prop_assert!(is_cycle);
    }
}
