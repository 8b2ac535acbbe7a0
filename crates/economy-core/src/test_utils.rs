//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::graph::{ItemGraph, ItemGraphBuilder};
use crate::id::Quantity;
use crate::observer::{Level, RecordingObserver};
use crate::producer::{ProduceContext, Producer};

/// Producer that announces itself and yields one unit. Its operation tag is
/// whatever it was constructed with.
#[derive(Debug, Clone)]
pub struct StubProducer {
    operation: String,
}

impl StubProducer {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl Producer for StubProducer {
    fn operation(&self) -> &str {
        &self.operation
    }

    fn produce(&self, ctx: &ProduceContext<'_>) -> Option<Quantity> {
        ctx.info(format!("producing {}", ctx.item));
        Some(1)
    }
}

/// Build a graph whose items use [`StubProducer`] tagged with the item name.
///
/// Panics on invalid input; intended for tests.
pub fn graph_from_edges(items: &[&str], edges: &[(&str, &str)]) -> ItemGraph {
    let mut builder = ItemGraphBuilder::new();
    for &name in items {
        builder
            .add_item(name, StubProducer::new(name))
            .expect("duplicate item in test graph");
    }
    for &(producer, consumer) in edges {
        builder
            .add_dependency(producer, consumer)
            .expect("unknown item in test edge");
    }
    builder.build()
}

/// Chain `item_0 -> item_1 -> ... -> item_{n-1}`.
pub fn chain_graph(n: usize) -> ItemGraph {
    let names: Vec<String> = (0..n).map(|i| format!("item_{i:04}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
    graph_from_edges(&refs, &edges)
}

/// Layered DAG: `layers` layers of `width` items, every item depending on
/// every item of the previous layer.
pub fn layered_graph(layers: usize, width: usize) -> ItemGraph {
    let names: Vec<Vec<String>> = (0..layers)
        .map(|l| (0..width).map(|w| format!("l{l:03}_w{w:03}")).collect())
        .collect();
    let refs: Vec<&str> = names.iter().flatten().map(String::as_str).collect();
    let mut edges = Vec::new();
    for pair in names.windows(2) {
        for from in &pair[0] {
            for to in &pair[1] {
                edges.push((from.as_str(), to.as_str()));
            }
        }
    }
    graph_from_edges(&refs, &edges)
}

/// Operation tags of producer (info-level) events, in emission order.
pub fn produced_operations(observer: &RecordingObserver) -> Vec<String> {
    observer.operations_at(Level::Info)
}
