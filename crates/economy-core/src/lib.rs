//! Economy Core -- dependency resolution and ordered production for item
//! economies.
//!
//! An economy is a directed graph of items. Every item is bound to exactly one
//! [`producer::Producer`], and an edge `producer -> consumer` means the
//! producer item is a direct prerequisite of the consumer item.
//!
//! # Making an Item
//!
//! Each call to [`engine::ProductionEngine::make`] runs in two strictly
//! separated phases:
//!
//! 1. **Resolve** -- Collect the ancestor set of the target and order it
//!    topologically. Cycles and unknown items fail here, before anything runs.
//! 2. **Produce** -- Walk the order and invoke each item's producer with one
//!    unit of every direct prerequisite.
//!
//! ```rust
//! use economy_core::engine::ProductionEngine;
//! use economy_core::observer::RecordingObserver;
//! use economy_core::reference::reference_graph;
//!
//! let engine = ProductionEngine::new(reference_graph().unwrap(), RecordingObserver::new());
//! let report = engine.make("meal").unwrap();
//! assert_eq!(report.len(), 7);
//! ```
//!
//! # Key Types
//!
//! - [`graph::ItemGraphBuilder`] -- Additive registration of items and
//!   dependencies, frozen into an immutable [`graph::ItemGraph`].
//! - [`resolver::AncestorSet`] / [`resolver::ExecutionOrder`] -- Resolution
//!   results computed fresh for every request.
//! - [`engine::ProductionEngine`] -- Owns the graph and an observer, runs
//!   productions.
//! - [`observer::Observer`] -- Sink for tagged production events.
//! - [`export`] -- Graphviz DOT export of the item graph.

pub mod engine;
pub mod export;
pub mod graph;
pub mod id;
pub mod observer;
pub mod producer;
pub mod reference;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
