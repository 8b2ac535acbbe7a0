//! The production engine: resolves a request, then walks the execution order
//! invoking producers.

use crate::graph::{GraphError, ItemGraph};
use crate::id::Quantity;
use crate::observer::{Event, Observer};
use crate::producer::{Materials, ProduceContext, UNIT};

/// Operation tag for events emitted by the engine itself.
pub const MAKE_OPERATION: &str = "make";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One producer invocation during a `make` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionStep {
    pub item: String,
    pub operation: String,
    /// What the producer reported; `None` for consumption-only items.
    pub produced: Option<Quantity>,
}

/// Completion signal of a successful `make` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionReport {
    pub target: String,
    /// Producer invocations in execution order. The target itself is absent.
    pub steps: Vec<ProductionStep>,
}

impl ProductionReport {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the produced items, in execution order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.item.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProductionEngine
// ---------------------------------------------------------------------------

/// Owns a frozen [`ItemGraph`] and the [`Observer`] that receives events.
///
/// `make` only ever reads the graph, so repeated calls are independent full
/// re-productions and a failed call leaves nothing behind.
#[derive(Debug)]
pub struct ProductionEngine<O> {
    graph: ItemGraph,
    observer: O,
}

impl<O: Observer> ProductionEngine<O> {
    pub fn new(graph: ItemGraph, observer: O) -> Self {
        Self { graph, observer }
    }

    pub fn graph(&self) -> &ItemGraph {
        &self.graph
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (ItemGraph, O) {
        (self.graph, self.observer)
    }

    /// Produce every prerequisite of `target`, producers before consumers.
    ///
    /// The target's own producer is not invoked: only its strict ancestors
    /// are produced. Resolution errors are returned before any producer runs.
    pub fn make(&self, target: &str) -> Result<ProductionReport, GraphError> {
        self.observer
            .notify(&Event::debug(MAKE_OPERATION, format!("making a '{target}'")));

        let resolution = self.graph.resolve(target)?;

        let mut steps = Vec::with_capacity(resolution.order.len());
        for id in resolution.order.iter() {
            let name = self.graph.name(id);
            self.observer.notify(&Event::debug(
                MAKE_OPERATION,
                format!("satisfying upstream requirement ({name})"),
            ));

            let materials: Materials = self
                .graph
                .predecessors(id)
                .iter()
                .map(|&pred| (self.graph.name(pred).to_string(), UNIT))
                .collect();

            let Some(producer) = self.graph.producer_of(id) else {
                return Err(GraphError::InvalidItemId(id));
            };
            let ctx = ProduceContext::new(name, producer.operation(), &materials, &self.observer);
            let produced = producer.produce(&ctx);

            steps.push(ProductionStep {
                item: name.to_string(),
                operation: producer.operation().to_string(),
                produced,
            });
        }

        Ok(ProductionReport {
            target: target.to_string(),
            steps,
        })
    }
}
