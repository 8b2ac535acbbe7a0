use crate::id::ItemId;
use crate::producer::Producer;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while building or resolving the item graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("duplicate item: {0}")]
    DuplicateItem(String),
    #[error("cycle detected among items: {}", .remaining.join(", "))]
    CycleDetected {
        /// Items that could not be ordered, sorted by name.
        remaining: Vec<String>,
    },
    #[error("item id not found: {0:?}")]
    InvalidItemId(ItemId),
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Adjacency lists for a single item.
#[derive(Debug, Clone, Default)]
struct ItemAdjacency {
    /// Direct prerequisites (edges whose consumer is this item).
    producers: Vec<ItemId>,
    /// Direct dependents (edges whose producer is this item).
    consumers: Vec<ItemId>,
}

/// Per-item data: the unique name and the producer bound to it.
#[derive(Debug)]
pub struct ItemNode {
    name: String,
    producer: Box<dyn Producer>,
}

impl ItemNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn producer(&self) -> &dyn Producer {
        self.producer.as_ref()
    }
}

/// A directed `producer -> consumer` dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The prerequisite item.
    pub producer: ItemId,
    /// The item that needs it.
    pub consumer: ItemId,
}

/// Shared storage behind both the builder and the frozen graph.
///
/// Adjacency lives in a `SecondaryMap` keyed by `ItemId` so it always stays in
/// sync with the primary `items` SlotMap. Items are never removed, so SlotMap
/// iteration follows registration order.
#[derive(Debug, Default)]
struct Storage {
    items: SlotMap<ItemId, ItemNode>,
    adjacency: SecondaryMap<ItemId, ItemAdjacency>,
    names: HashMap<String, ItemId>,
    edges: Vec<Edge>,
}

impl Storage {
    fn lookup(&self, name: &str) -> Result<ItemId, GraphError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownItem(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ItemGraphBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`ItemGraph`].
///
/// Registration is additive only: items and dependencies can be added but
/// never removed. Call [`build`](Self::build) to freeze the graph before
/// handing it to a production engine.
///
/// # Examples
///
/// ```
/// use economy_core::graph::ItemGraphBuilder;
/// use economy_core::reference::{ChopTree, MillLumber};
///
/// let mut builder = ItemGraphBuilder::new();
/// builder.add_item("tree", ChopTree).unwrap();
/// builder.add_item("lumber", MillLumber).unwrap();
/// builder.add_dependency("tree", "lumber").unwrap();
///
/// let graph = builder.build();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug)]
pub struct ItemGraphBuilder {
    storage: Storage,
}

impl Default for ItemGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemGraphBuilder {
    pub fn new() -> Self {
        Self {
            storage: Storage::default(),
        }
    }

    /// Register an item bound to `producer`. Returns its ID.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        producer: impl Producer + 'static,
    ) -> Result<ItemId, GraphError> {
        self.add_boxed_item(name, Box::new(producer))
    }

    /// Register an item with an already boxed producer.
    pub fn add_boxed_item(
        &mut self,
        name: impl Into<String>,
        producer: Box<dyn Producer>,
    ) -> Result<ItemId, GraphError> {
        let name = name.into();
        if self.storage.names.contains_key(&name) {
            return Err(GraphError::DuplicateItem(name));
        }

        let id = self.storage.items.insert(ItemNode {
            name: name.clone(),
            producer,
        });
        self.storage.adjacency.insert(id, ItemAdjacency::default());
        self.storage.names.insert(name, id);
        Ok(id)
    }

    /// Register `producer` as a direct prerequisite of `consumer`.
    ///
    /// Both endpoints must already be registered; on failure nothing is
    /// changed. Adding an edge that already exists is a no-op. Self-loops are
    /// accepted here and reported as cycles during resolution.
    pub fn add_dependency(&mut self, producer: &str, consumer: &str) -> Result<(), GraphError> {
        let from = self.storage.lookup(producer)?;
        let to = self.storage.lookup(consumer)?;

        let edge = Edge {
            producer: from,
            consumer: to,
        };
        if self.storage.edges.contains(&edge) {
            return Ok(());
        }

        if let Some(adj) = self.storage.adjacency.get_mut(from) {
            adj.consumers.push(to);
        }
        if let Some(adj) = self.storage.adjacency.get_mut(to) {
            adj.producers.push(from);
        }
        self.storage.edges.push(edge);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.storage.names.contains_key(name)
    }

    pub fn item_count(&self) -> usize {
        self.storage.items.len()
    }

    pub fn edge_count(&self) -> usize {
        self.storage.edges.len()
    }

    /// Freeze the registered items and dependencies.
    pub fn build(self) -> ItemGraph {
        ItemGraph {
            storage: self.storage,
        }
    }
}

// ---------------------------------------------------------------------------
// ItemGraph
// ---------------------------------------------------------------------------

/// The frozen economy graph: items bound to producers, connected by
/// `producer -> consumer` dependencies.
///
/// Resolution queries live in [`crate::resolver`]; DOT export in
/// [`crate::export`].
#[derive(Debug)]
pub struct ItemGraph {
    storage: Storage,
}

impl ItemGraph {
    /// Look up an item by name.
    pub fn id_of(&self, name: &str) -> Option<ItemId> {
        self.storage.names.get(name).copied()
    }

    /// Look up an item by name, failing with [`GraphError::UnknownItem`].
    pub fn lookup(&self, name: &str) -> Result<ItemId, GraphError> {
        self.storage.lookup(name)
    }

    pub fn get(&self, item: ItemId) -> Option<&ItemNode> {
        self.storage.items.get(item)
    }

    pub fn name_of(&self, item: ItemId) -> Option<&str> {
        self.get(item).map(ItemNode::name)
    }

    pub fn producer_of(&self, item: ItemId) -> Option<&dyn Producer> {
        self.get(item).map(ItemNode::producer)
    }

    /// Names of the given items, skipping IDs not in this graph.
    pub fn names_of(&self, items: impl IntoIterator<Item = ItemId>) -> Vec<&str> {
        items
            .into_iter()
            .filter_map(|id| self.name_of(id))
            .collect()
    }

    /// Direct prerequisites of an item, in registration order.
    pub fn predecessors(&self, item: ItemId) -> &[ItemId] {
        self.storage
            .adjacency
            .get(item)
            .map(|adj| adj.producers.as_slice())
            .unwrap_or(&[])
    }

    /// Direct dependents of an item, in registration order.
    pub fn successors(&self, item: ItemId) -> &[ItemId] {
        self.storage
            .adjacency
            .get(item)
            .map(|adj| adj.consumers.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.storage.items.contains_key(item)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.storage.names.contains_key(name)
    }

    pub fn item_count(&self) -> usize {
        self.storage.items.len()
    }

    pub fn edge_count(&self) -> usize {
        self.storage.edges.len()
    }

    /// Iterate over all items in registration order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &ItemNode)> {
        self.storage.items.iter()
    }

    /// All dependencies in registration order.
    pub fn edges(&self) -> &[Edge] {
        &self.storage.edges
    }

    /// Name of an item known to be in this graph.
    pub(crate) fn name(&self, item: ItemId) -> &str {
        &self.storage.items[item].name
    }
}
