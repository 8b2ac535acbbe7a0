//! Dependency resolution: ancestor closure and deterministic topological
//! ordering over the item graph.
//!
//! Resolution is a pure function of the graph and the request. It always
//! completes before any producer runs, so a cycle can never be discovered
//! halfway through a production.

use crate::graph::{GraphError, ItemGraph};
use crate::id::ItemId;
use slotmap::SecondaryMap;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Every item with a directed path to some target, excluding the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorSet {
    items: BTreeSet<ItemId>,
}

impl AncestorSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }
}

impl FromIterator<ItemId> for AncestorSet {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AncestorSet {
    type Item = ItemId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, ItemId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

/// A sequence in which every producer appears before its consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOrder {
    items: Vec<ItemId>,
}

impl ExecutionOrder {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    /// Index of an item in the order, if present.
    pub fn position(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|&id| id == item)
    }
}

/// Complete resolution of one production request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: ItemId,
    pub ancestors: AncestorSet,
    pub order: ExecutionOrder,
}

// ---------------------------------------------------------------------------
// Resolution queries
// ---------------------------------------------------------------------------

impl ItemGraph {
    /// All items with a path to `item`, excluding `item` itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use economy_core::reference::reference_graph;
    ///
    /// let graph = reference_graph().unwrap();
    /// let ancestors = graph.ancestors_of("table").unwrap();
    /// let mut names = graph.names_of(&ancestors);
    /// names.sort();
    /// assert_eq!(names, vec!["iron", "lumber", "nails", "tree"]);
    /// ```
    pub fn ancestors_of(&self, item: &str) -> Result<AncestorSet, GraphError> {
        let target = self.lookup(item)?;
        Ok(self.collect_ancestors(target).0)
    }

    /// Like [`ancestors_of`](Self::ancestors_of), addressed by ID.
    pub fn ancestors_of_id(&self, item: ItemId) -> Result<AncestorSet, GraphError> {
        if !self.contains(item) {
            return Err(GraphError::InvalidItemId(item));
        }
        Ok(self.collect_ancestors(item).0)
    }

    /// Order `subset` so that every edge with both endpoints inside it points
    /// forward. Ties between ready items are broken by item name.
    ///
    /// Fails with [`GraphError::CycleDetected`] if the subset contains a cycle.
    pub fn topological_order(
        &self,
        subset: impl IntoIterator<Item = ItemId>,
    ) -> Result<ExecutionOrder, GraphError> {
        let mut members = BTreeSet::new();
        for id in subset {
            if !self.contains(id) {
                return Err(GraphError::InvalidItemId(id));
            }
            members.insert(id);
        }

        // In-degree counts only edges internal to the subset.
        let mut in_degree: SecondaryMap<ItemId, usize> = SecondaryMap::new();
        for &id in &members {
            let deg = self
                .predecessors(id)
                .iter()
                .filter(|p| members.contains(p))
                .count();
            in_degree.insert(id, deg);
        }

        // Ready set keyed by name so the pop order is reproducible.
        let mut ready: BTreeSet<(&str, ItemId)> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(id, _)| (self.name(id), id))
            .collect();

        let mut order = Vec::with_capacity(members.len());
        while let Some((_, node)) = ready.pop_first() {
            order.push(node);
            for &next in self.successors(node) {
                if let Some(deg) = in_degree.get_mut(next) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert((self.name(next), next));
                    }
                }
            }
        }

        if order.len() < members.len() {
            let mut remaining: Vec<String> = in_degree
                .iter()
                .filter(|&(_, &deg)| deg > 0)
                .map(|(id, _)| self.name(id).to_string())
                .collect();
            remaining.sort();
            return Err(GraphError::CycleDetected { remaining });
        }

        Ok(ExecutionOrder { items: order })
    }

    /// Resolve a production request for `target`: its ancestors and the order
    /// to produce them in.
    ///
    /// Besides cycles among the ancestors, this also rejects a target that
    /// lies on a cycle itself (it would otherwise be its own prerequisite).
    pub fn resolve(&self, target: &str) -> Result<Resolution, GraphError> {
        let id = self.lookup(target)?;
        let (ancestors, self_dependent) = self.collect_ancestors(id);

        if self_dependent {
            let mut remaining: Vec<String> = self
                .collect_descendants(id)
                .into_iter()
                .filter(|d| ancestors.contains(*d))
                .map(|d| self.name(d).to_string())
                .collect();
            remaining.push(target.to_string());
            remaining.sort();
            return Err(GraphError::CycleDetected { remaining });
        }

        let order = self.topological_order(&ancestors)?;
        Ok(Resolution {
            target: id,
            ancestors,
            order,
        })
    }

    /// Backward reachability from `target`. The flag reports whether the
    /// target was reached from itself.
    fn collect_ancestors(&self, target: ItemId) -> (AncestorSet, bool) {
        let mut seen = BTreeSet::new();
        let mut self_dependent = false;
        let mut stack = vec![target];

        while let Some(node) = stack.pop() {
            for &pred in self.predecessors(node) {
                if pred == target {
                    self_dependent = true;
                } else if seen.insert(pred) {
                    stack.push(pred);
                }
            }
        }

        (AncestorSet { items: seen }, self_dependent)
    }

    /// Forward reachability from `source`, excluding `source`.
    fn collect_descendants(&self, source: ItemId) -> BTreeSet<ItemId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![source];

        while let Some(node) = stack.pop() {
            for &next in self.successors(node) {
                if next != source && seen.insert(next) {
                    stack.push(next);
                }
            }
        }

        seen
    }
}
