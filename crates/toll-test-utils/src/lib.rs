//! Test utilities and mock types for Toll development.
//!
//! Provides a `HashMap`-backed [`MockWeightStore`] for exercising the
//! penalty engine without an arena, plus fixture helpers for building
//! baseline graphs and routes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;

use toll_arena::NodeArena;
use toll_core::{NodeSlot, Route, WeightStore};

/// Mock implementation of [`WeightStore`].
///
/// Backed by a `HashMap<NodeSlot, u64>` for flexible test setup.
/// Pre-populate nodes with [`set_node`](MockWeightStore::set_node),
/// tamper with weights mid-test via [`WeightStore::set_weight`], and
/// simulate node removal with [`remove_node`](MockWeightStore::remove_node).
#[derive(Clone, Debug, Default)]
pub struct MockWeightStore {
    nodes: HashMap<NodeSlot, u64>,
}

impl MockWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a node with a weight.
    pub fn set_node(&mut self, node: NodeSlot, weight: u64) {
        self.nodes.insert(node, weight);
    }

    /// Simulate external node removal; the handle stops resolving.
    pub fn remove_node(&mut self, node: NodeSlot) -> Option<u64> {
        self.nodes.remove(&node)
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl WeightStore for MockWeightStore {
    fn weight(&self, node: NodeSlot) -> Option<u64> {
        self.nodes.get(&node).copied()
    }

    fn set_weight(&mut self, node: NodeSlot, weight: u64) -> bool {
        match self.nodes.get_mut(&node) {
            Some(w) => {
                *w = weight;
                true
            }
            None => false,
        }
    }
}

/// A mock store pre-populated with `count` synthetic nodes at
/// `baseline` weight, plus a route over all of them in order.
pub fn mock_store_with_route(count: usize, baseline: u64) -> (MockWeightStore, Route) {
    let mut store = MockWeightStore::new();
    let mut nodes = Vec::with_capacity(count);
    for index in 0..count {
        let node = NodeSlot {
            index: index as u32,
            generation: 0,
        };
        store.set_node(node, baseline);
        nodes.push(node);
    }
    (store, Route::new(nodes))
}

/// An arena of `count` nodes at `baseline` weight plus a route over
/// all of them in insertion order.
pub fn arena_with_route(count: usize, baseline: u64) -> (NodeArena, Route) {
    let (arena, slots) = NodeArena::with_baseline(count, baseline);
    (arena, Route::new(slots))
}
