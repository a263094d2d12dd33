//! Routes: ordered node sequences produced by completed searches.

use crate::id::NodeSlot;

/// An ordered sequence of node handles produced by one completed path
/// search.
///
/// The penalty machinery treats routes as read-only: it samples a
/// subset of the positions and perturbs those nodes' weights, but
/// never reorders or edits the sequence. Handles stay valid across
/// node removal (they simply stop resolving), so a route may safely
/// outlive parts of the graph it crosses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    nodes: Vec<NodeSlot>,
}

impl Route {
    /// Wrap an ordered node sequence as a route.
    ///
    /// An empty sequence is a legal route; applying a penalty to it is
    /// a no-op that still cycles the ledger.
    pub fn new(nodes: Vec<NodeSlot>) -> Self {
        Self { nodes }
    }

    /// Number of nodes on the route.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the route has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The route's nodes in traversal order.
    pub fn nodes(&self) -> &[NodeSlot] {
        &self.nodes
    }

    /// Consume the route, yielding its node sequence.
    pub fn into_nodes(self) -> Vec<NodeSlot> {
        self.nodes
    }
}

impl From<Vec<NodeSlot>> for Route {
    fn from(nodes: Vec<NodeSlot>) -> Self {
        Self::new(nodes)
    }
}
