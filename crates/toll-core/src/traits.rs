//! The [`WeightStore`] seam between the penalty engine and the graph.

use crate::id::NodeSlot;

/// Mutable access to per-node traversal weights.
///
/// This is the only surface the penalty engine touches on the graph:
/// it reads a node's weight and writes an adjusted one back. The graph
/// owns its nodes; the engine holds handles and mutates relatively,
/// so the two sides stay decoupled.
///
/// Implementations must resolve stale handles to `None` rather than to
/// a reused slot's current occupant — revert correctness depends on
/// never touching a node the record did not penalize.
pub trait WeightStore {
    /// The node's current weight, or `None` if the handle no longer
    /// resolves.
    fn weight(&self, node: NodeSlot) -> Option<u64>;

    /// Overwrite the node's weight. Returns `false` (and stores
    /// nothing) if the handle no longer resolves.
    fn set_weight(&mut self, node: NodeSlot, weight: u64) -> bool;
}
