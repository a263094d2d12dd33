//! Strongly-typed identifiers, node handles, and the [`SampledIndices`]
//! type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies one routing agent within a search-cycle driver.
///
/// Agents are registered with the driver and assigned IDs by the caller;
/// the driver rejects duplicate registrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing search-cycle counter.
///
/// Incremented each time the driver runs the pre-search hooks and hands
/// control back to the caller for the next round of searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(pub u64);

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CycleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Generation-scoped handle to a node in a node arena.
///
/// A `NodeSlot` names a slot index plus the generation the slot held
/// when the node was inserted. Removing a node bumps the slot's
/// generation, so handles to removed nodes never resolve — even after
/// the slot has been reused for a different node. This makes it safe
/// for routes and penalty records to outlive the nodes they reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct NodeSlot {
    /// Index of the slot within the arena.
    pub index: u32,
    /// Arena generation of the slot at insertion time.
    pub generation: u32,
}

impl fmt::Display for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeSlot({}@g{})", self.index, self.generation)
    }
}

/// Indices into a route selected by the seeded sampler.
///
/// Uses `SmallVec<[usize; 16]>` to avoid heap allocation for typical
/// sample sets: with the default stride of 10 a route of ~300 nodes
/// still fits inline. Longer routes spill to the heap transparently.
pub type SampledIndices = SmallVec<[usize; 16]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(AgentId(7).to_string(), "7");
        assert_eq!(CycleId(42).to_string(), "42");
    }

    #[test]
    fn cycle_id_defaults_to_zero() {
        // Summary structs derive Default over this field.
        assert_eq!(CycleId::default(), CycleId(0));
    }

    #[test]
    fn node_slot_display_includes_generation() {
        let slot = NodeSlot {
            index: 3,
            generation: 2,
        };
        assert_eq!(slot.to_string(), "NodeSlot(3@g2)");
    }

    #[test]
    fn node_slots_differ_by_generation() {
        let a = NodeSlot {
            index: 0,
            generation: 0,
        };
        let b = NodeSlot {
            index: 0,
            generation: 1,
        };
        assert_ne!(a, b);
    }
}
