//! Slot-based node arena with generation-scoped handles.

use toll_core::{NodeSlot, WeightStore};

/// One arena slot. The generation counts how many nodes have occupied
/// the slot; a handle resolves only while its generation matches.
#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    /// `Some(weight)` while a node occupies the slot.
    weight: Option<u64>,
}

/// Arena-based storage for graph nodes and their traversal weights.
///
/// Freed slots are recycled through a free list; each reuse bumps the
/// slot's generation so handles from the previous occupant go stale
/// instead of aliasing the new one.
///
/// The arena is the canonical [`WeightStore`] implementation: the
/// search engine reads weights during traversal, and the penalty
/// engine mutates them through the trait between searches.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena holding `count` nodes, all at `baseline` weight,
    /// and return their handles in insertion order.
    ///
    /// Convenience for graph bring-up and tests.
    pub fn with_baseline(count: usize, baseline: u64) -> (Self, Vec<NodeSlot>) {
        let mut arena = Self::new();
        let slots = (0..count).map(|_| arena.insert(baseline)).collect();
        (arena, slots)
    }

    /// Insert a node with the given initial weight.
    ///
    /// # Panics
    ///
    /// Panics if the arena has exhausted `u32::MAX` slot indices.
    pub fn insert(&mut self, weight: u64) -> NodeSlot {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.weight = Some(weight);
            return NodeSlot {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("arena exceeds u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            weight: Some(weight),
        });
        NodeSlot {
            index,
            generation: 0,
        }
    }

    /// Remove a node, returning its final weight.
    ///
    /// Returns `None` if the handle is stale or was never valid. The
    /// slot's generation is bumped immediately so outstanding handles
    /// stop resolving before the slot is reused.
    pub fn remove(&mut self, node: NodeSlot) -> Option<u64> {
        let slot = self.slots.get_mut(node.index as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        let weight = slot.weight.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.index);
        self.live -= 1;
        Some(weight)
    }

    /// Whether the handle resolves to a live node.
    pub fn contains(&self, node: NodeSlot) -> bool {
        self.resolve(node).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the arena holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The node's current weight, or `None` for stale handles.
    pub fn weight(&self, node: NodeSlot) -> Option<u64> {
        self.resolve(node).and_then(|slot| slot.weight)
    }

    /// Overwrite the node's weight. Returns `false` for stale handles.
    pub fn set_weight(&mut self, node: NodeSlot, weight: u64) -> bool {
        let Some(slot) = self.slots.get_mut(node.index as usize) else {
            return false;
        };
        if slot.generation != node.generation || slot.weight.is_none() {
            return false;
        }
        slot.weight = Some(weight);
        true
    }

    fn resolve(&self, node: NodeSlot) -> Option<&Slot> {
        let slot = self.slots.get(node.index as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.weight.as_ref()?;
        Some(slot)
    }
}

impl WeightStore for NodeArena {
    fn weight(&self, node: NodeSlot) -> Option<u64> {
        NodeArena::weight(self, node)
    }

    fn set_weight(&mut self, node: NodeSlot, weight: u64) -> bool {
        NodeArena::set_weight(self, node, weight)
    }
}
