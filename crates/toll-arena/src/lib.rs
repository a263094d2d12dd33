//! Generational arena storage for Toll routing graphs.
//!
//! [`NodeArena`] owns the graph's nodes and their traversal weights.
//! Routes and penalty records reference nodes via [`NodeSlot`] handles
//! (`toll_core::NodeSlot`): slot index plus insertion generation.
//! Removing a node bumps the slot's generation, so stale handles are
//! detected in O(1) and never resolve to a reused slot's new occupant.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod arena;

pub use arena::NodeArena;

pub use toll_core::NodeSlot;
