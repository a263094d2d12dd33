//! The penalty ledger: the single outstanding application record.
//!
//! The ledger is a pure snapshot store with no graph side effects. It
//! holds at most one [`ApplicationRecord`] — the exact node set,
//! amount, seed, and stride of the most recent penalty application —
//! so the next pass can undo it precisely. Recording overwrites;
//! nothing is ever appended. This is what keeps the net effect on the
//! graph bounded to one outstanding application.

use toll_core::NodeSlot;

/// Exact snapshot of one penalty application.
///
/// Revert does not store the sampled index set; it re-derives it from
/// `seed`, `nodes.len()`, and `stride`. The stride is the one in
/// effect *at apply time*, so a configuration change between apply and
/// revert cannot desynchronize the two passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationRecord {
    /// Seed the sampled index set was drawn with.
    pub seed: u64,
    /// Amount added to each sampled node's weight.
    pub penalty: u64,
    /// Sampling stride in effect when the penalty was applied.
    pub stride: u32,
    /// The full route's node handles, in traversal order. Borrowed
    /// identity only — the graph owns the nodes.
    pub nodes: Vec<NodeSlot>,
}

/// Holder for zero or one [`ApplicationRecord`].
#[derive(Clone, Debug, Default)]
pub struct PenaltyLedger {
    current: Option<ApplicationRecord>,
}

impl PenaltyLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` as the outstanding application, replacing any
    /// previous record.
    pub fn record(&mut self, record: ApplicationRecord) {
        self.current = Some(record);
    }

    /// Take the outstanding record, leaving the ledger empty.
    pub fn take(&mut self) -> Option<ApplicationRecord> {
        self.current.take()
    }

    /// Whether an application is outstanding.
    pub fn is_outstanding(&self) -> bool {
        self.current.is_some()
    }
}
