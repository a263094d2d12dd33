//! The apply/revert passes over a weight store.
//!
//! [`apply`] samples a route and adds the penalty to the sampled
//! nodes; [`revert`] re-derives the identical sample from the recorded
//! seed and subtracts it again. In the steady-state cycle — revert the
//! previous record, then apply the next route — every node's net
//! weight is unaffected by this component except the freshly sampled
//! subset, which carries exactly one penalty.
//!
//! Both passes repair-and-continue on integrity violations: a weight
//! externally reset below the recorded penalty is clamped to zero, a
//! node that vanished is skipped, and each repair is reported as an
//! [`IntegrityWarning`]. A pass never aborts partway through.

use toll_core::{IntegrityWarning, Route, WeightStore};

use crate::ledger::ApplicationRecord;
use crate::sampler::sample_indices;

/// Result of a revert pass.
#[derive(Clone, Debug, Default)]
pub struct RevertOutcome {
    /// Nodes whose weight had the recorded penalty subtracted.
    pub reverted: usize,
    /// Non-fatal integrity findings (clamped or vanished nodes).
    pub warnings: Vec<IntegrityWarning>,
}

/// Result of an apply pass.
#[derive(Clone, Debug)]
pub struct ApplyOutcome {
    /// The record to store in the ledger for the eventual revert.
    pub record: ApplicationRecord,
    /// Nodes whose weight was raised by the penalty.
    pub applied: usize,
    /// Sampled nodes that no longer resolved and were skipped.
    pub skipped: usize,
}

/// Undo the penalty application described by `record`.
///
/// Re-derives the sampled index set from the record's seed, length,
/// and stride — the same inputs [`apply`] used — and subtracts the
/// recorded penalty from each sampled node. A node whose weight is
/// below the penalty is clamped to 0 with a
/// [`IntegrityWarning::WeightClamped`]; a node that no longer resolves
/// is skipped with [`IntegrityWarning::NodeRemoved`]. Never underflows.
pub fn revert(store: &mut dyn WeightStore, record: &ApplicationRecord) -> RevertOutcome {
    let mut outcome = RevertOutcome::default();

    for &i in &sample_indices(record.seed, record.nodes.len(), record.stride) {
        let node = record.nodes[i];
        match store.weight(node) {
            None => outcome.warnings.push(IntegrityWarning::NodeRemoved { node }),
            Some(weight) if weight < record.penalty => {
                store.set_weight(node, 0);
                outcome.warnings.push(IntegrityWarning::WeightClamped {
                    node,
                    weight,
                    penalty: record.penalty,
                });
                outcome.reverted += 1;
            }
            Some(weight) => {
                store.set_weight(node, weight - record.penalty);
                outcome.reverted += 1;
            }
        }
    }

    outcome
}

/// Penalize a fresh sample of `route`'s nodes.
///
/// Samples with `seed` (drawn by the caller from a seed source
/// distinct from the sampler stream, so successive applications are
/// uncorrelated), adds `penalty` to each sampled live node with
/// saturating arithmetic, and returns the [`ApplicationRecord`]
/// capturing exactly what was done. Sampled nodes that vanished
/// between search completion and application are skipped and counted.
pub fn apply(
    store: &mut dyn WeightStore,
    route: &Route,
    penalty: u64,
    stride: u32,
    seed: u64,
) -> ApplyOutcome {
    let nodes = route.nodes();
    let mut applied = 0;
    let mut skipped = 0;

    for &i in &sample_indices(seed, nodes.len(), stride) {
        let node = nodes[i];
        match store.weight(node) {
            Some(weight) => {
                store.set_weight(node, weight.saturating_add(penalty));
                applied += 1;
            }
            None => skipped += 1,
        }
    }

    ApplyOutcome {
        record: ApplicationRecord {
            seed,
            penalty,
            stride,
            nodes: nodes.to_vec(),
        },
        applied,
        skipped,
    }
}
