//! Penalty application engine and search-cycle coordination for Toll.
//!
//! When many agents route through a shared weighted graph, they pile
//! onto the same cheap path. This crate discourages that: after an
//! agent's route is computed, a deterministic, sparse subset of the
//! route's nodes gets a temporary weight penalty, nudging subsequent
//! searches toward alternatives. Every application is exactly undone
//! before the next one and on teardown, leaving no residue.
//!
//! Pieces, leaf first:
//! - [`sampler`] — deterministic seeded index sampling.
//! - [`ledger`] — the single outstanding [`ApplicationRecord`].
//! - [`penalty`] — the apply/revert passes over a `WeightStore`.
//! - [`coordinator`] — the single-flight [`PenaltyCoordinator`] that
//!   defers mutation to the pre-search synchronization point.
//! - [`driver`] — the [`SearchCycleDriver`] scheduler harness that
//!   owns the arena and invokes the hooks once per search cycle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coordinator;
pub mod driver;
pub mod ledger;
pub mod penalty;
pub mod sampler;

pub use coordinator::{CycleReport, PenaltyCoordinator};
pub use driver::{
    CompletedRoute, CycleSummary, DriverConfig, RouteSubmitter, SearchCycleDriver, SubmitError,
};
pub use ledger::{ApplicationRecord, PenaltyLedger};
pub use penalty::{apply, revert, ApplyOutcome, RevertOutcome};
pub use sampler::sample_indices;
