//! Error types and receipts for the Toll penalty pipeline.
//!
//! Organized by subsystem: configuration, revert integrity, route
//! submission, and the search-cycle driver. Fatal conditions are
//! `Error` enums; non-fatal conditions ([`IntegrityWarning`]) and
//! producer/teardown races ([`SubmitOutcome`]) are reported as values
//! so no pass ever aborts halfway through a mutation.

use std::error::Error;
use std::fmt;

use crate::id::{AgentId, NodeSlot};

/// Errors detected while validating a penalty configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `sample_stride` is below the minimum of 2.
    ///
    /// The sampler draws steps uniformly from `[1, stride)`; a stride
    /// of 0 or 1 makes that range empty, so such configurations are
    /// rejected up front instead of reaching the sampler.
    StrideTooSmall {
        /// The configured stride that was too small.
        configured: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrideTooSmall { configured } => {
                write!(f, "sample_stride must be at least 2, got {configured}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Non-fatal integrity findings from a revert or apply pass.
///
/// Raised when the graph no longer matches the state the penalty
/// ledger recorded — some external actor reset a weight or removed a
/// node while the application was outstanding. Policy is to repair
/// what can be repaired (clamp, skip) and keep going; a revert pass
/// never aborts partway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// A node's weight was below the recorded penalty at revert time;
    /// the weight was clamped to 0 instead of underflowing.
    WeightClamped {
        /// The affected node.
        node: NodeSlot,
        /// The weight found on the node.
        weight: u64,
        /// The penalty that should have been subtractable.
        penalty: u64,
    },
    /// A recorded node no longer resolves in the store; it was skipped.
    NodeRemoved {
        /// The stale handle.
        node: NodeSlot,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightClamped {
                node,
                weight,
                penalty,
            } => write!(
                f,
                "weight {weight} on {node} below recorded penalty {penalty}, clamped to 0"
            ),
            Self::NodeRemoved { node } => write!(f, "{node} no longer resolves, skipped"),
        }
    }
}

/// Receipt for a route submission.
///
/// Submission never fails: producers may race teardown, and a route
/// arriving after the component is gone is expected traffic, not a
/// bug. The receipt says what became of the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SubmitOutcome {
    /// The route was stored as the pending penalty target.
    Queued,
    /// The route replaced a previously queued, not-yet-applied route.
    /// The replaced route leaves no trace: it was never applied, so
    /// nothing needs reverting.
    Superseded,
    /// Teardown was already requested; the route was discarded and the
    /// scheduled pass will run revert-only.
    DiscardedTearingDown,
    /// The coordinator has completed teardown; the route was discarded.
    DiscardedDestroyed,
}

impl SubmitOutcome {
    /// Whether the submitted route became the pending target.
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Queued | Self::Superseded)
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Superseded => write!(f, "superseded previous pending route"),
            Self::DiscardedTearingDown => write!(f, "discarded: teardown in progress"),
            Self::DiscardedDestroyed => write!(f, "discarded: coordinator destroyed"),
        }
    }
}

/// Errors from the search-cycle driver's agent registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverError {
    /// An agent with this ID is already registered.
    DuplicateAgent {
        /// The conflicting ID.
        agent: AgentId,
    },
    /// No agent with this ID is registered.
    UnknownAgent {
        /// The unresolved ID.
        agent: AgentId,
    },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAgent { agent } => write!(f, "agent {agent} is already registered"),
            Self::UnknownAgent { agent } => write!(f, "agent {agent} is not registered"),
        }
    }
}

impl Error for DriverError {}
