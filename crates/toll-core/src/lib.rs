//! Core types and traits for the Toll path-penalty framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Toll workspace:
//! strongly-typed IDs, node handles, routes, penalty configuration,
//! error types, and the [`WeightStore`] seam the penalty engine
//! mutates traversal weights through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod route;
pub mod traits;

pub use config::PenaltyConfig;
pub use error::{ConfigError, DriverError, IntegrityWarning, SubmitOutcome};
pub use id::{AgentId, CycleId, NodeSlot, SampledIndices};
pub use route::Route;
pub use traits::WeightStore;
