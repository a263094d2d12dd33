//! Toll: congestion-steering path penalties for multi-agent routing.
//!
//! When independent agents route through a shared weighted graph, they
//! converge on the same cheap path and congest it. Toll nudges them
//! apart: after each agent's route is computed, a deterministic sparse
//! subset of the route's nodes gets a temporary traversal-cost
//! penalty, steering subsequent searches toward alternatives. Each
//! penalty is exactly reverted before the next application and on
//! teardown — the graph carries at most one outstanding application
//! per agent and ends every lifecycle at baseline.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Toll sub-crates. For most users, adding `toll` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use toll::prelude::*;
//!
//! // A 25-node graph at uniform baseline weight 10.
//! let (arena, slots) = NodeArena::with_baseline(25, 10);
//!
//! let mut driver = SearchCycleDriver::new(arena, DriverConfig::default());
//! driver
//!     .register_agent(AgentId(0), PenaltyConfig::default())
//!     .unwrap();
//!
//! // A search worker finishes a route and submits it.
//! let submitter = driver.submitter();
//! submitter
//!     .submit(AgentId(0), Route::new(slots.clone()))
//!     .unwrap();
//!
//! // The pre-search synchronization point: penalties go on here.
//! let summary = driver.begin_cycle();
//! let report = &summary.reports[0].1;
//! assert!(report.applied >= 1);
//!
//! // Run searches against driver.arena(), then tear down: the final
//! // revert leaves every node back at baseline.
//! driver.shutdown();
//! assert!(slots.iter().all(|&s| driver.arena().weight(s) == Some(10)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `toll-core` | IDs, routes, configuration, errors, `WeightStore` |
//! | [`arena`] | `toll-arena` | Generational node storage |
//! | [`engine`] | `toll-engine` | Sampler, ledger, apply/revert, coordinator, driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`toll-core`).
///
/// Contains [`types::NodeSlot`], [`types::Route`],
/// [`types::PenaltyConfig`], the error types, and the
/// [`types::WeightStore`] seam.
pub use toll_core as types;

/// Generational node storage (`toll-arena`).
///
/// [`arena::NodeArena`] owns nodes and their traversal weights;
/// stale handles never resolve.
pub use toll_arena as arena;

/// Penalty engine and search-cycle coordination (`toll-engine`).
///
/// [`engine::PenaltyCoordinator`] for direct embedding in an existing
/// scheduler, [`engine::SearchCycleDriver`] for the batteries-included
/// cycle loop.
pub use toll_engine as engine;

/// Common imports for typical Toll usage.
///
/// ```rust
/// use toll::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use toll_core::{
        AgentId, ConfigError, CycleId, DriverError, IntegrityWarning, NodeSlot, PenaltyConfig,
        Route, SubmitOutcome, WeightStore,
    };

    // Arena
    pub use toll_arena::NodeArena;

    // Engine
    pub use toll_engine::{
        CompletedRoute, CycleReport, CycleSummary, DriverConfig, PenaltyCoordinator,
        RouteSubmitter, SearchCycleDriver, SubmitError,
    };
}
