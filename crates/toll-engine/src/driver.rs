//! Search-cycle driver: the scheduler side of the penalty protocol.
//!
//! [`SearchCycleDriver`] owns the node arena and one
//! [`PenaltyCoordinator`] per registered agent, standing in for the
//! search engine's own scheduler: once per cycle it drains
//! cross-thread route submissions, runs every coordinator's pre-search
//! hook against the arena, and only then returns control so the caller
//! can execute its searches.
//!
//! # Happens-before
//!
//! [`begin_cycle`](SearchCycleDriver::begin_cycle) takes `&mut self`
//! and completes all weight mutation before returning; searches then
//! read through [`arena`](SearchCycleDriver::arena), which borrows
//! `self` shared. The borrow checker therefore enforces the
//! mutation-before-search ordering the penalty protocol relies on.
//! Engines that overlap search execution with the pre-search hook need
//! their own synchronization and are outside this driver's contract.
//!
//! # Producers
//!
//! Route computations finish on arbitrary worker threads. Each worker
//! holds a cloned [`RouteSubmitter`] over a bounded channel;
//! submission is non-blocking (`try_send`) and reports back-pressure
//! as [`SubmitError::ChannelFull`] rather than stalling a search
//! worker.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use indexmap::IndexMap;

use toll_arena::NodeArena;
use toll_core::{AgentId, CycleId, DriverError, PenaltyConfig, Route};

use crate::coordinator::{CycleReport, PenaltyCoordinator};

// ── Submission types ─────────────────────────────────────────────

/// A finished route computation, tagged with its agent.
#[derive(Clone, Debug)]
pub struct CompletedRoute {
    /// The agent whose search produced the route.
    pub agent: AgentId,
    /// The computed route.
    pub route: Route,
}

/// Error submitting a completed route to the driver.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The route channel is full (back-pressure).
    ChannelFull,
    /// The driver has been dropped.
    Disconnected,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelFull => write!(f, "route channel full"),
            Self::Disconnected => write!(f, "driver has shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Cloneable producer handle for submitting completed routes.
///
/// Cheap to clone; hand one to every search worker thread.
#[derive(Clone, Debug)]
pub struct RouteSubmitter {
    tx: Sender<CompletedRoute>,
}

impl RouteSubmitter {
    /// Submit a completed route for penalty application on the next
    /// cycle. Non-blocking.
    ///
    /// # Errors
    ///
    /// [`SubmitError::ChannelFull`] under back-pressure — the caller
    /// may retry or simply drop the route, since a fresher one will
    /// supersede it anyway. [`SubmitError::Disconnected`] once the
    /// driver is gone.
    pub fn submit(&self, agent: AgentId, route: Route) -> Result<(), SubmitError> {
        self.tx
            .try_send(CompletedRoute { agent, route })
            .map_err(|e| match e {
                TrySendError::Full(_) => SubmitError::ChannelFull,
                TrySendError::Disconnected(_) => SubmitError::Disconnected,
            })
    }
}

// ── Config and summary ───────────────────────────────────────────

/// Configuration for [`SearchCycleDriver`].
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Capacity of the bounded route-submission channel. Default: 64.
    pub route_channel_capacity: usize,
    /// Master seed; each agent's coordinator derives its seed source
    /// from this and its agent ID, keeping multi-agent runs
    /// replayable. Default: 0.
    pub seed: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            route_channel_capacity: 64,
            seed: 0,
        }
    }
}

/// What one [`begin_cycle`](SearchCycleDriver::begin_cycle) call did.
#[derive(Debug, Default)]
pub struct CycleSummary {
    /// The cycle that just became current.
    pub cycle: CycleId,
    /// Routes accepted by a coordinator as its pending penalty target.
    pub routed: usize,
    /// Routes dropped: the agent is not registered, or its coordinator
    /// is tearing down and discarded the submission.
    pub orphaned: usize,
    /// Per-agent hook reports, in registration order.
    pub reports: Vec<(AgentId, CycleReport)>,
}

// ── SearchCycleDriver ────────────────────────────────────────────

/// Owns the arena and the per-agent coordinators; runs the pre-search
/// synchronization point once per cycle.
#[derive(Debug)]
pub struct SearchCycleDriver {
    arena: NodeArena,
    agents: IndexMap<AgentId, PenaltyCoordinator>,
    route_tx: Sender<CompletedRoute>,
    route_rx: Receiver<CompletedRoute>,
    cycle: CycleId,
    seed: u64,
}

impl SearchCycleDriver {
    /// Create a driver owning `arena`.
    pub fn new(arena: NodeArena, config: DriverConfig) -> Self {
        let (route_tx, route_rx) = crossbeam_channel::bounded(config.route_channel_capacity);
        Self {
            arena,
            agents: IndexMap::new(),
            route_tx,
            route_rx,
            cycle: CycleId(0),
            seed: config.seed,
        }
    }

    /// Register an agent with its penalty configuration.
    ///
    /// The agent's coordinator seeds its application-seed source from
    /// the driver seed combined with the agent ID, so distinct agents
    /// draw distinct penalty subsets while the run as a whole stays
    /// deterministic.
    ///
    /// # Errors
    ///
    /// [`DriverError::DuplicateAgent`] if the ID is already registered.
    pub fn register_agent(
        &mut self,
        agent: AgentId,
        config: PenaltyConfig,
    ) -> Result<(), DriverError> {
        if self.agents.contains_key(&agent) {
            return Err(DriverError::DuplicateAgent { agent });
        }
        let master_seed = self.seed ^ (u64::from(agent.0) << 32 | u64::from(agent.0));
        self.agents
            .insert(agent, PenaltyCoordinator::new(config, master_seed));
        Ok(())
    }

    /// Request teardown for an agent.
    ///
    /// The agent's outstanding penalty is reverted on the next cycle,
    /// after which the coordinator is pruned from the registry. Routes
    /// already in the channel for this agent are discarded by its
    /// coordinator.
    ///
    /// # Errors
    ///
    /// [`DriverError::UnknownAgent`] if the ID is not registered.
    pub fn deregister_agent(&mut self, agent: AgentId) -> Result<(), DriverError> {
        match self.agents.get(&agent) {
            Some(coordinator) => {
                coordinator.teardown();
                Ok(())
            }
            None => Err(DriverError::UnknownAgent { agent }),
        }
    }

    /// A producer handle for search worker threads.
    pub fn submitter(&self) -> RouteSubmitter {
        RouteSubmitter {
            tx: self.route_tx.clone(),
        }
    }

    /// The coordinator for direct submission or configuration, if the
    /// agent is registered.
    pub fn coordinator(&self, agent: AgentId) -> Option<&PenaltyCoordinator> {
        self.agents.get(&agent)
    }

    /// Run one pre-search synchronization point.
    ///
    /// Drains the route channel into the coordinators (latest route
    /// per agent wins), invokes every coordinator's hook against the
    /// arena in registration order, prunes coordinators that completed
    /// teardown, and advances the cycle counter. All weight mutation
    /// is complete when this returns; run searches against
    /// [`arena`](Self::arena) afterwards.
    pub fn begin_cycle(&mut self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for completed in self.route_rx.try_iter() {
            match self.agents.get(&completed.agent) {
                Some(coordinator) => {
                    if coordinator.submit_route(completed.route).accepted() {
                        summary.routed += 1;
                    } else {
                        summary.orphaned += 1;
                    }
                }
                None => summary.orphaned += 1,
            }
        }

        for (&agent, coordinator) in &self.agents {
            let report = coordinator.before_search(&mut self.arena);
            summary.reports.push((agent, report));
        }
        self.agents
            .retain(|_, coordinator| !coordinator.is_destroyed());

        self.cycle = CycleId(self.cycle.0 + 1);
        summary.cycle = self.cycle;
        summary
    }

    /// Tear down every agent and run the final revert pass.
    ///
    /// Leaves the arena at baseline (minus any external interference,
    /// which surfaces as warnings in the summary) and the registry
    /// empty. The driver itself remains usable for re-registration.
    pub fn shutdown(&mut self) -> CycleSummary {
        for coordinator in self.agents.values() {
            coordinator.teardown();
        }
        self.begin_cycle()
    }

    /// Read access to the arena for search execution.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Mutable access to the arena for graph maintenance (inserting
    /// and removing nodes) between cycles.
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// The current cycle.
    pub fn current_cycle(&self) -> CycleId {
        self.cycle
    }

    /// Number of registered (not yet destroyed) agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}
