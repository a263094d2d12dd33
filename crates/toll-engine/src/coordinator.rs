//! Single-flight coordination of deferred penalty passes.
//!
//! Route computations finish on arbitrary producer threads, but node
//! weights may only change at one safe point: immediately before the
//! next search begins. [`PenaltyCoordinator`] bridges the two sides.
//! Producers call [`submit_route`](PenaltyCoordinator::submit_route)
//! at any time; the scheduler invokes
//! [`before_search`](PenaltyCoordinator::before_search) once per
//! search cycle, and that hook is the only place weights are mutated.
//!
//! # State machine
//!
//! ```text
//!              submit_route                    before_search
//!   Idle ─────────────────────► PendingApply ───────────────► Idle
//!     │        (latest route wins; resubmission overwrites)
//!     │ teardown                     │ teardown (pending route dropped)
//!     ▼                              ▼
//!   RevertOnly ─────────────────────────────► Destroyed (terminal)
//!                      before_search
//! ```
//!
//! The phase doubles as the single-flight flag: `PendingApply` and
//! `RevertOnly` mean exactly one pass is armed; `Idle` and `Destroyed`
//! mean the hook does nothing. At most one pass is ever armed, so
//! penalties cannot be double-applied or double-reverted.
//!
//! # Locking
//!
//! One `Mutex` guards the entire coordinator state — phase, pending
//! route, ledger, configuration, and the seed source — and stays held
//! across the whole revert-then-apply sequence inside the hook. A
//! concurrent `submit_route` or `teardown` therefore serializes
//! against an in-flight pass instead of racing the record overwrite,
//! at the cost of holding the lock for O(route length / stride) weight
//! writes.

use std::sync::Mutex;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use toll_core::{ConfigError, IntegrityWarning, PenaltyConfig, Route, SubmitOutcome, WeightStore};

use crate::ledger::PenaltyLedger;
use crate::penalty;

// ── Phase ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Nothing armed; the hook is a no-op.
    Idle,
    /// A route is queued; the hook runs revert-then-apply.
    PendingApply,
    /// Teardown requested; the hook runs revert only, then destroys.
    RevertOnly,
    /// Terminal. All further operations are no-ops.
    Destroyed,
}

// ── CycleReport ──────────────────────────────────────────────────

/// What one invocation of the pre-search hook did.
#[derive(Clone, Debug, Default)]
pub struct CycleReport {
    /// Nodes whose penalty from the previous application was removed.
    pub reverted: usize,
    /// Nodes penalized by the new application.
    pub applied: usize,
    /// Sampled nodes skipped because they no longer resolve.
    pub skipped: usize,
    /// Integrity findings from the revert pass.
    pub warnings: Vec<IntegrityWarning>,
    /// Whether this invocation completed teardown.
    pub destroyed: bool,
}

// ── PenaltyCoordinator ───────────────────────────────────────────

struct Inner {
    phase: Phase,
    /// The route awaiting application. `Some` exactly in `PendingApply`.
    pending: Option<Route>,
    ledger: PenaltyLedger,
    config: PenaltyConfig,
    /// Seed source for fresh application seeds. A separate ChaCha8
    /// stream from the sampler's, so successive applications draw
    /// uncorrelated index sets.
    seed_source: ChaCha8Rng,
}

/// Defers and serializes penalty mutation against the search pipeline.
///
/// One coordinator exists per agent that wants alternative-path
/// behavior. All methods take `&self` and are safe to call from any
/// thread; see the module docs for the state machine and lock
/// discipline.
pub struct PenaltyCoordinator {
    inner: Mutex<Inner>,
}

impl PenaltyCoordinator {
    /// Create a coordinator in the `Idle` phase.
    ///
    /// `master_seed` initializes the seed source; two coordinators
    /// with the same master seed and submission history penalize the
    /// same node subsets, which keeps multi-agent runs replayable.
    pub fn new(config: PenaltyConfig, master_seed: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                phase: Phase::Idle,
                pending: None,
                ledger: PenaltyLedger::new(),
                config,
                seed_source: ChaCha8Rng::seed_from_u64(master_seed),
            }),
        }
    }

    /// Submit a freshly computed route as the next penalty target.
    ///
    /// Latest wins: resubmitting before the hook fires replaces the
    /// queued route, and the replaced route leaves no trace in the
    /// graph (it was never applied, so nothing needs reverting).
    /// After [`teardown`](Self::teardown) the route is discarded —
    /// producers racing teardown get a receipt, not an error.
    pub fn submit_route(&self, route: Route) -> SubmitOutcome {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Idle => {
                inner.pending = Some(route);
                inner.phase = Phase::PendingApply;
                SubmitOutcome::Queued
            }
            Phase::PendingApply => {
                inner.pending = Some(route);
                SubmitOutcome::Superseded
            }
            Phase::RevertOnly => SubmitOutcome::DiscardedTearingDown,
            Phase::Destroyed => SubmitOutcome::DiscardedDestroyed,
        }
    }

    /// Request teardown.
    ///
    /// Cooperatively cancels any pending apply — the queued route is
    /// dropped and the already-armed pass downgrades to revert-only.
    /// The final revert runs on the next
    /// [`before_search`](Self::before_search) invocation, after which
    /// the coordinator is permanently destroyed. Idempotent.
    pub fn teardown(&self) {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Idle | Phase::PendingApply => {
                inner.pending = None;
                inner.phase = Phase::RevertOnly;
            }
            Phase::RevertOnly | Phase::Destroyed => {}
        }
    }

    /// The pre-search hook. Invoked by the owning scheduler once per
    /// search cycle, before the search reads any weights.
    ///
    /// Runs fully synchronously under the coordinator lock: the
    /// previous application (if any) is reverted, then — unless
    /// teardown was requested — the pending route is applied with a
    /// fresh seed and the currently configured amount and stride, and
    /// the ledger records the result. The scheduler must treat this as
    /// a blocking pre-step so that mutation completes before the
    /// search begins.
    pub fn before_search(&self, store: &mut dyn WeightStore) -> CycleReport {
        let mut inner = self.lock();
        let mut report = CycleReport::default();

        match inner.phase {
            Phase::Idle | Phase::Destroyed => return report,
            Phase::PendingApply | Phase::RevertOnly => {}
        }

        if let Some(record) = inner.ledger.take() {
            let outcome = penalty::revert(store, &record);
            report.reverted = outcome.reverted;
            report.warnings = outcome.warnings;
        }

        match inner.phase {
            Phase::PendingApply => {
                // `pending` is always Some in this phase.
                if let Some(route) = inner.pending.take() {
                    let seed = inner.seed_source.next_u64();
                    let outcome = penalty::apply(
                        store,
                        &route,
                        inner.config.penalty_amount(),
                        inner.config.sample_stride(),
                        seed,
                    );
                    report.applied = outcome.applied;
                    report.skipped = outcome.skipped;
                    inner.ledger.record(outcome.record);
                }
                inner.phase = Phase::Idle;
            }
            Phase::RevertOnly => {
                inner.phase = Phase::Destroyed;
                report.destroyed = true;
            }
            Phase::Idle | Phase::Destroyed => unreachable!("filtered above"),
        }

        report
    }

    /// Change the penalty amount. Effective on the next application.
    pub fn set_penalty_amount(&self, amount: u64) {
        self.lock().config.set_penalty_amount(amount);
    }

    /// Change the sampling stride. Effective on the next application;
    /// the outstanding record reverts with the stride it was applied
    /// with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrideTooSmall`] for strides below 2.
    pub fn set_sample_stride(&self, stride: u32) -> Result<(), ConfigError> {
        self.lock().config.set_sample_stride(stride)
    }

    /// Whether teardown has completed.
    pub fn is_destroyed(&self) -> bool {
        self.lock().phase == Phase::Destroyed
    }

    /// Whether a pass (apply or final revert) is armed for the next
    /// hook invocation.
    pub fn is_armed(&self) -> bool {
        matches!(self.lock().phase, Phase::PendingApply | Phase::RevertOnly)
    }

    /// Whether a penalty application is currently outstanding in the
    /// graph.
    pub fn has_outstanding_application(&self) -> bool {
        self.lock().ledger.is_outstanding()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl std::fmt::Debug for PenaltyCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("PenaltyCoordinator")
            .field("phase", &inner.phase)
            .field("outstanding", &inner.ledger.is_outstanding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toll_arena::NodeArena;
    use toll_core::NodeSlot;

    const BASELINE: u64 = 50;

    fn setup(len: usize) -> (NodeArena, Vec<NodeSlot>, PenaltyCoordinator) {
        let (arena, slots) = NodeArena::with_baseline(len, BASELINE);
        let coordinator = PenaltyCoordinator::new(PenaltyConfig::default(), 42);
        (arena, slots, coordinator)
    }

    fn total_weight(arena: &NodeArena, slots: &[NodeSlot]) -> u64 {
        slots.iter().map(|&s| arena.weight(s).unwrap()).sum()
    }

    // ── steady state ───────────────────────────────────────────

    #[test]
    fn idle_hook_does_nothing() {
        let (mut arena, slots, coordinator) = setup(10);
        let report = coordinator.before_search(&mut arena);
        assert_eq!(report.reverted, 0);
        assert_eq!(report.applied, 0);
        assert_eq!(total_weight(&arena, &slots), 10 * BASELINE);
    }

    #[test]
    fn submit_then_hook_applies_penalty() {
        let (mut arena, slots, coordinator) = setup(25);
        assert_eq!(
            coordinator.submit_route(Route::new(slots.clone())),
            SubmitOutcome::Queued
        );
        assert!(coordinator.is_armed());

        let report = coordinator.before_search(&mut arena);
        assert_eq!(report.reverted, 0);
        assert!(report.applied > 0);
        assert!(coordinator.has_outstanding_application());
        assert!(!coordinator.is_armed());

        let penalized = total_weight(&arena, &slots) - 25 * BASELINE;
        assert_eq!(penalized, report.applied as u64 * 1000);
    }

    #[test]
    fn next_cycle_reverts_before_applying() {
        let (mut arena, slots, coordinator) = setup(25);
        let second_route: Vec<NodeSlot> = (0..5).map(|_| arena.insert(BASELINE)).collect();

        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        let first = coordinator.before_search(&mut arena);
        assert!(first.applied > 0);

        assert!(coordinator
            .submit_route(Route::new(second_route.clone()))
            .accepted());
        let second = coordinator.before_search(&mut arena);
        // The first application came back off before the second went on.
        assert_eq!(second.reverted, first.applied);

        for &slot in &slots {
            assert_eq!(arena.weight(slot), Some(BASELINE), "first route residue");
        }
        let second_total = total_weight(&arena, &second_route);
        assert_eq!(second_total, 5 * BASELINE + second.applied as u64 * 1000);
    }

    // ── single flight ──────────────────────────────────────────

    #[test]
    fn rapid_resubmission_applies_only_the_last_route() {
        let (mut arena, slots, coordinator) = setup(30);
        let r1 = Route::new(slots[0..10].to_vec());
        let r2 = Route::new(slots[10..20].to_vec());
        let r3 = Route::new(slots[20..30].to_vec());

        assert_eq!(coordinator.submit_route(r1), SubmitOutcome::Queued);
        assert_eq!(coordinator.submit_route(r2), SubmitOutcome::Superseded);
        assert_eq!(coordinator.submit_route(r3), SubmitOutcome::Superseded);

        let report = coordinator.before_search(&mut arena);
        assert!(report.applied > 0);

        // R1 and R2 leave no trace.
        for &slot in &slots[0..20] {
            assert_eq!(arena.weight(slot), Some(BASELINE));
        }
        // All raised weight sits on R3's nodes.
        let r3_extra = total_weight(&arena, &slots[20..30]) - 10 * BASELINE;
        assert_eq!(r3_extra, report.applied as u64 * 1000);
    }

    #[test]
    fn hook_runs_one_pass_per_submission() {
        let (mut arena, slots, coordinator) = setup(25);
        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        let first = coordinator.before_search(&mut arena);
        assert!(first.applied > 0);

        // No new submission: the second hook must not re-apply.
        let second = coordinator.before_search(&mut arena);
        assert_eq!(second.applied, 0);
        assert_eq!(second.reverted, 0);
        let extra = total_weight(&arena, &slots) - 25 * BASELINE;
        assert_eq!(extra, first.applied as u64 * 1000);
    }

    // ── teardown ───────────────────────────────────────────────

    #[test]
    fn teardown_from_idle_destroys_on_next_hook() {
        let (mut arena, slots, coordinator) = setup(10);
        coordinator.teardown();
        assert!(coordinator.is_armed());

        let report = coordinator.before_search(&mut arena);
        assert!(report.destroyed);
        assert!(coordinator.is_destroyed());
        assert_eq!(total_weight(&arena, &slots), 10 * BASELINE);
    }

    #[test]
    fn teardown_discards_pending_route_and_reverts_outstanding() {
        let (mut arena, slots, coordinator) = setup(25);
        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        let applied = coordinator.before_search(&mut arena).applied;
        assert!(applied > 0);

        // Queue another route, then tear down before it fires.
        assert!(coordinator
            .submit_route(Route::new(slots[0..5].to_vec()))
            .accepted());
        coordinator.teardown();

        let report = coordinator.before_search(&mut arena);
        assert_eq!(report.reverted, applied);
        assert_eq!(report.applied, 0, "discarded route must not be applied");
        assert!(report.destroyed);

        // Graph back at baseline, ledger empty, nothing armed.
        for &slot in &slots {
            assert_eq!(arena.weight(slot), Some(BASELINE));
        }
        assert!(!coordinator.has_outstanding_application());
        assert!(!coordinator.is_armed());
    }

    #[test]
    fn submit_after_teardown_is_a_noop() {
        let (mut arena, slots, coordinator) = setup(10);
        coordinator.teardown();
        assert_eq!(
            coordinator.submit_route(Route::new(slots.clone())),
            SubmitOutcome::DiscardedTearingDown
        );

        coordinator.before_search(&mut arena);
        assert_eq!(
            coordinator.submit_route(Route::new(slots.clone())),
            SubmitOutcome::DiscardedDestroyed
        );

        // Destroyed hook stays inert.
        let report = coordinator.before_search(&mut arena);
        assert_eq!(report.applied, 0);
        assert_eq!(total_weight(&arena, &slots), 10 * BASELINE);
    }

    #[test]
    fn teardown_is_idempotent() {
        let (mut arena, _slots, coordinator) = setup(5);
        coordinator.teardown();
        coordinator.teardown();
        coordinator.before_search(&mut arena);
        coordinator.teardown();
        assert!(coordinator.is_destroyed());
    }

    // ── configuration ──────────────────────────────────────────

    #[test]
    fn amount_change_takes_effect_next_apply_only() {
        let (mut arena, slots, coordinator) = setup(25);
        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        let first = coordinator.before_search(&mut arena);

        coordinator.set_penalty_amount(7);

        // Revert of the outstanding record still uses the recorded
        // 1000, not the new 7.
        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        let second = coordinator.before_search(&mut arena);
        assert_eq!(second.reverted, first.applied);
        let extra = total_weight(&arena, &slots) - 25 * BASELINE;
        assert_eq!(extra, second.applied as u64 * 7);
    }

    #[test]
    fn stride_change_cannot_desync_revert() {
        let (mut arena, slots, coordinator) = setup(40);
        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        coordinator.before_search(&mut arena);

        // Changing the stride mid-flight must not corrupt the revert
        // of the outstanding record.
        coordinator.set_sample_stride(3).unwrap();
        coordinator.teardown();
        coordinator.before_search(&mut arena);

        for &slot in &slots {
            assert_eq!(arena.weight(slot), Some(BASELINE));
        }
    }

    #[test]
    fn stride_validation_on_mutation() {
        let (_arena, _slots, coordinator) = setup(5);
        assert_eq!(
            coordinator.set_sample_stride(1),
            Err(ConfigError::StrideTooSmall { configured: 1 })
        );
        assert!(coordinator.set_sample_stride(2).is_ok());
    }

    // ── determinism ────────────────────────────────────────────

    #[test]
    fn same_master_seed_same_penalized_subset() {
        let run = |master_seed: u64| -> Vec<u64> {
            let (mut arena, slots) = NodeArena::with_baseline(50, BASELINE);
            let coordinator =
                PenaltyCoordinator::new(PenaltyConfig::default(), master_seed);
            assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
            coordinator.before_search(&mut arena);
            slots.iter().map(|&s| arena.weight(s).unwrap()).collect()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn successive_applications_use_fresh_seeds() {
        let (mut arena, slots, coordinator) = setup(200);
        let sampled_subset = |arena: &NodeArena, slots: &[NodeSlot]| -> Vec<usize> {
            slots
                .iter()
                .enumerate()
                .filter(|(_, &s)| arena.weight(s).unwrap() > BASELINE)
                .map(|(i, _)| i)
                .collect()
        };

        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        coordinator.before_search(&mut arena);
        let first = sampled_subset(&arena, &slots);

        assert!(coordinator.submit_route(Route::new(slots.clone())).accepted());
        coordinator.before_search(&mut arena);
        let second = sampled_subset(&arena, &slots);

        // A 200-node route with stride 10 samples ~20 indices; two
        // identical subsets from independent seeds would mean the seed
        // source is not advancing.
        assert_ne!(first, second);
    }

    // ── concurrency ────────────────────────────────────────────

    #[test]
    fn concurrent_submissions_then_one_pass() {
        use std::sync::Arc;

        let (mut arena, slots) = NodeArena::with_baseline(64, BASELINE);
        let coordinator = Arc::new(PenaltyCoordinator::new(PenaltyConfig::default(), 42));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let c = Arc::clone(&coordinator);
                let route = Route::new(slots[t * 8..(t + 1) * 8].to_vec());
                std::thread::spawn(move || c.submit_route(route))
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().accepted());
        }

        // Exactly one pass runs, over whichever submission landed last.
        let report = coordinator.before_search(&mut arena);
        let raised: usize = slots
            .iter()
            .filter(|&&s| arena.weight(s).unwrap() > BASELINE)
            .count();
        assert_eq!(raised, report.applied);
        // All raised nodes live within a single 8-node window.
        let raised_indices: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, &s)| arena.weight(s).unwrap() > BASELINE)
            .map(|(i, _)| i)
            .collect();
        if let (Some(&first), Some(&last)) = (raised_indices.first(), raised_indices.last()) {
            assert_eq!(first / 8, last / 8, "penalty crossed route boundaries");
        }
    }
}
