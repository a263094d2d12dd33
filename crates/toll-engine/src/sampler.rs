//! Deterministic seeded sampling of route positions.
//!
//! Penalizing every node of a long route blankets the graph and makes
//! detours as expensive as the original path. The sampler instead
//! emits a sparse, seed-determined subset: a start offset drawn from
//! `[0, stride)`, then repeated steps drawn from `[1, stride)`, for an
//! expected spacing of `stride / 2 + 0.5` between penalized positions.
//!
//! Respects the determinism contract: a seeded ChaCha8 RNG derived
//! from the application seed produces the identical index sequence for
//! identical `(seed, route_len, stride)`. Revert relies on this — it
//! re-derives the sampled set from the recorded seed instead of
//! storing it.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use toll_core::SampledIndices;

/// Sample the route positions to penalize.
///
/// Returns a strictly increasing sequence of indices, all below
/// `route_len`. A zero-length route yields an empty sequence, as does
/// a start offset that already falls past the end of a short route.
///
/// Callers guarantee `stride >= 2`; `PenaltyConfig` enforces this at
/// configuration time, so the sampler only debug-asserts it.
pub fn sample_indices(seed: u64, route_len: usize, stride: u32) -> SampledIndices {
    debug_assert!(stride >= 2, "stride below 2 rejected at config time");

    let mut indices = SampledIndices::new();
    if route_len == 0 {
        return indices;
    }

    let stride = stride as usize;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut index = rng.random_range(0..stride);
    while index < route_len {
        indices.push(index);
        index += rng.random_range(1..stride);
    }
    indices
}
