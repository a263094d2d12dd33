//! Penalty configuration and validation.
//!
//! [`PenaltyConfig`] holds the two tunables of the penalty mechanism:
//! how much cost to add to a sampled node, and how densely to sample.
//! Both are mutable at runtime; mutations take effect on the *next*
//! application, since the ledger records the values actually applied.

use crate::error::ConfigError;

/// Minimum legal sampling stride.
///
/// The sampler draws its inter-sample steps from `[1, stride)`, which
/// is empty for strides below 2.
pub const MIN_STRIDE: u32 = 2;

/// Tunables for penalty application.
///
/// Validated at construction: [`PenaltyConfig::new`] rejects strides
/// below [`MIN_STRIDE`] so the sampler never sees an empty step range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenaltyConfig {
    penalty_amount: u64,
    sample_stride: u32,
}

impl PenaltyConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrideTooSmall`] if `sample_stride < 2`.
    pub fn new(penalty_amount: u64, sample_stride: u32) -> Result<Self, ConfigError> {
        if sample_stride < MIN_STRIDE {
            return Err(ConfigError::StrideTooSmall {
                configured: sample_stride,
            });
        }
        Ok(Self {
            penalty_amount,
            sample_stride,
        })
    }

    /// Cost added to each sampled node's weight.
    pub fn penalty_amount(&self) -> u64 {
        self.penalty_amount
    }

    /// Sampling density: expected spacing between penalized nodes is
    /// `stride / 2 + 0.5`.
    pub fn sample_stride(&self) -> u32 {
        self.sample_stride
    }

    /// Change the penalty amount. Takes effect on the next application;
    /// the outstanding record keeps the amount it was applied with.
    pub fn set_penalty_amount(&mut self, amount: u64) {
        self.penalty_amount = amount;
    }

    /// Change the sampling stride.
    ///
    /// Takes effect on the next application; an outstanding record is
    /// reverted with the stride it was applied with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StrideTooSmall`] if `stride < 2`; the
    /// previous stride is kept.
    pub fn set_sample_stride(&mut self, stride: u32) -> Result<(), ConfigError> {
        if stride < MIN_STRIDE {
            return Err(ConfigError::StrideTooSmall { configured: stride });
        }
        self.sample_stride = stride;
        Ok(())
    }
}

impl Default for PenaltyConfig {
    /// Penalty 1000, stride 10: spread-out samples with a cost bump
    /// large enough to reroute typical unit-weight graphs.
    fn default() -> Self {
        Self {
            penalty_amount: 1000,
            sample_stride: 10,
        }
    }
}
