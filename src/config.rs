//! # Run Configuration
//!
//! Immutable settings describing a single optimization run. The
//! configuration is written out next to the trace (`settings.txt`) so every
//! run stays reproducible and auditable.

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("iterations must be positive")]
    ZeroIterations,
    #[error("checkpoint_every must be positive")]
    ZeroCheckpointCadence,
}

// --- Strategy Selection ---

/// Which gradient strategy drives the run.
///
/// The choice is made once, at configuration time, and held fixed for the
/// lifetime of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// One uniformly drawn sample per step.
    Stochastic,
    /// Exact full-batch gradient from precomputed Gram terms.
    PrecomputedBatch,
}

impl StrategyKind {
    /// Suffix appended to the dataset path to name the trace directory.
    /// Stochastic and precomputed runs over the same dataset must never
    /// collide.
    pub fn trace_suffix(&self) -> &'static str {
        match self {
            StrategyKind::Stochastic => "-trace",
            StrategyKind::PrecomputedBatch => "-tracep",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Stochastic => write!(f, "stochastic"),
            StrategyKind::PrecomputedBatch => write!(f, "precomputed-batch"),
        }
    }
}

// --- Run Configuration ---

/// Immutable settings for one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Gradient strategy to use.
    pub strategy: StrategyKind,
    /// Total step budget.
    pub iterations: usize,
    /// Checkpoint cadence, in iterations.
    pub checkpoint_every: usize,
    /// Whether to track and report the average-iterate loss.
    pub averaging: bool,
    /// Seed for the stochastic strategy's random source. `None` seeds from
    /// entropy (non-reproducible runs).
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Creates a configuration with averaging disabled and no fixed seed.
    pub fn new(strategy: StrategyKind, iterations: usize, checkpoint_every: usize) -> Self {
        RunConfig {
            strategy,
            iterations,
            checkpoint_every,
            averaging: false,
            seed: None,
        }
    }

    /// Checks that the iteration budget and checkpoint cadence are positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.checkpoint_every == 0 {
            return Err(ConfigError::ZeroCheckpointCadence);
        }
        Ok(())
    }
}

/// The human-readable settings record, one `key = value` line per option.
/// This is the exact content of the trace directory's `settings.txt`.
impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "strategy = {}", self.strategy)?;
        writeln!(f, "iterations = {}", self.iterations)?;
        writeln!(f, "checkpoint_every = {}", self.checkpoint_every)?;
        writeln!(f, "averaging = {}", self.averaging)?;
        match self.seed {
            Some(seed) => writeln!(f, "seed = {seed}"),
            None => writeln!(f, "seed = none"),
        }
    }
}
