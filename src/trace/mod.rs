//! # Trace Recording
//!
//! This module defines the checkpoint trajectory of one optimization run.
//! Checkpoints are buffered in memory by a [`TraceRecorder`] in insertion
//! order (which equals chronological and iteration order) and materialized
//! to disk exactly once, at run end, by [`store::flush`]. A crash mid-run
//! loses the trace entirely; nothing is written before the flush.

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::optim::Termination;
use crate::Scalar;

// --- Submodules ---
pub mod store;

// --- Checkpoint ---

/// A point-in-time snapshot of the optimizer, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Step counter at which the snapshot was taken (0 = before any update).
    pub iteration: usize,
    /// Accumulated wall-clock seconds spent in gradient computation and
    /// parameter updates up to this point.
    pub time_elapsed: f64,
    /// Training examples consumed up to this point.
    pub samples_seen: u64,
    /// `‖beta − beta_true‖₂` for the current iterate.
    pub loss: Scalar,
    /// `‖beta_sum/iteration − beta_true‖₂` for the average iterate; present
    /// only when averaging is enabled. Equals `loss` at iteration 0.
    pub avg_loss: Option<Scalar>,
}

// --- Recorder ---

/// Buffers checkpoints in memory, preserving insertion order.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    checkpoints: Vec<Checkpoint>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        TraceRecorder::default()
    }

    /// Appends a checkpoint. O(1); never deduplicates.
    pub fn record(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.push(checkpoint);
    }

    /// Number of checkpoints recorded so far.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Iteration of the most recently recorded checkpoint, if any.
    pub fn last_iteration(&self) -> Option<usize> {
        self.checkpoints.last().map(|c| c.iteration)
    }

    /// Consumes the recorder, pairing the trajectory with the configuration
    /// that produced it and the terminal state reached.
    pub fn finish(self, config: RunConfig, termination: Termination) -> Trace {
        Trace {
            config,
            termination,
            checkpoints: self.checkpoints,
        }
    }
}

// --- Trace ---

/// The full ordered trajectory of one run.
#[derive(Debug, Clone)]
pub struct Trace {
    /// The configuration the run used, recorded for reproducibility.
    pub config: RunConfig,
    /// How the run ended.
    pub termination: Termination,
    /// Checkpoints in iteration order.
    pub checkpoints: Vec<Checkpoint>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::StrategyKind;

    fn checkpoint(iteration: usize) -> Checkpoint {
        Checkpoint {
            iteration,
            time_elapsed: iteration as f64,
            samples_seen: iteration as u64,
            loss: 1.0,
            avg_loss: None,
        }
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut recorder = TraceRecorder::new();
        for i in [0, 10, 20, 20] {
            recorder.record(checkpoint(i));
        }
        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.last_iteration(), Some(20));

        let config = RunConfig::new(StrategyKind::Stochastic, 20, 10);
        let trace = recorder.finish(config, Termination::BudgetExhausted);
        let iterations: Vec<usize> = trace.checkpoints.iter().map(|c| c.iteration).collect();
        // Duplicate iterations are kept as-is
        assert_eq!(iterations, vec![0, 10, 20, 20]);
    }
}
