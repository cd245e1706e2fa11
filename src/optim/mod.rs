//! # Optimizer Core (`optim`)
//!
//! Drives the iterative least-squares descent: selects a gradient strategy,
//! applies updates, tracks elapsed compute time and samples consumed,
//! applies the early-stopping rule, and records checkpoints through a
//! [`TraceRecorder`](crate::trace::TraceRecorder).

use log::debug;
use ndarray::Array1;
use std::time::Instant;

use crate::config::{ConfigError, RunConfig, StrategyKind};
use crate::dataset::Dataset;
use crate::trace::{Checkpoint, Trace, TraceRecorder};
use crate::Scalar;

// --- Submodules ---
pub mod precomputed;
pub mod stochastic;

// Re-export strategies
pub use precomputed::PrecomputedGradient;
pub use stochastic::StochasticGradient;

/// Early-stopping threshold on `‖gradient‖₂ / p`, evaluated at checkpoints
/// against the last computed gradient.
pub const CONVERGENCE_THRESHOLD: Scalar = 1e-8;

// --- Error Handling ---
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(&'static str),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

// --- Step Output ---

/// The descent direction produced by one strategy invocation.
pub struct GradientStep {
    /// Length-p gradient vector.
    pub gradient: Array1<Scalar>,
    /// Training examples consumed to produce it (1 for stochastic, n for
    /// precomputed-batch).
    pub samples_consumed: u64,
}

// --- Gradient Strategy ---

/// The gradient strategy for one run: a tagged variant per strategy, each
/// carrying exactly the state it needs. Selected once from the
/// configuration and held fixed for the run's lifetime.
pub enum Strategy {
    Stochastic(StochasticGradient),
    PrecomputedBatch(PrecomputedGradient),
}

impl Strategy {
    /// Computes the descent direction for the current parameters.
    pub fn compute_step(&mut self, beta: &Array1<Scalar>, dataset: &Dataset) -> GradientStep {
        match self {
            Strategy::Stochastic(strategy) => strategy.compute_step(beta, dataset),
            Strategy::PrecomputedBatch(strategy) => strategy.compute_step(beta),
        }
    }

    /// The strategy's fixed learning rate.
    pub fn step_size(&self) -> Scalar {
        match self {
            Strategy::Stochastic(_) => stochastic::STEP_SIZE,
            Strategy::PrecomputedBatch(_) => precomputed::STEP_SIZE,
        }
    }
}

// --- Optimizer State ---

/// Mutable per-run bookkeeping, exclusively owned by one loop instance.
#[derive(Debug, Clone)]
pub struct OptimizerState {
    /// Current parameter estimate, mutated every step.
    pub beta: Array1<Scalar>,
    /// Running sum of all iterates (averaging only).
    pub beta_sum: Array1<Scalar>,
    /// Accumulated wall-clock seconds spent in gradient computation and
    /// updates. Monotonically non-decreasing.
    pub time_elapsed: f64,
    /// Training examples consumed. Monotonically non-decreasing.
    pub samples_seen: u64,
    /// Step counter.
    pub iteration: usize,
}

impl OptimizerState {
    fn new(p: usize) -> Self {
        OptimizerState {
            beta: Array1::zeros(p),
            beta_sum: Array1::zeros(p),
            time_elapsed: 0.0,
            samples_seen: 0,
            iteration: 0,
        }
    }
}

// --- Termination ---

/// Terminal state of the optimizer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient norm fell below [`CONVERGENCE_THRESHOLD`].
    Converged,
    /// The configured iteration budget ran out.
    BudgetExhausted,
}

// --- Optimizer Loop ---

/// Runs one full optimization pass over `dataset` and returns its trace.
///
/// The loop starts from `beta = 0`, records a checkpoint at iteration 0,
/// then steps through the budget, checkpointing every
/// `config.checkpoint_every` iterations and always at the last iteration
/// reached. For the precomputed-batch strategy, the one-time `XᵗX`/`Xᵗy`
/// setup cost is charged to `time_elapsed` before the first checkpoint.
///
/// The convergence check runs right after each in-loop checkpoint, on the
/// gradient that produced the most recent update. For the stochastic
/// strategy this is inherently noisy: one favorable sample can stop the run
/// early.
///
/// # Errors
/// * `InvalidDataset` when `n == 0` or `p == 0`, before any step executes.
/// * `Config` when the iteration budget or checkpoint cadence is zero.
pub fn run(dataset: &Dataset, config: &RunConfig) -> Result<Trace, RunError> {
    config.validate()?;
    if dataset.n() == 0 {
        return Err(RunError::InvalidDataset("design matrix has no rows"));
    }
    if dataset.p() == 0 {
        return Err(RunError::InvalidDataset("design matrix has no columns"));
    }

    let p = dataset.p();
    let mut state = OptimizerState::new(p);
    let mut recorder = TraceRecorder::new();

    let mut strategy = match config.strategy {
        StrategyKind::Stochastic => Strategy::Stochastic(StochasticGradient::new(config.seed)),
        StrategyKind::PrecomputedBatch => {
            let setup = Instant::now();
            let strategy = PrecomputedGradient::new(dataset);
            state.time_elapsed += setup.elapsed().as_secs_f64();
            Strategy::PrecomputedBatch(strategy)
        }
    };

    // Iteration-0 checkpoint: loss of the all-zero initial guess.
    record_progress(&mut recorder, &state, dataset, config.averaging);

    let mut termination = Termination::BudgetExhausted;
    for i in 1..=config.iterations {
        let timer = Instant::now();
        let step = strategy.compute_step(&state.beta, dataset);
        state.beta.scaled_add(-strategy.step_size(), &step.gradient);
        state.time_elapsed += timer.elapsed().as_secs_f64();

        state.iteration = i;
        state.samples_seen += step.samples_consumed;
        if config.averaging {
            state.beta_sum += &state.beta;
        }

        if i % config.checkpoint_every == 0 {
            record_progress(&mut recorder, &state, dataset, config.averaging);
            if l2_norm(&step.gradient) / (p as Scalar) < CONVERGENCE_THRESHOLD {
                debug!("gradient norm very small, stopping early");
                termination = Termination::Converged;
                break;
            }
        }
    }

    // Terminal transition: the last reached iteration must be on record.
    // Consumers still tolerate duplicate iterations in traces produced
    // elsewhere; the loader never deduplicates.
    if recorder.last_iteration() != Some(state.iteration) {
        record_progress(&mut recorder, &state, dataset, config.averaging);
    }

    Ok(recorder.finish(config.clone(), termination))
}

// --- Helpers ---

/// Snapshots the current state, logs a progress line, and appends the
/// checkpoint. Observational only; never affects control flow.
fn record_progress(
    recorder: &mut TraceRecorder,
    state: &OptimizerState,
    dataset: &Dataset,
    averaging: bool,
) {
    let loss = l2_distance(&state.beta, dataset.beta_true());
    let avg_loss = if averaging {
        Some(if state.iteration == 0 {
            loss
        } else {
            let avg_beta = &state.beta_sum / state.iteration as Scalar;
            l2_distance(&avg_beta, dataset.beta_true())
        })
    } else {
        None
    };

    match avg_loss {
        Some(avg) => debug!(
            "{:8.0} sec {:10.8} loss {:10.8} ave loss {:10} samples {:4}-th checkpoint",
            state.time_elapsed,
            loss,
            avg,
            state.samples_seen,
            recorder.len(),
        ),
        None => debug!(
            "{:8.0} sec {:10.8} loss {:10} samples {:4}-th checkpoint",
            state.time_elapsed,
            loss,
            state.samples_seen,
            recorder.len(),
        ),
    }

    recorder.record(Checkpoint {
        iteration: state.iteration,
        time_elapsed: state.time_elapsed,
        samples_seen: state.samples_seen,
        loss,
        avg_loss,
    });
}

fn l2_norm(v: &Array1<Scalar>) -> Scalar {
    v.dot(v).sqrt()
}

fn l2_distance(a: &Array1<Scalar>, b: &Array1<Scalar>) -> Scalar {
    let diff = a - b;
    diff.dot(&diff).sqrt()
}
