//! Runs one optimization pass over a stored dataset and writes the
//! checkpoint trace next to it.
//!
//! With `--infile ./data/input.bin`, the stochastic strategy writes
//!
//! ```text
//! ./data/input.bin-trace/{iterations,time,samples,loss}.bin
//! ./data/input.bin-trace/settings.txt
//! ```
//!
//! and the precomputed-batch strategy writes the same files under
//! `./data/input.bin-tracep/`. `loss_avg.bin` appears when `--averaging` is
//! set. The destination must not already exist: each run owns a fresh trace
//! directory.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

use lsq_descent::config::{RunConfig, StrategyKind};
use lsq_descent::trace::store;
use lsq_descent::{dataset, optim};

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// One uniformly drawn sample per step
    Stochastic,
    /// Exact full-batch gradient from precomputed X^T X and X^T y
    PrecomputedBatch,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Stochastic => StrategyKind::Stochastic,
            StrategyArg::PrecomputedBatch => StrategyKind::PrecomputedBatch,
        }
    }
}

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Iteratively estimate linear regression parameters, tracing each run")]
#[command(version)]
struct Args {
    /// Dataset record produced by gendata
    #[arg(long)]
    infile: PathBuf,

    /// Gradient strategy to run
    #[arg(long, value_enum, default_value_t = StrategyArg::Stochastic)]
    strategy: StrategyArg,

    /// Maximum number of gradient steps
    #[arg(long, default_value_t = 100)]
    iters: usize,

    /// Record a checkpoint every n iterations
    #[arg(long, default_value_t = 1)]
    save_every_n: usize,

    /// Track and report the average-iterate loss
    #[arg(long)]
    averaging: bool,

    /// Seed for the stochastic strategy's random source
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = dataset::io::load(&args.infile)
        .with_context(|| format!("loading {}", args.infile.display()))?;

    let config = RunConfig {
        strategy: args.strategy.into(),
        iterations: args.iters,
        checkpoint_every: args.save_every_n,
        averaging: args.averaging,
        seed: args.seed,
    };

    let destination = store::trace_dir(&args.infile, config.strategy);
    let trace = optim::run(&dataset, &config)?;
    store::flush(&trace, &destination)
        .with_context(|| format!("flushing trace to {}", destination.display()))?;

    info!(
        "{:?} after {} checkpoints, trace written to {}",
        trace.termination,
        trace.checkpoints.len(),
        destination.display()
    );
    Ok(())
}
