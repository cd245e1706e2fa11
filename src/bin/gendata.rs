//! Generates a synthetic least-squares dataset and writes it to disk as a
//! single binary record, ready for `train --infile`.

use anyhow::Context;
use clap::Parser;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use lsq_descent::dataset::{self, Dataset};

#[derive(Parser)]
#[command(name = "gendata")]
#[command(about = "Generate a synthetic (X, beta_true, y) dataset")]
#[command(version)]
struct Args {
    /// Number of data points to create
    #[arg(long, default_value_t = 1000)]
    n: usize,

    /// Number of (dense) features in each data point
    #[arg(long, default_value_t = 100)]
    p: usize,

    /// Output path (defaults to ./data/generated-{n}-{p}.bin)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for the random source; entropy-seeded when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    debug!("creating samples with n = {} p = {}", args.n, args.p);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = Dataset::synthetic(args.n, args.p, &mut rng);

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("./data/generated-{}-{}.bin", args.n, args.p)));
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    debug!("writing out to {}", out.display());
    dataset::io::save(&dataset, &out).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}
