//! End-to-end tests for lsq-descent.
//!
//! These exercise the full pipeline: generate a dataset, persist it, reload
//! it, run both gradient strategies over it, flush each trace to its own
//! fresh directory, and read the traces back.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::fs;
use std::path::PathBuf;

use lsq_descent::config::{RunConfig, StrategyKind};
use lsq_descent::dataset::{self, Dataset};
use lsq_descent::trace::store;
use lsq_descent::{optim, Termination};

/// Scratch path under the system temp dir, cleared before use.
fn scratch(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("lsq-descent-e2e-{}-{name}", std::process::id()));
    let _ = fs::remove_file(&path);
    let _ = fs::remove_dir_all(&path);
    path
}

#[test]
fn test_full_pipeline_for_both_strategies() {
    let mut rng = StdRng::seed_from_u64(42);
    let generated = Dataset::synthetic(200, 10, &mut rng);

    let dataset_path = scratch("pipeline.bin");
    dataset::io::save(&generated, &dataset_path).expect("dataset save failed");
    let dataset = dataset::io::load(&dataset_path).expect("dataset load failed");
    assert_eq!(dataset, generated);

    for kind in [StrategyKind::Stochastic, StrategyKind::PrecomputedBatch] {
        let mut config = RunConfig::new(kind, 50, 10);
        config.averaging = true;
        config.seed = Some(7);

        let trace = optim::run(&dataset, &config).expect("run failed");
        assert_eq!(trace.termination, Termination::BudgetExhausted);

        // 0, 10, 20, 30, 40, 50
        let iterations: Vec<usize> = trace.checkpoints.iter().map(|c| c.iteration).collect();
        assert_eq!(iterations, vec![0, 10, 20, 30, 40, 50]);

        let destination = store::trace_dir(&dataset_path, kind);
        let _ = fs::remove_dir_all(&destination);
        store::flush(&trace, &destination).expect("flush failed");

        let loaded = store::load(&destination).expect("trace load failed");
        assert_eq!(loaded, trace.checkpoints);

        fs::remove_dir_all(&destination).unwrap();
    }

    fs::remove_file(&dataset_path).unwrap();
}

#[test]
fn test_strategies_consume_samples_at_their_own_rate() {
    let mut rng = StdRng::seed_from_u64(8);
    let dataset = Dataset::synthetic(120, 6, &mut rng);

    let mut stochastic = RunConfig::new(StrategyKind::Stochastic, 30, 30);
    stochastic.seed = Some(1);
    let batch = RunConfig::new(StrategyKind::PrecomputedBatch, 30, 30);

    let s = optim::run(&dataset, &stochastic).expect("stochastic run failed");
    let b = optim::run(&dataset, &batch).expect("batch run failed");

    assert_eq!(s.checkpoints.last().unwrap().samples_seen, 30);
    assert_eq!(b.checkpoints.last().unwrap().samples_seen, 30 * 120);
}

#[test]
fn test_trace_destinations_never_collide_across_strategies() {
    let dataset_path = PathBuf::from("input.bin");
    assert_ne!(
        store::trace_dir(&dataset_path, StrategyKind::Stochastic),
        store::trace_dir(&dataset_path, StrategyKind::PrecomputedBatch)
    );
}
