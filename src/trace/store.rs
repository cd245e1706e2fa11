//! # Trace Persistence
//!
//! Materializes a [`Trace`] to a fresh directory and reads it back. The
//! persisted shape is metrics-only: one bincode series per scalar metric,
//! one entry per checkpoint, in insertion order, plus a human-readable
//! `settings.txt` capturing the run configuration.
//!
//! Layout inside the trace directory:
//!
//! ```text
//! iterations.bin   Vec<u64>   step counter per checkpoint
//! time.bin         Vec<f64>   elapsed seconds per checkpoint
//! samples.bin      Vec<u64>   samples seen per checkpoint
//! loss.bin         Vec<f64>   iterate loss per checkpoint
//! loss_avg.bin     Vec<f64>   average-iterate loss (only when averaging)
//! settings.txt                the RunConfig record
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Checkpoint, Trace};
use crate::config::StrategyKind;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("trace destination already exists: {path}")]
    DestinationExists { path: PathBuf },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("trace series length mismatch: {what} has {got} entries, expected {expected}")]
    SeriesLengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

// --- File Names ---
const ITERATIONS_FILE: &str = "iterations.bin";
const TIME_FILE: &str = "time.bin";
const SAMPLES_FILE: &str = "samples.bin";
const LOSS_FILE: &str = "loss.bin";
const LOSS_AVG_FILE: &str = "loss_avg.bin";
const SETTINGS_FILE: &str = "settings.txt";

// --- Destination Naming ---

/// Derives the trace directory for a dataset file and strategy choice.
///
/// The directory sits next to the dataset, named after it with the
/// strategy's suffix, so stochastic and precomputed runs over the same
/// dataset land in distinct locations.
pub fn trace_dir<P: AsRef<Path>>(dataset_path: P, strategy: StrategyKind) -> PathBuf {
    let mut name = dataset_path.as_ref().as_os_str().to_os_string();
    name.push(strategy.trace_suffix());
    PathBuf::from(name)
}

// --- Flush ---

/// Writes the full trace to `dir`, creating it.
///
/// The destination must not exist: runs write to fresh locations only, which
/// prevents silently overwriting a prior run's trace.
///
/// # Errors
/// * `DestinationExists` if `dir` is already present.
/// * `Io` / `Bincode` if the destination is unwritable or a series fails to
///   serialize.
pub fn flush<P: AsRef<Path>>(trace: &Trace, dir: P) -> Result<(), TraceError> {
    let dir = dir.as_ref();
    if dir.exists() {
        return Err(TraceError::DestinationExists {
            path: dir.to_path_buf(),
        });
    }
    fs::create_dir_all(dir)?;

    let checkpoints = &trace.checkpoints;
    let iterations: Vec<u64> = checkpoints.iter().map(|c| c.iteration as u64).collect();
    let times: Vec<f64> = checkpoints.iter().map(|c| c.time_elapsed).collect();
    let samples: Vec<u64> = checkpoints.iter().map(|c| c.samples_seen).collect();
    let losses: Vec<f64> = checkpoints.iter().map(|c| c.loss).collect();

    write_series(&dir.join(ITERATIONS_FILE), &iterations)?;
    write_series(&dir.join(TIME_FILE), &times)?;
    write_series(&dir.join(SAMPLES_FILE), &samples)?;
    write_series(&dir.join(LOSS_FILE), &losses)?;

    if trace.config.averaging {
        let avg_losses: Vec<f64> = checkpoints
            .iter()
            .map(|c| c.avg_loss.unwrap_or(c.loss))
            .collect();
        write_series(&dir.join(LOSS_AVG_FILE), &avg_losses)?;
    }

    let mut settings = File::create(dir.join(SETTINGS_FILE))?;
    write!(settings, "{}", trace.config)?;

    Ok(())
}

// --- Load ---

/// Reads the checkpoint sequence back from a trace directory.
///
/// `avg_loss` is `None` for every checkpoint when `loss_avg.bin` is absent.
/// Duplicate iterations are returned as stored; the loader never
/// deduplicates.
pub fn load<P: AsRef<Path>>(dir: P) -> Result<Vec<Checkpoint>, TraceError> {
    let dir = dir.as_ref();

    let iterations: Vec<u64> = read_series(&dir.join(ITERATIONS_FILE))?;
    let times: Vec<f64> = read_series(&dir.join(TIME_FILE))?;
    let samples: Vec<u64> = read_series(&dir.join(SAMPLES_FILE))?;
    let losses: Vec<f64> = read_series(&dir.join(LOSS_FILE))?;

    let expected = iterations.len();
    check_len("time", times.len(), expected)?;
    check_len("samples", samples.len(), expected)?;
    check_len("loss", losses.len(), expected)?;

    let avg_path = dir.join(LOSS_AVG_FILE);
    let avg_losses: Option<Vec<f64>> = if avg_path.exists() {
        let series: Vec<f64> = read_series(&avg_path)?;
        check_len("loss_avg", series.len(), expected)?;
        Some(series)
    } else {
        None
    };

    let checkpoints = (0..expected)
        .map(|i| Checkpoint {
            iteration: iterations[i] as usize,
            time_elapsed: times[i],
            samples_seen: samples[i],
            loss: losses[i],
            avg_loss: avg_losses.as_ref().map(|series| series[i]),
        })
        .collect();
    Ok(checkpoints)
}

// --- Helpers ---

fn write_series<T: Serialize>(path: &Path, series: &[T]) -> Result<(), TraceError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, series)?;
    Ok(())
}

fn read_series<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TraceError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}

fn check_len(what: &'static str, got: usize, expected: usize) -> Result<(), TraceError> {
    if got != expected {
        return Err(TraceError::SeriesLengthMismatch {
            what,
            got,
            expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::RunConfig;
    use crate::optim::Termination;
    use std::env;

    fn sample_trace(averaging: bool) -> Trace {
        let mut config = RunConfig::new(StrategyKind::Stochastic, 3, 1);
        config.averaging = averaging;
        config.seed = Some(1);

        let checkpoints = (0..4)
            .map(|i| Checkpoint {
                iteration: i,
                time_elapsed: 0.25 * i as f64,
                samples_seen: i as u64,
                loss: 10.0 / (i + 1) as f64,
                avg_loss: averaging.then(|| 9.0 / (i + 1) as f64),
            })
            .collect();

        Trace {
            config,
            termination: Termination::BudgetExhausted,
            checkpoints,
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("lsq-descent-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        path
    }

    #[test]
    fn test_flush_load_round_trip() {
        let trace = sample_trace(true);
        let dir = temp_dir("trace-roundtrip");

        flush(&trace, &dir).expect("flush failed");
        let loaded = load(&dir).expect("load failed");
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, trace.checkpoints);
    }

    #[test]
    fn test_round_trip_without_averaging_drops_avg_series() {
        let trace = sample_trace(false);
        let dir = temp_dir("trace-no-avg");

        flush(&trace, &dir).expect("flush failed");
        assert!(!dir.join(LOSS_AVG_FILE).exists());
        let loaded = load(&dir).expect("load failed");
        fs::remove_dir_all(&dir).unwrap();

        assert!(loaded.iter().all(|c| c.avg_loss.is_none()));
        assert_eq!(loaded, trace.checkpoints);
    }

    #[test]
    fn test_second_flush_fails_on_existing_destination() {
        let trace = sample_trace(false);
        let dir = temp_dir("trace-fresh-only");

        flush(&trace, &dir).expect("first flush failed");
        let err = flush(&trace, &dir).unwrap_err();
        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(err, TraceError::DestinationExists { .. }));
    }

    #[test]
    fn test_settings_record_is_written() {
        let trace = sample_trace(true);
        let dir = temp_dir("trace-settings");

        flush(&trace, &dir).expect("flush failed");
        let settings = fs::read_to_string(dir.join(SETTINGS_FILE)).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(settings, trace.config.to_string());
    }

    #[test]
    fn test_trace_dir_distinguishes_strategies() {
        let stochastic = trace_dir("data/input.bin", StrategyKind::Stochastic);
        let precomputed = trace_dir("data/input.bin", StrategyKind::PrecomputedBatch);
        assert_eq!(stochastic, PathBuf::from("data/input.bin-trace"));
        assert_eq!(precomputed, PathBuf::from("data/input.bin-tracep"));
    }
}
