//! # lsq-descent Core Library
//!
//! This crate provides the core implementation for lsq-descent, an
//! experiment harness comparing two gradient strategies for solving an
//! over-determined linear least-squares problem: a stochastic single-sample
//! gradient method and a precomputed full-batch (normal-equations) method.
//! Each run records a checkpoint trace that is flushed once, at run end, to
//! a fresh directory for downstream comparison tooling.

pub mod config;
pub mod dataset;
pub mod optim;
pub mod trace;

// Re-export key components for easier use from the binaries and tests
pub use config::{RunConfig, StrategyKind};
pub use dataset::Dataset;
pub use optim::{run, RunError, Termination};
pub use trace::{Checkpoint, Trace, TraceRecorder};

/// Scalar type used throughout the crate (the reference data is float64).
pub type Scalar = f64;
