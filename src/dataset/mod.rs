//! # Dataset Module
//!
//! This module defines the immutable regression bundle consumed by the
//! optimizer: a design matrix `X`, the ground-truth coefficients
//! `beta_true`, and the observed targets `y`. The bundle is owned by the
//! caller and borrowed read-only for the duration of a run; `beta_true` is
//! used only to evaluate the loss of the optimizer's estimate, never to
//! compute gradients.

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::Scalar;

// --- Submodules ---
pub mod io;

// --- Error Handling ---
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("Target length mismatch: X has {rows} rows but y has {got} entries")]
    TargetLengthMismatch { rows: usize, got: usize },
    #[error("Coefficient length mismatch: X has {cols} columns but beta_true has {got} entries")]
    CoefficientLengthMismatch { cols: usize, got: usize },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("ndarray error: {0}")]
    NdarrayError(#[from] ndarray::ShapeError),
}

// --- Dataset ---

/// An immutable `(X, beta_true, y)` bundle.
///
/// Invariants, enforced at construction:
/// `X.nrows() == y.len()` and `X.ncols() == beta_true.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<Scalar>,
    beta_true: Array1<Scalar>,
    y: Array1<Scalar>,
}

impl Dataset {
    /// Builds a dataset, checking the shape invariants.
    pub fn new(
        x: Array2<Scalar>,
        beta_true: Array1<Scalar>,
        y: Array1<Scalar>,
    ) -> Result<Self, DatasetError> {
        if x.nrows() != y.len() {
            return Err(DatasetError::TargetLengthMismatch {
                rows: x.nrows(),
                got: y.len(),
            });
        }
        if x.ncols() != beta_true.len() {
            return Err(DatasetError::CoefficientLengthMismatch {
                cols: x.ncols(),
                got: beta_true.len(),
            });
        }
        Ok(Dataset { x, beta_true, y })
    }

    /// Draws a synthetic dataset: `X ~ N(0,1)^{n×p}`, `beta_true ~ N(0,1)^p`,
    /// and `y = X·beta_true + N(0,1)^n`.
    pub fn synthetic<R: Rng>(n: usize, p: usize, rng: &mut R) -> Self {
        let x = Array2::<Scalar>::random_using((n, p), StandardNormal, rng);
        let beta_true = Array1::<Scalar>::random_using(p, StandardNormal, rng);
        let noise = Array1::<Scalar>::random_using(n, StandardNormal, rng);
        let y = x.dot(&beta_true) + noise;
        // Shapes hold by construction
        Dataset { x, beta_true, y }
    }

    /// Number of samples (rows of `X`).
    pub fn n(&self) -> usize {
        self.x.nrows()
    }

    /// Number of features (columns of `X`).
    pub fn p(&self) -> usize {
        self.x.ncols()
    }

    /// The design matrix.
    pub fn x(&self) -> &Array2<Scalar> {
        &self.x
    }

    /// The ground-truth coefficients. Never fed to gradient computation.
    pub fn beta_true(&self) -> &Array1<Scalar> {
        &self.beta_true
    }

    /// The observed targets.
    pub fn y(&self) -> &Array1<Scalar> {
        &self.y
    }
}
