//! # Dataset Persistence
//!
//! Saves and loads the `(X, beta_true, y)` bundle as a single binary record.
//! Uses `serde` for serialization and `bincode` as the binary format; arrays
//! are stored as dimensions plus flat row-major data.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::{Dataset, DatasetError};
use crate::Scalar;

// --- Serializable Record ---

/// On-disk form of a [`Dataset`]: dimensions plus flat data.
#[derive(Serialize, Deserialize, Debug)]
struct DatasetRecord {
    n: usize,
    p: usize,
    x: Vec<Scalar>,
    beta_true: Vec<Scalar>,
    y: Vec<Scalar>,
}

impl DatasetRecord {
    fn from_dataset(dataset: &Dataset) -> Self {
        DatasetRecord {
            n: dataset.n(),
            p: dataset.p(),
            // `iter()` for portability across layouts
            x: dataset.x().iter().cloned().collect(),
            beta_true: dataset.beta_true().to_vec(),
            y: dataset.y().to_vec(),
        }
    }

    fn into_dataset(self) -> Result<Dataset, DatasetError> {
        let x = Array2::from_shape_vec((self.n, self.p), self.x)?;
        let beta_true = Array1::from_vec(self.beta_true);
        let y = Array1::from_vec(self.y);
        Dataset::new(x, beta_true, y)
    }
}

// --- Save / Load ---

/// Saves a dataset to `path`, overwriting any previous record.
pub fn save<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<(), DatasetError> {
    let record = DatasetRecord::from_dataset(dataset);
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &record)?;
    Ok(())
}

/// Loads a dataset from `path`, re-checking the shape invariants.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let record: DatasetRecord = bincode::deserialize_from(reader)?;
    record.into_dataset()
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::env;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("lsq-descent-{}-{name}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let dataset = Dataset::synthetic(12, 4, &mut rng);

        let path = temp_file("dataset-roundtrip.bin");
        save(&dataset, &path).expect("save failed");
        let loaded = load(&path).expect("load failed");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(dataset, loaded);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = temp_file("dataset-missing.bin");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
