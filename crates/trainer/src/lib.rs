//! Offline Training
//!
//! Batch pipeline that turns the labeled sensor dataset into a persisted
//! model artifact. Runs to completion or fails outright; there is no partial
//! resume. The serving path never touches this crate.

pub mod dataset;
pub mod pipeline;
pub mod split;

pub use dataset::Dataset;
pub use pipeline::{evaluate_split, reproduce_split, train};
pub use split::{stratified_split, SplitIndices};

use forest_classifier::ClassifierError;
use thiserror::Error;

/// Errors while reading the training dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Filesystem failure
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No data rows
    #[error("dataset contains no data rows")]
    Empty,

    /// Wrong number of header columns
    #[error("dataset header has {found} columns, expected {expected}")]
    HeaderArity { found: usize, expected: usize },

    /// Header column name out of place
    #[error("dataset header mismatch at column {position}: found {found:?}, expected {expected:?}")]
    HeaderMismatch {
        position: usize,
        found: String,
        expected: String,
    },

    /// Malformed data row
    #[error("line {line}: {message}")]
    Row { line: usize, message: String },
}

/// Errors in the training pipeline
#[derive(Debug, Error)]
pub enum TrainError {
    /// Held-out fraction outside (0, 1)
    #[error("test fraction {0} must be strictly between 0 and 1")]
    InvalidFraction(f64),

    /// Split left one side empty
    #[error("split produced an empty {0} set")]
    DegenerateSplit(&'static str),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
