//! Multi-Label Forest Classifier
//!
//! Twelve independent bagged decision-tree ensembles, one per alert label,
//! trained jointly on the same observations but scored independently.
//! Training applies class-balanced re-weighting to counter label skew;
//! inference is deterministic once the forests are frozen.

mod forest;
mod metrics;
mod multilabel;
mod tree;

pub use forest::BinaryForest;
pub use metrics::{macro_f1, LabelMetrics};
pub use multilabel::{Hyperparameters, MultiLabelClassifier, TrainingSet};
pub use tree::{DecisionTree, Node};

use thiserror::Error;

/// Errors raised by the classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Predict called without a trained model
    #[error("classifier has no trained model loaded")]
    NotTrained,

    /// Feature arity does not match the trained feature order
    #[error("feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Training set malformed
    #[error("invalid training set: {0}")]
    InvalidTrainingSet(String),
}
