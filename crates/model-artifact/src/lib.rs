//! Model Artifact
//!
//! Durable representation of a trained classifier: one JSON document holding
//! the serialized forests and the metadata needed to reproduce evaluation.
//! Saves are atomic (temp file + rename); loads validate structure before
//! anything is served.

mod metadata;
mod store;

pub use metadata::ArtifactMetadata;
pub use store::{ModelArtifact, SCHEMA_VERSION};

use thiserror::Error;

/// Errors raised while persisting or loading an artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Filesystem failure reading or writing the document
    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON for the artifact shape
    #[error("artifact is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Schema version this build does not understand
    #[error("unsupported artifact schema version {found} (supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// Recorded feature count differs from the feature contract
    #[error("artifact records {found} features, expected {expected}")]
    FeatureArity { found: usize, expected: usize },

    /// Recorded feature name differs from the feature contract
    #[error("feature order mismatch at position {position}: artifact has {found:?}, expected {expected:?}")]
    FeatureOrderMismatch {
        position: usize,
        found: String,
        expected: String,
    },

    /// Recorded alert count differs from the taxonomy
    #[error("artifact records {found} alerts, expected {expected}")]
    AlertArity { found: usize, expected: usize },

    /// Recorded alert identifier differs from the taxonomy
    #[error("alert order mismatch at position {position}: artifact has {found:?}, expected {expected:?}")]
    AlertOrderMismatch {
        position: usize,
        found: String,
        expected: String,
    },

    /// Per-label metrics do not cover exactly the alert set
    #[error("per-label metrics do not cover the alert set: {0}")]
    MetricsCoverage(String),

    /// Classifier state unusable for serving
    #[error("artifact classifier is incomplete: {0}")]
    IncompleteClassifier(String),
}
