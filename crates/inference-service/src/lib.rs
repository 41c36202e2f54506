//! Inference Service
//!
//! Loads one model artifact, validates incoming readings, scores them and
//! composes the alert taxonomy into a structured diagnosis. The service is
//! read-only after construction and safe to share across request handlers.

mod service;

pub use service::{Diagnosis, InferenceService, PositiveAlert};

use alert_taxonomy::TaxonomyError;
use feature_contract::ValidationError;
use forest_classifier::ClassifierError;
use model_artifact::ArtifactError;
use thiserror::Error;

/// Failures while constructing the service. All fatal at startup.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

/// Failures during one inference call.
///
/// `Validation` is client-caused and maps to a 4xx-equivalent response;
/// `Classifier` is an internal fault and maps to a 5xx-equivalent one.
#[derive(Debug, Error)]
pub enum InferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
