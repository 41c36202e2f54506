//! Inference Service Implementation

use crate::{InferError, ServiceError};
use alert_taxonomy::{AlertId, LabelVector, RecommendationTable};
use feature_contract::FeatureVector;
use forest_classifier::MultiLabelClassifier;
use model_artifact::{ArtifactMetadata, ModelArtifact};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// One fired alert paired with its remediation text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositiveAlert {
    pub alert: AlertId,
    pub recommendation: String,
}

/// Structured outcome of one inference call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    /// Fired alerts in canonical declaration order
    pub positive_alerts: Vec<PositiveAlert>,
    /// Number of fired alerts
    pub alert_count: usize,
    /// Full twelve-label output
    pub labels: LabelVector,
    /// The validated reading, echoed back
    pub input: FeatureVector,
}

/// Explicitly constructed, immutable serving object.
///
/// Holds the loaded artifact and taxonomy for the life of the process;
/// nothing here mutates after construction, so concurrent `infer` calls
/// need no locking. A model reload is a process restart.
pub struct InferenceService {
    classifier: MultiLabelClassifier,
    metadata: ArtifactMetadata,
    recommendations: RecommendationTable,
}

impl InferenceService {
    /// Build from a loaded artifact.
    ///
    /// Fails if the recommendation table does not cover every alert the
    /// classifier can raise; a process must not serve in that state.
    pub fn new(
        artifact: ModelArtifact,
        recommendations: RecommendationTable,
    ) -> Result<Self, ServiceError> {
        recommendations.verify_complete()?;
        info!(
            trained_at = %artifact.metadata.trained_at,
            macro_f1 = artifact.metadata.macro_f1,
            "inference service ready"
        );
        Ok(Self {
            classifier: artifact.classifier,
            metadata: artifact.metadata,
            recommendations,
        })
    }

    /// Load, validate and wrap an artifact from disk
    pub fn from_artifact_path(
        path: &Path,
        recommendations: RecommendationTable,
    ) -> Result<Self, ServiceError> {
        let artifact = ModelArtifact::load(path)?;
        Self::new(artifact, recommendations)
    }

    /// Metadata of the artifact being served
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Validate a raw JSON payload and run inference on it.
    ///
    /// Validation failures are client-caused and surface as
    /// [`InferError::Validation`]; everything past validation is an internal
    /// fault.
    pub fn infer_json(&self, raw: &Value) -> Result<Diagnosis, InferError> {
        let features = FeatureVector::from_json(raw)?;
        self.infer(features)
    }

    /// Run inference on an already validated reading.
    pub fn infer(&self, features: FeatureVector) -> Result<Diagnosis, InferError> {
        let labels = self.classifier.predict(&features)?;
        Ok(self.compose(features, labels))
    }

    // Positives compose in AlertId declaration order, not in the order the
    // forests happened to fire.
    fn compose(&self, input: FeatureVector, labels: LabelVector) -> Diagnosis {
        let positive_alerts: Vec<PositiveAlert> = labels
            .positives()
            .map(|alert| PositiveAlert {
                alert,
                recommendation: self.recommendations.recommendation(alert).to_string(),
            })
            .collect();

        debug!(alerts = positive_alerts.len(), "diagnosis composed");
        Diagnosis {
            alert_count: positive_alerts.len(),
            positive_alerts,
            labels,
            input,
        }
    }
}
