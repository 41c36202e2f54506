//! Atomic artifact persistence and validated load

use crate::metadata::ArtifactMetadata;
use crate::ArtifactError;
use alert_taxonomy::AlertId;
use feature_contract::FIELD_ORDER;
use forest_classifier::MultiLabelClassifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Supported artifact schema version. Bumped on any incompatible change so
/// stale readers reject new documents instead of misparsing them.
pub const SCHEMA_VERSION: u32 = 1;

/// Persisted trained classifier plus reproducibility metadata.
///
/// Write-once: a retrain produces a brand-new document, never an in-place
/// patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub metadata: ArtifactMetadata,
    pub classifier: MultiLabelClassifier,
}

impl ModelArtifact {
    pub fn new(classifier: MultiLabelClassifier, metadata: ArtifactMetadata) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            metadata,
            classifier,
        }
    }

    /// Serialize to a sibling temp file, then atomically rename over `path`.
    /// A reader never observes a partially written artifact.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let json = serde_json::to_vec_pretty(self)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        fs::write(&tmp, &json).map_err(|source| ArtifactError::Io {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;

        info!(path = %path.display(), bytes = json.len(), "artifact written");
        Ok(())
    }

    /// Read and structurally validate an artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        artifact.validate()?;
        info!(
            path = %path.display(),
            trained_at = %artifact.metadata.trained_at,
            "artifact loaded"
        );
        Ok(artifact)
    }

    /// Structural integrity checks applied at load time.
    ///
    /// The feature/alert orders are compared by name: a reordered artifact
    /// would otherwise score silently wrong rather than erroring.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ArtifactError::UnsupportedSchema {
                found: self.schema_version,
                supported: SCHEMA_VERSION,
            });
        }

        if self.metadata.feature_order.len() != FIELD_ORDER.len() {
            return Err(ArtifactError::FeatureArity {
                found: self.metadata.feature_order.len(),
                expected: FIELD_ORDER.len(),
            });
        }
        for (position, (found, expected)) in self
            .metadata
            .feature_order
            .iter()
            .zip(FIELD_ORDER.iter())
            .enumerate()
        {
            if found != expected {
                return Err(ArtifactError::FeatureOrderMismatch {
                    position,
                    found: found.clone(),
                    expected: (*expected).to_string(),
                });
            }
        }

        if self.metadata.alert_order.len() != AlertId::ALL.len() {
            return Err(ArtifactError::AlertArity {
                found: self.metadata.alert_order.len(),
                expected: AlertId::ALL.len(),
            });
        }
        for (position, (found, expected)) in self
            .metadata
            .alert_order
            .iter()
            .zip(AlertId::ALL.iter())
            .enumerate()
        {
            if found != expected.as_str() {
                return Err(ArtifactError::AlertOrderMismatch {
                    position,
                    found: found.clone(),
                    expected: expected.as_str().to_string(),
                });
            }
        }

        // Metrics must cover exactly the declared alert set
        for alert in AlertId::ALL {
            if !self.metadata.per_label_metrics.contains_key(alert.as_str()) {
                return Err(ArtifactError::MetricsCoverage(format!(
                    "missing metrics for {}",
                    alert.as_str()
                )));
            }
        }
        if self.metadata.per_label_metrics.len() != AlertId::ALL.len() {
            let extra: Vec<&str> = self
                .metadata
                .per_label_metrics
                .keys()
                .filter(|k| AlertId::ALL.iter().all(|a| a.as_str() != k.as_str()))
                .map(String::as_str)
                .collect();
            return Err(ArtifactError::MetricsCoverage(format!(
                "unexpected metric keys: {}",
                extra.join(", ")
            )));
        }

        if !self.classifier.is_trained() {
            return Err(ArtifactError::IncompleteClassifier(format!(
                "{} label forests present",
                self.classifier.n_labels()
            )));
        }
        if self.classifier.feature_order() != self.metadata.feature_order.as_slice() {
            return Err(ArtifactError::IncompleteClassifier(
                "classifier feature order disagrees with metadata".to_string(),
            ));
        }

        Ok(())
    }
}
