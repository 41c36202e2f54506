//! Artifact metadata record

use chrono::{DateTime, Utc};
use forest_classifier::{Hyperparameters, LabelMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reproducibility metadata persisted next to the classifier state.
///
/// `feature_order` and `alert_order` are recorded by name, not trusted by
/// position: the loader compares them against the canonical orders and
/// refuses artifacts that disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Feature field names in training order
    pub feature_order: Vec<String>,
    /// Alert identifiers in training order
    pub alert_order: Vec<String>,
    /// Observations in the training split
    pub train_size: usize,
    /// Observations in the held-out split
    pub test_size: usize,
    /// Held-out precision/recall/F1 per alert
    pub per_label_metrics: BTreeMap<String, LabelMetrics>,
    /// Mean F1 across alerts on the held-out split
    pub macro_f1: f64,
    /// Training hyperparameters
    pub hyperparameters: Hyperparameters,
    /// When the training run finished
    pub trained_at: DateTime<Utc>,
}
