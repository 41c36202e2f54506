//! Training pipeline: split, fit, evaluate, assemble the artifact

use crate::dataset::Dataset;
use crate::split::{stratified_split, SplitIndices};
use crate::TrainError;
use alert_taxonomy::{AlertId, ALERT_COUNT};
use chrono::Utc;
use feature_contract::FIELD_ORDER;
use forest_classifier::{
    macro_f1, Hyperparameters, LabelMetrics, MultiLabelClassifier,
};
use model_artifact::{ArtifactMetadata, ModelArtifact};
use std::collections::BTreeMap;
use tracing::info;

/// Train on the dataset and produce a ready-to-save artifact.
///
/// The split is seeded from the hyperparameters, so the artifact's recorded
/// metrics can be reproduced later from the same dataset.
pub fn train(
    dataset: &Dataset,
    hp: &Hyperparameters,
    test_fraction: f64,
) -> Result<ModelArtifact, TrainError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainError::InvalidFraction(test_fraction));
    }

    let split = stratified_split(dataset.labels(), test_fraction, hp.seed);
    if split.train.is_empty() {
        return Err(TrainError::DegenerateSplit("train"));
    }
    if split.test.is_empty() {
        return Err(TrainError::DegenerateSplit("test"));
    }
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "dataset split"
    );

    let train_set = dataset.subset(&split.train)?;
    let classifier = MultiLabelClassifier::train(&train_set, hp)?;

    let per_label_metrics = evaluate_split(&classifier, dataset, &split.test)?;
    let mean_f1 = macro_f1(per_label_metrics.values());

    let metadata = ArtifactMetadata {
        feature_order: FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
        alert_order: AlertId::ALL.iter().map(|a| a.as_str().to_string()).collect(),
        train_size: split.train.len(),
        test_size: split.test.len(),
        per_label_metrics,
        macro_f1: mean_f1,
        hyperparameters: *hp,
        trained_at: Utc::now(),
    };

    Ok(ModelArtifact::new(classifier, metadata))
}

/// Reproduce the seeded split an artifact was evaluated with
pub fn reproduce_split(
    dataset: &Dataset,
    metadata: &ArtifactMetadata,
) -> SplitIndices {
    let total = metadata.train_size + metadata.test_size;
    let fraction = if total == 0 {
        0.2
    } else {
        metadata.test_size as f64 / total as f64
    };
    stratified_split(dataset.labels(), fraction, metadata.hyperparameters.seed)
}

/// Score the held-out rows and compute per-label metrics
pub fn evaluate_split(
    classifier: &MultiLabelClassifier,
    dataset: &Dataset,
    test_indices: &[usize],
) -> Result<BTreeMap<String, LabelMetrics>, TrainError> {
    let mut actual: Vec<Vec<u8>> = vec![Vec::with_capacity(test_indices.len()); ALERT_COUNT];
    let mut predicted: Vec<Vec<u8>> = vec![Vec::with_capacity(test_indices.len()); ALERT_COUNT];

    for &i in test_indices {
        let labels = classifier.predict_row(&dataset.features()[i])?;
        for (j, (_, value)) in labels.iter().enumerate() {
            actual[j].push(dataset.labels()[i][j]);
            predicted[j].push(value);
        }
    }

    Ok(AlertId::ALL
        .iter()
        .enumerate()
        .map(|(j, alert)| {
            (
                alert.as_str().to_string(),
                LabelMetrics::compute(&actual[j], &predicted[j]),
            )
        })
        .collect())
}
