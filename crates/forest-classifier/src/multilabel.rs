//! Composite multi-label interface over independent binary forests

use crate::forest::BinaryForest;
use crate::ClassifierError;
use alert_taxonomy::{AlertId, LabelVector, ALERT_COUNT};
use feature_contract::{FeatureVector, FEATURE_COUNT, FIELD_ORDER};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Training hyperparameters. Defaults mirror the production training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Trees per label forest
    pub n_trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples in each child of a split
    pub min_samples_leaf: usize,
    /// Random features considered per split
    pub features_per_split: usize,
    /// RNG seed for bootstrap and feature subsampling
    pub seed: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 15,
            min_samples_split: 10,
            min_samples_leaf: 5,
            features_per_split: 2,
            seed: 42,
        }
    }
}

/// Labeled observations for training: one feature row and twelve binary
/// labels per observation, both index-aligned to the canonical orders.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    features: Vec<Vec<f64>>,
    labels: Vec<[u8; ALERT_COUNT]>,
}

impl TrainingSet {
    pub fn new(
        features: Vec<Vec<f64>>,
        labels: Vec<[u8; ALERT_COUNT]>,
    ) -> Result<Self, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::InvalidTrainingSet(
                "no observations".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::InvalidTrainingSet(format!(
                "{} feature rows but {} label rows",
                features.len(),
                labels.len()
            )));
        }
        for (i, row) in features.iter().enumerate() {
            if row.len() != FEATURE_COUNT {
                return Err(ClassifierError::InvalidTrainingSet(format!(
                    "row {i} has {} features, expected {FEATURE_COUNT}",
                    row.len()
                )));
            }
        }
        for (i, row) in labels.iter().enumerate() {
            if row.iter().any(|&l| l > 1) {
                return Err(ClassifierError::InvalidTrainingSet(format!(
                    "row {i} has a non-binary label"
                )));
            }
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[[u8; ALERT_COUNT]] {
        &self.labels
    }

    /// One label column across all observations
    pub fn label_column(&self, index: usize) -> Vec<u8> {
        self.labels.iter().map(|row| row[index]).collect()
    }
}

/// Twelve independent binary forests behind one composite interface.
///
/// Each alert is scored by its own ensemble; training is joint only in the
/// sense that the forests share the same observations. The trained feature
/// order is recorded so that serving can fail fast on arity drift instead of
/// silently mis-scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiLabelClassifier {
    forests: Vec<BinaryForest>,
    feature_order: Vec<String>,
}

impl MultiLabelClassifier {
    /// Train one forest per alert label.
    pub fn train(set: &TrainingSet, hp: &Hyperparameters) -> Result<Self, ClassifierError> {
        let mut rng = StdRng::seed_from_u64(hp.seed);
        let mut forests = Vec::with_capacity(ALERT_COUNT);
        for (index, alert) in AlertId::ALL.iter().enumerate() {
            debug!(alert = alert.as_str(), "training label forest");
            let labels = set.label_column(index);
            forests.push(BinaryForest::fit(set.features(), &labels, hp, &mut rng));
        }
        Ok(Self {
            forests,
            feature_order: FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Score a validated feature vector into a label vector.
    ///
    /// Deterministic for a trained instance; the forests carry no inference
    /// randomness.
    pub fn predict(&self, features: &FeatureVector) -> Result<LabelVector, ClassifierError> {
        self.predict_row(&features.as_array())
    }

    /// Score a raw feature row in [`FIELD_ORDER`]. Used by the offline
    /// evaluation path where rows come straight from the dataset.
    pub fn predict_row(&self, row: &[f64]) -> Result<LabelVector, ClassifierError> {
        if !self.is_trained() {
            return Err(ClassifierError::NotTrained);
        }
        if row.len() != self.feature_order.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.feature_order.len(),
                actual: row.len(),
            });
        }

        let mut flags = [false; ALERT_COUNT];
        for (flag, forest) in flags.iter_mut().zip(self.forests.iter()) {
            *flag = forest.predict(row) == 1;
        }
        Ok(LabelVector::from_flags(flags))
    }

    /// Whether a full set of non-empty forests is loaded
    pub fn is_trained(&self) -> bool {
        self.forests.len() == ALERT_COUNT && self.forests.iter().all(|f| f.n_trees() > 0)
    }

    /// Feature order recorded at training time
    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    /// Number of label forests
    pub fn n_labels(&self) -> usize {
        self.forests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    // Rule-based synthetic observations with wide margins so a small forest
    // learns them reliably.
    fn synthetic_set(n: usize, seed: u64) -> TrainingSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut features = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);
        for _ in 0..n {
            let ph = rng.gen_range(4.0..9.0);
            let temp = rng.gen_range(5.0..35.0);
            let hum = rng.gen_range(30.0..95.0);
            let n_ppm = rng.gen_range(5.0..60.0);
            let p_ppm = rng.gen_range(5.0..65.0);
            let k_ppm = rng.gen_range(50.0..280.0);
            features.push(vec![ph, temp, hum, n_ppm, p_ppm, k_ppm]);
            labels.push(rule_labels(ph, temp, hum, n_ppm, p_ppm, k_ppm));
        }
        TrainingSet::new(features, labels).unwrap()
    }

    fn rule_labels(
        ph: f64,
        temp: f64,
        hum: f64,
        n_ppm: f64,
        p_ppm: f64,
        k_ppm: f64,
    ) -> [u8; ALERT_COUNT] {
        [
            u8::from(ph < 5.2),
            u8::from(ph > 7.5),
            u8::from(hum < 50.0),
            u8::from(hum > 80.0),
            u8::from(temp < 12.0),
            u8::from(temp > 26.0),
            u8::from(n_ppm < 18.0),
            u8::from(n_ppm > 45.0),
            u8::from(p_ppm < 15.0),
            u8::from(p_ppm > 50.0),
            u8::from(k_ppm < 100.0),
            u8::from(k_ppm > 220.0),
        ]
    }

    fn small_hp() -> Hyperparameters {
        Hyperparameters {
            n_trees: 25,
            max_depth: 10,
            min_samples_split: 4,
            min_samples_leaf: 2,
            features_per_split: 2,
            seed: 42,
        }
    }

    #[test]
    fn test_default_hyperparameters() {
        let hp = Hyperparameters::default();
        assert_eq!(hp.n_trees, 100);
        assert_eq!(hp.max_depth, 15);
        assert_eq!(hp.min_samples_split, 10);
        assert_eq!(hp.min_samples_leaf, 5);
        assert_eq!(hp.seed, 42);
    }

    #[test]
    fn test_training_set_rejects_bad_shapes() {
        assert!(TrainingSet::new(vec![], vec![]).is_err());
        assert!(TrainingSet::new(vec![vec![1.0; 5]], vec![[0; ALERT_COUNT]]).is_err());
        assert!(TrainingSet::new(vec![vec![1.0; FEATURE_COUNT]], vec![]).is_err());
        let mut bad_labels = [[0u8; ALERT_COUNT]];
        bad_labels[0][4] = 3;
        assert!(TrainingSet::new(vec![vec![1.0; FEATURE_COUNT]], bad_labels.to_vec()).is_err());
    }

    #[test]
    fn test_trained_classifier_recovers_rules() {
        let set = synthetic_set(500, 11);
        let classifier = MultiLabelClassifier::train(&set, &small_hp()).unwrap();
        assert!(classifier.is_trained());
        assert_eq!(classifier.n_labels(), ALERT_COUNT);

        // Strongly acidic, cold, dry reading far from every decision margin
        let labels = classifier
            .predict_row(&[4.3, 8.0, 38.0, 30.0, 30.0, 160.0])
            .unwrap();
        assert!(labels.is_positive(AlertId::PhLow));
        assert!(labels.is_positive(AlertId::TemperatureLow));
        assert!(labels.is_positive(AlertId::HumidityLow));
        assert!(!labels.is_positive(AlertId::PhHigh));
        assert!(!labels.is_positive(AlertId::NitrogenLow));

        // Near-optimal reading
        let labels = classifier
            .predict_row(&[6.3, 19.0, 65.0, 30.0, 32.0, 160.0])
            .unwrap();
        assert_eq!(labels.count_positive(), 0);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let set = synthetic_set(300, 5);
        let classifier = MultiLabelClassifier::train(&set, &small_hp()).unwrap();
        let row = [5.0, 20.0, 60.0, 25.0, 30.0, 150.0];
        let first = classifier.predict_row(&row).unwrap();
        for _ in 0..5 {
            assert_eq!(classifier.predict_row(&row).unwrap(), first);
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let set = synthetic_set(300, 5);
        let a = MultiLabelClassifier::train(&set, &small_hp()).unwrap();
        let b = MultiLabelClassifier::train(&set, &small_hp()).unwrap();
        for _ in 0..10 {
            let row = [6.0, 15.0, 55.0, 20.0, 25.0, 120.0];
            assert_eq!(a.predict_row(&row).unwrap(), b.predict_row(&row).unwrap());
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let set = synthetic_set(100, 3);
        let classifier = MultiLabelClassifier::train(&set, &small_hp()).unwrap();
        let err = classifier.predict_row(&[1.0, 2.0, 3.0]).unwrap_err();
        match err {
            ClassifierError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, FEATURE_COUNT);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_untrained_rejects_predict() {
        let classifier = MultiLabelClassifier {
            forests: Vec::new(),
            feature_order: FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
        };
        assert!(matches!(
            classifier.predict_row(&[0.0; FEATURE_COUNT]),
            Err(ClassifierError::NotTrained)
        ));
    }
}
