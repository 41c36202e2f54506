//! Bagged ensemble of decision trees for one binary label

use crate::multilabel::Hyperparameters;
use crate::tree::{DecisionTree, TreeConfig};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ensemble of trees trained on bootstrap resamples, combined by majority
/// vote. Frozen after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryForest {
    trees: Vec<DecisionTree>,
}

impl BinaryForest {
    /// Train the forest for one label column.
    pub(crate) fn fit(
        rows: &[Vec<f64>],
        labels: &[u8],
        hp: &Hyperparameters,
        rng: &mut StdRng,
    ) -> Self {
        let weights = balanced_weights(labels);
        let config = TreeConfig {
            max_depth: hp.max_depth,
            min_samples_split: hp.min_samples_split,
            min_samples_leaf: hp.min_samples_leaf,
            features_per_split: hp.features_per_split,
        };

        let n = rows.len();
        let mut trees = Vec::with_capacity(hp.n_trees);
        for _ in 0..hp.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(
                rows, labels, &weights, bootstrap, &config, rng,
            ));
        }
        Self { trees }
    }

    /// Majority vote across the trees. An exact tie breaks toward the
    /// negative class (no alert).
    pub fn predict(&self, features: &[f64]) -> u8 {
        let positive_votes = self
            .trees
            .iter()
            .filter(|tree| tree.predict(features) == 1)
            .count();
        u8::from(positive_votes * 2 > self.trees.len())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[cfg(test)]
    pub(crate) fn from_trees(trees: Vec<DecisionTree>) -> Self {
        Self { trees }
    }
}

/// Class-balanced sample weights: `w_c = n / (2 * n_c)`, up-weighting the
/// minority class inversely to its frequency. A class absent from the
/// training labels keeps weight 1.
pub(crate) fn balanced_weights(labels: &[u8]) -> Vec<f64> {
    let n = labels.len() as f64;
    let n_pos = labels.iter().filter(|&&l| l == 1).count() as f64;
    let n_neg = n - n_pos;
    let w_pos = if n_pos > 0.0 { n / (2.0 * n_pos) } else { 1.0 };
    let w_neg = if n_neg > 0.0 { n / (2.0 * n_neg) } else { 1.0 };

    labels
        .iter()
        .map(|&label| if label == 1 { w_pos } else { w_neg })
        .collect()
}
