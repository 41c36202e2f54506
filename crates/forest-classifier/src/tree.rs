//! Axis-aligned decision tree with weighted Gini splits

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One node of a fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node carrying the predicted class
    Leaf { prediction: u8 },
    /// Internal split: `feature <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Training controls for a single tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub features_per_split: usize,
}

/// A fitted binary decision tree. Frozen after training; `predict` carries
/// no randomness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Fit a tree on the rows selected by `indices` (a bootstrap multiset).
    pub(crate) fn fit(
        rows: &[Vec<f64>],
        labels: &[u8],
        weights: &[f64],
        indices: Vec<usize>,
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let root = grow(rows, labels, weights, indices, config, 0, rng);
        Self { root }
    }

    /// Class for one feature row (0 or 1)
    pub fn predict(&self, features: &[f64]) -> u8 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { prediction } => return *prediction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    #[cfg(test)]
    pub(crate) fn from_root(root: Node) -> Self {
        Self { root }
    }
}

fn class_weights(indices: &[usize], labels: &[u8], weights: &[f64]) -> (f64, f64) {
    let mut neg = 0.0;
    let mut pos = 0.0;
    for &i in indices {
        if labels[i] == 1 {
            pos += weights[i];
        } else {
            neg += weights[i];
        }
    }
    (neg, pos)
}

fn gini(neg: f64, pos: f64) -> f64 {
    let total = neg + pos;
    if total <= 0.0 {
        return 0.0;
    }
    let p_neg = neg / total;
    let p_pos = pos / total;
    1.0 - p_neg * p_neg - p_pos * p_pos
}

// Ties break toward the negative class (no alert).
fn majority(neg: f64, pos: f64) -> u8 {
    u8::from(pos > neg)
}

fn grow(
    rows: &[Vec<f64>],
    labels: &[u8],
    weights: &[f64],
    indices: Vec<usize>,
    config: &TreeConfig,
    depth: usize,
    rng: &mut StdRng,
) -> Node {
    if indices.is_empty() {
        return Node::Leaf { prediction: 0 };
    }

    let (neg, pos) = class_weights(&indices, labels, weights);
    if depth >= config.max_depth
        || indices.len() < config.min_samples_split
        || neg == 0.0
        || pos == 0.0
    {
        return Node::Leaf {
            prediction: majority(neg, pos),
        };
    }

    match best_split(rows, labels, weights, &indices, config, rng) {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| rows[i][feature] <= threshold);
            if left_idx.is_empty() || right_idx.is_empty() {
                return Node::Leaf {
                    prediction: majority(neg, pos),
                };
            }
            Node::Split {
                feature,
                threshold,
                left: Box::new(grow(rows, labels, weights, left_idx, config, depth + 1, rng)),
                right: Box::new(grow(
                    rows,
                    labels,
                    weights,
                    right_idx,
                    config,
                    depth + 1,
                    rng,
                )),
            }
        }
        None => Node::Leaf {
            prediction: majority(neg, pos),
        },
    }
}

/// Pick the impurity-minimizing `(feature, threshold)` over a random feature
/// subset. Thresholds are midpoints of adjacent distinct values; children
/// must respect `min_samples_leaf`. Returns `None` when no candidate beats
/// the parent impurity.
fn best_split(
    rows: &[Vec<f64>],
    labels: &[u8],
    weights: &[f64],
    indices: &[usize],
    config: &TreeConfig,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = rows[indices[0]].len();
    let mut candidates: Vec<usize> = (0..n_features).collect();
    candidates.shuffle(rng);
    candidates.truncate(config.features_per_split.clamp(1, n_features));

    let (parent_neg, parent_pos) = class_weights(indices, labels, weights);
    let parent_total = parent_neg + parent_pos;
    let parent_gini = gini(parent_neg, parent_pos);

    let mut best: Option<(f64, usize, f64)> = None;

    for &feature in &candidates {
        let mut order = indices.to_vec();
        order.sort_by(|&a, &b| {
            rows[a][feature]
                .partial_cmp(&rows[b][feature])
                .unwrap_or(Ordering::Equal)
        });

        let mut left_neg = 0.0;
        let mut left_pos = 0.0;
        for (position, pair) in order.windows(2).enumerate() {
            let current = pair[0];
            if labels[current] == 1 {
                left_pos += weights[current];
            } else {
                left_neg += weights[current];
            }

            let value = rows[current][feature];
            let next_value = rows[pair[1]][feature];
            if value == next_value {
                continue;
            }

            let left_count = position + 1;
            let right_count = order.len() - left_count;
            if left_count < config.min_samples_leaf || right_count < config.min_samples_leaf {
                continue;
            }

            let right_neg = parent_neg - left_neg;
            let right_pos = parent_pos - left_pos;
            let score = ((left_neg + left_pos) * gini(left_neg, left_pos)
                + (right_neg + right_pos) * gini(right_neg, right_pos))
                / parent_total;

            if best.map_or(true, |(s, _, _)| score < s) {
                best = Some((score, feature, (value + next_value) / 2.0));
            }
        }
    }

    best.and_then(|(score, feature, threshold)| {
        if score + 1e-12 < parent_gini {
            Some((feature, threshold))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn config() -> TreeConfig {
        TreeConfig {
            max_depth: 8,
            min_samples_split: 2,
            min_samples_leaf: 1,
            features_per_split: 1,
        }
    }

    #[test]
    fn test_learns_single_threshold() {
        // Label 1 iff x > 50; one feature, clean separation
        let rows: Vec<Vec<f64>> = (0..100).map(|x| vec![f64::from(x)]).collect();
        let labels: Vec<u8> = (0..100).map(|x| u8::from(x > 50)).collect();
        let weights = vec![1.0; 100];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &labels,
            &weights,
            (0..100).collect(),
            &config(),
            &mut rng,
        );

        assert_eq!(tree.predict(&[10.0]), 0);
        assert_eq!(tree.predict(&[90.0]), 1);
        assert!(tree.depth() >= 1);
    }

    #[test]
    fn test_pure_node_becomes_leaf() {
        let rows: Vec<Vec<f64>> = (0..20).map(|x| vec![f64::from(x)]).collect();
        let labels = vec![0u8; 20];
        let weights = vec![1.0; 20];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &rows,
            &labels,
            &weights,
            (0..20).collect(),
            &config(),
            &mut rng,
        );

        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[5.0]), 0);
    }

    #[test]
    fn test_max_depth_respected() {
        // Alternating labels force deep splits without a depth cap
        let rows: Vec<Vec<f64>> = (0..64).map(|x| vec![f64::from(x)]).collect();
        let labels: Vec<u8> = (0..64).map(|x| (x % 2) as u8).collect();
        let weights = vec![1.0; 64];
        let mut rng = StdRng::seed_from_u64(7);

        let shallow = TreeConfig {
            max_depth: 3,
            ..config()
        };
        let tree = DecisionTree::fit(
            &rows,
            &labels,
            &weights,
            (0..64).collect(),
            &shallow,
            &mut rng,
        );
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let rows: Vec<Vec<f64>> = (0..100).map(|x| vec![f64::from(x)]).collect();
        let labels: Vec<u8> = (0..100).map(|x| u8::from(x > 50)).collect();
        let weights = vec![1.0; 100];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(
            &rows,
            &labels,
            &weights,
            (0..100).collect(),
            &config(),
            &mut rng,
        );

        let json = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&json).unwrap();
        for x in [0.0, 25.0, 49.0, 75.0, 99.0] {
            assert_eq!(tree.predict(&[x]), back.predict(&[x]));
        }
    }
}
