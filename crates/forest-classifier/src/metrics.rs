//! Per-label classification metrics

use serde::{Deserialize, Serialize};

/// Precision, recall and F1 for one binary label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl LabelMetrics {
    /// Compute from aligned actual/predicted binary labels. Degenerate
    /// denominators yield 0.0 rather than NaN.
    pub fn compute(actual: &[u8], predicted: &[u8]) -> Self {
        let mut tp = 0u64;
        let mut fp = 0u64;
        let mut fn_ = 0u64;
        for (&a, &p) in actual.iter().zip(predicted.iter()) {
            match (a, p) {
                (1, 1) => tp += 1,
                (0, 1) => fp += 1,
                (1, 0) => fn_ += 1,
                _ => {}
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
        }
    }

    /// Whether every component agrees with `other` within `tolerance`
    pub fn within(&self, other: &LabelMetrics, tolerance: f64) -> bool {
        (self.precision - other.precision).abs() <= tolerance
            && (self.recall - other.recall).abs() <= tolerance
            && (self.f1 - other.f1).abs() <= tolerance
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Mean F1 across labels
pub fn macro_f1<'a>(metrics: impl IntoIterator<Item = &'a LabelMetrics>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for m in metrics {
        sum += m.f1;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let m = LabelMetrics::compute(&[1, 0, 1, 0], &[1, 0, 1, 0]);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.f1, 1.0);
    }

    #[test]
    fn test_known_confusion_counts() {
        // tp=2, fp=1, fn=1 -> precision 2/3, recall 2/3, f1 2/3
        let actual = [1, 1, 1, 0, 0];
        let predicted = [1, 1, 0, 1, 0];
        let m = LabelMetrics::compute(&actual, &predicted);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division_yields_zero() {
        // No positives anywhere: all denominators are zero
        let m = LabelMetrics::compute(&[0, 0, 0], &[0, 0, 0]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
    }

    #[test]
    fn test_within_tolerance() {
        let a = LabelMetrics {
            precision: 0.90,
            recall: 0.80,
            f1: 0.847,
        };
        let b = LabelMetrics {
            precision: 0.905,
            recall: 0.795,
            f1: 0.846,
        };
        assert!(a.within(&b, 0.01));
        assert!(!a.within(&b, 0.001));
    }

    #[test]
    fn test_macro_f1() {
        let metrics = [
            LabelMetrics {
                precision: 1.0,
                recall: 1.0,
                f1: 1.0,
            },
            LabelMetrics {
                precision: 0.0,
                recall: 0.0,
                f1: 0.5,
            },
        ];
        assert!((macro_f1(metrics.iter()) - 0.75).abs() < 1e-12);
        assert_eq!(macro_f1(std::iter::empty::<&LabelMetrics>()), 0.0);
    }
}
