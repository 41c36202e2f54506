//! Training dataset loader.
//!
//! Semicolon-separated text, one header row naming the six feature columns
//! followed by the twelve label columns. The header is validated by name so
//! a reordered export fails here instead of silently training a scrambled
//! model.

use crate::DatasetError;
use alert_taxonomy::{AlertId, ALERT_COUNT};
use feature_contract::{FEATURE_COUNT, FIELD_ORDER};
use forest_classifier::{ClassifierError, TrainingSet};
use std::fs;
use std::path::Path;
use tracing::info;

const COLUMN_COUNT: usize = FEATURE_COUNT + ALERT_COUNT;

/// Expected header columns, in order
pub fn expected_header() -> Vec<&'static str> {
    FIELD_ORDER
        .iter()
        .copied()
        .chain(AlertId::ALL.iter().map(|a| a.as_str()))
        .collect()
}

/// Parsed observations: one feature row and twelve binary labels each
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<[u8; ALERT_COUNT]>,
}

impl Dataset {
    /// Build from already parsed rows, checking shapes
    pub fn new(
        features: Vec<Vec<f64>>,
        labels: Vec<[u8; ALERT_COUNT]>,
    ) -> Result<Self, DatasetError> {
        if features.is_empty() {
            return Err(DatasetError::Empty);
        }
        if features.len() != labels.len() {
            return Err(DatasetError::Row {
                line: 0,
                message: format!(
                    "{} feature rows but {} label rows",
                    features.len(),
                    labels.len()
                ),
            });
        }
        for (i, row) in features.iter().enumerate() {
            if row.len() != FEATURE_COUNT {
                return Err(DatasetError::Row {
                    line: i + 2,
                    message: format!("{} features, expected {FEATURE_COUNT}", row.len()),
                });
            }
        }
        Ok(Self { features, labels })
    }

    /// Read and parse a dataset file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::parse(&text)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse semicolon-separated text with a named header row
    pub fn parse(text: &str) -> Result<Self, DatasetError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or(DatasetError::Empty)?;
        validate_header(header)?;

        let mut features = Vec::new();
        let mut labels = Vec::new();
        for (line, row) in lines {
            let fields: Vec<&str> = row.split(';').map(str::trim).collect();
            if fields.len() != COLUMN_COUNT {
                return Err(DatasetError::Row {
                    line,
                    message: format!("{} columns, expected {COLUMN_COUNT}", fields.len()),
                });
            }

            let mut feature_row = Vec::with_capacity(FEATURE_COUNT);
            for (field, name) in fields[..FEATURE_COUNT].iter().zip(FIELD_ORDER.iter()) {
                let value: f64 = field.parse().map_err(|_| DatasetError::Row {
                    line,
                    message: format!("{name} value {field:?} is not numeric"),
                })?;
                if !value.is_finite() {
                    return Err(DatasetError::Row {
                        line,
                        message: format!("{name} value {field:?} is not finite"),
                    });
                }
                feature_row.push(value);
            }

            let mut label_row = [0u8; ALERT_COUNT];
            for ((field, alert), slot) in fields[FEATURE_COUNT..]
                .iter()
                .zip(AlertId::ALL.iter())
                .zip(label_row.iter_mut())
            {
                *slot = match *field {
                    "0" => 0,
                    "1" => 1,
                    other => {
                        return Err(DatasetError::Row {
                            line,
                            message: format!("{} value {other:?} is not binary", alert.as_str()),
                        })
                    }
                };
            }

            features.push(feature_row);
            labels.push(label_row);
        }

        Self::new(features, labels)
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

    /// Materialize the observations selected by `indices` as a training set
    pub fn subset(&self, indices: &[usize]) -> Result<TrainingSet, ClassifierError> {
        let features = indices.iter().map(|&i| self.features[i].clone()).collect();
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        TrainingSet::new(features, labels)
    }
}

fn validate_header(header: &str) -> Result<(), DatasetError> {
    let found: Vec<&str> = header.split(';').map(str::trim).collect();
    let expected = expected_header();
    if found.len() != expected.len() {
        return Err(DatasetError::HeaderArity {
            found: found.len(),
            expected: expected.len(),
        });
    }
    for (position, (f, e)) in found.iter().zip(expected.iter()).enumerate() {
        if f != e {
            return Err(DatasetError::HeaderMismatch {
                position,
                found: (*f).to_string(),
                expected: (*e).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_line() -> String {
        expected_header().join(";")
    }

    #[test]
    fn test_parse_happy_path() {
        let text = format!(
            "{}\n4.8;18;40;25;30;150;1;0;1;0;0;0;0;0;0;0;0;0\n6.0;19;65;30;32;160;0;0;0;0;0;0;0;0;0;0;0;0\n",
            header_line()
        );
        let dataset = Dataset::parse(&text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features()[0], vec![4.8, 18.0, 40.0, 25.0, 30.0, 150.0]);
        assert_eq!(dataset.labels()[0][0], 1);
        assert_eq!(dataset.labels()[0][2], 1);
        assert_eq!(dataset.labels()[1], [0u8; ALERT_COUNT]);
    }

    #[test]
    fn test_parse_tolerates_crlf_and_blank_lines() {
        let text = format!(
            "{}\r\n\r\n6.0;19;65;30;32;160;0;0;0;0;0;0;0;0;0;0;0;0\r\n\n",
            header_line()
        );
        let dataset = Dataset::parse(&text).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_reordered_header_rejected() {
        let mut columns = expected_header();
        columns.swap(0, 1);
        let text = format!(
            "{}\n18;6.0;65;30;32;160;0;0;0;0;0;0;0;0;0;0;0;0\n",
            columns.join(";")
        );
        let err = Dataset::parse(&text).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::HeaderMismatch { position: 0, .. }
        ));
    }

    #[test]
    fn test_non_numeric_feature_names_line_and_column() {
        let text = format!(
            "{}\n6.0;warm;65;30;32;160;0;0;0;0;0;0;0;0;0;0;0;0\n",
            header_line()
        );
        let err = Dataset::parse(&text).unwrap_err();
        match err {
            DatasetError::Row { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("temperature_C"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let text = format!(
            "{}\n6.0;19;65;30;32;160;2;0;0;0;0;0;0;0;0;0;0;0\n",
            header_line()
        );
        let err = Dataset::parse(&text).unwrap_err();
        match err {
            DatasetError::Row { message, .. } => assert!(message.contains("ph_low")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_rejected() {
        let text = format!("{}\n6.0;19;65\n", header_line());
        assert!(matches!(
            Dataset::parse(&text),
            Err(DatasetError::Row { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(Dataset::parse(""), Err(DatasetError::Empty)));
        assert!(matches!(
            Dataset::parse(&header_line()),
            Err(DatasetError::Empty)
        ));
    }
}
