//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating raw sensor readings
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but not a finite number
    #[error("{field} is not a finite number")]
    NotNumeric { field: &'static str },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::MissingField(field) => field,
            ValidationError::NotNumeric { field } => field,
        }
    }
}
