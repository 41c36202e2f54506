//! Feature Contract
//!
//! Validated, bounded representation of the six soil/environmental sensor
//! readings consumed by the classifier. Validation is a pure function of the
//! raw input and happens before anything touches the model.

mod error;
mod vector;

pub use error::ValidationError;
pub use vector::{
    FeatureVector, FEATURE_COUNT, FIELD_ORDER, HUMIDITY_RANGE, NUTRIENT_RANGE, PH_RANGE,
};
