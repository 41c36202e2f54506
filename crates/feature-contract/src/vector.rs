//! Feature Vector and bound checking

use crate::error::ValidationError;
use serde::Serialize;
use serde_json::Value;

/// Number of sensor readings per observation
pub const FEATURE_COUNT: usize = 6;

/// Canonical field order used at both training and serving time.
///
/// The model artifact records this order and the loader rejects any artifact
/// that disagrees, so a reordering shows up as a startup failure instead of
/// silently corrupted predictions.
pub const FIELD_ORDER: [&str; FEATURE_COUNT] = [
    "pH",
    "temperature_C",
    "soil_humidity_pct",
    "N_ppm",
    "P_ppm",
    "K_ppm",
];

/// pH valid range
pub const PH_RANGE: (f64, f64) = (0.0, 14.0);
/// Soil humidity valid range (%)
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
/// Nutrient readings must be non-negative (ppm)
pub const NUTRIENT_RANGE: (f64, f64) = (0.0, f64::INFINITY);

/// Validated six-field sensor reading.
///
/// Immutable once constructed; the only way in is through
/// [`FeatureVector::new`] or [`FeatureVector::from_json`], both of which
/// enforce the declared bounds. There is deliberately no `Deserialize` impl.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "pH")]
    ph: f64,
    #[serde(rename = "temperature_C")]
    temperature_c: f64,
    soil_humidity_pct: f64,
    #[serde(rename = "N_ppm")]
    n_ppm: f64,
    #[serde(rename = "P_ppm")]
    p_ppm: f64,
    #[serde(rename = "K_ppm")]
    k_ppm: f64,
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotNumeric { field })
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: (f64, f64),
) -> Result<f64, ValidationError> {
    if value < range.0 || value > range.1 {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: range.0,
            max: range.1,
        })
    } else {
        Ok(value)
    }
}

impl FeatureVector {
    /// Validate raw readings into a feature vector.
    ///
    /// Temperature is unbounded; every reading must still be a finite number.
    pub fn new(
        ph: f64,
        temperature_c: f64,
        soil_humidity_pct: f64,
        n_ppm: f64,
        p_ppm: f64,
        k_ppm: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            ph: check_range("pH", check_finite("pH", ph)?, PH_RANGE)?,
            temperature_c: check_finite("temperature_C", temperature_c)?,
            soil_humidity_pct: check_range(
                "soil_humidity_pct",
                check_finite("soil_humidity_pct", soil_humidity_pct)?,
                HUMIDITY_RANGE,
            )?,
            n_ppm: check_range("N_ppm", check_finite("N_ppm", n_ppm)?, NUTRIENT_RANGE)?,
            p_ppm: check_range("P_ppm", check_finite("P_ppm", p_ppm)?, NUTRIENT_RANGE)?,
            k_ppm: check_range("K_ppm", check_finite("K_ppm", k_ppm)?, NUTRIENT_RANGE)?,
        })
    }

    /// Validate a JSON payload with the six named fields.
    ///
    /// Gives the service boundary full control over the error taxonomy:
    /// absent or null fields report `MissingField`, non-number values report
    /// `NotNumeric`, bound violations report `OutOfRange`.
    pub fn from_json(raw: &Value) -> Result<Self, ValidationError> {
        Self::new(
            extract(raw, "pH")?,
            extract(raw, "temperature_C")?,
            extract(raw, "soil_humidity_pct")?,
            extract(raw, "N_ppm")?,
            extract(raw, "P_ppm")?,
            extract(raw, "K_ppm")?,
        )
    }

    /// Readings in [`FIELD_ORDER`], the order the classifier was trained with
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ph,
            self.temperature_c,
            self.soil_humidity_pct,
            self.n_ppm,
            self.p_ppm,
            self.k_ppm,
        ]
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn soil_humidity_pct(&self) -> f64 {
        self.soil_humidity_pct
    }

    pub fn n_ppm(&self) -> f64 {
        self.n_ppm
    }

    pub fn p_ppm(&self) -> f64 {
        self.p_ppm
    }

    pub fn k_ppm(&self) -> f64 {
        self.k_ppm
    }
}

fn extract(raw: &Value, field: &'static str) -> Result<f64, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => value
            .as_f64()
            .ok_or(ValidationError::NotNumeric { field }),
    }
}
