//! Alert Taxonomy
//!
//! The fixed vocabulary of agronomic alerts for a berry crop: twelve
//! identifiers grouped in six antagonistic low/high pairs, plus the
//! remediation text attached to each one.

mod recommendations;

pub use recommendations::RecommendationTable;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of alert labels in the taxonomy
pub const ALERT_COUNT: usize = 12;

/// Errors raised by the taxonomy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    /// Identifier string not part of the taxonomy
    #[error("unknown alert identifier: {0}")]
    UnknownAlert(String),

    /// Recommendation table does not cover every alert
    #[error("no recommendation entry for alert: {0}")]
    MissingRecommendation(&'static str),

    /// Recommendation table file unreadable or malformed
    #[error("recommendation table unreadable: {0}")]
    TableUnreadable(String),

    /// Label vector element outside {0, 1}
    #[error("label value {value} at index {index} is not binary")]
    NonBinaryLabel { index: usize, value: u8 },
}

/// Agronomic alert raised for one monitored soil quantity.
///
/// Both members of a low/high pair are independently modeled labels; the
/// classifier may fire both at once and the taxonomy does not suppress that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertId {
    PhLow,
    PhHigh,
    HumidityLow,
    HumidityHigh,
    TemperatureLow,
    TemperatureHigh,
    NitrogenLow,
    NitrogenHigh,
    PhosphorusLow,
    PhosphorusHigh,
    PotassiumLow,
    PotassiumHigh,
}

impl AlertId {
    /// All alerts in canonical order. Label vectors, artifact metadata and
    /// response composition are index-aligned to this order.
    pub const ALL: [AlertId; ALERT_COUNT] = [
        AlertId::PhLow,
        AlertId::PhHigh,
        AlertId::HumidityLow,
        AlertId::HumidityHigh,
        AlertId::TemperatureLow,
        AlertId::TemperatureHigh,
        AlertId::NitrogenLow,
        AlertId::NitrogenHigh,
        AlertId::PhosphorusLow,
        AlertId::PhosphorusHigh,
        AlertId::PotassiumLow,
        AlertId::PotassiumHigh,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertId::PhLow => "ph_low",
            AlertId::PhHigh => "ph_high",
            AlertId::HumidityLow => "humidity_low",
            AlertId::HumidityHigh => "humidity_high",
            AlertId::TemperatureLow => "temperature_low",
            AlertId::TemperatureHigh => "temperature_high",
            AlertId::NitrogenLow => "nitrogen_low",
            AlertId::NitrogenHigh => "nitrogen_high",
            AlertId::PhosphorusLow => "phosphorus_low",
            AlertId::PhosphorusHigh => "phosphorus_high",
            AlertId::PotassiumLow => "potassium_low",
            AlertId::PotassiumHigh => "potassium_high",
        }
    }

    /// The measured quantity this alert refers to
    pub fn quantity(&self) -> &'static str {
        match self {
            AlertId::PhLow | AlertId::PhHigh => "pH",
            AlertId::HumidityLow | AlertId::HumidityHigh => "soil_humidity_pct",
            AlertId::TemperatureLow | AlertId::TemperatureHigh => "temperature_C",
            AlertId::NitrogenLow | AlertId::NitrogenHigh => "N_ppm",
            AlertId::PhosphorusLow | AlertId::PhosphorusHigh => "P_ppm",
            AlertId::PotassiumLow | AlertId::PotassiumHigh => "K_ppm",
        }
    }

    /// The other member of the low/high pair for the same quantity
    pub fn counterpart(&self) -> AlertId {
        match self {
            AlertId::PhLow => AlertId::PhHigh,
            AlertId::PhHigh => AlertId::PhLow,
            AlertId::HumidityLow => AlertId::HumidityHigh,
            AlertId::HumidityHigh => AlertId::HumidityLow,
            AlertId::TemperatureLow => AlertId::TemperatureHigh,
            AlertId::TemperatureHigh => AlertId::TemperatureLow,
            AlertId::NitrogenLow => AlertId::NitrogenHigh,
            AlertId::NitrogenHigh => AlertId::NitrogenLow,
            AlertId::PhosphorusLow => AlertId::PhosphorusHigh,
            AlertId::PhosphorusHigh => AlertId::PhosphorusLow,
            AlertId::PotassiumLow => AlertId::PotassiumHigh,
            AlertId::PotassiumHigh => AlertId::PotassiumLow,
        }
    }

    /// Position of this alert in [`AlertId::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertId {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|a| a.as_str() == s)
            .copied()
            .ok_or_else(|| TaxonomyError::UnknownAlert(s.to_string()))
    }
}

/// Twelve-element binary output aligned to [`AlertId::ALL`].
///
/// Produced once per inference call and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVector {
    values: [u8; ALERT_COUNT],
}

impl LabelVector {
    /// Build from raw binary values, rejecting anything outside {0, 1}
    pub fn new(values: [u8; ALERT_COUNT]) -> Result<Self, TaxonomyError> {
        for (index, &value) in values.iter().enumerate() {
            if value > 1 {
                return Err(TaxonomyError::NonBinaryLabel { index, value });
            }
        }
        Ok(Self { values })
    }

    /// Build from per-alert boolean flags
    pub fn from_flags(flags: [bool; ALERT_COUNT]) -> Self {
        let mut values = [0u8; ALERT_COUNT];
        for (value, flag) in values.iter_mut().zip(flags.iter()) {
            *value = u8::from(*flag);
        }
        Self { values }
    }

    /// Value for one alert (0 or 1)
    pub fn get(&self, alert: AlertId) -> u8 {
        self.values[alert.index()]
    }

    /// Whether the given alert fired
    pub fn is_positive(&self, alert: AlertId) -> bool {
        self.get(alert) == 1
    }

    /// Alerts with value 1, in canonical order
    pub fn positives(&self) -> impl Iterator<Item = AlertId> + '_ {
        AlertId::ALL
            .iter()
            .copied()
            .filter(move |alert| self.is_positive(*alert))
    }

    /// All (alert, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (AlertId, u8)> + '_ {
        AlertId::ALL
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Number of alerts that fired
    pub fn count_positive(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }
}
