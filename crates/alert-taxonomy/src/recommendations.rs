//! Remediation text for each alert.
//!
//! The built-in table covers the whole taxonomy at compile time; deployments
//! can ship their own wording as a JSON file keyed by alert identifier. A
//! file-loaded table must still cover every identifier, checked at startup.

use crate::{AlertId, TaxonomyError};
use std::collections::BTreeMap;
use std::path::Path;

fn builtin_text(alert: AlertId) -> &'static str {
    match alert {
        AlertId::PhLow => "Apply agricultural lime or alkaline amendments to raise soil pH.",
        AlertId::PhHigh => {
            "Work acidic organic matter into the soil to bring the pH down gradually."
        }
        AlertId::HumidityLow => {
            "Increase irrigation frequency or duration and inspect the irrigation lines."
        }
        AlertId::HumidityHigh => "Reduce watering and improve drainage to prevent waterlogging.",
        AlertId::TemperatureLow => {
            "Protect the crop with row covers or plastic sheeting during the coldest hours."
        }
        AlertId::TemperatureHigh => {
            "Provide partial shade and irrigate during cool hours to reduce heat stress."
        }
        AlertId::NitrogenLow => {
            "Apply nitrogen fertilizer following the technical recommendation and a soil analysis."
        }
        AlertId::NitrogenHigh => "Reduce or temporarily suspend nitrogen fertilization.",
        AlertId::PhosphorusLow => {
            "Apply a phosphorus fertilizer suited to the crop and soil conditions."
        }
        AlertId::PhosphorusHigh => {
            "Reduce or suspend phosphorus applications to avoid over-fertilization."
        }
        AlertId::PotassiumLow => {
            "Apply potassium fertilizer according to the soil analysis recommendations."
        }
        AlertId::PotassiumHigh => "Reduce or temporarily suspend potassium applications.",
    }
}

/// Read-only mapping from alert identifier to remediation text.
///
/// Loaded once at process start and held for the life of the process.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    entries: BTreeMap<AlertId, String>,
}

impl RecommendationTable {
    /// The built-in English table, complete by construction
    pub fn builtin() -> Self {
        let entries = AlertId::ALL
            .iter()
            .map(|&alert| (alert, builtin_text(alert).to_string()))
            .collect();
        Self { entries }
    }

    /// Parse a table from a JSON object keyed by alert identifier.
    ///
    /// Unknown keys are rejected; missing keys surface later through
    /// [`RecommendationTable::verify_complete`].
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| TaxonomyError::TableUnreadable(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (key, text) in raw {
            let alert: AlertId = key.parse()?;
            entries.insert(alert, text);
        }
        Ok(Self { entries })
    }

    /// Load an override table from disk
    pub fn from_json_file(path: &Path) -> Result<Self, TaxonomyError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TaxonomyError::TableUnreadable(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Remediation text for one alert.
    ///
    /// Falls back to the built-in wording only if the entry is absent, which
    /// [`RecommendationTable::verify_complete`] rules out for served tables.
    pub fn recommendation(&self, alert: AlertId) -> &str {
        self.entries
            .get(&alert)
            .map(String::as_str)
            .unwrap_or_else(|| builtin_text(alert))
    }

    /// Fail if any alert in the taxonomy lacks an entry
    pub fn verify_complete(&self) -> Result<(), TaxonomyError> {
        for alert in AlertId::ALL {
            if !self.entries.contains_key(&alert) {
                return Err(TaxonomyError::MissingRecommendation(alert.as_str()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_complete() {
        let table = RecommendationTable::builtin();
        table.verify_complete().unwrap();
        for alert in AlertId::ALL {
            assert!(!table.recommendation(alert).is_empty());
        }
    }

    #[test]
    fn test_partial_override_fails_completeness() {
        let table =
            RecommendationTable::from_json_str(r#"{"ph_low": "Lime the field."}"#).unwrap();
        let err = table.verify_complete().unwrap_err();
        assert_eq!(err, TaxonomyError::MissingRecommendation("ph_high"));
        // Lookup still answers from the built-in wording
        assert!(!table.recommendation(AlertId::PotassiumHigh).is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RecommendationTable::from_json_str(r#"{"ph_medium": "?"}"#).unwrap_err();
        assert_eq!(err, TaxonomyError::UnknownAlert("ph_medium".to_string()));
    }

    #[test]
    fn test_override_replaces_text() {
        let table =
            RecommendationTable::from_json_str(r#"{"ph_low": "Lime the field."}"#).unwrap();
        assert_eq!(table.recommendation(AlertId::PhLow), "Lime the field.");
    }
}
