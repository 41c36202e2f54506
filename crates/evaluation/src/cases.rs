//! Canned evaluation cases

use alert_taxonomy::AlertId;
use serde_json::{json, Value};

/// What a case expects back from the service
#[derive(Debug, Clone)]
pub enum Expectation {
    /// A successful diagnosis with the listed alerts present/absent
    Alerts {
        present: Vec<AlertId>,
        absent: Vec<AlertId>,
        exact_count: Option<usize>,
    },
    /// Validation must reject the payload, naming this field
    RejectedField(&'static str),
}

/// One literal input vector with its expected outcome
#[derive(Debug, Clone)]
pub struct EvalCase {
    pub name: &'static str,
    pub input: Value,
    pub expectation: Expectation,
}

fn reading(ph: f64, temp: f64, hum: f64, n: f64, p: f64, k: f64) -> Value {
    json!({
        "pH": ph,
        "temperature_C": temp,
        "soil_humidity_pct": hum,
        "N_ppm": n,
        "P_ppm": p,
        "K_ppm": k,
    })
}

/// The standing acceptance suite for a production artifact
pub fn builtin_cases() -> Vec<EvalCase> {
    vec![
        EvalCase {
            name: "acidic_dry_soil",
            input: reading(4.8, 18.0, 40.0, 25.0, 30.0, 150.0),
            expectation: Expectation::Alerts {
                present: vec![AlertId::PhLow],
                absent: vec![AlertId::PhHigh],
                exact_count: None,
            },
        },
        EvalCase {
            name: "heat_stress",
            input: reading(6.0, 30.0, 65.0, 25.0, 30.0, 150.0),
            expectation: Expectation::Alerts {
                present: vec![AlertId::TemperatureHigh],
                absent: vec![AlertId::TemperatureLow],
                exact_count: None,
            },
        },
        EvalCase {
            name: "nutrient_deficit",
            input: reading(6.0, 18.0, 65.0, 12.0, 10.0, 150.0),
            expectation: Expectation::Alerts {
                present: vec![AlertId::NitrogenLow, AlertId::PhosphorusLow],
                absent: vec![],
                exact_count: None,
            },
        },
        EvalCase {
            name: "optimal_conditions",
            input: reading(6.0, 18.0, 65.0, 25.0, 30.0, 150.0),
            expectation: Expectation::Alerts {
                present: vec![],
                absent: vec![],
                exact_count: Some(0),
            },
        },
        EvalCase {
            name: "ph_out_of_bounds",
            input: reading(15.0, 18.0, 40.0, 25.0, 30.0, 150.0),
            expectation: Expectation::RejectedField("pH"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_cases_have_unique_names() {
        let cases = builtin_cases();
        assert_eq!(cases.len(), 5);
        let mut names: Vec<&str> = cases.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cases.len());
    }

    #[test]
    fn test_builtin_inputs_carry_all_fields() {
        for case in builtin_cases() {
            for field in feature_contract::FIELD_ORDER {
                assert!(case.input.get(field).is_some(), "{}: {field}", case.name);
            }
        }
    }
}
