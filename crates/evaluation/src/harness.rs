//! Case runner and metadata drift check

use crate::cases::{EvalCase, Expectation};
use alert_taxonomy::AlertId;
use inference_service::{InferError, InferenceService};
use model_artifact::ModelArtifact;
use trainer::{evaluate_split, reproduce_split, Dataset};
use tracing::{info, warn};

/// Outcome of one case
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Aggregated result of a harness run
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl EvalReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Drive the service with the given cases and collect outcomes
pub fn run_cases(service: &InferenceService, cases: &[EvalCase]) -> EvalReport {
    let outcomes = cases
        .iter()
        .map(|case| {
            let outcome = run_case(service, case);
            if outcome.passed {
                info!(case = case.name, "case passed");
            } else {
                warn!(case = case.name, detail = %outcome.detail, "case failed");
            }
            outcome
        })
        .collect();
    EvalReport { outcomes }
}

fn run_case(service: &InferenceService, case: &EvalCase) -> CaseOutcome {
    let result = service.infer_json(&case.input);
    let (passed, detail) = match (&case.expectation, result) {
        (
            Expectation::Alerts {
                present,
                absent,
                exact_count,
            },
            Ok(diagnosis),
        ) => {
            let fired: Vec<AlertId> = diagnosis.labels.positives().collect();
            let missing: Vec<AlertId> = present
                .iter()
                .filter(|&a| !fired.contains(a))
                .copied()
                .collect();
            let forbidden: Vec<AlertId> = absent
                .iter()
                .filter(|&a| fired.contains(a))
                .copied()
                .collect();
            let count_ok = exact_count.map_or(true, |n| diagnosis.alert_count == n);

            if missing.is_empty() && forbidden.is_empty() && count_ok {
                (true, format!("alerts: {fired:?}"))
            } else {
                (
                    false,
                    format!(
                        "fired {fired:?}; missing {missing:?}, forbidden {forbidden:?}, \
                         count {} (expected {exact_count:?})",
                        diagnosis.alert_count
                    ),
                )
            }
        }
        (Expectation::Alerts { .. }, Err(err)) => {
            (false, format!("expected a diagnosis, got error: {err}"))
        }
        (Expectation::RejectedField(field), Err(InferError::Validation(err))) => {
            if err.field() == *field {
                (true, err.to_string())
            } else {
                (
                    false,
                    format!("rejected wrong field {} ({err})", err.field()),
                )
            }
        }
        (Expectation::RejectedField(field), Err(err)) => (
            false,
            format!("expected validation failure on {field}, got: {err}"),
        ),
        (Expectation::RejectedField(field), Ok(_)) => (
            false,
            format!("expected validation failure on {field}, got a diagnosis"),
        ),
    };

    CaseOutcome {
        name: case.name,
        passed,
        detail,
    }
}

/// Per-label drift between recorded and recomputed metrics
#[derive(Debug, Clone)]
pub struct DriftEntry {
    pub alert: AlertId,
    pub recorded_f1: f64,
    pub recomputed_f1: f64,
    pub within_tolerance: bool,
}

/// Result of the artifact/metadata consistency check
#[derive(Debug, Clone)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.within_tolerance)
    }
}

/// Recompute the held-out metrics recorded in the artifact and flag any
/// label whose numbers drifted beyond `tolerance`. Guards against an
/// artifact whose metadata no longer matches its classifier after a retrain.
pub fn check_metadata_drift(
    artifact: &ModelArtifact,
    dataset: &Dataset,
    tolerance: f64,
) -> Result<DriftReport, trainer::TrainError> {
    let split = reproduce_split(dataset, &artifact.metadata);
    let recomputed = evaluate_split(&artifact.classifier, dataset, &split.test)?;

    let entries = AlertId::ALL
        .iter()
        .map(|&alert| {
            let recorded = artifact
                .metadata
                .per_label_metrics
                .get(alert.as_str())
                .copied();
            let again = recomputed.get(alert.as_str()).copied();
            match (recorded, again) {
                (Some(recorded), Some(again)) => DriftEntry {
                    alert,
                    recorded_f1: recorded.f1,
                    recomputed_f1: again.f1,
                    within_tolerance: recorded.within(&again, tolerance),
                },
                // Load-time validation makes both maps total; treat a gap
                // as drift rather than panicking
                _ => DriftEntry {
                    alert,
                    recorded_f1: f64::NAN,
                    recomputed_f1: f64::NAN,
                    within_tolerance: false,
                },
            }
        })
        .collect();

    Ok(DriftReport { entries })
}
