//! Evaluation Harness
//!
//! Offline driver that feeds canned readings through a real inference
//! service and asserts the expected alert sets, plus a consistency check
//! that the artifact's recorded held-out metrics are still reproducible
//! from the dataset.

pub mod cases;
pub mod harness;

pub use cases::{builtin_cases, EvalCase, Expectation};
pub use harness::{
    check_metadata_drift, run_cases, CaseOutcome, DriftEntry, DriftReport, EvalReport,
};
