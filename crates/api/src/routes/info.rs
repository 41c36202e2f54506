//! Root info and health routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::AppState;

/// Root info payload listing the available operations
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub service: &'static str,
    pub version: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health payload with a summary of the served artifact
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelSummary,
}

/// Served artifact summary
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub trained_at: String,
    pub train_size: usize,
    pub test_size: usize,
    pub macro_f1: f64,
}

/// Service info
pub async fn root(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let endpoints = BTreeMap::from([
        ("/", "GET - service info"),
        ("/health", "GET - liveness and artifact summary"),
        ("/predict", "POST - diagnose a sensor reading"),
    ]);

    Json(InfoResponse {
        service: "Berry Crop Alert Detection API",
        version: state.version.clone(),
        endpoints,
    })
}

/// Liveness and artifact summary
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let metadata = state.service.metadata();
    Json(HealthResponse {
        status: "healthy",
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelSummary {
            trained_at: metadata.trained_at.to_rfc3339(),
            train_size: metadata.train_size,
            test_size: metadata.test_size,
            macro_f1: metadata.macro_f1,
        },
    })
}
