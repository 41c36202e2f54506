//! Prediction route

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;

use crate::AppState;
use feature_contract::FeatureVector;
use inference_service::{Diagnosis, InferError};

/// One detected alert in the response
#[derive(Debug, Serialize)]
pub struct DetectedAlert {
    pub tipo: String,
    pub recomendacion: String,
}

/// Response of the predict endpoint. Field names are a stable external
/// contract; downstream consumers key on them.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub alertas_detectadas: Vec<DetectedAlert>,
    pub total_alertas: usize,
    pub todas_alertas: BTreeMap<&'static str, u8>,
    pub valores_input: FeatureVector,
}

/// Structured error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub detail: String,
}

/// Diagnose one sensor reading
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.infer_json(&payload) {
        Ok(diagnosis) => Ok(Json(to_response(diagnosis))),
        Err(InferError::Validation(err)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "validation_error",
                field: Some(err.field()),
                detail: err.to_string(),
            }),
        )),
        // Internal faults surface generically; the detail stays server-side
        Err(err) => {
            error!(error = %err, "inference failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal_error",
                    field: None,
                    detail: "prediction failed".to_string(),
                }),
            ))
        }
    }
}

fn to_response(diagnosis: Diagnosis) -> PredictResponse {
    let alertas_detectadas = diagnosis
        .positive_alerts
        .iter()
        .map(|p| DetectedAlert {
            tipo: p.alert.as_str().to_string(),
            recomendacion: p.recommendation.clone(),
        })
        .collect();

    let todas_alertas = diagnosis
        .labels
        .iter()
        .map(|(alert, value)| (alert.as_str(), value))
        .collect();

    PredictResponse {
        alertas_detectadas,
        total_alertas: diagnosis.alert_count,
        todas_alertas,
        valores_input: diagnosis.input,
    }
}
