//! Berry Alert API Server
//!
//! REST serving boundary for the soil alert pipeline. The inference service
//! and taxonomy are built once at startup and shared read-only with every
//! handler; a model reload is a process restart, never an in-place swap.

pub mod config;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use alert_taxonomy::RecommendationTable;
use config::ServerConfig;
use inference_service::InferenceService;

/// Application state shared across handlers. Immutable after startup.
pub struct AppState {
    /// The serving object holding artifact and taxonomy
    pub service: InferenceService,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Wrap a ready inference service
    pub fn new(service: InferenceService) -> Self {
        Self {
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::info::root))
        .route("/health", get(routes::info::health))
        .route("/predict", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Build the inference service from configuration. Any artifact or taxonomy
/// problem is fatal here: the process must not serve with an invalid model.
pub fn build_service(config: &ServerConfig) -> anyhow::Result<InferenceService> {
    let recommendations = match &config.recommendations_path {
        Some(path) => RecommendationTable::from_json_file(Path::new(path))?,
        None => RecommendationTable::builtin(),
    };

    let service =
        InferenceService::from_artifact_path(Path::new(&config.artifact_path), recommendations)?;
    Ok(service)
}

/// Run the server until shutdown
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let state = Arc::new(AppState::new(service));
    let app = create_router(state);

    info!("Starting berry alert server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_taxonomy::{AlertId, ALERT_COUNT};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use feature_contract::FIELD_ORDER;
    use forest_classifier::{
        Hyperparameters, LabelMetrics, MultiLabelClassifier, TrainingSet,
    };
    use model_artifact::{ArtifactMetadata, ModelArtifact};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let mut rng = StdRng::seed_from_u64(33);
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..400 {
            let ph = rng.gen_range(4.0..9.0);
            let temp = rng.gen_range(5.0..35.0);
            let hum = rng.gen_range(30.0..95.0);
            let n_ppm = rng.gen_range(5.0..60.0);
            let p_ppm = rng.gen_range(5.0..65.0);
            let k_ppm = rng.gen_range(50.0..280.0);
            features.push(vec![ph, temp, hum, n_ppm, p_ppm, k_ppm]);
            labels.push([
                u8::from(ph < 5.2),
                u8::from(ph > 7.5),
                u8::from(hum < 50.0),
                u8::from(hum > 80.0),
                u8::from(temp < 12.0),
                u8::from(temp > 26.0),
                u8::from(n_ppm < 18.0),
                u8::from(n_ppm > 45.0),
                u8::from(p_ppm < 15.0),
                u8::from(p_ppm > 50.0),
                u8::from(k_ppm < 100.0),
                u8::from(k_ppm > 220.0),
            ]);
        }
        let set = TrainingSet::new(features, labels).unwrap();
        let hp = Hyperparameters {
            n_trees: 25,
            max_depth: 10,
            min_samples_split: 4,
            min_samples_leaf: 2,
            features_per_split: 2,
            seed: 42,
        };
        let classifier = MultiLabelClassifier::train(&set, &hp).unwrap();

        let per_label_metrics: BTreeMap<String, LabelMetrics> = AlertId::ALL
            .iter()
            .map(|a| {
                (
                    a.as_str().to_string(),
                    LabelMetrics {
                        precision: 1.0,
                        recall: 1.0,
                        f1: 1.0,
                    },
                )
            })
            .collect();
        let metadata = ArtifactMetadata {
            feature_order: FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
            alert_order: AlertId::ALL.iter().map(|a| a.as_str().to_string()).collect(),
            train_size: 320,
            test_size: 80,
            per_label_metrics,
            macro_f1: 1.0,
            hyperparameters: hp,
            trained_at: Utc::now(),
        };
        let artifact = ModelArtifact::new(classifier, metadata);
        let service =
            InferenceService::new(artifact, RecommendationTable::builtin()).unwrap();
        Arc::new(AppState::new(service))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["endpoints"]["/predict"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_model_summary() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"]["train_size"], 320);
    }

    #[tokio::test]
    async fn test_predict_detects_acidic_soil() {
        let app = create_router(test_state());
        let response = app
            .oneshot(json_request(
                "/predict",
                json!({
                    "pH": 4.4, "temperature_C": 19.0, "soil_humidity_pct": 65.0,
                    "N_ppm": 30.0, "P_ppm": 32.0, "K_ppm": 160.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        assert_eq!(body["todas_alertas"].as_object().unwrap().len(), ALERT_COUNT);
        assert_eq!(body["todas_alertas"]["ph_low"], 1);
        assert_eq!(
            body["total_alertas"],
            body["alertas_detectadas"].as_array().unwrap().len()
        );
        let detected: Vec<&str> = body["alertas_detectadas"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["tipo"].as_str().unwrap())
            .collect();
        assert!(detected.contains(&"ph_low"));
        assert_eq!(body["valores_input"]["pH"], 4.4);
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_ph() {
        let app = create_router(test_state());
        let response = app
            .oneshot(json_request(
                "/predict",
                json!({
                    "pH": 15.0, "temperature_C": 18.0, "soil_humidity_pct": 40.0,
                    "N_ppm": 25.0, "P_ppm": 30.0, "K_ppm": 150.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["field"], "pH");
        assert!(body["detail"].as_str().unwrap().contains("14"));
    }

    #[tokio::test]
    async fn test_predict_rejects_missing_field() {
        let app = create_router(test_state());
        let response = app
            .oneshot(json_request(
                "/predict",
                json!({
                    "pH": 6.0, "temperature_C": 18.0, "soil_humidity_pct": 40.0,
                    "N_ppm": 25.0, "P_ppm": 30.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "K_ppm");
    }

    #[tokio::test]
    async fn test_predict_is_deterministic_across_calls() {
        let state = test_state();
        let payload = json!({
            "pH": 5.0, "temperature_C": 28.0, "soil_humidity_pct": 45.0,
            "N_ppm": 16.0, "P_ppm": 30.0, "K_ppm": 160.0
        });

        let first = body_json(
            create_router(state.clone())
                .oneshot(json_request("/predict", payload.clone()))
                .await
                .unwrap(),
        )
        .await;
        for _ in 0..3 {
            let again = body_json(
                create_router(state.clone())
                    .oneshot(json_request("/predict", payload.clone()))
                    .await
                    .unwrap(),
            )
            .await;
            assert_eq!(first, again);
        }
    }
}
