//! Flight Delay Prediction API
//!
//! REST service exposing the fitted delay classifier behind a batch predict
//! endpoint.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod bootstrap;
mod routes;
mod settings;

pub use settings::{Settings, TrainingSettings};

use delay_classifier::DelayClassifier;
use feature_builder::FEATURE_DIMENSION;

/// Application state shared across handlers
///
/// The model is fitted before the server starts and never mutated afterwards,
/// so handlers share it read-only without locking.
pub struct AppState {
    /// Fitted delay classifier
    pub model: DelayClassifier,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state around a fitted model
    pub fn new(model: DelayClassifier) -> Self {
        Self {
            model,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Service metadata returned at the root
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

/// Endpoint listing for the root response
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: String,
    pub predict: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelStatus,
}

/// Model section of the health response
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub fitted: bool,
    pub feature_dimension: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(routes::predict::post_predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root handler
async fn root_handler(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Flight Delay Prediction API".to_string(),
        version: state.version.clone(),
        endpoints: Endpoints {
            health: "/health".to_string(),
            predict: "/predict".to_string(),
        },
    })
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelStatus {
            fitted: state.model.is_fitted(),
            feature_dimension: FEATURE_DIMENSION,
        },
    })
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

/// Run the server until shutdown
pub async fn run_server(settings: &Settings, model: DelayClassifier) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(model));
    let app = create_router(state);

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
