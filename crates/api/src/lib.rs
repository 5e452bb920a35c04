//! Bearing RUL Prediction API Server
//!
//! REST front door for the RUL predictor: accepts windows of raw vibration
//! snapshots and returns the predicted Remaining Useful Life.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{PrognosticsConfig, RulPredictor};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod settings;

pub use error::{ApiError, ServerError};
pub use routes::predict::{PredictionRequest, PredictionResponse};
pub use settings::{LogFormat, LogSettings, ServiceSettings};

/// Welcome text served at `/`
pub const WELCOME_MESSAGE: &str =
    "Welcome to the Bearing RUL Prediction API. Please POST to /predict to get a prediction.";

/// Application state shared across handlers.
///
/// Built once at startup and never mutated, so handlers share it without locks.
pub struct AppState {
    /// Loaded model and configuration
    pub predictor: Arc<RulPredictor>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus exporter, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(predictor: RulPredictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
            max_body_bytes: settings::ServerSettings::default().max_body_bytes,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Override the request body limit
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Welcome response
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub window_size: usize,
    pub model: ModelSummary,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub objective: String,
    pub num_trees: usize,
    pub num_feature: usize,
    pub path: Option<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/", get(root_handler))
        .route("/predict", post(routes::predict::predict_rul))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint confirming the API is running
async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let predictor = &state.predictor;
    let model = predictor.model();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        window_size: predictor.window_size(),
        model: ModelSummary {
            objective: model.objective_name().to_string(),
            num_trees: model.num_trees(),
            num_feature: model.num_feature(),
            path: predictor.model_path().map(|p| p.display().to_string()),
        },
    })
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LogSettings) -> Result<(), ServerError> {
    let level: Level = settings
        .level
        .parse()
        .map_err(|_| ServerError::Logging(format!("invalid log level '{}'", settings.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = match settings.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };

    result.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Load the predictor and run the server until Ctrl-C
pub async fn run_server(settings: ServiceSettings) -> Result<(), ServerError> {
    let config = PrognosticsConfig::from_path(&settings.model.config_path)?;
    let predictor =
        RulPredictor::load_with_options(&settings.model.model_path, config, settings.predictor)?;

    let mut state = AppState::new(predictor).with_max_body_bytes(settings.server.max_body_bytes);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let mut app = create_router(Arc::new(state));
    if settings.rate_limit.enabled {
        let config = rate_limit::create_governor_config(&settings.rate_limit)?;
        app = app.layer(GovernorLayer { config });
    }

    info!("Starting API server on {}", settings.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
