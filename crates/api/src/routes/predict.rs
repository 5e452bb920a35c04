//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Body of `POST /predict`
#[derive(Debug, Deserialize, Serialize)]
pub struct PredictionRequest {
    /// Raw signal snapshots, oldest first; one inner list per time step
    pub signals: Vec<Vec<f64>>,
}

/// Successful prediction
#[derive(Debug, Deserialize, Serialize)]
pub struct PredictionResponse {
    /// Remaining Useful Life in cycles
    pub predicted_rul: f64,
    pub status: String,
}

/// Predict RUL for a window of raw vibration snapshots
pub async fn predict_rul(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();
    let result = run_prediction(&state, payload).await;

    let status = if result.is_ok() { "success" } else { "error" };
    metrics::counter!("rul_predictions_total", "status" => status).increment(1);
    metrics::histogram!("rul_prediction_latency_seconds").record(start.elapsed().as_secs_f64());

    result
}

async fn run_prediction(
    state: &AppState,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload?;
    let snapshots = request.signals.len();

    // Feature extraction is CPU-bound; keep it off the async workers
    let predictor = Arc::clone(&state.predictor);
    let prediction =
        tokio::task::spawn_blocking(move || predictor.predict_rul_detailed(&request.signals))
            .await
            .map_err(|e| ApiError::Internal(format!("prediction task failed: {}", e)))??;

    info!(
        snapshots,
        latency_us = prediction.latency_us,
        "Predicted RUL {:.3}",
        prediction.rul
    );

    Ok(Json(PredictionResponse {
        predicted_rul: prediction.rul,
        status: "success".to_string(),
    }))
}
