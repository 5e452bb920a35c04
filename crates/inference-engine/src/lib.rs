//! RUL Inference Engine
//!
//! Loads the prognostics configuration and a pre-trained XGBoost model once,
//! then predicts Remaining Useful Life from raw vibration windows.

mod config;
mod engine;
mod xgboost;

pub use config::PrognosticsConfig;
pub use engine::{PredictorOptions, RulPrediction, RulPredictor};
pub use xgboost::{GradientBoostedModel, Objective};

pub use data_validator::ValidationConfig;
pub use feature_engine::{ConvolutionMethod, FeatureVector};

use feature_engine::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during configuration, model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Model file not found at: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}

/// Coarse classification used at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Startup-fatal: model or configuration missing or malformed
    Configuration,
    /// Caller supplied a bad window; recoverable
    InvalidInput,
    /// Anything else; recoverable but opaque to the caller
    Internal,
}

impl InferenceError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::ConfigNotFound(_)
            | InferenceError::ModelNotFound(_)
            | InferenceError::InvalidConfig(_)
            | InferenceError::ModelLoadError(_) => ErrorKind::Configuration,
            InferenceError::Features(e) if e.is_invalid_input() => ErrorKind::InvalidInput,
            InferenceError::Features(_)
            | InferenceError::InferenceFailed(_)
            | InferenceError::InvalidInputShape { .. } => ErrorKind::Internal,
        }
    }
}
