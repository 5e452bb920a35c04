//! Prognostics Configuration

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Tuned parameters the model was trained with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrognosticsConfig {
    /// Morlet wavelet scale used for Health Indicator extraction
    pub optimal_alpha: f64,
    /// Carried for compatibility with the training output; does not affect predictions
    pub optimal_beta: f64,
    /// Number of snapshots per prediction window
    pub window_size: usize,
}

impl PrognosticsConfig {
    /// Load and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => InferenceError::ConfigNotFound(path.to_path_buf()),
            _ => InferenceError::InvalidConfig(format!("{}: {}", path.display(), e)),
        })?;

        let config = Self::from_json_str(&text)?;
        info!(
            "Loaded configuration from {}: alpha={}, beta={}, window_size={}",
            path.display(),
            config.optimal_alpha,
            config.optimal_beta,
            config.window_size
        );
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json_str(text: &str) -> Result<Self, InferenceError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| InferenceError::InvalidConfig(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), InferenceError> {
        if !self.optimal_alpha.is_finite() || self.optimal_alpha <= 0.0 {
            return Err(InferenceError::InvalidConfig(format!(
                "optimal_alpha must be positive, got {}",
                self.optimal_alpha
            )));
        }
        if !self.optimal_beta.is_finite() || self.optimal_beta <= 0.0 {
            return Err(InferenceError::InvalidConfig(format!(
                "optimal_beta must be positive, got {}",
                self.optimal_beta
            )));
        }
        if self.window_size == 0 {
            return Err(InferenceError::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
