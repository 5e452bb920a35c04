//! RUL Predictor Implementation

use crate::config::PrognosticsConfig;
use crate::xgboost::GradientBoostedModel;
use crate::InferenceError;
use data_validator::ValidationConfig;
use feature_engine::{ConvolutionMethod, FeatureAssembler, FeatureVector, HealthIndicatorExtractor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Tunables that are not part of the trained artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorOptions {
    /// Convolution method for the wavelet transform
    pub convolution: ConvolutionMethod,
    /// Snapshot length limits
    pub validation: ValidationConfig,
}

/// Result of a single prediction
#[derive(Debug, Clone)]
pub struct RulPrediction {
    /// Remaining Useful Life in cycles
    pub rul: f64,
    /// Health Indicators fed to the model
    pub features: FeatureVector,
    /// Feature extraction plus inference latency in microseconds
    pub latency_us: u64,
}

/// Predicts Remaining Useful Life from raw vibration windows.
///
/// A value of this type only exists once the model and configuration have
/// loaded successfully; it is immutable afterwards and can be shared
/// across threads behind an `Arc`.
#[derive(Debug)]
pub struct RulPredictor {
    model: GradientBoostedModel,
    config: PrognosticsConfig,
    assembler: FeatureAssembler,
    model_path: Option<PathBuf>,
}

impl RulPredictor {
    /// Load the model artifact and bind it to `config`
    pub fn load(
        model_path: impl AsRef<Path>,
        config: PrognosticsConfig,
    ) -> Result<Self, InferenceError> {
        Self::load_with_options(model_path, config, PredictorOptions::default())
    }

    /// Load with explicit options
    pub fn load_with_options(
        model_path: impl AsRef<Path>,
        config: PrognosticsConfig,
        options: PredictorOptions,
    ) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let model = GradientBoostedModel::from_path(model_path)?;
        let mut predictor = Self::from_parts(model, config, options)?;
        predictor.model_path = Some(model_path.to_path_buf());

        info!("RUL predictor initialized successfully");
        info!("  - Model loaded from: {}", model_path.display());
        info!(
            "  - Wavelet params: beta={}, alpha={}",
            predictor.config.optimal_beta, predictor.config.optimal_alpha
        );
        info!("  - Prediction window size: {}", predictor.config.window_size);

        Ok(predictor)
    }

    /// Build a predictor from an already-parsed model
    pub fn from_parts(
        model: GradientBoostedModel,
        config: PrognosticsConfig,
        options: PredictorOptions,
    ) -> Result<Self, InferenceError> {
        config.validate()?;

        if model.num_feature() != config.window_size {
            return Err(InferenceError::InvalidConfig(format!(
                "model expects {} features but window_size is {}",
                model.num_feature(),
                config.window_size
            )));
        }

        let extractor = HealthIndicatorExtractor::with_options(
            config.optimal_alpha,
            options.convolution,
            options.validation,
        )
        .map_err(|e| InferenceError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            assembler: FeatureAssembler::new(extractor, config.window_size),
            model,
            config,
            model_path: None,
        })
    }

    /// Predict RUL (in cycles) for a window of raw snapshots, oldest first
    pub fn predict_rul<S: AsRef<[f64]>>(&self, signals: &[S]) -> Result<f64, InferenceError> {
        self.predict_rul_detailed(signals).map(|p| p.rul)
    }

    /// Predict RUL and return the intermediate features and latency
    pub fn predict_rul_detailed<S: AsRef<[f64]>>(
        &self,
        signals: &[S],
    ) -> Result<RulPrediction, InferenceError> {
        let start = Instant::now();

        let features = self.assembler.assemble(signals)?;
        let row = features.to_row();

        let output = self.model.predict(row.view())?;
        let rul = match output.as_slice() {
            [value] => f64::from(*value),
            other => {
                return Err(InferenceError::InferenceFailed(format!(
                    "expected one output, got {}",
                    other.len()
                )))
            }
        };

        if !rul.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "model produced a non-finite value: {}",
                rul
            )));
        }

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Predicted RUL {:.3} in {}us", rul, latency_us);

        Ok(RulPrediction {
            rul,
            features,
            latency_us,
        })
    }

    /// Loaded configuration
    pub fn config(&self) -> &PrognosticsConfig {
        &self.config
    }

    /// Loaded model
    pub fn model(&self) -> &GradientBoostedModel {
        &self.model
    }

    /// Required number of snapshots per request
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    /// Model path, when loaded from disk
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }
}
