//! Feature Vector Assembly

use crate::error::FeatureError;
use crate::fft::FftConvolver;
use crate::health::HealthIndicatorExtractor;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health Indicators of a signal window, oldest snapshot first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// One Health Indicator per snapshot
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Number of features
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the raw values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Single-row matrix of shape `(1, len)` in model precision
    pub fn to_row(&self) -> Array2<f32> {
        Array2::from_shape_fn((1, self.values.len()), |(_, j)| self.values[j] as f32)
    }
}

/// Maps the Health-Indicator extractor over a fixed-size window
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    extractor: HealthIndicatorExtractor,
    window_size: usize,
}

impl FeatureAssembler {
    /// Create a new assembler
    pub fn new(extractor: HealthIndicatorExtractor, window_size: usize) -> Self {
        Self {
            extractor,
            window_size,
        }
    }

    /// Required number of snapshots per window
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Underlying extractor
    pub fn extractor(&self) -> &HealthIndicatorExtractor {
        &self.extractor
    }

    /// Compute the feature vector of a window, preserving snapshot order
    pub fn assemble<S: AsRef<[f64]>>(&self, window: &[S]) -> Result<FeatureVector, FeatureError> {
        self.extractor
            .validator()
            .validate_window_len(window.len(), self.window_size)?;

        // One planner per window; snapshots usually share a length
        let mut convolver = FftConvolver::new();

        let values = window
            .iter()
            .enumerate()
            .map(|(index, snapshot)| {
                self.extractor
                    .extract_with(snapshot.as_ref(), &mut convolver)
                    .map_err(|e| FeatureError::Snapshot {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<f64>, FeatureError>>()?;

        debug!("Assembled {} health indicators", values.len());

        Ok(FeatureVector { values })
    }
}
