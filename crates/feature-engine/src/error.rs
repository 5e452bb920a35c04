//! Feature Extraction Error Types

use crate::wavelet::WaveletError;
use data_validator::ValidationError;
use thiserror::Error;

/// Errors during health indicator extraction and feature assembly
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Caller-supplied window or snapshot failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Extraction failed for one snapshot of the window
    #[error("Snapshot {index}: {source}")]
    Snapshot {
        index: usize,
        #[source]
        source: Box<FeatureError>,
    },

    /// Wavelet transform rejected its input
    #[error("Wavelet transform failed: {0}")]
    Wavelet(#[from] WaveletError),

    /// RMS reduction produced NaN or infinity
    #[error("Health indicator is not finite: {0}")]
    NonFiniteIndicator(f64),
}

impl FeatureError {
    /// Whether the error was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        match self {
            FeatureError::Validation(_) => true,
            FeatureError::Snapshot { source, .. } => source.is_invalid_input(),
            FeatureError::Wavelet(WaveletError::EmptySignal) => true,
            FeatureError::Wavelet(_) | FeatureError::NonFiniteIndicator(_) => false,
        }
    }
}
