//! Health Indicator Extraction

use crate::error::FeatureError;
use crate::fft::FftConvolver;
use crate::wavelet::{ConvolutionMethod, MorletCwt, WaveletError};
use data_validator::{ValidationConfig, Validator};

/// Root-mean-square over the population (divides by `len`).
///
/// Returns 0.0 for an empty slice.
pub fn root_mean_square(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Reduces one raw vibration snapshot to a scalar Health Indicator:
/// the RMS of the snapshot filtered by a Morlet CWT at the tuned scale.
#[derive(Debug, Clone)]
pub struct HealthIndicatorExtractor {
    cwt: MorletCwt,
    validator: Validator,
}

impl HealthIndicatorExtractor {
    /// Create an extractor for wavelet scale `alpha`
    pub fn new(alpha: f64) -> Result<Self, WaveletError> {
        Self::with_options(alpha, ConvolutionMethod::default(), ValidationConfig::default())
    }

    /// Create an extractor with explicit convolution method and snapshot limits
    pub fn with_options(
        alpha: f64,
        method: ConvolutionMethod,
        validation: ValidationConfig,
    ) -> Result<Self, WaveletError> {
        Ok(Self {
            cwt: MorletCwt::new(alpha, method)?,
            validator: Validator::new(validation),
        })
    }

    /// Wavelet scale in use
    pub fn alpha(&self) -> f64 {
        self.cwt.scale()
    }

    /// Snapshot validator in use
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Compute the Health Indicator of one snapshot
    pub fn extract(&self, snapshot: &[f64]) -> Result<f64, FeatureError> {
        self.validator.validate_snapshot(snapshot)?;
        Self::reduce(&self.cwt.transform(snapshot)?)
    }

    /// Compute the Health Indicator, reusing `convolver`'s FFT plans
    pub fn extract_with(
        &self,
        snapshot: &[f64],
        convolver: &mut FftConvolver,
    ) -> Result<f64, FeatureError> {
        self.validator.validate_snapshot(snapshot)?;
        Self::reduce(&self.cwt.transform_with(snapshot, convolver)?)
    }

    fn reduce(filtered: &[f64]) -> Result<f64, FeatureError> {
        let hi = root_mean_square(filtered);

        if !hi.is_finite() {
            return Err(FeatureError::NonFiniteIndicator(hi));
        }
        Ok(hi)
    }
}
