//! Morlet Continuous Wavelet Transform
//!
//! Single-scale CWT using the real Morlet mother wavelet
//! `psi(t) = exp(-t^2 / 2) * cos(5t)` on the support `[-8, 8]`.
//!
//! The wavelet is integrated once, resampled at the requested scale and
//! convolved with the signal; differentiating the convolution yields the
//! coefficients. This is the same discretisation PyWavelets uses, so
//! scales tuned offline carry over unchanged.

use crate::fft::{convolve_direct, FftConvolver};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lower bound of the Morlet support
const LOWER_BOUND: f64 = -8.0;
/// Upper bound of the Morlet support
const UPPER_BOUND: f64 = 8.0;
/// Wavelet sampled at 2^PRECISION points
const PRECISION: u32 = 10;

/// Errors raised by the wavelet transform
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveletError {
    #[error("Wavelet scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("Selected scale of {0} too small")]
    ScaleTooSmall(f64),
    #[error("Cannot transform an empty signal")]
    EmptySignal,
}

/// How the signal is convolved with the scaled wavelet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMethod {
    /// Time-domain sum, exact for short snapshots
    #[default]
    Direct,
    /// Frequency-domain product via rustfft
    Fft,
}

/// Morlet CWT evaluated at a single scale
#[derive(Debug, Clone)]
pub struct MorletCwt {
    scale: f64,
    method: ConvolutionMethod,
    /// Integrated wavelet resampled at `scale`, reversed for convolution
    kernel: Vec<f64>,
}

impl MorletCwt {
    /// Create a transform for the given scale
    pub fn new(scale: f64, method: ConvolutionMethod) -> Result<Self, WaveletError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WaveletError::InvalidScale(scale));
        }

        let kernel = Self::scaled_kernel(scale);
        // The derivative of the convolution would be shorter than the signal
        if kernel.len() < 2 {
            return Err(WaveletError::ScaleTooSmall(scale));
        }

        debug!(
            "Morlet CWT ready: scale={}, kernel_len={}, method={:?}",
            scale,
            kernel.len(),
            method
        );

        Ok(Self {
            scale,
            method,
            kernel,
        })
    }

    /// Wavelet scale
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Convolution method
    pub fn method(&self) -> ConvolutionMethod {
        self.method
    }

    /// Number of taps in the scaled kernel
    pub fn kernel_len(&self) -> usize {
        self.kernel.len()
    }

    /// Morlet mother wavelet
    fn psi(t: f64) -> f64 {
        (-t * t / 2.0).exp() * (5.0 * t).cos()
    }

    /// Integrate the mother wavelet and resample it at `scale`
    fn scaled_kernel(scale: f64) -> Vec<f64> {
        let n = 1usize << PRECISION;
        let spacing = (UPPER_BOUND - LOWER_BOUND) / (n - 1) as f64;

        let mut grid: Vec<f64> = (0..n).map(|i| LOWER_BOUND + i as f64 * spacing).collect();
        grid[n - 1] = UPPER_BOUND;

        let step = grid[1] - grid[0];
        let mut running = 0.0;
        let integrated: Vec<f64> = grid
            .iter()
            .map(|&t| {
                running += Self::psi(t);
                running * step
            })
            .collect();

        let extent = grid[n - 1] - grid[0];
        let taps = (scale * extent + 1.0).ceil() as usize;

        let mut kernel: Vec<f64> = (0..taps)
            .map(|k| (k as f64 / (scale * step)) as usize)
            .take_while(|&j| j < integrated.len())
            .map(|j| integrated[j])
            .collect();
        kernel.reverse();
        kernel
    }

    /// Real CWT coefficients of `signal`, same length as the input
    pub fn transform(&self, signal: &[f64]) -> Result<Vec<f64>, WaveletError> {
        match self.method {
            ConvolutionMethod::Direct => self.coefficients(signal, convolve_direct),
            ConvolutionMethod::Fft => self.transform_with(signal, &mut FftConvolver::new()),
        }
    }

    /// Like [`transform`](Self::transform), reusing `convolver`'s FFT plans
    /// when the method is [`ConvolutionMethod::Fft`]
    pub fn transform_with(
        &self,
        signal: &[f64],
        convolver: &mut FftConvolver,
    ) -> Result<Vec<f64>, WaveletError> {
        match self.method {
            ConvolutionMethod::Direct => self.coefficients(signal, convolve_direct),
            ConvolutionMethod::Fft => self.coefficients(signal, |s, k| convolver.convolve(s, k)),
        }
    }

    fn coefficients<F>(&self, signal: &[f64], mut convolve: F) -> Result<Vec<f64>, WaveletError>
    where
        F: FnMut(&[f64], &[f64]) -> Vec<f64>,
    {
        if signal.is_empty() {
            return Err(WaveletError::EmptySignal);
        }

        let conv = convolve(signal, &self.kernel);

        let gain = -self.scale.sqrt();
        let coef: Vec<f64> = conv.windows(2).map(|w| gain * (w[1] - w[0])).collect();

        // coef has len(signal) + len(kernel) - 2 samples; keep the centred part
        let excess = coef.len() - signal.len();
        let front = excess / 2;
        let back = excess - front;

        Ok(coef[front..coef.len() - back].to_vec())
    }
}
