//! Feature Engineering Engine
//!
//! Turns raw vibration snapshots into Health Indicators via a Morlet
//! continuous wavelet transform, and stacks them into the feature vector
//! consumed by the RUL model.

mod error;
mod features;
mod fft;
mod health;
mod wavelet;

pub use error::FeatureError;
pub use features::{FeatureAssembler, FeatureVector};
pub use fft::FftConvolver;
pub use health::{root_mean_square, HealthIndicatorExtractor};
pub use wavelet::{ConvolutionMethod, MorletCwt, WaveletError};
