//! Signal Window Validation
//!
//! Provides length and range checking for raw vibration snapshots before
//! they reach the wavelet transform.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, Validator};
