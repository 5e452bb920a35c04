//! Window and Snapshot Validator

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum number of samples in a snapshot
    pub min_snapshot_len: usize,
    /// Maximum number of samples in a snapshot
    pub max_snapshot_len: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_snapshot_len: 2,
            max_snapshot_len: 1 << 20,
        }
    }
}

/// Validator for signal windows
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate the number of snapshots in a window
    pub fn validate_window_len(
        &self,
        actual: usize,
        expected: usize,
    ) -> Result<(), ValidationError> {
        if actual != expected {
            debug!("Rejecting window: expected {} snapshots, got {}", expected, actual);
            return Err(ValidationError::WindowSizeMismatch { expected, actual });
        }
        Ok(())
    }

    /// Validate a single raw snapshot
    pub fn validate_snapshot(&self, snapshot: &[f64]) -> Result<(), ValidationError> {
        let len = snapshot.len();
        if len == 0 {
            return Err(ValidationError::EmptySnapshot);
        }
        if len < self.config.min_snapshot_len {
            return Err(ValidationError::SnapshotTooShort {
                len,
                min: self.config.min_snapshot_len,
            });
        }
        if len > self.config.max_snapshot_len {
            return Err(ValidationError::SnapshotTooLong {
                len,
                max: self.config.max_snapshot_len,
            });
        }
        if let Some(position) = snapshot.iter().position(|v| !v.is_finite()) {
            return Err(ValidationError::NonFiniteSample { position });
        }
        Ok(())
    }
}
