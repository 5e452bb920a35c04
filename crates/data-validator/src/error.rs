//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating caller-supplied signals.
///
/// Every variant is a caller input problem; none of them indicates an
/// internal fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Window does not contain exactly `window_size` snapshots
    #[error(
        "Input sequence length ({actual}) does not match the required window size ({expected})."
    )]
    WindowSizeMismatch { expected: usize, actual: usize },

    /// Snapshot has no samples
    #[error("Signal snapshot is empty")]
    EmptySnapshot,

    /// Snapshot shorter than the wavelet transform accepts
    #[error("Signal snapshot has {len} samples, at least {min} are required")]
    SnapshotTooShort { len: usize, min: usize },

    /// Snapshot longer than the service accepts
    #[error("Signal snapshot has {len} samples, at most {max} are allowed")]
    SnapshotTooLong { len: usize, max: usize },

    /// NaN or infinite sample
    #[error("Signal snapshot contains a non-finite sample at position {position}")]
    NonFiniteSample { position: usize },
}
