//! Error types for the release history.

use thiserror::Error;

/// Result type alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur during history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The operation requires at least one recorded release. A search
    /// coming up empty is not this error — queries return `Option`.
    #[error("no existing release")]
    NoRelease,

    #[error("failed to encode release history: {0}")]
    Encode(serde_yaml::Error),

    #[error("failed to decode release history: {0}")]
    Decode(serde_yaml::Error),
}
