//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("checkpoint repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("checkpoint label `{0}` must be non-empty ASCII alphanumerics, '-' or '_'")]
    InvalidLabel(String),

    #[error("checkpoint digest mismatch: expected {expected}, found {actual}")]
    DigestMismatch { expected: String, actual: String },
}

impl From<game_core::state::SnapshotError> for RepositoryError {
    fn from(err: game_core::state::SnapshotError) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
