//! Error types for vaultnav.

use serde::Serialize;
use thiserror::Error;

/// Top-level result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Operation-level errors. Any of these aborts the single operation that
/// raised it; per-entry problems are carried as [`ReadError`] data instead.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("REJECTED: path '{path}' resolves outside {scope}")]
    PathEscape { path: String, scope: String },

    #[error("invalid path '{path}': {reason}")]
    PathSyntax { path: String, reason: String },

    #[error("days_back must be between 1 and 365, got {days_back}")]
    InvalidRange { days_back: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// True for the two security-relevant path rejections.
    #[must_use]
    pub fn is_path_rejection(&self) -> bool {
        matches!(self, Self::PathEscape { .. } | Self::PathSyntax { .. })
    }
}

/// Why a single file could not be loaded.
///
/// Recorded inline on the entry it concerns so that one bad file never
/// prevents the rest of a batch from being returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadError {
    #[error("not found")]
    NotFound,

    #[error("not a regular file")]
    NotRegularFile,

    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid UTF-8: {0}")]
    InvalidEncoding(String),

    /// Any other filesystem failure on this one path (e.g. a symlink loop).
    #[error("io error: {0}")]
    Io(String),
}

impl ReadError {
    /// Classify an I/O failure on a single path.
    #[must_use]
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err.to_string()),
        }
    }
}
