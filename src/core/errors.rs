//! DMN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, MaintError>;

/// Error type a cleanup hook is allowed to return.
pub type CleanerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome type of a cleanup hook.
pub type CleanResult = std::result::Result<(), CleanerError>;

/// Top-level error type for the disk maintainer.
#[derive(Debug, Error)]
pub enum MaintError {
    #[error("[DMN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DMN-1002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[DMN-2001] disk usage probe failed for {path}: {details}")]
    Probe { path: PathBuf, details: String },

    #[error("[DMN-3001] cleanup hook failed: {source}")]
    Clean {
        #[source]
        source: CleanerError,
    },
}

impl MaintError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DMN-1001",
            Self::Io { .. } => "DMN-1002",
            Self::Probe { .. } => "DMN-2001",
            Self::Clean { .. } => "DMN-3001",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Probe and cleanup failures are transient from the loop's point of
    /// view: the next tick retries the whole cycle.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Probe { .. } | Self::Clean { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
