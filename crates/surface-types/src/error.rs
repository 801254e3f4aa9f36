//! Error types for the topic surface pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for surface operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Misaligned or malformed topic-model outputs
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input that has no usable geometric extent
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// File read/write failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SurfaceError {
    /// Wrap an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SurfaceError::Io {
            path: path.into(),
            source,
        }
    }
}
