//! Error types for taxonomy operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

/// Error types for taxonomy operations.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// A required input file does not exist.
    #[error("missing {what}: {}", .path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// A file exists but does not parse as the expected JSON document.
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON with the wrong shape.
    #[error("unexpected document shape in {}: {message}", .path.display())]
    InvalidShape { path: PathBuf, message: String },

    /// Nodes without an English name.
    #[error("{} node(s) without an English name: {}", .paths.len(), .paths.join(", "))]
    UnnamedNodes { paths: Vec<String> },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("batch not found: {0}")]
    BatchNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] taxon_common_core::Error),
}

impl TaxonomyError {
    /// True when a required input file is absent.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, TaxonomyError::MissingInput { .. })
    }
}
