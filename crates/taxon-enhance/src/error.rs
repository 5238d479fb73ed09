//! Error types for enhancement.

use thiserror::Error;

use taxon_common_http::{HttpError, ResponseError};
use taxon_tree::TaxonomyError;

/// Result type for enhancement operations.
pub type EnhanceResult<T> = Result<T, EnhanceError>;

/// Failures talking to the text-generation service.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("unreadable service response: {0}")]
    InvalidResponse(#[from] ResponseError),

    #[error("service reply contained no text")]
    EmptyReply,
}

/// Failures processing one batch.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("service call failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("malformed reply: {reason}")]
    MalformedReply { reason: String, excerpt: String },

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

impl EnhanceError {
    pub(crate) fn malformed(reason: impl Into<String>, reply: &str) -> Self {
        EnhanceError::MalformedReply {
            reason: reason.into(),
            excerpt: reply.chars().take(200).collect(),
        }
    }
}

impl From<taxon_common_core::Error> for EnhanceError {
    fn from(e: taxon_common_core::Error) -> Self {
        EnhanceError::Taxonomy(TaxonomyError::Fs(e))
    }
}
