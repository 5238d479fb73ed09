//! Error types for Taxon.

use std::fmt;
use thiserror::Error;

/// Stable numeric codes attached to filesystem errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    pub const FILE_NOT_FOUND: Self = Self(100);
    pub const FILE_READ_ERROR: Self = Self(101);
    pub const FILE_WRITE_ERROR: Self = Self(102);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:03}", self.0)
    }
}

/// The main error type for Taxon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure with the offending path.
    #[error("{message}")]
    FileSystem {
        code: ErrorCode,
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a file-not-found error for `path`.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::FileSystem {
            code: ErrorCode::FILE_NOT_FOUND,
            message: format!("file not found: {path}"),
            path: Some(path),
            source: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FileSystem { code, .. } => *code,
        }
    }

    /// Path the error refers to, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileSystem { path, .. } => path.as_deref(),
        }
    }

    /// True when the error reports a missing file.
    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::FILE_NOT_FOUND
    }
}

/// Result type alias using Taxon's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found() {
        let err = Error::file_not_found("taxonomy-data/_index.json");
        assert!(err.is_not_found());
        assert_eq!(err.code(), ErrorCode::FILE_NOT_FOUND);
        assert_eq!(err.path(), Some("taxonomy-data/_index.json"));
        assert!(err.to_string().contains("_index.json"));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FILE_NOT_FOUND.to_string(), "E100");
        assert_eq!(ErrorCode::FILE_WRITE_ERROR.to_string(), "E102");
    }
}
