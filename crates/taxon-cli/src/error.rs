//! CLI error handling.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use taxon_common_config::{ConfigError, EnvError};
use taxon_common_log::LogError;
use taxon_enhance::{EnhanceError, GeneratorError};
use taxon_tree::TaxonomyError;

/// CLI error type with enough context to pick an exit code and a hint.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    /// A required input file does not exist.
    #[error("{message}")]
    MissingInput { message: String, path: PathBuf },

    #[error("{message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// The text-generation service could not be reached or answered badly.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::MissingInput { .. } => "E002",
            Self::Io { .. } => "E003",
            Self::Network { .. } => "E004",
            Self::Validation { .. } => "E005",
            Self::NotFound { .. } => "E006",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        let code = match self {
            Self::Config { .. } => 2,
            Self::MissingInput { .. } | Self::Io { .. } => 3,
            Self::Network { .. } => 4,
            Self::Validation { .. } => 5,
            Self::NotFound { .. } => 6,
            Self::Other(_) => 1,
        };
        ExitCode::from(code)
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            Self::MissingInput { .. } => Some("Check --data-dir or the paths section of .taxon/config.yaml"),
            Self::NotFound { .. } => Some("Run `taxon plan` to list the available batch ids"),
            _ => None,
        }
    }

    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: Some(hint.into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {err}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check your .taxon/config.yaml".to_string()),
        }
    }
}

impl From<EnvError> for CliError {
    fn from(err: EnvError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
            hint: Some("Set ANTHROPIC_API_KEY in the environment or in a .env file".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: format!("Logging setup failed: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check TAXON_LOG_FILE and TAXON_LOG_LEVEL".to_string()),
        }
    }
}

impl From<TaxonomyError> for CliError {
    fn from(err: TaxonomyError) -> Self {
        match err {
            TaxonomyError::MissingInput { what, path } => Self::MissingInput {
                message: format!("Missing {what}: {}", path.display()),
                path,
            },
            TaxonomyError::BatchNotFound(id) => Self::not_found("Batch", id),
            TaxonomyError::Fs(e) => Self::Io {
                message: e.to_string(),
                path: None,
            },
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<GeneratorError> for CliError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::MissingApiKey(var) => Self::config_with_hint(
                format!("No API key configured ({var} is empty)"),
                format!("Set {var} in the environment or in a .env file"),
            ),
            other => Self::Network {
                message: format!("Text generation failed: {other}"),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<EnhanceError> for CliError {
    fn from(err: EnhanceError) -> Self {
        match err {
            EnhanceError::Generator(e) => e.into(),
            EnhanceError::Taxonomy(e) => e.into(),
            malformed @ EnhanceError::MalformedReply { .. } => Self::validation(malformed.to_string()),
        }
    }
}
