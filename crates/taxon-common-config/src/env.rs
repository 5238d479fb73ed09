//! Environment variable handling.

use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    // API Keys
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

    // Configuration
    pub const TAXON_CONFIG: &str = "TAXON_CONFIG";
    pub const TAXON_API_BASE_URL: &str = "TAXON_API_BASE_URL";
    pub const TAXON_LOG_LEVEL: &str = "TAXON_LOG_LEVEL";

    // Development
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from `.env` files (later files override earlier).
    pub fn init() -> Result<Self, EnvError> {
        let _ = dotenvy::from_filename(".env");
        let _ = dotenvy::from_filename(".env.local");

        Ok(Self { _guard: () })
    }

    /// Get a required string variable.
    pub fn require(var: &str) -> Result<String, EnvError> {
        env::var(var).map_err(|_| EnvError::NotSet {
            var: var.to_string(),
        })
    }

    /// Get an optional, non-empty string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        Self::get(var).unwrap_or_else(|| default.to_string())
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match Self::get(var) {
            Some(v) => v.trim().parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: "expected integer".to_string(),
            }),
            None => Ok(None),
        }
    }
}

/// API key lookup.
pub struct ApiKeys;

impl ApiKeys {
    /// Get the Anthropic API key.
    pub fn anthropic() -> Option<String> {
        Environment::get(vars::ANTHROPIC_API_KEY)
    }

    /// Get the Anthropic API key or fail with the variable name.
    pub fn require_anthropic() -> Result<String, EnvError> {
        Self::anthropic().ok_or_else(|| EnvError::NotSet {
            var: vars::ANTHROPIC_API_KEY.to_string(),
        })
    }
}
