//! Configuration file loading and parsing.

use crate::types::TaxonConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory (under the project root) holding the config file.
pub const CONFIG_DIR: &str = ".taxon";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Project directory this loader resolves against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Default config location for this project.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.taxon/config.yaml`, or defaults when absent.
    pub fn load(&self) -> Result<TaxonConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(TaxonConfig::default());
        }

        self.load_file(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<TaxonConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let expanded = self.expand_env_vars(&contents)?;

        // An empty or comment-only file means "all defaults".
        if expanded.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Ok(TaxonConfig::default());
        }

        let config: TaxonConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
            ConfigError::ParseError {
                line: None,
                message: e.to_string(),
            }
        })?;

        for cap in re.captures_iter(content) {
            let full_match = &cap[0];
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(full_match, &value);
        }

        Ok(result)
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &TaxonConfig) -> Result<(), ConfigError> {
        if config.enhance.batch_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "enhance.batch_size must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&config.service.temperature) {
            return Err(ConfigError::ValidationError {
                message: "service.temperature must be between 0.0 and 1.0".to_string(),
            });
        }

        if config.service.max_tokens == 0 {
            return Err(ConfigError::ValidationError {
                message: "service.max_tokens must be greater than 0".to_string(),
            });
        }

        if config.taxonomy.root_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "taxonomy.root_name must not be empty".to_string(),
            });
        }

        if config.paths.index_file.trim().is_empty() || config.paths.metadata_file.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "paths.index_file and paths.metadata_file must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to `.taxon/config.yaml`.
    pub fn save(&self, config: &TaxonConfig) -> Result<(), ConfigError> {
        let config_dir = self.base_path.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)?;

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}
