//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonConfig {
    /// File layout of the taxonomy project.
    pub paths: PathsConfig,
    /// Taxonomy-wide settings.
    pub taxonomy: TaxonomyConfig,
    /// Batch planning and enhancement settings.
    pub enhance: EnhanceConfig,
    /// Text-generation service settings.
    pub service: ServiceConfig,
}

/// File layout, relative to the project directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding fragment files, the index and the metadata shell.
    pub data_dir: PathBuf,
    /// Metadata shell file name inside `data_dir`.
    pub metadata_file: String,
    /// Category index file name inside `data_dir`.
    pub index_file: String,
    /// Consolidated tree output.
    pub output_file: PathBuf,
    /// Low-quality export written by `analyze`.
    pub low_quality_file: PathBuf,
    /// Batch work file written by `plan`.
    pub sample_batch_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("taxonomy-data"),
            metadata_file: "_metadata.json".to_string(),
            index_file: "_index.json".to_string(),
            output_file: PathBuf::from("public/Creative_Tech_Taxonomy_data.json"),
            low_quality_file: PathBuf::from("low_quality_nodes.json"),
            sample_batch_file: PathBuf::from("sample_batch_for_api.json"),
        }
    }
}

impl PathsConfig {
    /// Fragment directory resolved against `root`.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    /// Metadata shell path resolved against `root`.
    pub fn metadata_path(&self, root: &Path) -> PathBuf {
        self.data_path(root).join(&self.metadata_file)
    }

    /// Category index path resolved against `root`.
    pub fn index_path(&self, root: &Path) -> PathBuf {
        self.data_path(root).join(&self.index_file)
    }

    /// Consolidated output path resolved against `root`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_file)
    }

    /// Low-quality export path resolved against `root`.
    pub fn low_quality_path(&self, root: &Path) -> PathBuf {
        root.join(&self.low_quality_file)
    }

    /// Batch work file path resolved against `root`.
    pub fn sample_batch_path(&self, root: &Path) -> PathBuf {
        root.join(&self.sample_batch_file)
    }
}

/// Taxonomy-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// English name of the consolidated root, stripped when matching paths.
    pub root_name: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            root_name: "Creative Tech Taxonomy".to_string(),
        }
    }
}

/// Batch planning and enhancement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Maximum nodes per batch.
    pub batch_size: usize,
    /// Batches processed by one `batch` run.
    pub max_batches: usize,
    /// Pause between service calls (seconds).
    pub delay_secs: u64,
    /// Score below which nodes are exported as low quality.
    pub low_quality_threshold: u32,
    /// Categories processed first, in this order.
    pub priority_categories: Vec<String>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_batches: 5,
            delay_secs: 2,
            low_quality_threshold: 30,
            priority_categories: vec![
                "Creative Code Frameworks".to_string(),
                "Game Engines".to_string(),
                "AI/Machine Learning".to_string(),
                "Physical Computing".to_string(),
                "Web Technologies".to_string(),
            ],
        }
    }
}

/// Text-generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API base URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Reply token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// System prompt sent with every request.
    pub system_prompt: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 2000,
            temperature: 0.3,
            system_prompt: "You are an expert in creative technology tools and frameworks. \
                            Provide accurate, concise information about technical tools."
                .to_string(),
            timeout_secs: 60,
        }
    }
}
