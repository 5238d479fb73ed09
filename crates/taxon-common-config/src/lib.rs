//! Configuration types for Taxon.
//!
//! This crate provides the configuration used by the `taxon` tooling,
//! read from `.taxon/config.yaml` files.

pub mod env;
pub mod loader;
pub mod types;


pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = TaxonConfig::default();

        assert_eq!(config.paths.data_dir, std::path::PathBuf::from("taxonomy-data"));
        assert_eq!(config.paths.metadata_file, "_metadata.json");
        assert_eq!(config.paths.index_file, "_index.json");
        assert_eq!(
            config.paths.output_file,
            std::path::PathBuf::from("public/Creative_Tech_Taxonomy_data.json")
        );

        assert_eq!(config.taxonomy.root_name, "Creative Tech Taxonomy");

        assert_eq!(config.enhance.batch_size, 10);
        assert_eq!(config.enhance.max_batches, 5);
        assert_eq!(config.enhance.delay_secs, 2);
        assert_eq!(config.enhance.low_quality_threshold, 30);
        assert_eq!(config.enhance.priority_categories.len(), 5);
        assert_eq!(config.enhance.priority_categories[0], "Creative Code Frameworks");

        assert_eq!(config.service.model, "claude-3-haiku-20240307");
        assert_eq!(config.service.max_tokens, 2000);
        assert_eq!(config.service.temperature, 0.3);
        assert_eq!(config.service.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let config = TaxonConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("paths:"));
        assert!(yaml.contains("taxonomy:"));
        assert!(yaml.contains("enhance:"));
        assert!(yaml.contains("service:"));
        assert!(yaml.contains("batch_size: 10"));
        assert!(yaml.contains("root_name: Creative Tech Taxonomy"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
enhance:
  batch_size: 4
service:
  model: claude-3-5-sonnet-latest
"#;

        let config: TaxonConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert_eq!(config.enhance.batch_size, 4);
        assert_eq!(config.service.model, "claude-3-5-sonnet-latest");

        assert_eq!(config.enhance.delay_secs, 2);
        assert_eq!(config.service.max_tokens, 2000);
        assert_eq!(config.paths.index_file, "_index.json");
    }

    #[test]
    fn test_resolved_paths() {
        let config = TaxonConfig::default();
        let root = std::path::Path::new("/project");

        assert_eq!(
            config.paths.metadata_path(root),
            std::path::PathBuf::from("/project/taxonomy-data/_metadata.json")
        );
        assert_eq!(
            config.paths.index_path(root),
            std::path::PathBuf::from("/project/taxonomy-data/_index.json")
        );
        assert_eq!(
            config.paths.output_path(root),
            std::path::PathBuf::from("/project/public/Creative_Tech_Taxonomy_data.json")
        );
    }
}
