//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use taxon_test_utils::DataDir;

/// Variables that would leak the developer's setup into a test run.
const SCRUBBED_VARS: &[&str] = &[
    "TAXON_CONFIG",
    "TAXON_API_BASE_URL",
    "TAXON_LOG_LEVEL",
    "TAXON_LOG_FORMAT",
    "TAXON_LOG_FILE",
    "RUST_LOG",
    "ANTHROPIC_API_KEY",
];

/// Test context around a temporary project directory
pub struct TestContext {
    pub data: DataDir,
}

impl TestContext {
    /// An empty project: no shell, no index, no fragments.
    pub fn empty() -> Self {
        Self {
            data: DataDir::new(),
        }
    }

    /// The two-category sample project.
    pub fn sample() -> Self {
        Self {
            data: DataDir::sample(),
        }
    }

    pub fn path(&self) -> &Path {
        self.data.root()
    }

    /// Create a command running in the project directory
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("taxon").expect("Binary not found");
        cmd.current_dir(self.path());
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Run `taxon build` and require success.
    pub fn built(self) -> Self {
        self.command().arg("build").assert().success();
        self
    }

    pub fn write_config(&self, yaml: &str) {
        let dir = self.path().join(".taxon");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.yaml"), yaml).expect("Failed to write config");
    }

    /// Parse a JSON file relative to the project root.
    pub fn read_json(&self, path: &str) -> Value {
        self.data.read_json(path)
    }

    pub fn project_file_exists(&self, path: &str) -> bool {
        self.path().join(path).exists()
    }
}
