//! Test utilities for Taxon crates.
//!
//! Fixtures are plain `serde_json::Value`s so that any crate in the
//! workspace can use them without a dependency cycle.

use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// A description of exactly `len` characters.
pub fn text_of_len(len: usize) -> String {
    "abcdefghij".chars().cycle().take(len).collect()
}

/// A leaf tool node.
pub fn leaf(name: &str, description: &str, links: &[(&str, &str)]) -> Value {
    let links: Map<String, Value> = links
        .iter()
        .map(|(label, url)| (label.to_string(), Value::String(url.to_string())))
        .collect();
    json!({
        "name": {"en": name},
        "description": description,
        "tags": [],
        "links": links,
    })
}

/// A category node with the given children.
pub fn category(name: &str, description: &str, children: Vec<Value>) -> Value {
    json!({
        "name": {"en": name},
        "description": description,
        "tags": [],
        "links": {},
        "children": children,
    })
}

/// Metadata shell used as the root of a consolidated tree.
pub fn shell(root_name: &str) -> Value {
    json!({
        "name": {"en": root_name},
        "description": "Root of the taxonomy",
        "tags": [],
        "links": {},
        "children": [],
    })
}

/// Project directory laid out like a real checkout: `taxonomy-data/` holds
/// the shell, the index and one file per category.
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub const DATA: &'static str = "taxonomy-data";
    pub const OUTPUT: &'static str = "public/Creative_Tech_Taxonomy_data.json";

    pub fn new() -> Self {
        let dir = temp_dir();
        std::fs::create_dir_all(dir.path().join(Self::DATA)).expect("Failed to create data dir");
        Self { dir }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.root().join(Self::DATA)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root().join(Self::OUTPUT)
    }

    pub fn write_shell(&self, value: &Value) -> &Self {
        self.write_fragment("_metadata.json", value)
    }

    /// Write `_index.json` from `(filename, name, order)` triples.
    pub fn write_index(&self, entries: &[(&str, &str, i64)]) -> &Self {
        let entries: Vec<Value> = entries
            .iter()
            .map(|(filename, name, order)| json!({"filename": filename, "name": name, "order": order}))
            .collect();
        self.write_fragment("_index.json", &Value::Array(entries))
    }

    pub fn write_fragment(&self, filename: &str, value: &Value) -> &Self {
        let text = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
        self.write_raw(filename, &text)
    }

    pub fn write_raw(&self, filename: &str, text: &str) -> &Self {
        std::fs::write(self.data_path().join(filename), text).expect("Failed to write fixture");
        self
    }

    pub fn read_json(&self, path: impl AsRef<Path>) -> Value {
        let path = self.root().join(path);
        let text = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
        serde_json::from_str(&text).expect("Fixture output is not JSON")
    }

    pub fn read_fragment(&self, filename: &str) -> Value {
        self.read_json(Path::new(Self::DATA).join(filename))
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.data_path().join(filename).exists()
    }

    /// A complete two-category project with one weak and one strong tool each.
    pub fn sample() -> Self {
        let data = Self::new();
        data.write_shell(&shell("Creative Tech Taxonomy"));
        data.write_index(&[
            ("game_engines.json", "Game Engines", 2),
            ("creative_code.json", "Creative Code Frameworks", 1),
        ]);
        data.write_fragment(
            "creative_code.json",
            &category(
                "Creative Code Frameworks",
                "Libraries for creative coding",
                vec![
                    leaf("p5.js", "ok", &[]),
                    leaf(
                        "openFrameworks",
                        &text_of_len(80),
                        &[("Site", "https://openframeworks.cc")],
                    ),
                ],
            ),
        );
        data.write_fragment(
            "game_engines.json",
            &category(
                "Game Engines",
                "Real-time engines",
                vec![
                    leaf("Godot", "", &[("Site", "")]),
                    leaf("Unity", &text_of_len(120), &[("Site", "https://unity.com")]),
                ],
            ),
        );
        data
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
