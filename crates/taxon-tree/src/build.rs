//! Merging category fragments into the consolidated taxonomy document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::io;

/// One entry of the category index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndexEntry {
    pub filename: String,
    pub name: String,
    pub order: i64,
}

/// Where the builder reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildInputs {
    pub metadata_path: PathBuf,
    pub index_path: PathBuf,
    pub data_dir: PathBuf,
    pub output_path: PathBuf,
}

impl BuildInputs {
    /// Shell and index live inside the fragment directory.
    pub fn in_data_dir(
        data_dir: impl Into<PathBuf>,
        metadata_file: &str,
        index_file: &str,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            metadata_path: data_dir.join(metadata_file),
            index_path: data_dir.join(index_file),
            data_dir,
            output_path: output_path.into(),
        }
    }
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Names of the categories merged, in output order.
    pub loaded: Vec<String>,
    /// Fragment files named by the index that do not exist.
    pub missing: Vec<PathBuf>,
    pub output: PathBuf,
    pub bytes: u64,
}

/// Read the category index, sorted by `order` with ties in file order.
pub fn load_index(path: &Path) -> TaxonomyResult<Vec<CategoryIndexEntry>> {
    let mut entries: Vec<CategoryIndexEntry> = io::read_json(path, "category index")?;
    entries.sort_by_key(|entry| entry.order);
    Ok(entries)
}

fn load_shell(path: &Path) -> TaxonomyResult<Map<String, Value>> {
    match io::read_json::<Value>(path, "metadata shell")? {
        Value::Object(map) => Ok(map),
        _ => Err(TaxonomyError::InvalidShape {
            path: path.to_path_buf(),
            message: "metadata shell must be a JSON object".into(),
        }),
    }
}

/// Merge the fragments named by `entries` into `shell`.
///
/// Missing fragments are skipped and returned; any other read failure aborts.
pub fn merge(
    mut shell: Map<String, Value>,
    entries: &[CategoryIndexEntry],
    data_dir: &Path,
) -> TaxonomyResult<(Value, Vec<String>, Vec<PathBuf>)> {
    let mut children = Vec::with_capacity(entries.len());
    let mut loaded = Vec::new();
    let mut missing = Vec::new();

    for entry in entries {
        let path = data_dir.join(&entry.filename);
        match io::read_json::<Value>(&path, "category fragment") {
            Ok(fragment) => {
                debug!(category = %entry.name, "Loaded fragment");
                children.push(fragment);
                loaded.push(entry.name.clone());
            }
            Err(TaxonomyError::MissingInput { .. }) => {
                warn!(path = %path.display(), "Missing category fragment, skipping");
                missing.push(path);
            }
            Err(e) => return Err(e),
        }
    }

    shell.insert("children".to_string(), Value::Array(children));
    Ok((Value::Object(shell), loaded, missing))
}

/// Build the consolidated document and write it atomically.
///
/// The output embeds no timestamps, so unchanged inputs give identical bytes.
pub fn build(inputs: &BuildInputs) -> TaxonomyResult<BuildReport> {
    let shell = load_shell(&inputs.metadata_path)?;
    let entries = load_index(&inputs.index_path)?;

    let (document, loaded, missing) = merge(shell, &entries, &inputs.data_dir)?;
    let bytes = io::write_json(&inputs.output_path, &document)?;

    info!(
        categories = loaded.len(),
        missing = missing.len(),
        bytes,
        output = %inputs.output_path.display(),
        "Built taxonomy"
    );

    Ok(BuildReport {
        loaded,
        missing,
        output: inputs.output_path.clone(),
        bytes,
    })
}
