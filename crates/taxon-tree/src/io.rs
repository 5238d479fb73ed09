//! Reading and writing taxonomy JSON documents.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use taxon_common_fs::DEFAULT_MAX_FILE_SIZE;

use crate::error::{TaxonomyError, TaxonomyResult};

/// Read a JSON document. A missing file is reported as
/// [`TaxonomyError::MissingInput`] labelled `what`.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &'static str) -> TaxonomyResult<T> {
    let text = match taxon_common_fs::read_to_string(path, DEFAULT_MAX_FILE_SIZE) {
        Ok(text) => text,
        Err(e) if e.is_not_found() => {
            return Err(TaxonomyError::MissingInput {
                what,
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&text).map_err(|source| TaxonomyError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a document as two-space indented JSON with non-ASCII kept literally.
pub fn to_pretty_json<T: Serialize>(value: &T) -> TaxonomyResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Atomically write `value` as pretty JSON, creating parent directories.
/// Returns the number of bytes written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> TaxonomyResult<u64> {
    let text = to_pretty_json(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        taxon_common_fs::ensure_dir(parent)?;
    }
    taxon_common_fs::write_string_atomic(path, &text)?;
    Ok(text.len() as u64)
}
