//! File system utilities for Taxon.
//!
//! Every helper maps `std::io` failures onto [`taxon_common_core::Error::FileSystem`]
//! with the offending path attached, so callers can tell a missing input
//! apart from a failed write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use taxon_common_core::{Error, ErrorCode, Result};

/// Default read limit for taxonomy documents (64 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 64 * 1024 * 1024;

fn fs_error(code: ErrorCode, message: String, path: &Path, source: Option<io::Error>) -> Error {
    Error::FileSystem {
        code,
        message,
        path: Some(path.to_string_lossy().to_string()),
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

fn read_error(path: &Path, e: io::Error, what: &str) -> Error {
    match e.kind() {
        io::ErrorKind::NotFound => fs_error(
            ErrorCode::FILE_NOT_FOUND,
            format!("file not found: {}", path.display()),
            path,
            Some(e),
        ),
        io::ErrorKind::PermissionDenied => fs_error(
            ErrorCode::FILE_READ_ERROR,
            format!("permission denied: {}", path.display()),
            path,
            Some(e),
        ),
        _ => fs_error(
            ErrorCode::FILE_READ_ERROR,
            format!("failed to {what}: {}", path.display()),
            path,
            Some(e),
        ),
    }
}

/// Read a file to string with size limit.
pub fn read_to_string(path: impl AsRef<Path>, max_size: usize) -> Result<String> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|e| read_error(path, e, "read metadata"))?;

    if metadata.len() as usize > max_size {
        return Err(fs_error(
            ErrorCode::FILE_READ_ERROR,
            format!("file too large: {} bytes (max: {})", metadata.len(), max_size),
            path,
            None,
        ));
    }

    fs::read_to_string(path).map_err(|e| read_error(path, e, "read file"))
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    if let Some(name) = path.file_name() {
        temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy()));
    } else {
        temp_path.push(".tmp");
    }

    {
        let mut file = File::create(&temp_path).map_err(|e| {
            fs_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to create temporary file: {}", temp_path.display()),
                &temp_path,
                Some(e),
            )
        })?;

        file.write_all(contents).map_err(|e| {
            fs_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to write to temporary file: {}", temp_path.display()),
                &temp_path,
                Some(e),
            )
        })?;

        file.sync_all().map_err(|e| {
            fs_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to sync temporary file: {}", temp_path.display()),
                &temp_path,
                Some(e),
            )
        })?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        fs_error(
            ErrorCode::FILE_WRITE_ERROR,
            format!("failed to rename temporary file to target: {}", path.display()),
            path,
            Some(e),
        )
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            fs_error(
                ErrorCode::FILE_WRITE_ERROR,
                format!("failed to create directory: {}", path.display()),
                path,
                Some(e),
            )
        })?;
    }
    Ok(())
}

/// Copy a file with optional overwrite.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>, overwrite: bool) -> Result<u64> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if !overwrite && dst.exists() {
        return Err(fs_error(
            ErrorCode::FILE_WRITE_ERROR,
            format!("destination already exists: {}", dst.display()),
            dst,
            None,
        ));
    }

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    fs::copy(src, dst).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound if !src.exists() => read_error(src, e, "copy"),
        _ => fs_error(
            ErrorCode::FILE_WRITE_ERROR,
            format!("failed to copy {} to {}", src.display(), dst.display()),
            dst,
            Some(e),
        ),
    })
}

/// Delete a file if it exists.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(fs_error(
            ErrorCode::FILE_WRITE_ERROR,
            format!("failed to remove file: {}", path.display()),
            path,
            Some(e),
        )),
    }
}

/// List files in a directory, sorted by file name.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    let read_dir = fs::read_dir(dir).map_err(|e| read_error(dir, e, "read directory"))?;

    for entry in read_dir {
        let entry = entry.map_err(|e| read_error(dir, e, "read directory entry"))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// List files in a directory with the given (case-insensitive) extension.
pub fn list_files_with_extension(dir: impl AsRef<Path>, ext: &str) -> Result<Vec<PathBuf>> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(|p| extension(p).as_deref() == Some(&ext.to_lowercase()))
        .collect())
}

/// Get the file extension as a lowercase string.
pub fn extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
}

/// Modification time and size of a file, used to rank saved versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileStamp {
    /// Last modification time.
    pub modified: SystemTime,
    /// Size in bytes.
    pub len: u64,
}

/// Read the [`FileStamp`] of a file.
pub fn file_stamp(path: impl AsRef<Path>) -> Result<FileStamp> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| read_error(path, e, "read metadata"))?;
    let modified = metadata
        .modified()
        .map_err(|e| read_error(path, e, "read modification time"))?;
    Ok(FileStamp {
        modified,
        len: metadata.len(),
    })
}
