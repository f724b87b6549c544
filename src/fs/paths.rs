//! Path and directory management.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::fs::naming::TEMP_SUFFIX;
use crate::error::Result;

/// Get the folder a title is downloaded into.
pub fn title_dir(base_dir: &Path, title_name: &str) -> PathBuf {
    base_dir.join(title_name)
}

/// Path a download or archive is written to before being renamed into place.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Whether a path is an in-flight temp file.
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(TEMP_SUFFIX))
        .unwrap_or(false)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Remove the temp files directly inside `dir`, returning how many were removed.
///
/// A missing directory has nothing to clean.
pub async fn remove_temp_files(dir: &Path) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_temp_file(&path) && entry.file_type().await?.is_file() {
            tokio::fs::remove_file(&path).await?;
            removed += 1;
        }
    }
    Ok(removed)
}
