//! Frame file discovery.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

const FRAME_EXTENSION: &str = ".json";

/// Per-frame `.json` files in `input_dir`, sorted by file name.
///
/// A missing directory yields an empty list; the caller decides whether that
/// is worth more than a warning.
pub fn frame_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        log::warn!("input directory {} does not exist", input_dir.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(input_dir)
        .map_err(|e| anyhow!("failed to list {}: {}", input_dir.display(), e))?;

    Ok(select_frame_files(
        input_dir,
        entries.map(|entry| entry.map(|entry| entry.path())),
    ))
}

/// Keeps frame files from a directory listing, sorted by name. Entries that
/// cannot be read are logged and skipped.
fn select_frame_files(
    input_dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if is_frame_file(&path) => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry in {}: {}", input_dir.display(), e),
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(FRAME_EXTENSION))
            .unwrap_or(false)
}
