use walkdir::WalkDir;
use std::path::{Path, PathBuf};
use crate::error::{MusictreeError, Result};

/// Category given to dumps stored directly in the dump root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A discovered export dump and the category it was exported under
#[derive(Debug, Clone)]
pub struct DumpFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub category: String,
}

/// Discover every export dump below `root`.
///
/// Only `.xml` files are returned, sorted by path. The order matters: it is
/// the batch order used when an artist exported under several categories is
/// resolved to a single one.
pub fn discover_dumps(root: &Path) -> Result<Vec<DumpFile>> {
    if !root.is_dir() {
        return Err(MusictreeError::Config(format!(
            "dump directory does not exist: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if extension != "xml" {
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .map_err(|_| MusictreeError::Config(
                format!("Failed to compute relative path for: {}", path.display())
            ))?
            .to_string_lossy()
            .to_string();

        files.push(DumpFile {
            category: extract_category(&relative_path),
            relative_path,
            absolute_path: path.to_path_buf(),
        });
    }

    log::info!("Discovered {} dump files in {}", files.len(), root.display());
    Ok(files)
}

/// Category label of a dump, taken verbatim from its first path segment.
///
/// `singers/20th_century.xml` → `singers`; a dump at the root → `uncategorized`.
/// Handles both forward slashes and backslashes.
pub fn extract_category(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");

    let segments: Vec<&str> = normalized
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [first, _, ..] if !first.trim().is_empty() => first.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}
