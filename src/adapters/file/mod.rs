//! Filesystem file listing
//!
//! Used for manual runs outside a git repository, where there is no index to
//! ask for tracked files.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

/// List every regular file below `root`, relative to it
///
/// Hidden files and directories (dot-prefixed) are skipped.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn list_files(root: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() == root || !is_hidden(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        files.push(relative.to_string_lossy().replace('\\', "/"));
    }

    log::debug!("Found {} file(s) below {}", files.len(), root.display());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}
