// src/scan/mod.rs
// =============================================================================
// Discovery stage: find every markdown file under the target directory.
//
// Rules:
// - Recurse into subdirectories with `walkdir`
// - Keep files with the `.md` extension
// - Skip any path with a component starting with '.' (hidden convention)
// - Sort results by file name so two runs over the same tree report in the
//   same order
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum ScanError {
    /// The target directory is missing or not a directory. Fatal: the run
    /// aborts before any scanning.
    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Find all markdown files under `root`, recursively, skipping hidden paths.
pub fn find_markdown_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        // depth 0 is the root itself; a root named "." must not count as hidden
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_markdown_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
