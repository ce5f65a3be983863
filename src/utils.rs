// ABOUTME: Utility functions for the deckmark application
// ABOUTME: Provides path validation and page naming helpers

use crate::errors::{DeckError, Result};
use std::path::{Path, PathBuf};

/// Fail unless `path` names an existing regular file, e.g. a markdown source.
pub fn validate_file_exists(path: &Path) -> Result<()> {
    require(path, path.is_file(), "a markdown file")
}

/// Fail unless `path` names an existing directory of markdown sources.
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    require(path, path.is_dir(), "a source directory")
}

fn require(path: &Path, is_expected_kind: bool, expected: &str) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !is_expected_kind {
        return Err(DeckError::ValidationError(format!(
            "{:?} is not {}",
            path, expected
        )));
    }
    Ok(())
}

/// Create the output directory for generated pages unless it is already there.
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(DeckError::ValidationError(format!(
            "Output location {:?} is a file, pages need a directory",
            path
        )));
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Create the directory a page will be written into
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

/// Canonical form of a watched path, so event paths compare against it
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        DeckError::ValidationError(format!("Cannot resolve {:?}: {}", path, e))
    })
}

/// File name of a markdown path, as the agenda refers to it
pub fn path_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Last path component of a `/`-separated reference, e.g. `02-tools.md` for `./02-tools.md`
pub fn file_name(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

/// File name without its `.md` extension
pub fn file_stem(reference: &str) -> &str {
    let name = file_name(reference);
    name.strip_suffix(".md").unwrap_or(name)
}

/// Name of the page generated for a markdown file
pub fn html_file_name(reference: &str) -> String {
    format!("{}.html", file_stem(reference))
}
