//! Common filesystem utilities
//!
//! Path helpers shared by the zip archiver and unarchiver.

use std::io;
use std::path::{Component, Path};

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Check if path is safe (no path traversal).
///
/// Rejects absolute paths and paths containing "..".
pub fn is_safe_path(path: &Path) -> bool {
    !path.is_absolute() && !path.components().any(|c| c == Component::ParentDir)
}

/// Render a relative path as a zip entry name (`/`-separated, no leading `./`).
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(seg) => Some(seg.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Every ancestor directory of a zip entry name, outermost first, each with
/// its trailing `/`.
///
/// `"a/b/c.js"` yields `["a/", "a/b/"]`.
pub fn parent_entries(name: &str) -> Vec<String> {
    let trimmed = name.trim_end_matches('/');
    let mut parents = Vec::new();
    for (idx, ch) in trimmed.char_indices() {
        if ch == '/' {
            parents.push(format!("{}/", &trimmed[..idx]));
        }
    }
    parents
}
