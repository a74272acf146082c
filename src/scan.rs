//! Page discovery.
//!
//! Walks the pages directory and returns every `*.html` file as a
//! [`PageEntry`]. Nested directories are mirrored into the output, so
//! `pages/blog/first.html` is built to `dist/blog/first.html`.
//!
//! ```text
//! src/pages/
//! ├── index.html          → index.html
//! ├── about.html          → about.html
//! ├── notes.txt           (skipped)
//! └── blog/
//!     └── first.html      → blog/first.html
//! ```
//!
//! Entries are sorted by relative path using plain byte-wise string order,
//! so the build order is the same on every machine.

use crate::types::{MARKUP_EXTENSION, PageEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Pages directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to walk pages directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Enumerate all page files under `pages_dir`.
pub fn scan_pages(pages_dir: &Path) -> Result<Vec<PageEntry>, ScanError> {
    if !pages_dir.is_dir() {
        return Err(ScanError::NotFound(pages_dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(pages_dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markup(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(pages_dir) else {
            continue;
        };
        entries.push(PageEntry {
            relative_path: to_slash_path(relative),
            absolute_path: entry.path().to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(entries)
}

fn is_markup(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == MARKUP_EXTENSION)
}

/// Join path components with `/` regardless of platform.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
