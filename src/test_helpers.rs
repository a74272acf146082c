//! Shared test utilities for the dinomlx test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, config) = setup_fixtures();
//! let result = compile_site(&config, &SiteConfig::default()).unwrap();
//!
//! let index = find_page(&result, "index.html");
//! assert!(index.html.contains("<style>"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::BuildConfig;
use crate::types::{BuildResult, PageBuildResult};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/basic-site/` to a temp directory and return it with a
/// [`BuildConfig`] pointing at the copy.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> (TempDir, BuildConfig) {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/basic-site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    let config = build_config(tmp.path());
    (tmp, config)
}

/// A [`BuildConfig`] with the default layout under `root`.
pub fn build_config(root: &Path) -> BuildConfig {
    BuildConfig {
        src_root: root.join("src"),
        out_dir: root.join("dist"),
        cache_dir: root.join(".dinomlx/cache"),
        base_path: String::new(),
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a page by relative path. Panics with the available paths if missing.
pub fn find_page<'a>(result: &'a BuildResult, relative_path: &str) -> &'a PageBuildResult {
    result
        .pages
        .iter()
        .find(|p| p.relative_path == relative_path)
        .unwrap_or_else(|| {
            let available: Vec<&str> =
                result.pages.iter().map(|p| p.relative_path.as_str()).collect();
            panic!("page '{relative_path}' not found, available: {available:?}")
        })
}
