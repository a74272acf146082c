//! Writing a finished build to disk.
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── blog/first.html       # mirrors pages/blog/first.html
//! └── styles.css            # only when non-critical CSS exists
//!
//! .dinomlx/cache/
//! └── build-manifest.json   # record of the last build
//! ```

use crate::config::BuildConfig;
use crate::types::{BuildResult, NON_CRITICAL_CSS_FILENAME, PageBuildResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const MANIFEST_FILENAME: &str = "build-manifest.json";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON record of a build, written to the cache directory.
#[derive(Debug, Serialize)]
pub struct BuildManifest<'a> {
    pub pages: &'a [PageBuildResult],
    pub critical_candidates: &'a [String],
    /// Stylesheet path relative to the output directory, if one was written.
    pub stylesheet: Option<&'a str>,
    pub stylesheet_size: usize,
}

impl<'a> BuildManifest<'a> {
    pub fn new(result: &'a BuildResult) -> Self {
        let stylesheet =
            (!result.non_critical_css.is_empty()).then_some(NON_CRITICAL_CSS_FILENAME);
        Self {
            pages: &result.pages,
            critical_candidates: &result.critical_candidates,
            stylesheet,
            stylesheet_size: result.non_critical_css.len(),
        }
    }
}

/// Write every page, the stylesheet and the build manifest.
pub fn emit_build(result: &BuildResult, config: &BuildConfig) -> Result<(), EmitError> {
    fs::create_dir_all(&config.out_dir)?;

    for page in &result.pages {
        let out_path = output_path(&config.out_dir, &page.relative_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &page.html)?;
        debug!(page = %page.relative_path, "wrote page");
    }

    if !result.non_critical_css.is_empty() {
        fs::write(
            config.out_dir.join(NON_CRITICAL_CSS_FILENAME),
            &result.non_critical_css,
        )?;
    }

    write_manifest(result, &config.cache_dir)?;
    Ok(())
}

/// Output location for a `/`-separated page path.
pub fn output_path(out_dir: &Path, relative_path: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    path.extend(relative_path.split('/'));
    path
}

fn write_manifest(result: &BuildResult, cache_dir: &Path) -> Result<(), EmitError> {
    fs::create_dir_all(cache_dir)?;
    let json = serde_json::to_string_pretty(&BuildManifest::new(result))?;
    fs::write(cache_dir.join(MANIFEST_FILENAME), json)?;
    Ok(())
}
