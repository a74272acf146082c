//! Component name to template path resolution.
//!
//! Dash-separated name segments become directories, the last segment becomes
//! the file name:
//!
//! | Component name  | Template                      |
//! |-----------------|-------------------------------|
//! | `navbar`        | `templates/navbar.html`       |
//! | `atoms-button`  | `templates/atoms/button.html` |
//! | `ui-cards-hero` | `templates/ui/cards/hero.html`|
//!
//! A `_c_template-source` attribute on the element overrides the convention
//! with a path relative to the templates directory.

use crate::types::MARKUP_EXTENSION;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Template not found for component \"{component}\": expected at {}", .path.display())]
    TemplateNotFound { component: String, path: PathBuf },
    #[error(
        "Template source override not found: {} (from _c_template-source=\"{value}\")",
        .path.display()
    )]
    OverrideNotFound { value: String, path: PathBuf },
}

/// Convention path for `component_name`. Does not touch the filesystem.
pub fn resolve_template_path(component_name: &str, templates_dir: &Path) -> PathBuf {
    let mut path = templates_dir.to_path_buf();
    let file = match component_name.rsplit_once('-') {
        Some((dirs, file)) => {
            path.extend(dirs.split('-'));
            file
        }
        None => component_name,
    };
    path.push(format!("{file}.{MARKUP_EXTENSION}"));
    path
}

/// Resolve the template for a component, honoring an override, and check
/// that the file exists. An empty override counts as absent.
pub fn resolve_template_path_with_override(
    component_name: &str,
    templates_dir: &Path,
    template_source: Option<&str>,
) -> Result<PathBuf, ResolveError> {
    match template_source.filter(|s| !s.is_empty()) {
        Some(value) => {
            let path = templates_dir.join(value);
            if !path.exists() {
                return Err(ResolveError::OverrideNotFound {
                    value: value.to_string(),
                    path,
                });
            }
            Ok(path)
        }
        None => {
            let path = resolve_template_path(component_name, templates_dir);
            if !path.exists() {
                return Err(ResolveError::TemplateNotFound {
                    component: component_name.to_string(),
                    path,
                });
            }
            Ok(path)
        }
    }
}
