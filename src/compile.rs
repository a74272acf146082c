//! Template compilation: recursive component expansion.
//!
//! Every component element in a document is replaced by the contents of its
//! template, and the template is itself expanded before insertion. Markup
//! outside component elements is copied through unchanged, and the children
//! of a component element are discarded.
//!
//! Cycle detection follows the chain of ancestors on the current expansion
//! path only. The same component may appear any number of times as siblings
//! or in separate branches; only a component that appears inside its own
//! expansion is an error.

use crate::markup::find_components;
use crate::resolve::{ResolveError, resolve_template_path_with_override};
use crate::types::TEMPLATE_SOURCE_ATTR;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(
        "Circular component reference detected: {component} (chain: {} -> {component})",
        .chain.join(" -> ")
    )]
    CircularReference {
        component: String,
        /// Ancestors from the outermost down, not including the repeat.
        chain: Vec<String>,
    },
    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Expand all component elements in `html` against `templates_dir`.
pub fn compile_template(html: &str, templates_dir: &Path) -> Result<String, CompileError> {
    expand(html, templates_dir, &[])
}

fn expand(html: &str, templates_dir: &Path, ancestors: &[String]) -> Result<String, CompileError> {
    let elements = find_components(html);
    if elements.is_empty() {
        return Ok(html.to_string());
    }

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    for element in elements {
        let name = &element.component.component_name;
        if ancestors.contains(name) {
            return Err(CompileError::CircularReference {
                component: name.clone(),
                chain: ancestors.to_vec(),
            });
        }

        let template_source = element
            .component
            .attributes
            .get(TEMPLATE_SOURCE_ATTR)
            .map(String::as_str);
        let path = resolve_template_path_with_override(name, templates_dir, template_source)?;
        let template = fs::read_to_string(&path).map_err(|source| CompileError::Read {
            path: path.clone(),
            source,
        })?;

        let mut chain = ancestors.to_vec();
        chain.push(name.clone());
        let expanded = expand(&template, templates_dir, &chain)?;

        out.push_str(&html[cursor..element.span.start]);
        out.push_str(&expanded);
        cursor = element.span.end;
    }

    out.push_str(&html[cursor..]);
    Ok(out)
}
