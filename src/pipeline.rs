//! Build orchestration.
//!
//! ```text
//! scan pages ─┬─ build registry ── parse above-the-fold ─┐
//!             │                                          │
//!             └──────────── per page, in parallel ◄──────┘
//!                  compile → scan usage → collect → split
//!                  → generate critical + non-critical → inject
//!                                │
//!                     aggregate site stylesheet
//!                                │
//!                              emit
//! ```
//!
//! The registry and the critical set are built once and shared read-only by
//! all page workers. Page results come back in scanner order. The first page
//! error aborts the build before anything is written.
//!
//! The site-wide stylesheet is built from the candidate usage recorded for
//! each page, so templates are expanded exactly once per page. Identical
//! chunks within a layer are emitted once.

use crate::collect::collect_css;
use crate::compile::{CompileError, compile_template};
use crate::config::{BuildConfig, ConfigError, CssConfig, SiteConfig};
use crate::critical::{parse_above_the_fold, split_critical_css};
use crate::css::{CssError, generate_css};
use crate::emit::{EmitError, emit_build};
use crate::placeholder::replace_placeholders;
use crate::registry::build_candidate_registry;
use crate::scan::{ScanError, scan_pages};
use crate::types::{BuildResult, CandidateRegistry, LayerChunks, PageBuildResult, PageEntry};
use crate::usage::scan_candidates;
use indexmap::IndexSet;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{Level, debug, info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Above-the-fold probe failed: {0}")]
    Probe(#[source] CompileError),
    #[error("Failed to read page {}: {source}", .path.display())]
    ReadPage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to compile {page}: {source}")]
    Compile { page: String, source: CompileError },
    #[error("Failed to generate CSS for {page}: {source}")]
    PageCss { page: String, source: CssError },
    #[error("Failed to generate site stylesheet: {0}")]
    Stylesheet(#[source] CssError),
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}

/// Build-wide read-only state shared by page workers.
struct PageContext<'a> {
    templates_dir: PathBuf,
    registry: &'a CandidateRegistry,
    critical_candidates: &'a IndexSet<String>,
    base_path: &'a str,
    css: &'a CssConfig,
}

/// Compute the whole build in memory. Nothing is written.
pub fn compile_site(config: &BuildConfig, settings: &SiteConfig) -> Result<BuildResult, BuildError> {
    let registry = build_candidate_registry(&settings.candidates_dir(&config.src_root));
    compile_site_with_registry(config, settings, &registry)
}

/// [`compile_site`] against a registry the caller already built, for callers
/// that also report on the registry itself.
pub fn compile_site_with_registry(
    config: &BuildConfig,
    settings: &SiteConfig,
    registry: &CandidateRegistry,
) -> Result<BuildResult, BuildError> {
    let src_root = &config.src_root;
    let pages_dir = settings.pages_dir(src_root);
    let pages = scan_pages(&pages_dir)?;
    if pages.is_empty() {
        warn!(dir = %pages_dir.display(), "no pages found");
        return Ok(BuildResult::default());
    }
    info!(count = pages.len(), "found pages");

    let templates_dir = settings.templates_dir(src_root);
    let critical_candidates = parse_above_the_fold(
        &settings.above_the_fold_path(src_root),
        &templates_dir,
        registry,
    )
    .map_err(BuildError::Probe)?;
    debug!(candidates = registry.len(), critical = critical_candidates.len(), "registry ready");

    let context = PageContext {
        templates_dir,
        registry,
        critical_candidates: &critical_candidates,
        base_path: &config.base_path,
        css: &settings.css,
    };

    let results = pages
        .par_iter()
        .map(|page| build_page(page, &context))
        .collect::<Result<Vec<_>, BuildError>>()?;

    let non_critical_css = aggregate_non_critical_css(
        &results,
        registry,
        &critical_candidates,
        settings.css.minify,
    )
    .map_err(BuildError::Stylesheet)?;

    Ok(BuildResult {
        pages: results,
        non_critical_css,
        critical_candidates: critical_candidates.into_iter().collect(),
    })
}

/// Compile the site and write it to the output and cache directories.
///
/// A source tree without pages produces a warning and writes nothing.
pub fn run_build_pipeline(config: &BuildConfig, settings: &SiteConfig) -> Result<BuildResult, BuildError> {
    let result = compile_site(config, settings)?;
    if result.pages.is_empty() {
        return Ok(result);
    }
    emit_build(&result, config)?;
    info!(
        pages = result.pages.len(),
        out_dir = %config.out_dir.display(),
        "build complete"
    );
    Ok(result)
}

fn build_page(page: &PageEntry, ctx: &PageContext<'_>) -> Result<PageBuildResult, BuildError> {
    let raw = fs::read_to_string(&page.absolute_path).map_err(|source| BuildError::ReadPage {
        path: page.absolute_path.clone(),
        source,
    })?;

    let expanded = compile_template(&raw, &ctx.templates_dir).map_err(|source| BuildError::Compile {
        page: page.relative_path.clone(),
        source,
    })?;

    let used = scan_candidates(&expanded, ctx.registry);
    let collected = collect_css(&used, ctx.registry);
    let split = split_critical_css(&collected, ctx.critical_candidates, ctx.registry);

    let page_css = |chunks: &LayerChunks| {
        generate_css(chunks, ctx.css.minify).map_err(|source| BuildError::PageCss {
            page: page.relative_path.clone(),
            source,
        })
    };
    let critical_css = page_css(&split.critical)?;
    let non_critical_css = page_css(&split.non_critical)?;

    let html = replace_placeholders(&expanded, &critical_css, &non_critical_css, ctx.base_path);
    report_critical_size(&page.relative_path, critical_css.len(), ctx.css);

    Ok(PageBuildResult {
        relative_path: page.relative_path.clone(),
        html,
        critical_css_size: critical_css.len(),
        used_candidates: used.into_iter().collect(),
    })
}

/// Log level for a page's critical CSS size, or `None` when it is within
/// the notice threshold.
fn critical_size_level(size: usize, css: &CssConfig) -> Option<Level> {
    if size > css.warn_bytes {
        Some(Level::WARN)
    } else if size > css.notice_bytes {
        Some(Level::INFO)
    } else {
        None
    }
}

fn report_critical_size(page: &str, size: usize, css: &CssConfig) {
    match critical_size_level(size, css) {
        Some(level) if level == Level::WARN => warn!(
            page,
            size,
            limit = css.warn_bytes,
            "critical CSS is large; consider trimming the above-the-fold set"
        ),
        Some(_) => info!(page, size, limit = css.notice_bytes, "critical CSS above notice threshold"),
        None => {}
    }
}

/// Build the site-wide stylesheet from the union of every page's used
/// candidates, in page order.
pub fn aggregate_non_critical_css(
    pages: &[PageBuildResult],
    registry: &CandidateRegistry,
    critical_candidates: &IndexSet<String>,
    minify: bool,
) -> Result<String, CssError> {
    let used: IndexSet<&str> = pages
        .iter()
        .flat_map(|p| p.used_candidates.iter().map(String::as_str))
        .collect();

    let collected = collect_css(&used, registry);
    let split = split_critical_css(&collected, critical_candidates, registry);
    let deduped: LayerChunks = split
        .non_critical
        .into_iter()
        .map(|(layer, chunks)| (layer, dedup_chunks(chunks)))
        .collect();

    generate_css(&deduped, minify)
}

/// Drop repeated chunks, keeping the first occurrence.
fn dedup_chunks(chunks: Vec<String>) -> Vec<String> {
    chunks.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}
