//! # dinomlx
//!
//! A static site compiler for component-based HTML. Pages are plain HTML
//! files; elements named `c-<name>` pull in templates, class names pull in
//! CSS candidates, and every page ships with exactly the CSS it uses: the
//! above-the-fold part inline, the rest in one shared stylesheet.
//!
//! # Pipeline
//!
//! ```text
//! pages/*.html ──► expand components ──► find used candidates
//!                                               │
//!   candidates/<layer>/<name>/*.css ──► collect per layer
//!                                               │
//!   above-the-fold.html ──► split critical / non-critical
//!                                               │
//!                              @layer stylesheets, minified
//!                                               │
//!                        inject into <head> ──► dist/
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Build paths and `config.toml` site settings |
//! | [`types`] | Shared types and constants (`Layer`, `CandidateRegistry`, results) |
//! | [`scan`] | Page discovery under the pages directory |
//! | [`registry`] | Candidate registry from the layered candidates directory |
//! | [`markup`] | Tag-level scanning for component elements and their spans |
//! | [`resolve`] | Component name → template path, with override attribute |
//! | [`compile`] | Recursive component expansion with cycle detection |
//! | [`usage`] | Registered candidates referenced by `class` attributes |
//! | [`collect`] | Per-layer CSS collection for a set of candidates |
//! | [`critical`] | Above-the-fold probe and critical/non-critical split |
//! | [`css`] | `@layer` stylesheet generation and minification |
//! | [`placeholder`] | `$#critical-css` / `$#non-critical-css` injection |
//! | [`emit`] | Writes pages, stylesheet and the build manifest |
//! | [`pipeline`] | Orchestrates a build, pages in parallel |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Splice, Don't Reserialize
//!
//! Component expansion works on byte spans found by a tag scanner rather than
//! on a parsed DOM. Everything outside a component element reaches the output
//! exactly as written, including placeholder tokens, whitespace and attribute
//! quoting. A full HTML parser is only used where the document is read, never
//! written: to find class names.
//!
//! ## Cascade Layers
//!
//! Every generated stylesheet opens with
//! `@layer global, layout, components, utils;`, so precedence is fixed by
//! layer and not by the order in which pages happen to use candidates.
//!
//! ## One Stylesheet Per Site
//!
//! Non-critical CSS is aggregated across all pages into a single
//! `styles.css`. Visitors download it once; pages link it with a preload
//! hint and a `<noscript>` fallback.

pub mod collect;
pub mod compile;
pub mod config;
pub mod critical;
pub mod css;
pub mod emit;
pub mod markup;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod registry;
pub mod resolve;
pub mod scan;
pub mod types;
pub mod usage;

#[cfg(test)]
pub(crate) mod test_helpers;
