//! Critical CSS selection.
//!
//! The above-the-fold probe is an ordinary markup document describing what a
//! visitor sees before scrolling. Candidates it references form the critical
//! set: their critical fragments are inlined into every page that uses them.
//! Critical fragments of any other candidate are demoted to the external
//! stylesheet.

use crate::compile::{CompileError, compile_template};
use crate::types::{CandidateRegistry, CollectedCss, SplitCss, empty_layer_chunks};
use crate::usage::scan_candidates;
use indexmap::IndexSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Candidate names referenced by the above-the-fold probe at `probe_path`.
///
/// A missing or unreadable probe yields an empty set and a warning. Template
/// errors while expanding the probe propagate.
pub fn parse_above_the_fold(
    probe_path: &Path,
    templates_dir: &Path,
    registry: &CandidateRegistry,
) -> Result<IndexSet<String>, CompileError> {
    let probe = match fs::read_to_string(probe_path) {
        Ok(probe) => probe,
        Err(e) => {
            warn!(
                path = %probe_path.display(),
                error = %e,
                "above-the-fold probe not readable; no CSS will be inlined as critical"
            );
            return Ok(IndexSet::new());
        }
    };

    let expanded = compile_template(&probe, templates_dir)?;
    let critical = scan_candidates(&expanded, registry);
    debug!(count = critical.len(), "critical candidates resolved");
    Ok(critical)
}

/// Partition a page's collected CSS into what is inlined and what is linked.
///
/// A collected critical chunk stays critical only if its owning candidate
/// (the first registered candidate in the same layer with identical critical
/// text) is in `critical_candidates`. Collected non-critical chunks always
/// stay non-critical.
pub fn split_critical_css(
    collected: &CollectedCss,
    critical_candidates: &IndexSet<String>,
    registry: &CandidateRegistry,
) -> SplitCss {
    let mut critical = empty_layer_chunks();
    let mut non_critical = empty_layer_chunks();

    for (&layer, chunks) in &collected.critical {
        for chunk in chunks {
            let is_critical = registry
                .find_critical_owner(layer, chunk)
                .is_some_and(|owner| critical_candidates.contains(owner));
            let target = if is_critical {
                &mut critical
            } else {
                &mut non_critical
            };
            target.entry(layer).or_default().push(chunk.clone());
        }
    }

    for (&layer, chunks) in &collected.non_critical {
        non_critical
            .entry(layer)
            .or_default()
            .extend(chunks.iter().cloned());
    }

    SplitCss {
        critical,
        non_critical,
    }
}
