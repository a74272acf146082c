//! Per-layer CSS collection for a set of used candidates.

use crate::types::{CandidateRegistry, CollectedCss, empty_layer_chunks};

/// Gather the critical and non-critical fragments of every used candidate,
/// grouped by layer. Within a layer, chunks follow the order of `used`.
/// Unknown names and empty fragments are skipped.
pub fn collect_css<I, S>(used: I, registry: &CandidateRegistry) -> CollectedCss
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut critical = empty_layer_chunks();
    let mut non_critical = empty_layer_chunks();

    for name in used {
        let Some(candidate) = registry.get(name.as_ref()) else {
            continue;
        };
        if let Some(css) = candidate.critical_css.as_deref().filter(|c| !c.is_empty()) {
            critical
                .entry(candidate.layer)
                .or_default()
                .push(css.to_string());
        }
        if let Some(css) = candidate.non_critical_css.as_deref().filter(|c| !c.is_empty()) {
            non_critical
                .entry(candidate.layer)
                .or_default()
                .push(css.to_string());
        }
    }

    CollectedCss {
        critical,
        non_critical,
    }
}
