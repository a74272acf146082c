//! Candidate registry.
//!
//! Candidates are named CSS fragments, laid out one directory per candidate
//! inside a directory per layer:
//!
//! ```text
//! candidates/
//! ├── global/
//! │   └── reset/
//! │       └── critical.css
//! ├── layout/
//! ├── components/
//! │   └── btn/
//! │       ├── critical.css
//! │       └── non-critical.css
//! └── utils/
//!     └── text-red/
//!         └── critical.css
//! ```
//!
//! A candidate directory needs at least one of the two fragment files to be
//! registered. Missing layer directories and unreadable fragment files
//! contribute nothing; a fragment that exists but cannot be read (bad
//! permissions, invalid UTF-8) is logged as a warning.
//!
//! Names are global across layers. When two layers define the same name the
//! layer read later (in cascade order) wins and a warning is logged.

use crate::types::{
    CRITICAL_FRAGMENT, CandidateDefinition, CandidateRegistry, Layer, NON_CRITICAL_FRAGMENT,
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Build the registry from `candidates_dir`.
pub fn build_candidate_registry(candidates_dir: &Path) -> CandidateRegistry {
    let mut registry = CandidateRegistry::new();

    for layer in Layer::ALL {
        for candidate in scan_layer_dir(&candidates_dir.join(layer.as_str()), layer) {
            let name = candidate.name.clone();
            if let Some(previous) = registry.insert(candidate) {
                warn!(
                    candidate = %name,
                    replaced_layer = %previous.layer,
                    layer = %layer,
                    "candidate name defined in more than one layer; the later layer wins"
                );
            }
        }
    }

    debug!(count = registry.len(), dir = %candidates_dir.display(), "candidate registry built");
    registry
}

/// Read one layer directory. Unreadable directories yield no candidates.
fn scan_layer_dir(layer_dir: &Path, layer: Layer) -> Vec<CandidateDefinition> {
    let Ok(entries) = fs::read_dir(layer_dir) else {
        return Vec::new();
    };

    let mut dirs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter()
        .filter_map(|dir| {
            let name = dir.file_name()?.to_string_lossy().into_owned();
            let critical_css = read_fragment(&dir.join(CRITICAL_FRAGMENT));
            let non_critical_css = read_fragment(&dir.join(NON_CRITICAL_FRAGMENT));
            if critical_css.is_none() && non_critical_css.is_none() {
                return None;
            }
            Some(CandidateDefinition {
                name,
                layer,
                critical_css,
                non_critical_css,
            })
        })
        .collect()
}

/// Read one fragment file. A missing file is the normal case for a candidate
/// with a single fragment; any other failure is logged and skipped.
fn read_fragment(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(css) => Some(css),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable candidate fragment");
            None
        }
    }
}
