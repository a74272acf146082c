//! Shared types used across all pipeline stages.
//!
//! The registry and the critical-candidate set are built once per build and
//! then only read, so every per-page value here is either owned by a single
//! page's processing chain or borrowed immutably from the build-wide state.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Tag-name prefix that marks an element as a component.
pub const COMPONENT_PREFIX: &str = "c-";

/// Attribute that overrides convention-based template resolution.
pub const TEMPLATE_SOURCE_ATTR: &str = "_c_template-source";

/// Token replaced by the inline critical `<style>` block.
pub const CRITICAL_CSS_PLACEHOLDER: &str = "$#critical-css";

/// Token replaced by the preload link to the site-wide stylesheet.
pub const NON_CRITICAL_CSS_PLACEHOLDER: &str = "$#non-critical-css";

/// Filename of the aggregated non-critical stylesheet at the output root.
pub const NON_CRITICAL_CSS_FILENAME: &str = "styles.css";

/// Filename of a candidate's critical fragment.
pub const CRITICAL_FRAGMENT: &str = "critical.css";

/// Filename of a candidate's non-critical fragment.
pub const NON_CRITICAL_FRAGMENT: &str = "non-critical.css";

/// Extension of page and template files.
pub const MARKUP_EXTENSION: &str = "html";

/// CSS cascade layer a candidate belongs to.
///
/// Declaration order is cascade order, lowest precedence first, so the
/// derived `Ord` sorts layers the way the `@layer` statement lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Global,
    Layout,
    Components,
    Utils,
}

impl Layer {
    /// Every layer in cascade order.
    pub const ALL: [Layer; 4] = [
        Layer::Global,
        Layer::Layout,
        Layer::Components,
        Layer::Utils,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Global => "global",
            Layer::Layout => "layout",
            Layer::Components => "components",
            Layer::Utils => "utils",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS chunks grouped by layer, in collection order within each layer.
pub type LayerChunks = BTreeMap<Layer, Vec<String>>;

/// A `LayerChunks` map with an empty list for every layer.
pub fn empty_layer_chunks() -> LayerChunks {
    Layer::ALL.iter().map(|&layer| (layer, Vec::new())).collect()
}

/// A page file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Path relative to the pages directory, `/`-separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
}

/// A named, layer-scoped CSS fragment pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateDefinition {
    pub name: String,
    pub layer: Layer,
    pub critical_css: Option<String>,
    pub non_critical_css: Option<String>,
}

/// All candidates available to a build, keyed by name.
///
/// Iteration follows registration order. Registering a name a second time
/// replaces the definition in place.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    candidates: IndexMap<String, CandidateDefinition>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate, returning the definition it replaced, if any.
    pub fn insert(&mut self, candidate: CandidateDefinition) -> Option<CandidateDefinition> {
        self.candidates.insert(candidate.name.clone(), candidate)
    }

    pub fn get(&self, name: &str) -> Option<&CandidateDefinition> {
        self.candidates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.candidates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateDefinition> {
        self.candidates.values()
    }

    /// Name of the first candidate in `layer` whose critical fragment is
    /// exactly `chunk`.
    pub fn find_critical_owner(&self, layer: Layer, chunk: &str) -> Option<&str> {
        self.candidates
            .values()
            .find(|c| c.layer == layer && c.critical_css.as_deref() == Some(chunk))
            .map(|c| c.name.as_str())
    }
}

impl FromIterator<CandidateDefinition> for CandidateRegistry {
    fn from_iter<I: IntoIterator<Item = CandidateDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for candidate in iter {
            registry.insert(candidate);
        }
        registry
    }
}

/// Per-page CSS before the critical/non-critical decision is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedCss {
    pub critical: LayerChunks,
    pub non_critical: LayerChunks,
}

/// Final critical/non-critical partition of a page's CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCss {
    pub critical: LayerChunks,
    pub non_critical: LayerChunks,
}

/// A component element found in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// Lower-cased tag name, e.g. `c-atoms-button`.
    pub tag_name: String,
    /// Tag name without the component prefix, e.g. `atoms-button`.
    pub component_name: String,
    pub attributes: BTreeMap<String, String>,
}

/// Output of one page's build.
#[derive(Debug, Clone, Serialize)]
pub struct PageBuildResult {
    pub relative_path: String,
    #[serde(skip)]
    pub html: String,
    /// Byte size of the generated critical CSS.
    pub critical_css_size: usize,
    /// Candidates referenced by the expanded page, in document order.
    pub used_candidates: Vec<String>,
}

/// Output of a whole build.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub pages: Vec<PageBuildResult>,
    /// The aggregated site-wide non-critical stylesheet.
    pub non_critical_css: String,
    /// Candidates eligible for critical treatment, from the above-the-fold probe.
    pub critical_candidates: Vec<String>,
}
