//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every page leads with its positional index and relative path; details
//! like critical CSS size and referenced candidates follow as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 about.html
//!     Critical CSS: 0 B
//!     Candidates: navbar, text-red
//! 002 index.html
//!     Critical CSS: 64 B
//!     Candidates: reset, navbar, text-red, btn
//!
//! Stylesheet
//!     styles.css (412 B)
//!
//! Built 2 pages
//! ```
//!
//! ## Check
//!
//! ```text
//! Candidates
//!     global (1)
//!         reset [critical, non-critical]
//!     utils (1)
//!         text-red [critical]
//!
//! Above the fold
//!     navbar, text-red
//!
//! Pages
//! 001 about.html (2 candidates)
//! 002 index.html (4 candidates)
//!
//! Checked 2 pages, 2 candidates
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::types::{BuildResult, CandidateDefinition, CandidateRegistry, Layer, NON_CRITICAL_CSS_FILENAME};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size.
///
/// ```text
/// 312 B
/// 4.2 KB
/// ```
fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Which fragments a candidate provides, e.g. `[critical, non-critical]`.
fn fragment_tags(candidate: &CandidateDefinition) -> String {
    let mut tags = Vec::new();
    if candidate.critical_css.is_some() {
        tags.push("critical");
    }
    if candidate.non_critical_css.is_some() {
        tags.push("non-critical");
    }
    format!("[{}]", tags.join(", "))
}

// ============================================================================
// Build output
// ============================================================================

/// Format the result of a build.
pub fn format_build_output(result: &BuildResult) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, page) in result.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), page.relative_path));
        lines.push(format!(
            "{}Critical CSS: {}",
            indent(1),
            format_bytes(page.critical_css_size)
        ));
        if !page.used_candidates.is_empty() {
            lines.push(format!(
                "{}Candidates: {}",
                indent(1),
                page.used_candidates.join(", ")
            ));
        }
    }

    lines.push(String::new());
    lines.push("Stylesheet".to_string());
    if result.non_critical_css.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    } else {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            NON_CRITICAL_CSS_FILENAME,
            format_bytes(result.non_critical_css.len())
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}",
        pluralize(result.pages.len(), "page", "pages")
    ));

    lines
}

/// Print build output to stdout.
pub fn print_build_output(result: &BuildResult) {
    for line in format_build_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the registry, the critical set and per-page usage of a dry run.
pub fn format_check_output(registry: &CandidateRegistry, result: &BuildResult) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Candidates".to_string());
    for layer in Layer::ALL {
        let mut in_layer: Vec<&CandidateDefinition> =
            registry.iter().filter(|c| c.layer == layer).collect();
        if in_layer.is_empty() {
            continue;
        }
        in_layer.sort_by(|a, b| a.name.cmp(&b.name));
        lines.push(format!("{}{} ({})", indent(1), layer, in_layer.len()));
        for candidate in in_layer {
            lines.push(format!(
                "{}{} {}",
                indent(2),
                candidate.name,
                fragment_tags(candidate)
            ));
        }
    }

    lines.push(String::new());
    lines.push("Above the fold".to_string());
    lines.push(format!(
        "{}{}",
        indent(1),
        join_or_none(&result.critical_candidates)
    ));

    lines.push(String::new());
    lines.push("Pages".to_string());
    for (i, page) in result.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            page.relative_path,
            pluralize(page.used_candidates.len(), "candidate", "candidates")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {}",
        pluralize(result.pages.len(), "page", "pages"),
        pluralize(registry.len(), "candidate", "candidates")
    ));

    lines
}

/// Print check output to stdout.
pub fn print_check_output(registry: &CandidateRegistry, result: &BuildResult) {
    for line in format_check_output(registry, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageBuildResult;

    fn page(path: &str, size: usize, used: &[&str]) -> PageBuildResult {
        PageBuildResult {
            relative_path: path.to_string(),
            html: String::new(),
            critical_css_size: size,
            used_candidates: used.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn candidate(name: &str, layer: Layer, critical: bool, non: bool) -> CandidateDefinition {
        CandidateDefinition {
            name: name.to_string(),
            layer,
            critical_css: critical.then(|| ".x{}".to_string()),
            non_critical_css: non.then(|| ".y{}".to_string()),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn format_bytes_small_and_large() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(4300), "4.2 KB");
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(1, "page", "pages"), "1 page");
        assert_eq!(pluralize(0, "page", "pages"), "0 pages");
        assert_eq!(pluralize(3, "page", "pages"), "3 pages");
    }

    #[test]
    fn fragment_tags_lists_present_fragments() {
        assert_eq!(
            fragment_tags(&candidate("a", Layer::Utils, true, true)),
            "[critical, non-critical]"
        );
        assert_eq!(fragment_tags(&candidate("a", Layer::Utils, false, true)), "[non-critical]");
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn build_output_lists_pages_with_context() {
        let result = BuildResult {
            pages: vec![
                page("about.html", 0, &[]),
                page("index.html", 64, &["navbar", "text-red"]),
            ],
            non_critical_css: "x".repeat(412),
            critical_candidates: vec![],
        };

        let lines = format_build_output(&result);
        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 about.html",
                "    Critical CSS: 0 B",
                "002 index.html",
                "    Critical CSS: 64 B",
                "    Candidates: navbar, text-red",
                "",
                "Stylesheet",
                "    styles.css (412 B)",
                "",
                "Built 2 pages",
            ]
        );
    }

    #[test]
    fn build_output_without_stylesheet() {
        let result = BuildResult {
            pages: vec![page("index.html", 0, &[])],
            ..Default::default()
        };
        let lines = format_build_output(&result);
        assert!(lines.contains(&"    (none)".to_string()));
        assert_eq!(lines.last().unwrap(), "Built 1 page");
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_output_groups_candidates_by_layer() {
        let registry: CandidateRegistry = [
            candidate("text-red", Layer::Utils, true, false),
            candidate("reset", Layer::Global, true, true),
            candidate("mt-1", Layer::Utils, false, true),
        ]
        .into_iter()
        .collect();
        let result = BuildResult {
            pages: vec![page("index.html", 10, &["reset", "text-red"])],
            non_critical_css: String::new(),
            critical_candidates: vec!["text-red".to_string()],
        };

        let lines = format_check_output(&registry, &result);
        assert_eq!(
            lines,
            vec![
                "Candidates",
                "    global (1)",
                "        reset [critical, non-critical]",
                "    utils (2)",
                "        mt-1 [non-critical]",
                "        text-red [critical]",
                "",
                "Above the fold",
                "    text-red",
                "",
                "Pages",
                "001 index.html (2 candidates)",
                "",
                "Checked 1 page, 3 candidates",
            ]
        );
    }

    #[test]
    fn check_output_empty_critical_set() {
        let lines = format_check_output(&CandidateRegistry::new(), &BuildResult::default());
        assert!(lines.contains(&"    (none)".to_string()));
        assert_eq!(lines.last().unwrap(), "Checked 0 pages, 0 candidates");
    }
}
