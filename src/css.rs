//! Layered stylesheet generation.
//!
//! Output starts with a layer-order statement so the cascade is fixed no
//! matter which layers a page actually uses, followed by one block per
//! non-empty layer:
//!
//! ```css
//! @layer global, layout, components, utils;
//! @layer components {
//! .btn { padding: 1rem; }
//! }
//! @layer utils {
//! .text-red { color: red; }
//! }
//! ```
//!
//! The result is minified with lightningcss unless minification is disabled.

use crate::types::{Layer, LayerChunks};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CssError {
    #[error("CSS parse error: {0}")]
    Parse(String),
    #[error("CSS minify error: {0}")]
    Minify(String),
    #[error("CSS print error: {0}")]
    Print(String),
}

/// Generate a layered stylesheet from `chunks`.
///
/// Returns an empty string when every layer is empty; the minifier is not
/// invoked in that case.
pub fn generate_css(chunks: &LayerChunks, minify: bool) -> Result<String, CssError> {
    let blocks: Vec<String> = Layer::ALL
        .iter()
        .filter_map(|layer| {
            let layer_chunks = chunks.get(layer).filter(|c| !c.is_empty())?;
            Some(format!("@layer {layer} {{\n{}\n}}", layer_chunks.join("\n")))
        })
        .collect();

    if blocks.is_empty() {
        return Ok(String::new());
    }

    let raw = format!("{}\n{}", layer_order_statement(), blocks.join("\n"));
    if minify { minify_css(&raw) } else { Ok(raw) }
}

fn layer_order_statement() -> String {
    let names: Vec<&str> = Layer::ALL.iter().map(|l| l.as_str()).collect();
    format!("@layer {};", names.join(", "))
}

fn minify_css(css: &str) -> Result<String, CssError> {
    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| CssError::Parse(e.to_string()))?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| CssError::Minify(e.to_string()))?;
    let output = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| CssError::Print(e.to_string()))?;
    Ok(output.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::empty_layer_chunks;

    fn chunks(entries: &[(Layer, &str)]) -> LayerChunks {
        let mut chunks = empty_layer_chunks();
        for (layer, css) in entries {
            chunks.entry(*layer).or_default().push(css.to_string());
        }
        chunks
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(generate_css(&empty_layer_chunks(), true).unwrap(), "");
        assert_eq!(generate_css(&LayerChunks::new(), false).unwrap(), "");
    }

    #[test]
    fn unminified_layout() {
        let css = generate_css(
            &chunks(&[(Layer::Utils, ".a { color: red; }"), (Layer::Global, "* { margin: 0; }")]),
            false,
        )
        .unwrap();
        assert_eq!(
            css,
            "@layer global, layout, components, utils;\n\
             @layer global {\n* { margin: 0; }\n}\n\
             @layer utils {\n.a { color: red; }\n}"
        );
    }

    #[test]
    fn empty_layers_are_omitted() {
        let css = generate_css(&chunks(&[(Layer::Components, ".btn{}")]), false).unwrap();
        assert!(css.contains("@layer components {"));
        assert!(!css.contains("@layer utils {"));
        assert!(!css.contains("@layer global {"));
    }

    #[test]
    fn chunks_within_layer_keep_order() {
        let css = generate_css(
            &chunks(&[(Layer::Utils, ".first{}"), (Layer::Utils, ".second{}")]),
            false,
        )
        .unwrap();
        let first = css.find(".first").unwrap();
        let second = css.find(".second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn minified_output_keeps_layers_and_rules() {
        let css = generate_css(
            &chunks(&[(Layer::Utils, ".text-red {\n    color:   red;\n}")]),
            true,
        )
        .unwrap();
        assert!(css.contains("@layer"));
        assert!(css.contains("utils"));
        assert!(css.contains("color"));
        assert!(!css.contains("   "));
    }

    #[test]
    fn minified_multiple_layers() {
        let css = generate_css(
            &chunks(&[
                (Layer::Global, "body { margin: 0; }"),
                (Layer::Components, ".card { padding: 8px; }"),
            ]),
            true,
        )
        .unwrap();
        assert!(css.contains("global"));
        assert!(css.contains("components"));
        assert!(css.contains(".card"));
    }

    #[test]
    fn minified_output_is_smaller() {
        let input = chunks(&[(Layer::Layout, ".grid {\n  display: grid;\n  gap: 16px;\n}")]);
        let raw = generate_css(&input, false).unwrap();
        let minified = generate_css(&input, true).unwrap();
        assert!(minified.len() < raw.len());
        assert!(minified.contains("display:grid"));
    }
}
