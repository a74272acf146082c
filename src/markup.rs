//! Component element scanning.
//!
//! Expansion replaces component elements in place and leaves every other byte
//! of the document alone, so this module does not build a DOM. It walks the
//! markup tag by tag and reports component elements with the byte range they
//! occupy, from the start tag through the matching end tag.
//!
//! ```text
//! <main><c-card title="x"><p>ignored</p></c-card></main>
//!       ^--------------- span ------------------^
//! ```
//!
//! Comments and the contents of raw-text elements (`script`, `style`,
//! `textarea`, `title`) are skipped, so a `<c-...>` inside them is not a
//! component. A component start tag without a matching end tag is treated as
//! an empty element ending at its start tag.

use crate::types::{COMPONENT_PREFIX, ComponentRef};
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

static TAG_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9:._-]*)").expect("tag head pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// A component element and the bytes it occupies in the scanned markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentElement {
    pub component: ComponentRef,
    pub span: Range<usize>,
}

/// One start or end tag.
#[derive(Debug)]
struct Tag<'a> {
    span: Range<usize>,
    /// Lower-cased tag name.
    name: String,
    closing: bool,
    self_closing: bool,
    attributes: &'a str,
}

/// Iterator over the tags of a document, skipping comments and raw text.
struct Tags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tags<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        let html = self.html;
        let bytes = html.as_bytes();

        loop {
            let start = self.pos + html[self.pos..].find('<')?;
            let rest = &html[start..];

            if rest.starts_with("<!--") {
                self.pos = rest[4..]
                    .find("-->")
                    .map(|end| start + 4 + end + 3)
                    .unwrap_or(html.len());
                continue;
            }

            let Some(head) = TAG_HEAD.captures(rest) else {
                self.pos = start + 1;
                continue;
            };
            let closing = !head[1].is_empty();
            let name = head[2].to_ascii_lowercase();
            let head_end = start + head[0].len();

            // Find the closing '>' outside quoted attribute values.
            let mut quote = None;
            let mut end = head_end;
            while end < bytes.len() {
                match (quote, bytes[end]) {
                    (Some(q), b) if b == q => quote = None,
                    (Some(_), _) => {}
                    (None, b'"') | (None, b'\'') => quote = Some(bytes[end]),
                    (None, b'>') => break,
                    _ => {}
                }
                end += 1;
            }
            if end >= bytes.len() {
                // Unterminated tag: the rest of the document is text.
                self.pos = html.len();
                return None;
            }

            let attributes = &html[head_end..end];
            let self_closing = is_self_closing(attributes);
            self.pos = end + 1;

            if !closing && !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let close = format!("</{name}");
                let body = end + 1;
                self.pos = html[body..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .map(|offset| body + offset)
                    .unwrap_or(html.len());
            }

            return Some(Tag {
                span: start..end + 1,
                name,
                closing,
                self_closing,
                attributes,
            });
        }
    }
}

/// Whether a start tag's attribute source ends with a standalone `/`.
///
/// A slash that ends an unquoted attribute value (`href=/a/`) belongs to the
/// value and does not close the tag.
fn is_self_closing(attributes: &str) -> bool {
    let trimmed = attributes.trim_end();
    if !trimmed.ends_with('/') {
        return false;
    }
    let slash_in_value = ATTRIBUTE
        .captures_iter(trimmed)
        .last()
        .and_then(|caps| caps.get(4))
        .is_some_and(|value| value.end() == trimmed.len());
    !slash_in_value
}

/// Whether a lower-cased tag name denotes a component element.
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name.len() > COMPONENT_PREFIX.len() && tag_name.starts_with(COMPONENT_PREFIX)
}

/// Every component element in document order, nested ones included.
///
/// This is the flat listing of a document's components, for callers that
/// need to know what a page references without expanding it. Expansion uses
/// [`find_components`], which reports only outermost elements with spans.
pub fn extract_components(html: &str) -> Vec<ComponentRef> {
    Tags::new(html)
        .filter(|tag| !tag.closing && is_component_tag(&tag.name))
        .map(|tag| component_ref(&tag))
        .collect()
}

/// Outermost component elements in document order, with their spans.
///
/// Components nested inside another component's children are not reported;
/// they are part of the outer element's span.
pub fn find_components(html: &str) -> Vec<ComponentElement> {
    let tags: Vec<Tag<'_>> = Tags::new(html).collect();
    let mut elements = Vec::new();
    let mut i = 0;

    while i < tags.len() {
        let tag = &tags[i];
        if tag.closing || !is_component_tag(&tag.name) {
            i += 1;
            continue;
        }

        let (end, next) = if tag.self_closing {
            (tag.span.end, i + 1)
        } else {
            match find_matching_end(&tags, i) {
                Some(k) => (tags[k].span.end, k + 1),
                None => (tag.span.end, i + 1),
            }
        };

        elements.push(ComponentElement {
            component: component_ref(tag),
            span: tag.span.start..end,
        });
        i = next;
    }

    elements
}

/// Index of the end tag closing `tags[open]`, counting same-name nesting.
fn find_matching_end(tags: &[Tag<'_>], open: usize) -> Option<usize> {
    let name = &tags[open].name;
    let mut depth = 1usize;
    for (k, tag) in tags.iter().enumerate().skip(open + 1) {
        if &tag.name != name {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(k);
            }
        } else if !tag.self_closing {
            depth += 1;
        }
    }
    None
}

fn component_ref(tag: &Tag<'_>) -> ComponentRef {
    ComponentRef {
        tag_name: tag.name.clone(),
        component_name: tag.name[COMPONENT_PREFIX.len()..].to_string(),
        attributes: parse_attributes(tag.attributes),
    }
}

/// Parse the attribute source of a start tag. The first occurrence of a
/// repeated attribute wins; valueless attributes map to an empty string.
fn parse_attributes(source: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for caps in ATTRIBUTE.captures_iter(source) {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        attributes.entry(name).or_insert(value);
    }
    attributes
}
