//! Candidate usage scanning.
//!
//! Parses an expanded page and reports which registered candidates its
//! `class` attributes reference. Class tokens that are not registered are
//! ignored.

use crate::types::CandidateRegistry;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use indexmap::IndexSet;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Registered candidate names referenced by `html`, in first-use order.
pub fn scan_candidates(html: &str, registry: &CandidateRegistry) -> IndexSet<String> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut used = IndexSet::new();
    walk(&dom.document, registry, &mut used);
    used
}

fn walk(node: &Handle, registry: &CandidateRegistry, used: &mut IndexSet<String>) {
    if let NodeData::Element {
        attrs,
        template_contents,
        ..
    } = &node.data
    {
        for attr in attrs.borrow().iter() {
            if &*attr.name.local != "class" {
                continue;
            }
            for class in attr.value.split_whitespace() {
                if registry.contains(class) && !used.contains(class) {
                    used.insert(class.to_string());
                }
            }
        }
        // <template> children live in a separate document fragment.
        if let Some(contents) = template_contents.borrow().as_ref() {
            walk(contents, registry, used);
        }
    }

    for child in node.children.borrow().iter() {
        walk(child, registry, used);
    }
}
