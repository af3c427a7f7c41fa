//! Plain-text extraction from a document subtree.
//!
//! The share affordance and the content validator both need a normalized
//! text rendering of a section. Extraction walks the subtree in document
//! order and classifies every node before deciding what it contributes;
//! paragraph-like elements are taken as a unit and tagged so the joining
//! step can place the paragraph-boundary separator.

use crate::dom::{Document, NodeData, NodeId};

/// What a node contributes to extraction.
///
/// Classification applies in this precedence: text, excluded, paragraph-like,
/// image, hidden, generic. An excluded `<p>` contributes nothing; a hidden
/// `<p>` still contributes its text because the paragraph rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// Text node: contributes its raw text content.
    Text,
    /// Marked with the exclusion class: contributes nothing, not descended.
    Excluded,
    /// Paragraph or heading: whole text content as one tagged fragment.
    ParagraphLike,
    /// Image: contributes its alt text.
    Image,
    /// Display-suppressed element: contributes nothing, not descended.
    Hidden,
    /// Anything else: descend into children.
    Generic,
}

/// One extracted piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// True when the fragment came from a paragraph-like element; the join
    /// step places the boundary separator after such fragments.
    pub paragraph: bool,
}

/// Extraction configuration.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Sentinel class marking subtrees that are not part of the readable text.
    pub excluded_class: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            excluded_class: "not-in-original-text".to_string(),
        }
    }
}

/// How extracted fragments are joined back into one string.
#[derive(Debug, Clone)]
pub struct JoinPolicy {
    /// Separator between consecutive fragments.
    pub separator: String,
    /// Separator placed after a paragraph-like fragment instead of the
    /// default one.
    pub paragraph_separator: String,
    /// Keep the boundary separator after a trailing paragraph fragment.
    pub keep_trailing_boundary: bool,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self {
            separator: String::new(),
            paragraph_separator: "|".to_string(),
            keep_trailing_boundary: true,
        }
    }
}

fn is_paragraph_like(tag: &str) -> bool {
    matches!(tag, "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Classify a node for extraction.
pub fn classify(doc: &Document, node: NodeId, opts: &ExtractOptions) -> NodeClass {
    let Some(n) = doc.get(node) else {
        return NodeClass::Generic;
    };
    match &n.data {
        NodeData::Text(_) => NodeClass::Text,
        NodeData::Element { name, classes, .. } => {
            if classes.iter().any(|c| *c == opts.excluded_class) {
                return NodeClass::Excluded;
            }
            let tag = name.local.as_ref();
            if is_paragraph_like(tag) {
                return NodeClass::ParagraphLike;
            }
            if tag == "img" {
                return NodeClass::Image;
            }
            if doc.is_inline_hidden(node) {
                return NodeClass::Hidden;
            }
            NodeClass::Generic
        }
        NodeData::Document => NodeClass::Generic,
        // Comments and doctypes contribute nothing and have no children
        _ => NodeClass::Excluded,
    }
}

/// Extract the ordered fragments of a subtree.
pub fn extract_fragments(doc: &Document, root: NodeId, opts: &ExtractOptions) -> Vec<Fragment> {
    let mut out = Vec::new();
    collect(doc, root, opts, &mut out);
    out
}

fn collect(doc: &Document, node: NodeId, opts: &ExtractOptions, out: &mut Vec<Fragment>) {
    match classify(doc, node, opts) {
        NodeClass::Text => {
            if let Some(text) = doc.text(node) {
                out.push(Fragment {
                    text: text.to_string(),
                    paragraph: false,
                });
            }
        }
        NodeClass::Excluded | NodeClass::Hidden => {}
        NodeClass::ParagraphLike => {
            out.push(Fragment {
                text: doc.subtree_text(node),
                paragraph: true,
            });
        }
        NodeClass::Image => {
            if let Some(alt) = doc.attr(node, "alt") {
                out.push(Fragment {
                    text: alt.to_string(),
                    paragraph: false,
                });
            }
        }
        NodeClass::Generic => {
            for child in doc.children(node) {
                collect(doc, child, opts, out);
            }
        }
    }
}

/// Join fragments under a [`JoinPolicy`].
pub fn join_fragments(fragments: &[Fragment], policy: &JoinPolicy) -> String {
    let mut out = String::new();
    for (i, frag) in fragments.iter().enumerate() {
        out.push_str(&frag.text);
        let last = i + 1 == fragments.len();
        if frag.paragraph {
            if !last || policy.keep_trailing_boundary {
                out.push_str(&policy.paragraph_separator);
            }
        } else if !last {
            out.push_str(&policy.separator);
        }
    }
    out
}

/// Extract and join in one step.
pub fn extract_text(
    doc: &Document,
    root: NodeId,
    opts: &ExtractOptions,
    policy: &JoinPolicy,
) -> String {
    join_fragments(&extract_fragments(doc, root, opts), policy)
}

/// Split a string at a character budget without ever splitting a scalar
/// value. Returns the prefix and whether anything was cut off.
pub fn truncate_chars(s: &str, budget: usize) -> (&str, bool) {
    match s.char_indices().nth(budget) {
        Some((byte_idx, _)) => (&s[..byte_idx], true),
        None => (s, false),
    }
}
