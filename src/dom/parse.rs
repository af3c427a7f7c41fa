//! HTML parsing into the arena [`Document`].
//!
//! html5ever drives a `TreeSink` with `&self` callbacks, so the document
//! under construction sits behind a `RefCell`. The sink hands html5ever a
//! handle that carries the arena id plus, for elements, a copy of the
//! qualified name; `elem_name` answers straight from the handle and never
//! has to borrow back into the arena.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as RawAttribute, QualName};

use super::{Attribute, Document, NodeData, NodeId};

/// Parse page markup into a [`Document`]. Lenient: parse errors are
/// swallowed the way browsers swallow them.
pub fn parse_html(html: &str) -> Document {
    parse_document(PageSink::default(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
}

/// Tree-builder handle: an arena id and the element name html5ever will
/// ask back for. Non-element nodes carry no name.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle {
    id: NodeId,
    name: Option<QualName>,
}

struct PageSink {
    doc: RefCell<Document>,
    quirks: Cell<QuirksMode>,
}

impl Default for PageSink {
    fn default() -> Self {
        Self {
            doc: RefCell::new(Document::new()),
            quirks: Cell::new(QuirksMode::NoQuirks),
        }
    }
}

impl PageSink {
    fn handle(id: NodeId) -> NodeHandle {
        NodeHandle { id, name: None }
    }
}

impl TreeSink for PageSink {
    type Handle = NodeHandle;
    type Output = Document;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Document {
        self.doc.into_inner()
    }

    // Authored pages are trusted input; recover silently like a browser
    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> NodeHandle {
        Self::handle(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a NodeHandle) -> &'a QualName {
        static NOT_AN_ELEMENT: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };
        target.name.as_ref().unwrap_or(&NOT_AN_ELEMENT)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<RawAttribute>,
        _flags: ElementFlags,
    ) -> NodeHandle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        let id = self.doc.borrow_mut().create_element(name.clone(), attrs);
        NodeHandle {
            id,
            name: Some(name),
        }
    }

    fn create_comment(&self, text: StrTendril) -> NodeHandle {
        Self::handle(self.doc.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> NodeHandle {
        // Processing instructions never occur in the authored pages; keep
        // the node inert by storing it as a comment
        Self::handle(self.doc.borrow_mut().create_comment(data.to_string()))
    }

    fn append(&self, parent: &NodeHandle, child: NodeOrText<NodeHandle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append(parent.id, node.id),
            NodeOrText::AppendText(text) => doc.append_text(parent.id, &text),
        }
    }

    fn append_before_sibling(&self, sibling: &NodeHandle, new_node: NodeOrText<NodeHandle>) {
        let mut doc = self.doc.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.id,
            NodeOrText::AppendText(text) => doc.create_text(text.to_string()),
        };
        doc.insert_before(sibling.id, node);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeHandle,
        prev_element: &NodeHandle,
        child: NodeOrText<NodeHandle>,
    ) {
        let attached = self
            .doc
            .borrow()
            .get(element.id)
            .is_some_and(|n| n.parent.is_some());
        if attached {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        );
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &NodeHandle) -> NodeHandle {
        // No <template> in the authored pages; its contents are the
        // element itself
        target.clone()
    }

    fn same_node(&self, x: &NodeHandle, y: &NodeHandle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks.set(mode);
    }

    fn add_attrs_if_missing(&self, target: &NodeHandle, attrs: Vec<RawAttribute>) {
        let mut doc = self.doc.borrow_mut();
        if let Some(node) = doc.get_mut(target.id)
            && let NodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if existing.iter().all(|a| a.name != attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeHandle) {
        self.doc.borrow_mut().detach(target.id);
    }

    fn reparent_children(&self, node: &NodeHandle, new_parent: &NodeHandle) {
        let mut doc = self.doc.borrow_mut();
        // Detaching the first child advances the list until it empties
        while let Some(child) = doc.children(node.id).next() {
            doc.detach(child);
            doc.append(new_parent.id, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_entry_markup() {
        let doc = parse_html(r#"<div class="entry" id="编0"><p>子曰</p>学而时习之</div>"#);

        let entry = doc.element_by_id("编0").expect("entry id indexed");
        assert!(doc.has_class(entry, "entry"));
        assert_eq!(doc.subtree_text(entry), "子曰学而时习之");

        let p = doc.find_by_tag("p").expect("paragraph kept");
        assert_eq!(doc.enclosing_id(p), Some("编0"));
    }

    #[test]
    fn test_document_skeleton_is_filled_in() {
        let doc = parse_html("<p>bare</p>");

        // html/head/body wrappers come from the tree builder
        assert!(doc.find_by_tag("html").is_some());
        assert!(doc.find_by_tag("body").is_some());
        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.element_name(p).unwrap().as_ref(), "p");
        let text = doc.children(p).next().unwrap();
        assert_eq!(doc.text(text), Some("bare"));
    }

    #[test]
    fn test_sibling_order_and_inline_whitespace_kept() {
        let doc = parse_html("<div><span>有朋</span> <span>自远方来</span></div>");
        let div = doc.find_by_tag("div").unwrap();
        assert_eq!(doc.subtree_text(div), "有朋 自远方来");
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let doc = parse_html(r#"<i id="dup">甲</i><i id="dup">乙</i>"#);
        let hit = doc.element_by_id("dup").unwrap();
        assert_eq!(doc.subtree_text(hit), "甲");
    }

    #[test]
    fn test_percent_encoded_looking_ids_stay_raw() {
        // Ids are matched as written; fragment decoding happens elsewhere
        let doc = parse_html(r#"<div id="%E7%BC%960"></div>"#);
        assert!(doc.element_by_id("%E7%BC%960").is_some());
        assert!(doc.element_by_id("编0").is_none());
    }

    #[test]
    fn test_multiple_classes_all_match() {
        let doc = parse_html(r#"<span class="entry-num not-in-original-text">一</span>"#);
        let span = doc.find_by_class("entry-num").unwrap();
        assert!(doc.has_class(span, "not-in-original-text"));
        assert!(!doc.has_class(span, "entry"));
    }
}
