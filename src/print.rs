//! Print-mode document transforms.
//!
//! Entering print mode duplicates each entry's page-number node so the
//! number prints on both hands of a page spread, and reveals the QR code
//! node. Leaving print mode removes the duplicates and hides the QR code
//! again.

use crate::dom::{Document, NodeId};

/// Class carried by each content entry.
pub const ENTRY_CLASS: &str = "entry";
/// Class of the page-number node inside an entry.
pub const ENTRY_NUM_CLASS: &str = "entry-num";
/// Id of the QR code node.
pub const QR_ID: &str = "qr-code";

/// Applies and reverts the print-mode transforms.
#[derive(Debug, Default)]
pub struct PrintTransform {
    /// Clones inserted on the last enter, removed on exit.
    inserted: Vec<NodeId>,
}

impl PrintTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter print mode: duplicate page numbers, show the QR code.
    pub fn enter(&mut self, doc: &mut Document) {
        for entry in doc.all_by_class(ENTRY_CLASS) {
            if let Some(num) = first_descendant_with_class(doc, entry, ENTRY_NUM_CLASS) {
                let copy = doc.clone_subtree(num);
                doc.insert_before(num, copy);
                self.inserted.push(copy);
            }
        }
        if let Some(qr) = doc.element_by_id(QR_ID) {
            doc.remove_attr(qr, "style");
        }
    }

    /// Exit print mode: remove the duplicated page numbers, hide the QR code.
    pub fn exit(&mut self, doc: &mut Document) {
        for copy in self.inserted.drain(..) {
            doc.detach(copy);
        }
        if let Some(qr) = doc.element_by_id(QR_ID) {
            doc.set_attr(qr, "style", "display:none");
        }
    }
}

/// First descendant of `root` (excluding `root`) carrying `class`, in
/// document order.
fn first_descendant_with_class(doc: &Document, root: NodeId, class: &str) -> Option<NodeId> {
    let mut stack: Vec<NodeId> = {
        let mut children: Vec<_> = doc.children(root).collect();
        children.reverse();
        children
    };
    while let Some(id) = stack.pop() {
        if doc.has_class(id, class) {
            return Some(id);
        }
        let mut children: Vec<_> = doc.children(id).collect();
        children.reverse();
        stack.extend(children);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const PAGE: &str = r#"
        <div id="qr-code" style="display:none"></div>
        <div class="entry"><span class="entry-num">一</span><p>正文</p></div>
        <div class="entry"><span class="entry-num">二</span><p>又一</p></div>
        <div class="entry"><p>无页码</p></div>
    "#;

    fn entry_num_count(doc: &Document) -> usize {
        doc.all_by_class(ENTRY_NUM_CLASS).len()
    }

    #[test]
    fn test_enter_duplicates_page_numbers() {
        let mut doc = parse_html(PAGE);
        let mut print = PrintTransform::new();

        assert_eq!(entry_num_count(&doc), 2);
        print.enter(&mut doc);
        assert_eq!(entry_num_count(&doc), 4);
    }

    #[test]
    fn test_duplicate_precedes_original() {
        let mut doc = parse_html(PAGE);
        let mut print = PrintTransform::new();
        print.enter(&mut doc);

        let entry = doc.find_by_class(ENTRY_CLASS).expect("entry");
        let nums: Vec<_> = doc
            .children(entry)
            .filter(|&c| doc.has_class(c, ENTRY_NUM_CLASS))
            .collect();
        assert_eq!(nums.len(), 2);
        assert_eq!(doc.subtree_text(nums[0]), doc.subtree_text(nums[1]));
    }

    #[test]
    fn test_exit_restores_count() {
        let mut doc = parse_html(PAGE);
        let mut print = PrintTransform::new();

        print.enter(&mut doc);
        print.exit(&mut doc);
        assert_eq!(entry_num_count(&doc), 2);

        // A second round keeps behaving the same
        print.enter(&mut doc);
        assert_eq!(entry_num_count(&doc), 4);
        print.exit(&mut doc);
        assert_eq!(entry_num_count(&doc), 2);
    }

    #[test]
    fn test_qr_visibility_toggles() {
        let mut doc = parse_html(PAGE);
        let mut print = PrintTransform::new();
        let qr = doc.element_by_id(QR_ID).expect("qr node");

        assert!(doc.is_inline_hidden(qr));
        print.enter(&mut doc);
        assert!(!doc.is_inline_hidden(qr));
        print.exit(&mut doc);
        assert!(doc.is_inline_hidden(qr));
    }

    #[test]
    fn test_entry_without_page_number_untouched() {
        let mut doc = parse_html(PAGE);
        let mut print = PrintTransform::new();
        print.enter(&mut doc);

        let bare = doc
            .all_by_class(ENTRY_CLASS)
            .into_iter()
            .find(|&e| doc.subtree_text(e).contains("无页码"))
            .expect("bare entry");
        assert!(first_descendant_with_class(&doc, bare, ENTRY_NUM_CLASS).is_none());
    }
}
