//! Fixture validation for generated pages.
//!
//! Every generated page is checked against the plain-text source it was
//! generated from: the page's visible text (minus editorial additions) must
//! equal the fixture text after punctuation normalization. The index page
//! lists the entries to check; each entry links the page and names its
//! fixture file.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::dom::{Document, NodeId, parse_html};
use crate::error::{Error, Result};

/// Class marking editorial additions absent from the source text.
pub const EXCLUDED_CLASS: &str = "not-in-original-text";
/// Class of index entries linking the pages to validate.
pub const INDEX_ENTRY_CLASS: &str = "entry";
/// Class of the node holding a page's whole visible text.
pub const CONTAINER_CLASS: &str = "entries-container";

/// Context shown on either side of the first mismatching character.
const DIFF_WINDOW: usize = 12;

/// Normalize text for comparison: half-width punctuation that the source and
/// the page render differently becomes full-width, and layout whitespace is
/// dropped entirely.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' => out.push('（'),
            ')' => out.push('）'),
            ':' => out.push('：'),
            ',' => out.push('，'),
            ';' => out.push('；'),
            ' ' | '\r' | '\n' | '\u{3000}' => {}
            other => out.push(other),
        }
    }
    out
}

/// Decode fixture or page bytes to a string.
///
/// UTF-8 first (BOM handled by encoding_rs); malformed input falls back to
/// GBK, the encoding the source texts circulated in.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }
    let (result, _, _) = encoding_rs::GBK.decode(bytes);
    result
}

/// One page listed by the index: its link target and its fixture name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub href: String,
}

/// Collect the pages the index document links under its `.entry` items.
/// The link text names the fixture; the href locates the page.
pub fn index_entries(doc: &Document) -> Vec<IndexEntry> {
    let mut entries = Vec::new();
    for entry in doc.all_by_class(INDEX_ENTRY_CLASS) {
        collect_anchors(doc, entry, &mut entries);
    }
    entries
}

fn collect_anchors(doc: &Document, node: NodeId, out: &mut Vec<IndexEntry>) {
    for child in doc.children(node) {
        if doc.element_name(child).is_some_and(|n| n.as_ref() == "a") {
            if let Some(href) = doc.attr(child, "href") {
                out.push(IndexEntry {
                    name: doc.subtree_text(child),
                    href: href.to_string(),
                });
            }
            continue;
        }
        collect_anchors(doc, child, out);
    }
}

/// Visible text of a page: everything under the entries container, in
/// document order, skipping subtrees carrying the excluded class.
pub fn page_text(doc: &Document, excluded_class: &str) -> Result<String> {
    let container = doc
        .find_by_class(CONTAINER_CLASS)
        .ok_or_else(|| Error::MissingElement(format!(".{CONTAINER_CLASS}")))?;
    let mut out = String::new();
    collect_text(doc, container, excluded_class, &mut out);
    Ok(out)
}

fn collect_text(doc: &Document, node: NodeId, excluded_class: &str, out: &mut String) {
    for child in doc.children(node) {
        if doc.has_class(child, excluded_class) {
            continue;
        }
        if let Some(text) = doc.text(child) {
            out.push_str(text);
        } else {
            collect_text(doc, child, excluded_class, out);
        }
    }
}

/// The first point where the page and the fixture disagree, with a bounded
/// window of context from each side.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Mismatch {
    /// Character position (not byte offset) of the first difference.
    pub char_index: usize,
    pub expected: String,
    pub actual: String,
}

/// Result for one validated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct EntryReport {
    pub name: String,
    pub passed: bool,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub mismatch: Option<Mismatch>,
    /// Set when the comparison could not run at all (missing fixture,
    /// unreadable page); counts as a failure.
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

/// Results for a whole index run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct ValidationReport {
    pub entries: Vec<EntryReport>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| !e.passed)
    }
}

/// Compares generated pages against their plain-text fixtures.
#[derive(Debug)]
pub struct Validator {
    fixtures_dir: PathBuf,
    excluded_class: String,
}

impl Validator {
    pub fn new(fixtures_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixtures_dir: fixtures_dir.into(),
            excluded_class: EXCLUDED_CLASS.to_string(),
        }
    }

    /// Validate every entry the index document links. Pages resolve
    /// relative to the index file's directory. An entry whose page or
    /// fixture cannot be read fails that entry; the rest still run.
    pub fn run(&self, index_path: &Path) -> Result<ValidationReport> {
        let bytes = fs::read(index_path)?;
        let index = parse_html(&decode_text(&bytes));
        let base = index_path.parent().unwrap_or_else(|| Path::new("."));

        let entries = index_entries(&index);
        if entries.is_empty() {
            // An index that lists nothing is a wrong file, not a clean run
            return Err(Error::InvalidIndex(format!(
                "no .{INDEX_ENTRY_CLASS} links in {}",
                index_path.display()
            )));
        }

        let mut report = ValidationReport::default();
        for entry in entries {
            let entry_report = match self.validate_entry(base, &entry) {
                Ok(entry_report) => entry_report,
                Err(e) => EntryReport {
                    name: entry.name.clone(),
                    passed: false,
                    mismatch: None,
                    error: Some(e.to_string()),
                },
            };
            if entry_report.passed {
                debug!("pass {}", entry_report.name);
            } else {
                warn!("fail {}", entry_report.name);
            }
            report.entries.push(entry_report);
        }
        Ok(report)
    }

    /// Validate one entry: page text and fixture text must be equal after
    /// normalization.
    pub fn validate_entry(&self, base: &Path, entry: &IndexEntry) -> Result<EntryReport> {
        let page_path = base.join(&entry.href);
        let page_bytes = fs::read(&page_path)?;
        let page = parse_html(&decode_text(&page_bytes));
        let from_html = normalize(&page_text(&page, &self.excluded_class)?);

        let fixture_path = self.fixtures_dir.join(format!("{}.txt", entry.name));
        let fixture_bytes = fs::read(&fixture_path).map_err(|_| Error::MissingFixture {
            entry: entry.name.clone(),
            path: fixture_path.display().to_string(),
        })?;
        let from_txt = normalize(&decode_text(&fixture_bytes));

        let mismatch = first_mismatch(&from_txt, &from_html);
        Ok(EntryReport {
            name: entry.name.clone(),
            passed: mismatch.is_none(),
            mismatch,
            error: None,
        })
    }
}

/// Char-wise comparison; `None` means equal.
fn first_mismatch(expected: &str, actual: &str) -> Option<Mismatch> {
    let mut ec = expected.chars();
    let mut ac = actual.chars();
    let mut index = 0;
    loop {
        match (ec.next(), ac.next()) {
            (None, None) => return None,
            (e, a) if e == a => index += 1,
            _ => break,
        }
    }
    Some(Mismatch {
        char_index: index,
        expected: window(expected, index),
        actual: window(actual, index),
    })
}

/// Up to `DIFF_WINDOW` characters of context on each side of `index`.
fn window(s: &str, index: usize) -> String {
    let start = index.saturating_sub(DIFF_WINDOW);
    s.chars().skip(start).take(2 * DIFF_WINDOW).collect()
}
