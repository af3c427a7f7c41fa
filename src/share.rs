//! Share snippet composition.
//!
//! A successful tap on a content section stores that section's extracted
//! text and the page URL; the share affordance later renders them as one
//! bounded-length string: section name, snippet (truncated to the character
//! budget, never mid-character), and URL, joined by single spaces with empty
//! components omitted.

use crate::extract::truncate_chars;
use crate::nav::decode_fragment;

/// Character budget for the snippet portion.
pub const SNIPPET_BUDGET: usize = 64;

/// Ellipsis appended to a truncated snippet.
pub const ELLIPSIS: &str = "……";

/// Rules for deriving the section name from the page location.
#[derive(Debug, Clone)]
pub struct NameRules {
    /// Fragment ids naming the page title section: the name is omitted
    /// entirely for these.
    pub title_ids: Vec<String>,
    /// Prefixes of part-level section ids (prefix followed by digits): the
    /// fragment is omitted and only the page stem is used.
    pub part_prefixes: Vec<String>,
    /// Separator between stem and fragment for ordinary sections.
    pub separator: String,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            title_ids: vec!["the-title".to_string()],
            part_prefixes: vec!["编".to_string()],
            separator: "‖".to_string(),
        }
    }
}

impl NameRules {
    fn is_title_id(&self, id: &str) -> bool {
        self.title_ids.iter().any(|t| t == id)
    }

    fn is_part_id(&self, id: &str) -> bool {
        self.part_prefixes.iter().any(|p| {
            id.strip_prefix(p.as_str())
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        })
    }
}

/// The last path segment without its extension.
fn path_stem(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rfind('.') {
        Some(pos) if pos > 0 => &last[..pos],
        _ => last,
    }
}

/// Derive the section name from the page path and (raw, possibly
/// percent-encoded) fragment.
pub fn section_name(path: &str, fragment: &str, rules: &NameRules) -> String {
    let id = decode_fragment(fragment);
    if rules.is_title_id(&id) {
        return String::new();
    }
    let stem = path_stem(path);
    if id.is_empty() || rules.is_part_id(&id) {
        return stem.to_string();
    }
    format!("{}{}{}", stem, rules.separator, id)
}

/// Content captured for the current share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    pub section_name: String,
    pub snippet_text: String,
    pub page_url: String,
}

/// Holds the current share content and renders the shareable string.
#[derive(Debug)]
pub struct ShareComposer {
    rules: NameRules,
    budget: usize,
    content: Option<ShareContent>,
}

impl ShareComposer {
    pub fn new() -> Self {
        Self {
            rules: NameRules::default(),
            budget: SNIPPET_BUDGET,
            content: None,
        }
    }

    pub fn with_rules(rules: NameRules) -> Self {
        Self {
            rules,
            budget: SNIPPET_BUDGET,
            content: None,
        }
    }

    /// Capture content for a newly targeted section.
    pub fn set_content(&mut self, snippet: String, path: &str, fragment: &str, page_url: String) {
        self.content = Some(ShareContent {
            section_name: section_name(path, fragment, &self.rules),
            snippet_text: snippet,
            page_url,
        });
    }

    /// Drop the captured content (target toggled off).
    pub fn clear(&mut self) {
        self.content = None;
    }

    pub fn is_set(&self) -> bool {
        self.content.is_some()
    }

    /// Render the shareable string. Idempotent: repeated calls without an
    /// intervening [`set_content`](Self::set_content) return the same value.
    pub fn content(&self) -> Option<String> {
        let c = self.content.as_ref()?;
        let (prefix, cut) = truncate_chars(&c.snippet_text, self.budget);
        let snippet = if cut {
            format!("{prefix}{ELLIPSIS}")
        } else {
            prefix.to_string()
        };

        let parts: Vec<&str> = [c.section_name.as_str(), snippet.as_str(), c.page_url.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        Some(parts.join(" "))
    }
}

impl Default for ShareComposer {
    fn default() -> Self {
        Self::new()
    }
}
