//! In-page navigation back-stack.
//!
//! The page keeps its own history of in-page jumps, independent of (but
//! synchronized with) the platform's history: each frame records the target
//! id and the scroll offset to restore when navigating back. The stack is a
//! plain value type so it can be tested in isolation; the controller owns
//! the side effects (back-link href, fragment writes).

use percent_encoding::percent_decode_str;

/// One navigation level: the target id and the scroll offset saved when the
/// jump away from it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFrame {
    pub id: String,
    pub offset: f64,
}

/// Explicit back-stack of in-page navigation targets.
///
/// Always holds at least one frame: the root sentinel with an empty id and
/// offset zero.
#[derive(Debug)]
pub struct BackStack {
    frames: Vec<NavFrame>,
}

impl BackStack {
    /// Create a stack holding only the sentinel frame.
    pub fn new() -> Self {
        Self {
            frames: vec![NavFrame {
                id: String::new(),
                offset: 0.0,
            }],
        }
    }

    /// The current top frame.
    pub fn peek(&self) -> &NavFrame {
        // Invariant: never empty
        self.frames.last().expect("back-stack holds the sentinel")
    }

    /// Push a frame for `id` with the saved `offset`. Pushing the id already
    /// on top is a no-op, so repeated taps on the same target add one frame,
    /// not two. Returns whether a frame was added.
    pub fn push(&mut self, id: &str, offset: f64) -> bool {
        if self.peek().id == id {
            return false;
        }
        self.frames.push(NavFrame {
            id: id.to_string(),
            offset,
        });
        true
    }

    /// Remove the top frame unless only the sentinel remains. Returns the
    /// popped frame, or `None` when the stack was already at the sentinel.
    pub fn pop(&mut self) -> Option<NavFrame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Number of frames, sentinel included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for BackStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-decode a URL fragment for comparison against raw element ids.
///
/// Fragments arrive percent-encoded from the platform (`#%E7%BC%960` for
/// `#编0`); ids in the document are raw. Invalid sequences fall back to the
/// raw string, matching lenient browser behavior.
pub fn decode_fragment(fragment: &str) -> String {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// True when an href targets a fragment within the same document rather
/// than an external URL.
pub fn is_in_page_anchor(href: &str) -> bool {
    !href.contains("://") && href.starts_with('#')
}
