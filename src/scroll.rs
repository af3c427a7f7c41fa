//! Scroll positioning decisions for fragment navigation.
//!
//! Writing the URL fragment may make the platform auto-scroll to the target.
//! The coordinator classifies the target's rectangle against the viewport
//! *before* the fragment write and decides whether to snap back to the
//! previous offset, align the target's top edge, or leave the viewport
//! alone.

/// Vertical extent of an element, viewport-relative (as a bounding client
/// rect reports it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// What to do with the viewport after the fragment write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    /// Undo the platform's auto-scroll by restoring the pre-write offset.
    /// Applies when the target is already fully visible, and always when
    /// the write is a fragment-only update.
    RestorePrevious,
    /// Target starts above the viewport or is taller than it: align its top
    /// edge with the viewport top.
    AlignTop,
    /// Target below the viewport but it would fit: align its bottom edge
    /// with the viewport bottom.
    AlignBottom,
    /// Leave the viewport where the platform put it.
    Stay,
}

/// Policy for a target fully below the viewport that would fit.
///
/// Page revisions disagree on this case; it is an explicit choice rather
/// than a fixed contract. The default leaves the viewport alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BelowViewportPolicy {
    AlignBottom,
    #[default]
    Stay,
}

/// Decides scroll actions from target geometry.
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    pub below_viewport: BelowViewportPolicy,
}

impl ScrollCoordinator {
    pub fn new(below_viewport: BelowViewportPolicy) -> Self {
        Self { below_viewport }
    }

    /// Classify a target rect against the viewport height.
    ///
    /// `suppress` skips the geometry checks entirely (used when only the
    /// fragment changes, e.g. toggling a highlight): the fragment write can
    /// still auto-scroll, so the pre-write offset is restored regardless of
    /// where the target sits.
    pub fn decide(&self, rect: Option<Rect>, viewport_height: f64, suppress: bool) -> ScrollDecision {
        if suppress {
            return ScrollDecision::RestorePrevious;
        }
        // A missing target is a content-authoring error; degrade to no-op
        debug_assert!(rect.is_some(), "scroll target should exist");
        let Some(rect) = rect else {
            return ScrollDecision::Stay;
        };

        if rect.top < 0.0 || rect.height() > viewport_height {
            return ScrollDecision::AlignTop;
        }
        // rect.top >= 0 && height <= viewport_height

        if rect.bottom <= viewport_height {
            return ScrollDecision::RestorePrevious;
        }
        // rect.bottom > viewport_height && height <= viewport_height

        match self.below_viewport {
            BelowViewportPolicy::AlignBottom => ScrollDecision::AlignBottom,
            BelowViewportPolicy::Stay => ScrollDecision::Stay,
        }
    }
}
