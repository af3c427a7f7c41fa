//! Share overlay model.
//!
//! Modal that presents the composed share string in a selectable text area
//! with copy and cancel affordances. The overlay itself is pure state; the
//! controller performs the platform copy command and reports its outcome.

/// Text-area display area in css px^2; height is derived from the width the
/// surrounding panel allows.
const TEXT_AREA: f64 = 60_000.0;

/// Outcome of a copy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The platform copy command succeeded.
    Copied,
    /// The copy command failed or is unsupported; the content stays selected
    /// so the user can copy manually.
    SelectedOnly,
}

/// Modal overlay state.
#[derive(Debug, Default)]
pub struct Overlay {
    visible: bool,
    content: String,
    /// Readonly suppresses the software keyboard on touch devices.
    readonly: bool,
    selected: bool,
    text_width: f64,
    text_height: f64,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text shown in the overlay.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Present the overlay, sizing the text area to the width the panel
    /// allows (minus the text area's own horizontal extra).
    pub fn show(&mut self, panel_width: f64, horizontal_extra: f64) {
        self.visible = true;
        self.text_width = panel_width - horizontal_extra;
        self.text_height = if self.text_width > 0.0 {
            TEXT_AREA / self.text_width
        } else {
            0.0
        };
    }

    /// Dismiss the overlay, releasing the readonly state.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.readonly = false;
        self.selected = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text_area_size(&self) -> (f64, f64) {
        (self.text_width, self.text_height)
    }

    /// Select the content ahead of a copy attempt, returning the text the
    /// platform should copy.
    pub fn begin_copy(&mut self) -> &str {
        self.selected = true;
        &self.content
    }

    /// Record the copy result. Even a failed copy leaves the selection in
    /// place for manual copying, and readonly is set either way to keep the
    /// software keyboard from popping up.
    pub fn finish_copy(&mut self, copied: bool) -> CopyOutcome {
        self.readonly = true;
        if copied {
            CopyOutcome::Copied
        } else {
            CopyOutcome::SelectedOnly
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_sizes_text_area() {
        let mut overlay = Overlay::new();
        overlay.show(320.0, 20.0);
        assert!(overlay.is_visible());
        let (w, h) = overlay.text_area_size();
        assert_eq!(w, 300.0);
        assert_eq!(h, 200.0);
    }

    #[test]
    fn test_copy_failure_keeps_selection() {
        let mut overlay = Overlay::new();
        overlay.set_content("share me".to_string());
        overlay.show(300.0, 0.0);

        let text = overlay.begin_copy().to_string();
        assert_eq!(text, "share me");
        let outcome = overlay.finish_copy(false);
        assert_eq!(outcome, CopyOutcome::SelectedOnly);
        assert!(overlay.is_selected());
        assert!(overlay.is_readonly());
    }

    #[test]
    fn test_copy_success_sets_readonly() {
        let mut overlay = Overlay::new();
        overlay.set_content("x".to_string());
        overlay.begin_copy();
        assert_eq!(overlay.finish_copy(true), CopyOutcome::Copied);
        assert!(overlay.is_readonly());
    }

    #[test]
    fn test_dismiss_releases_readonly() {
        let mut overlay = Overlay::new();
        overlay.show(300.0, 0.0);
        overlay.begin_copy();
        overlay.finish_copy(true);

        overlay.dismiss();
        assert!(!overlay.is_visible());
        assert!(!overlay.is_readonly());
        assert!(!overlay.is_selected());
    }
}
