//! Responsive layout math.
//!
//! The reading surface switches between a single column and multiple
//! columns depending on how many minimum-width entries fit the viewport.
//! Box metrics mirror what the platform's computed style reports and feed
//! the overlay's text-area sizing.

/// Computed horizontal box metrics of an element, in css px.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    pub margin_left: f64,
    pub margin_right: f64,
    pub border_left: f64,
    pub border_right: f64,
    pub padding_left: f64,
    pub padding_right: f64,
}

impl BoxMetrics {
    /// Total horizontal space the box consumes beyond its content width.
    pub fn horizontal_extra(&self, with_margin: bool) -> f64 {
        let margin = if with_margin {
            self.margin_left + self.margin_right
        } else {
            0.0
        };
        margin + self.border_left + self.border_right + self.padding_left + self.padding_right
    }
}

/// Number of reading columns for a viewport: as many as keep every entry at
/// least `min_entry_width` wide, floor one.
pub fn column_count(viewport_width: f64, min_entry_width: f64) -> u32 {
    if min_entry_width <= 0.0 || viewport_width <= min_entry_width {
        return 1;
    }
    (viewport_width / min_entry_width) as u32
}
