//! Navigation controller and page-session assembly.
//!
//! One [`NavigationController`] instance owns the back-stack, the current
//! target selection, and the share composer for the lifetime of a page
//! session. It talks to the platform page only through the [`PageHost`]
//! trait, so every handler can be driven in tests with a fake host.
//!
//! Ordering note: both the tap handler and the fragment-change listener can
//! react to what is logically the same user action. The tap path calls
//! [`PageHost::prevent_default`] before synthesizing its own fragment write,
//! which suppresses the platform's own fragment navigation; the
//! fragment-change listener therefore only ever fires for platform back
//! navigation.

use log::debug;

use crate::dom::{Document, NodeId};
use crate::extract::{ExtractOptions, JoinPolicy, extract_text};
use crate::gesture::{InputKind, PointerEvent, TapRecognizer};
use crate::layout::{BoxMetrics, column_count};
use crate::nav::{BackStack, decode_fragment, is_in_page_anchor};
use crate::overlay::Overlay;
use crate::print::PrintTransform;
use crate::scroll::{BelowViewportPolicy, Rect, ScrollCoordinator, ScrollDecision};
use crate::share::{NameRules, ShareComposer};

/// Vertical offset of the share affordance above the targeted section.
const SHARE_AFFORDANCE_OFFSET: f64 = 26.0;

/// Platform page seam: everything the runtime needs from the browser page.
pub trait PageHost {
    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;
    fn scroll_to(&mut self, y: f64);
    fn viewport_height(&self) -> f64;
    /// Viewport-relative bounding rect of the element with `id`.
    fn bounding_rect(&self, id: &str) -> Option<Rect>;
    /// Write the location fragment (may trigger platform auto-scroll).
    fn set_fragment(&mut self, fragment: &str);
    /// Path component of the page location.
    fn location_path(&self) -> String;
    /// Full page URL.
    fn location_href(&self) -> String;
    /// Update the back affordance's link target.
    fn set_back_href(&mut self, href: &str);
    /// Toggle the transient touch highlight on a section.
    fn set_highlight(&mut self, id: &str, on: bool);
    /// Suppress the platform's default handling of the current event.
    fn prevent_default(&mut self);
    /// Follow an external link.
    fn follow_link(&mut self, href: &str);
    /// Platform copy command; false when unsupported or failed.
    fn copy_text(&mut self, text: &str) -> bool;
    /// Place the share affordance at an absolute vertical position.
    fn show_share_at(&mut self, y: f64);
    fn hide_share(&mut self);
    /// Align the element's top edge with the viewport top.
    fn align_top(&mut self, id: &str);
    /// Align the element's bottom edge with the viewport bottom.
    fn align_bottom(&mut self, id: &str);
    /// Width available to the overlay's text panel.
    fn overlay_panel_width(&self) -> f64;
    /// Computed box metrics of the overlay's text area.
    fn overlay_text_metrics(&self) -> BoxMetrics;
    /// Apply a column count to the reading surface.
    fn set_columns(&mut self, columns: u32);
}

/// Runtime configuration for a page session.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Id of the in-page back affordance.
    pub back_id: String,
    /// Id of the share affordance.
    pub share_id: String,
    /// Id of the overlay panel (taps on it are swallowed).
    pub overlay_id: String,
    /// Id of the overlay's cancel affordance.
    pub cancel_id: String,
    /// Id of the overlay's copy affordance.
    pub copy_id: String,
    /// Minimum entry width for the column switch.
    pub min_entry_width: f64,
    /// Suppress the platform's synthetic click after an accepted touch tap.
    pub prevent_default_taps: bool,
    /// What to do when a navigation target sits fully below the viewport.
    pub below_viewport: BelowViewportPolicy,
    pub extract: ExtractOptions,
    pub join: JoinPolicy,
    pub name_rules: NameRules,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            back_id: "back-button".to_string(),
            share_id: "share-button".to_string(),
            overlay_id: "overlay".to_string(),
            cancel_id: "cancel-overlay".to_string(),
            copy_id: "do-copy".to_string(),
            min_entry_width: 480.0,
            prevent_default_taps: true,
            below_viewport: BelowViewportPolicy::default(),
            extract: ExtractOptions::default(),
            join: JoinPolicy::default(),
            name_rules: NameRules::default(),
        }
    }
}

/// At most one section is the current target; tapping it again clears it.
#[derive(Debug, Default)]
pub struct TargetSelection {
    current: Option<String>,
}

impl TargetSelection {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// What a dispatched tap amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// No enclosing id, or nothing to do.
    Ignored,
    /// The share affordance was tapped; present the overlay.
    ShareRequested,
    /// A content section became the current target.
    TargetSet(String),
    /// The current target was tapped again and cleared.
    TargetCleared(String),
    /// An in-page anchor was followed (back-stack pushed).
    NavigatedTo(String),
    /// The in-page back affordance was followed (back-stack popped).
    NavigatedBack,
    /// An external link was delegated to the platform.
    ExternalLink(String),
}

/// Owns navigation state for one page session.
pub struct NavigationController {
    config: ViewerConfig,
    stack: BackStack,
    scroll: ScrollCoordinator,
    share: ShareComposer,
    target: TargetSelection,
}

impl NavigationController {
    pub fn new(config: ViewerConfig, scroll: ScrollCoordinator) -> Self {
        let share = ShareComposer::with_rules(config.name_rules.clone());
        Self {
            config,
            stack: BackStack::new(),
            scroll,
            share,
            target: TargetSelection::default(),
        }
    }

    pub fn stack(&self) -> &BackStack {
        &self.stack
    }

    pub fn share(&self) -> &ShareComposer {
        &self.share
    }

    pub fn target(&self) -> Option<&str> {
        self.target.current()
    }

    /// Initialize the back affordance to the sentinel target.
    pub fn attach<H: PageHost>(&mut self, host: &mut H) {
        host.set_back_href("#");
    }

    /// Write the fragment and reposition the viewport per the coordinator's
    /// decision. `suppress` bypasses the geometry checks for a fragment-only
    /// update; the write can still auto-scroll the page, so the pre-write
    /// offset is put back.
    fn edit_fragment_and_scroll<H: PageHost>(
        &mut self,
        host: &mut H,
        fragment: &str,
        suppress: bool,
    ) {
        let prev_y = host.scroll_y();
        let id = decode_fragment(fragment);
        let rect = if id.is_empty() {
            None
        } else {
            host.bounding_rect(&id)
        };

        let decision = self.scroll.decide(rect, host.viewport_height(), suppress);
        host.set_fragment(fragment);

        match decision {
            ScrollDecision::RestorePrevious => host.scroll_to(prev_y),
            ScrollDecision::AlignTop => host.align_top(&id),
            ScrollDecision::AlignBottom => host.align_bottom(&id),
            ScrollDecision::Stay => {}
        }
    }

    /// Toggle the target selection for an identified content section.
    fn toggle_target<H: PageHost>(&mut self, doc: &Document, host: &mut H, id: &str) -> TapOutcome {
        if self.target.current() == Some(id) {
            debug!("target cleared: {id}");
            self.edit_fragment_and_scroll(host, "", true);
            self.share.clear();
            host.hide_share();
            self.target.current = None;
            return TapOutcome::TargetCleared(id.to_string());
        }

        debug!("target set: {id}");
        self.edit_fragment_and_scroll(host, &format!("#{id}"), true);
        if let Some(rect) = host.bounding_rect(id) {
            host.show_share_at(rect.top + host.scroll_y() - SHARE_AFFORDANCE_OFFSET);
        }
        let node = doc.element_by_id(id);
        debug_assert!(node.is_some(), "targeted section should exist");
        let snippet = node
            .map(|n| extract_text(doc, n, &self.config.extract, &self.config.join))
            .unwrap_or_default();
        self.share.set_content(
            snippet,
            &host.location_path(),
            &format!("#{id}"),
            host.location_href(),
        );
        self.target.current = Some(id.to_string());
        TapOutcome::TargetSet(id.to_string())
    }

    /// Dispatch an accepted tap on `target_node`.
    pub fn handle_tap<H: PageHost>(
        &mut self,
        doc: &Document,
        host: &mut H,
        target_node: NodeId,
    ) -> TapOutcome {
        let Some(id) = doc.enclosing_id(target_node).map(str::to_string) else {
            return TapOutcome::Ignored;
        };
        debug!("tapped on {id}");

        if id == self.config.share_id {
            return TapOutcome::ShareRequested;
        }

        let is_anchor = doc
            .element_name(target_node)
            .is_some_and(|n| n.as_ref() == "a");

        if !is_anchor {
            // Tap on an on-screen element: only toggle the highlight; the
            // fragment write must not move the page.
            return self.toggle_target(doc, host, &id);
        }

        let Some(href) = doc.attr(target_node, "href").map(str::to_string) else {
            return TapOutcome::Ignored;
        };

        if !is_in_page_anchor(&href) {
            host.follow_link(&href);
            return TapOutcome::ExternalLink(href);
        }

        // Suppress the platform's own fragment navigation so the
        // fragment-change listener does not double-fire for this tap.
        host.prevent_default();

        if id == self.config.back_id {
            // The back affordance's authored href is static; the fragment we
            // write must name the frame being left, which lives on the stack.
            let fragment = format!("#{}", self.stack.peek().id);
            self.edit_fragment_and_scroll(host, &fragment, true);
            host.scroll_to(self.stack.peek().offset);
            self.stack.pop();
            host.set_back_href(&format!("#{}", self.stack.peek().id));
            TapOutcome::NavigatedBack
        } else {
            self.stack.push(&id, host.scroll_y());
            host.set_back_href(&format!("#{}", self.stack.peek().id));
            self.edit_fragment_and_scroll(host, &href, false);
            TapOutcome::NavigatedTo(id)
        }
    }

    /// Platform fragment-change notification. When the new fragment equals
    /// the current top id the user pressed the platform back control: pop
    /// and restore the popped frame's saved offset.
    pub fn on_fragment_changed<H: PageHost>(&mut self, host: &mut H, fragment: &str) {
        let id = decode_fragment(fragment);
        if id != self.stack.peek().id {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            debug!("platform back to {id}, restoring offset {}", frame.offset);
            host.scroll_to(frame.offset);
            host.set_back_href(&format!("#{}", self.stack.peek().id));
        }
    }
}

/// Full page-session assembly: recognizer, controller, overlay, print
/// transform, and layout wiring over one document.
pub struct Viewer<H: PageHost> {
    doc: Document,
    host: H,
    config: ViewerConfig,
    recognizer: TapRecognizer,
    controller: NavigationController,
    overlay: Overlay,
    print: PrintTransform,
    /// Section highlighted during the current touch sequence.
    touch_highlight: Option<String>,
}

impl<H: PageHost> Viewer<H> {
    pub fn new(doc: Document, mut host: H, config: ViewerConfig) -> Self {
        let scroll = ScrollCoordinator::new(config.below_viewport);
        let mut controller = NavigationController::new(config.clone(), scroll);
        controller.attach(&mut host);
        Self {
            doc,
            host,
            config,
            recognizer: TapRecognizer::new(),
            controller,
            overlay: Overlay::new(),
            print: PrintTransform::new(),
            touch_highlight: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Pointer down / touch start on `target`.
    pub fn pointer_down(&mut self, event: PointerEvent, target: NodeId) {
        self.recognizer.press(event);
        if event.kind == InputKind::Touch
            && let Some(id) = self.doc.enclosing_id(target).map(str::to_string)
        {
            self.host.set_highlight(&id, true);
            self.touch_highlight = Some(id);
        }
    }

    /// Pointer / touch move.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        self.recognizer.moved(event);
    }

    /// Pointer up / touch end on `target`. Returns the tap outcome when the
    /// sequence was accepted as a tap.
    pub fn pointer_up(&mut self, event: PointerEvent, target: NodeId) -> Option<TapOutcome> {
        let accepted = self.recognizer.release(event);

        if event.kind == InputKind::Touch
            && let Some(id) = self.touch_highlight.take()
        {
            self.host.set_highlight(&id, false);
        }

        if !accepted {
            return None;
        }
        if event.kind == InputKind::Touch && self.config.prevent_default_taps {
            // Suppress the synthetic click/zoom the platform would add.
            self.host.prevent_default();
        }
        Some(self.dispatch_tap(target))
    }

    fn dispatch_tap(&mut self, target: NodeId) -> TapOutcome {
        if let Some(id) = self.doc.enclosing_id(target) {
            if id == self.config.cancel_id {
                self.overlay.dismiss();
                return TapOutcome::Ignored;
            }
            if id == self.config.copy_id {
                let text = self.overlay.begin_copy().to_string();
                let copied = self.host.copy_text(&text);
                self.overlay.finish_copy(copied);
                return TapOutcome::Ignored;
            }
            if id == self.config.overlay_id {
                // Swallow taps on the overlay panel itself
                return TapOutcome::Ignored;
            }
        }

        let outcome = self
            .controller
            .handle_tap(&self.doc, &mut self.host, target);

        if outcome == TapOutcome::ShareRequested {
            if let Some(content) = self.controller.share().content() {
                self.overlay.set_content(content);
            }
            let width = self.host.overlay_panel_width();
            let extra = self.host.overlay_text_metrics().horizontal_extra(false);
            self.overlay.show(width, extra);
        }
        outcome
    }

    /// Platform fragment-change notification.
    pub fn on_fragment_changed(&mut self, fragment: &str) {
        self.controller.on_fragment_changed(&mut self.host, fragment);
    }

    /// Viewport resize: recompute the column count.
    pub fn on_resize(&mut self, viewport_width: f64) {
        let columns = column_count(viewport_width, self.config.min_entry_width);
        self.host.set_columns(columns);
    }

    /// Print-mode change notification.
    pub fn on_print_changed(&mut self, printing: bool) {
        if printing {
            self.print.enter(&mut self.doc);
        } else {
            self.print.exit(&mut self.doc);
        }
    }
}
