use folio::controller::{PageHost, TapOutcome, Viewer, ViewerConfig};
use folio::dom::parse_html;
use folio::gesture::PointerEvent;
use folio::layout::BoxMetrics;
use folio::scroll::Rect;

/// Scripted page host recording every platform call.
#[derive(Debug, Default)]
struct FakeHost {
    scroll_y: f64,
    viewport_height: f64,
    rects: Vec<(String, Rect)>,
    fragment: String,
    back_href: String,
    events: Vec<String>,
    copy_supported: bool,
    /// When set, fragment writes jump the page there, the way a browser
    /// scrolls to the named anchor on its own.
    auto_scroll_to: Option<f64>,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            viewport_height: 600.0,
            copy_supported: true,
            ..Self::default()
        }
    }

    fn with_rect(mut self, id: &str, top: f64, bottom: f64) -> Self {
        self.rects.push((id.to_string(), Rect::new(top, bottom)));
        self
    }
}

impl PageHost for FakeHost {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
    fn scroll_to(&mut self, y: f64) {
        self.events.push(format!("scroll_to {y}"));
        self.scroll_y = y;
    }
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        self.rects
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, r)| *r)
    }
    fn set_fragment(&mut self, fragment: &str) {
        self.events.push(format!("set_fragment {fragment}"));
        self.fragment = fragment.to_string();
        if let Some(y) = self.auto_scroll_to {
            self.scroll_y = y;
        }
    }
    fn location_path(&self) -> String {
        "/books/lunyu.html".to_string()
    }
    fn location_href(&self) -> String {
        "https://example.com/books/lunyu.html".to_string()
    }
    fn set_back_href(&mut self, href: &str) {
        self.back_href = href.to_string();
    }
    fn set_highlight(&mut self, id: &str, on: bool) {
        self.events.push(format!("highlight {id} {on}"));
    }
    fn prevent_default(&mut self) {
        self.events.push("prevent_default".to_string());
    }
    fn follow_link(&mut self, href: &str) {
        self.events.push(format!("follow {href}"));
    }
    fn copy_text(&mut self, text: &str) -> bool {
        self.events.push(format!("copy {text}"));
        self.copy_supported
    }
    fn show_share_at(&mut self, y: f64) {
        self.events.push(format!("share_at {y}"));
    }
    fn hide_share(&mut self) {
        self.events.push("hide_share".to_string());
    }
    fn align_top(&mut self, id: &str) {
        self.events.push(format!("align_top {id}"));
    }
    fn align_bottom(&mut self, id: &str) {
        self.events.push(format!("align_bottom {id}"));
    }
    fn overlay_panel_width(&self) -> f64 {
        320.0
    }
    fn overlay_text_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            padding_left: 10.0,
            padding_right: 10.0,
            ..BoxMetrics::default()
        }
    }
    fn set_columns(&mut self, columns: u32) {
        self.events.push(format!("columns {columns}"));
    }
}

const PAGE: &str = r##"
    <body>
        <a id="back-button" href="#"></a>
        <div id="share-button"></div>
        <div id="overlay"><textarea id="share-text"></textarea>
            <div id="cancel-overlay"></div><div id="do-copy"></div></div>
        <div class="entries-container">
            <div class="entry" id="编0"><span class="entry-num not-in-original-text">一</span><p>子曰(学而时习之)</p><p>不亦说乎</p></div>
            <div class="entry" id="编1"><a id="see-also" href="#%E7%BC%960">另见</a><a id="outbound" href="https://example.org/notes"></a><p>有朋自远方来</p></div>
        </div>
        <div id="qr-code" style="display:none"></div>
    </body>
"##;

fn viewer_with(rects: &[(&str, f64, f64)]) -> Viewer<FakeHost> {
    let mut host = FakeHost::new();
    for (id, top, bottom) in rects {
        host = host.with_rect(id, *top, *bottom);
    }
    Viewer::new(parse_html(PAGE), host, ViewerConfig::default())
}

fn tap(viewer: &mut Viewer<FakeHost>, id: &str) -> Option<TapOutcome> {
    let node = viewer.document().element_by_id(id).expect("tap target");
    viewer.pointer_down(PointerEvent::mouse(50.0, 50.0), node);
    viewer.pointer_up(PointerEvent::mouse(50.0, 50.0), node)
}

#[test]
fn test_navigate_and_back_restores_scroll_offset() {
    let mut viewer = viewer_with(&[("编0", 900.0, 1000.0)]);
    viewer.host_mut().scroll_y = 350.0;

    // Follow the in-page link: percent-encoded fragment, push with offset
    let outcome = tap(&mut viewer, "see-also");
    assert_eq!(outcome, Some(TapOutcome::NavigatedTo("see-also".to_string())));
    assert_eq!(viewer.controller().stack().peek().id, "see-also");
    assert_eq!(viewer.controller().stack().peek().offset, 350.0);
    assert_eq!(viewer.host().back_href, "#see-also");
    assert_eq!(viewer.host().fragment, "#%E7%BC%960");

    // The target sits below the viewport; default policy leaves the
    // platform's own positioning alone
    assert!(!viewer.host().events.iter().any(|e| e.starts_with("align")));

    viewer.host_mut().scroll_y = 1200.0;
    let outcome = tap(&mut viewer, "back-button");
    assert_eq!(outcome, Some(TapOutcome::NavigatedBack));
    assert_eq!(viewer.host().scroll_y, 350.0);
    assert_eq!(viewer.controller().stack().depth(), 1);
    assert_eq!(viewer.host().back_href, "#");
    // The URL reflects the frame left behind, not the anchor's static href
    assert_eq!(viewer.host().fragment, "#see-also");
}

#[test]
fn test_target_tap_snaps_back_after_fragment_autoscroll() {
    let mut viewer = viewer_with(&[("编0", -40.0, 900.0)]);
    viewer.host_mut().scroll_y = 350.0;
    viewer.host_mut().auto_scroll_to = Some(2000.0);

    // Selecting a section writes its fragment; the browser-style jump to
    // the anchor must be undone so the reader stays put
    let outcome = tap(&mut viewer, "编0");
    assert_eq!(outcome, Some(TapOutcome::TargetSet("编0".to_string())));
    assert_eq!(viewer.host().scroll_y, 350.0);
    assert!(!viewer.host().events.iter().any(|e| e.starts_with("align")));
}

#[test]
fn test_back_on_sentinel_is_harmless() {
    let mut viewer = viewer_with(&[]);
    viewer.host_mut().scroll_y = 75.0;

    let outcome = tap(&mut viewer, "back-button");
    assert_eq!(outcome, Some(TapOutcome::NavigatedBack));
    // Sentinel offset is zero
    assert_eq!(viewer.host().scroll_y, 0.0);
    assert_eq!(viewer.controller().stack().depth(), 1);
    assert_eq!(viewer.host().back_href, "#");
}

#[test]
fn test_platform_back_pops_when_fragment_matches_top() {
    let mut viewer = viewer_with(&[("编0", 900.0, 1000.0)]);
    viewer.host_mut().scroll_y = 350.0;
    tap(&mut viewer, "see-also");
    viewer.host_mut().scroll_y = 0.0;

    // Percent-encoded form of the pushed id decodes before comparison
    viewer.on_fragment_changed("#see-also");
    assert_eq!(viewer.controller().stack().depth(), 1);
    assert_eq!(viewer.host().scroll_y, 350.0);
}

#[test]
fn test_mouse_drag_is_not_a_tap() {
    let mut viewer = viewer_with(&[("编0", 100.0, 200.0)]);
    let node = viewer.document().element_by_id("编0").unwrap();

    viewer.pointer_down(PointerEvent::mouse(50.0, 50.0), node);
    // Release at different coordinates: a drag, not a tap
    let outcome = viewer.pointer_up(PointerEvent::mouse(50.0, 51.0), node);
    assert_eq!(outcome, None);
    assert_eq!(viewer.controller().target(), None);
}

#[test]
fn test_touch_scroll_is_not_a_tap() {
    let mut viewer = viewer_with(&[("编0", 100.0, 200.0)]);
    let node = viewer.document().element_by_id("编0").unwrap();

    viewer.pointer_down(PointerEvent::touch(50.0, 50.0), node);
    viewer.pointer_move(PointerEvent::touch(50.0, 120.0));
    let outcome = viewer.pointer_up(PointerEvent::touch(50.0, 120.0), node);
    assert_eq!(outcome, None);

    // Highlight still flashed on and off around the scroll
    let host = viewer.host();
    assert!(host.events.contains(&"highlight 编0 true".to_string()));
    assert!(host.events.contains(&"highlight 编0 false".to_string()));
}

#[test]
fn test_share_text_excludes_editorial_additions() {
    let mut viewer = viewer_with(&[("编0", 100.0, 200.0)]);

    tap(&mut viewer, "编0");
    let content = viewer.controller().share().content().expect("share set");
    // Entry number is editorial; paragraphs join with the boundary mark
    assert!(!content.contains('一'));
    assert!(content.contains("子曰(学而时习之)|不亦说乎|"));
    // Part-numbered section: the name is just the page stem
    assert!(content.starts_with("lunyu"));
    assert!(content.contains("https://example.com/books/lunyu.html"));
}

#[test]
fn test_target_toggle_and_overlay_copy_flow() {
    let mut viewer = viewer_with(&[("编0", 100.0, 200.0)]);

    assert_eq!(
        tap(&mut viewer, "编0"),
        Some(TapOutcome::TargetSet("编0".to_string()))
    );
    assert_eq!(viewer.controller().target(), Some("编0"));

    assert_eq!(tap(&mut viewer, "share-button"), Some(TapOutcome::ShareRequested));
    assert!(viewer.overlay().is_visible());
    let (w, h) = viewer.overlay().text_area_size();
    assert_eq!(w, 300.0);
    assert_eq!(h, 200.0);

    tap(&mut viewer, "do-copy");
    assert!(viewer.overlay().is_readonly());
    assert!(viewer
        .host()
        .events
        .iter()
        .any(|e| e.starts_with("copy ") && e.contains("不亦说乎")));

    tap(&mut viewer, "cancel-overlay");
    assert!(!viewer.overlay().is_visible());

    // Toggle the target off: share content is gone
    assert_eq!(
        tap(&mut viewer, "编0"),
        Some(TapOutcome::TargetCleared("编0".to_string()))
    );
    assert!(!viewer.controller().share().is_set());
    assert!(viewer.host().events.contains(&"hide_share".to_string()));
}

#[test]
fn test_external_link_leaves_state_alone() {
    let mut viewer = viewer_with(&[]);

    let outcome = tap(&mut viewer, "outbound");
    assert_eq!(
        outcome,
        Some(TapOutcome::ExternalLink("https://example.org/notes".to_string()))
    );
    assert_eq!(viewer.controller().stack().depth(), 1);
    assert_eq!(viewer.host().fragment, "");
    assert!(viewer
        .host()
        .events
        .contains(&"follow https://example.org/notes".to_string()));
}

#[test]
fn test_resize_switches_columns() {
    let mut viewer = viewer_with(&[]);
    viewer.on_resize(479.0);
    viewer.on_resize(960.0);
    viewer.on_resize(1440.0);
    let columns: Vec<_> = viewer
        .host()
        .events
        .iter()
        .filter(|e| e.starts_with("columns"))
        .cloned()
        .collect();
    assert_eq!(columns, vec!["columns 1", "columns 2", "columns 3"]);
}

#[test]
fn test_print_mode_round_trip() {
    let mut viewer = viewer_with(&[]);

    assert_eq!(viewer.document().all_by_class("entry-num").len(), 1);
    viewer.on_print_changed(true);
    assert_eq!(viewer.document().all_by_class("entry-num").len(), 2);
    let qr = viewer.document().element_by_id("qr-code").unwrap();
    assert!(!viewer.document().is_inline_hidden(qr));

    viewer.on_print_changed(false);
    assert_eq!(viewer.document().all_by_class("entry-num").len(), 1);
    let qr = viewer.document().element_by_id("qr-code").unwrap();
    assert!(viewer.document().is_inline_hidden(qr));
}
