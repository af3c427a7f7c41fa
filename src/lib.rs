//! # folio
//!
//! Interactive runtime for a print-friendly annotated-text reading page.
//!
//! ## Features
//!
//! - Fragment-synced in-page navigation with an explicit back-stack
//! - Unified tap recognition over mouse and touch input
//! - Share-text extraction from the page's markup, skipping editorial
//!   additions
//! - Scroll coordination around fragment writes
//! - Print-mode document transforms and responsive column layout
//! - Fixture validation of generated pages against their source texts
//!
//! ## Quick Start
//!
//! ```ignore
//! use folio::controller::{Viewer, ViewerConfig};
//! use folio::dom::parse_html;
//! use folio::gesture::PointerEvent;
//!
//! // `host` is your platform adapter implementing `PageHost`
//! let doc = parse_html("<div class=\"entry\" id=\"编0\"><p>学而时习之</p></div>");
//! let mut viewer = Viewer::new(doc, host, ViewerConfig::default());
//!
//! // Wire platform events to the viewer:
//! if let Some(target) = viewer.document().element_by_id("编0") {
//!     viewer.pointer_down(PointerEvent::touch(12.0, 40.0), target);
//!     viewer.pointer_up(PointerEvent::touch(12.0, 40.0), target);
//! }
//! viewer.on_fragment_changed("#编0");
//! viewer.on_resize(1024.0);
//! ```
//!
//! The [`controller::PageHost`] trait is the only seam to the platform page;
//! everything above it is pure state and can be driven in tests.

pub mod controller;
pub mod dom;
pub mod error;
pub mod extract;
pub mod gesture;
pub mod layout;
pub mod nav;
pub mod overlay;
pub mod print;
pub mod scroll;
pub mod share;
pub mod validate;

pub use controller::{NavigationController, PageHost, TapOutcome, Viewer, ViewerConfig};
pub use dom::{Document, NodeId, parse_html};
pub use error::{Error, Result};
pub use gesture::{InputKind, PointerEvent, TapRecognizer};
pub use nav::{BackStack, NavFrame};
pub use scroll::{BelowViewportPolicy, Rect, ScrollCoordinator, ScrollDecision};
pub use share::{ShareComposer, ShareContent};
