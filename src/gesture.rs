//! Tap recognition over normalized pointer events.
//!
//! Mouse and touch wiring differ on the page, but both feed the same
//! press/move/release sequence into one recognizer. A tap is a press and a
//! release with no intervening move; for mouse input the release must land
//! on exactly the press coordinate (no drag tolerance). Anything else is a
//! scroll or drag and is silently rejected - that is normal control flow,
//! not an error.

use log::trace;

/// Where a pointer sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Mouse,
    Touch,
}

/// A normalized low-level pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: InputKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            kind: InputKind::Mouse,
            x,
            y,
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            kind: InputKind::Touch,
            x,
            y,
        }
    }
}

/// Recognizer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TapPhase {
    #[default]
    Idle,
    Started,
    Moved,
}

/// Tap recognizer state machine.
///
/// One instance tracks one interaction sequence at a time; the phase always
/// resets to idle on release, whatever the outcome.
#[derive(Debug, Default)]
pub struct TapRecognizer {
    phase: TapPhase,
    // Press coordinate, recorded for mouse input only
    x: f64,
    y: f64,
}

impl TapRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down / touch start. Returns true when the press begins a new
    /// sequence; a second press while one is tracked is rejected without
    /// changing state.
    pub fn press(&mut self, event: PointerEvent) -> bool {
        if self.phase != TapPhase::Idle {
            trace!("tap: reentrant press rejected");
            return false;
        }
        self.phase = TapPhase::Started;
        if event.kind == InputKind::Mouse {
            self.x = event.x;
            self.y = event.y;
        }
        true
    }

    /// Pointer / touch move. Returns true for the move that demotes the
    /// sequence from started to moved.
    pub fn moved(&mut self, _event: PointerEvent) -> bool {
        if self.phase == TapPhase::Started {
            self.phase = TapPhase::Moved;
            true
        } else {
            false
        }
    }

    /// Pointer up / touch end. Returns true when the whole sequence counts
    /// as a tap. Always resets to idle.
    pub fn release(&mut self, event: PointerEvent) -> bool {
        if self.phase != TapPhase::Started {
            self.phase = TapPhase::Idle;
            return false;
        }
        self.phase = TapPhase::Idle;
        if event.kind == InputKind::Mouse && (self.x != event.x || self.y != event.y) {
            trace!("tap: release drifted from press, rejected");
            return false;
        }
        true
    }

    /// True while a press is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.phase != TapPhase::Idle
    }
}
