//! Recognized-gesture tracker.
//!
//! Gesture recognition itself lives behind the platform poller; this tracker
//! only receives the per-tick list of already-recognized [`Gesture`] results
//! and answers "did a gesture of kind K occur this frame (optionally inside a
//! region)".

use crate::value::Rect;
use glam::Vec2;
use std::collections::HashMap;

/// The kinds of touch gestures the recognizer may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Brief touch and release.
    Tap,
    /// Two taps in quick succession.
    DoubleTap,
    /// Touch held in place.
    Hold,
    /// Drag unconstrained to an axis.
    FreeDrag,
    /// Drag constrained to the horizontal axis.
    HorizontalDrag,
    /// Drag constrained to the vertical axis.
    VerticalDrag,
    /// A drag sequence finished.
    DragComplete,
    /// Quick swipe with velocity.
    Flick,
    /// Two-finger pinch in progress.
    Pinch,
    /// A pinch sequence finished.
    PinchComplete,
}

/// One recognized gesture, as delivered by the platform recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    /// What kind of gesture was recognized.
    pub kind: GestureKind,
    /// Where it happened, in window-logical coordinates.
    pub position: Vec2,
    /// Movement associated with the gesture (drags, flicks).
    pub delta: Vec2,
}

/// Per-tick recognized gestures plus per-kind consumption stamps.
#[derive(Debug, Default)]
pub struct TouchTracker {
    current: Vec<Gesture>,
    consumed: HashMap<GestureKind, u64>,
}

impl TouchTracker {
    /// Creates a tracker with no gestures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces this frame's gesture list. Call once per tick.
    pub fn update(&mut self, gestures: Vec<Gesture>) {
        self.current = gestures;
    }

    /// The first gesture of `kind` recognized this frame, if any.
    #[must_use]
    pub fn occurred(&self, kind: GestureKind) -> Option<&Gesture> {
        self.current.iter().find(|g| g.kind == kind)
    }

    /// The first gesture of `kind` inside `bounds` this frame, if any.
    #[must_use]
    pub fn occurred_in(&self, kind: GestureKind, bounds: &Rect) -> Option<&Gesture> {
        self.current
            .iter()
            .find(|g| g.kind == kind && bounds.contains(g.position))
    }

    /// Stamps `kind` as consumed for `frame`.
    pub fn consume(&mut self, kind: GestureKind, frame: u64) {
        self.consumed.insert(kind, frame);
    }

    /// Whether `kind` was consumed on `frame`.
    #[must_use]
    pub fn is_consumed(&self, kind: GestureKind, frame: u64) -> bool {
        self.consumed.get(&kind) == Some(&frame)
    }
}
