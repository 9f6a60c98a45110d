//! Debounced "current gesture" state.
//!
//! A [`GestureTracker`] is the whole session state: the last confirmed
//! gesture.  Feed it one classification per frame; it answers with a
//! [`Transition`] only when the confirmed gesture changes.

use tracing::debug;

use crate::GestureName;

/// A change of confirmed gesture.  Either side may be "no gesture".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<GestureName>,
    pub to:   Option<GestureName>,
}

impl Transition {
    /// The gesture the transition leads into, if any.
    pub fn gesture(&self) -> Option<GestureName> { self.to }

    /// True for a transition back to "no gesture".
    pub fn is_release(&self) -> bool { self.to.is_none() }
}

/// Holds the last confirmed gesture.
///
/// By default a single frame is enough to flip state.  With
/// [`GestureTracker::with_confirmation`] a new classification must repeat
/// on `n` consecutive frames before it is confirmed; any differing frame
/// in between restarts the count.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    current:        Option<GestureName>,
    confirm_frames: u32,
    candidate:      Option<GestureName>,
    streak:         u32,
}

impl GestureTracker {
    /// Single-frame tracker starting at "no gesture".
    pub fn new() -> Self {
        Self::with_confirmation(1)
    }

    /// Tracker that needs `frames` consecutive agreeing frames (minimum 1).
    pub fn with_confirmation(frames: u32) -> Self {
        GestureTracker {
            current:        None,
            confirm_frames: frames.max(1),
            candidate:      None,
            streak:         0,
        }
    }

    /// Last confirmed gesture.
    pub fn current(&self) -> Option<GestureName> { self.current }

    pub fn confirm_frames(&self) -> u32 { self.confirm_frames }

    /// Record this frame's classification.
    pub fn observe(&mut self, seen: Option<GestureName>) -> Option<Transition> {
        if seen == self.current {
            self.candidate = None;
            self.streak = 0;
            return None;
        }

        if self.streak > 0 && seen == self.candidate {
            self.streak += 1;
        } else {
            self.candidate = seen;
            self.streak = 1;
        }

        if self.streak < self.confirm_frames {
            debug!(candidate = ?seen, streak = self.streak, "gesture awaiting confirmation");
            return None;
        }

        let transition = Transition { from: self.current, to: seen };
        self.current = seen;
        self.candidate = None;
        self.streak = 0;
        Some(transition)
    }
}

impl Default for GestureTracker {
    fn default() -> Self { Self::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
