//! Platform abstraction layer
//!
//! The browser calls us back at the display refresh rate, which is not always
//! 60 Hz. [`FrameGate`] thins those callbacks down to a fixed frame rate.
//! Frames are never replayed to catch up and nothing is scaled by delta time.

use crate::consts::FRAME_RATE_HZ;

/// Fraction of a frame interval a callback may arrive early and still count.
/// Absorbs rAF timestamp jitter on displays that run at exactly the target rate.
const EARLY_TOLERANCE: f64 = 0.25;

/// Decides which animation-frame callbacks run a simulation frame
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval_ms: f64,
    next_due_ms: Option<f64>,
    accepted: u64,
    skipped: u64,
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new(FRAME_RATE_HZ)
    }
}

impl FrameGate {
    pub fn new(rate_hz: f64) -> Self {
        Self {
            interval_ms: 1000.0 / rate_hz.max(1.0),
            next_due_ms: None,
            accepted: 0,
            skipped: 0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Call once per animation-frame callback with its timestamp (ms).
    /// Returns true if this callback should run exactly one frame.
    pub fn should_step(&mut self, now_ms: f64) -> bool {
        let tolerance = self.interval_ms * EARLY_TOLERANCE;
        let due = match self.next_due_ms {
            None => true,
            Some(next) => now_ms + tolerance >= next,
        };

        if !due {
            self.skipped += 1;
            return false;
        }

        self.accepted += 1;
        let next = match self.next_due_ms {
            // Stay on the fixed grid, but never schedule behind `now`
            Some(next) if now_ms - next < self.interval_ms => next + self.interval_ms,
            _ => now_ms + self.interval_ms,
        };
        self.next_due_ms = Some(next);
        true
    }

    /// Frames run so far
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Callbacks that were dropped
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Forget timing history, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.next_due_ms = None;
    }
}
