//! Display-refresh timing
//!
//! Converts requestAnimationFrame timestamps (ms) into engine units and
//! decides whether another frame should be scheduled.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA};
use crate::sim::Snapshot;

/// Turns consecutive frame timestamps into engine deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame in engine units.
    ///
    /// First frame after construction or `reset` yields zero. Gaps are
    /// clamped to `MAX_FRAME_DELTA` and clocks running backwards yield zero.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last).max(0.0) as f32) / FRAME_MS,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        delta.min(MAX_FRAME_DELTA)
    }

    /// Forget the previous timestamp (after a restart or a pause)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Frame loop lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopControl {
    torn_down: bool,
}

impl LoopControl {
    /// Keep drawing while a run is live or its game-over frame is on screen
    pub fn should_schedule(&self, snap: &Snapshot) -> bool {
        !self.torn_down && (snap.is_running() || snap.is_over())
    }

    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
