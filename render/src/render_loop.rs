//! Two-frame animation clock polled by the host's frame loop.

use std::time::{Duration, Instant};

/// Alternates between frame 0 and frame 1 every `period` while running.
///
/// The loop owns no thread. The host calls [`RenderLoop::tick`] from its own
/// tick; missed periods are skipped rather than replayed, so a stalled host
/// advances at most one frame per call.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    period: Duration,
    next_frame: Option<Instant>,
    frame: usize,
}

impl RenderLoop {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_frame: None,
            frame: 0,
        }
    }

    /// Start (or restart) from frame 0. The first toggle is one period away.
    pub fn start(&mut self, now: Instant) {
        self.frame = 0;
        self.next_frame = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_frame = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_frame.is_some()
    }

    /// Current frame, `0` or `1`.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    /// Advance the frame if a period has elapsed. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_frame else {
            return false;
        };
        if now < due {
            return false;
        }

        self.frame ^= 1;
        let next = due + self.period;
        self.next_frame = Some(if next <= now { now + self.period } else { next });
        tracing::trace!(frame = self.frame, "Animation frame");
        true
    }
}
