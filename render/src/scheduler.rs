//! Decides when a verifier update becomes visible.
//!
//! Most updates are stored and painted at once. Two transitions are held
//! back for a short while because they usually flicker away again:
//! resolution errors appearing while the user is still typing, and a
//! document turning obsolete just before re-verification starts. A newer
//! update always replaces a held one.

use std::time::{Duration, Instant};

use crate::compact::StatusRanges;
use crate::render_loop::RenderLoop;
use crate::store::{DocumentDiagnostics, DocumentStore};

/// Result of handing an update to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Stored now; the caller repaints.
    Applied,
    /// Held until `until`; [`RenderScheduler::poll`] stores it then.
    Delayed { until: Instant },
}

/// Work the host owes the surface after a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWork {
    /// A held update for `uri` was stored: repaint everything.
    Repaint { uri: String },
    /// The animation advanced: repaint only the animated icons.
    Animate,
    Idle,
}

#[derive(Debug)]
struct PendingApply {
    uri: String,
    data: DocumentDiagnostics,
    deadline: Instant,
}

#[derive(Debug)]
pub struct RenderScheduler {
    delay: Duration,
    pending: Option<PendingApply>,
    animation: RenderLoop,
    /// Document whose data started the running animation.
    animated: Option<String>,
}

impl RenderScheduler {
    #[must_use]
    pub fn new(delay: Duration, animation_period: Duration) -> Self {
        Self {
            delay,
            pending: None,
            animation: RenderLoop::new(animation_period),
            animated: None,
        }
    }

    /// Whether `new` should be held back, given what is currently shown.
    #[must_use]
    pub fn must_delay(new: &StatusRanges, previous: Option<&StatusRanges>) -> bool {
        let previous_resolution = previous.is_some_and(StatusRanges::has_resolution_errors);
        let previous_obsolete = previous.is_some_and(StatusRanges::has_obsolete);

        let resolution_appeared = new.has_resolution_errors() && !previous_resolution;
        let turned_obsolete = new.has_obsolete() && !new.has_verifying() && !previous_obsolete;
        resolution_appeared || turned_obsolete
    }

    /// Store `data` for `uri` now or after the hold duration.
    ///
    /// Cancels any held update and the running animation first.
    pub fn apply(
        &mut self,
        uri: impl Into<String>,
        data: DocumentDiagnostics,
        store: &mut DocumentStore,
        now: Instant,
    ) -> ApplyOutcome {
        let uri = uri.into();
        if let Some(dropped) = self.pending.take() {
            tracing::debug!(uri = %dropped.uri, "Superseded held update");
        }
        self.stop_animation();

        let previous = store.get(&uri).map(DocumentDiagnostics::ranges);
        if Self::must_delay(data.ranges(), previous) {
            let until = now + self.delay;
            tracing::debug!(
                uri = %uri,
                delay_ms = self.delay.as_millis(),
                "Holding update"
            );
            self.pending = Some(PendingApply {
                uri,
                data,
                deadline: until,
            });
            return ApplyOutcome::Delayed { until };
        }

        tracing::debug!(uri = %uri, "Applying update");
        self.store(uri, data, store, now);
        ApplyOutcome::Applied
    }

    fn store(&mut self, uri: String, data: DocumentDiagnostics, store: &mut DocumentStore, now: Instant) {
        if data.ranges().has_verifying() {
            self.animation.start(now);
            self.animated = Some(uri.clone());
        }
        store.put(uri, data);
    }

    fn stop_animation(&mut self) {
        self.animation.stop();
        self.animated = None;
    }

    /// Flush a held update whose time has come, or advance the animation.
    pub fn poll(&mut self, store: &mut DocumentStore, now: Instant) -> RenderWork {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline)
            && let Some(PendingApply { uri, data, .. }) = self.pending.take()
        {
            tracing::debug!(uri = %uri, "Applying held update");
            self.store(uri.clone(), data, store, now);
            return RenderWork::Repaint { uri };
        }
        if self.animation.tick(now) {
            return RenderWork::Animate;
        }
        RenderWork::Idle
    }

    /// Drop a held update and stop the animation belonging to a closed document.
    pub fn cancel_for(&mut self, uri: &str) {
        if self.pending.as_ref().is_some_and(|p| p.uri == uri) {
            tracing::debug!(uri = %uri, "Dropping held update for closed document");
            self.pending = None;
        }
        if self.animated.as_deref() == Some(uri) {
            tracing::debug!(uri = %uri, "Stopping animation for closed document");
            self.stop_animation();
        }
    }

    /// Earliest instant at which [`RenderScheduler::poll`] has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.as_ref().map(|p| p.deadline);
        match (pending, self.animation.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// Current animation frame, `0` or `1`.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.animation.frame()
    }
}
