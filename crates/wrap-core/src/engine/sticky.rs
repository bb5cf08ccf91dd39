//! Sticky-edge dwell: the cursor must rest on a wrappable edge for a
//! configured delay before the wrap executes.
//!
//! The timer fires on a timer thread, not on the hook thread that owns the
//! engine.  It never touches engine state directly: it hands a
//! [`WrapRequest`] back to the hook thread, which acts on it only if the
//! request still matches the pending dwell (same token, same topology
//! generation).  A fire that lost a race with a cancel is discarded there.

use std::time::Duration;

use tracing::debug;

use crate::domain::geometry::{MonitorId, Point};
use crate::domain::topology::EdgeType;

/// Message a fired timer posts back to the hook thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapRequest {
    /// Topology generation the dwell was armed under.
    pub generation: u64,
    /// Identifies the dwell that armed the timer.
    pub token: u64,
}

/// One-shot, cancelable timer facility.
///
/// Implementations must run the delay off the hook thread and deliver the
/// request through a thread-safe handoff.  At most one timer may be live:
/// `schedule` replaces any pending one.  `cancel` must be synchronous and
/// idempotent; a fire that races a cancel is tolerated downstream.
pub trait StickyTimer: Send {
    fn schedule(&mut self, delay: Duration, request: WrapRequest);
    fn cancel(&mut self);
}

/// The edge condition a pending dwell was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyEdgeState {
    /// Where the dwell was armed.  Reported when the fire is handled; the
    /// wrap itself starts from the live cursor.
    pub trigger_position: Point,
    pub trigger_edge: EdgeType,
    pub trigger_monitor: MonitorId,
    pub generation: u64,
    pub token: u64,
}

/// Dwell state machine.  Idle when `pending` is `None`.
pub struct StickyEdge {
    timer: Box<dyn StickyTimer>,
    pending: Option<StickyEdgeState>,
    next_token: u64,
}

impl StickyEdge {
    pub fn new(timer: Box<dyn StickyTimer>) -> Self {
        Self {
            timer,
            pending: None,
            next_token: 1,
        }
    }

    pub fn pending(&self) -> Option<&StickyEdgeState> {
        self.pending.as_ref()
    }

    /// Records that the cursor is on `edge` of `monitor`.
    ///
    /// Arms a timer when idle, keeps the running timer while the cursor
    /// stays on the same edge, and cancels then re-arms when it has moved to
    /// a different edge.
    pub fn observe(
        &mut self,
        monitor: MonitorId,
        edge: EdgeType,
        position: Point,
        generation: u64,
        delay: Duration,
    ) {
        if let Some(p) = &self.pending {
            if p.trigger_monitor == monitor
                && p.trigger_edge == edge
                && p.generation == generation
            {
                return;
            }
            self.timer.cancel();
        }

        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.pending = Some(StickyEdgeState {
            trigger_position: position,
            trigger_edge: edge,
            trigger_monitor: monitor,
            generation,
            token,
        });
        debug!(%monitor, ?edge, token, delay_ms = delay.as_millis() as u64, "sticky edge armed");
        self.timer.schedule(delay, WrapRequest { generation, token });
    }

    /// Cancels any pending dwell.  Safe to call when idle.
    pub fn clear(&mut self) {
        if let Some(p) = self.pending.take() {
            debug!(token = p.token, "sticky edge cancelled");
            self.timer.cancel();
        }
    }

    /// Consumes the pending dwell if `request` was issued for it.
    ///
    /// The timer has already fired, so it is not cancelled.  Returns `None`
    /// and leaves state untouched for stale requests.
    pub fn take_matching(&mut self, request: WrapRequest) -> Option<StickyEdgeState> {
        match self.pending {
            Some(p) if p.token == request.token && p.generation == request.generation => {
                self.pending = None;
                Some(p)
            }
            _ => None,
        }
    }
}
