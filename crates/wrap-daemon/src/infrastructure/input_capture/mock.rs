//! Recording cursor and button doubles for tests.
//!
//! Allow tests to drive a [`WrapHookHandler`] without a running Windows
//! message loop or OS hooks.  Clones share state, so a test can keep one
//! handle while the handler owns another.
//!
//! [`WrapHookHandler`]: crate::application::handle_moves::WrapHookHandler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use wrap_core::Point;

use crate::application::handle_moves::{CursorController, CursorError, PointerButtons};

/// A [`CursorController`] that records teleports and tracks the position.
#[derive(Clone, Default)]
pub struct RecordingCursor {
    position: Arc<Mutex<Point>>,
    teleports: Arc<Mutex<Vec<Point>>>,
}

impl RecordingCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user moving the mouse without a hook event.
    pub fn move_to(&self, p: Point) {
        *self.position.lock().expect("lock poisoned") = p;
    }

    /// Every point passed to `teleport_cursor`, in order.
    pub fn teleports(&self) -> Vec<Point> {
        self.teleports.lock().expect("lock poisoned").clone()
    }
}

impl CursorController for RecordingCursor {
    fn teleport_cursor(&self, to: Point) -> Result<(), CursorError> {
        self.teleports.lock().expect("lock poisoned").push(to);
        *self.position.lock().expect("lock poisoned") = to;
        Ok(())
    }

    fn cursor_pos(&self) -> Result<Point, CursorError> {
        Ok(*self.position.lock().expect("lock poisoned"))
    }
}

/// [`PointerButtons`] whose primary button state is set by the test.
#[derive(Clone, Default)]
pub struct FakeButtons {
    primary: Arc<AtomicBool>,
}

impl FakeButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_primary_down(&self, down: bool) {
        self.primary.store(down, Ordering::SeqCst);
    }
}

impl PointerButtons for FakeButtons {
    fn primary_button_down(&self) -> bool {
        self.primary.load(Ordering::SeqCst)
    }
}
