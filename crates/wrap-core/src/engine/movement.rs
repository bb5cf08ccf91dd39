//! Movement history kept between mouse-move events.

use crate::domain::geometry::Point;

/// Per-hook-thread movement history.
///
/// `previous` is always the last *physical* position reported by the hook,
/// never a teleport destination, so direction is measured against real
/// movement.  `last_wrap_destination` is set after a wrap and cleared as soon
/// as the cursor leaves the anti-oscillation radius around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapMovementState {
    previous: Option<Point>,
    last_wrap_destination: Option<Point>,
}

impl WrapMovementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn previous_position(&self) -> Option<Point> {
        self.previous
    }

    pub fn last_wrap_destination(&self) -> Option<Point> {
        self.last_wrap_destination
    }

    /// Movement vector from the previous position to `current`, or zero when
    /// there is no previous position yet.
    pub fn direction_to(&self, current: Point) -> (i32, i32) {
        match self.previous {
            Some(prev) => (current.x - prev.x, current.y - prev.y),
            None => (0, 0),
        }
    }

    pub fn record_position(&mut self, current: Point) {
        self.previous = Some(current);
    }

    pub fn record_wrap(&mut self, destination: Point) {
        self.last_wrap_destination = Some(destination);
    }

    pub fn clear_wrap(&mut self) {
        self.last_wrap_destination = None;
    }
}
