//! Points and monitor rectangles in virtual-desktop coordinates.
//!
//! The virtual desktop is the union of all monitors.  Its origin is the
//! top-left corner of the primary monitor, so monitors placed to the left of
//! or above the primary have negative coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cursor position in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`, widened and saturating so it
    /// never overflows.
    pub fn distance_squared(&self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

/// Stable ordinal assigned to a monitor at enumeration time.
///
/// Replaces native monitor handles so the topology never depends on handle
/// lifetime or equality semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub u32);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An axis-aligned monitor rectangle.
///
/// `right` and `bottom` are exclusive, matching the OS monitor rectangle
/// convention: a 1920×1080 monitor at the origin is `(0, 0, 1920, 1080)` and
/// its last pixel column is `x = 1919`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRect {
    pub id: MonitorId,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub is_primary: bool,
}

impl MonitorRect {
    pub fn new(id: u32, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            id: MonitorId(id),
            left,
            top,
            right,
            bottom,
            is_primary: false,
        }
    }

    /// Marks this rectangle as the primary monitor.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if `p` lies on one of this monitor's pixels.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Clamps `p` onto the nearest pixel of this monitor.
    pub fn clamp(&self, p: Point) -> Point {
        Point {
            x: p.x.clamp(self.left, (self.right - 1).max(self.left)),
            y: p.y.clamp(self.top, (self.bottom - 1).max(self.top)),
        }
    }

    /// Squared distance from `p` to the nearest pixel of this monitor
    /// (zero when `p` is inside).
    pub fn distance_squared_to(&self, p: Point) -> i64 {
        self.clamp(p).distance_squared(p)
    }

    /// Length of the shared extent on the Y axis (negative when disjoint).
    pub fn vertical_overlap(&self, other: &MonitorRect) -> i32 {
        self.bottom.min(other.bottom) - self.top.max(other.top)
    }

    /// Length of the shared extent on the X axis (negative when disjoint).
    pub fn horizontal_overlap(&self, other: &MonitorRect) -> i32 {
        self.right.min(other.right) - self.left.max(other.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance_squared_is_symmetric() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
    }

    #[test]
    fn test_point_distance_squared_does_not_overflow_at_extremes() {
        let a = Point::new(i32::MIN, i32::MIN);
        let b = Point::new(i32::MAX, i32::MAX);
        assert!(a.distance_squared(b) > 0);
    }

    #[test]
    fn test_monitor_rect_contains_excludes_right_and_bottom() {
        let m = MonitorRect::new(0, 0, 0, 1920, 1080);
        assert!(m.contains(Point::new(0, 0)));
        assert!(m.contains(Point::new(1919, 1079)));
        assert!(!m.contains(Point::new(1920, 500)));
        assert!(!m.contains(Point::new(500, 1080)));
    }

    #[test]
    fn test_monitor_rect_clamp_pulls_outside_point_onto_last_pixel() {
        let m = MonitorRect::new(0, 0, 0, 1920, 1080);
        assert_eq!(m.clamp(Point::new(-40, 2000)), Point::new(0, 1079));
        assert_eq!(m.clamp(Point::new(5000, -1)), Point::new(1919, 0));
    }

    #[test]
    fn test_monitor_rect_distance_is_zero_inside() {
        let m = MonitorRect::new(0, -1920, 0, 0, 1080);
        assert_eq!(m.distance_squared_to(Point::new(-100, 100)), 0);
        assert_eq!(m.distance_squared_to(Point::new(10, 100)), 121);
    }

    #[test]
    fn test_monitor_rect_overlaps_for_side_by_side_monitors() {
        let a = MonitorRect::new(0, 0, 0, 1920, 1080);
        let b = MonitorRect::new(1, 1920, 200, 3840, 1280);
        assert_eq!(a.vertical_overlap(&b), 880);
        assert_eq!(a.horizontal_overlap(&b), 0);
    }

    #[test]
    fn test_monitor_id_displays_with_hash_prefix() {
        assert_eq!(MonitorId(3).to_string(), "#3");
    }
}
