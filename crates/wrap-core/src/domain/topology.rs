//! Monitor topology: edge classification and wrap-destination mapping.
//!
//! A [`Topology`] is built from a flat list of monitor rectangles.  Each
//! monitor contributes four [`Edge`]s.  An edge is *internal* when another
//! monitor's opposite edge lies within [`ADJACENCY_TOLERANCE`] of it and the
//! two overlap along their length by more than the tolerance; every other
//! edge is *outer* and faces open space.  Only outer edges can trigger a wrap.
//!
//! Monitor rectangles are not guaranteed to be contiguous or aligned, so the
//! tolerance absorbs the few pixels of DPI/snapping rounding the OS display
//! settings leave between monitors that are logically touching.
//!
//! A topology is immutable once built.  When the display configuration
//! changes a new one is built and published wholesale (see
//! [`crate::engine::store::TopologyStore`]).

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::geometry::{MonitorId, MonitorRect, Point};
use super::settings::WrapMode;

/// Pixel slack allowed when deciding whether two facing edges touch.
pub const ADJACENCY_TOLERANCE: i32 = 50;

/// Number of outermost pixel rows/columns that count as "on the edge".
const EDGE_BAND: i32 = 1;

/// Inset used when a wrap lands on the source monitor itself.
const SAME_MONITOR_INSET: i32 = 2;

/// The four sides of a monitor rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EdgeType {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeType {
    /// All edge types in candidate order.
    pub const ALL: [EdgeType; 4] = [
        EdgeType::Left,
        EdgeType::Right,
        EdgeType::Top,
        EdgeType::Bottom,
    ];

    /// `Left`↔`Right`, `Top`↔`Bottom`.
    pub fn opposite(self) -> Self {
        match self {
            EdgeType::Left => EdgeType::Right,
            EdgeType::Right => EdgeType::Left,
            EdgeType::Top => EdgeType::Bottom,
            EdgeType::Bottom => EdgeType::Top,
        }
    }

    /// `true` for `Left`/`Right`, whose edges run vertically and are
    /// positioned on the X axis.
    pub fn is_side(self) -> bool {
        matches!(self, EdgeType::Left | EdgeType::Right)
    }

    /// Returns `true` if `mode` permits wrapping across this edge.
    pub fn allowed_by(self, mode: WrapMode) -> bool {
        if self.is_side() {
            mode.allows_horizontal()
        } else {
            mode.allows_vertical()
        }
    }

    /// The coordinate of `p` along this edge's own axis.
    fn along(self, p: Point) -> i32 {
        if self.is_side() {
            p.y
        } else {
            p.x
        }
    }

    /// The coordinate of `p` on the axis perpendicular to this edge.
    fn across(self, p: Point) -> i32 {
        if self.is_side() {
            p.x
        } else {
            p.y
        }
    }
}

/// One side of one monitor.
///
/// `position` is the edge's coordinate on the perpendicular axis: `left` for
/// `Left`, `right - 1` for `Right`, `top` for `Top`, `bottom - 1` for
/// `Bottom`.  Touching edges of contiguous monitors therefore land exactly
/// one pixel apart.  `start..=end` is the edge's extent along its own axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub monitor: MonitorId,
    pub edge_type: EdgeType,
    pub position: i32,
    pub start: i32,
    pub end: i32,
    pub is_outer: bool,
}

impl Edge {
    fn of(monitor: &MonitorRect, edge_type: EdgeType) -> Self {
        let (position, start, end) = match edge_type {
            EdgeType::Left => (monitor.left, monitor.top, monitor.bottom),
            EdgeType::Right => (monitor.right - 1, monitor.top, monitor.bottom),
            EdgeType::Top => (monitor.top, monitor.left, monitor.right),
            EdgeType::Bottom => (monitor.bottom - 1, monitor.left, monitor.right),
        };
        Self {
            monitor: monitor.id,
            edge_type,
            position,
            start,
            end,
            is_outer: true,
        }
    }

    /// Returns `true` if `coord` falls within `start..=end`.
    pub fn contains(&self, coord: i32) -> bool {
        coord >= self.start && coord <= self.end
    }

    /// Returns `true` if `other` is a neighbouring monitor's facing edge.
    fn abuts(&self, other: &Edge) -> bool {
        if other.edge_type != self.edge_type.opposite() {
            return false;
        }
        if (self.position - other.position).abs() > ADJACENCY_TOLERANCE {
            return false;
        }
        let overlap = self.end.min(other.end) - self.start.max(other.start);
        overlap > ADJACENCY_TOLERANCE
    }

    /// Returns `true` if `self` lies further in the wrap direction of a
    /// `source` edge than `other` does.
    fn is_further_than(&self, other: &Edge, source: EdgeType) -> bool {
        match source {
            // Leaving through a left/top edge re-enters at the largest right/bottom.
            EdgeType::Left | EdgeType::Top => self.position > other.position,
            EdgeType::Right | EdgeType::Bottom => self.position < other.position,
        }
    }
}

/// All edges of a topology, keyed by owning monitor and side.
pub type EdgeMap = BTreeMap<(MonitorId, EdgeType), Edge>;

/// Synthesises the four edges of every monitor, all initially outer.
pub fn build_edge_map(monitors: &[MonitorRect]) -> EdgeMap {
    let mut edges = EdgeMap::new();
    for monitor in monitors {
        for edge_type in EdgeType::ALL {
            edges.insert((monitor.id, edge_type), Edge::of(monitor, edge_type));
        }
    }
    edges
}

/// Clears `is_outer` on every edge that abuts another monitor's opposite
/// edge, and returns the edges that remain outer.
///
/// O(n²) over the edge count, which is four times a handful of monitors.
pub fn identify_outer_edges(edges: &mut EdgeMap) -> Vec<Edge> {
    let all: Vec<Edge> = edges.values().copied().collect();
    for edge in edges.values_mut() {
        let has_neighbour = all
            .iter()
            .any(|other| other.monitor != edge.monitor && edge.abuts(other));
        edge.is_outer = !has_neighbour;
    }
    edges.values().filter(|e| e.is_outer).copied().collect()
}

/// Which axis a [`GapInfo`] was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapAxis {
    /// Monitors share vertical extent but are separated left-to-right.
    Horizontal,
    /// Monitors share horizontal extent but are separated top-to-bottom.
    Vertical,
}

/// Two monitors that look side by side but are too far apart to be treated
/// as adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapInfo {
    pub first: MonitorId,
    pub second: MonitorId,
    pub axis: GapAxis,
    /// Distance between the facing sides, in pixels.
    pub gap: i32,
    /// Shared extent on the other axis, in pixels.
    pub overlap: i32,
}

/// Reports monitor pairs that overlap on one axis but are separated on the
/// other by more than [`ADJACENCY_TOLERANCE`].
///
/// This is the usual symptom of monitors that look adjacent in the OS display
/// settings but are not snapped together, so their shared seam is classified
/// as two outer edges.  Diagnostic only; the decision engine never reads it.
///
/// For every pair sharing vertical extent the horizontal gap is the smaller
/// of `|m1.right - m2.left|` and `|m2.right - m1.left|`, so overlapping or
/// duplicated rectangles are reported too.  Pairs sharing only horizontal
/// extent are measured the same way top-to-bottom.
pub fn detect_monitor_gaps(monitors: &[MonitorRect]) -> Vec<GapInfo> {
    let mut gaps = Vec::new();
    for (i, m1) in monitors.iter().enumerate() {
        for m2 in &monitors[i + 1..] {
            let v_overlap = m1.vertical_overlap(m2);
            let h_overlap = m1.horizontal_overlap(m2);

            if v_overlap > 0 {
                let gap = (m1.right - m2.left).abs().min((m2.right - m1.left).abs());
                if gap > ADJACENCY_TOLERANCE {
                    gaps.push(GapInfo {
                        first: m1.id,
                        second: m2.id,
                        axis: GapAxis::Horizontal,
                        gap,
                        overlap: v_overlap,
                    });
                }
            } else if h_overlap > 0 && v_overlap <= 0 {
                let gap = (m1.bottom - m2.top).abs().min((m2.bottom - m1.top).abs());
                if gap > ADJACENCY_TOLERANCE {
                    gaps.push(GapInfo {
                        first: m1.id,
                        second: m2.id,
                        axis: GapAxis::Vertical,
                        gap,
                        overlap: h_overlap,
                    });
                }
            }
        }
    }
    gaps
}

/// Maps `along` proportionally from `from.start..=from.end` onto
/// `to.start..=to.end`, landing on a real pixel of the target edge.
fn map_along(from: &Edge, to: &Edge, along: i32) -> i32 {
    let from_len = from.end - from.start;
    if from_len <= 0 {
        return to.start;
    }
    let t = f64::from(along.clamp(from.start, from.end) - from.start) / f64::from(from_len);
    let mapped = to.start + (t * f64::from(to.end - to.start)) as i32;
    mapped.clamp(to.start, (to.end - 1).max(to.start))
}

/// An immutable snapshot of the monitor arrangement with classified edges.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    monitors: Vec<MonitorRect>,
    edges: EdgeMap,
    outer_edges: Vec<Edge>,
}

impl Topology {
    /// Builds and classifies a topology from enumerated monitors.
    ///
    /// Monitor ids must be unique.  An empty list yields an inert topology
    /// with no outer edges.
    pub fn new(monitors: Vec<MonitorRect>) -> Self {
        let mut edges = build_edge_map(&monitors);
        let outer_edges = identify_outer_edges(&mut edges);
        debug!(
            monitors = monitors.len(),
            edges = edges.len(),
            outer = outer_edges.len(),
            "topology built"
        );
        Self {
            monitors,
            edges,
            outer_edges,
        }
    }

    /// A topology with no monitors.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn monitors(&self) -> &[MonitorRect] {
        &self.monitors
    }

    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    pub fn monitor(&self, id: MonitorId) -> Option<&MonitorRect> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn edge(&self, monitor: MonitorId, edge_type: EdgeType) -> Option<&Edge> {
        self.edges.get(&(monitor, edge_type))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn outer_edges(&self) -> &[Edge] {
        &self.outer_edges
    }

    /// Returns the monitor containing `p`, or the nearest one when `p` lies
    /// outside every monitor (a raw hook point can overshoot the desktop).
    pub fn monitor_at(&self, p: Point) -> Option<&MonitorRect> {
        self.monitors
            .iter()
            .find(|m| m.contains(p))
            .or_else(|| self.monitors.iter().min_by_key(|m| m.distance_squared_to(p)))
    }

    /// Returns the wrap-actionable outer edge of `monitor` that `p` sits on.
    ///
    /// Only edge types permitted by `mode` are considered.  At a corner more
    /// than one edge may qualify; the first (in [`EdgeType::ALL`] order) that
    /// has an opposite outer edge wins.
    pub fn is_on_outer_edge(
        &self,
        monitor: MonitorId,
        p: Point,
        mode: WrapMode,
    ) -> Option<EdgeType> {
        self.find_wrappable_edge(monitor, p, mode, |_| true)
    }

    /// Like [`Topology::is_on_outer_edge`], with an extra caller-supplied
    /// filter applied to each candidate before its opposite is looked up.
    pub fn find_wrappable_edge<F>(
        &self,
        monitor: MonitorId,
        p: Point,
        mode: WrapMode,
        permit: F,
    ) -> Option<EdgeType>
    where
        F: Fn(EdgeType) -> bool,
    {
        let rect = self.monitor(monitor)?;
        let c = rect.clamp(p);

        EdgeType::ALL
            .into_iter()
            .filter(|t| t.allowed_by(mode) && permit(*t))
            .filter(|t| {
                self.edge(monitor, *t)
                    .is_some_and(|e| e.is_outer && (t.across(c) - e.position).abs() < EDGE_BAND)
            })
            .find(|t| self.find_opposite_outer_edge(*t, t.along(c)).is_some())
    }

    /// Finds the outer edge a cursor leaving through an `edge_type` edge at
    /// `along` should re-enter from.
    ///
    /// Among outer edges of the opposite type whose extent contains `along`,
    /// picks the one furthest in the wrap direction, so the cursor always
    /// reappears on the outermost boundary of the far side rather than on an
    /// intermediate monitor.
    pub fn find_opposite_outer_edge(&self, edge_type: EdgeType, along: i32) -> Option<&Edge> {
        self.opposite_outer_edge(edge_type, along, None)
    }

    /// [`Topology::find_opposite_outer_edge`] restricted to edges not owned
    /// by `exclude`.
    fn opposite_outer_edge(
        &self,
        edge_type: EdgeType,
        along: i32,
        exclude: Option<MonitorId>,
    ) -> Option<&Edge> {
        let target = edge_type.opposite();
        self.outer_edges
            .iter()
            .filter(|e| e.edge_type == target && e.contains(along))
            .filter(|e| Some(e.monitor) != exclude)
            .fold(None, |best: Option<&Edge>, e| match best {
                Some(b) if !e.is_further_than(b, edge_type) => Some(b),
                _ => Some(e),
            })
    }

    /// Computes where the cursor at `p` on `from`'s `edge_type` edge should
    /// be moved.
    ///
    /// The target is the furthest opposite outer edge owned by another
    /// monitor, and the cursor keeps its fractional position along the
    /// boundary.  When no other monitor's outer edge contains the coordinate
    /// the cursor is moved 2px inside `from` on the opposite side so it
    /// cannot immediately re-trigger.  An unknown monitor leaves `p`
    /// unchanged.
    pub fn get_wrap_destination(&self, from: MonitorId, p: Point, edge_type: EdgeType) -> Point {
        let (Some(rect), Some(source)) = (self.monitor(from), self.edge(from, edge_type)) else {
            return p;
        };
        let c = rect.clamp(p);
        let along = edge_type.along(c);

        match self.opposite_outer_edge(edge_type, along, Some(from)) {
            Some(target) => {
                let mapped = map_along(source, target, along);
                if edge_type.is_side() {
                    Point::new(target.position, mapped)
                } else {
                    Point::new(mapped, target.position)
                }
            }
            None => match edge_type {
                EdgeType::Left => Point::new(rect.right - SAME_MONITOR_INSET, c.y),
                EdgeType::Right => Point::new(rect.left + SAME_MONITOR_INSET, c.y),
                EdgeType::Top => Point::new(c.x, rect.bottom - SAME_MONITOR_INSET),
                EdgeType::Bottom => Point::new(c.x, rect.top + SAME_MONITOR_INSET),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
