//! # wrap-core
//!
//! Monitor topology and cursor-wrap decision logic for Cursor-Wrap.
//!
//! This crate has zero dependencies on OS APIs.  Monitor rectangles come in,
//! wrap decisions come out; the hook, the cursor-positioning call and the
//! timer facility are supplied by the host through small traits.
//!
//! # Architecture overview
//!
//! Cursor-Wrap turns the outer boundary of a multi-monitor desktop into a
//! torus: pushing the cursor against the far-left edge makes it reappear on
//! the far-right edge at the same relative height, and likewise for top and
//! bottom.
//!
//! - **`domain`** – Pure geometry.  [`Topology`] classifies every monitor edge
//!   as *outer* (faces open space) or *internal* (abuts a neighbour) and maps a
//!   point on one outer edge to the matching point on the opposite one.
//!
//! - **`engine`** – The per-mouse-move decision state machine.  [`WrapEngine`]
//!   applies the suppression gates (single monitor, drag, anti-oscillation,
//!   direction, sticky-edge dwell) and reads the current topology from a
//!   [`TopologyStore`] that the display-change side swaps atomically.

pub mod domain;
pub mod engine;

pub use domain::geometry::{MonitorId, MonitorRect, Point};
pub use domain::settings::{SettingsError, WrapMode, WrapSettings};
pub use domain::topology::{
    detect_monitor_gaps, Edge, EdgeMap, EdgeType, GapAxis, GapInfo, Topology,
    ADJACENCY_TOLERANCE,
};
pub use engine::decision::{MoveContext, WrapEngine, WRAP_DISTANCE_THRESHOLD};
pub use engine::sticky::{StickyTimer, WrapRequest};
pub use engine::store::{TopologySnapshot, TopologyStore};
