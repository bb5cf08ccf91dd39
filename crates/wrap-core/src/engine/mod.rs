//! Engine layer: per-event wrap decisions on top of a published topology.
//!
//! - [`store`] – atomic publication of [`crate::domain::topology::Topology`]
//!   snapshots tagged with a generation number.
//! - [`movement`] – previous position and last wrap destination.
//! - [`sticky`] – dwell timer state machine and the [`sticky::StickyTimer`] seam.
//! - [`decision`] – [`decision::WrapEngine`], the gate sequence run on every
//!   mouse move.

pub mod decision;
pub mod movement;
pub mod sticky;
pub mod store;
