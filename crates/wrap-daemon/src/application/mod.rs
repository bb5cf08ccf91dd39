//! Application layer use cases for the wrap daemon.
//!
//! Use cases here orchestrate `wrap_core` types and depend only on the
//! collaborator traits they declare (`CursorController`, `PointerButtons`,
//! `MonitorEnumerator`).  The OS-facing implementations live in
//! `infrastructure` and are injected at construction time.
//!
//! # Sub-modules
//!
//! - **`handle_moves`** – Runs on the hook thread.  Feeds every mouse move
//!   into the [`wrap_core::WrapEngine`], teleports the cursor when a wrap is
//!   decided and tells the hook whether to swallow the original event.
//!
//! - **`refresh_topology`** – Enumerates monitors, rebuilds the topology,
//!   logs gap diagnostics and publishes the new snapshot.
//!
//! - **`diagnose`** – Builds the JSON topology report printed by
//!   `--diagnose`.
//!
//! - **`state`** – The settings and topology shared between the hook thread
//!   and the background services.

pub mod diagnose;
pub mod handle_moves;
pub mod refresh_topology;
pub mod state;
