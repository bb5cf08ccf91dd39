//! Infrastructure layer for the wrap daemon.
//!
//! Contains OS-facing adapters: the low-level mouse hook, monitor
//! enumeration, the sticky-edge timer and file-system storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `wrap_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`input_capture`** – `WH_MOUSE_LL` hook thread plus the cursor and
//!   button adapters.  Recording doubles are always compiled for tests.
//!
//! - **`screen_info`** – Monitor enumeration.  On Windows it calls
//!   `EnumDisplayMonitors`; a static enumerator serves configured layouts.
//!
//! - **`timer`** – One-shot sticky-edge timer on the Tokio runtime.
//!
//! - **`storage`** – TOML configuration file.

pub mod input_capture;
pub mod screen_info;
pub mod storage;
pub mod timer;
