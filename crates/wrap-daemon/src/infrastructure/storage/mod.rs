//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Resolving the TOML configuration file in the platform-appropriate
//!   directory, or at an explicit `--config` path.
//! - Reading it, with defaults for every missing key (first run, older files).
//! - Writing a default file for `--init-config`.

pub mod config;
