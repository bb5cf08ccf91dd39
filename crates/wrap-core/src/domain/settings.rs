//! Wrap configuration values.
//!
//! The settings collaborator owns persistence; the engine receives these as
//! plain values on every call and never stores them as its own state beyond
//! remembering the last copy to detect material changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors converting raw settings values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The wrap mode integer is outside `0..=2`.
    #[error("invalid wrap mode {0}: expected 0 (both), 1 (vertical only) or 2 (horizontal only)")]
    InvalidWrapMode(u8),
}

/// Which pairs of edges may trigger a wrap.
///
/// On the settings boundary this is an integer: `0` = both, `1` = vertical
/// only (top/bottom), `2` = horizontal only (left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WrapMode {
    #[default]
    Both,
    VerticalOnly,
    HorizontalOnly,
}

impl TryFrom<u8> for WrapMode {
    type Error = SettingsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WrapMode::Both),
            1 => Ok(WrapMode::VerticalOnly),
            2 => Ok(WrapMode::HorizontalOnly),
            other => Err(SettingsError::InvalidWrapMode(other)),
        }
    }
}

impl From<WrapMode> for u8 {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Both => 0,
            WrapMode::VerticalOnly => 1,
            WrapMode::HorizontalOnly => 2,
        }
    }
}

impl WrapMode {
    /// Returns `true` if left/right edges may wrap under this mode.
    pub fn allows_horizontal(self) -> bool {
        matches!(self, WrapMode::Both | WrapMode::HorizontalOnly)
    }

    /// Returns `true` if top/bottom edges may wrap under this mode.
    pub fn allows_vertical(self) -> bool {
        matches!(self, WrapMode::Both | WrapMode::VerticalOnly)
    }
}

/// The full set of values that steer a wrap decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapSettings {
    /// Suppress wrapping while the primary mouse button is held.
    #[serde(default = "default_true")]
    pub disable_wrap_during_drag: bool,
    #[serde(default)]
    pub wrap_mode: WrapMode,
    /// Suppress wrapping entirely when only one monitor is attached.
    #[serde(default)]
    pub disable_on_single_monitor: bool,
    /// Require the cursor to dwell at the edge before wrapping.
    #[serde(default)]
    pub sticky_edge_enabled: bool,
    #[serde(default = "default_sticky_edge_delay_ms")]
    pub sticky_edge_delay_ms: u32,
}

fn default_true() -> bool {
    true
}
fn default_sticky_edge_delay_ms() -> u32 {
    300
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            disable_wrap_during_drag: default_true(),
            wrap_mode: WrapMode::default(),
            disable_on_single_monitor: false,
            sticky_edge_enabled: false,
            sticky_edge_delay_ms: default_sticky_edge_delay_ms(),
        }
    }
}
