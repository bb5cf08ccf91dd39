//! Platform-specific monitor enumeration.
//!
//! Implements the [`MonitorEnumerator`] collaborator the topology refresh
//! depends on.  Each monitor gets a stable ordinal [`MonitorId`] assigned at
//! enumeration time; native handles never leave this module.
//!
//! | Implementation               | Source                                      |
//! |------------------------------|---------------------------------------------|
//! | `windows::WindowsMonitorEnumerator` | `EnumDisplayMonitors` + `GetMonitorInfoW` |
//! | [`StaticMonitorEnumerator`]  | a fixed list (config `[[monitors]]`, tests) |
//!
//! [`MonitorId`]: wrap_core::MonitorId

use wrap_core::MonitorRect;

use crate::application::refresh_topology::{MonitorEnumerator, ScreenError};

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

/// Returns the OS monitor enumerator for this platform.
///
/// # Errors
///
/// Returns [`ScreenError::Platform`] on platforms without an implementation.
pub fn native_enumerator() -> Result<Box<dyn MonitorEnumerator>, ScreenError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Box::new(windows::WindowsMonitorEnumerator::new()))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(ScreenError::Platform(format!(
            "no native monitor enumeration on {}; configure [[monitors]] instead",
            std::env::consts::OS
        )))
    }
}

// ── Static implementation ─────────────────────────────────────────────────────

/// An enumerator that always returns the same monitors.
///
/// Used for layouts pinned in the config file and in tests.  Does not make
/// any OS calls.
#[derive(Debug, Clone)]
pub struct StaticMonitorEnumerator {
    monitors: Vec<MonitorRect>,
}

impl StaticMonitorEnumerator {
    pub fn new(monitors: Vec<MonitorRect>) -> Self {
        Self { monitors }
    }

    /// A single 1920×1080 primary monitor.
    pub fn single_1080p() -> Self {
        Self::new(vec![MonitorRect::new(0, 0, 0, 1920, 1080).primary()])
    }

    /// Two 1920×1080 monitors side by side, primary on the left.
    pub fn dual_1080p() -> Self {
        Self::new(vec![
            MonitorRect::new(0, 0, 0, 1920, 1080).primary(),
            MonitorRect::new(1, 1920, 0, 3840, 1080),
        ])
    }
}

impl MonitorEnumerator for StaticMonitorEnumerator {
    /// Returns the monitors provided at construction time (never fails).
    fn enumerate_monitors(&self) -> Result<Vec<MonitorRect>, ScreenError> {
        Ok(self.monitors.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
