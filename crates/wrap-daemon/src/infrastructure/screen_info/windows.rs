//! Windows monitor enumeration via `EnumDisplayMonitors` / `GetMonitorInfoW`.

use windows::core::BOOL;
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOF_PRIMARY,
};
use wrap_core::MonitorRect;

use crate::application::refresh_topology::{MonitorEnumerator, ScreenError};

/// Monitor rectangle as reported by Win32, before ids are assigned.
struct RawMonitor {
    rect: RECT,
    is_primary: bool,
}

/// Windows implementation of [`MonitorEnumerator`].
pub struct WindowsMonitorEnumerator;

impl WindowsMonitorEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsMonitorEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorEnumerator for WindowsMonitorEnumerator {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorRect>, ScreenError> {
        let mut raw: Vec<RawMonitor> = Vec::new();

        // SAFETY: `lpfn` has the correct signature.  `dwData` points to `raw`,
        // which outlives this synchronous call.  A null HDC enumerates every
        // monitor on the virtual desktop.
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut raw as *mut Vec<RawMonitor> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(ScreenError::Platform("EnumDisplayMonitors failed".to_string()));
        }

        // Ordinals follow position so they are stable across enumerations.
        raw.sort_by_key(|m| (m.rect.left, m.rect.top));

        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let r = m.rect;
                let rect = MonitorRect::new(i as u32, r.left, r.top, r.right, r.bottom);
                if m.is_primary {
                    rect.primary()
                } else {
                    rect
                }
            })
            .collect())
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`.  `lparam` must be a valid
/// pointer to `Vec<RawMonitor>` for the duration of the enumeration call.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<RawMonitor>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: `hmonitor` is a valid handle provided by Win32.
    if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        monitors.push(RawMonitor {
            rect: info.rcMonitor,
            is_primary: (info.dwFlags & MONITORINFOF_PRIMARY) != 0,
        });
    }

    BOOL(1) // continue enumeration
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// The monitor count depends on the test machine, so only shape is checked.
    #[test]
    fn test_windows_enumerator_assigns_sequential_ids() {
        let monitors = WindowsMonitorEnumerator::new()
            .enumerate_monitors()
            .expect("enumerate");
        for (i, m) in monitors.iter().enumerate() {
            assert_eq!(m.id.0 as usize, i, "ids must be sequential");
            assert!(m.right > m.left && m.bottom > m.top);
        }
    }

    #[test]
    fn test_windows_enumerator_reports_at_most_one_primary() {
        let monitors = WindowsMonitorEnumerator::new()
            .enumerate_monitors()
            .expect("enumerate");
        assert!(monitors.iter().filter(|m| m.is_primary).count() <= 1);
    }
}
