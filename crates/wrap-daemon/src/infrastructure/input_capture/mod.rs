//! Mouse hook and cursor adapters.
//!
//! On Windows this installs a low-level mouse hook (`WH_MOUSE_LL`) on a
//! dedicated Win32 message-loop thread.  That thread owns the
//! [`WrapHookHandler`](crate::application::handle_moves::WrapHookHandler):
//! every move is decided synchronously inside the hook callback, and
//! sticky-edge timer fires are delivered to the same thread as thread
//! messages so the cursor is only ever positioned from the hook thread.
//!
//! # Windows-Specific Implementation
//!
//! The hook callback must complete within ~300ms or Windows will remove the
//! hook.  The wrap decision is a handful of comparisons over a few edges, so
//! it runs inline.
//!
//! # Testability
//!
//! The [`mock`] module provides recording [`CursorController`] and
//! [`PointerButtons`] doubles so the handler can be driven without hooks.
//!
//! [`CursorController`]: crate::application::handle_moves::CursorController
//! [`PointerButtons`]: crate::application::handle_moves::PointerButtons

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::application::state::SharedWrapState;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for hook installation.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install mouse hook: {0}")]
    MouseHookInstallFailed(String),
    #[error("failed to spawn hook thread: {0}")]
    ThreadSpawnFailed(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Installs the platform mouse hook with a [`WrapHookHandler`] wired to the
/// native cursor and button adapters and a Tokio-backed sticky-edge timer.
///
/// The hook stays installed until the returned value is dropped.
///
/// # Errors
///
/// Returns [`CaptureError`] if the hook cannot be installed, or
/// [`CaptureError::UnsupportedPlatform`] off Windows.
///
/// [`WrapHookHandler`]: crate::application::handle_moves::WrapHookHandler
#[cfg(target_os = "windows")]
pub fn start_native_hook(
    state: Arc<SharedWrapState>,
    runtime: Handle,
) -> Result<windows::WindowsMouseHook, CaptureError> {
    use crate::application::handle_moves::WrapHookHandler;
    use crate::infrastructure::timer::TokioStickyTimer;

    windows::WindowsMouseHook::start(move |sink| {
        WrapHookHandler::new(
            state,
            Box::new(TokioStickyTimer::new(runtime, Arc::new(sink))),
            Box::new(windows::Win32Cursor),
            Box::new(windows::Win32Buttons),
        )
    })
}

/// Off Windows there is no low-level mouse hook to install.
#[cfg(not(target_os = "windows"))]
pub fn start_native_hook(
    _state: Arc<SharedWrapState>,
    _runtime: Handle,
) -> Result<(), CaptureError> {
    Err(CaptureError::UnsupportedPlatform(std::env::consts::OS.to_string()))
}
