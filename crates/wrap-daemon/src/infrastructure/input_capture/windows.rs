//! Windows low-level mouse hook implementation.
//!
//! This module installs a `WH_MOUSE_LL` hook on a dedicated Win32
//! message-loop thread.  The thread owns the [`WrapHookHandler`] in a
//! thread-local slot; the hook callback and the sticky-edge wrap messages
//! both reach it there, so the cursor is only ever positioned from the hook
//! thread.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON, VK_RBUTTON};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetCursorPos, GetMessageW, GetSystemMetrics,
    PostThreadMessageW, SetCursorPos, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, MSG,
    MSLLHOOKSTRUCT, SM_SWAPBUTTON, WH_MOUSE_LL, WM_APP, WM_MOUSEMOVE, WM_QUIT,
};
use wrap_core::{Point, WrapRequest};

use super::CaptureError;
use crate::application::handle_moves::{
    CursorController, CursorError, HookDecision, PointerButtons, WrapHookHandler,
};
use crate::infrastructure::timer::WrapRequestSink;

/// Thread message carrying a fired sticky-edge [`WrapRequest`]
/// (`wParam` = generation, `lParam` = token).
const WM_WRAP_REQUEST: u32 = WM_APP + 1;

thread_local! {
    static HANDLER: RefCell<Option<WrapHookHandler>> = const { RefCell::new(None) };
}

// ── Cursor and button adapters ────────────────────────────────────────────────

/// [`CursorController`] backed by `SetCursorPos` / `GetCursorPos`.
pub struct Win32Cursor;

impl CursorController for Win32Cursor {
    fn teleport_cursor(&self, to: Point) -> Result<(), CursorError> {
        // SAFETY: SetCursorPos takes plain integers and has no pointer arguments.
        unsafe { SetCursorPos(to.x, to.y) }.map_err(|e| CursorError::Move {
            x: to.x,
            y: to.y,
            reason: e.to_string(),
        })
    }

    fn cursor_pos(&self) -> Result<Point, CursorError> {
        let mut pt = POINT::default();
        // SAFETY: `pt` is a valid, writable POINT for the duration of the call.
        unsafe { GetCursorPos(&mut pt) }.map_err(|e| CursorError::Query(e.to_string()))?;
        Ok(Point::new(pt.x, pt.y))
    }
}

/// [`PointerButtons`] backed by `GetAsyncKeyState`.
pub struct Win32Buttons;

impl PointerButtons for Win32Buttons {
    fn primary_button_down(&self) -> bool {
        // SAFETY: GetSystemMetrics and GetAsyncKeyState take plain values.
        unsafe {
            let swapped = GetSystemMetrics(SM_SWAPBUTTON) != 0;
            let vk = if swapped { VK_RBUTTON } else { VK_LBUTTON };
            (GetAsyncKeyState(i32::from(vk.0)) as u16 & 0x8000) != 0
        }
    }
}

// ── Request handoff ───────────────────────────────────────────────────────────

/// [`WrapRequestSink`] that posts fired timers to the hook thread's queue.
#[derive(Debug, Clone, Copy)]
pub struct HookThreadSink {
    thread_id: u32,
}

impl WrapRequestSink for HookThreadSink {
    fn post(&self, request: WrapRequest) {
        // SAFETY: PostThreadMessageW only copies the integer arguments.
        let posted = unsafe {
            PostThreadMessageW(
                self.thread_id,
                WM_WRAP_REQUEST,
                WPARAM(request.generation as usize),
                LPARAM(request.token as isize),
            )
        };
        if let Err(e) = posted {
            warn!("failed to post sticky-edge wrap request: {e}");
        }
    }
}

// ── Hook thread ───────────────────────────────────────────────────────────────

/// A running `WH_MOUSE_LL` hook and its message-loop thread.
pub struct WindowsMouseHook {
    thread_id: u32,
    thread: Option<JoinHandle<()>>,
}

impl WindowsMouseHook {
    /// Spawns the hook thread and installs the hook.
    ///
    /// `make_handler` runs on the new thread and receives the sink through
    /// which that thread accepts sticky-edge wrap requests.  Returns once
    /// the hook is installed.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] if the thread cannot be spawned or the hook
    /// cannot be installed.
    pub fn start<F>(make_handler: F) -> Result<Self, CaptureError>
    where
        F: FnOnce(HookThreadSink) -> WrapHookHandler + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, CaptureError>>();

        let thread = thread::Builder::new()
            .name("cursor-wrap-hook".to_string())
            .spawn(move || run_hook_message_loop(make_handler, ready_tx))
            .map_err(|e| CaptureError::ThreadSpawnFailed(e.to_string()))?;

        let thread_id = ready_rx.recv().map_err(|_| {
            CaptureError::MouseHookInstallFailed("hook thread exited early".to_string())
        })??;

        info!(thread_id, "mouse hook installed");
        Ok(Self {
            thread_id,
            thread: Some(thread),
        })
    }

    /// Removes the hook and joins the message-loop thread.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // SAFETY: PostThreadMessageW only copies the integer arguments.
        let posted =
            unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        if let Err(e) = posted {
            warn!("failed to stop hook thread: {e}");
            return;
        }
        if thread.join().is_err() {
            warn!("hook thread panicked");
        }
        info!("mouse hook removed");
    }
}

impl Drop for WindowsMouseHook {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop<F>(make_handler: F, ready: mpsc::Sender<Result<u32, CaptureError>>)
where
    F: FnOnce(HookThreadSink) -> WrapHookHandler,
{
    // SAFETY: GetCurrentThreadId has no preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };
    let handler = make_handler(HookThreadSink { thread_id });
    HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));

    // SAFETY: SetWindowsHookExW requires the calling thread to run a message
    // loop, which follows immediately.
    let hook = match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(CaptureError::MouseHookInstallFailed(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(thread_id));

    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            if msg.message == WM_WRAP_REQUEST {
                let request = WrapRequest {
                    generation: msg.wParam.0 as u64,
                    token: msg.lParam.0 as u64,
                };
                with_handler(|h| h.on_wrap_request(request));
                continue;
            }
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(hook).ok();
    }
    HANDLER.with(|slot| slot.borrow_mut().take());
}

/// Runs `f` against the thread's handler.  Returns `None` when there is no
/// handler or it is already borrowed (a re-entrant hook call).
fn with_handler<R>(f: impl FnOnce(&mut WrapHookHandler) -> R) -> Option<R> {
    HANDLER.with(|slot| {
        let mut guard = slot.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 || w_param.0 as u32 != WM_MOUSEMOVE {
        // SAFETY: Forward everything that is not a mouse move.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
    let pos = Point::new(mhs.pt.x, mhs.pt.y);

    if with_handler(|h| h.on_mouse_move(pos)) == Some(HookDecision::Suppress) {
        return LRESULT(1);
    }

    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
