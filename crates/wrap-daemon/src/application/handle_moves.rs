//! WrapHookHandler: the hook thread's mouse-move use case.
//!
//! The low-level mouse hook hands every raw move to
//! [`WrapHookHandler::on_mouse_move`] and forwards or swallows the original
//! event according to the returned [`HookDecision`].  Sticky-edge timer fires
//! arrive on the same thread as [`WrapRequest`] messages and are handled by
//! [`WrapHookHandler::on_wrap_request`].
//!
//! # Architecture
//!
//! This use case depends only on traits (`CursorController`, `PointerButtons`)
//! and `wrap_core` types.  All OS implementations are injected at
//! construction time, making it fully unit-testable.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use wrap_core::{MoveContext, Point, StickyTimer, WrapEngine, WrapRequest};

use super::state::SharedWrapState;

/// Error returned by a [`CursorController`].
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("failed to move cursor to {x},{y}: {reason}")]
    Move { x: i32, y: i32, reason: String },
    #[error("failed to read cursor position: {0}")]
    Query(String),
}

/// Trait for positioning the physical cursor.
///
/// Infrastructure implementation calls `SetCursorPos`; test implementation
/// records calls.  Must only be called from the hook thread.
pub trait CursorController {
    /// Teleports the cursor to `to` in virtual-desktop coordinates.
    fn teleport_cursor(&self, to: Point) -> Result<(), CursorError>;

    /// Returns the current cursor position in virtual-desktop coordinates.
    fn cursor_pos(&self) -> Result<Point, CursorError>;
}

/// Trait for reading mouse button state.
pub trait PointerButtons {
    /// Returns `true` while the primary button is held (honours swapped
    /// buttons).
    fn primary_button_down(&self) -> bool;
}

/// What the hook must do with the event it just reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Pass the event on to the next hook.
    Forward,
    /// The cursor was teleported; swallow the original event.
    Suppress,
}

pub struct WrapHookHandler {
    engine: WrapEngine,
    state: Arc<SharedWrapState>,
    cursor: Box<dyn CursorController>,
    buttons: Box<dyn PointerButtons>,
    was_enabled: bool,
}

impl WrapHookHandler {
    pub fn new(
        state: Arc<SharedWrapState>,
        timer: Box<dyn StickyTimer>,
        cursor: Box<dyn CursorController>,
        buttons: Box<dyn PointerButtons>,
    ) -> Self {
        let engine = WrapEngine::new(Arc::clone(state.topology()), timer);
        let was_enabled = state.is_enabled();
        Self {
            engine,
            state,
            cursor,
            buttons,
            was_enabled,
        }
    }

    pub fn engine(&self) -> &WrapEngine {
        &self.engine
    }

    /// Processes one raw mouse move reported by the hook.
    pub fn on_mouse_move(&mut self, pos: Point) -> HookDecision {
        if !self.sync_enabled() {
            return HookDecision::Forward;
        }

        let ctx = self.context();
        let dest = self.engine.handle_mouse_move(pos, &ctx);
        if dest == pos {
            return HookDecision::Forward;
        }

        match self.cursor.teleport_cursor(dest) {
            Ok(()) => HookDecision::Suppress,
            Err(e) => {
                warn!("wrap to {dest:?} failed: {e}");
                HookDecision::Forward
            }
        }
    }

    /// Acts on a sticky-edge timer fire delivered to the hook thread.
    ///
    /// Returns the destination the cursor was moved to, or `None` when the
    /// request was stale or the wrap is no longer warranted.
    pub fn on_wrap_request(&mut self, request: WrapRequest) -> Option<Point> {
        if !self.sync_enabled() {
            return None;
        }

        let cursor = match self.cursor.cursor_pos() {
            Ok(p) => p,
            Err(e) => {
                warn!("sticky-edge wrap skipped: {e}");
                return None;
            }
        };

        let ctx = self.context();
        let dest = self.engine.on_sticky_timer_fired(request, cursor, &ctx)?;
        if let Err(e) = self.cursor.teleport_cursor(dest) {
            warn!("sticky-edge wrap to {dest:?} failed: {e}");
            return None;
        }
        Some(dest)
    }

    /// Returns whether wrapping is enabled, resetting the engine when it has
    /// just been re-enabled.
    fn sync_enabled(&mut self) -> bool {
        let enabled = self.state.is_enabled();
        if enabled && !self.was_enabled {
            debug!("wrapping re-enabled; engine state reset");
            self.engine.reset();
        }
        self.was_enabled = enabled;
        enabled
    }

    fn context(&self) -> MoveContext {
        let settings = self.state.settings();
        // Button state only matters when drag suppression is on.
        let primary_button_down =
            settings.disable_wrap_during_drag && self.buttons.primary_button_down();
        MoveContext::new(settings, primary_button_down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{mock, predicate::eq};
    use std::time::Duration;
    use wrap_core::{MonitorRect, Topology, TopologyStore, WrapSettings};

    mock! {
        Cursor {}
        impl CursorController for Cursor {
            fn teleport_cursor(&self, to: Point) -> Result<(), CursorError>;
            fn cursor_pos(&self) -> Result<Point, CursorError>;
        }
    }

    mock! {
        Buttons {}
        impl PointerButtons for Buttons {
            fn primary_button_down(&self) -> bool;
        }
    }

    mock! {
        Timer {}
        impl StickyTimer for Timer {
            fn schedule(&mut self, delay: Duration, request: WrapRequest);
            fn cancel(&mut self);
        }
    }

    fn make_state(settings: WrapSettings) -> Arc<SharedWrapState> {
        let store = Arc::new(TopologyStore::new(Topology::new(vec![
            MonitorRect::new(0, 0, 0, 1920, 1080).primary(),
            MonitorRect::new(1, 1920, 0, 3840, 1080),
        ])));
        Arc::new(SharedWrapState::new(store, settings, true))
    }

    fn buttons_up() -> Box<MockButtons> {
        let mut buttons = MockButtons::new();
        buttons.expect_primary_button_down().return_const(false);
        Box::new(buttons)
    }

    fn idle_timer() -> Box<MockTimer> {
        let mut timer = MockTimer::new();
        timer.expect_schedule().return_const(());
        timer.expect_cancel().return_const(());
        Box::new(timer)
    }

    #[test]
    fn test_interior_move_is_forwarded_without_teleport() {
        // Arrange
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().times(0);
        let mut handler = WrapHookHandler::new(
            make_state(WrapSettings::default()),
            idle_timer(),
            Box::new(cursor),
            buttons_up(),
        );

        // Act
        let decision = handler.on_mouse_move(Point::new(960, 540));

        // Assert
        assert_eq!(decision, HookDecision::Forward);
    }

    #[test]
    fn test_edge_move_teleports_and_suppresses_event() {
        // Arrange
        let mut cursor = MockCursor::new();
        cursor
            .expect_teleport_cursor()
            .with(eq(Point::new(3839, 540)))
            .times(1)
            .returning(|_| Ok(()));
        let mut handler = WrapHookHandler::new(
            make_state(WrapSettings::default()),
            idle_timer(),
            Box::new(cursor),
            buttons_up(),
        );

        // Act
        let decision = handler.on_mouse_move(Point::new(0, 540));

        // Assert
        assert_eq!(decision, HookDecision::Suppress);
    }

    #[test]
    fn test_failed_teleport_forwards_original_event() {
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().returning(|to| {
            Err(CursorError::Move {
                x: to.x,
                y: to.y,
                reason: "access denied".to_string(),
            })
        });
        let mut handler = WrapHookHandler::new(
            make_state(WrapSettings::default()),
            idle_timer(),
            Box::new(cursor),
            buttons_up(),
        );

        assert_eq!(handler.on_mouse_move(Point::new(0, 540)), HookDecision::Forward);
    }

    #[test]
    fn test_button_state_not_queried_when_drag_suppression_off() {
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().returning(|_| Ok(()));
        let mut buttons = MockButtons::new();
        buttons.expect_primary_button_down().times(0);
        let settings = WrapSettings {
            disable_wrap_during_drag: false,
            ..WrapSettings::default()
        };
        let mut handler =
            WrapHookHandler::new(
                make_state(settings),
                idle_timer(),
                Box::new(cursor),
                Box::new(buttons),
            );

        assert_eq!(handler.on_mouse_move(Point::new(0, 540)), HookDecision::Suppress);
    }

    #[test]
    fn test_drag_in_progress_forwards_edge_move() {
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().times(0);
        let mut buttons = MockButtons::new();
        buttons.expect_primary_button_down().return_const(true);
        let mut handler = WrapHookHandler::new(
            make_state(WrapSettings::default()),
            idle_timer(),
            Box::new(cursor),
            Box::new(buttons),
        );

        assert_eq!(handler.on_mouse_move(Point::new(0, 540)), HookDecision::Forward);
    }

    #[test]
    fn test_disabled_wrapping_forwards_everything() {
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().times(0);
        let state = make_state(WrapSettings::default());
        state.set_enabled(false);
        let mut handler = WrapHookHandler::new(state, idle_timer(), Box::new(cursor), buttons_up());

        assert_eq!(handler.on_mouse_move(Point::new(0, 540)), HookDecision::Forward);
        assert_eq!(handler.engine().movement().previous_position(), None);
    }

    #[test]
    fn test_reenabling_resets_engine_state() {
        let mut cursor = MockCursor::new();
        cursor.expect_teleport_cursor().returning(|_| Ok(()));
        let state = make_state(WrapSettings::default());
        let mut handler =
            WrapHookHandler::new(Arc::clone(&state), idle_timer(), Box::new(cursor), buttons_up());
        handler.on_mouse_move(Point::new(0, 540));
        assert!(handler.engine().movement().last_wrap_destination().is_some());

        state.set_enabled(false);
        handler.on_mouse_move(Point::new(100, 540));
        state.set_enabled(true);
        handler.on_mouse_move(Point::new(960, 540));

        assert_eq!(handler.engine().movement().last_wrap_destination(), None);
    }

    #[test]
    fn test_wrap_request_teleports_to_live_cursor_destination() {
        // Arrange
        let settings = WrapSettings {
            sticky_edge_enabled: true,
            ..WrapSettings::default()
        };
        let mut timer = MockTimer::new();
        timer
            .expect_schedule()
            .with(eq(Duration::from_millis(300)), eq(WrapRequest { generation: 0, token: 1 }))
            .times(1)
            .return_const(());
        timer.expect_cancel().return_const(());
        let mut cursor = MockCursor::new();
        cursor.expect_cursor_pos().returning(|| Ok(Point::new(0, 540)));
        cursor
            .expect_teleport_cursor()
            .with(eq(Point::new(3839, 540)))
            .times(1)
            .returning(|_| Ok(()));
        let mut handler =
            WrapHookHandler::new(
                make_state(settings),
                Box::new(timer),
                Box::new(cursor),
                buttons_up(),
            );

        // Act
        let first = handler.on_mouse_move(Point::new(0, 540));
        let dest = handler.on_wrap_request(WrapRequest { generation: 0, token: 1 });

        // Assert
        assert_eq!(first, HookDecision::Forward);
        assert_eq!(dest, Some(Point::new(3839, 540)));
    }

    #[test]
    fn test_stale_wrap_request_is_ignored() {
        let mut cursor = MockCursor::new();
        cursor.expect_cursor_pos().returning(|| Ok(Point::new(0, 540)));
        cursor.expect_teleport_cursor().times(0);
        let mut handler = WrapHookHandler::new(
            make_state(WrapSettings::default()),
            idle_timer(),
            Box::new(cursor),
            buttons_up(),
        );

        assert_eq!(handler.on_wrap_request(WrapRequest { generation: 0, token: 42 }), None);
    }
}
