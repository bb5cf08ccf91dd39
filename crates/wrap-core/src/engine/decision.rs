//! The wrap decision engine.
//!
//! [`WrapEngine::handle_mouse_move`] runs inside the low-level mouse hook on
//! every move event.  It evaluates a fixed sequence of suppression gates and
//! only consults the topology for a destination when all of them pass:
//!
//! 1. single-monitor suppression
//! 2. drag suppression (primary button held)
//! 3. anti-oscillation radius around the last wrap destination
//! 4. outer-edge detection, filtered by direction of travel
//! 5. sticky-edge dwell (when enabled, the wrap is deferred to a timer)
//! 6. wrap
//!
//! Every path records the incoming physical position as the previous
//! position, so direction is always measured against real movement rather
//! than against a teleport.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use super::movement::WrapMovementState;
use super::sticky::{StickyEdge, StickyEdgeState, StickyTimer, WrapRequest};
use super::store::{TopologySnapshot, TopologyStore};
use crate::domain::geometry::{MonitorId, Point};
use crate::domain::settings::WrapSettings;
use crate::domain::topology::{EdgeType, Topology};

/// Radius (px) around the last wrap destination inside which no new wrap may
/// trigger.
pub const WRAP_DISTANCE_THRESHOLD: i32 = 30;

/// Per-event inputs supplied by the hook collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveContext {
    pub settings: WrapSettings,
    /// Whether the primary mouse button is currently held.
    pub primary_button_down: bool,
}

impl MoveContext {
    pub fn new(settings: WrapSettings, primary_button_down: bool) -> Self {
        Self {
            settings,
            primary_button_down,
        }
    }
}

/// Returns `false` when `(dx, dy)` moves strictly away from `edge`.
fn heading_permits(edge: EdgeType, (dx, dy): (i32, i32)) -> bool {
    match edge {
        EdgeType::Left => dx <= 0,
        EdgeType::Right => dx >= 0,
        EdgeType::Top => dy <= 0,
        EdgeType::Bottom => dy >= 0,
    }
}

/// Decides, per mouse move, whether and where the cursor wraps.
///
/// Owned by the hook thread; not shared.  The topology it reads is shared
/// through the [`TopologyStore`].
pub struct WrapEngine {
    store: Arc<TopologyStore>,
    movement: WrapMovementState,
    sticky: StickyEdge,
    seen_generation: u64,
    last_settings: Option<WrapSettings>,
}

impl WrapEngine {
    pub fn new(store: Arc<TopologyStore>, timer: Box<dyn StickyTimer>) -> Self {
        let seen_generation = store.generation();
        Self {
            store,
            movement: WrapMovementState::new(),
            sticky: StickyEdge::new(timer),
            seen_generation,
            last_settings: None,
        }
    }

    pub fn movement(&self) -> &WrapMovementState {
        &self.movement
    }

    pub fn pending_sticky_edge(&self) -> Option<&StickyEdgeState> {
        self.sticky.pending()
    }

    /// Forgets movement history and cancels any pending dwell.
    pub fn reset(&mut self) {
        self.movement.reset();
        self.sticky.clear();
    }

    /// Processes one mouse-move event and returns the position the cursor
    /// should end up at.  Equal to `current` when no wrap happens.
    pub fn handle_mouse_move(&mut self, current: Point, ctx: &MoveContext) -> Point {
        let snapshot = self.store.load();
        self.sync(&snapshot, &ctx.settings);

        let result = self.decide(current, ctx, &snapshot);
        self.movement.record_position(current);
        result
    }

    /// Acts on a fired sticky-edge timer.
    ///
    /// `cursor` is the live cursor position read on the hook thread.  Returns
    /// the destination when the dwell that armed `request` is still current
    /// and the cursor is still resting on the same edge; `None` for stale or
    /// suppressed fires.
    pub fn on_sticky_timer_fired(
        &mut self,
        request: WrapRequest,
        cursor: Point,
        ctx: &MoveContext,
    ) -> Option<Point> {
        let snapshot = self.store.load();
        self.sync(&snapshot, &ctx.settings);

        let Some(state) = self.sticky.take_matching(request) else {
            debug!(token = request.token, "stale sticky-edge fire discarded");
            return None;
        };

        let settings = &ctx.settings;
        let topology = &snapshot.topology;
        if !settings.sticky_edge_enabled
            || state.generation != snapshot.generation
            || self.suppressed(topology, ctx)
        {
            debug!(trigger = ?state.trigger_position, "sticky-edge fire suppressed");
            return None;
        }

        let edge = topology
            .monitor_at(cursor)
            .filter(|m| m.id == state.trigger_monitor)
            .and_then(|m| {
                topology.find_wrappable_edge(m.id, cursor, settings.wrap_mode, |e| {
                    e == state.trigger_edge
                })
            });
        let Some(edge) = edge else {
            debug!(
                trigger = ?state.trigger_position,
                ?cursor,
                "cursor left the sticky edge before the dwell elapsed"
            );
            return None;
        };

        debug!(trigger = ?state.trigger_position, ?cursor, "sticky-edge dwell elapsed");
        Some(self.wrap(topology, state.trigger_monitor, cursor, edge))
    }

    /// Resets state when the topology generation or the settings changed
    /// since the last call.
    fn sync(&mut self, snapshot: &TopologySnapshot, settings: &WrapSettings) {
        let topology_changed = snapshot.generation != self.seen_generation;
        let settings_changed = self.last_settings.is_some_and(|s| s != *settings);
        if topology_changed || settings_changed {
            debug!(
                generation = snapshot.generation,
                topology_changed, settings_changed, "wrap state reset"
            );
            self.reset();
        }
        self.seen_generation = snapshot.generation;
        self.last_settings = Some(*settings);
    }

    /// Gates 1 and 2.
    fn suppressed(&self, topology: &Topology, ctx: &MoveContext) -> bool {
        (ctx.settings.disable_on_single_monitor && topology.monitor_count() <= 1)
            || (ctx.settings.disable_wrap_during_drag && ctx.primary_button_down)
    }

    fn decide(&mut self, current: Point, ctx: &MoveContext, snapshot: &TopologySnapshot) -> Point {
        let topology = &snapshot.topology;
        let settings = &ctx.settings;

        if self.suppressed(topology, ctx) {
            trace!(?current, "wrap suppressed (single monitor or drag)");
            self.sticky.clear();
            return current;
        }

        if let Some(dest) = self.movement.last_wrap_destination() {
            let radius = i64::from(WRAP_DISTANCE_THRESHOLD);
            if current.distance_squared(dest) <= radius * radius {
                trace!(?current, ?dest, "inside anti-oscillation radius");
                self.sticky.clear();
                return current;
            }
            self.movement.clear_wrap();
        }

        let heading = self.movement.direction_to(current);
        let Some(monitor) = topology.monitor_at(current).map(|m| m.id) else {
            return current;
        };
        let Some(edge) = topology.find_wrappable_edge(monitor, current, settings.wrap_mode, |e| {
            heading_permits(e, heading)
        }) else {
            self.sticky.clear();
            return current;
        };

        if settings.sticky_edge_enabled {
            let delay = Duration::from_millis(u64::from(settings.sticky_edge_delay_ms));
            self.sticky
                .observe(monitor, edge, current, snapshot.generation, delay);
            return current;
        }

        self.wrap(topology, monitor, current, edge)
    }

    fn wrap(
        &mut self,
        topology: &Topology,
        monitor: MonitorId,
        from: Point,
        edge: EdgeType,
    ) -> Point {
        let dest = topology.get_wrap_destination(monitor, from, edge);
        self.movement.record_wrap(dest);
        debug!(%monitor, ?edge, ?from, ?dest, "cursor wrapped");
        dest
    }
}
