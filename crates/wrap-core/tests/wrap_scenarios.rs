//! End-to-end wrap scenarios.
//!
//! These tests drive [`WrapEngine`] the way the hook thread does: a stream of
//! raw mouse positions in, cursor positions out, with the topology published
//! through a shared [`TopologyStore`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wrap_core::{
    detect_monitor_gaps, EdgeType, MonitorId, MonitorRect, MoveContext, Point, StickyTimer,
    Topology, TopologyStore, WrapEngine, WrapMode, WrapRequest, WrapSettings,
    WRAP_DISTANCE_THRESHOLD,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Timer that remembers the last scheduled request and never fires by itself.
#[derive(Clone, Default)]
struct ManualTimer {
    scheduled: Arc<Mutex<Option<WrapRequest>>>,
}

impl ManualTimer {
    fn take(&self) -> Option<WrapRequest> {
        self.scheduled.lock().unwrap().take()
    }
}

impl StickyTimer for ManualTimer {
    fn schedule(&mut self, _delay: Duration, request: WrapRequest) {
        *self.scheduled.lock().unwrap() = Some(request);
    }

    fn cancel(&mut self) {
        *self.scheduled.lock().unwrap() = None;
    }
}

fn engine_for(monitors: Vec<MonitorRect>) -> (WrapEngine, Arc<TopologyStore>, ManualTimer) {
    let store = Arc::new(TopologyStore::new(Topology::new(monitors)));
    let timer = ManualTimer::default();
    let engine = WrapEngine::new(Arc::clone(&store), Box::new(timer.clone()));
    (engine, store, timer)
}

fn side_by_side() -> Vec<MonitorRect> {
    vec![
        MonitorRect::new(0, 0, 0, 1920, 1080).primary(),
        MonitorRect::new(1, 1920, 0, 3840, 1080),
    ]
}

/// Feeds `path` through the engine and returns every output position.
fn drive(engine: &mut WrapEngine, ctx: &MoveContext, path: &[Point]) -> Vec<Point> {
    path.iter().map(|p| engine.handle_mouse_move(*p, ctx)).collect()
}

// ── Topology properties ───────────────────────────────────────────────────────

#[test]
fn test_touching_monitors_have_one_internal_seam() {
    let t = Topology::new(side_by_side());

    let inner: Vec<_> = t
        .edges()
        .filter(|e| !e.is_outer)
        .map(|e| (e.monitor, e.edge_type))
        .collect();

    assert_eq!(
        inner,
        vec![(MonitorId(0), EdgeType::Right), (MonitorId(1), EdgeType::Left)]
    );
    assert_eq!(t.outer_edges().len(), 6);
}

#[test]
fn test_single_monitor_every_edge_wraps_onto_itself() {
    let t = Topology::new(vec![MonitorRect::new(0, 0, 0, 1920, 1080)]);
    let id = MonitorId(0);
    let rect = *t.monitor(id).expect("monitor");

    for (p, edge) in [
        (Point::new(0, 400), EdgeType::Left),
        (Point::new(1919, 400), EdgeType::Right),
        (Point::new(800, 0), EdgeType::Top),
        (Point::new(800, 1079), EdgeType::Bottom),
    ] {
        let dest = t.get_wrap_destination(id, p, edge);
        assert!(rect.contains(dest), "{edge:?} wrap must stay on the monitor");
        assert_eq!(t.is_on_outer_edge(id, dest, WrapMode::Both), None);
    }
}

#[test]
fn test_wrap_from_top_keeps_horizontal_fraction() {
    let (mut engine, _, _) = engine_for(vec![
        MonitorRect::new(0, 0, 0, 1000, 800),
        MonitorRect::new(1, 0, -600, 1000, 200),
    ]);
    let ctx = MoveContext::default();

    let out = drive(&mut engine, &ctx, &[Point::new(250, 10), Point::new(250, 0)]);

    assert_eq!(out[0], Point::new(250, 10));
    assert_eq!(out[1], Point::new(250, 199));
}

#[test]
fn test_same_monitor_fallback_only_when_no_other_monitor_qualifies() {
    // A is outermost on both sides; B sits lower and further right.
    let layout = || {
        vec![
            MonitorRect::new(0, 0, 0, 1000, 800),
            MonitorRect::new(1, 1200, 500, 2200, 1300),
        ]
    };
    let ctx = MoveContext::default();

    let (mut level_with_b, _, _) = engine_for(layout());
    let across = drive(&mut level_with_b, &ctx, &[Point::new(20, 600), Point::new(0, 600)]);

    let (mut above_b, _, _) = engine_for(layout());
    let onto_self = drive(&mut above_b, &ctx, &[Point::new(20, 100), Point::new(0, 100)]);

    assert_eq!(across[1], Point::new(2199, 1100));
    assert_eq!(onto_self[1], Point::new(998, 100));
}

#[test]
fn test_gap_layout_wraps_onto_far_monitor_across_the_gap() {
    let (mut engine, _, _) = engine_for(vec![
        MonitorRect::new(0, 0, 0, 1920, 1080),
        MonitorRect::new(1, 2120, 0, 4040, 1080),
    ]);
    let ctx = MoveContext::default();

    let out = drive(&mut engine, &ctx, &[Point::new(1900, 540), Point::new(1919, 540)]);

    // Leaving right re-enters on the furthest left edge of another monitor.
    assert_eq!(out[1], Point::new(2120, 540));
}

#[test]
fn test_gap_detection_reports_wide_gap_only() {
    let wide = detect_monitor_gaps(&[
        MonitorRect::new(0, 0, 0, 1920, 1080),
        MonitorRect::new(1, 2120, 0, 4040, 1080),
    ]);
    let narrow = detect_monitor_gaps(&[
        MonitorRect::new(0, 0, 0, 1920, 1080),
        MonitorRect::new(1, 1930, 0, 3850, 1080),
    ]);

    assert_eq!(wide.len(), 1);
    assert_eq!(wide[0].gap, 200);
    assert!(narrow.is_empty());
}

// ── Decision engine properties ────────────────────────────────────────────────

#[test]
fn test_wrap_destination_fed_back_is_returned_unchanged() {
    let (mut engine, _, _) = engine_for(side_by_side());
    let ctx = MoveContext::default();

    let dest = engine.handle_mouse_move(Point::new(0, 540), &ctx);
    assert_ne!(dest, Point::new(0, 540));

    // The hook reports the teleported position, then a few jitters around it.
    let jitter = [dest, Point::new(dest.x - 1, dest.y), Point::new(dest.x, dest.y + 2)];
    assert_eq!(drive(&mut engine, &ctx, &jitter), jitter.to_vec());
}

#[test]
fn test_round_trip_after_leaving_threshold_radius() {
    let (mut engine, _, _) = engine_for(side_by_side());
    let ctx = MoveContext::default();

    let dest = engine.handle_mouse_move(Point::new(0, 540), &ctx);
    assert_eq!(dest, Point::new(3839, 540));

    // Move back out of the radius, then push right into the edge again.
    let out = drive(
        &mut engine,
        &ctx,
        &[
            Point::new(3839 - WRAP_DISTANCE_THRESHOLD - 10, 540),
            Point::new(3839, 540),
        ],
    );

    assert_eq!(out[1], Point::new(0, 540));
}

#[test]
fn test_drag_never_wraps_on_any_outer_edge() {
    let (mut engine, _, _) = engine_for(side_by_side());
    let dragging = MoveContext::new(WrapSettings::default(), true);
    let edges = [
        Point::new(0, 540),
        Point::new(3839, 540),
        Point::new(500, 0),
        Point::new(2500, 1079),
        Point::new(0, 0),
    ];

    assert_eq!(drive(&mut engine, &dragging, &edges), edges.to_vec());
}

#[test]
fn test_vertical_only_mode_never_wraps_sideways() {
    let (mut engine, _, _) = engine_for(side_by_side());
    let ctx = MoveContext::new(
        WrapSettings {
            wrap_mode: WrapMode::VerticalOnly,
            ..WrapSettings::default()
        },
        false,
    );
    let sides = [Point::new(0, 300), Point::new(0, 700), Point::new(3839, 700)];

    assert_eq!(drive(&mut engine, &ctx, &sides), sides.to_vec());
}

#[test]
fn test_zero_monitors_is_inert() {
    let (mut engine, _, _) = engine_for(vec![]);
    let ctx = MoveContext::default();
    let path = [Point::new(0, 0), Point::new(-1, -1), Point::new(5000, 5000)];

    assert_eq!(drive(&mut engine, &ctx, &path), path.to_vec());
}

#[test]
fn test_reconfiguration_mid_stream_uses_new_topology() {
    let (mut engine, store, _) = engine_for(side_by_side());
    let ctx = MoveContext::default();

    store.publish(Topology::new(vec![MonitorRect::new(0, 0, 0, 1920, 1080)]));

    assert_eq!(engine.handle_mouse_move(Point::new(0, 540), &ctx), Point::new(1918, 540));
}

// ── Sticky edge ───────────────────────────────────────────────────────────────

#[test]
fn test_sticky_edge_wraps_only_after_timer_fires() {
    let (mut engine, _, timer) = engine_for(side_by_side());
    let ctx = MoveContext::new(
        WrapSettings {
            sticky_edge_enabled: true,
            ..WrapSettings::default()
        },
        false,
    );

    let path = [Point::new(10, 540), Point::new(0, 540), Point::new(0, 540)];
    let out = drive(&mut engine, &ctx, &path);
    assert_eq!(out[2], Point::new(0, 540));

    let request = timer.take().expect("dwell timer armed");
    let dest = engine.on_sticky_timer_fired(request, Point::new(0, 540), &ctx);
    assert_eq!(dest, Some(Point::new(3839, 540)));

    // A second delivery of the same request is stale.
    assert_eq!(engine.on_sticky_timer_fired(request, Point::new(0, 540), &ctx), None);
}

#[test]
fn test_sticky_edge_transient_touch_does_not_wrap() {
    let (mut engine, _, timer) = engine_for(side_by_side());
    let ctx = MoveContext::new(
        WrapSettings {
            sticky_edge_enabled: true,
            ..WrapSettings::default()
        },
        false,
    );

    drive(&mut engine, &ctx, &[Point::new(0, 540), Point::new(60, 540)]);

    assert!(timer.take().is_none(), "leaving the edge cancels the dwell");
    assert!(engine.pending_sticky_edge().is_none());
}
