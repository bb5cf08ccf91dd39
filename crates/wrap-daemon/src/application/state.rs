//! State shared between the hook thread and the background services.
//!
//! The hook thread reads this on every mouse move, so nothing here takes a
//! lock: the topology and the settings are both published as immutable
//! snapshots and swapped atomically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;
use wrap_core::{TopologyStore, WrapSettings};

pub struct SharedWrapState {
    topology: Arc<TopologyStore>,
    settings: ArcSwap<WrapSettings>,
    enabled: AtomicBool,
}

impl SharedWrapState {
    pub fn new(topology: Arc<TopologyStore>, settings: WrapSettings, enabled: bool) -> Self {
        Self {
            topology,
            settings: ArcSwap::from_pointee(settings),
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn topology(&self) -> &Arc<TopologyStore> {
        &self.topology
    }

    /// The settings the next mouse move will be evaluated with.
    pub fn settings(&self) -> WrapSettings {
        **self.settings.load()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::Relaxed) != enabled {
            info!(enabled, "cursor wrapping toggled");
        }
    }

    /// Publishes `settings` to the hook thread.  Returns `true` when they
    /// differ from the current ones.
    pub fn apply_settings(&self, settings: WrapSettings) -> bool {
        if self.settings() == settings {
            return false;
        }
        info!(
            wrap_mode = ?settings.wrap_mode,
            disable_wrap_during_drag = settings.disable_wrap_during_drag,
            disable_on_single_monitor = settings.disable_on_single_monitor,
            sticky_edge_enabled = settings.sticky_edge_enabled,
            sticky_edge_delay_ms = settings.sticky_edge_delay_ms,
            "wrap settings changed"
        );
        self.settings.store(Arc::new(settings));
        true
    }
}
