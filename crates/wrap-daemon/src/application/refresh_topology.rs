//! UpdateMonitorInfo: rebuilds and publishes the topology from the live
//! monitor list.
//!
//! Called once at startup and again whenever the display configuration may
//! have changed.  The new [`Topology`] is built completely before it is
//! published, so the hook thread keeps using the previous snapshot until the
//! swap.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use wrap_core::{detect_monitor_gaps, MonitorRect, Topology, TopologyStore};

/// Error type for monitor enumeration.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Trait for enumerating the monitors of the virtual desktop.
pub trait MonitorEnumerator: Send + Sync {
    /// Returns every attached monitor with a stable ordinal id.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError`] if monitor information cannot be retrieved.
    fn enumerate_monitors(&self) -> Result<Vec<MonitorRect>, ScreenError>;
}

/// Result of one [`UpdateMonitorInfo::refresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new topology was published under this generation.
    Published { generation: u64 },
    /// The monitor list is identical to the last published one.
    Unchanged,
}

pub struct UpdateMonitorInfo {
    enumerator: Box<dyn MonitorEnumerator>,
    store: Arc<TopologyStore>,
    last: Option<Vec<MonitorRect>>,
}

impl UpdateMonitorInfo {
    pub fn new(enumerator: Box<dyn MonitorEnumerator>, store: Arc<TopologyStore>) -> Self {
        Self {
            enumerator,
            store,
            last: None,
        }
    }

    /// Enumerates monitors and publishes a new topology if they changed.
    ///
    /// # Errors
    ///
    /// Propagates enumeration failures.  The previously published topology
    /// stays in effect.
    pub fn refresh(&mut self) -> Result<RefreshOutcome, ScreenError> {
        let monitors = self.enumerator.enumerate_monitors()?;
        if self.last.as_ref() == Some(&monitors) {
            return Ok(RefreshOutcome::Unchanged);
        }

        for gap in detect_monitor_gaps(&monitors) {
            warn!(
                first = %gap.first,
                second = %gap.second,
                axis = ?gap.axis,
                gap_px = gap.gap,
                overlap_px = gap.overlap,
                "monitor sides are further apart than the adjacency tolerance; both will wrap"
            );
        }

        let topology = Topology::new(monitors.clone());
        let outer = topology.outer_edges().len();
        let generation = self.store.publish(topology);
        info!(generation, monitors = monitors.len(), outer_edges = outer, "topology rebuilt");

        self.last = Some(monitors);
        Ok(RefreshOutcome::Published { generation })
    }
}
