//! One-shot topology report for `--diagnose`.

use serde::Serialize;
use wrap_core::{detect_monitor_gaps, Edge, GapInfo, MonitorRect, Topology};

use super::refresh_topology::{MonitorEnumerator, ScreenError};

/// Everything the topology builder derived from the current monitors.
#[derive(Debug, Serialize)]
pub struct TopologyReport {
    pub monitors: Vec<MonitorRect>,
    pub edges: Vec<Edge>,
    pub outer_edge_count: usize,
    pub gaps: Vec<GapInfo>,
}

/// Enumerates monitors once and describes the resulting topology.
///
/// # Errors
///
/// Propagates enumeration failures.
pub fn build_report(enumerator: &dyn MonitorEnumerator) -> Result<TopologyReport, ScreenError> {
    let monitors = enumerator.enumerate_monitors()?;
    let gaps = detect_monitor_gaps(&monitors);
    let topology = Topology::new(monitors);
    Ok(TopologyReport {
        monitors: topology.monitors().to_vec(),
        edges: topology.edges().copied().collect(),
        outer_edge_count: topology.outer_edges().len(),
        gaps,
    })
}
