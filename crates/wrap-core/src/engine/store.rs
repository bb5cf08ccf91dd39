//! Lock-free publication of topology snapshots.
//!
//! The hook thread reads the current topology on every mouse move while the
//! display-change side occasionally replaces it.  The writer builds a new
//! [`Topology`] off to the side and swaps the pointer in one atomic step;
//! readers never observe a half-rebuilt topology and never block.  An old
//! snapshot is dropped once the last reader releases it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::domain::topology::Topology;

/// A published topology tagged with the generation it was published under.
#[derive(Debug)]
pub struct TopologySnapshot {
    pub generation: u64,
    pub topology: Topology,
}

/// Holder of the current [`TopologySnapshot`].
pub struct TopologyStore {
    current: ArcSwap<TopologySnapshot>,
    next_generation: AtomicU64,
}

impl TopologyStore {
    /// Creates a store holding `initial` as generation 0.
    pub fn new(initial: Topology) -> Self {
        Self {
            current: ArcSwap::from_pointee(TopologySnapshot {
                generation: 0,
                topology: initial,
            }),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Returns the current snapshot.
    pub fn load(&self) -> Arc<TopologySnapshot> {
        self.current.load_full()
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Replaces the current topology and returns the new generation.
    pub fn publish(&self, topology: Topology) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let monitors = topology.monitor_count();
        self.current.store(Arc::new(TopologySnapshot {
            generation,
            topology,
        }));
        debug!(generation, monitors, "topology snapshot published");
        generation
    }
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new(Topology::empty())
    }
}
