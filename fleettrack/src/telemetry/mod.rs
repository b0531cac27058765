//! Tracker telemetry for observability.
//!
//! Lock-free atomic counters recording store activity, with a point-in-time
//! snapshot type for display layers.
//!
//! ```text
//! Store operations ─────► TrackerMetrics ─────► TrackerSnapshot ─────► Views
//!                         (atomic counters)     (point-in-time copy)    (CLI, etc.)
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Activity counters for a [`LocationStore`](crate::store::LocationStore).
///
/// All counters use relaxed atomics; they are statistics, not
/// synchronization.
#[derive(Debug, Default)]
pub struct TrackerMetrics {
    positions_recorded: AtomicU64,
    history_evictions: AtomicU64,
    vehicles_removed: AtomicU64,
    radius_queries: AtomicU64,
}

impl TrackerMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one position write (initialize, update, or simulator tick).
    pub fn position_recorded(&self) {
        self.positions_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one history entry evicted by the per-vehicle cap.
    pub fn history_evicted(&self) {
        self.history_evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one vehicle removed from tracking.
    pub fn vehicle_removed(&self) {
        self.vehicles_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one radius query served.
    pub fn radius_query_served(&self) {
        self.radius_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters.
    ///
    /// `vehicles_tracked` is supplied by the caller because the entity count
    /// lives in the store's map, not in a counter.
    pub fn snapshot(&self, vehicles_tracked: usize) -> TrackerSnapshot {
        TrackerSnapshot {
            vehicles_tracked,
            positions_recorded: self.positions_recorded.load(Ordering::Relaxed),
            history_evictions: self.history_evictions.load(Ordering::Relaxed),
            vehicles_removed: self.vehicles_removed.load(Ordering::Relaxed),
            radius_queries: self.radius_queries.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`TrackerMetrics`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TrackerSnapshot {
    /// Vehicles currently tracked.
    pub vehicles_tracked: usize,
    /// Total positions written since startup.
    pub positions_recorded: u64,
    /// Total history entries evicted by the per-vehicle cap.
    pub history_evictions: u64,
    /// Total vehicles removed from tracking.
    pub vehicles_removed: u64,
    /// Total radius queries served.
    pub radius_queries: u64,
}

impl fmt::Display for TrackerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vehicles, {} positions recorded, {} evictions, {} removals, {} radius queries",
            self.vehicles_tracked,
            self.positions_recorded,
            self.history_evictions,
            self.vehicles_removed,
            self.radius_queries
        )
    }
}
