//! Concurrent live-location store.
//!
//! [`LocationStore`] is the single owner of all tracked state: one current
//! position and one bounded history trail per vehicle, a capped global log of
//! recent activity across all vehicles, and the rider positions the original
//! boarding flow needs. Every mutation funnels through it; no other component
//! touches position state directly.
//!
//! # Concurrency
//!
//! - The vehicle map is a `DashMap`. Mutations go through the entry API, so
//!   updating the current position and appending to the trail is atomic per
//!   key: a concurrent reader sees either the old state or the new, never a
//!   mix, and concurrent appends on one key cannot lose updates.
//! - Cross-key reads (`all_vehicle_positions`, `vehicles_within_radius`)
//!   produce a copied snapshot. Each entry is individually consistent at the
//!   moment it is visited; the snapshot as a whole is not a global atomic
//!   cut, which radius queries do not require.
//! - Readers never receive a live reference into the map.
//!
//! # Error policy
//!
//! Reads and removals of unknown ids are not errors: they resolve to `None`,
//! an empty vector, or a no-op. The store validates nothing on the write
//! path; boundary layers validate with [`crate::geo::validate_coordinates`]
//! before calling in.

use std::collections::{HashMap, VecDeque};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::geo::{self, Position};
use crate::history::{PositionHistory, DEFAULT_HISTORY_CAP};
use crate::telemetry::{TrackerMetrics, TrackerSnapshot};

/// Default cap on the global cross-vehicle log.
pub const DEFAULT_GLOBAL_LOG_CAP: usize = 10_000;

/// Tuning knobs for a [`LocationStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum history entries retained per vehicle.
    pub history_cap: usize,
    /// Maximum entries retained in the global cross-vehicle log.
    pub global_log_cap: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            global_log_cap: DEFAULT_GLOBAL_LOG_CAP,
        }
    }
}

/// Current position plus history trail for one vehicle.
#[derive(Debug)]
struct TrackedVehicle {
    current: Position,
    history: PositionHistory,
}

/// Concurrent mapping from vehicle id to tracked state.
///
/// Create one store at startup and share it via `Arc`; the simulator and any
/// ingestion adapter write through the same [`update_vehicle`] entry point
/// the presentation layer reads from.
///
/// [`update_vehicle`]: LocationStore::update_vehicle
#[derive(Debug)]
pub struct LocationStore {
    vehicles: DashMap<String, TrackedVehicle>,
    riders: DashMap<String, Position>,
    /// Recent positions across all vehicles, oldest first, FIFO capped.
    global_log: Mutex<VecDeque<Position>>,
    config: StoreConfig,
    metrics: TrackerMetrics,
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationStore {
    /// Create a store with default caps.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with explicit caps.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            vehicles: DashMap::new(),
            riders: DashMap::new(),
            global_log: Mutex::new(VecDeque::new()),
            config,
            metrics: TrackerMetrics::new(),
        }
    }

    /// Register a vehicle at its starting position.
    ///
    /// Same effect as [`update_vehicle`](Self::update_vehicle): calling it
    /// again for a known id resets the current position and appends to the
    /// existing trail rather than clearing it.
    pub fn initialize_vehicle(&self, vehicle_id: &str, position: Position) {
        info!(
            vehicle_id,
            latitude = position.latitude,
            longitude = position.longitude,
            "Vehicle registered"
        );
        self.record(vehicle_id, position);
    }

    /// Record a new current position for a vehicle, creating it if unseen.
    ///
    /// The position overwrites the previous current value, lands at the tail
    /// of the vehicle's trail (evicting the oldest entry when the trail is at
    /// capacity), and is appended to the global log.
    pub fn update_vehicle(&self, vehicle_id: &str, position: Position) {
        trace!(
            vehicle_id,
            latitude = position.latitude,
            longitude = position.longitude,
            "Position update"
        );
        self.record(vehicle_id, position);
    }

    /// Shared write path for initialize and update.
    fn record(&self, vehicle_id: &str, position: Position) {
        // Entry API holds the shard lock for the whole mutation, keeping the
        // current-position overwrite and the trail append atomic per key.
        let evicted = match self.vehicles.entry(vehicle_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let tracked = entry.get_mut();
                tracked.current = position.clone();
                tracked.history.append(position.clone())
            }
            Entry::Vacant(entry) => {
                let mut history = PositionHistory::new(self.config.history_cap);
                let evicted = history.append(position.clone());
                entry.insert(TrackedVehicle {
                    current: position.clone(),
                    history,
                });
                evicted
            }
        };

        self.append_global(position);

        self.metrics.position_recorded();
        if evicted {
            self.metrics.history_evicted();
        }
    }

    fn append_global(&self, position: Position) {
        let mut log = self.global_log.lock();
        log.push_back(position);
        while log.len() > self.config.global_log_cap {
            log.pop_front();
        }
    }

    /// Current position of one vehicle, or `None` if it is not tracked.
    pub fn vehicle_position(&self, vehicle_id: &str) -> Option<Position> {
        self.vehicles
            .get(vehicle_id)
            .map(|tracked| tracked.current.clone())
    }

    /// Point-in-time copy of every vehicle's current position.
    pub fn all_vehicle_positions(&self) -> HashMap<String, Position> {
        self.vehicles
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().current.clone()))
            .collect()
    }

    /// History trail for one vehicle, oldest first. Empty if the vehicle is
    /// not tracked.
    pub fn vehicle_history(&self, vehicle_id: &str) -> Vec<Position> {
        self.vehicles
            .get(vehicle_id)
            .map(|tracked| tracked.history.snapshot())
            .unwrap_or_default()
    }

    /// Stop tracking a vehicle, dropping its current position and trail
    /// together. No-op for unknown ids.
    pub fn remove_vehicle(&self, vehicle_id: &str) {
        if self.vehicles.remove(vehicle_id).is_some() {
            info!(vehicle_id, "Vehicle removed from tracking");
            self.metrics.vehicle_removed();
        } else {
            debug!(vehicle_id, "Removal of unknown vehicle ignored");
        }
    }

    /// Vehicles whose current position lies within `radius_km` of `center`
    /// (inclusive), over a point-in-time snapshot of the store.
    pub fn vehicles_within_radius(
        &self,
        center: &Position,
        radius_km: f64,
    ) -> HashMap<String, Position> {
        self.metrics.radius_query_served();
        self.vehicles
            .iter()
            .filter(|entry| geo::within_radius(&entry.value().current, center, radius_km))
            .map(|entry| (entry.key().clone(), entry.value().current.clone()))
            .collect()
    }

    /// Record a rider's position. Riders carry no history trail.
    pub fn initialize_rider(&self, rider_id: &str, position: Position) {
        debug!(rider_id, "Rider position set");
        self.riders.insert(rider_id.to_string(), position);
    }

    /// Current position of one rider, or `None` if unknown.
    pub fn rider_position(&self, rider_id: &str) -> Option<Position> {
        self.riders.get(rider_id).map(|entry| entry.value().clone())
    }

    /// Copy of the global cross-vehicle log, oldest first.
    pub fn recent_positions(&self) -> Vec<Position> {
        self.global_log.lock().iter().cloned().collect()
    }

    /// Number of vehicles currently tracked.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Activity counters plus the current vehicle count.
    pub fn metrics(&self) -> TrackerSnapshot {
        self.metrics.snapshot(self.vehicles.len())
    }
}
