//! Periodic movement simulation.
//!
//! Stands in for live GPS ingestion: on a fixed interval, every tracked
//! vehicle's position is perturbed by a small uniform random offset and
//! written back through the store's normal update path. A real telemetry
//! adapter replaces this component by calling
//! [`LocationStore::update_vehicle`] itself; the store contract is identical
//! either way.
//!
//! # Design
//!
//! - Each tick is stateless and independent; all mutable state lives in the
//!   store
//! - Ticks are serialized: a tick that overruns the interval delays the next
//!   one instead of racing it (`MissedTickBehavior::Delay`)
//! - Altitude and accuracy carry forward unchanged; the stale address is
//!   dropped once the vehicle moves

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::geo::Position;
use crate::store::LocationStore;

/// Default tick interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Default per-axis jitter bound in degrees (~55 m at the equator).
pub const DEFAULT_MAX_JITTER_DEG: f64 = 0.0005;

/// Configuration for the movement simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Per-axis perturbation bound in degrees; each tick draws latitude and
    /// longitude offsets independently and uniformly from `-bound..=bound`.
    pub max_jitter_deg: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_TICK_INTERVAL,
            max_jitter_deg: DEFAULT_MAX_JITTER_DEG,
        }
    }
}

/// Drives random movement of every tracked vehicle on a fixed schedule.
#[derive(Debug)]
pub struct MovementSimulator {
    store: Arc<LocationStore>,
    config: SimulatorConfig,
}

impl MovementSimulator {
    /// Create a simulator with the default interval and jitter.
    pub fn new(store: Arc<LocationStore>) -> Self {
        Self::with_config(store, SimulatorConfig::default())
    }

    /// Create a simulator with explicit configuration.
    pub fn with_config(store: Arc<LocationStore>, config: SimulatorConfig) -> Self {
        Self { store, config }
    }

    /// Perturb every tracked vehicle once.
    ///
    /// Reads a snapshot of current positions, so vehicles added or removed
    /// mid-tick are picked up on the next one.
    pub fn tick(&self) {
        let positions = self.store.all_vehicle_positions();
        if positions.is_empty() {
            return;
        }

        let mut rng = rand::rng();
        let bound = self.config.max_jitter_deg;

        for (vehicle_id, current) in positions {
            let moved = Position {
                latitude: current.latitude + rng.random_range(-bound..=bound),
                longitude: current.longitude + rng.random_range(-bound..=bound),
                altitude: current.altitude,
                accuracy: current.accuracy,
                timestamp: Utc::now(),
                address: None,
            };
            self.store.update_vehicle(&vehicle_id, moved);
        }

        debug!("Simulated movement tick applied");
    }

    /// Run ticks until the token is cancelled.
    ///
    /// The first perturbation happens one full interval after startup.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            max_jitter_deg = self.config.max_jitter_deg,
            "Movement simulator starting"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; consume that so vehicles hold their
        // seeded positions for the first interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Movement simulator shutting down");
                    break;
                }

                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }
    }
}
