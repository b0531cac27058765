//! Tracking service lifecycle.
//!
//! [`TrackingService`] owns the store and the background simulator task,
//! giving the process one explicit object to construct at startup and shut
//! down cleanly, instead of process-wide singletons.
//!
//! # Example
//!
//! ```ignore
//! use fleettrack::service::TrackingService;
//!
//! let service = TrackingService::start(Default::default(), Default::default());
//!
//! let store = service.store();
//! store.initialize_vehicle("BUS-001", Position::new(18.0172, -76.7840));
//!
//! // Graceful shutdown
//! service.shutdown().await;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::sim::{MovementSimulator, SimulatorConfig};
use crate::store::{LocationStore, StoreConfig};

/// Handle to a running tracking core: the shared store plus the simulator
/// task driving it.
pub struct TrackingService {
    store: Arc<LocationStore>,
    shutdown: CancellationToken,
    simulator_task: JoinHandle<()>,
}

impl TrackingService {
    /// Build the store and spawn the simulator.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(store_config: StoreConfig, simulator_config: SimulatorConfig) -> Self {
        let store = Arc::new(LocationStore::with_config(store_config));
        let shutdown = CancellationToken::new();

        let simulator = MovementSimulator::with_config(Arc::clone(&store), simulator_config);
        let simulator_task = tokio::spawn(simulator.run(shutdown.clone()));

        info!("Tracking service started");

        Self {
            store,
            shutdown,
            simulator_task,
        }
    }

    /// Shared handle to the location store.
    pub fn store(&self) -> Arc<LocationStore> {
        Arc::clone(&self.store)
    }

    /// Cancel the simulator and wait for it to finish.
    pub async fn shutdown(self) {
        info!("Tracking service shutting down");
        self.shutdown.cancel();
        // The simulator only exits via cancellation; a join error here means
        // it panicked, which is worth surfacing in logs but not propagating.
        if let Err(e) = self.simulator_task.await {
            tracing::warn!(error = %e, "Simulator task did not exit cleanly");
        }
        info!("Tracking service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let service = TrackingService::start(
            StoreConfig::default(),
            SimulatorConfig {
                interval: Duration::from_millis(10),
                ..Default::default()
            },
        );

        let store = service.store();
        store.initialize_vehicle("BUS-001", Position::new(18.0172, -76.7840));

        tokio::time::sleep(Duration::from_millis(60)).await;
        service.shutdown().await;

        assert!(
            store.vehicle_history("BUS-001").len() > 1,
            "simulator should have ticked before shutdown"
        );
    }

    #[tokio::test]
    async fn test_store_outlives_service_shutdown() {
        let service = TrackingService::start(StoreConfig::default(), SimulatorConfig::default());
        let store = service.store();
        store.initialize_vehicle("BUS-001", Position::new(18.0, -76.8));

        service.shutdown().await;

        // Readers holding the Arc keep working after the simulator stops.
        assert!(store.vehicle_position("BUS-001").is_some());
    }
}
