//! FleetTrack - Live transit vehicle tracking core
//!
//! This library tracks the live positions of transit vehicles: a concurrent
//! keyed store of current positions, a bounded history trail per vehicle,
//! Haversine radius queries, and a periodic movement simulator standing in
//! for real GPS ingestion.
//!
//! # Architecture
//!
//! ```text
//! Simulator tick ──┐
//!                  ├──► LocationStore ──► per-vehicle trail (capped)
//! Ingestion (ext) ─┘         │       └──► global log (capped)
//!                            ▼
//!               get / get_all / history / radius query
//! ```
//!
//! The presentation layer (HTTP handlers, wire formats) is deliberately not
//! part of this crate; it consumes the [`store::LocationStore`] operations
//! and nothing else.

pub mod geo;
pub mod history;
pub mod logging;
pub mod service;
pub mod sim;
pub mod store;
pub mod telemetry;

pub use geo::{distance_km, within_radius, Position, ValidationError};
pub use history::PositionHistory;
pub use service::TrackingService;
pub use sim::{MovementSimulator, SimulatorConfig};
pub use store::{LocationStore, StoreConfig};
pub use telemetry::{TrackerMetrics, TrackerSnapshot};
