//! FleetTrack CLI - demo tracking daemon
//!
//! Boots the tracking core, seeds a demo fleet, runs the movement simulator,
//! and periodically reports which vehicles are near the query center. This is
//! the process-bootstrap layer; all tracking logic lives in the library.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use fleettrack::geo::{self, Position};
use fleettrack::service::TrackingService;
use fleettrack::sim::SimulatorConfig;
use fleettrack::store::StoreConfig;

/// Demo fleet seeded around downtown Kingston.
const DEMO_FLEET: &[(&str, f64, f64)] = &[
    ("BUS-001", 18.0172, -76.7840),
    ("BUS-002", 18.0287, -76.8059),
    ("BUS-003", 18.0100, -76.7900),
    ("BUS-004", 18.0390, -76.8120),
];

#[derive(Debug, Parser)]
#[command(name = "fleettrack", about = "Live transit vehicle tracking demo")]
struct Args {
    /// Simulator tick interval in milliseconds.
    #[arg(long, default_value_t = 5000)]
    interval_ms: u64,

    /// Per-axis random movement bound in degrees per tick.
    #[arg(long, default_value_t = 0.0005)]
    jitter_deg: f64,

    /// Maximum history entries retained per vehicle.
    #[arg(long, default_value_t = 100)]
    history_cap: usize,

    /// Latitude of the nearby-vehicles query center.
    #[arg(long, default_value_t = 18.02)]
    center_lat: f64,

    /// Longitude of the nearby-vehicles query center.
    #[arg(long, default_value_t = -76.80)]
    center_lon: f64,

    /// Radius of the nearby-vehicles query in kilometers.
    #[arg(long, default_value_t = 5.0)]
    radius_km: f64,

    /// Seconds between nearby-vehicle reports.
    #[arg(long, default_value_t = 10)]
    report_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    fleettrack::logging::init("info");

    // Validate user-supplied geometry at the boundary; the core accepts
    // whatever it is given.
    if let Err(e) = geo::validate_coordinates(args.center_lat, args.center_lon) {
        error!(error = %e, "Invalid query center");
        return ExitCode::FAILURE;
    }
    if let Err(e) = geo::validate_radius(args.radius_km) {
        error!(error = %e, "Invalid query radius");
        return ExitCode::FAILURE;
    }

    let service = TrackingService::start(
        StoreConfig {
            history_cap: args.history_cap,
            ..Default::default()
        },
        SimulatorConfig {
            interval: Duration::from_millis(args.interval_ms),
            max_jitter_deg: args.jitter_deg,
        },
    );

    let store = service.store();
    for (id, lat, lon) in DEMO_FLEET {
        store.initialize_vehicle(id, Position::new(*lat, *lon));
    }
    info!(vehicles = DEMO_FLEET.len(), "Demo fleet seeded");

    let center = Position::new(args.center_lat, args.center_lon);
    let mut report = tokio::time::interval(Duration::from_secs(args.report_secs.max(1)));
    report.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received");
                break;
            }

            _ = report.tick() => {
                let nearby = store.vehicles_within_radius(&center, args.radius_km);
                let mut ids: Vec<&str> = nearby.keys().map(String::as_str).collect();
                ids.sort_unstable();
                info!(
                    radius_km = args.radius_km,
                    nearby = %ids.join(", "),
                    metrics = %store.metrics(),
                    "Nearby vehicles"
                );
            }
        }
    }

    service.shutdown().await;
    ExitCode::SUCCESS
}
