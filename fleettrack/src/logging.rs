//! Tracing subscriber setup for binaries embedding the tracker.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` when set, falling back to `default_filter` (e.g.
/// `"info"` or `"fleettrack=debug"`). Safe to call once per process; later
/// calls are ignored so tests can invoke it freely.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
