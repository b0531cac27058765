//! Geographic positions and great-circle distance math.
//!
//! Provides the [`Position`] value type used throughout the tracker and the
//! Haversine distance functions backing radius queries.
//!
//! # Design
//!
//! - Distance is computed with the Haversine formula on a spherical Earth
//!   (R = 6371 km). Altitude and accuracy never enter the calculation.
//! - The hot update path performs no coordinate validation; callers sitting
//!   at an external boundary (CLI, ingestion adapters) validate with
//!   [`validate_coordinates`] / [`validate_radius`] before touching the store.
//! - Position equality considers coordinates only. See the `PartialEq` impl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers, as used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced by boundary validation of caller-supplied geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Latitude outside -90..=90 degrees (or NaN).
    #[error("invalid latitude: {0} (expected -90 to 90 degrees)")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180 degrees (or NaN).
    #[error("invalid longitude: {0} (expected -180 to 180 degrees)")]
    InvalidLongitude(f64),

    /// Negative or NaN radius.
    #[error("invalid radius: {0} km (expected a non-negative value)")]
    InvalidRadius(f64),
}

/// A timestamped geographic position.
///
/// Latitude and longitude are in degrees; altitude and accuracy, when
/// present, are in meters. The timestamp defaults to the creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Altitude above sea level in meters, if known.
    pub altitude: Option<f64>,
    /// Horizontal accuracy of the fix in meters, if known.
    pub accuracy: Option<f64>,
    /// When this position was captured.
    pub timestamp: DateTime<Utc>,
    /// Reverse-geocoded street address, if available.
    pub address: Option<String>,
}

impl Position {
    /// Create a position from bare coordinates, timestamped now.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
            timestamp: Utc::now(),
            address: None,
        }
    }

    /// Create a position carrying altitude and accuracy from a GPS fix.
    pub fn with_fix(latitude: f64, longitude: f64, altitude: f64, accuracy: f64) -> Self {
        Self {
            altitude: Some(altitude),
            accuracy: Some(accuracy),
            ..Self::new(latitude, longitude)
        }
    }

    /// Validating constructor for positions arriving from an external
    /// boundary. The plain constructors accept coordinates as-is.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self::new(latitude, longitude))
    }

    /// Attach a human-readable address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Equality considers latitude and longitude only.
///
/// Two positions at the same coordinates compare equal even when their
/// timestamps, altitude, or accuracy differ. Containment checks over
/// positions (stop matching, dedup) rely on this; widening equality to the
/// other fields would silently change their behavior.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

/// Validate a latitude/longitude pair. NaN fails the range check.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return Err(ValidationError::InvalidLatitude(latitude));
    }
    if !(MIN_LON..=MAX_LON).contains(&longitude) {
        return Err(ValidationError::InvalidLongitude(longitude));
    }
    Ok(())
}

/// Validate a query radius in kilometers.
pub fn validate_radius(radius_km: f64) -> Result<(), ValidationError> {
    if radius_km.is_nan() || radius_km < 0.0 {
        return Err(ValidationError::InvalidRadius(radius_km));
    }
    Ok(())
}

/// Great-circle distance between two positions in kilometers.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]. Symmetric,
/// and zero for identical coordinates.
pub fn distance_km(a: &Position, b: &Position) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `a` lies within `radius_km` of `b` (inclusive boundary).
pub fn within_radius(a: &Position, b: &Position, radius_km: f64) -> bool {
    distance_km(a, b) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    // Downtown Kingston test fixtures.
    const BUS_001: (f64, f64) = (18.0172, -76.7840);
    const BUS_002: (f64, f64) = (18.0287, -76.8059);
    const CENTER: (f64, f64) = (18.02, -76.80);

    fn pos(coords: (f64, f64)) -> Position {
        Position::new(coords.0, coords.1)
    }

    #[test]
    fn test_distance_zero_for_identical_coordinates() {
        let a = pos(BUS_001);
        let b = pos(BUS_001);
        assert!(distance_km(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = pos(BUS_001);
        let b = pos(BUS_002);
        let forward = distance_km(&a, &b);
        let reverse = distance_km(&b, &a);
        assert!((forward - reverse).abs() < 1e-12);
    }

    #[test]
    fn test_kingston_reference_distances() {
        // Reference values computed with the same formula and R = 6371 km.
        let center = pos(CENTER);

        let d1 = distance_km(&center, &pos(BUS_001));
        assert!(
            (d1 - 1.7203).abs() < 0.001,
            "center to BUS-001 should be ~1.7203 km, got {}",
            d1
        );

        let d2 = distance_km(&center, &pos(BUS_002));
        assert!(
            (d2 - 1.1511).abs() < 0.001,
            "center to BUS-002 should be ~1.1511 km, got {}",
            d2
        );
    }

    #[test]
    fn test_within_radius_boundary_is_inclusive() {
        let a = pos(CENTER);
        let b = pos(BUS_002);
        let d = distance_km(&a, &b);

        assert!(within_radius(&a, &b, d), "exact distance should be inside");
        assert!(within_radius(&a, &b, d + 0.001));
        assert!(!within_radius(&a, &b, d - 0.001));
    }

    #[test]
    fn test_equality_ignores_timestamp_and_fix_data() {
        let a = Position::with_fix(18.0172, -76.7840, 55.0, 4.0);
        let mut b = Position::new(18.0172, -76.7840);
        b.timestamp = a.timestamp + chrono::Duration::seconds(30);

        assert_eq!(a, b, "positions at the same coordinates compare equal");
    }

    #[test]
    fn test_equality_differs_on_coordinates() {
        assert_ne!(pos(BUS_001), pos(BUS_002));
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(matches!(
            Position::checked(90.5, 0.0),
            Err(ValidationError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Position::checked(0.0, -180.01),
            Err(ValidationError::InvalidLongitude(_))
        ));
        assert!(Position::checked(18.0172, -76.7840).is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::NAN).is_err());
        assert!(validate_radius(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius(0.0).is_ok());
        assert!(validate_radius(5.0).is_ok());
        assert!(matches!(
            validate_radius(-1.0),
            Err(ValidationError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_with_fix_carries_altitude_and_accuracy() {
        let p = Position::with_fix(18.0, -76.8, 120.0, 8.5);
        assert_eq!(p.altitude, Some(120.0));
        assert_eq!(p.accuracy, Some(8.5));
    }

    #[test]
    fn test_with_address() {
        let p = Position::new(18.0, -76.8).with_address("Half Way Tree Rd");
        assert_eq!(p.address.as_deref(), Some("Half Way Tree Rd"));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetry(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let a = Position::new(lat1, lon1);
                let b = Position::new(lat2, lon2);

                let forward = distance_km(&a, &b);
                let reverse = distance_km(&b, &a);

                prop_assert!(
                    (forward - reverse).abs() < 1e-9,
                    "distance not symmetric: {} vs {}",
                    forward, reverse
                );
            }

            #[test]
            fn test_distance_non_negative_and_bounded(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let d = distance_km(&Position::new(lat1, lon1), &Position::new(lat2, lon2));

                prop_assert!(d >= 0.0, "distance must be non-negative, got {}", d);
                // No two points on the sphere are farther apart than half the
                // circumference.
                let max = std::f64::consts::PI * EARTH_RADIUS_KM;
                prop_assert!(d <= max + 1e-6, "distance {} exceeds antipodal maximum {}", d, max);
            }

            #[test]
            fn test_within_radius_matches_distance(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
                radius in 0.0..25_000.0_f64,
            ) {
                let a = Position::new(lat1, lon1);
                let b = Position::new(lat2, lon2);

                prop_assert_eq!(
                    within_radius(&a, &b, radius),
                    distance_km(&a, &b) <= radius
                );
            }

            #[test]
            fn test_self_distance_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                let a = Position::new(lat, lon);
                let b = Position::new(lat, lon);
                prop_assert!(distance_km(&a, &b).abs() < 1e-9);
            }

            #[test]
            fn test_reject_out_of_range_latitude(
                lat in 90.0001..1000.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                let result = validate_coordinates(lat, lon);
                prop_assert!(result.is_err());
                prop_assert!(matches!(result.unwrap_err(), ValidationError::InvalidLatitude(_)));
            }

            #[test]
            fn test_reject_out_of_range_longitude(
                lat in -90.0..90.0_f64,
                lon in 180.0001..1000.0_f64,
            ) {
                let result = validate_coordinates(lat, lon);
                prop_assert!(result.is_err());
                prop_assert!(matches!(result.unwrap_err(), ValidationError::InvalidLongitude(_)));
            }
        }
    }
}
