//! Coordinate conversion module
//!
//! Converts geographic coordinates (latitude/longitude) into Mercator tile
//! indices. The projection is parameterised by the ellipsoid eccentricity so
//! the same code serves spherical Web Mercator vendors and WGS84 vendors.

mod types;

pub use types::{CoordError, Ellipsoid, POLE_LAT};

use std::f64::consts::PI;

/// Side length of a tile in pixels; the projection works in pixel space.
const TILE_SIZE: f64 = 256.0;

/// Converts geographic coordinates to tile indices.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, strictly between -90 and 90
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level
/// * `ellipsoid` - Reference ellipsoid ([`Ellipsoid::WGS84`] or [`Ellipsoid::SPHERICAL`])
///
/// # Returns
///
/// The `(x, y)` tile indices. Values are floored, so coordinates west of
/// -180° or past the projection edge come back negative or beyond `2^zoom`.
///
/// # Errors
///
/// Latitudes at the poles make `ln(theta)` undefined and are rejected with
/// [`CoordError::PolarLatitude`]; NaN/∞ inputs give [`CoordError::NonFinite`].
pub fn project(lat: f64, lon: f64, zoom: u8, ellipsoid: &Ellipsoid) -> Result<(i64, i64), CoordError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(CoordError::NonFinite { lat, lon });
    }
    if lat.abs() >= POLE_LAT {
        return Err(CoordError::PolarLatitude(lat));
    }

    let e = ellipsoid.eccentricity;
    let rho = 2.0_f64.powi(zoom as i32 + 8) / 2.0;
    let beta = lat * PI / 180.0;

    let phi = (1.0 - e * beta.sin()) / (1.0 + e * beta.sin());
    let theta = (PI / 4.0 + beta / 2.0).tan() * phi.powf(e / 2.0);

    let x_px = rho * (1.0 + lon / 180.0);
    let y_px = rho * (1.0 - theta.ln() / PI);

    if !x_px.is_finite() || !y_px.is_finite() {
        return Err(CoordError::NonFinite { lat, lon });
    }

    Ok((
        (x_px / TILE_SIZE).floor() as i64,
        (y_px / TILE_SIZE).floor() as i64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_at_zoom_0() {
        assert_eq!(project(0.0, 0.0, 0, &Ellipsoid::WGS84), Ok((0, 0)));
    }

    #[test]
    fn test_wgs84_northern_hemisphere() {
        assert_eq!(project(45.0, 45.0, 1, &Ellipsoid::WGS84), Ok((1, 0)));
    }

    #[test]
    fn test_wgs84_southern_hemisphere() {
        assert_eq!(project(-45.0, -45.0, 2, &Ellipsoid::WGS84), Ok((1, 2)));
    }

    #[test]
    fn test_spherical_antimeridian() {
        assert_eq!(project(0.0, 180.0, 4, &Ellipsoid::SPHERICAL), Ok((16, 8)));
    }

    #[test]
    fn test_new_york_city_spherical_zoom_16() {
        // Matches the standard slippy-map tile for 40.7128°N, 74.0060°W
        assert_eq!(
            project(40.7128, -74.0060, 16, &Ellipsoid::SPHERICAL),
            Ok((19295, 24640))
        );
    }

    #[test]
    fn test_wgs84_row_south_of_spherical_row() {
        // The ellipsoidal correction pushes northern latitudes to larger rows
        let (_, y_sph) = project(60.0, 10.0, 12, &Ellipsoid::SPHERICAL).unwrap();
        let (_, y_wgs) = project(60.0, 10.0, 12, &Ellipsoid::WGS84).unwrap();
        assert!(y_wgs > y_sph);
    }

    #[test]
    fn test_negative_longitude_beyond_range_is_negative_x() {
        let (x, _) = project(0.0, -200.0, 3, &Ellipsoid::SPHERICAL).unwrap();
        assert!(x < 0);
    }

    #[test]
    fn test_north_pole_rejected() {
        assert_eq!(
            project(90.0, 0.0, 5, &Ellipsoid::SPHERICAL),
            Err(CoordError::PolarLatitude(90.0))
        );
    }

    #[test]
    fn test_south_pole_rejected() {
        assert!(matches!(
            project(-90.0, 0.0, 5, &Ellipsoid::WGS84),
            Err(CoordError::PolarLatitude(_))
        ));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            project(f64::NAN, 0.0, 5, &Ellipsoid::WGS84),
            Err(CoordError::NonFinite { .. })
        ));
        assert!(matches!(
            project(0.0, f64::INFINITY, 5, &Ellipsoid::WGS84),
            Err(CoordError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_ellipsoid_from_name() {
        assert_eq!(Ellipsoid::from_name("wgs84"), Some(Ellipsoid::WGS84));
        assert_eq!(Ellipsoid::from_name("spherical"), Some(Ellipsoid::SPHERICAL));
        assert_eq!(Ellipsoid::from_name("unknown"), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_in_grid_for_valid_web_mercator_input(
                lat in -85.05..85.05_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=20
            ) {
                let (x, y) = project(lat, lon, zoom, &Ellipsoid::SPHERICAL)?;
                let n = 1i64 << zoom;

                prop_assert!((0..n).contains(&x), "x {} outside 0..{}", x, n);
                prop_assert!((0..n).contains(&y), "y {} outside 0..{}", y, n);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in -60.0..60.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                zoom in 4u8..=18
            ) {
                let (x1, _) = project(lat, lon1, zoom, &Ellipsoid::WGS84)?;
                let (x2, _) = project(lat, lon2, zoom, &Ellipsoid::WGS84)?;
                prop_assert!(x1 <= x2);
            }

            #[test]
            fn test_latitude_antitone(
                lat1 in 0.0..80.0_f64,
                delta in 0.5..5.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 4u8..=18
            ) {
                // Moving north never increases the row index
                let (_, y_south) = project(lat1, lon, zoom, &Ellipsoid::WGS84)?;
                let (_, y_north) = project(lat1 + delta, lon, zoom, &Ellipsoid::WGS84)?;
                prop_assert!(y_north <= y_south);
            }
        }
    }
}
