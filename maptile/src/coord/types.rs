//! Projection parameter and error types

use thiserror::Error;

/// Latitudes at or beyond this magnitude drive the Mercator `ln(theta)`
/// term to ±∞ and are outside the projection's domain.
pub const POLE_LAT: f64 = 90.0;

/// Reference ellipsoid for the Mercator projection, described by its
/// first eccentricity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// First eccentricity (0 for a sphere).
    pub eccentricity: f64,
}

impl Ellipsoid {
    /// WGS84 ellipsoidal Mercator.
    pub const WGS84: Ellipsoid = Ellipsoid {
        eccentricity: 0.08181919084262157,
    };

    /// Spherical (Web) Mercator.
    pub const SPHERICAL: Ellipsoid = Ellipsoid { eccentricity: 0.0 };

    /// Resolve a projection by the name used in provider schemas.
    ///
    /// Accepts `"wgs84"` and `"spherical"`; anything else returns `None`.
    pub fn from_name(name: &str) -> Option<Ellipsoid> {
        match name {
            "wgs84" => Some(Ellipsoid::WGS84),
            "spherical" => Some(Ellipsoid::SPHERICAL),
            _ => None,
        }
    }
}

/// Errors raised for inputs outside the projection's domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude at (or past) a pole.
    #[error("Latitude {0} is at or beyond a pole and cannot be projected")]
    PolarLatitude(f64),

    /// An input or intermediate value was NaN or infinite.
    #[error("Non-finite projection input or result (lat={lat}, lon={lon})")]
    NonFinite { lat: f64, lon: f64 },
}
