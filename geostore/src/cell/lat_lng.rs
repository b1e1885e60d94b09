use std::fmt::{self, Display};

use crate::errors::{ErrorKind, GeoError, GeoResult};

/// A geographic coordinate with validated latitude and longitude.
///
/// # Examples
///
/// ```rust
/// use geostore::LatLng;
///
/// let berlin = LatLng::new(52.52, 13.405).unwrap();
/// assert_eq!(berlin.lat(), 52.52);
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a coordinate after checking `lat` in [-90, 90] and `lng` in [-180, 180].
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` for out-of-range or NaN values.
    pub fn new(lat: f64, lng: f64) -> GeoResult<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            log::error!("Latitude must be between -90 and 90 degrees, got: {}", lat);
            return Err(GeoError::new(
                &format!("Latitude must be between -90 and 90 degrees, got: {}", lat),
                ErrorKind::InvalidCoordinate,
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            log::error!("Longitude must be between -180 and 180 degrees, got: {}", lng);
            return Err(GeoError::new(
                &format!("Longitude must be between -180 and 180 degrees, got: {}", lng),
                ErrorKind::InvalidCoordinate,
            ));
        }
        Ok(LatLng { lat, lng })
    }

    /// Validates a ring of `(lat, lng)` pairs.
    pub fn ring(points: &[(f64, f64)]) -> GeoResult<Vec<LatLng>> {
        points.iter().map(|&(lat, lng)| LatLng::new(lat, lng)).collect()
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Planar coordinate with longitude as `x` and latitude as `y`.
    pub(crate) fn to_coord(self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

impl Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}
