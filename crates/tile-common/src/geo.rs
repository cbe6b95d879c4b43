//! Geographic and pixel-space point types.

use serde::{Deserialize, Serialize};

/// A geodetic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a "lat,lon" pair, e.g. "47.7,-122.5".
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn from_pair_string(s: &str) -> Result<Self, GeoParseError> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoParseError::InvalidFormat(s.to_string()))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoParseError::InvalidNumber(lat.to_string()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoParseError::InvalidNumber(lon.to_string()))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoParseError::OutOfRange(format!("latitude {}", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoParseError::OutOfRange(format!("longitude {}", longitude)));
        }

        Ok(Self::new(latitude, longitude))
    }
}

/// A position on the 256x256 zoom-0 Web Mercator pixel plane.
///
/// x grows eastward, y grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geographic extent of a tile, described by its named corners.
///
/// Only the corner names are meaningful; do not assume any lexical ordering
/// of the fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub southwest: GeoPoint,
    pub northeast: GeoPoint,
}

impl GeoBounds {
    pub fn new(southwest: GeoPoint, northeast: GeoPoint) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.northeast.longitude - self.southwest.longitude
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.northeast.latitude - self.southwest.latitude
    }

    /// Check if a point lies within these bounds (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.southwest.latitude
            && point.latitude <= self.northeast.latitude
            && point.longitude >= self.southwest.longitude
            && point.longitude <= self.northeast.longitude
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeoParseError {
    #[error("Invalid coordinate format: {0}. Expected 'lat,lon'")]
    InvalidFormat(String),

    #[error("Invalid number in coordinate: {0}")]
    InvalidNumber(String),

    #[error("Coordinate out of range: {0}")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let point = GeoPoint::from_pair_string("47.7,-122.5").unwrap();
        assert_eq!(point.latitude, 47.7);
        assert_eq!(point.longitude, -122.5);

        let point = GeoPoint::from_pair_string(" 10 , 20 ").unwrap();
        assert_eq!(point, GeoPoint::new(10.0, 20.0));
    }

    #[test]
    fn test_parse_pair_rejects_garbage() {
        assert!(matches!(
            GeoPoint::from_pair_string("47.7"),
            Err(GeoParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            GeoPoint::from_pair_string("north,-122.5"),
            Err(GeoParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            GeoPoint::from_pair_string("91,0"),
            Err(GeoParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = GeoBounds::new(GeoPoint::new(40.0, -100.0), GeoPoint::new(41.0, -99.0));
        assert!(bounds.contains(&GeoPoint::new(40.5, -99.5)));
        assert!(!bounds.contains(&GeoPoint::new(42.0, -99.5)));
        assert_eq!(bounds.width(), 1.0);
        assert_eq!(bounds.height(), 1.0);
    }
}
