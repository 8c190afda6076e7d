//! Coordinate validation and formatting
//!
//! Pure helpers shared by the geocoding client, the search selector and the
//! positioning code. Nothing here performs I/O.

use crate::constants::geo::{DEFAULT_PRECISION, LAT_RANGE, LNG_RANGE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !LAT_RANGE.contains(&self.latitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        if !LNG_RANGE.contains(&self.longitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Render as "lat, lng" with the given number of decimals
    pub fn format(&self, precision: usize) -> String {
        format_coordinates(self.latitude, self.longitude, precision)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(DEFAULT_PRECISION))
    }
}

/// True iff both values are within valid geographic ranges
///
/// NaN is never valid.
pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    LAT_RANGE.contains(&lat) && LNG_RANGE.contains(&lng)
}

/// Render a fixed-precision "lat, lng" string for display
pub fn format_coordinates(lat: f64, lng: f64, precision: usize) -> String {
    format!("{:.*}, {:.*}", precision, lat, precision, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_in_range() {
        assert!(validate_coordinates(0.0, 0.0));
        assert!(validate_coordinates(14.5995, 121.0008));
        assert!(validate_coordinates(90.0, 180.0));
        assert!(validate_coordinates(-90.0, -180.0));
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(!validate_coordinates(90.0001, 0.0));
        assert!(!validate_coordinates(-91.0, 0.0));
        assert!(!validate_coordinates(0.0, 180.5));
        assert!(!validate_coordinates(0.0, -181.0));
        assert!(!validate_coordinates(f64::NAN, 0.0));
        assert!(!validate_coordinates(0.0, f64::INFINITY));
    }

    #[test]
    fn test_validate_sweep() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                assert!(validate_coordinates(lat, lng), "({}, {})", lat, lng);
                assert!(Coordinates::new(lat, lng).validate().is_ok());
                lng += 7.5;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn test_coordinates_validate_errors() {
        let err = Coordinates::new(100.0, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("Latitude"));

        let err = Coordinates::new(0.0, 200.0).validate().unwrap_err();
        assert!(err.to_string().contains("Longitude"));
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(14.5995, 121.0008, 4), "14.5995, 121.0008");
        assert_eq!(format_coordinates(14.5995, 121.0008, 2), "14.60, 121.00");
        assert_eq!(format_coordinates(-33.8688, 151.2093, 0), "-34, 151");
    }

    #[test]
    fn test_display_uses_default_precision() {
        let coords = Coordinates::new(14.5995, 121.0008);
        assert_eq!(coords.to_string(), "14.599500, 121.000800");
    }

    #[test]
    fn test_serialization_field_names() {
        let coords = Coordinates::new(14.5995, 121.0008);
        let json = serde_json::to_value(coords).unwrap();
        assert_eq!(json["latitude"], 14.5995);
        assert_eq!(json["longitude"], 121.0008);
    }
}
