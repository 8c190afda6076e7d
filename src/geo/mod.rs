//! Geocoding module
//!
//! Provides forward/reverse geocoding, result normalization and device
//! positioning.

pub mod nominatim;
pub mod position;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Structured address fields as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

/// A raw geocoding record, one per response item
///
/// Reverse lookups that find nothing come back without `display_name`, so
/// every field tolerates absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub place_id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Latitude as a decimal string
    #[serde(default)]
    pub lat: String,
    /// Longitude as a decimal string
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub importance: Option<f64>,
}

impl GeocodeResult {
    /// Parse the lat/lon strings into coordinates
    pub fn coordinates(&self) -> Result<Coordinates> {
        let latitude: f64 = self.lat.trim().parse().map_err(|_| {
            Error::InvalidCoordinates(format!("Invalid latitude: {:?}", self.lat))
        })?;
        let longitude: f64 = self.lon.trim().parse().map_err(|_| {
            Error::InvalidCoordinates(format!("Invalid longitude: {:?}", self.lon))
        })?;
        let coords = Coordinates::new(latitude, longitude);
        coords.validate()?;
        Ok(coords)
    }
}

/// Kind of place a search option refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    City,
    Municipality,
    Village,
    County,
    Location,
}

impl LocationType {
    /// Pick the most specific populated-place kind present in the address
    pub fn from_address(address: Option<&Address>) -> Self {
        let Some(address) = address else {
            return Self::Location;
        };

        if address.city.is_some() {
            Self::City
        } else if address.municipality.is_some() {
            Self::Municipality
        } else if address.village.is_some() {
            Self::Village
        } else if address.county.is_some() {
            Self::County
        } else {
            Self::Location
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::City => "City",
            Self::Municipality => "Municipality",
            Self::Village => "Village",
            Self::County => "County",
            Self::Location => "Location",
        };
        f.write_str(name)
    }
}

/// A normalized search result, ready for display and selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOption {
    pub value: String,
    pub label: String,
    pub coordinates: Coordinates,
    #[serde(rename = "type")]
    pub location_type: LocationType,
}

impl TryFrom<&GeocodeResult> for SearchOption {
    type Error = Error;

    fn try_from(result: &GeocodeResult) -> Result<Self> {
        let coordinates = result.coordinates()?;
        let label = format_display_name(result);
        Ok(Self {
            value: label.clone(),
            label,
            coordinates,
            location_type: LocationType::from_address(result.address.as_ref()),
        })
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Forward geocode a free-text query
    fn search(&self, query: &str) -> impl std::future::Future<Output = Result<Vec<GeocodeResult>>> + Send;

    /// Reverse geocode a coordinate pair
    fn reverse(&self, lat: f64, lng: f64) -> impl std::future::Future<Output = Result<GeocodeResult>> + Send;
}

/// Build a human-readable label from the structured address
///
/// Order: village, city (or municipality when there is no city), county
/// unless already present, state, country. Falls back to the provider's raw
/// display name when no structured field is set.
pub fn format_display_name(result: &GeocodeResult) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(address) = &result.address {
        if let Some(village) = non_empty(&address.village) {
            parts.push(village);
        }
        if let Some(city) = non_empty(&address.city).or_else(|| non_empty(&address.municipality)) {
            parts.push(city);
        }
        if let Some(county) = non_empty(&address.county) {
            if !parts.contains(&county) {
                parts.push(county);
            }
        }
        if let Some(state) = non_empty(&address.state) {
            parts.push(state);
        }
        if let Some(country) = non_empty(&address.country) {
            parts.push(country);
        }
    }

    if parts.is_empty() {
        result.display_name.clone().unwrap_or_default()
    } else {
        parts.join(", ")
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Project raw results into search options, dropping unusable records
pub fn to_search_options(results: &[GeocodeResult]) -> Vec<SearchOption> {
    results
        .iter()
        .filter_map(|result| match SearchOption::try_from(result) {
            Ok(option) => Some(option),
            Err(e) => {
                warn!(place_id = result.place_id, "Skipping geocode result: {}", e);
                None
            }
        })
        .collect()
}

/// Reverse geocode a coordinate pair to a display label
///
/// Fails with [`Error::NoAddressFound`] when the provider answers without a
/// display name.
pub async fn fetch_address_from_coordinates<B: GeoBackend>(
    backend: &B,
    lat: f64,
    lon: f64,
) -> Result<String> {
    Coordinates::new(lat, lon).validate()?;

    let result = backend.reverse(lat, lon).await?;

    match result.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(format_display_name(&result)),
        _ => Err(Error::NoAddressFound),
    }
}
