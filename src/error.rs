//! Error types for civic-locate

use crate::geo::position::PositionErrorKind;
use thiserror::Error;

/// Main error type for civic-locate operations
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent, or timed out
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The geocoding service answered with a non-success status
    #[error("Geocoding service returned status {0}")]
    Provider(reqwest::StatusCode),

    /// Reverse lookup succeeded but the provider had no address
    #[error("No address found for this location. Try a nearby point or enter the address manually")]
    NoAddressFound,

    #[error("{0}")]
    Positioning(PositionErrorKind),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PositionErrorKind> for Error {
    fn from(kind: PositionErrorKind) -> Self {
        Self::Positioning(kind)
    }
}

/// Result type alias for civic-locate operations
pub type Result<T> = std::result::Result<T, Error>;
