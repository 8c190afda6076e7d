//! civic-locate: location search for civic pollution reports
//!
//! A library and CLI tool for finding and confirming where a pollution report
//! was made, backed by the OpenStreetMap Nominatim geocoder.
//!
//! ## Features
//!
//! - Forward and reverse geocoding with normalized, display-ready results
//! - A debounced search selector that never shows results for an outdated query
//! - Single-shot current-location lookup with typed failure kinds
//! - Coordinate validation and formatting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use civic_locate::config::NominatimConfig;
//! use civic_locate::geo::nominatim::NominatimBackend;
//! use civic_locate::search::{LocationSelector, SearchSettings};
//! use std::sync::Arc;
//!
//! # async fn demo() -> civic_locate::Result<()> {
//! let backend = Arc::new(NominatimBackend::new(&NominatimConfig::default())?);
//! let mut selector = LocationSelector::new(backend, SearchSettings::default(), |label| {
//!     println!("Report location: {}", label);
//! });
//!
//! selector.set_query("Pasig");
//! let mut updates = selector.subscribe();
//! updates.changed().await.ok();
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod search;

// Re-export commonly used types
pub use config::Config;
pub use coord::{format_coordinates, validate_coordinates, Coordinates};
pub use error::{Error, Result};
pub use geo::{format_display_name, GeoBackend, GeocodeResult, LocationType, SearchOption};
pub use search::{LocationSelector, SearchSettings, SearchState};
