//! Centralized constants for the civic-locate crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Valid latitude range in degrees
    pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

    /// Valid longitude range in degrees
    pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

    /// Default number of decimals when displaying coordinates
    pub const DEFAULT_PRECISION: usize = 6;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Identifying client header sent to every geocoding request
    pub const USER_AGENT: &str = concat!("civic-locate/", env!("CARGO_PKG_VERSION"));

    /// Maximum results requested per forward search
    pub const SEARCH_LIMIT: usize = 10;

    /// Default HTTP request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}

/// Search widget behaviour
pub mod search {
    /// Quiet period after the last keystroke before a request fires
    pub const DEBOUNCE_MS: u64 = 500;

    /// Queries shorter than this never reach the network
    pub const MIN_QUERY_LEN: usize = 3;
}

/// Device positioning
pub mod position {
    /// Single-shot positioning timeout in seconds
    pub const TIMEOUT_SECS: u64 = 15;

    /// Maximum age of a cached position that is still acceptable
    pub const MAXIMUM_AGE_SECS: u64 = 60;

    /// IP position cache file name
    pub const CACHE_FILE: &str = "ip_position_cache.json";
}
