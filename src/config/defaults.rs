//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, geo, position, search};

/// Default Nominatim base URL
pub const DEFAULT_NOMINATIM_URL: &str = api::NOMINATIM_URL;

/// Default identifying User-Agent
pub const DEFAULT_USER_AGENT: &str = api::USER_AGENT;

/// Default number of search results requested
pub const DEFAULT_LIMIT: usize = api::SEARCH_LIMIT;

/// Default HTTP timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = api::REQUEST_TIMEOUT_SECS;

/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = search::DEBOUNCE_MS;

/// Default minimum query length
pub const DEFAULT_MIN_QUERY_LEN: usize = search::MIN_QUERY_LEN;

/// Default positioning timeout in seconds
pub const DEFAULT_POSITION_TIMEOUT_SECS: u64 = position::TIMEOUT_SECS;

/// Default cached-position tolerance in seconds
pub const DEFAULT_MAXIMUM_AGE_SECS: u64 = position::MAXIMUM_AGE_SECS;

/// Default coordinate display precision
pub const DEFAULT_PRECISION: usize = geo::DEFAULT_PRECISION;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "civic-locate";
