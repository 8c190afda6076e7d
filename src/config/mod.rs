//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/civic-locate/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding service settings
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Search widget behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Device positioning
    #[serde(default)]
    pub location: LocationConfig,

    /// Output settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Map URL settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identifying User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum results per forward search
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

/// Search widget behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this are never sent
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Abort superseded in-flight requests instead of letting them finish
    #[serde(default = "default_true")]
    pub cancel_in_flight: bool,
}

/// Device positioning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If false, positioning requests are denied
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ask for the most precise fix available
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Positioning timeout in seconds
    #[serde(default = "default_position_timeout")]
    pub timeout_secs: u64,

    /// Accept cached positions up to this age, in seconds
    #[serde(default = "default_maximum_age")]
    pub maximum_age_secs: u64,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimals used when printing coordinates
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_true() -> bool {
    true
}
fn default_position_timeout() -> u64 {
    DEFAULT_POSITION_TIMEOUT_SECS
}
fn default_maximum_age() -> u64 {
    DEFAULT_MAXIMUM_AGE_SECS
}
fn default_precision() -> usize {
    DEFAULT_PRECISION
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},15z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            limit: default_limit(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            cancel_in_flight: true,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            high_accuracy: true,
            timeout_secs: default_position_timeout(),
            maximum_age_secs: default_maximum_age(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            format: default_format(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["nominatim", "base_url"] => Some(self.nominatim.base_url.clone()),
            ["nominatim", "user_agent"] => Some(self.nominatim.user_agent.clone()),
            ["nominatim", "limit"] => Some(self.nominatim.limit.to_string()),
            ["nominatim", "timeout_secs"] => Some(self.nominatim.timeout_secs.to_string()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "min_query_len"] => Some(self.search.min_query_len.to_string()),
            ["search", "cancel_in_flight"] => Some(self.search.cancel_in_flight.to_string()),

            ["location", "enabled"] => Some(self.location.enabled.to_string()),
            ["location", "high_accuracy"] => Some(self.location.high_accuracy.to_string()),
            ["location", "timeout_secs"] => Some(self.location.timeout_secs.to_string()),
            ["location", "maximum_age_secs"] => Some(self.location.maximum_age_secs.to_string()),

            ["display", "precision"] => Some(self.display.precision.to_string()),
            ["display", "format"] => Some(self.display.format.clone()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["nominatim", "base_url"] => self.nominatim.base_url = value.to_string(),
            ["nominatim", "user_agent"] => {
                if value.trim().is_empty() {
                    return Err(Error::Config("user_agent must not be empty".to_string()));
                }
                self.nominatim.user_agent = value.to_string();
            }
            ["nominatim", "limit"] => self.nominatim.limit = parse_value(key, value)?,
            ["nominatim", "timeout_secs"] => self.nominatim.timeout_secs = parse_value(key, value)?,

            ["search", "debounce_ms"] => self.search.debounce_ms = parse_value(key, value)?,
            ["search", "min_query_len"] => self.search.min_query_len = parse_value(key, value)?,
            ["search", "cancel_in_flight"] => self.search.cancel_in_flight = parse_value(key, value)?,

            ["location", "enabled"] => self.location.enabled = parse_value(key, value)?,
            ["location", "high_accuracy"] => self.location.high_accuracy = parse_value(key, value)?,
            ["location", "timeout_secs"] => self.location.timeout_secs = parse_value(key, value)?,
            ["location", "maximum_age_secs"] => {
                self.location.maximum_age_secs = parse_value(key, value)?
            }

            ["display", "precision"] => self.display.precision = parse_value(key, value)?,
            ["display", "format"] => self.display.format = value.to_string(),

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "nominatim.base_url",
            "nominatim.user_agent",
            "nominatim.limit",
            "nominatim.timeout_secs",
            "search.debounce_ms",
            "search.min_query_len",
            "search.cancel_in_flight",
            "location.enabled",
            "location.high_accuracy",
            "location.timeout_secs",
            "location.maximum_age_secs",
            "display.precision",
            "display.format",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }
}
