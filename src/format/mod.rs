//! Output formatters
//!
//! Provides trait-based output formatting for search results.

pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::geo::SearchOption;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a list of search results
    ///
    /// # Arguments
    /// * `options` - Normalized search results, in provider order
    /// * `config` - Application config (precision, url providers, etc.)
    fn format(&self, options: &[SearchOption], config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
        &url::UrlFormatter,
    ]
    .into_iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) fn sample_options() -> Vec<SearchOption> {
    use crate::coord::Coordinates;
    use crate::geo::LocationType;

    vec![
        SearchOption {
            value: "Manila, Metro Manila, Philippines".to_string(),
            label: "Manila, Metro Manila, Philippines".to_string(),
            coordinates: Coordinates::new(14.5995, 120.9842),
            location_type: LocationType::City,
        },
        SearchOption {
            value: "San Isidro, Rodriguez, Rizal, Philippines".to_string(),
            label: "San Isidro, Rodriguez, Rizal, Philippines".to_string(),
            coordinates: Coordinates::new(14.7553, 121.1483),
            location_type: LocationType::Village,
        },
    ]
}
