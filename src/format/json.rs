//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::SearchOption;

/// JSON formatter - outputs the result list as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON array of search results"
    }

    fn format(&self, options: &[SearchOption], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(options)?)
    }
}
