//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::SearchOption;

/// URL formatter - outputs a map URL per result
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URLs with optional provider override
    pub fn format_with_provider(
        &self,
        options: &[SearchOption],
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let mut output = String::new();
        for option in options {
            let url = config.format_url(
                provider,
                option.coordinates.latitude,
                option.coordinates.longitude,
            )?;
            output.push_str(&url);
            output.push('\n');
        }
        Ok(output)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for each result"
    }

    fn format(&self, options: &[SearchOption], config: &Config) -> Result<String> {
        self.format_with_provider(options, config, None)
    }
}
