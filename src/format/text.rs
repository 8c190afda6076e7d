//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::SearchOption;
use crate::search::NO_RESULTS_MESSAGE;

/// Text formatter - one numbered line per result
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, options: &[SearchOption], config: &Config) -> Result<String> {
        if options.is_empty() {
            return Ok(format!("{}\n", NO_RESULTS_MESSAGE));
        }

        let mut output = String::new();
        for (i, option) in options.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {} [{}]\n    {}\n",
                i,
                option.label,
                option.location_type,
                option.coordinates.format(config.display.precision)
            ));
        }

        Ok(output)
    }
}
