//! Search command handler
//!
//! One-shot forward geocoding with formatted output.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{to_search_options, GeoBackend};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name or address
    #[arg(required_unless_present = "list_formats")]
    pub query: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs, config: &Config) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let query = args.query.unwrap_or_default();
    let format = args.format.unwrap_or_else(|| config.display.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let mut nominatim = config.nominatim.clone();
    if let Some(limit) = args.limit {
        nominatim.limit = limit;
    }
    let backend = NominatimBackend::new(&nominatim)?;

    // A discrete user action: errors are reported, not swallowed
    let results = backend.search(query.trim()).await?;
    let options = to_search_options(&results);

    print!("{}", formatter.format(&options, config)?);
    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
