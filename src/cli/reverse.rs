//! Reverse command handler
//!
//! Prints the address at a coordinate pair.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::fetch_address_from_coordinates;
use crate::geo::nominatim::NominatimBackend;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Also print a map URL
    #[arg(long)]
    pub url: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs, config: &Config) -> Result<()> {
    let backend = NominatimBackend::new(&config.nominatim)?;
    let address = fetch_address_from_coordinates(&backend, args.lat, args.lng).await?;

    println!("{}", address);
    println!(
        "{}",
        Coordinates::new(args.lat, args.lng).format(config.display.precision)
    );
    if args.url {
        println!("{}", config.format_url(None, args.lat, args.lng)?);
    }

    Ok(())
}
