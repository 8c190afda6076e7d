//! Locate command handler
//!
//! Resolves the current location, optionally with its address.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::fetch_address_from_coordinates;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::position::{
    get_current_location, FixedPositionSource, IpPositionSource, PositionOptions,
};
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Report this latitude instead of looking it up
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Report this longitude instead of looking it up
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Also reverse geocode the position
    #[arg(long, short = 'a')]
    pub address: bool,

    /// Ignore any cached position
    #[arg(long)]
    pub fresh: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs, config: &Config) -> Result<()> {
    let mut options = PositionOptions::from(&config.location);
    if args.fresh {
        options.maximum_age = std::time::Duration::ZERO;
    }

    let coords = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let source = FixedPositionSource::new(Coordinates::new(lat, lng));
            get_current_location(&source, &options).await?
        }
        _ => {
            let source = IpPositionSource::new(config.location.enabled);
            get_current_location(&source, &options).await?
        }
    };

    println!("{}", coords.format(config.display.precision));

    if args.address {
        let backend = NominatimBackend::new(&config.nominatim)?;
        let address =
            fetch_address_from_coordinates(&backend, coords.latitude, coords.longitude).await?;
        println!("{}", address);
    }

    Ok(())
}
