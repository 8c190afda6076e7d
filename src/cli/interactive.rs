//! Interactive command handler
//!
//! Drives a [`LocationSelector`] from stdin. Each line replaces the query, as
//! if the user had typed it; results print as they arrive.
//!
//! Commands: `:N` selects result N, `:q` dismisses, `:exit` quits.

use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use crate::search::{LocationSelector, SearchSettings, SearchState, SelectorView};
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive command arguments
#[derive(Args)]
pub struct InteractiveArgs {
    /// Override the debounce delay in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Query(String),
    Select(usize),
    Dismiss,
    Exit,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        ":exit" => Input::Exit,
        ":q" => Input::Dismiss,
        cmd if cmd.starts_with(':') => match cmd[1..].parse() {
            Ok(index) => Input::Select(index),
            Err(_) => Input::Query(line.to_string()),
        },
        _ => Input::Query(line.to_string()),
    }
}

/// Run the interactive command
pub async fn run(args: InteractiveArgs, config: &Config) -> Result<()> {
    let mut search_config = config.search.clone();
    if let Some(ms) = args.debounce_ms {
        search_config.debounce_ms = ms;
    }

    let backend = Arc::new(NominatimBackend::new(&config.nominatim)?);
    let precision = config.display.precision;

    let mut selector = LocationSelector::new(
        backend,
        SearchSettings::from(&search_config),
        |value| println!("Selected: {}", value),
    )
    .on_coordinates_change(move |coords| println!("Coordinates: {}", coords.format(precision)));

    eprintln!("{} (:N to select, :q to dismiss, :exit to quit)", selector.placeholder());

    let mut updates = selector.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Query(query) => selector.set_query(query),
                    Input::Select(index) => {
                        if selector.select(index).is_none() {
                            eprintln!("No result #{}", index);
                        }
                    }
                    Input::Dismiss => selector.dismiss(),
                    Input::Exit => break,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                render(&view, precision);
            }
        }
    }

    Ok(())
}

fn render(view: &SelectorView, precision: usize) {
    match view.state {
        SearchState::Searching => eprintln!("Searching \"{}\"...", view.query),
        SearchState::Results => {
            if let Some(message) = view.empty_message() {
                println!("{}", message);
            }
            for (i, option) in view.results.iter().enumerate() {
                println!(
                    "{:>2}. {} [{}] ({})",
                    i,
                    option.label,
                    option.location_type,
                    option.coordinates.format(precision)
                );
            }
        }
        SearchState::Idle | SearchState::Debouncing | SearchState::Closed => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("Pasig"), Input::Query("Pasig".to_string()));
        assert_eq!(parse_input(":2"), Input::Select(2));
        assert_eq!(parse_input(" :q "), Input::Dismiss);
        assert_eq!(parse_input(":exit"), Input::Exit);
        assert_eq!(parse_input(":abc"), Input::Query(":abc".to_string()));
    }
}
