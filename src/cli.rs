//! Define the application's command line interface
use crate::services::Leaflet;
use crate::{
    build_trails_map, load_routes, write_trails_map, Config, TrackErrorBehavior, SUCCESS_MESSAGE,
};
use log::{debug, info};
use simplelog::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

/// Draw the routes listed in a spreadsheet onto an interactive HTML map
#[derive(Debug, StructOpt)]
#[structopt(name = "trails_map")]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// JSON configuration with the track directory and category colors
    #[structopt(long, parse(from_os_str), default_value = "config.json")]
    config: PathBuf,
    /// Spreadsheet listing the routes to draw
    #[structopt(long, parse(from_os_str), default_value = "percorsi.xlsx")]
    table: PathBuf,
    /// Name of the HTML file to write the map to
    #[structopt(short, long, parse(from_os_str), default_value = "trails_map.html")]
    output: PathBuf,
    /// How to respond to malformed track files: error, warn or suppress
    #[structopt(long, default_value = "error")]
    track_errors: TrackErrorBehavior,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Consume options struct, build the map and write it to the output file
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_file(&self.config)?;
        debug!("Loaded configuration from {:?}", self.config);
        let routes = load_routes(&self.table)?;

        let (map, summary) = build_trails_map(&config, &routes, self.track_errors)?;
        debug!(
            "{} of {} routes drawn",
            summary.rendered(),
            routes.len()
        );
        write_trails_map(&map, &Leaflet::default(), &self.output)?;
        info!("{}", SUCCESS_MESSAGE);

        Ok(())
    }
}
