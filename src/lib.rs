//! Render a collection of recorded trail tracks onto an interactive, layered HTML map
use log::{debug, info, trace, warn};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

pub mod cli;
pub mod config;
mod error;
pub mod gps;
pub mod layers;
pub mod legend;
pub mod map;
pub mod popup;
pub mod routes;
pub mod services;
pub mod track;

pub use config::Config;
pub use error::Error;
pub use routes::{load_routes, RouteRecord};
pub use track::{load_track, TrackSummary};

use layers::LayerRegistry;
use legend::legend_html;
use map::{LayerControl, Map};
use popup::add_route;
use services::MapRenderingService;

/// How to respond to track files that exist but cannot be parsed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackErrorBehavior {
    Error,
    Warn,
    Suppress,
}

impl FromStr for TrackErrorBehavior {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(TrackErrorBehavior::Error),
            "warn" => Ok(TrackErrorBehavior::Warn),
            "suppress" => Ok(TrackErrorBehavior::Suppress),
            _ => Err(Error::InvalidOptionValue(format!(
                "Unknown value {}: expected: error, warn, suppress",
                s
            ))),
        }
    }
}

/// Final console line of a successful run
pub static SUCCESS_MESSAGE: &str = "Mappa generata con successo!";

fn watching_message(track_dir: &str) -> String {
    format!("Monitoraggio cartella: {}", track_dir)
}

fn missing_track_message(file: &str, track_dir: &str) -> String {
    format!("Salto {}: file non trovato in {}", file, track_dir)
}

/// Why a route was left off the map
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    FileNotFound,
    NoPoints,
    ParseError(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRoute {
    pub row: usize,
    pub file: String,
    pub reason: SkipReason,
}

/// Outcome of drawing the route table
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    rendered: usize,
    skipped: Vec<SkippedRoute>,
}

impl RunSummary {
    /// Number of routes drawn on the map
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Routes left off the map, in table order
    pub fn skipped(&self) -> &[SkippedRoute] {
        &self.skipped
    }

    fn skip(&mut self, route: &RouteRecord, reason: SkipReason) {
        self.skipped.push(SkippedRoute {
            row: route.row,
            file: route.file.clone(),
            reason,
        });
    }
}

/// Draw every route of the table onto a new map, grouped into one layer per category.
///
/// Routes whose track file is missing or has no points are skipped, a malformed track file
/// is handled according to `track_errors`. The finished map has its layer control and legend
/// attached and is fitted to the drawn routes, an empty map keeps the default viewport.
pub fn build_trails_map(
    config: &Config,
    routes: &[RouteRecord],
    track_errors: TrackErrorBehavior,
) -> Result<(Map, RunSummary), Error> {
    info!("{}", watching_message(config.track_dir()));
    let mut map = Map::default();
    let mut layers = LayerRegistry::new();
    let mut summary = RunSummary::default();

    for route in routes {
        let path = config.track_path(&route.file);
        let track = match load_track(&path) {
            Ok(track) => track,
            Err(Error::TrackFileMissing(_)) => {
                warn!("{}", missing_track_message(&route.file, config.track_dir()));
                summary.skip(route, SkipReason::FileNotFound);
                continue;
            }
            Err(e @ Error::TrackParseError(..)) => match track_errors {
                TrackErrorBehavior::Error => return Err(e),
                TrackErrorBehavior::Warn => {
                    warn!("Salto {}: {}", route.file, e);
                    summary.skip(route, SkipReason::ParseError(e.to_string()));
                    continue;
                }
                TrackErrorBehavior::Suppress => {
                    trace!("Salto {}: {}", route.file, e);
                    summary.skip(route, SkipReason::ParseError(e.to_string()));
                    continue;
                }
            },
            Err(e) => return Err(e),
        };

        if track.is_empty() {
            debug!("Skipping {}: the track has no points", route.file);
            summary.skip(route, SkipReason::NoPoints);
            continue;
        }

        let color = config.colors().resolve(&route.category);
        let layer = layers.ensure_layer(&mut map, &route.category);
        if let Some(group) = map.group_mut(layer) {
            if add_route(group, route, &track, color) {
                trace!(
                    "Drew {} ({:.2} km, +{:.0} m) in {}",
                    route.file,
                    track.length_km(),
                    track.uphill(),
                    color
                );
                summary.rendered += 1;
            }
        }
    }

    map.set_layer_control(LayerControl { collapsed: false });
    match map.bounds() {
        Some(bounds) => map.fit_bounds(bounds),
        None => debug!("No routes were drawn, keeping the initial viewport"),
    }
    map.add_overlay(legend_html(config.colors()));
    debug!(
        "Drew {} routes in {} layers, skipped {}",
        summary.rendered,
        layers.len(),
        summary.skipped.len()
    );

    Ok((map, summary))
}

/// Render the map and write it to `path`, nothing is written if rendering fails
pub fn write_trails_map<P: AsRef<Path>>(
    map: &Map,
    renderer: &dyn MapRenderingService,
    path: P,
) -> Result<(), Error> {
    let html = renderer.render_map(map)?;
    let mut fp = File::create(path.as_ref())?;
    fp.write_all(html.as_bytes())?;
    debug!("Wrote {} bytes to {:?}", html.len(), path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    static TWO_POINT_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trails_map tests" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>a</name><trkseg>
<trkpt lat="45.0" lon="10.0"></trkpt>
<trkpt lat="45.009" lon="10.0"></trkpt>
</trkseg></trk>
</gpx>
"#;

    static EMPTY_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trails_map tests" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>empty</name><trkseg></trkseg></trk>
</gpx>
"#;

    fn config(dir: &Path) -> Config {
        serde_json::from_value(serde_json::json!({
            "cartella_gpx": dir.to_string_lossy(),
            "colori_percorsi": {"hike": "green", "default": "gray"}
        }))
        .unwrap()
    }

    fn route(row: usize, file: &str, category: &str) -> RouteRecord {
        RouteRecord {
            row,
            file: file.to_string(),
            category: category.to_string(),
            location: "Alps".to_string(),
            title: format!("Route {}", row),
            date: "2024-05-01".to_string(),
            link: "http://x".to_string(),
        }
    }

    #[test]
    fn test_track_error_behavior_from_str() {
        assert_eq!("warn".parse::<TrackErrorBehavior>().unwrap(), TrackErrorBehavior::Warn);
        assert_eq!("ERROR".parse::<TrackErrorBehavior>().unwrap(), TrackErrorBehavior::Error);
        assert_eq!(
            "suppress".parse::<TrackErrorBehavior>().unwrap(),
            TrackErrorBehavior::Suppress
        );
        assert!(matches!(
            "ignore".parse::<TrackErrorBehavior>(),
            Err(Error::InvalidOptionValue(_))
        ));
    }

    #[test]
    fn test_console_messages() {
        assert_eq!(watching_message("gpx"), "Monitoraggio cartella: gpx");
        assert_eq!(
            missing_track_message("a.gpx", "gpx"),
            "Salto a.gpx: file non trovato in gpx"
        );
        assert_eq!(SUCCESS_MESSAGE, "Mappa generata con successo!");
    }

    #[test]
    fn test_routes_are_grouped_by_category() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.gpx"), TWO_POINT_GPX).unwrap();
        let routes = vec![
            route(1, "a.gpx", "hike"),
            route(2, "a.gpx", "ski"),
            route(3, "a.gpx", "hike"),
        ];
        let (map, summary) =
            build_trails_map(&config(dir.path()), &routes, TrackErrorBehavior::Error).unwrap();

        assert_eq!(summary.rendered(), 3);
        assert!(summary.skipped().is_empty());
        let names: Vec<&str> = map.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["📂 hike", "📂 ski"]);
        assert_eq!(map.groups()[0].markers().len(), 2);
        assert_eq!(map.groups()[0].lines().len(), 2);
        // unknown categories use the default color
        assert_eq!(map.groups()[1].lines()[0].color, "gray");
        assert_eq!(map.groups()[1].markers()[0].icon.color, "gray");
        assert!(map.fitted_bounds().is_some());
        assert_eq!(map.layer_control(), Some(LayerControl { collapsed: false }));
        assert_eq!(map.overlays().len(), 1);
    }

    #[test]
    fn test_missing_and_empty_tracks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.gpx"), EMPTY_GPX).unwrap();
        let routes = vec![route(1, "missing.gpx", "hike"), route(2, "empty.gpx", "hike")];
        let (map, summary) =
            build_trails_map(&config(dir.path()), &routes, TrackErrorBehavior::Error).unwrap();

        assert_eq!(summary.rendered(), 0);
        assert_eq!(
            summary.skipped(),
            &[
                SkippedRoute {
                    row: 1,
                    file: "missing.gpx".to_string(),
                    reason: SkipReason::FileNotFound
                },
                SkippedRoute {
                    row: 2,
                    file: "empty.gpx".to_string(),
                    reason: SkipReason::NoPoints
                },
            ]
        );
        assert!(map.groups().is_empty());
        assert_eq!(map.fitted_bounds(), None);
    }

    #[test]
    fn test_malformed_track_policy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.gpx"), TWO_POINT_GPX).unwrap();
        fs::write(dir.path().join("bad.gpx"), "<gpx").unwrap();
        let routes = vec![route(1, "bad.gpx", "hike"), route(2, "a.gpx", "hike")];
        let config = config(dir.path());

        assert!(matches!(
            build_trails_map(&config, &routes, TrackErrorBehavior::Error),
            Err(Error::TrackParseError(_, _))
        ));

        for behavior in &[TrackErrorBehavior::Warn, TrackErrorBehavior::Suppress] {
            let (map, summary) = build_trails_map(&config, &routes, *behavior).unwrap();
            assert_eq!(summary.rendered(), 1);
            assert_eq!(summary.skipped().len(), 1);
            assert!(matches!(summary.skipped()[0].reason, SkipReason::ParseError(_)));
            assert_eq!(map.groups().len(), 1);
        }
    }

    #[test]
    fn test_write_trails_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails_map.html");
        let (map, _) = build_trails_map(&config(dir.path()), &[], TrackErrorBehavior::Error).unwrap();
        write_trails_map(&map, &services::Leaflet::default(), &path).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("LEGENDA"));
        assert!(!html.contains("fitBounds"));
    }
}
