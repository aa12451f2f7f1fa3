//! Read GPX track files and summarise the route they describe
use crate::gps::{length_3d, uphill_downhill, Location};
use crate::Error;
use log::trace;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Points and aggregate statistics of a parsed track file
#[derive(Clone, Debug, Default)]
pub struct TrackSummary {
    points: Vec<Location>,
    length_3d: f64,
    uphill: f64,
}

impl TrackSummary {
    /// Summarise a single connected segment of locations
    pub fn from_locations(points: Vec<Location>) -> Self {
        TrackSummary {
            length_3d: length_3d(&points),
            uphill: uphill_downhill(&points).0,
            points,
        }
    }

    /// Every point of every segment of every track, in document order
    pub fn points(&self) -> &[Location] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the route in meters
    pub fn length_3d(&self) -> f64 {
        self.length_3d
    }

    /// Length of the route in kilometers
    pub fn length_km(&self) -> f64 {
        self.length_3d / 1000.0
    }

    /// Total ascent in meters, zero when the track has no elevation data
    pub fn uphill(&self) -> f64 {
        self.uphill
    }
}

impl From<&gpx::Gpx> for TrackSummary {
    fn from(data: &gpx::Gpx) -> Self {
        let mut summary = TrackSummary::default();
        // distances and climbs never bridge the gap between two segments
        for segment in data.tracks.iter().flat_map(|t| t.segments.iter()) {
            let part = TrackSummary::from_locations(
                segment.points.iter().map(Location::from_waypoint).collect(),
            );
            summary.length_3d += part.length_3d;
            summary.uphill += part.uphill;
            summary.points.extend(part.points);
        }
        summary
    }
}

/// Load a GPX file and summarise its tracks.
///
/// A missing file is reported as `Error::TrackFileMissing` so callers can skip the route, an
/// unreadable or malformed one as `Error::TrackParseError`.
pub fn load_track<P: AsRef<Path>>(path: P) -> Result<TrackSummary, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::TrackFileMissing(path.to_path_buf()));
    }

    trace!("Parsing GPX file: {:?}", path);
    let fp = File::open(path).map_err(|e| Error::TrackParseError(path.to_path_buf(), e.to_string()))?;
    let data = gpx::read(BufReader::new(fp))
        .map_err(|e| Error::TrackParseError(path.to_path_buf(), e.to_string()))?;
    let summary = TrackSummary::from(&data);
    trace!(
        "Parsed GPX file: {:?} and found {} points over {:.1}m",
        path,
        summary.points().len(),
        summary.length_3d()
    );

    Ok(summary)
}
