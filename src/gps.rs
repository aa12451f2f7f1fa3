//! Module with GPS specific structures and distance computations

/// Mean earth radius used by the haversine formula, in meters
static EARTH_RADIUS: f64 = 6_378_137.0;

/// Length of one degree of latitude, in meters
static ONE_DEGREE: f64 = 1000.0 * 10000.8 / 90.0;

/// Coordinate differences above this (in degrees) are measured with the haversine formula
static FLAT_EARTH_LIMIT: f64 = 0.2;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
    /// elevation in meters if available
    elevation: Option<f64>,
}

impl Location {
    /// Create a location without elevation data from coordinates provided in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
            elevation: None,
        }
    }

    /// Create a location from a GPX waypoint, keeping its elevation if recorded
    pub fn from_waypoint(point: &gpx::Waypoint) -> Self {
        let coords = point.point();
        Location {
            latitude: coords.y(),
            longitude: coords.x(),
            elevation: point.elevation,
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Return elevation in meters (if defined)
    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: Option<f64>) {
        self.elevation = elevation;
    }

    /// Distance in meters to another location taking elevation into account when both
    /// locations have it
    pub fn distance_3d(&self, other: &Location) -> f64 {
        if (self.latitude - other.latitude).abs() > FLAT_EARTH_LIMIT
            || (self.longitude - other.longitude).abs() > FLAT_EARTH_LIMIT
        {
            return haversine_distance(self, other);
        }

        let coef = self.latitude.to_radians().cos();
        let x = self.latitude - other.latitude;
        let y = (self.longitude - other.longitude) * coef;
        let distance_2d = (x * x + y * y).sqrt() * ONE_DEGREE;
        match (self.elevation, other.elevation) {
            (Some(a), Some(b)) if a != b => (distance_2d.powi(2) + (a - b).powi(2)).sqrt(),
            _ => distance_2d,
        }
    }
}

/// Great circle distance between two locations in meters, elevation is ignored
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    let d_lat = (a.latitude - b.latitude).to_radians();
    let d_lon = (a.longitude - b.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * a.latitude.to_radians().cos() * b.latitude.to_radians().cos();
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS
}

/// Length of a connected sequence of locations in meters
pub fn length_3d(points: &[Location]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[1].distance_3d(&pair[0]))
        .sum()
}

/// Total ascent and descent in meters of a connected sequence of locations.
///
/// Elevations are lightly smoothed first, each interior point with elevation on both sides
/// is replaced by a weighted average of itself and its neighbours so GPS noise does not add
/// up to phantom climbing. Points without elevation contribute nothing.
pub fn uphill_downhill(points: &[Location]) -> (f64, f64) {
    let smoothed: Vec<Option<f64>> = (0..points.len())
        .map(|n| {
            let current = points[n].elevation?;
            if n > 0 && n + 1 < points.len() {
                if let (Some(prev), Some(next)) = (points[n - 1].elevation, points[n + 1].elevation) {
                    return Some(prev * 0.3 + current * 0.4 + next * 0.3);
                }
            }
            Some(current)
        })
        .collect();

    let mut uphill = 0.0;
    let mut downhill = 0.0;
    for pair in smoothed.windows(2) {
        if let (Some(prev), Some(cur)) = (pair[0], pair[1]) {
            let delta = cur - prev;
            if delta > 0.0 {
                uphill += delta;
            } else {
                downhill -= delta;
            }
        }
    }
    (uphill, downhill)
}
