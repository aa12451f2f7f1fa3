//! In-memory model of the interactive map document
use crate::gps::Location;

/// Center of the initial viewport used until (or unless) the map is fitted to its routes
pub static DEFAULT_CENTER: (f64, f64) = (45.5, 10.5);

/// Zoom level of the initial viewport
pub static DEFAULT_ZOOM: u8 = 7;

/// Handle to a feature group owned by a `Map`
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct LayerId(usize);

/// Rectangle enclosing a set of locations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest rectangle enclosing every location, None when there are no locations
    pub fn from_locations<'a, I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        locations.into_iter().fold(None, |acc, loc| {
            let (lat, lon) = (loc.latitude(), loc.longitude());
            Some(match acc {
                None => Bounds {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => Bounds {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
    }
}

/// Icon drawn for a marker
#[derive(Clone, Debug, PartialEq)]
pub struct Icon {
    pub color: String,
    pub icon: String,
    pub icon_color: String,
}

impl Icon {
    /// Information sign icon on a marker of the given color
    pub fn info(color: &str) -> Self {
        Icon {
            color: color.to_string(),
            icon: "info-sign".to_string(),
            icon_color: "white".to_string(),
        }
    }
}

/// HTML content shown when a marker is clicked
#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub html: String,
    pub max_width: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub location: Location,
    pub icon: Icon,
    pub popup: Option<Popup>,
}

/// Connected line drawn through a sequence of locations
#[derive(Clone, Debug, PartialEq)]
pub struct PolyLine {
    pub locations: Vec<Location>,
    pub color: String,
    pub weight: u32,
    pub opacity: f32,
    pub tooltip: Option<String>,
}

/// Named collection of markers and lines that can be toggled as a unit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureGroup {
    name: String,
    markers: Vec<Marker>,
    lines: Vec<PolyLine>,
}

impl FeatureGroup {
    pub fn new(name: String) -> Self {
        FeatureGroup {
            name,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn lines(&self) -> &[PolyLine] {
        &self.lines
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn add_line(&mut self, line: PolyLine) {
        self.lines.push(line);
    }

    /// Every location drawn by the group
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.markers
            .iter()
            .map(|m| &m.location)
            .chain(self.lines.iter().flat_map(|l| l.locations.iter()))
    }
}

/// Control used to toggle the visibility of feature groups
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerControl {
    pub collapsed: bool,
}

/// The map document: base tiles, feature groups and overlays
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    center: Location,
    zoom: u8,
    groups: Vec<FeatureGroup>,
    layer_control: Option<LayerControl>,
    fit_bounds: Option<Bounds>,
    overlays: Vec<String>,
}

impl Map {
    pub fn new(center: Location, zoom: u8) -> Self {
        Map {
            center,
            zoom,
            groups: Vec::new(),
            layer_control: None,
            fit_bounds: None,
            overlays: Vec::new(),
        }
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Feature groups in creation order
    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn add_group(&mut self, group: FeatureGroup) -> LayerId {
        self.groups.push(group);
        LayerId(self.groups.len() - 1)
    }

    pub fn group_mut(&mut self, id: LayerId) -> Option<&mut FeatureGroup> {
        self.groups.get_mut(id.0)
    }

    pub fn layer_control(&self) -> Option<LayerControl> {
        self.layer_control
    }

    pub fn set_layer_control(&mut self, control: LayerControl) {
        self.layer_control = Some(control);
    }

    /// Bounds enclosing everything drawn on the map
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_locations(self.groups.iter().flat_map(|g| g.locations()))
    }

    /// Viewport the map will be fitted to when displayed, if any
    pub fn fitted_bounds(&self) -> Option<Bounds> {
        self.fit_bounds
    }

    pub fn fit_bounds(&mut self, bounds: Bounds) {
        self.fit_bounds = Some(bounds);
    }

    /// Raw HTML elements placed on top of the map
    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    pub fn add_overlay(&mut self, html: String) {
        self.overlays.push(html);
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new(Location::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1), DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> PolyLine {
        PolyLine {
            locations: points.iter().map(|(lat, lon)| Location::new(*lat, *lon)).collect(),
            color: "red".to_string(),
            weight: 4,
            opacity: 0.7,
            tooltip: None,
        }
    }

    #[test]
    fn test_bounds_of_nothing() {
        assert_eq!(Bounds::from_locations(&[]), None);
        assert_eq!(Map::default().bounds(), None);
    }

    #[test]
    fn test_bounds_span_every_group() {
        let mut map = Map::default();
        let a = map.add_group(FeatureGroup::new("a".to_string()));
        let b = map.add_group(FeatureGroup::new("b".to_string()));
        map.group_mut(a).unwrap().add_line(line(&[(45.0, 10.0), (46.0, 9.0)]));
        map.group_mut(b).unwrap().add_marker(Marker {
            location: Location::new(44.5, 11.0),
            icon: Icon::info("blue"),
            popup: None,
        });
        assert_eq!(
            map.bounds(),
            Some(Bounds {
                south: 44.5,
                west: 9.0,
                north: 46.0,
                east: 11.0
            })
        );
    }

    #[test]
    fn test_groups_keep_creation_order() {
        let mut map = Map::default();
        let first = map.add_group(FeatureGroup::new("first".to_string()));
        let second = map.add_group(FeatureGroup::new("second".to_string()));
        assert_ne!(first, second);
        let names: Vec<&str> = map.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(map.group_mut(second).unwrap().name(), "second");
    }
}
