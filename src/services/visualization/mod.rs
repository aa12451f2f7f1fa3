//! Turn a map document into a viewable artifact
use crate::map::Map;
use crate::Error;
mod leaflet;
pub use leaflet::Leaflet;

/// trait that defines how to process a map document into a self-contained page
pub trait MapRenderingService {
    /// Render the complete document, ready to be written to disk
    fn render_map(&self, map: &Map) -> Result<String, Error>;
}
