//! Service module that exports interfaces to external applications, libraries, etc.

pub mod visualization;

// rexport the rendering trait and the default backend
pub use visualization::{Leaflet, MapRenderingService};
