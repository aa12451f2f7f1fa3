//! Group routes into one toggleable map layer per category
use crate::map::{FeatureGroup, LayerId, Map};
use log::debug;
use std::collections::HashMap;

/// Prefix of every category layer name shown in the layer control
pub static LAYER_PREFIX: &str = "📂 ";

/// Tracks the layer created for each route category
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: HashMap<String, LayerId>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the layer of a category, creating and adding it to the map on first use
    pub fn ensure_layer(&mut self, map: &mut Map, category: &str) -> LayerId {
        if let Some(id) = self.layers.get(category) {
            return *id;
        }
        let id = map.add_group(FeatureGroup::new(format!("{}{}", LAYER_PREFIX, category)));
        debug!("Created map layer for category '{}'", category);
        self.layers.insert(category.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}
