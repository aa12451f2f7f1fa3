//! Store application configuration that gets read from disk
use crate::Error;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Color map key used for categories without their own entry
pub static DEFAULT_COLOR_KEY: &str = "default";

/// Color used when the color map has no "default" entry either
pub static FALLBACK_COLOR: &str = "gray";

/// Category to color mapping that keeps entries in the order they were written, a repeated
/// key keeps its first position and its last color
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(IndexMap<String, String>);

impl ColorMap {
    /// Return the color defined for a category, if any
    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    /// Return the color to draw a category with, falling back to the "default" entry and then
    /// to gray
    pub fn resolve(&self, category: &str) -> &str {
        self.get(category)
            .or_else(|| self.get(DEFAULT_COLOR_KEY))
            .unwrap_or(FALLBACK_COLOR)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    cartella_gpx: String,
    #[serde(default)]
    colori_percorsi: ColorMap,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(source)
    }

    /// Read the configuration document stored at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fp = File::open(path).map_err(|e| Error::ConfigError(path.to_path_buf(), e.to_string()))?;
        Config::load(&mut BufReader::new(fp))
            .map_err(|e| Error::ConfigError(path.to_path_buf(), e.to_string()))
    }

    /// Directory track files are read from, empty means the working directory
    pub fn track_dir(&self) -> &str {
        &self.cartella_gpx
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colori_percorsi
    }

    /// Location of a route's track file inside the track directory
    pub fn track_path(&self, file: &str) -> PathBuf {
        Path::new(&self.cartella_gpx).join(file)
    }
}
