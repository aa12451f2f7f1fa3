//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;
use std::path::PathBuf;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    ConfigError(PathBuf, String),
    InvalidOptionValue(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    TableLoadError(PathBuf, String),
    TrackFileMissing(PathBuf),
    TrackParseError(PathBuf, String),
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigError(path, msg) => {
                write!(f, "Could not load configuration {:?}: {}", path, msg)
            }
            Error::InvalidOptionValue(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Json(e) => write!(f, "{}", e),
            Error::TableLoadError(path, msg) => {
                write!(f, "Could not load route table {:?}: {}", path, msg)
            }
            Error::TrackFileMissing(path) => write!(f, "Track file {:?} does not exist", path),
            Error::TrackParseError(path, msg) => {
                write!(f, "Could not parse track file {:?}: {}", path, msg)
            }
        }
    }
}

impl std::error::Error for Error {}
