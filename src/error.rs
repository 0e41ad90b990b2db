// src/error.rs

//! Error types for project conversion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting a project
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration has no matching differ or baseline snapshot
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// The evaluator has no snapshot for the requested configuration
    #[error("No {purpose} snapshot recorded for configuration {configuration}")]
    MissingSnapshot {
        purpose: String,
        configuration: String,
    },

    /// The project document could not be parsed or written
    #[error("XML error: {0}")]
    Xml(String),

    /// The document parsed but is not a usable project
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    /// The legacy package manifest could not be read
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Options file could not be parsed
    #[error("Invalid options: {0}")]
    Options(#[from] toml::de::Error),

    /// Options parsed but hold unusable values
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Snapshot or report (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
