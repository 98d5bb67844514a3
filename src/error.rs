// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Configuration could not be loaded or is not usable.
/// Always fatal: nothing is analyzed with an undefined key set.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A page or archive listing could not be retrieved.
/// Recovered per page; never reaches the analyzer.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid URL {0}")]
    Url(String),

    #[error("malformed archive listing for {site}: {reason}")]
    Listing { site: String, reason: String },
}

/// Results could not be written.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
