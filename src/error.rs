//! Error taxonomy for loading, rendering, and telemetry.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading edge and layout files.
///
/// Any of these aborts a render before a single trace is built.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid value '{value}' for column '{column}' in {path} at row {row}")]
    InvalidField {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Edge {row} ({from} -> {to}) references a node outside 0..{node_count}")]
    EdgeOutOfRange {
        row: usize,
        from: usize,
        to: usize,
        node_count: usize,
    },
}

/// Errors raised by the anonymous-auth telemetry store.
///
/// These never reach the visualization; the interaction logger logs and drops them.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Anonymous sign-in failed: {0}")]
    Auth(String),

    #[error("Appending viewpoint failed: {0}")]
    Append(String),

    #[error("Telemetry store not configured: missing {0}")]
    NotConfigured(&'static str),
}

/// Errors raised while handing a scene to a plotting surface.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Failed to write scene to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No plot registered for target '{0}'")]
    UnknownTarget(String),

    #[error("Plot target '{0}' must be a plain file name")]
    InvalidTarget(String),
}

/// Application-level errors for Memograph.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Start index {index} is outside 0..{frames}")]
    StartIndexOutOfRange { index: usize, frames: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
