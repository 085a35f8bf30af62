//! Error types for altered_sync

use altered_common::ApiError;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for a harvesting run. Any of these aborts the run
/// before an output document is written.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure surfaced by the API client
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Collected record count disagrees with the total the server announced
    #[error("Total ({expected}) is different compared to number of records ({actual})")]
    PageCountMismatch { expected: usize, actual: usize },
    /// The remote total kept changing while paginating
    #[error("Total number of records kept changing, gave up after {restarts} restarts")]
    TotalNeverStabilized { restarts: u32 },
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
    /// An operation needs the authentication token and none was supplied
    #[error("No authentication token found, put it in {}", .0.display())]
    MissingToken(PathBuf),
    /// The catalog produced by a previous harvest is not there
    #[error("Catalog {} not found. Have you run the harvest command?", .0.display())]
    MissingCatalog(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for altered_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
