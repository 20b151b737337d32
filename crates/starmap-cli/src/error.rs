//! Error types for the replay tool.

use thiserror::Error;

use starmap_tree::ConfigError;

/// Result type for replay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a replay.
///
/// Records the engine rejects are not errors here; they are counted and
/// logged, and the replay carries on.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line that is not a valid record
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Bad engine configuration in the environment
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command line
    #[error("{0}")]
    Usage(String),
}
