//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Materialization or join resolution error.
    #[error(transparent)]
    Core(#[from] rowtree_core::Error),

    /// Row conversion error.
    #[error(transparent)]
    Proto(#[from] rowtree_proto::Error),
}
