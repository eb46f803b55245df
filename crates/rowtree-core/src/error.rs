//! Core error types.

use thiserror::Error;

/// Errors raised by join trees, materialization and cursors.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] rowtree_proto::Error),

    /// No registered child join matches the requested name.
    #[error("join '{name}' not found on table '{table}'")]
    JoinNotFound { name: String, table: String },

    /// More than one registered child join matches the requested name.
    #[error("ambiguous join '{name}': matches {}", candidates.join(", "))]
    AmbiguousJoin {
        name: String,
        candidates: Vec<String>,
    },

    /// The same join ID was registered twice on one node.
    #[error("join '{join_id}' is already registered on table '{table}'")]
    DuplicateJoin { join_id: String, table: String },

    /// Invalid table, separator, key or field declaration.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A row carries data for a table but lacks one of its key fields.
    #[error("missing key field '{field}' for table '{table}'")]
    MissingKey { field: String, table: String },

    /// A row carries no fields at all for a table that requires them.
    #[error("row has no fields for table '{table}'")]
    MissingTableFields { table: String },

    /// A row field collides with the joint-data field name.
    #[error("field '{field}' of table '{table}' collides with the joint data field")]
    ReservedField { field: String, table: String },

    /// The current record has no such field.
    #[error("field '{field}' not found in current record")]
    FieldNotFound { field: String },

    /// The cursor is exhausted or empty.
    #[error("cursor has no current record")]
    NoCurrentRecord,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
