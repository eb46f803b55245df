//! Protocol error types.

use thiserror::Error;

/// Errors raised while converting boundary data.
#[derive(Debug, Error)]
pub enum Error {
    /// A JSON value that has no scalar representation.
    #[error("unsupported value for field '{field}': {found}")]
    UnsupportedValue { field: String, found: String },

    /// A flat row that is not a JSON object.
    #[error("invalid row at index {index}: expected an object")]
    InvalidRow { index: usize },

    /// Malformed input document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidDocument(e.to_string())
    }
}
