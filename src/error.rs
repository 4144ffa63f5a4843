//! Errors for the fallible edges of the crate: loading configuration and speaking the
//! server-mode protocol. The normalization pipeline itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid URL for `{field}` ({value}): {source}")]
    InvalidEndpoint {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid `{field}`: {value:?} is not a JavaScript identifier")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Malformed request: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
