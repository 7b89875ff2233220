//! Error types for the catalog-portal crate.

use catalog_core::RecordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Portal unavailable: {0}")]
    Unavailable(String),

    #[error("Portal rejected credentials (HTTP {status})")]
    Authentication { status: u16 },

    #[error("Malformed term context: {0}")]
    MalformedSchema(String),

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("Malformed record at index {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: RecordError,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;
