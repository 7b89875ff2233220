//! Error types for the catalog-sync crate.

use catalog_core::RecordError;
use catalog_graph::GraphError;
use catalog_portal::SourceError;
use thiserror::Error;

/// Every variant aborts the current run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Authentication failure: portal returned HTTP {status}")]
    AuthenticationFailure { status: u16 },

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

    #[error("Graph adapter failure: {0}")]
    AdapterFailure(#[from] GraphError),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<SourceError> for SyncError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Unavailable(msg) => Self::SourceUnavailable(msg),
            SourceError::Authentication { status } => Self::AuthenticationFailure { status },
            SourceError::MalformedSchema(msg) => Self::MalformedSchema(msg),
            SourceError::MalformedResponse(msg) => Self::MalformedResponse(msg),
            SourceError::MalformedRecord { index, source } => Self::MalformedRecord { index, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
