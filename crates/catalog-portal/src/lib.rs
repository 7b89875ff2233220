//! catalog-portal: Clients for the portal metadata API.
//!
//! Two read-only endpoints are consumed: the term context (`/terms/`), which
//! says which record fields reference other entities, and the search
//! endpoint, which returns the record set for a reload mode.

pub mod client;
pub mod error;
pub mod records;
pub mod terms;

pub use client::{Credentials, PortalClient, PortalConfig};
pub use error::SourceError;
pub use records::RecordSource;
pub use terms::TermCatalog;
