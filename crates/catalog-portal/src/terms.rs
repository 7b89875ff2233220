//! Term catalog client.

use async_trait::async_trait;
use serde_json::Value;

use catalog_core::TermContext;

use crate::client::PortalClient;
use crate::error::{Result, SourceError};

/// Source of field-classification metadata.
#[async_trait]
pub trait TermCatalog: Send + Sync {
    /// Fetch the full term context with a single read.
    async fn fetch_context(&self) -> Result<TermContext>;
}

#[async_trait]
impl TermCatalog for PortalClient {
    async fn fetch_context(&self) -> Result<TermContext> {
        let body = self.get_text(&self.config.terms_path, &[], false).await?;
        let context = parse_term_context(&body)?;
        tracing::info!(terms = context.len(), "Fetched term context");
        Ok(context)
    }
}

/// Parse the body of the terms endpoint. The mapping lives under `@context`.
pub fn parse_term_context(body: &str) -> Result<TermContext> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::MalformedSchema(format!("invalid JSON: {e}")))?;

    let context = doc
        .get("@context")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::MalformedSchema("missing @context object".to_string()))?;

    Ok(TermContext::from_context_map(context))
}
