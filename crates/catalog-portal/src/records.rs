//! Record source client: fetches the record set for a reload mode.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use catalog_core::{Record, ReloadMode};

use crate::client::PortalClient;
use crate::error::{Result, SourceError};

/// Source of the records to load.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the complete, materialized record set for `mode`.
    async fn fetch_records(&self, mode: ReloadMode) -> Result<Vec<Record>>;
}

/// One page of a paginated search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub from: usize,
    pub limit: usize,
}

/// One parsed search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub records: Vec<Record>,
    /// Size of the whole result set, as reported by the portal.
    pub total: Option<usize>,
}

impl PortalClient {
    /// Search parameters for `mode`. `None` requests every record in one response.
    pub fn records_query(&self, mode: ReloadMode, page: Option<Page>) -> Vec<(&'static str, String)> {
        let mut params = vec![("type", "Item".to_string()), ("frame", "object".to_string())];
        if mode == ReloadMode::Quick {
            params.push(("type!", self.config.stable_type.clone()));
        }
        match page {
            Some(p) => {
                params.push(("limit", p.limit.to_string()));
                params.push(("from", p.from.to_string()));
            }
            None => params.push(("limit", "all".to_string())),
        }
        params
    }

    async fn fetch_search(&self, mode: ReloadMode, page: Option<Page>) -> Result<SearchPage> {
        let params = self.records_query(mode, page);
        let body = self
            .get_text(&self.config.records_path, &params, true)
            .await?;
        parse_search(&body, page.map_or(0, |p| p.from))
    }
}

#[async_trait]
impl RecordSource for PortalClient {
    async fn fetch_records(&self, mode: ReloadMode) -> Result<Vec<Record>> {
        let records = match self.config.page_size {
            None => {
                let page = self.fetch_search(mode, None).await?;
                if let Some(total) = page.total {
                    if page.records.len() < total {
                        return Err(SourceError::MalformedResponse(format!(
                            "response holds {} of {total} records",
                            page.records.len()
                        )));
                    }
                }
                page.records
            }
            Some(size) => {
                let client = self;
                collect_pages(size, move |page| async move {
                    client.fetch_search(mode, Some(page)).await
                })
                .await?
            }
        };

        tracing::info!(mode = %mode, records = records.len(), "Fetched record set");
        Ok(records)
    }
}

/// Request pages until the reported total has been collected.
///
/// Each request starts where the collected records end, so a server that
/// caps pages below `page_size` is still read to the end. An empty page
/// before the total is reached is an error: a partial set must never be
/// loaded.
pub async fn collect_pages<F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<Record>>
where
    F: FnMut(Page) -> Fut,
    Fut: Future<Output = Result<SearchPage>>,
{
    let limit = page_size.max(1);
    let mut records: Vec<Record> = Vec::new();

    loop {
        let page = Page {
            from: records.len(),
            limit,
        };
        let batch = fetch_page(page).await?;
        let total = batch.total.ok_or_else(|| {
            SourceError::MalformedResponse("paged response without total".to_string())
        })?;
        let fetched = batch.records.len();
        records.extend(batch.records);
        tracing::debug!(from = page.from, fetched, total, "Fetched record page");

        if records.len() >= total {
            return Ok(records);
        }
        if fetched == 0 {
            return Err(SourceError::MalformedResponse(format!(
                "pagination stopped after {} of {total} records",
                records.len()
            )));
        }
    }
}

/// Parse a search response body. Records live in the `@graph` array.
/// `offset` is the position of the first record in the overall result set,
/// used for error reporting.
pub fn parse_search(body: &str, offset: usize) -> Result<SearchPage> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let graph = doc
        .get("@graph")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::MalformedResponse("missing @graph array".to_string()))?;

    let records = graph
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            Record::from_json(raw).map_err(|source| SourceError::MalformedRecord {
                index: offset + i,
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = doc
        .get("total")
        .and_then(Value::as_u64)
        .map(|t| t as usize);

    Ok(SearchPage { records, total })
}
