//! Shared HTTP plumbing for the portal API.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Result, SourceError};

/// Default portal API URL.
pub const DEFAULT_BASE_URL: &str = "https://api.data.igvf.org";

/// API key/secret pair, sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for the portal clients.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    /// Search endpoint path.
    pub records_path: String,
    /// Term context endpoint path.
    pub terms_path: String,
    /// Type excluded from quick-mode fetches.
    pub stable_type: String,
    /// Request pages of this size instead of `limit=all`.
    pub page_size: Option<usize>,
    pub timeout_secs: u64,
    pub credentials: Option<Credentials>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            records_path: "/search/".to_string(),
            terms_path: "/terms/".to_string(),
            stable_type: "Gene".to_string(),
            page_size: None,
            timeout_secs: 600,
            credentials: None,
        }
    }
}

/// Client for the portal metadata API.
///
/// Implements both [`crate::TermCatalog`] and [`crate::RecordSource`].
/// No request is retried; the caller decides whether to rerun.
#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    pub(crate) config: PortalConfig,
}

impl PortalClient {
    pub fn new(mut config: PortalConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {e}")))?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// GET `path` under the base URL and return the body of a successful
    /// response. Query parameters are form-encoded by the HTTP client.
    pub(crate) async fn get_text(
        &self,
        path: &str,
        params: &[(&str, String)],
        authenticated: bool,
    ) -> Result<String> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .query(params)
            .header("Accept", "application/json");
        if authenticated {
            if let Some(creds) = &self.config.credentials {
                request = request.basic_auth(&creds.key, Some(&creds.secret));
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("GET {url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Reading body of {url}: {e}")))?;

        check_status(status, &body)?;
        tracing::debug!(url = %url, bytes = body.len(), "Portal response received");
        Ok(body)
    }
}

/// Map a non-success HTTP status to the error taxonomy.
pub(crate) fn check_status(status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::Authentication {
            status: status.as_u16(),
        }),
        _ => {
            let snippet: String = body.chars().take(200).collect();
            Err(SourceError::Unavailable(format!("HTTP {status}: {snippet}")))
        }
    }
}
