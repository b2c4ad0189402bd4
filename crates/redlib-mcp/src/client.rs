use crate::prelude::*;
use redlib_mcp_core::normalize::host_of;
use redlib_mcp_core::routes::ApiRequest;
use redlib_mcp_core::shape::{shape_envelope, Envelope, ShapedEnvelope};

/// Suffix Redlib uses to serve the JSON representation of a page.
const JSON_SUFFIX: &str = ".js";

/// HTTP transport bound to one Redlib instance.
///
/// Built once at startup and shared read-only by every tool call.
#[derive(Debug, Clone)]
pub struct RedlibClient {
    http: reqwest::Client,
    base_url: String,
    host: Option<String>,
}

impl RedlibClient {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let host = host_of(&base_url);

        Self {
            http: reqwest::Client::new(),
            base_url,
            host,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authority of the configured instance, treated as a Reddit alias when
    /// normalizing URLs.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Full URL (without query) for a canonical path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}{JSON_SUFFIX}", self.base_url)
    }

    /// GET the JSON representation of `request`.
    pub async fn fetch(&self, request: &ApiRequest) -> Result<serde_json::Value, Error> {
        let url = self.url_for(&request.path);
        log::debug!("GET {url} {:?}", request.query);

        let response = self
            .http
            .get(&url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        response.json().await.map_err(|e| Error::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// Fetch `request` and shape the envelope it returns.
    pub async fn fetch_shaped(&self, request: &ApiRequest) -> Result<ShapedEnvelope> {
        let value = self.fetch(request).await?;
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| eyre!("Unexpected response shape from {}: {e}", request.path))?;

        Ok(shape_envelope(&envelope))
    }
}
