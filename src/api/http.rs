//! HTTP utilities for catalog REST API calls

use crate::error::FetchError;
use crate::model::ListFilter;
use reqwest::{multipart::Form, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull a human-readable message out of an error body, if the server sent one
fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(|v| v.as_str())
            .map(|s| s.chars().take(120).collect())
    })
}

/// HTTP client wrapper bound to the catalog API base URL
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
    base_url: String,
}

impl ApiHttpClient {
    /// Create a new HTTP client. Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| FetchError::transport(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("tcat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `<base>/<path>` with the filter appended as a query string
    pub fn url(&self, path: &str, filter: &ListFilter) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .map_err(|e| FetchError::transport(format!("Invalid URL for '{}': {}", path, e)))?;

        if !filter.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (field, value) in filter.iter() {
                pairs.append_pair(field, value);
            }
        }

        Ok(url)
    }

    /// GET and decode the body as `T`
    pub async fn get<T: DeserializeOwned>(&self, path: &str, filter: &ListFilter) -> Result<T, FetchError> {
        let url = self.url(path, filter)?;
        tracing::debug!("GET {}", url);

        let body = self.execute(self.client.get(url)).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to decode {} response: {}", path, e);
            FetchError::transport("Failed to parse response JSON")
        })
    }

    /// POST a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, FetchError> {
        let url = self.url(path, &ListFilter::new())?;
        tracing::debug!("POST {}", url);

        let body = self.execute(self.client.post(url).json(body)).await?;
        parse_optional_json(&body)
    }

    /// PUT a JSON body (full-record replace)
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, FetchError> {
        let url = self.url(path, &ListFilter::new())?;
        tracing::debug!("PUT {}", url);

        let body = self.execute(self.client.put(url).json(body)).await?;
        parse_optional_json(&body)
    }

    /// PATCH a multipart form
    pub async fn patch_multipart(&self, path: &str, form: Form) -> Result<Value, FetchError> {
        let url = self.url(path, &ListFilter::new())?;
        tracing::debug!("PATCH {} (multipart)", url);

        let body = self.execute(self.client.patch(url).multipart(form)).await?;
        parse_optional_json(&body)
    }

    /// DELETE; any response body is discarded
    pub async fn delete(&self, path: &str) -> Result<(), FetchError> {
        let url = self.url(path, &ListFilter::new())?;
        tracing::debug!("DELETE {}", url);

        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    /// Send the request and return the body text of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> Result<String, FetchError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            FetchError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::from)?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let message = error_message_from_body(&body)
                .unwrap_or_else(|| format!("API request failed: {}", status));
            return Err(FetchError::new(Some(status.as_u16()), message));
        }

        Ok(body)
    }
}

fn parse_optional_json(body: &str) -> Result<Value, FetchError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|_| FetchError::transport("Failed to parse response JSON"))
}
