//! Fetching `Log` records from `GET {base}/logs`.
//!
//! One request per call: no retry, no caching, no reordering. Whatever the
//! backend returns is handed back in the same order.

use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::config::{ApiConfig, DEFAULT_API_URL};
use crate::error::{MaillogError, Result};
use crate::model::log::Log;

/// Longest slice of an error response body kept in [`MaillogError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Typed client for the backend's log endpoint.
#[derive(Debug, Clone)]
pub struct LogsClient {
    http: reqwest::Client,
    base_url: String,
}

impl LogsClient {
    /// Build a client with HTTP defaults (no timeout) for the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| MaillogError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let base_url = normalize_base_url(&api.base_url)?;
        let mut builder = reqwest::Client::builder().user_agent(api.user_agent.clone());
        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|source| MaillogError::Http {
            url: base_url.clone(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    /// Reuse an existing `reqwest::Client` (shared connection pool).
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the list endpoint.
    pub fn logs_url(&self) -> String {
        format!("{}/logs", self.base_url)
    }

    /// Fetch every log the backend currently serves, in backend order.
    pub async fn fetch_logs(&self) -> Result<Vec<Log>> {
        let url = self.logs_url();
        tracing::debug!(url = %url, "Fetching logs");

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| MaillogError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "Backend rejected request");
            return Err(MaillogError::Status {
                url,
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = resp.bytes().await.map_err(|source| MaillogError::Http {
            url: url.clone(),
            source,
        })?;
        let logs: Vec<Log> =
            serde_json::from_slice(&bytes).map_err(|source| MaillogError::Decode {
                url: url.clone(),
                source,
            })?;

        tracing::info!(url = %url, count = logs.len(), "Fetched logs");
        Ok(logs)
    }

    /// Fetch a single log by id.
    ///
    /// The backend only exposes the list endpoint, so this fetches the list
    /// and picks the matching record.
    pub async fn fetch_log(&self, id: i64) -> Result<Log> {
        self.fetch_logs()
            .await?
            .into_iter()
            .find(|log| log.id == id)
            .ok_or(MaillogError::LogNotFound(id))
    }
}

/// Fetch all logs from the default backend at `http://localhost:8000`.
pub async fn fetch_logs() -> Result<Vec<Log>> {
    LogsClient::new(DEFAULT_API_URL)?.fetch_logs().await
}

/// Validate an http(s) base URL and drop any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| MaillogError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MaillogError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        body
    } else {
        let mut cut: String = body.chars().take(MAX_ERROR_BODY).collect();
        cut.push('…');
        cut
    }
}
