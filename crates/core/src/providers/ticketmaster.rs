use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::errors::{redact_query, CoreError};
use crate::models::settings::Settings;
use super::traits::DiscoveryTransport;

/// Ticketmaster Discovery API v2 over HTTPS.
///
/// - **Requires**: API key, sent as the `apikey` query parameter on every call.
/// - **Endpoints**: `/events`, `/events/{id}`, `/venues/{id}`.
/// - **Timeout**: fixed per-request socket timeout from [`Settings`].
pub struct TicketmasterClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TicketmasterClient {
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path such as `/events/abc`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Map a non-success status onto the error taxonomy.
pub fn error_for_status(status: StatusCode, path: &str, body: &str) -> CoreError {
    match status {
        StatusCode::UNAUTHORIZED => CoreError::invalid_api_key(),
        StatusCode::NOT_FOUND => CoreError::NotFound {
            resource: "resource".into(),
            id: path.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => CoreError::RateLimited,
        other => CoreError::Api {
            status: other.as_u16(),
            message: summarize_body(body),
        },
    }
}

/// First line of an error body, capped so a full HTML page never lands in a log.
fn summarize_body(body: &str) -> String {
    const MAX_LEN: usize = 200;
    let line = body.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return "empty response body".into();
    }
    let mut summary: String = line.chars().take(MAX_LEN).collect();
    if line.chars().count() > MAX_LEN {
        summary.push('…');
    }
    redact_query(&summary)
}

#[async_trait]
impl DiscoveryTransport for TicketmasterClient {
    fn name(&self) -> &str {
        "Ticketmaster"
    }

    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, CoreError> {
        let url = self.url_for(path);
        tracing::debug!(path, params = params.len(), "discovery request");

        let resp = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, path, &body));
        }

        resp.json::<Value>().await.map_err(|e| {
            CoreError::InvalidResponse(format!(
                "Failed to parse response for {path}: {}",
                redact_query(&e.to_string())
            ))
        })
    }
}
