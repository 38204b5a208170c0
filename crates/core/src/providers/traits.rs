use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;

/// Raw access to the events Discovery API.
///
/// One call is one HTTP request: no caching, no retry. Implementations map
/// the HTTP outcome onto `CoreError` so callers can classify it:
///
/// | upstream            | error                         |
/// |---------------------|-------------------------------|
/// | 401                 | `CoreError::Configuration`    |
/// | 404                 | `CoreError::NotFound`         |
/// | 429                 | `CoreError::RateLimited`      |
/// | connect / timeout   | `CoreError::Network`          |
/// | any other non-2xx   | `CoreError::Api`              |
///
/// The gateway depends only on this trait, so tests swap in scripted mocks.
#[async_trait]
pub trait DiscoveryTransport: Send + Sync {
    /// Human-readable name of this transport (for logs/errors).
    fn name(&self) -> &str;

    /// `GET {base}{path}` with the given query parameters, parsed as JSON.
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, CoreError>;
}
