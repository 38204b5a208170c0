use thiserror::Error;

/// Unified error type for the entire storefront-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Upstream API / Network ──────────────────────────────────────
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Search ──────────────────────────────────────────────────────
    #[error("No events found for the specified criteria.")]
    NoEventsFound,

    #[error("No events found within {radius} miles")]
    SearchRadiusExhausted { radius: u32 },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl CoreError {
    /// Failures worth retrying: transport-level errors and HTTP 429.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Network(_) | CoreError::RateLimited)
    }

    /// Both "nothing matched" outcomes of a search, with or without coordinates.
    pub fn is_empty_search(&self) -> bool {
        matches!(
            self,
            CoreError::NoEventsFound | CoreError::SearchRadiusExhausted { .. }
        )
    }

    pub(crate) fn invalid_api_key() -> Self {
        CoreError::Configuration(
            "Invalid API key. Please check your Ticketmaster API configuration.".into(),
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, and the API key travels in the query.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` so query parameters never reach logs.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
