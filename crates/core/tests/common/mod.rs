// ═══════════════════════════════════════════════════════════════════
// Shared test helpers: scripted Discovery transport and JSON fixtures
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use storefront_core::errors::CoreError;
use storefront_core::models::settings::Settings;
use storefront_core::providers::traits::DiscoveryTransport;

type Responder = Box<dyn Fn(&str, &[(String, String)]) -> Result<Value, CoreError> + Send + Sync>;

/// One request the gateway issued.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub at: Instant,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that replays queued responses in order, then falls back to
/// an optional responder, then to an HTTP 500.
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Result<Value, CoreError>>>,
    responder: Option<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responder(
        responder: impl Fn(&str, &[(String, String)]) -> Result<Value, CoreError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::new()
        }
    }

    pub fn push_ok(self, body: Value) -> Self {
        self.queue.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn push_err(self, err: CoreError) -> Self {
        self.queue.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DiscoveryTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, CoreError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            params: params.to_vec(),
            at: Instant::now(),
        });

        let queued = self.queue.lock().unwrap().pop_front();
        match (queued, &self.responder) {
            (Some(result), _) => result,
            (None, Some(responder)) => responder(path, params),
            (None, None) => Err(CoreError::Api {
                status: 500,
                message: "no scripted response".into(),
            }),
        }
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn settings() -> Settings {
    Settings::with_api_key("test-key")
}

pub fn event_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://tickets.example/{id}"),
        "dates": {
            "start": { "localDate": "2025-06-01", "localTime": "19:30:00", "dateTime": "2025-06-01T23:30:00Z" },
            "status": { "code": "onsale" }
        },
        "_embedded": {
            "venues": [{ "id": "V1", "name": "Grand Arena", "city": { "name": "Chicago" }, "state": { "stateCode": "IL" } }]
        },
        "priceRanges": [
            { "type": "standard", "currency": "USD", "min": 40.0, "max": 120.0 },
            { "type": "vip", "currency": "USD", "min": 200.0, "max": 350.0 }
        ],
        "images": [{ "url": "https://img.example/1.jpg", "ratio": "16_9", "width": 1024, "height": 576 }],
        "classifications": [{ "segment": { "id": "KZFzniwnSyZfZ7v7nJ", "name": "Music" }, "family": false }]
    })
}

pub fn venue_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "city": { "name": "Chicago" },
        "state": { "stateCode": "IL" },
        "country": { "name": "United States Of America", "countryCode": "US" },
        "address": { "line1": "1901 W Madison St" },
        "location": { "longitude": "-87.6742", "latitude": "41.8807" },
        "generalInfo": { "generalRule": "No outside food", "childRule": "Children over 2 need a ticket" }
    })
}

pub fn search_body(events: Vec<Value>) -> Value {
    let total = events.len();
    json!({
        "_embedded": { "events": events },
        "page": { "size": 20, "totalElements": total, "totalPages": 1, "number": 0 }
    })
}

pub fn empty_page() -> Value {
    json!({ "page": { "size": 20, "totalElements": 0, "totalPages": 0, "number": 0 } })
}
