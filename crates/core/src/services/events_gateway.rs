use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;
use crate::models::cache::ResponseCache;
use crate::models::event::Event;
use crate::models::query::{Category, EventQuery, SearchOptions};
use crate::models::settings::Settings;
use crate::models::venue::Venue;
use crate::providers::traits::DiscoveryTransport;
use super::availability::{enrich, AvailabilityEstimator, RandomAvailability};
use super::retry::RetryingHttpClient;

/// Events per lane on the landing page and in "near you" lists.
pub const LANE_SIZE: u32 = 8;

const SORT_BY_DATE: &str = "date,asc";
const SORT_BY_RELEVANCE: &str = "relevance,desc";

/// An event together with its primary venue, for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDetails {
    pub event: Event,
    pub venue: Option<Venue>,
}

/// The landing page lanes, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeLanes {
    pub featured: Vec<Event>,
    pub music: Vec<Event>,
    pub sports: Vec<Event>,
    pub comedy: Vec<Event>,
    pub theatre: Vec<Event>,
}

/// Fetches events and venues with caching, retry and enrichment.
///
/// Flow for every lookup:
/// 1. Fail fast if no API key is configured.
/// 2. Return the cached copy if it is still fresh.
/// 3. Otherwise call the transport through [`RetryingHttpClient`].
/// 4. Validate and normalise the payload, attach availability to events.
/// 5. Cache under the original key and return.
///
/// The cache is owned by the gateway (injected at construction) and guarded
/// by a mutex that is never held across an `.await`, so independent searches
/// may run concurrently. Concurrent misses on the same key both fetch and the
/// last write wins.
pub struct EventsGateway<T: DiscoveryTransport> {
    transport: T,
    cache: Mutex<ResponseCache>,
    retry: RetryingHttpClient,
    estimator: Box<dyn AvailabilityEstimator>,
    settings: Settings,
}

impl<T: DiscoveryTransport> EventsGateway<T> {
    pub fn new(transport: T, cache: ResponseCache, settings: Settings) -> Self {
        Self {
            transport,
            cache: Mutex::new(cache),
            retry: RetryingHttpClient::new(settings.retry),
            estimator: Box::new(RandomAvailability::default()),
            settings,
        }
    }

    /// Replace the default random availability estimate.
    pub fn with_estimator(mut self, estimator: impl AvailabilityEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Entries currently stored, stale ones included.
    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Search events.
    ///
    /// When the query carries coordinates and the upstream returns nothing,
    /// the radius is widened by `settings.radius.step` up to
    /// `settings.radius.max_widenings` times before giving up with
    /// `SearchRadiusExhausted`. Without coordinates an empty result is
    /// `NoEventsFound`. Empty results are never cached.
    pub async fn search_events(&self, query: &EventQuery) -> Result<Vec<Event>, CoreError> {
        self.settings.validate()?;

        let key = query.cache_key();
        let cached = self.cache().get_events(&key);
        if let Some(events) = cached {
            tracing::debug!(%key, count = events.len(), "event list cache hit");
            return Ok(events);
        }
        tracing::debug!(%key, "event list cache miss");

        let policy = self.settings.radius;
        let coordinates = query.coordinates();
        let mut radius = query
            .options
            .radius
            .or(coordinates.map(|_| policy.default_radius));
        let mut widenings = 0;

        let events = loop {
            let params = query.upstream_params(&self.settings.country_code, radius);
            let body = self.fetch("/events", &params).await?;
            let events = parse_search_envelope(body)?;
            if !events.is_empty() {
                break events;
            }

            let current = match (coordinates, radius) {
                (Some(_), Some(r)) => r,
                _ => return Err(CoreError::NoEventsFound),
            };
            if widenings >= policy.max_widenings {
                return Err(CoreError::SearchRadiusExhausted { radius: current });
            }
            widenings += 1;
            let wider = current.saturating_add(policy.step);
            tracing::warn!(
                from = current,
                to = wider,
                attempt = widenings,
                "no events in radius, widening search"
            );
            radius = Some(wider);
        };

        let events: Vec<Event> = events
            .into_iter()
            .map(|e| self.normalize_event(e))
            .collect();
        self.cache().set_events(&key, events.clone());
        Ok(events)
    }

    /// Up to eight upcoming events near a point, soonest first.
    pub async fn events_near(
        &self,
        category: Option<Category>,
        latitude: f64,
        longitude: f64,
        today: NaiveDate,
    ) -> Result<Vec<Event>, CoreError> {
        let query = lane_query(category, SORT_BY_DATE, today, Some((latitude, longitude)));
        self.search_events(&query).await
    }

    /// Featured plus the four category lanes, requested concurrently.
    ///
    /// A lane with no events comes back empty instead of failing the page;
    /// any other error aborts. All lanes empty is `NoEventsFound`.
    pub async fn load_home_lanes(
        &self,
        coordinates: Option<(f64, f64)>,
        today: NaiveDate,
    ) -> Result<HomeLanes, CoreError> {
        let queries = [
            lane_query(None, SORT_BY_RELEVANCE, today, coordinates),
            lane_query(Some(Category::Music), SORT_BY_DATE, today, coordinates),
            lane_query(Some(Category::Sports), SORT_BY_DATE, today, coordinates),
            lane_query(Some(Category::Comedy), SORT_BY_DATE, today, coordinates),
            lane_query(Some(Category::Theatre), SORT_BY_DATE, today, coordinates),
        ];

        let results = join_all(queries.iter().map(|q| self.search_events(q))).await;

        let mut lanes = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(events) => lanes.push(events),
                Err(e) if e.is_empty_search() => lanes.push(Vec::new()),
                Err(e) => return Err(e),
            }
        }
        if lanes.iter().all(Vec::is_empty) {
            return Err(CoreError::NoEventsFound);
        }

        let mut lanes = lanes.into_iter();
        Ok(HomeLanes {
            featured: lanes.next().unwrap_or_default(),
            music: lanes.next().unwrap_or_default(),
            sports: lanes.next().unwrap_or_default(),
            comedy: lanes.next().unwrap_or_default(),
            theatre: lanes.next().unwrap_or_default(),
        })
    }

    // ── Lookups by id ───────────────────────────────────────────────

    pub async fn get_event_by_id(&self, id: &str) -> Result<Event, CoreError> {
        self.settings.validate()?;
        let id = validate_id("event", id)?;

        let cached = self.cache().get_event(id);
        if let Some(event) = cached {
            tracing::debug!(id, "event cache hit");
            return Ok(event);
        }

        let body = self
            .fetch(&format!("/events/{id}"), &[])
            .await
            .map_err(|e| relabel_not_found(e, "event", id))?;
        let event: Event = serde_json::from_value(body)
            .map_err(|e| CoreError::InvalidResponse(format!("event {id}: {e}")))?;

        let event = self.normalize_event(event);
        self.cache().set_event(id, event.clone());
        Ok(event)
    }

    pub async fn get_venue_by_id(&self, id: &str) -> Result<Venue, CoreError> {
        self.settings.validate()?;
        let id = validate_id("venue", id)?;

        let cached = self.cache().get_venue(id);
        if let Some(venue) = cached {
            tracing::debug!(id, "venue cache hit");
            return Ok(venue);
        }

        let body = self
            .fetch(&format!("/venues/{id}"), &[])
            .await
            .map_err(|e| relabel_not_found(e, "venue", id))?;
        let venue: Venue = serde_json::from_value(body)
            .map_err(|e| CoreError::InvalidResponse(format!("venue {id}: {e}")))?;

        self.cache().set_venue(id, venue.clone());
        Ok(venue)
    }

    /// The event and, when it lists one, its first venue.
    pub async fn get_event_details(&self, id: &str) -> Result<EventDetails, CoreError> {
        let event = self.get_event_by_id(id).await?;
        let venue = match event.primary_venue_id().map(str::to_string) {
            Some(venue_id) => Some(self.get_venue_by_id(&venue_id).await?),
            None => None,
        };
        Ok(EventDetails { event, venue })
    }

    // ── Internal ────────────────────────────────────────────────────

    fn cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value, CoreError> {
        self.retry
            .execute(|| self.transport.get_json(path, params))
            .await
    }

    fn normalize_event(&self, mut event: Event) -> Event {
        let dropped = event.retain_valid_price_ranges();
        if dropped > 0 {
            tracing::warn!(id = %event.id, dropped, "discarded invalid price ranges");
        }
        enrich(&mut event, self.estimator.as_ref());
        event
    }
}

/// Check the envelope shape and pull out `_embedded.events`.
///
/// A valid envelope has `_embedded`, `page`, or both. `page` alone is an
/// empty but valid result.
pub fn parse_search_envelope(mut body: Value) -> Result<Vec<Event>, CoreError> {
    let obj = body
        .as_object_mut()
        .ok_or_else(|| CoreError::InvalidResponse("expected a JSON object".into()))?;
    if !obj.contains_key("_embedded") && !obj.contains_key("page") {
        return Err(CoreError::InvalidResponse(
            "envelope has neither _embedded nor page".into(),
        ));
    }

    match obj.get_mut("_embedded").and_then(|e| e.get_mut("events")) {
        Some(events) => serde_json::from_value(events.take())
            .map_err(|e| CoreError::InvalidResponse(format!("events: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Keep events whose starting price (0 when unpriced) lies in `[min, max]`.
pub fn filter_by_price(events: &[Event], min: f64, max: f64) -> Vec<Event> {
    events
        .iter()
        .filter(|e| {
            let price = e.starting_price();
            price >= min && price <= max
        })
        .cloned()
        .collect()
}

fn lane_query(
    category: Option<Category>,
    sort: &str,
    today: NaiveDate,
    coordinates: Option<(f64, f64)>,
) -> EventQuery {
    let mut query = EventQuery::new().with_options(SearchOptions {
        size: Some(LANE_SIZE),
        sort: Some(sort.to_string()),
        start_date: Some(today),
        ..SearchOptions::default()
    });
    query.category = category;
    if let Some((lat, lon)) = coordinates {
        query = query.near(lat, lon);
    }
    query
}

/// Ids go straight into the URL path, so only plain id characters pass.
fn validate_id<'a>(resource: &str, id: &'a str) -> Result<&'a str, CoreError> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(id)
    } else {
        Err(CoreError::ValidationError(format!("Invalid {resource} id: '{id}'")))
    }
}

fn relabel_not_found(err: CoreError, resource: &str, id: &str) -> CoreError {
    match err {
        CoreError::NotFound { .. } => CoreError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        },
        other => other,
    }
}
