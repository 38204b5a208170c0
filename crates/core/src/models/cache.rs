use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::event::Event;
use super::venue::Venue;

/// The three kinds of cached upstream responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Search results, keyed by the derived query key.
    EventList,
    /// `GET /events/{id}`, keyed by event id.
    SingleEvent,
    /// `GET /venues/{id}`, keyed by venue id.
    Venue,
}

/// Time-to-live per cache kind, in seconds.
///
/// Lists are the highest-traffic and most volatile path, so they expire first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtls {
    pub event_list_secs: i64,
    pub single_event_secs: i64,
    pub venue_secs: i64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            event_list_secs: 5 * 60,
            single_event_secs: 15 * 60,
            venue_secs: 30 * 60,
        }
    }
}

impl CacheTtls {
    pub fn ttl_for(&self, kind: CacheKind) -> Duration {
        let secs = match kind {
            CacheKind::EventList => self.event_list_secs,
            CacheKind::SingleEvent => self.single_event_secs,
            CacheKind::Venue => self.venue_secs,
        };
        Duration::seconds(secs)
    }
}

/// A cached payload with its creation time and lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            payload,
            created_at,
            ttl,
        }
    }

    /// Usable iff `now - created_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < self.ttl
    }
}

/// In-memory, time-boxed cache of upstream responses.
///
/// Expiry is lazy: a stale entry is dropped on the read that finds it and
/// reported as a miss. Nothing runs in the background; [`ResponseCache::prune_expired`]
/// is there for callers who want to reclaim memory explicitly.
///
/// Methods take `&mut self`; share it behind a lock.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    ttls: CacheTtls,
    event_lists: HashMap<String, CacheEntry<Vec<Event>>>,
    single_events: HashMap<String, CacheEntry<Event>>,
    venues: HashMap<String, CacheEntry<Venue>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttls(ttls: CacheTtls) -> Self {
        Self {
            ttls,
            ..Self::default()
        }
    }

    pub fn ttls(&self) -> &CacheTtls {
        &self.ttls
    }

    // ── Event lists ─────────────────────────────────────────────────

    pub fn get_events(&mut self, key: &str) -> Option<Vec<Event>> {
        self.get_events_at(key, Utc::now())
    }

    pub fn get_events_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<Vec<Event>> {
        read_fresh(&mut self.event_lists, key, now)
    }

    pub fn set_events(&mut self, key: &str, events: Vec<Event>) {
        self.set_events_at(key, events, Utc::now());
    }

    pub fn set_events_at(&mut self, key: &str, events: Vec<Event>, now: DateTime<Utc>) {
        let ttl = self.ttls.ttl_for(CacheKind::EventList);
        self.event_lists
            .insert(key.to_string(), CacheEntry::new(events, now, ttl));
    }

    // ── Single events ───────────────────────────────────────────────

    pub fn get_event(&mut self, id: &str) -> Option<Event> {
        self.get_event_at(id, Utc::now())
    }

    pub fn get_event_at(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        read_fresh(&mut self.single_events, id, now)
    }

    pub fn set_event(&mut self, id: &str, event: Event) {
        self.set_event_at(id, event, Utc::now());
    }

    pub fn set_event_at(&mut self, id: &str, event: Event, now: DateTime<Utc>) {
        let ttl = self.ttls.ttl_for(CacheKind::SingleEvent);
        self.single_events
            .insert(id.to_string(), CacheEntry::new(event, now, ttl));
    }

    // ── Venues ──────────────────────────────────────────────────────

    pub fn get_venue(&mut self, id: &str) -> Option<Venue> {
        self.get_venue_at(id, Utc::now())
    }

    pub fn get_venue_at(&mut self, id: &str, now: DateTime<Utc>) -> Option<Venue> {
        read_fresh(&mut self.venues, id, now)
    }

    pub fn set_venue(&mut self, id: &str, venue: Venue) {
        self.set_venue_at(id, venue, Utc::now());
    }

    pub fn set_venue_at(&mut self, id: &str, venue: Venue, now: DateTime<Utc>) {
        let ttl = self.ttls.ttl_for(CacheKind::Venue);
        self.venues
            .insert(id.to_string(), CacheEntry::new(venue, now, ttl));
    }

    // ── Maintenance ─────────────────────────────────────────────────

    /// Number of stored entries of one kind, stale ones included.
    pub fn entry_count(&self, kind: CacheKind) -> usize {
        match kind {
            CacheKind::EventList => self.event_lists.len(),
            CacheKind::SingleEvent => self.single_events.len(),
            CacheKind::Venue => self.venues.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.event_lists.len() + self.single_events.len() + self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry that is no longer fresh at `now`.
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.len();
        self.event_lists.retain(|_, e| e.is_fresh(now));
        self.single_events.retain(|_, e| e.is_fresh(now));
        self.venues.retain(|_, e| e.is_fresh(now));
        before - self.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.event_lists.clear();
        self.single_events.clear();
        self.venues.clear();
    }
}

/// Clone out a fresh payload, evicting the entry if it has expired.
fn read_fresh<T: Clone>(
    map: &mut HashMap<String, CacheEntry<T>>,
    key: &str,
    now: DateTime<Utc>,
) -> Option<T> {
    match map.get(key) {
        Some(entry) if entry.is_fresh(now) => Some(entry.payload.clone()),
        Some(_) => {
            map.remove(key);
            None
        }
        None => None,
    }
}
