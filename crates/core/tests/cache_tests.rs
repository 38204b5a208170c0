// ═══════════════════════════════════════════════════════════════════
// Cache Tests: ResponseCache TTL expiry, eviction and maintenance
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, TimeZone, Utc};

use storefront_core::models::cache::{CacheEntry, CacheKind, CacheTtls, ResponseCache};
use storefront_core::models::event::Event;
use storefront_core::models::venue::Venue;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

mod expiry {
    use super::*;

    #[test]
    fn fresh_entry_is_returned() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("k", vec![Event::new("E1", "A")], t0());
        let hit = cache.get_events_at("k", t0() + Duration::seconds(299)).unwrap();
        assert_eq!(hit[0].id, "E1");
    }

    #[test]
    fn entry_at_exact_ttl_is_expired() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("k", vec![Event::new("E1", "A")], t0());
        assert!(cache.get_events_at("k", t0() + Duration::seconds(300)).is_none());
    }

    #[test]
    fn stale_read_evicts_entry() {
        let mut cache = ResponseCache::new();
        cache.set_event_at("E1", Event::new("E1", "A"), t0());
        assert_eq!(cache.entry_count(CacheKind::SingleEvent), 1);

        let later = t0() + Duration::seconds(900) + Duration::milliseconds(1);
        assert!(cache.get_event_at("E1", later).is_none());
        assert_eq!(cache.entry_count(CacheKind::SingleEvent), 0);
    }

    #[test]
    fn each_kind_has_its_own_ttl() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("list", vec![], t0());
        cache.set_event_at("E1", Event::new("E1", "A"), t0());
        cache.set_venue_at("V1", Venue::new("V1", "Hall"), t0());

        // 10 minutes: lists gone, single events and venues still fresh
        let ten_min = t0() + Duration::minutes(10);
        assert!(cache.get_events_at("list", ten_min).is_none());
        assert!(cache.get_event_at("E1", ten_min).is_some());
        assert!(cache.get_venue_at("V1", ten_min).is_some());

        // 20 minutes: only venues left
        let twenty_min = t0() + Duration::minutes(20);
        assert!(cache.get_event_at("E1", twenty_min).is_none());
        assert!(cache.get_venue_at("V1", twenty_min).is_some());

        assert!(cache.get_venue_at("V1", t0() + Duration::minutes(30)).is_none());
    }

    #[test]
    fn custom_ttls_apply() {
        let mut cache = ResponseCache::with_ttls(CacheTtls {
            event_list_secs: 1,
            single_event_secs: 1,
            venue_secs: 1,
        });
        cache.set_venue_at("V1", Venue::new("V1", "Hall"), t0());
        assert!(cache.get_venue_at("V1", t0() + Duration::seconds(1)).is_none());
    }

    #[test]
    fn overwrite_resets_creation_time() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("k", vec![Event::new("old", "A")], t0());
        let later = t0() + Duration::seconds(200);
        cache.set_events_at("k", vec![Event::new("new", "B")], later);

        let hit = cache.get_events_at("k", t0() + Duration::seconds(400)).unwrap();
        assert_eq!(hit[0].id, "new");
    }

    #[test]
    fn entry_freshness_is_strict() {
        let entry = CacheEntry::new((), t0(), Duration::seconds(5));
        assert!(entry.is_fresh(t0() + Duration::seconds(4)));
        assert!(!entry.is_fresh(t0() + Duration::seconds(5)));
    }
}

mod maintenance {
    use super::*;

    #[test]
    fn kinds_do_not_share_keys() {
        let mut cache = ResponseCache::new();
        cache.set_event_at("X", Event::new("X", "Event"), t0());
        assert!(cache.get_venue_at("X", t0()).is_none());
        assert!(cache.get_events_at("X", t0()).is_none());
    }

    #[test]
    fn prune_removes_only_stale_entries() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("list", vec![], t0());
        cache.set_event_at("E1", Event::new("E1", "A"), t0());
        cache.set_venue_at("V1", Venue::new("V1", "Hall"), t0());
        assert_eq!(cache.len(), 3);

        let removed = cache.prune_expired(t0() + Duration::minutes(16));
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entry_count(CacheKind::Venue), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = ResponseCache::new();
        cache.set_events_at("list", vec![], t0());
        cache.set_venue_at("V1", Venue::new("V1", "Hall"), t0());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn ttl_for_maps_each_kind() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.ttl_for(CacheKind::EventList), Duration::minutes(5));
        assert_eq!(ttls.ttl_for(CacheKind::SingleEvent), Duration::minutes(15));
        assert_eq!(ttls.ttl_for(CacheKind::Venue), Duration::minutes(30));
    }
}
