use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use vinol_core::MatchCandidate;

use super::*;

const KEY: &str = "https://untappd.com/search?q=Pale%20Ale";

fn cache() -> TtlCache<Arc<MemoryStore>> {
    TtlCache::with_ttl_hours(Arc::new(MemoryStore::new()), DEFAULT_TTL_HOURS)
}

fn candidate() -> MatchCandidate {
    MatchCandidate {
        name: "Pale Ale, BrewCo".to_string(),
        url: "https://untappd.com/beer/42".to_string(),
        rating: "3.75".to_string(),
    }
}

#[test]
fn set_then_get_returns_value() {
    let cache = cache();
    cache.set(KEY, &Some(candidate())).unwrap();
    assert_eq!(cache.get::<Option<MatchCandidate>>(KEY), Some(Some(candidate())));
}

#[test]
fn get_on_empty_cache_misses() {
    let cache = cache();
    assert_eq!(cache.get::<Option<MatchCandidate>>(KEY), None);
}

#[test]
fn negative_outcome_is_a_hit() {
    let cache = cache();
    cache.set::<Option<MatchCandidate>>(KEY, &None).unwrap();
    assert_eq!(cache.get::<Option<MatchCandidate>>(KEY), Some(None));
}

#[test]
fn entry_expires_after_ttl() {
    let cache = cache();
    let stored_at = Utc::now();
    cache.set_at(KEY, &"rated".to_string(), stored_at).unwrap();

    let just_before = stored_at + TimeDelta::hours(24) - TimeDelta::seconds(1);
    assert_eq!(
        cache.get_at::<String>(KEY, just_before).as_deref(),
        Some("rated")
    );

    let at_expiry = stored_at + TimeDelta::hours(24);
    assert_eq!(cache.get_at::<String>(KEY, at_expiry), None);

    let long_after = stored_at + TimeDelta::days(30);
    assert_eq!(cache.get_at::<String>(KEY, long_after), None);
}

#[test]
fn future_dated_entry_is_a_miss() {
    let cache = cache();
    let now = Utc::now();
    cache
        .set_at(KEY, &"rated".to_string(), now + TimeDelta::hours(1))
        .unwrap();
    assert_eq!(cache.get_at::<String>(KEY, now), None);
}

#[test]
fn set_overwrites_previous_entry() {
    let cache = cache();
    cache.set(KEY, &"first".to_string()).unwrap();
    cache.set(KEY, &"second".to_string()).unwrap();
    assert_eq!(cache.get::<String>(KEY).as_deref(), Some("second"));
}

#[test]
fn malformed_entries_read_as_misses() {
    let store = Arc::new(MemoryStore::new());
    let cache = TtlCache::with_ttl_hours(Arc::clone(&store), 24);

    store.save(KEY, "not json".to_string()).unwrap();
    assert_eq!(cache.get::<String>(KEY), None);

    store
        .save(KEY, r#"{"data": 1, "date": 1700000000000}"#.to_string())
        .unwrap();
    assert_eq!(cache.get::<i64>(KEY), None);

    store
        .save(KEY, format!(r#"{{"data": 7, "timestamp": "{}"}}"#, Utc::now().to_rfc3339()))
        .unwrap();
    assert_eq!(cache.get::<String>(KEY), None, "wrong data type is a miss");
    assert_eq!(cache.get::<i64>(KEY), Some(7));
}

#[test]
fn zero_ttl_never_hits() {
    let cache = TtlCache::with_ttl_hours(MemoryStore::new(), 0);
    cache.set(KEY, &1u8).unwrap();
    assert_eq!(cache.get::<u8>(KEY), None);
}

#[tokio::test]
async fn get_or_fetch_fetches_once_per_key() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..3 {
        let calls = Arc::clone(&calls);
        let value = cache
            .get_or_fetch(KEY, |key| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(key, KEY);
                Ok::<_, std::io::Error>(Some(candidate()))
            })
            .await
            .unwrap();
        assert_eq!(value, Some(candidate()));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_or_fetch_remembers_no_match() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let value: Option<MatchCandidate> = cache
            .get_or_fetch(KEY, |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(None)
            })
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_or_fetch_does_not_cache_errors() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    let c = Arc::clone(&calls);
    let first: Result<Option<MatchCandidate>, String> = cache
        .get_or_fetch(KEY, |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
            Err("connection reset".to_string())
        })
        .await;
    assert_eq!(first, Err("connection reset".to_string()));

    let c = Arc::clone(&calls);
    let second: Result<Option<MatchCandidate>, String> = cache
        .get_or_fetch(KEY, |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(Some(candidate()))
        })
        .await;
    assert_eq!(second, Ok(Some(candidate())));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn get_or_fetch_refetches_after_expiry() {
    let cache = cache();
    let stale = Utc::now() - TimeDelta::hours(25);
    cache.set_at(KEY, &Some(candidate()), stale).unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let value: Option<MatchCandidate> = cache
        .get_or_fetch(KEY, |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok::<_, std::io::Error>(None)
        })
        .await
        .unwrap();

    assert_eq!(value, None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get::<Option<MatchCandidate>>(KEY), Some(None));
}

#[test]
fn file_backed_cache_survives_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    {
        let cache = TtlCache::with_ttl_hours(FileStore::new(dir.path()), 24);
        cache.set(KEY, &Some(candidate())).unwrap();
    }
    let reopened = TtlCache::with_ttl_hours(FileStore::new(dir.path()), 24);
    assert_eq!(
        reopened.get::<Option<MatchCandidate>>(KEY),
        Some(Some(candidate()))
    );
}
