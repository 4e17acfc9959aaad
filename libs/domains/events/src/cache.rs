//! Time-bounded result cache with tag invalidation.

use dashmap::DashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Invalidation tag shared by every cached view of the events collection
pub const EVENTS_TAG: &str = "events";

/// How long a similar-events result stays fresh
pub const SIMILAR_EVENTS_TTL: Duration = Duration::from_secs(3600);

/// How long an empty similar-events result (unknown slug, no neighbours) stays fresh
pub const SIMILAR_EVENTS_EMPTY_TTL: Duration = Duration::from_secs(120);

/// Upper bound on cached similar-events results
pub const SIMILAR_EVENTS_MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    expires_at: Instant,
    tags: Vec<&'static str>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent cache whose entries expire after a TTL or when one of their
/// tags is invalidated.
///
/// Writers read [`epoch`](Self::epoch) before computing a value and hand it
/// back to [`insert`](Self::insert); if a tag was invalidated in between the
/// value is dropped instead of cached.
///
/// Inserts keep the map bounded: expired entries are swept at most once per
/// TTL, and a full cache drops its expired entries and then its oldest ones
/// until it is back at 90% of `max_entries`.
#[derive(Debug)]
pub struct TaggedCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    epoch: AtomicU64,
    ttl: Duration,
    max_entries: usize,
    next_sweep: Mutex<Instant>,
}

impl<V: Clone> TaggedCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_max_entries(ttl, SIMILAR_EVENTS_MAX_ENTRIES)
    }

    pub fn with_max_entries(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            epoch: AtomicU64::new(0),
            ttl,
            max_entries: max_entries.max(1),
            next_sweep: Mutex::new(Instant::now() + ttl),
        }
    }

    /// Default time to live for [`insert`](Self::insert)
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let hit = self.entries.get(key).map(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.value.clone())
            }
        })?;

        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            debug!(key, "Removed expired cache entry");
        }
        hit
    }

    /// Current invalidation epoch
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Cache `value` for the default TTL unless an invalidation happened
    /// since `epoch` was read.
    ///
    /// Returns whether the value was stored.
    pub fn insert(&self, epoch: u64, key: impl Into<String>, value: V, tags: &[&'static str]) -> bool {
        self.insert_with_ttl(epoch, key, value, tags, self.ttl)
    }

    /// Same as [`insert`](Self::insert) with an explicit time to live
    pub fn insert_with_ttl(
        &self,
        epoch: u64,
        key: impl Into<String>,
        value: V,
        tags: &[&'static str],
        ttl: Duration,
    ) -> bool {
        if epoch != self.epoch() {
            return false;
        }

        let now = Instant::now();
        self.sweep_if_due(now);

        let key = key.into();
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.make_room(now);
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: now,
                expires_at: now + ttl,
                tags: tags.to_vec(),
            },
        );

        // An invalidation may have raced the insert above.
        if epoch != self.epoch() {
            self.entries.remove(&key);
            return false;
        }
        true
    }

    /// Drop every entry carrying `tag`. Returns how many were removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        self.epoch.fetch_add(1, Ordering::AcqRel);

        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.tags.iter().any(|t| *t == tag));
        let removed = before.saturating_sub(self.entries.len());

        debug!(tag, removed, "Invalidated cache tag");
        removed
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
        removed
    }

    fn sweep_if_due(&self, now: Instant) {
        let due = {
            let mut next = self
                .next_sweep
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if now >= *next {
                *next = now + self.ttl;
                true
            } else {
                false
            }
        };

        if due {
            self.purge_expired_at(now);
        }
    }

    /// Expired entries first, then the oldest until 90% of capacity
    fn make_room(&self, now: Instant) {
        self.purge_expired_at(now);

        let current = self.entries.len();
        if current < self.max_entries {
            return;
        }

        let target = self.max_entries * 9 / 10;
        let evict = current.saturating_sub(target).max(1);

        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().inserted_at))
            .collect();
        by_age.sort_by_key(|(_, inserted_at)| *inserted_at);

        for (key, _) in by_age.into_iter().take(evict) {
            self.entries.remove(&key);
        }

        debug!(evicted = evict, was = current, "Evicted oldest cache entries");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TaggedCache::new(Duration::from_secs(60));
        assert!(cache.insert(cache.epoch(), "rustconf", vec![1, 2], &[EVENTS_TAG]));
        assert_eq!(cache.get("rustconf"), Some(vec![1, 2]));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("rustconf").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("rustconf"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_tag_only_drops_tagged_entries() {
        let cache = TaggedCache::new(SIMILAR_EVENTS_TTL);
        let epoch = cache.epoch();
        cache.insert(epoch, "a", 1, &[EVENTS_TAG]);
        cache.insert(epoch, "b", 2, &["bookings"]);

        assert_eq!(cache.invalidate_tag(EVENTS_TAG), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_insert_with_stale_epoch_is_dropped() {
        let cache = TaggedCache::new(SIMILAR_EVENTS_TTL);
        let epoch = cache.epoch();

        cache.invalidate_tag(EVENTS_TAG);

        assert!(!cache.insert(epoch, "a", 1, &[EVENTS_TAG]));
        assert_eq!(cache.get("a"), None);
        assert!(cache.insert(cache.epoch(), "a", 1, &[EVENTS_TAG]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_swept_on_insert() {
        let ttl = Duration::from_secs(60);
        let cache = TaggedCache::with_max_entries(ttl, 100_000);
        let epoch = cache.epoch();

        for i in 0..10_000 {
            cache.insert(epoch, format!("unknown-{i}"), Vec::<u32>::new(), &[EVENTS_TAG]);
        }
        assert_eq!(cache.len(), 10_000);

        tokio::time::advance(ttl * 5).await;
        assert!(cache.insert(epoch, "rustconf", vec![1], &[EVENTS_TAG]));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("rustconf"), Some(vec![1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_evicts_oldest_entries() {
        let cache = TaggedCache::with_max_entries(SIMILAR_EVENTS_TTL, 10);
        let epoch = cache.epoch();

        for i in 0..10 {
            cache.insert(epoch, format!("event-{i}"), i, &[EVENTS_TAG]);
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.len(), 10);

        assert!(cache.insert(epoch, "event-10", 10, &[EVENTS_TAG]));

        assert!(cache.len() <= 10);
        assert_eq!(cache.get("event-0"), None);
        assert_eq!(cache.get("event-10"), Some(10));
        assert_eq!(cache.get("event-9"), Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_prefers_dropping_expired_entries() {
        let cache = TaggedCache::with_max_entries(SIMILAR_EVENTS_TTL, 4);
        let epoch = cache.epoch();

        cache.insert(epoch, "keep-a", 1, &[EVENTS_TAG]);
        cache.insert(epoch, "keep-b", 2, &[EVENTS_TAG]);
        cache.insert_with_ttl(epoch, "short-a", 3, &[EVENTS_TAG], Duration::from_secs(1));
        cache.insert_with_ttl(epoch, "short-b", 4, &[EVENTS_TAG], Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.insert(epoch, "new", 5, &[EVENTS_TAG]));

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("keep-a"), Some(1));
        assert_eq!(cache.get("keep-b"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_with_ttl_overrides_default() {
        let cache = TaggedCache::new(SIMILAR_EVENTS_TTL);
        cache.insert_with_ttl(cache.epoch(), "nope", 0, &[EVENTS_TAG], SIMILAR_EVENTS_EMPTY_TTL);

        tokio::time::advance(SIMILAR_EVENTS_EMPTY_TTL).await;
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.purge_expired(), 0);
    }
}
