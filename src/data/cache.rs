//! Short-lived in-memory cache.
//!
//! Holds one value and the instant it was stored. The lock is held across a
//! refresh, so concurrent callers wait for the first fetch instead of racing.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) >= ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Cached value if fresh at `now`, otherwise the result of `refresh`.
    ///
    /// A failed refresh leaves the previous entry in place.
    pub fn get_or_refresh<E>(
        &self,
        now: Instant,
        refresh: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref() {
            if !entry.is_stale(now, self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        let value = refresh()?;
        *slot = Some(CacheEntry {
            value: value.clone(),
            stored_at: now,
        });
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn serves_cached_value_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let t0 = Instant::now();

        let fetch = || -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };

        assert_eq!(cache.get_or_refresh(t0, fetch), Ok(1));
        assert_eq!(cache.get_or_refresh(t0 + Duration::from_secs(59), fetch), Ok(1));
        assert_eq!(calls.get(), 1);

        assert_eq!(cache.get_or_refresh(t0 + Duration::from_secs(60), fetch), Ok(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_refresh_keeps_previous_entry() {
        let cache = TtlCache::new(Duration::from_secs(1));
        let t0 = Instant::now();
        assert_eq!(cache.get_or_refresh(t0, || Ok::<_, &str>(vec![1])), Ok(vec![1]));

        let later = t0 + Duration::from_secs(5);
        assert_eq!(cache.get_or_refresh(later, || Err("down")), Err("down"));

        // Still stale, but the old entry was not clobbered by the failure.
        let slot = cache.slot.lock().unwrap();
        assert_eq!(slot.as_ref().map(|e| e.value.clone()), Some(vec![1]));
    }

    #[test]
    fn zero_ttl_always_refreshes() {
        let cache = TtlCache::new(Duration::ZERO);
        let t0 = Instant::now();
        assert_eq!(cache.get_or_refresh(t0, || Ok::<_, ()>(1)), Ok(1));
        assert_eq!(cache.get_or_refresh(t0, || Ok::<_, ()>(2)), Ok(2));
    }

    #[test]
    fn staleness_predicate() {
        let t0 = Instant::now();
        let entry = CacheEntry { value: (), stored_at: t0 };
        let ttl = Duration::from_millis(100);
        assert!(!entry.is_stale(t0, ttl));
        assert!(!entry.is_stale(t0 + Duration::from_millis(99), ttl));
        assert!(entry.is_stale(t0 + Duration::from_millis(100), ttl));
    }
}
