//! Single-process counter store

use std::collections::HashMap;
use std::sync::Mutex;

use kernel::error::normalize::BoxError;

use super::{RateLimitStore, WindowCount};

/// Mutex-guarded map of window counters
///
/// The lock covers the whole read-increment-write, so concurrent requests
/// for one key never double- or under-count.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    counters: Mutex<HashMap<String, WindowCount>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live counters
    pub fn len(&self) -> usize {
        self.counters.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn increment(
        &self,
        key: &str,
        window_ms: i64,
        now_ms: i64,
    ) -> Result<WindowCount, BoxError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| "rate limit store lock poisoned")?;

        let entry = counters
            .entry(key.to_string())
            .and_modify(|c| c.count = c.count.saturating_add(1))
            .or_insert(WindowCount {
                count: 1,
                reset_at_ms: now_ms + window_ms,
            });

        Ok(*entry)
    }

    async fn prune_expired(&self, now_ms: i64) -> Result<usize, BoxError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| "rate limit store lock poisoned")?;

        let before = counters.len();
        counters.retain(|_, c| c.reset_at_ms > now_ms);
        Ok(before - counters.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_increment_creates_then_counts() {
        let store = InMemoryRateLimitStore::new();

        let first = store.increment("k", 1_000, 5_000).await.unwrap();
        assert_eq!(first, WindowCount { count: 1, reset_at_ms: 6_000 });

        let second = store.increment("k", 1_000, 5_400).await.unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.reset_at_ms, 6_000);
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let store = InMemoryRateLimitStore::new();
        store.increment("old", 1_000, 0).await.unwrap();
        store.increment("new", 1_000, 900).await.unwrap();

        assert_eq!(store.prune_expired(1_000).await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.prune_expired(2_000).await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_atomic() {
        let store = Arc::new(InMemoryRateLimitStore::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment("shared", 60_000, 0).await.unwrap() })
            })
            .collect();

        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap().count);
        }
        counts.sort_unstable();

        assert_eq!(counts, (1..=64).collect::<Vec<u32>>());
    }
}
