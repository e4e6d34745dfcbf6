//! Time-boxed read-through cache of the restaurant table.
//!
//! The table is the only state shared between sessions. Reads within the TTL
//! reuse the last snapshot; writes call [`TableCache::invalidate`] so the next
//! read goes back to the store.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use lunchmap_core::{Restaurant, RestaurantStore};
use tokio::sync::Mutex;

#[derive(Debug)]
struct Snapshot {
    rows: Arc<Vec<Restaurant>>,
    loaded_at: Instant,
}

#[derive(Debug, Clone)]
pub struct TableCache {
    ttl: Duration,
    state: Arc<Mutex<Option<Snapshot>>>,
}

impl TableCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the cached table, loading it from `store` when missing or stale.
    ///
    /// The lock is held across the load so concurrent misses share one fetch.
    pub async fn get_or_load<S: RestaurantStore>(&self, store: &S) -> Arc<Vec<Restaurant>> {
        let mut slot = self.state.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Arc::clone(&snapshot.rows);
            }
        }

        let rows = Arc::new(store.list_all().await);
        tracing::debug!(rows = rows.len(), "restaurant table loaded");
        *slot = Some(Snapshot {
            rows: Arc::clone(&rows),
            loaded_at: Instant::now(),
        });
        rows
    }

    /// Drops the snapshot and loads a fresh one.
    pub async fn refresh<S: RestaurantStore>(&self, store: &S) -> Arc<Vec<Restaurant>> {
        self.invalidate().await;
        self.get_or_load(store).await
    }

    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lunchmap_core::{Cuisine, NewRestaurant, RestaurantPatch, StoreError};

    use super::*;

    #[derive(Default)]
    struct CountingStore {
        loads: AtomicUsize,
    }

    impl RestaurantStore for CountingStore {
        async fn list_all(&self) -> Vec<Restaurant> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            vec![NewRestaurant {
                name: format!("load {n}"),
                cuisine: Cuisine::Korean,
                rating: 70.0,
                rating_count: 1,
                review: String::new(),
                best_menu: None,
                recommender: None,
                location: None,
                latitude: None,
                longitude: None,
            }
            .with_id(1)]
        }

        async fn insert(&self, _record: &NewRestaurant) -> Result<Restaurant, StoreError> {
            Err(StoreError::NotConfigured)
        }

        async fn update_by_id(
            &self,
            _id: i64,
            _patch: &RestaurantPatch,
        ) -> Result<Restaurant, StoreError> {
            Err(StoreError::NotConfigured)
        }
    }

    #[tokio::test]
    async fn reads_within_ttl_hit_the_cache() {
        let store = CountingStore::default();
        let cache = TableCache::new(Duration::from_secs(60));

        let first = cache.get_or_load(&store).await;
        let second = cache.get_or_load(&store).await;

        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn zero_ttl_always_reloads() {
        let store = CountingStore::default();
        let cache = TableCache::new(Duration::ZERO);

        cache.get_or_load(&store).await;
        let rows = cache.get_or_load(&store).await;

        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
        assert_eq!(rows[0].name, "load 1");
    }

    #[tokio::test]
    async fn invalidate_forces_next_read_to_reload() {
        let store = CountingStore::default();
        let cache = TableCache::new(Duration::from_secs(60));

        cache.get_or_load(&store).await;
        let rows = cache.refresh(&store).await;

        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
        assert_eq!(rows[0].name, "load 1");
    }
}
