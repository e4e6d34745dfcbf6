//! In-memory registry of per-session browse state.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use lunchmap_core::SelectionState;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    state: SelectionState,
    touched_at: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, idle: Duration) -> bool {
        now.duration_since(self.touched_at) >= idle
    }
}

/// Nothing is persisted. A session untouched for longer than the idle window
/// is dropped; `create` sweeps idle entries so the map stays bounded by
/// recent activity.
#[derive(Debug, Clone)]
pub struct SessionStore {
    idle: Duration,
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn create(&self) -> (Uuid, SelectionState) {
        let id = Uuid::new_v4();
        let state = SelectionState::new();
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.idle));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "dropped idle sessions");
        }
        sessions.insert(
            id,
            Entry {
                state: state.clone(),
                touched_at: now,
            },
        );
        (id, state)
    }

    /// Returns the session and marks it as recently used. An idle session
    /// reads as missing.
    pub async fn get(&self, id: Uuid) -> Option<SelectionState> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&id)?.is_idle(now, self.idle) {
            sessions.remove(&id);
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.touched_at = now;
        Some(entry.state.clone())
    }

    /// Stores `state` unless a newer version is already present.
    ///
    /// Returns the state that ends up stored.
    pub async fn put(&self, id: Uuid, state: SelectionState) -> SelectionState {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&id) {
            Some(current) if current.state.version > state.version => {
                current.touched_at = now;
                current.state.clone()
            }
            _ => {
                sessions.insert(
                    id,
                    Entry {
                        state: state.clone(),
                        touched_at: now,
                    },
                );
                state
            }
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use lunchmap_core::SortOption;

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn create_then_get_returns_default_state() {
        let store = SessionStore::new(HOUR);
        let (id, state) = store.create().await;
        assert_eq!(store.get(id).await, Some(state));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let store = SessionStore::new(HOUR);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn put_keeps_the_newer_version() {
        let store = SessionStore::new(HOUR);
        let (id, base) = store.create().await;

        let newer = base
            .clone()
            .set_sort_option(SortOption::Distance)
            .set_sort_option(SortOption::Newest);
        store.put(id, newer.clone()).await;

        let stale = base.set_sort_option(SortOption::Distance);
        let kept = store.put(id, stale).await;

        assert_eq!(kept, newer);
        assert_eq!(store.get(id).await, Some(newer));
    }

    #[tokio::test]
    async fn create_drops_idle_sessions() {
        let store = SessionStore::new(Duration::from_millis(50));
        for _ in 0..3 {
            store.create().await;
        }
        assert_eq!(store.count().await, 3);

        tokio::time::sleep(Duration::from_millis(80)).await;
        let (fresh, _) = store.create().await;

        assert_eq!(store.count().await, 1);
        assert!(store.get(fresh).await.is_some());
    }

    #[tokio::test]
    async fn idle_session_reads_as_missing() {
        let store = SessionStore::new(Duration::from_millis(50));
        let (id, _) = store.create().await;

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(store.get(id).await.is_none());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn get_keeps_a_session_alive() {
        let store = SessionStore::new(Duration::from_millis(400));
        let (id, _) = store.create().await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(store.get(id).await.is_some());
        tokio::time::sleep(Duration::from_millis(250)).await;
        store.create().await;

        assert!(store.get(id).await.is_some());
        assert_eq!(store.count().await, 2);
    }
}
