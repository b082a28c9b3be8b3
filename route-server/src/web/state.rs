//! Application state for the web layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::engine::Evaluate;
use crate::searchlog::SearchLogClient;
use crate::selection::SelectionHandle;

/// Default time a session may go untouched before it is dropped.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Shared application state.
///
/// Contains the evaluation engine and the open selection sessions.
pub struct AppState<E> {
    /// Route evaluation engine shared by every session
    pub engine: Arc<E>,

    /// Open sessions by id. Idle sessions expire; dropping the last handle
    /// stops the session task.
    sessions: MokaCache<u64, SelectionHandle>,

    next_session: Arc<AtomicU64>,

    /// Search history logging, if configured
    pub search_log: Option<SearchLogClient>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            sessions: self.sessions.clone(),
            next_session: Arc::clone(&self.next_session),
            search_log: self.search_log.clone(),
        }
    }
}

impl<E: Evaluate> AppState<E> {
    /// Create state whose sessions expire after `session_idle` without use.
    pub fn new(engine: E, search_log: Option<SearchLogClient>, session_idle: Duration) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(session_idle)
            .eviction_listener(|id: Arc<u64>, _, cause| {
                debug!(session_id = *id, ?cause, "session dropped");
            })
            .build();

        Self {
            engine: Arc::new(engine),
            sessions,
            next_session: Arc::new(AtomicU64::new(1)),
            search_log,
        }
    }

    /// Open a new session.
    pub async fn create_session(&self) -> (u64, SelectionHandle) {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let handle = SelectionHandle::spawn(Arc::clone(&self.engine));
        self.sessions.insert(id, handle.clone()).await;
        (id, handle)
    }

    /// Look up a session, refreshing its idle timer.
    pub async fn session(&self, id: u64) -> Option<SelectionHandle> {
        self.sessions.get(&id).await
    }

    /// Close a session; its task stops once outstanding handles are gone.
    pub async fn remove_session(&self, id: u64) -> bool {
        self.sessions.remove(&id).await.is_some()
    }

    pub async fn session_count(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvaluatedRoute;
    use crate::engine::EngineConfig;
    use crate::providers::{FetchError, RouteQuery};

    struct NoRoutes(EngineConfig);

    impl Evaluate for NoRoutes {
        fn config(&self) -> &EngineConfig {
            &self.0
        }

        async fn evaluate(&self, _query: &RouteQuery) -> Result<Vec<EvaluatedRoute>, FetchError> {
            Ok(vec![])
        }
    }

    fn state(idle: Duration) -> AppState<NoRoutes> {
        AppState::new(NoRoutes(EngineConfig::default()), None, idle)
    }

    #[tokio::test]
    async fn sessions_get_distinct_ids() {
        let state = state(DEFAULT_SESSION_IDLE);
        let (first, _) = state.create_session().await;
        let (second, _) = state.create_session().await;

        assert_ne!(first, second);
        assert!(state.session(first).await.is_some());
        assert_eq!(state.session_count().await, 2);

        assert!(state.remove_session(first).await);
        assert!(!state.remove_session(first).await);
        assert_eq!(state.session_count().await, 1);
    }

    // Expiry runs on the cache's own clock, so this sleeps for real.
    #[tokio::test]
    async fn idle_session_expires() {
        let state = state(Duration::from_millis(200));
        let (kept, _) = state.create_session().await;
        let (idle, handle) = state.create_session().await;
        drop(handle);

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(state.session(kept).await.is_some());
        }

        assert!(state.session(idle).await.is_none());
        assert_eq!(state.session_count().await, 1);
    }
}
