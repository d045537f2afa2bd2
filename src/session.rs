use std::{
    collections::HashMap,
    convert::Infallible,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, SameSite};
use smartmenu_menu::Planner;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};

/// A planner shared between the request handlers and the background image
/// tasks of one browser session.
pub type SharedPlanner = Arc<Mutex<Planner>>;

#[derive(Debug)]
struct SessionEntry {
    planner: SharedPlanner,
    last_seen: Instant,
}

/// In-memory planners keyed by session id. Nothing outlives the process.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the planner of a session, creating an empty one on first use.
    pub async fn planner(&self, id: &str) -> SharedPlanner {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(id.to_owned())
            .or_insert_with(|| SessionEntry {
                planner: SharedPlanner::default(),
                last_seen: Instant::now(),
            });

        entry.last_seen = Instant::now();
        entry.planner.clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than `idle`. Tasks still holding a
    /// dropped planner finish against their own copy of the handle.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle);

        before - sessions.len()
    }

    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;

            loop {
                interval.tick().await;

                let evicted = store.evict_idle(idle).await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }
}

/// Session id placed in the request extensions by
/// [`crate::middleware::session_middleware`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionId(pub String);

pub fn build_cookie(name: &str, id: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), id.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The caller's planner.
pub struct Session {
    pub id: String,
    pub planner: SharedPlanner,
}

impl FromRequestParts<crate::routes::AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = match parts.extensions.get::<SessionId>() {
            Some(SessionId(id)) => id.to_owned(),
            None => {
                tracing::warn!("Session middleware missing, using a throwaway session");
                ulid::Ulid::new().to_string()
            }
        };

        let planner = state.sessions.planner(&id).await;

        Ok(Session { id, planner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_id_shares_a_planner() {
        let store = SessionStore::new();

        let first = store.planner("a").await;
        let again = store.planner("a").await;
        let other = store.planner("b").await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::new();
        store.planner("a").await;

        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);
        assert_eq!(store.evict_idle(Duration::ZERO).await, 1);
        assert!(store.is_empty().await);
    }
}
