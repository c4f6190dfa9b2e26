use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    error::AuthError,
    types::{ChartDate, Flash, Token},
};

/// Sessions untouched for this long are dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on live sessions; the least recently seen one makes room.
pub const MAX_SESSIONS: usize = 10_000;

/// Consent that was started but has not come back through the callback yet.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub code_verifier: String,
    pub state: String,
    pub date: Option<ChartDate>,
}

#[derive(Debug)]
struct Session {
    token: Option<Token>,
    pending: Option<PendingAuth>,
    flashes: Vec<Flash>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            token: None,
            pending: None,
            flashes: Vec::new(),
            last_seen: Instant::now(),
        }
    }

    fn is_empty(&self) -> bool {
        self.token.is_none() && self.pending.is_none() && self.flashes.is_empty()
    }
}

/// In-memory store of per-browser sessions.
///
/// Every session owns its own Spotify token, so concurrent users never see
/// each other's credentials. Nothing survives a restart. A session is removed
/// as soon as it holds nothing, when it goes unused for the TTL, or when the
/// store is full and it is the least recently seen.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_TTL, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    pub async fn token(&self, session_id: &str) -> Option<Token> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        let session = sessions.get_mut(session_id)?;
        if now.duration_since(session.last_seen) > self.ttl {
            sessions.remove(session_id);
            return None;
        }
        session.last_seen = now;
        session.token.clone()
    }

    pub async fn set_token(&self, session_id: &str, token: Token) {
        let mut sessions = self.sessions.lock().await;
        self.session_mut(&mut sessions, session_id).token = Some(token);
    }

    pub async fn clear_token(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.token = None;
        }
        remove_if_empty(&mut sessions, session_id);
    }

    /// Remembers the verifier, state and requested date of a consent redirect.
    ///
    /// Starting a new consent replaces any earlier unfinished one.
    pub async fn begin_auth(&self, session_id: &str, pending: PendingAuth) {
        let mut sessions = self.sessions.lock().await;
        self.session_mut(&mut sessions, session_id).pending = Some(pending);
    }

    /// Takes the pending consent for a callback carrying `state`.
    ///
    /// The pending consent is consumed even when the state does not match, so
    /// a code can never be redeemed twice.
    pub async fn finish_auth(
        &self,
        session_id: &str,
        state: &str,
    ) -> Result<PendingAuth, AuthError> {
        let mut sessions = self.sessions.lock().await;
        let pending = sessions.get_mut(session_id).and_then(|s| s.pending.take());
        remove_if_empty(&mut sessions, session_id);

        let pending =
            pending.ok_or_else(|| AuthError::TokenExchange("no consent in progress".to_string()))?;
        if pending.state != state {
            return Err(AuthError::TokenExchange("state mismatch".to_string()));
        }

        Ok(pending)
    }

    pub async fn push_flash(&self, session_id: &str, flash: Flash) {
        let mut sessions = self.sessions.lock().await;
        self.session_mut(&mut sessions, session_id)
            .flashes
            .push(flash);
    }

    /// Returns and clears the queued flash messages.
    pub async fn take_flashes(&self, session_id: &str) -> Vec<Flash> {
        let mut sessions = self.sessions.lock().await;
        let flashes = sessions
            .get_mut(session_id)
            .map(|s| std::mem::take(&mut s.flashes))
            .unwrap_or_default();
        remove_if_empty(&mut sessions, session_id);
        flashes
    }

    // Fetches or creates a session, expiring stale ones and making room first.
    fn session_mut<'a>(
        &self,
        sessions: &'a mut HashMap<String, Session>,
        session_id: &str,
    ) -> &'a mut Session {
        let now = Instant::now();
        sessions.retain(|_, s| now.duration_since(s.last_seen) <= self.ttl);

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
            }
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
        session.last_seen = now;
        session
    }
}

fn remove_if_empty(sessions: &mut HashMap<String, Session>, session_id: &str) {
    if sessions.get(session_id).is_some_and(Session::is_empty) {
        sessions.remove(session_id);
    }
}
