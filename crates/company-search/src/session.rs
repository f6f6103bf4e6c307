//! Shared-password gate and per-session state
//!
//! Each browser session carries one flag. The gate compares a candidate
//! password against the configured secret and flips that flag. The store only
//! records sessions that have logged in at least once, and forgets them once
//! they sit idle too long; any other caller is simply unauthenticated.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
  pub authenticated: bool,
}

/// Single shared-secret check. No lockout, no rate limiting.
pub struct SessionGate {
  secret: String,
}

impl SessionGate {
  pub fn new(secret: impl Into<String>) -> Self {
    Self { secret: secret.into() }
  }

  /// Mark the session authenticated when `candidate` matches the secret
  pub fn authenticate(&self, session: &mut SessionState, candidate: &str) -> bool {
    if candidate.as_bytes().ct_eq(self.secret.as_bytes()).into() {
      session.authenticated = true;
      true
    } else {
      false
    }
  }

  pub fn logout(&self, session: &mut SessionState) {
    session.authenticated = false;
  }
}

struct SessionEntry {
  state: SessionState,
  last_seen: Instant,
}

/// In-memory session table shared by all requests
#[derive(Clone)]
pub struct SessionStore {
  sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
  idle_timeout: Duration,
}

impl SessionStore {
  pub fn new(idle_timeout: Duration) -> Self {
    Self { sessions: Arc::new(RwLock::new(HashMap::new())), idle_timeout }
  }

  /// Current state of a live session, refreshing its idle clock
  pub async fn touch(&self, id: &Uuid) -> Option<SessionState> {
    let mut sessions = self.sessions.write().await;
    let now = Instant::now();
    let entry = sessions.get_mut(id)?;
    if now.duration_since(entry.last_seen) < self.idle_timeout {
      entry.last_seen = now;
      return Some(entry.state);
    }

    sessions.remove(id);
    None
  }

  /// Store `state` under `id` when that session is live. Otherwise start a new
  /// session (pruning idle ones first) and return its id.
  pub async fn save(&self, id: Option<Uuid>, state: SessionState) -> Option<Uuid> {
    let mut sessions = self.sessions.write().await;
    let now = Instant::now();
    sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);

    if let Some(entry) = id.and_then(|id| sessions.get_mut(&id)) {
      *entry = SessionEntry { state, last_seen: now };
      return None;
    }

    let id = Uuid::new_v4();
    sessions.insert(id, SessionEntry { state, last_seen: now });
    Some(id)
  }

  /// Sessions that have not sat idle past the timeout
  pub async fn active_count(&self) -> usize {
    let now = Instant::now();
    let sessions = self.sessions.read().await;
    sessions.values().filter(|entry| now.duration_since(entry.last_seen) < self.idle_timeout).count()
  }
}
