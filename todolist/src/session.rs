//! Per-client login state.
//!
//! A [`Session`] is what every page handler receives: whether the client is
//! logged in and, if so, as whom. Sessions live in a [`SessionStore`] keyed by
//! [`SessionId`], so two windows (or two clients) never share login state.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

/// Random identifier of one client session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn {
        username: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub state: SessionState,
    /// Bumped by every successful [`SessionStore::put`]; a copy whose
    /// revision no longer matches the stored one is stale.
    revision: u64,
}

impl Session {
    /// A fresh, logged-out session with a new id.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::LoggedOut,
            revision: 0,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    /// The logged-in username, if any.
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { username } => Some(username),
            SessionState::LoggedOut => None,
        }
    }

    pub fn login(&mut self, username: &str) {
        log::info!("session {} logged in as {username}", self.id);
        self.state = SessionState::LoggedIn {
            username: username.to_string(),
        };
    }

    /// Back to logged out; the username is dropped.
    pub fn logout(&mut self) {
        if let Some(username) = self.username() {
            log::info!("session {} ({username}) logged out", self.id);
        }
        self.state = SessionState::LoggedOut;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutError {
    #[error("session {0} changed since this copy was taken")]
    Stale(SessionId),

    #[error("session {0} is closed")]
    Closed(SessionId),
}

/// Sessions by id.
///
/// Thread-safe via interior `RwLock`. Handlers work on a copy obtained with
/// [`get`](SessionStore::get) and hand it back with [`put`](SessionStore::put),
/// which refuses copies that were overtaken by a later write.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new logged-out session and return its id.
    pub fn open(&self) -> SessionId {
        let session = Session::new();
        let id = session.id;
        self.write().insert(id, session);
        log::debug!("session {id} opened");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.read().get(&id).cloned()
    }

    /// Write back a copy taken with [`get`](SessionStore::get).
    ///
    /// Fails without touching the store if another copy was put back in the
    /// meantime, or if the session was closed.
    pub fn put(&self, mut session: Session) -> Result<(), PutError> {
        let id = session.id;
        let mut sessions = self.write();
        let Some(current) = sessions.get(&id) else {
            return Err(PutError::Closed(id));
        };
        if current.revision != session.revision {
            log::warn!("session {id}: discarding stale write-back");
            return Err(PutError::Stale(id));
        }
        session.revision += 1;
        sessions.insert(id, session);
        Ok(())
    }

    /// Forget a session, returning its last state.
    pub fn close(&self, id: SessionId) -> Option<Session> {
        let closed = self.write().remove(&id);
        if closed.is_some() {
            log::debug!("session {id} closed");
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning is ignored: every write leaves the map consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
