// Copyright 2025 Cowboy AI, LLC.

//! Session registry and lifecycle management
//!
//! One [`WizardSession`] lives behind its own `Arc<Mutex>` so that
//! concurrent requests against the same session are serialized while
//! requests against different sessions run fully in parallel. Expiry is
//! lazy: a lookup on a session idle past the TTL disposes it and
//! reports `SessionNotFound`. An optional background reaper sweeps on
//! an interval, taking each session's lock before disposal so it can
//! never race an in-flight operation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{WizardError, WizardResult};
use crate::identifiers::SessionId;
use crate::wizard::session::WizardSession;
use crate::wizard::state::OrderState;

/// Shared handle to one live session
pub type SessionHandle = Arc<Mutex<WizardSession>>;

/// Registry tuning knobs
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long a session may sit idle before it expires
    pub session_ttl: Duration,
    /// How often the optional reaper sweeps
    pub reaper_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(30 * 60),
            reaper_interval: Duration::from_secs(60),
        }
    }
}

/// In-memory registry of live wizard sessions
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    config: RegistryConfig,
}

impl SessionRegistry {
    /// Create a registry with the given configuration
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// The registry's configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create a new session with a generated id
    pub async fn create(&self) -> SessionId {
        let id = SessionId::new();
        let session = Arc::new(Mutex::new(WizardSession::new(id)));
        self.sessions.write().await.insert(id, session);
        info!(session_id = %id, "wizard session created");
        id
    }

    /// Create a session under a caller-supplied id
    ///
    /// Exactly one FSM instance may exist per id, so a duplicate id is
    /// an initialization failure.
    pub async fn create_with_id(&self, id: SessionId) -> WizardResult<SessionId> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(WizardError::InitializationFailed(format!(
                "session {id} already exists"
            )));
        }
        sessions.insert(id, Arc::new(Mutex::new(WizardSession::new(id))));
        info!(session_id = %id, "wizard session created with caller id");
        Ok(id)
    }

    /// Look up a live session
    ///
    /// An expired session is disposed on the spot and reported as
    /// `SessionNotFound`.
    pub async fn get(&self, id: SessionId) -> WizardResult<SessionHandle> {
        let handle = {
            let sessions = self.sessions.read().await;
            sessions
                .get(&id)
                .cloned()
                .ok_or(WizardError::SessionNotFound(id))?
        };

        if self.is_expired(&handle).await {
            warn!(session_id = %id, "session expired, disposing");
            self.sessions.write().await.remove(&id);
            return Err(WizardError::SessionNotFound(id));
        }

        Ok(handle)
    }

    /// Check whether a session id is live (expiry included)
    pub async fn exists(&self, id: SessionId) -> bool {
        self.get(id).await.is_ok()
    }

    /// Remove a session from the registry
    ///
    /// Returns whether anything was removed. Disposal is final; a
    /// disposed session is never resurrected.
    pub async fn dispose(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "wizard session disposed");
        }
        removed
    }

    /// Snapshot of all live sessions and their states
    pub async fn active_sessions(&self) -> Vec<(SessionId, OrderState)> {
        let handles: Vec<(SessionId, SessionHandle)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, handle)| (*id, handle.clone()))
                .collect()
        };

        let mut result = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let session = handle.lock().await;
            result.push((id, session.current_state()));
        }
        result
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Check whether the registry is empty
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Spawn a background task that sweeps expired sessions
    ///
    /// The reaper takes each session's own lock before disposing it, so
    /// a sweep can never interleave with an in-flight `send_event` on
    /// the same session. Dropping the handle aborts nothing; abort it
    /// explicitly on shutdown.
    pub fn spawn_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(registry.config.reaper_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.sweep_expired().await;
            }
        })
    }

    /// One reaper pass: dispose every expired session
    pub async fn sweep_expired(&self) {
        let candidates: Vec<(SessionId, SessionHandle)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, handle)| (*id, handle.clone()))
                .collect()
        };

        for (id, handle) in candidates {
            // Holding the session lock serializes with in-flight work;
            // re-check under the lock before removing.
            let guard = handle.lock().await;
            if self.expired_at(guard.last_activity()) {
                drop(guard);
                if self.sessions.write().await.remove(&id).is_some() {
                    debug!(session_id = %id, "reaper disposed expired session");
                }
            }
        }
    }

    async fn is_expired(&self, handle: &SessionHandle) -> bool {
        let session = handle.lock().await;
        self.expired_at(session.last_activity())
    }

    fn expired_at(&self, last_activity: chrono::DateTime<Utc>) -> bool {
        let ttl = match chrono::Duration::from_std(self.config.session_ttl) {
            Ok(ttl) => ttl,
            Err(_) => return false,
        };
        Utc::now() - last_activity > ttl
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
