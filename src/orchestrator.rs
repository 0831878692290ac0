// Copyright 2025 Cowboy AI, LLC.

//! State orchestration facade
//!
//! The single entry point callers talk to. `send_event` runs the whole
//! pipeline under the session's lock: legality against the transition
//! table, the owning stage coordinator's guard, the coordinator's
//! side-effecting action, then one atomic commit of payload, action
//! outputs, state change and history record. Any failure before the
//! commit leaves the session untouched.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collaborators::Collaborators;
use crate::errors::{WizardError, WizardResult};
use crate::identifiers::SessionId;
use crate::registry::SessionRegistry;
use crate::stages::StageCoordinators;
use crate::wizard::event::{EventPayload, OrderEvent};
use crate::wizard::session::TransitionRecord;
use crate::wizard::state::OrderState;
use crate::wizard::status::WizardStatus;
use crate::wizard::transition::{Transition, TransitionTable};

/// The order wizard orchestration engine
///
/// Owns the session registry and the stage coordinators; every exposed
/// operation takes a session id and serializes against that session's
/// lock. Operations on different sessions never block each other.
pub struct OrderWizard {
    registry: Arc<SessionRegistry>,
    coordinators: StageCoordinators,
}

impl OrderWizard {
    /// Create an engine with a default registry
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_registry(collaborators, Arc::new(SessionRegistry::default()))
    }

    /// Create an engine over an existing registry
    pub fn with_registry(collaborators: Collaborators, registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            coordinators: StageCoordinators::new(collaborators),
        }
    }

    /// The underlying session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Create a new session; it starts in `INITIAL`
    pub async fn create_session(&self) -> SessionId {
        self.registry.create().await
    }

    /// Create a session under a caller-supplied id
    pub async fn create_session_with_id(&self, id: SessionId) -> WizardResult<SessionId> {
        self.registry.create_with_id(id).await
    }

    /// Current state of a session
    pub async fn current_state(&self, id: SessionId) -> WizardResult<OrderState> {
        let handle = self.registry.get(id).await?;
        let session = handle.lock().await;
        Ok(session.current_state())
    }

    /// Send an event without a payload
    pub async fn send_event(
        &self,
        id: SessionId,
        event: OrderEvent,
    ) -> WizardResult<WizardStatus> {
        self.send_event_with(id, event, EventPayload::new()).await
    }

    /// Send an event carrying a payload
    ///
    /// On success the returned status reflects the session after the
    /// transition. On any error the session is provably unchanged: no
    /// state change, no context write, no history entry.
    pub async fn send_event_with(
        &self,
        id: SessionId,
        event: OrderEvent,
        payload: EventPayload,
    ) -> WizardResult<WizardStatus> {
        let handle = self.registry.get(id).await?;
        let mut session = handle.lock().await;

        session.ensure_active()?;
        let state = session.current_state();

        let transition = TransitionTable::resolve(state, event).ok_or_else(|| {
            debug!(session_id = %id, state = %state, event = %event, "event rejected");
            WizardError::IllegalTransition {
                state,
                event,
                available: TransitionTable::available_events(state),
            }
        })?;

        match transition {
            Transition::Internal => {
                self.coordinators
                    .apply_internal(&mut session, event, &payload)?;
                if matches!(
                    event,
                    OrderEvent::AddItem | OrderEvent::EditItem | OrderEvent::DeleteItem
                ) {
                    session.record_internal(event, payload);
                }
                debug!(session_id = %id, event = %event, "internal event applied");
                Ok(WizardStatus::assemble(&session))
            }
            Transition::External(target) => {
                // GO_FORWARD is dispatched to its underlying event so
                // the right coordinator guards and acts.
                let effective = match event {
                    OrderEvent::GoForward => {
                        TransitionTable::forward_event(state).unwrap_or(event)
                    }
                    other => other,
                };

                if let Err(err) = self.coordinators.guard(&session, effective, &payload) {
                    return Err(self.escalate(&mut session, err));
                }

                let updates = match self.coordinators.action(&session, effective, &payload).await {
                    Ok(updates) => updates,
                    Err(err) => return Err(self.escalate(&mut session, err)),
                };

                session.context_mut().merge(&payload);
                updates.apply(session.context_mut());
                session.record_transition(target, effective, payload);

                // The sub-wizard's terminal state hands control back to
                // the item manager within the same commit, so callers
                // observe ITEM_MANAGEMENT after ITEM_ADDED.
                if target == OrderState::ItemCompleted {
                    session.record_transition(
                        OrderState::ItemManagement,
                        effective,
                        EventPayload::new(),
                    );
                }

                info!(
                    session_id = %id,
                    from = %state,
                    to = %session.current_state(),
                    event = %effective,
                    "transition applied"
                );
                Ok(WizardStatus::assemble(&session))
            }
        }
    }

    /// Check whether an event is currently sendable
    ///
    /// Answers from the transition table only; stage guards are not
    /// evaluated until the event is actually sent.
    pub async fn can_send_event(&self, id: SessionId, event: OrderEvent) -> bool {
        match self.registry.get(id).await {
            Ok(handle) => {
                let session = handle.lock().await;
                session.ensure_active().is_ok()
                    && TransitionTable::can_send_event(session.current_state(), event)
            }
            Err(_) => false,
        }
    }

    /// Consolidated status view of a session
    pub async fn status(&self, id: SessionId) -> WizardResult<WizardStatus> {
        let handle = self.registry.get(id).await?;
        let session = handle.lock().await;
        Ok(WizardStatus::assemble(&session))
    }

    /// Snapshot of the session's context data
    pub async fn data(&self, id: SessionId) -> WizardResult<IndexMap<String, Value>> {
        let handle = self.registry.get(id).await?;
        let session = handle.lock().await;
        Ok(session.context().snapshot())
    }

    /// Read one context value
    pub async fn get_data(&self, id: SessionId, key: &str) -> WizardResult<Option<Value>> {
        let handle = self.registry.get(id).await?;
        let session = handle.lock().await;
        Ok(session.context().value(key).cloned())
    }

    /// Write one context value
    pub async fn set_data(&self, id: SessionId, key: &str, value: Value) -> WizardResult<()> {
        let handle = self.registry.get(id).await?;
        let mut session = handle.lock().await;
        session.ensure_active()?;
        session.context_mut().set_value(key, value);
        Ok(())
    }

    /// Mark the session's data as saved
    pub async fn mark_saved(&self, id: SessionId) -> WizardResult<()> {
        let handle = self.registry.get(id).await?;
        let mut session = handle.lock().await;
        session.context_mut().mark_saved();
        Ok(())
    }

    /// The session's transition history, oldest first
    pub async fn history(&self, id: SessionId) -> WizardResult<Vec<TransitionRecord>> {
        let handle = self.registry.get(id).await?;
        let session = handle.lock().await;
        Ok(session.history().to_vec())
    }

    /// Reset a session back to a pristine `INITIAL`, keeping its id
    ///
    /// The recovery path for failed sessions.
    pub async fn reset(&self, id: SessionId) -> WizardResult<()> {
        let handle = self.registry.get(id).await?;
        let mut session = handle.lock().await;
        session.reset();
        info!(session_id = %id, "session reset");
        Ok(())
    }

    /// Dispose a session, removing it from the registry
    pub async fn dispose(&self, id: SessionId) -> bool {
        self.registry.dispose(id).await
    }

    /// Mark the session failed when an error is fatal for it
    fn escalate(
        &self,
        session: &mut crate::wizard::session::WizardSession,
        err: WizardError,
    ) -> WizardError {
        if err.is_fatal() {
            warn!(session_id = %session.id(), error = %err, "session marked failed");
            session.mark_failed(err.to_string());
        }
        err
    }
}
