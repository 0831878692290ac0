// Copyright 2025 Cowboy AI, LLC.

//! Wizard session aggregate
//!
//! One `WizardSession` exists per in-progress order creation. It owns
//! the current state, the context store and the append-only transition
//! history, and is only ever mutated through the orchestrator while the
//! registry's per-session lock is held.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{WizardError, WizardResult};
use crate::identifiers::SessionId;
use crate::wizard::context::SessionContext;
use crate::wizard::event::{EventPayload, OrderEvent};
use crate::wizard::state::{OrderState, Stage};

/// Lifecycle status of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Session accepts events
    Active,
    /// An internal invariant violation occurred; events are rejected
    /// until the session is reset or disposed
    Failed {
        /// The recorded failure
        reason: String,
    },
    /// Order was created successfully
    Completed,
    /// Order was abandoned
    Cancelled,
}

/// One applied transition, recorded in order of application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition
    pub from: OrderState,
    /// State after the transition
    pub to: OrderState,
    /// Event that triggered the transition
    pub event: OrderEvent,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
    /// Payload the event carried
    pub payload: EventPayload,
}

/// A running order-creation workflow instance
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: SessionId,
    current_state: OrderState,
    context: SessionContext,
    history: Vec<TransitionRecord>,
    status: SessionStatus,
}

impl WizardSession {
    /// Create a new session in the `INITIAL` state
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            current_state: OrderState::Initial,
            context: SessionContext::new(),
            history: Vec::new(),
            status: SessionStatus::Active,
        }
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current state
    pub fn current_state(&self) -> OrderState {
        self.current_state
    }

    /// Context store (read-only)
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Context store (mutable)
    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    /// Applied transitions, oldest first
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Lifecycle status
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Check whether the session reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.current_state.is_terminal()
    }

    /// Last time anything happened to this session, for expiry checks
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.context.last_modified()
    }

    /// Reject events on failed sessions
    pub fn ensure_active(&self) -> WizardResult<()> {
        if let SessionStatus::Failed { reason } = &self.status {
            return Err(WizardError::SessionFailed {
                id: self.id,
                reason: reason.clone(),
            });
        }
        Ok(())
    }

    /// Apply a legal transition: set the new state and append history
    ///
    /// The caller has already validated legality and guards; this only
    /// commits. Reaching a terminal state flips the lifecycle status.
    pub fn record_transition(
        &mut self,
        to: OrderState,
        event: OrderEvent,
        payload: EventPayload,
    ) {
        let record = TransitionRecord {
            from: self.current_state,
            to,
            event,
            timestamp: Utc::now(),
            payload,
        };
        self.history.push(record);
        self.current_state = to;
        self.context.touch();

        match to {
            OrderState::Completed => self.status = SessionStatus::Completed,
            OrderState::Cancelled => self.status = SessionStatus::Cancelled,
            _ => {}
        }
    }

    /// Record an accepted internal event (no state change)
    pub fn record_internal(&mut self, event: OrderEvent, payload: EventPayload) {
        self.history.push(TransitionRecord {
            from: self.current_state,
            to: self.current_state,
            event,
            timestamp: Utc::now(),
            payload,
        });
        self.context.touch();
    }

    /// Mark the session failed; further events are rejected
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = SessionStatus::Failed {
            reason: reason.into(),
        };
        self.context.touch();
    }

    /// Reset to a pristine `INITIAL` session, keeping the id
    pub fn reset(&mut self) {
        self.current_state = OrderState::Initial;
        self.context = SessionContext::new();
        self.history.clear();
        self.status = SessionStatus::Active;
    }

    /// The furthest stage this session has reached
    ///
    /// Derived from the transition history plus the current state so
    /// that back-navigation never regresses completion. `CANCELLED`
    /// does not count as progress.
    pub fn furthest_stage(&self) -> u8 {
        let progress_of = |state: OrderState| match state {
            OrderState::Cancelled => 0,
            other => other.stage().number(),
        };

        self.history
            .iter()
            .map(|record| progress_of(record.to))
            .chain(std::iter::once(progress_of(self.current_state)))
            .max()
            .unwrap_or(Stage::ClientIntake.number())
    }
}
