// Copyright 2025 Cowboy AI, LLC.

//! Error types for wizard operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::SessionId;
use crate::wizard::event::OrderEvent;
use crate::wizard::state::OrderState;

/// A single field-level validation failure surfaced to the caller
///
/// Carries the offending field, a stable machine-readable reason code,
/// and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Context key or logical field that failed validation
    pub field: String,
    /// Stable reason code (e.g. `required`, `out_of_range`, `duplicate`)
    pub code: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing required field
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, "required", message)
    }

    /// Shorthand for a value outside its allowed range
    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, "out_of_range", message)
    }
}

/// Errors that can occur in wizard operations
///
/// Validation and guard failures are recoverable and carry structured,
/// user-facing detail; `ContextMissing` and `InitializationFailed` are
/// invariant violations fatal to the affected session only.
#[derive(Debug, Clone, Error)]
pub enum WizardError {
    /// Referenced session does not exist or has expired
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Requested event is not in the current state's legal event set
    #[error("Event {event} is not legal in state {state}")]
    IllegalTransition {
        /// State the session was in when the event arrived
        state: OrderState,
        /// The rejected event
        event: OrderEvent,
        /// Events that are legal from this state
        available: Vec<OrderEvent>,
    },

    /// Event was legal but a stage coordinator's validation failed
    #[error("Guard rejected event {event}: {} field error(s)", errors.len())]
    GuardRejected {
        /// The event whose guard failed
        event: OrderEvent,
        /// Field-level validation failures
        errors: Vec<FieldError>,
    },

    /// A stage coordinator's side-effecting action failed; the transition
    /// was rolled back as a unit
    #[error("Action for event {event} failed: {reason}")]
    ActionFailed {
        /// The event whose action failed
        event: OrderEvent,
        /// What went wrong, without internal detail
        reason: String,
    },

    /// A coordinator expected a session-scoped value that was not present
    #[error("Required context value missing: {key}")]
    ContextMissing {
        /// The absent context key
        key: String,
    },

    /// Session could not be initialized
    #[error("Session initialization failed: {0}")]
    InitializationFailed(String),

    /// Session was marked failed by an earlier invariant violation and
    /// rejects all events until reset or disposed
    #[error("Session {id} is failed: {reason}")]
    SessionFailed {
        /// The failed session
        id: SessionId,
        /// The failure recorded when the session was marked
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::Serialization(err.to_string())
    }
}

impl WizardError {
    /// Guard rejection with a single field error
    pub fn guard(event: OrderEvent, error: FieldError) -> Self {
        WizardError::GuardRejected {
            event,
            errors: vec![error],
        }
    }

    /// True if this error is fatal for the session it concerns
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WizardError::ContextMissing { .. } | WizardError::InitializationFailed(_)
        )
    }
}
