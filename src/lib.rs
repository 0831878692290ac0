//! # Order Wizard
//!
//! Orchestration engine for a multi-stage order-intake workflow: a
//! session-scoped, hierarchical finite-state machine driving client
//! selection, order initialization, repeated item entry through a
//! nested sub-wizard, execution/payment parameters and the final
//! confirmation/legal/receipt stage.
//!
//! The crate provides:
//! - **State & event model**: closed enums plus a data-driven
//!   transition table with guards evaluated by per-stage coordinators
//! - **Session registry**: one lockable FSM instance per session id,
//!   lazy TTL expiry, optional background reaper
//! - **Context store**: namespaced per-session key/value bag with
//!   saved/modified bookkeeping
//! - **Derived views**: stage completion, overall progress, blocking
//!   reasons, operator-facing actions and a consolidated status
//! - **Collaborator boundary**: traits for client lookup, branches,
//!   receipt numbers, pricing, photo storage, legal checks and receipt
//!   rendering
//!
//! ## Design principles
//!
//! 1. **Closed state space**: a session is always in exactly one state
//!    of a closed enum; transitions happen only through the table
//! 2. **Derive, never store**: completion and progress are pure
//!    functions of state, history and context, so they cannot go stale
//! 3. **Atomic commits**: guard, action and commit form one unit under
//!    the session lock; failures leave no partial writes
//! 4. **Session-scoped failure**: an invariant violation poisons one
//!    session, never the engine
//!
//! ## Example
//!
//! ```no_run
//! use order_wizard::{OrderEvent, OrderWizard};
//! # async fn demo(collaborators: order_wizard::collaborators::Collaborators) {
//! let wizard = OrderWizard::new(collaborators);
//! let session = wizard.create_session().await;
//! let status = wizard.send_event(session, OrderEvent::StartOrder).await.unwrap();
//! assert_eq!(status.state_name, "CLIENT_SELECTION");
//! # }
//! ```

#![warn(missing_docs)]

pub mod collaborators;
mod errors;
mod identifiers;
mod orchestrator;
mod registry;
pub mod stages;
pub mod wizard;

pub use errors::{FieldError, WizardError, WizardResult};
pub use identifiers::SessionId;
pub use orchestrator::OrderWizard;
pub use registry::{RegistryConfig, SessionHandle, SessionRegistry};
pub use stages::stage2::OrderItem;
pub use wizard::{
    ActionsAdvisor, CompletionEngine, EventPayload, ItemStep, ItemWizard, OrderEvent, OrderState,
    SessionContext, SessionStatus, Stage, Transition, TransitionRecord, TransitionTable,
    WizardSession, WizardStatus,
};
