// Copyright 2025 Cowboy AI, LLC.

//! Stage coordinators
//!
//! One coordinator per wizard stage plus the per-substep validators of
//! the item sub-wizard. Coordinators translate domain operations into
//! context mutations and gate forward transitions: the orchestrator
//! asks [`StageCoordinators::guard`] before a transition and
//! [`StageCoordinators::action`] for the side effects, then commits
//! both atomically. A coordinator only touches keys in its own stage's
//! namespace.

pub mod item_steps;
pub mod stage1;
pub mod stage2;
pub mod stage3;
pub mod stage4;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::collaborators::Collaborators;
use crate::errors::{FieldError, WizardError, WizardResult};
use crate::wizard::context::SessionContext;
use crate::wizard::event::{EventPayload, OrderEvent};
use crate::wizard::item_wizard::ItemWizard;
use crate::wizard::session::WizardSession;

/// Merged read view over the context store and an event payload
///
/// Payload entries win: guards must see the data as it will exist after
/// the commit, without mutating anything up front.
pub(crate) struct ContextView<'a> {
    ctx: &'a SessionContext,
    payload: &'a EventPayload,
}

impl<'a> ContextView<'a> {
    pub fn new(ctx: &'a SessionContext, payload: &'a EventPayload) -> Self {
        Self { ctx, payload }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.payload.get(key).or_else(|| self.ctx.value(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.payload.contains_key(key) || self.ctx.contains(key)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.value(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Non-empty trimmed string value
    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(Value::as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(Value::as_bool)
    }
}

/// Field-error collector used by the validators
#[derive(Default)]
pub(crate) struct Validation {
    errors: Vec<FieldError>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Require a non-empty value under `key`
    pub fn require(&mut self, view: &ContextView<'_>, key: &str, label: &str) {
        let present = match view.value(key) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if !present {
            self.push(FieldError::required(key, format!("{label} is required")));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: Validation) {
        self.errors.extend(other.errors);
    }

    pub fn into_result(self, event: OrderEvent) -> WizardResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(WizardError::GuardRejected {
                event,
                errors: self.errors,
            })
        }
    }
}

/// Context mutations produced by a coordinator action
///
/// Collected first, committed by the orchestrator only after the whole
/// pipeline succeeded, so a failed action leaves no partial writes.
#[derive(Debug, Default)]
pub(crate) struct ContextUpdates {
    /// Keys to set
    pub set: Vec<(String, Value)>,
    /// Namespace prefixes to clear
    pub remove_prefixes: Vec<String>,
}

impl ContextUpdates {
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.set.push((key.to_string(), value));
        self
    }

    pub fn remove_prefix(mut self, prefix: &str) -> Self {
        self.remove_prefixes.push(prefix.to_string());
        self
    }

    pub fn apply(self, ctx: &mut SessionContext) {
        for prefix in &self.remove_prefixes {
            ctx.remove_prefix(prefix);
        }
        for (key, value) in self.set {
            ctx.set_value(&key, value);
        }
    }
}

/// Fans events out to the owning stage's guard and action
pub(crate) struct StageCoordinators {
    collaborators: Collaborators,
}

impl StageCoordinators {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Pure validation gate, run before any side effect
    pub fn guard(
        &self,
        session: &WizardSession,
        event: OrderEvent,
        payload: &EventPayload,
    ) -> WizardResult<()> {
        let view = ContextView::new(session.context(), payload);

        if let Some(step) = ItemWizard::step_of(event) {
            return item_steps::validate(step, &view).into_result(event);
        }

        match event {
            OrderEvent::ClientSelected => stage1::guard_client_selected(&view, event),
            OrderEvent::OrderInfoCompleted => stage1::guard_order_info(&view, event),
            OrderEvent::ItemAdded => stage2::guard_item_added(&view, event),
            OrderEvent::ItemsCompleted => stage2::guard_items_completed(&view, event),
            OrderEvent::ExecutionParamsSet => stage3::guard_execution_params(&view, event),
            OrderEvent::DiscountsApplied => stage3::guard_discounts(&view, event),
            OrderEvent::PaymentProcessed => stage3::guard_payment(&view, event),
            OrderEvent::TermsAccepted => stage4::guard_legal(&view, event),
            OrderEvent::ReceiptGenerated => stage4::guard_receipt(&view, event),
            _ => Ok(()),
        }
    }

    /// Side-effecting action for an event
    ///
    /// Returns the context updates to commit with the transition. Any
    /// error rolls the whole transition back: nothing is written.
    pub async fn action(
        &self,
        session: &WizardSession,
        event: OrderEvent,
        payload: &EventPayload,
    ) -> WizardResult<ContextUpdates> {
        let view = ContextView::new(session.context(), payload);

        match event {
            OrderEvent::OrderInfoCompleted => {
                stage1::order_info_action(&self.collaborators, &view, event).await
            }
            OrderEvent::StartItemWizard | OrderEvent::CancelItemWizard => {
                Ok(stage2::discard_draft())
            }
            OrderEvent::PricingCompleted => {
                item_steps::pricing_action(&self.collaborators, &view, event).await
            }
            OrderEvent::ItemAdded => stage2::commit_item(&view, event),
            OrderEvent::TermsAccepted => {
                stage4::legal_action(&self.collaborators, &view, event).await
            }
            OrderEvent::ReceiptGenerated => {
                stage4::receipt_action(&self.collaborators, session, event).await
            }
            _ => Ok(ContextUpdates::default()),
        }
    }

    /// Apply an internal (context-only) event
    pub fn apply_internal(
        &self,
        session: &mut WizardSession,
        event: OrderEvent,
        payload: &EventPayload,
    ) -> WizardResult<()> {
        match event {
            OrderEvent::AutoSave => {
                session.context_mut().mark_saved();
                Ok(())
            }
            OrderEvent::ValidateStep => self.validate_current_step(session, payload),
            OrderEvent::AddItem => stage2::add_item(session, payload),
            OrderEvent::EditItem => stage2::edit_item(session, payload),
            OrderEvent::DeleteItem => stage2::delete_item(session, payload),
            _ => Ok(()),
        }
    }

    /// Run the current state's forward guard without transitioning
    fn validate_current_step(
        &self,
        session: &WizardSession,
        payload: &EventPayload,
    ) -> WizardResult<()> {
        use crate::wizard::transition::TransitionTable;

        match TransitionTable::forward_event(session.current_state()) {
            Some(forward) => self.guard(session, forward, payload),
            None => Ok(()),
        }
    }
}
