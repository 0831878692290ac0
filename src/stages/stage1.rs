// Copyright 2025 Cowboy AI, LLC.

//! Stage 1 coordinator: client selection and order initialization
//!
//! Owns the `stage1.` context namespace. Client selection only requires
//! a chosen client reference; order initialization checks the branch
//! with the directory collaborator and draws a receipt number for it if
//! none was supplied.

use serde_json::Value;
use tracing::{debug, warn};

use crate::collaborators::Collaborators;
use crate::errors::{FieldError, WizardError, WizardResult};
use crate::wizard::context::keys;
use crate::wizard::event::OrderEvent;

use super::{ContextUpdates, ContextView, Validation};

/// Guard for `CLIENT_SELECTED`: a client must have been chosen
pub(crate) fn guard_client_selected(
    view: &ContextView<'_>,
    event: OrderEvent,
) -> WizardResult<()> {
    let mut validation = Validation::new();
    validation.require(view, keys::CLIENT, "selected client");
    validation.into_result(event)
}

/// Guard for `ORDER_INFO_COMPLETED`: branch and unique tag must be set
///
/// The receipt number is not required here; the action generates one
/// when it is absent.
pub(crate) fn guard_order_info(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = Validation::new();
    validation.require(view, keys::BRANCH, "branch");
    validation.require(view, keys::UNIQUE_TAG, "unique order tag");
    validation.into_result(event)
}

/// Action for `ORDER_INFO_COMPLETED`
///
/// Confirms the branch is accepting orders and fills in the receipt
/// number from the generator collaborator when the caller did not
/// supply one.
pub(crate) async fn order_info_action(
    collaborators: &Collaborators,
    view: &ContextView<'_>,
    event: OrderEvent,
) -> WizardResult<ContextUpdates> {
    let branch = view
        .value(keys::BRANCH)
        .ok_or_else(|| WizardError::ContextMissing {
            key: keys::BRANCH.to_string(),
        })?;
    let branch_id = branch_field(branch, "id").ok_or_else(|| WizardError::ContextMissing {
        key: keys::BRANCH.to_string(),
    })?;

    let available = collaborators
        .branches
        .is_available(branch_id.clone())
        .await
        .map_err(|err| {
            warn!(error = %err, branch = %branch_id, "branch directory failed");
            WizardError::ActionFailed {
                event,
                reason: "branch availability check failed".to_string(),
            }
        })?;

    if !available {
        return Err(WizardError::guard(
            event,
            FieldError::new(
                keys::BRANCH,
                "unavailable",
                "the selected branch is not accepting orders",
            ),
        ));
    }

    let mut updates = ContextUpdates::default();
    if view.text(keys::RECEIPT_NUMBER).is_none() {
        let branch_code = branch_field(branch, "code").unwrap_or_else(|| branch_id.clone());
        let number = collaborators
            .receipt_numbers
            .next_number(branch_code)
            .await
            .map_err(|err| {
                warn!(error = %err, "receipt number generation failed");
                WizardError::ActionFailed {
                    event,
                    reason: "receipt number generation failed".to_string(),
                }
            })?;
        debug!(receipt_number = %number, "generated receipt number");
        updates = updates.set(keys::RECEIPT_NUMBER, Value::String(number));
    }

    Ok(updates)
}

/// Pull a field out of the branch reference, which may be a plain id
/// string or an object
fn branch_field(branch: &Value, field: &str) -> Option<String> {
    match branch {
        Value::String(id) => Some(id.clone()),
        Value::Object(map) => map
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
