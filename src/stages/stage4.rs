// Copyright 2025 Cowboy AI, LLC.

//! Stage 4 coordinator: confirmation, legal aspects and the receipt
//!
//! Owns the `stage4.` namespace. The legal step hands the captured
//! signature to the legal collaborator; receipt generation assembles
//! the finished order's data and asks the renderer for the document.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::collaborators::{Collaborators, SignaturePayload};
use crate::errors::{FieldError, WizardError, WizardResult};
use crate::wizard::context::keys;
use crate::wizard::event::OrderEvent;
use crate::wizard::session::WizardSession;

use super::{ContextUpdates, ContextView, Validation};

/// Guard for `TERMS_ACCEPTED`: the flag must be set and a signature
/// captured
pub(crate) fn guard_legal(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = Validation::new();

    if !view.flag(keys::TERMS_ACCEPTED).unwrap_or(false) {
        validation.push(FieldError::new(
            keys::TERMS_ACCEPTED,
            "required",
            "the service terms must be accepted",
        ));
    }
    validation.require(view, keys::SIGNATURE, "client signature");

    validation.into_result(event)
}

/// Action for `TERMS_ACCEPTED`: validate the signature with the legal
/// collaborator
pub(crate) async fn legal_action(
    collaborators: &Collaborators,
    view: &ContextView<'_>,
    event: OrderEvent,
) -> WizardResult<ContextUpdates> {
    let data = view
        .value(keys::SIGNATURE)
        .and_then(signature_data)
        .ok_or_else(|| WizardError::ContextMissing {
            key: keys::SIGNATURE.to_string(),
        })?;

    let payload = SignaturePayload {
        data,
        terms_accepted: view.flag(keys::TERMS_ACCEPTED).unwrap_or(false),
    };

    let valid = collaborators.legal.validate(payload).await.map_err(|err| {
        warn!(error = %err, "legal collaborator failed");
        WizardError::ActionFailed {
            event,
            reason: "signature validation failed".to_string(),
        }
    })?;

    if !valid {
        return Err(WizardError::guard(
            event,
            FieldError::new(keys::SIGNATURE, "invalid", "the signature was not accepted"),
        ));
    }

    Ok(ContextUpdates::default())
}

/// Guard for `RECEIPT_GENERATED`: legal must have been cleared
pub(crate) fn guard_receipt(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = Validation::new();
    if !view.flag(keys::TERMS_ACCEPTED).unwrap_or(false) {
        validation.push(FieldError::new(
            keys::TERMS_ACCEPTED,
            "required",
            "the receipt cannot be generated before the terms are accepted",
        ));
    }
    validation.into_result(event)
}

/// Action for `RECEIPT_GENERATED`: render the receipt and store its
/// reference
pub(crate) async fn receipt_action(
    collaborators: &Collaborators,
    session: &WizardSession,
    event: OrderEvent,
) -> WizardResult<ContextUpdates> {
    let ctx = session.context();
    let order = json!({
        "session_id": session.id(),
        "client": ctx.value(keys::CLIENT),
        "branch": ctx.value(keys::BRANCH),
        "receipt_number": ctx.value(keys::RECEIPT_NUMBER),
        "unique_tag": ctx.value(keys::UNIQUE_TAG),
        "items": ctx.value(keys::ITEMS),
        "execution_date": ctx.value(keys::EXECUTION_DATE),
        "urgency": ctx.value(keys::URGENCY),
        "discount_percent": ctx.value(keys::DISCOUNT_PERCENT),
        "payment_method": ctx.value(keys::PAYMENT_METHOD),
        "prepaid_amount": ctx.value(keys::PREPAID_AMOUNT),
        "notes": ctx.value(keys::ORDER_NOTES),
    });

    let document = collaborators.receipts.render(order).await.map_err(|err| {
        warn!(error = %err, "receipt renderer failed");
        WizardError::ActionFailed {
            event,
            reason: "receipt rendering failed".to_string(),
        }
    })?;

    info!(document_id = %document.id, "receipt generated");
    Ok(ContextUpdates::default().set(keys::RECEIPT_REF, serde_json::to_value(document)?))
}

/// Signature data may arrive as a plain string or as an object with a
/// `data` field
fn signature_data(value: &Value) -> Option<String> {
    match value {
        Value::String(data) if !data.trim().is_empty() => Some(data.clone()),
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
