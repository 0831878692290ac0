// Copyright 2025 Cowboy AI, LLC.

//! Stage 2 coordinator: item management
//!
//! Owns the `stage2.` namespace (the committed item list) and the
//! `item.` draft namespace the sub-wizard works in. Committing a draft
//! and the direct list operations (`ADD_ITEM`/`EDIT_ITEM`/`DELETE_ITEM`)
//! both funnel through the same duplicate-tag check.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::collaborators::PhotoRef;
use crate::errors::{FieldError, WizardError, WizardResult};
use crate::wizard::context::keys;
use crate::wizard::event::{EventPayload, OrderEvent};
use crate::wizard::session::WizardSession;

use super::{item_steps, ContextUpdates, ContextView};

/// One garment committed to the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Item name
    pub name: String,
    /// Service category code
    pub category_code: String,
    /// Quantity
    pub quantity: u32,
    /// Material, if recorded
    #[serde(default)]
    pub material: Option<String>,
    /// Color, if recorded
    #[serde(default)]
    pub color: Option<String>,
    /// Filler, if recorded
    #[serde(default)]
    pub filler: Option<String>,
    /// Wear level, if recorded
    #[serde(default)]
    pub wear_level: Option<String>,
    /// Defects found during intake
    #[serde(default)]
    pub defects: Vec<String>,
    /// Stains found during intake
    #[serde(default)]
    pub stains: Vec<String>,
    /// Base unit price before modifiers
    pub base_unit_price: f64,
    /// Applied price modifier codes
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Computed unit price
    pub unit_price: f64,
    /// Computed total price
    pub total_price: f64,
    /// Attached photo references
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    /// Reason photos were skipped, when they were
    #[serde(default)]
    pub photo_skip_reason: Option<String>,
    /// Per-item tag, if assigned
    #[serde(default)]
    pub tag: Option<String>,
}

/// Guard for `ITEMS_COMPLETED`: at least one item must exist
///
/// Deliberately the minimal gate; anything stricter the legacy flow did
/// in some of its item states is not reproduced.
pub(crate) fn guard_items_completed(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let count = view
        .value(keys::ITEMS)
        .and_then(Value::as_array)
        .map(|items| items.len())
        .unwrap_or(0);

    if count == 0 {
        return Err(WizardError::guard(
            event,
            FieldError::required(keys::ITEMS, "add at least one item before continuing"),
        ));
    }
    Ok(())
}

/// Guard for `ITEM_ADDED`: the whole draft must validate, and its tag
/// must not collide with an already committed item
pub(crate) fn guard_item_added(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = item_steps::validate_complete_draft(view);

    if let Some(tag) = view.text(keys::ITEM_TAG) {
        let duplicate = committed_items(view)
            .iter()
            .any(|item| item.tag.as_deref() == Some(tag.as_str()));
        if duplicate {
            validation.push(FieldError::new(
                keys::ITEM_TAG,
                "duplicate",
                format!("tag {tag} is already used by another item"),
            ));
        }
    }

    validation.into_result(event)
}

/// Action for `ITEM_ADDED`: build the item from the draft, append it to
/// the committed list and clear the draft namespace
pub(crate) fn commit_item(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<ContextUpdates> {
    let item = draft_item(view)?;
    debug!(item = %item.name, total = item.total_price, "committing drafted item");

    let mut items = committed_items(view);
    items.push(item);

    Ok(ContextUpdates::default()
        .set(keys::ITEMS, serde_json::to_value(items)?)
        .remove_prefix(keys::ITEM_DRAFT_PREFIX))
}

/// Updates that discard the in-progress draft
pub(crate) fn discard_draft() -> ContextUpdates {
    ContextUpdates::default().remove_prefix(keys::ITEM_DRAFT_PREFIX)
}

/// `ADD_ITEM`: append a fully-formed item carried in the payload
pub(crate) fn add_item(session: &mut WizardSession, payload: &EventPayload) -> WizardResult<()> {
    let item = payload_item(payload, OrderEvent::AddItem)?;

    let mut items: Vec<OrderItem> = session.context().get(keys::ITEMS).unwrap_or_default();
    if let Some(tag) = item.tag.as_deref() {
        if items.iter().any(|existing| existing.tag.as_deref() == Some(tag)) {
            return Err(WizardError::guard(
                OrderEvent::AddItem,
                FieldError::new(
                    keys::ITEM_TAG,
                    "duplicate",
                    format!("tag {tag} is already used by another item"),
                ),
            ));
        }
    }
    items.push(item);
    session.context_mut().set(keys::ITEMS, items)?;
    Ok(())
}

/// `EDIT_ITEM`: replace the item at the payload's index
pub(crate) fn edit_item(session: &mut WizardSession, payload: &EventPayload) -> WizardResult<()> {
    let index = payload_index(payload, OrderEvent::EditItem)?;
    let item = payload_item(payload, OrderEvent::EditItem)?;

    let mut items: Vec<OrderItem> = session.context().get(keys::ITEMS).unwrap_or_default();
    if index >= items.len() {
        return Err(index_error(OrderEvent::EditItem, index, items.len()));
    }
    items[index] = item;
    session.context_mut().set(keys::ITEMS, items)?;
    Ok(())
}

/// `DELETE_ITEM`: remove the item at the payload's index
pub(crate) fn delete_item(session: &mut WizardSession, payload: &EventPayload) -> WizardResult<()> {
    let index = payload_index(payload, OrderEvent::DeleteItem)?;

    let mut items: Vec<OrderItem> = session.context().get(keys::ITEMS).unwrap_or_default();
    if index >= items.len() {
        return Err(index_error(OrderEvent::DeleteItem, index, items.len()));
    }
    items.remove(index);
    session.context_mut().set(keys::ITEMS, items)?;
    Ok(())
}

fn committed_items(view: &ContextView<'_>) -> Vec<OrderItem> {
    view.get(keys::ITEMS).unwrap_or_default()
}

/// Assemble an [`OrderItem`] from the draft namespace
fn draft_item(view: &ContextView<'_>) -> WizardResult<OrderItem> {
    let required_text = |key: &str| {
        view.text(key).ok_or_else(|| WizardError::ContextMissing {
            key: key.to_string(),
        })
    };

    Ok(OrderItem {
        name: required_text(keys::ITEM_NAME)?,
        category_code: required_text(keys::ITEM_CATEGORY)?,
        quantity: view
            .value(keys::ITEM_QUANTITY)
            .and_then(Value::as_u64)
            .ok_or_else(|| WizardError::ContextMissing {
                key: keys::ITEM_QUANTITY.to_string(),
            })? as u32,
        material: view.text(keys::ITEM_MATERIAL),
        color: view.text(keys::ITEM_COLOR),
        filler: view.text(keys::ITEM_FILLER),
        wear_level: view.text(keys::ITEM_WEAR_LEVEL),
        defects: view.get(keys::ITEM_DEFECTS).unwrap_or_default(),
        stains: view.get(keys::ITEM_STAINS).unwrap_or_default(),
        base_unit_price: view.number(keys::ITEM_BASE_PRICE).unwrap_or(0.0),
        modifiers: view.get(keys::ITEM_MODIFIERS).unwrap_or_default(),
        unit_price: view.number(keys::ITEM_UNIT_PRICE).unwrap_or(0.0),
        total_price: view
            .number(keys::ITEM_TOTAL_PRICE)
            .ok_or_else(|| WizardError::ContextMissing {
                key: keys::ITEM_TOTAL_PRICE.to_string(),
            })?,
        photos: view.get(keys::ITEM_PHOTOS).unwrap_or_default(),
        photo_skip_reason: view.text(keys::ITEM_PHOTO_SKIP_REASON),
        tag: view.text(keys::ITEM_TAG),
    })
}

fn payload_item(payload: &EventPayload, event: OrderEvent) -> WizardResult<OrderItem> {
    let value = payload.get(keys::ITEM).ok_or_else(|| {
        WizardError::guard(
            event,
            FieldError::required(keys::ITEM, "an item payload is required"),
        )
    })?;
    serde_json::from_value(value.clone()).map_err(|err| {
        WizardError::guard(
            event,
            FieldError::new(keys::ITEM, "invalid", format!("malformed item: {err}")),
        )
    })
}

fn payload_index(payload: &EventPayload, event: OrderEvent) -> WizardResult<usize> {
    payload
        .get(keys::ITEM_INDEX)
        .and_then(Value::as_u64)
        .map(|index| index as usize)
        .ok_or_else(|| {
            WizardError::guard(
                event,
                FieldError::required(keys::ITEM_INDEX, "an item index is required"),
            )
        })
}

fn index_error(event: OrderEvent, index: usize, len: usize) -> WizardError {
    WizardError::guard(
        event,
        FieldError::out_of_range(
            keys::ITEM_INDEX,
            format!("index {index} is out of range for {len} item(s)"),
        ),
    )
}
