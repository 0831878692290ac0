// Copyright 2025 Cowboy AI, LLC.

//! Per-substep validators of the item sub-wizard
//!
//! Each forward event through the sub-wizard is gated by the validator
//! of the substep it completes. Numeric limits follow the business
//! rules of the price list: quantities 1..=1000, base prices
//! 0.01..=100_000, discounts up to 100 %, expedite surcharges
//! 50..=100 %.

use serde_json::Value;

use crate::collaborators::{Collaborators, PricingRequest};
use crate::errors::{FieldError, WizardError, WizardResult};
use crate::wizard::context::keys;
use crate::wizard::event::OrderEvent;
use crate::wizard::item_wizard::ItemStep;

use super::{ContextUpdates, ContextView, Validation};

/// Lowest accepted base unit price
pub const MIN_PRICE: f64 = 0.01;
/// Highest accepted base unit price
pub const MAX_PRICE: f64 = 100_000.0;
/// Highest accepted quantity per item
pub const MAX_QUANTITY: u64 = 1000;
/// Lowest accepted expedite surcharge percent
pub const MIN_EXPEDITE: f64 = 50.0;
/// Highest accepted expedite surcharge percent
pub const MAX_EXPEDITE: f64 = 100.0;

/// Validate one substep of the item draft
pub(crate) fn validate(step: ItemStep, view: &ContextView<'_>) -> Validation {
    match step {
        ItemStep::BasicInfo => validate_basic_info(view),
        ItemStep::Characteristics => validate_characteristics(view),
        ItemStep::DefectsStains => validate_defects_stains(view),
        ItemStep::Pricing => validate_pricing(view),
        ItemStep::Photos => validate_photos(view),
    }
}

/// Validate the whole draft before it is committed to the order
///
/// Re-runs every substep and additionally requires the computed total,
/// which only the pricing collaborator can have produced.
pub(crate) fn validate_complete_draft(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();
    validation.merge(validate_basic_info(view));
    validation.merge(validate_characteristics(view));
    validation.merge(validate_defects_stains(view));
    validation.merge(validate_pricing(view));
    validation.merge(validate_photos(view));

    match view.number(keys::ITEM_TOTAL_PRICE) {
        None => validation.push(FieldError::required(
            keys::ITEM_TOTAL_PRICE,
            "the item price has not been computed",
        )),
        Some(total) if total <= 0.0 => validation.push(FieldError::out_of_range(
            keys::ITEM_TOTAL_PRICE,
            "the computed item price must be positive",
        )),
        Some(_) => {}
    }
    validation
}

fn validate_basic_info(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();

    match view.text(keys::ITEM_NAME) {
        None => validation.require(view, keys::ITEM_NAME, "item name"),
        Some(name) if name.chars().count() < 2 => validation.push(FieldError::out_of_range(
            keys::ITEM_NAME,
            "item name is too short",
        )),
        Some(_) => {}
    }

    match view.text(keys::ITEM_CATEGORY) {
        None => validation.require(view, keys::ITEM_CATEGORY, "category code"),
        Some(code) if code.chars().count() < 2 => validation.push(FieldError::out_of_range(
            keys::ITEM_CATEGORY,
            "category code is too short",
        )),
        Some(_) => {}
    }

    match view.value(keys::ITEM_QUANTITY).and_then(Value::as_u64) {
        None => validation.require(view, keys::ITEM_QUANTITY, "quantity"),
        Some(0) => validation.push(FieldError::out_of_range(
            keys::ITEM_QUANTITY,
            "quantity must be at least 1",
        )),
        Some(q) if q > MAX_QUANTITY => validation.push(FieldError::out_of_range(
            keys::ITEM_QUANTITY,
            format!("quantity must not exceed {MAX_QUANTITY}"),
        )),
        Some(_) => {}
    }

    validation
}

fn validate_characteristics(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();
    validation.require(view, keys::ITEM_MATERIAL, "material");
    validation.require(view, keys::ITEM_COLOR, "color");
    validation
}

fn validate_defects_stains(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();
    for key in [keys::ITEM_DEFECTS, keys::ITEM_STAINS] {
        if let Some(value) = view.value(key) {
            if !value.is_array() {
                validation.push(FieldError::new(
                    key,
                    "invalid",
                    "defect and stain entries must be a list",
                ));
            }
        }
    }
    validation
}

fn validate_pricing(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();

    match view.number(keys::ITEM_BASE_PRICE) {
        None => validation.require(view, keys::ITEM_BASE_PRICE, "base price"),
        Some(price) if !(MIN_PRICE..=MAX_PRICE).contains(&price) => {
            validation.push(FieldError::out_of_range(
                keys::ITEM_BASE_PRICE,
                format!("base price must be between {MIN_PRICE} and {MAX_PRICE}"),
            ));
        }
        Some(_) => {}
    }

    if let Some(discount) = view.number(keys::ITEM_DISCOUNT) {
        if !(0.0..=100.0).contains(&discount) {
            validation.push(FieldError::out_of_range(
                keys::ITEM_DISCOUNT,
                "discount must be between 0 and 100 percent",
            ));
        }
    }

    if let Some(expedite) = view.number(keys::ITEM_EXPEDITE) {
        if !(MIN_EXPEDITE..=MAX_EXPEDITE).contains(&expedite) {
            validation.push(FieldError::out_of_range(
                keys::ITEM_EXPEDITE,
                format!("expedite surcharge must be between {MIN_EXPEDITE} and {MAX_EXPEDITE} percent"),
            ));
        }
    }

    validation
}

fn validate_photos(view: &ContextView<'_>) -> Validation {
    let mut validation = Validation::new();

    let has_photos = view
        .value(keys::ITEM_PHOTOS)
        .and_then(Value::as_array)
        .map(|photos| !photos.is_empty())
        .unwrap_or(false);
    let skip_reason = view.text(keys::ITEM_PHOTO_SKIP_REASON);

    if !has_photos && skip_reason.is_none() {
        validation.push(FieldError::new(
            keys::ITEM_PHOTOS,
            "required",
            "attach at least one photo or skip with a reason",
        ));
    }

    validation
}

/// Compute the item price through the pricing collaborator
///
/// Runs after the pricing validator has accepted the inputs; the quote
/// lands in the draft as the computed unit and total price.
pub(crate) async fn pricing_action(
    collaborators: &Collaborators,
    view: &ContextView<'_>,
    event: OrderEvent,
) -> WizardResult<ContextUpdates> {
    let request = PricingRequest {
        category_code: view.text(keys::ITEM_CATEGORY).ok_or_else(|| {
            WizardError::ContextMissing {
                key: keys::ITEM_CATEGORY.to_string(),
            }
        })?,
        item_name: view.text(keys::ITEM_NAME).ok_or_else(|| {
            WizardError::ContextMissing {
                key: keys::ITEM_NAME.to_string(),
            }
        })?,
        material: view.text(keys::ITEM_MATERIAL),
        color: view.text(keys::ITEM_COLOR),
        quantity: view
            .value(keys::ITEM_QUANTITY)
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32,
        base_unit_price: view.number(keys::ITEM_BASE_PRICE).unwrap_or(0.0),
        modifier_codes: view.get(keys::ITEM_MODIFIERS).unwrap_or_default(),
        expedite_percent: view.number(keys::ITEM_EXPEDITE),
        discount_percent: view.number(keys::ITEM_DISCOUNT),
    };

    let quote = collaborators
        .pricing
        .compute(request)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "pricing collaborator failed");
            WizardError::ActionFailed {
                event,
                reason: "price computation failed".to_string(),
            }
        })?;

    Ok(ContextUpdates::default()
        .set(keys::ITEM_UNIT_PRICE, quote.unit_price.into())
        .set(keys::ITEM_TOTAL_PRICE, quote.total_price.into())
        .set(
            keys::ITEM_MODIFIERS,
            serde_json::to_value(quote.applied_modifiers)?,
        ))
}
