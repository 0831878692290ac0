// Copyright 2025 Cowboy AI, LLC.

//! Stage 3 coordinator: execution, discounts and payment
//!
//! Owns the `stage3.` namespace. Everything here is pure validation;
//! no collaborator is involved.

use chrono::NaiveDate;

use crate::errors::{FieldError, WizardResult};
use crate::wizard::context::keys;
use crate::wizard::event::OrderEvent;

use super::{ContextView, Validation};

/// Accepted urgency levels, in increasing priority
pub const URGENCY_LEVELS: [&str; 3] = ["standard", "express_48h", "express_24h"];

/// Accepted payment methods
pub const PAYMENT_METHODS: [&str; 3] = ["cash", "card", "bank_transfer"];

/// Guard for `EXECUTION_PARAMS_SET`: a parseable execution date and a
/// known urgency level
pub(crate) fn guard_execution_params(
    view: &ContextView<'_>,
    event: OrderEvent,
) -> WizardResult<()> {
    let mut validation = Validation::new();

    match view.text(keys::EXECUTION_DATE) {
        None => validation.require(view, keys::EXECUTION_DATE, "execution date"),
        Some(date) if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() => {
            validation.push(FieldError::new(
                keys::EXECUTION_DATE,
                "invalid",
                "execution date must be an ISO date (YYYY-MM-DD)",
            ));
        }
        Some(_) => {}
    }

    if let Some(urgency) = view.text(keys::URGENCY) {
        if !URGENCY_LEVELS.contains(&urgency.as_str()) {
            validation.push(FieldError::new(
                keys::URGENCY,
                "invalid",
                format!("urgency must be one of {URGENCY_LEVELS:?}"),
            ));
        }
    }

    validation.into_result(event)
}

/// Guard for `DISCOUNTS_APPLIED`: discounts are optional but bounded
pub(crate) fn guard_discounts(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = Validation::new();

    if let Some(percent) = view.number(keys::DISCOUNT_PERCENT) {
        if !(0.0..=100.0).contains(&percent) {
            validation.push(FieldError::out_of_range(
                keys::DISCOUNT_PERCENT,
                "discount must be between 0 and 100 percent",
            ));
        }
    }

    // A discount card without any discount percent is meaningless.
    if view.text(keys::DISCOUNT_CARD).is_some() && view.number(keys::DISCOUNT_PERCENT).is_none() {
        validation.push(FieldError::required(
            keys::DISCOUNT_PERCENT,
            "a discount card requires a discount percent",
        ));
    }

    validation.into_result(event)
}

/// Guard for `PAYMENT_PROCESSED`: a known payment method, non-negative
/// prepayment
pub(crate) fn guard_payment(view: &ContextView<'_>, event: OrderEvent) -> WizardResult<()> {
    let mut validation = Validation::new();

    match view.text(keys::PAYMENT_METHOD) {
        None => validation.require(view, keys::PAYMENT_METHOD, "payment method"),
        Some(method) if !PAYMENT_METHODS.contains(&method.as_str()) => {
            validation.push(FieldError::new(
                keys::PAYMENT_METHOD,
                "invalid",
                format!("payment method must be one of {PAYMENT_METHODS:?}"),
            ));
        }
        Some(_) => {}
    }

    if let Some(prepaid) = view.number(keys::PREPAID_AMOUNT) {
        if prepaid < 0.0 {
            validation.push(FieldError::out_of_range(
                keys::PREPAID_AMOUNT,
                "prepaid amount cannot be negative",
            ));
        }
    }

    validation.into_result(event)
}
