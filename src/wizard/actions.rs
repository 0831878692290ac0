// Copyright 2025 Cowboy AI, LLC.

//! Operator-facing action suggestions
//!
//! A read-only view layered over the transition table and the context
//! store: it phrases what the operator can do next, conditioned on the
//! data entered so far. Nothing here mutates state.

use crate::wizard::completion::CompletionEngine;
use crate::wizard::context::SessionContext;
use crate::wizard::state::OrderState;

/// Human-readable available actions for the current state
pub struct ActionsAdvisor;

impl ActionsAdvisor {
    /// Actions an operator can take, phrased for display
    ///
    /// A superset of the legal events: some entries only appear once the
    /// context allows them (e.g. proceeding out of item management needs
    /// at least one item).
    pub fn available_actions(state: OrderState, ctx: &SessionContext) -> Vec<String> {
        use OrderState::*;

        let mut actions: Vec<String> = Vec::new();
        let mut push = |action: &str| actions.push(action.to_string());

        match state {
            Initial => push("Start a new order"),
            ClientSelection => {
                push("Search for an existing client");
                push("Create a new client");
                push("Cancel the order");
            }
            OrderInitialization => {
                push("Choose the receiving branch");
                push("Set the unique order tag");
                push("Return to client selection");
                push("Cancel the order");
            }
            ItemManagement => {
                push("Add a new item");
                if CompletionEngine::items_count(ctx) >= 1 {
                    push("Edit or remove an existing item");
                    push("Proceed to execution parameters");
                }
                push("Return to order information");
                push("Cancel the order");
            }
            ItemWizardActive => {
                push("Enter the item name, category and quantity");
                push("Leave the item wizard");
            }
            ItemBasicInfo => {
                push("Describe material, color and wear");
                push("Go back to basic info");
            }
            ItemCharacteristics => {
                push("Record defects and stains");
                push("Go back to characteristics");
            }
            ItemDefectsStains => {
                push("Calculate the item price");
                push("Go back to defects and stains");
            }
            ItemPricing => {
                push("Attach item photos or skip with a reason");
                push("Go back to pricing");
            }
            ItemPhotos => {
                push("Add the item to the order");
                push("Go back to photos");
            }
            ItemCompleted => push("Return to the item list"),
            ExecutionParams => {
                push("Set the execution date and urgency");
                push("Return to the item list");
                push("Cancel the order");
            }
            GlobalDiscounts => {
                push("Apply an order-wide discount");
                push("Continue without a discount");
                push("Cancel the order");
            }
            PaymentProcessing => {
                push("Choose the payment method");
                push("Record a prepayment");
                push("Cancel the order");
            }
            AdditionalInfo => {
                push("Add order notes");
                push("Continue to confirmation");
                push("Cancel the order");
            }
            OrderConfirmation => {
                push("Open the final review");
                push("Go back to additional info");
                push("Cancel the order");
            }
            OrderReview => {
                push("Approve the order");
                push("Go back to the summary");
                push("Cancel the order");
            }
            LegalAspects => {
                push("Accept the terms and capture the signature");
                push("Go back to the review");
                push("Cancel the order");
            }
            ReceiptGeneration => {
                push("Generate the receipt");
                push("Go back to legal aspects");
            }
            Completed | Cancelled => {}
        }

        actions
    }

    /// Whether the current state needs operator input before it can
    /// advance along the happy path
    pub fn requires_input(state: OrderState) -> bool {
        use OrderState::*;

        matches!(
            state,
            ClientSelection
                | OrderInitialization
                | ItemWizardActive
                | ItemBasicInfo
                | ItemCharacteristics
                | ItemDefectsStains
                | ItemPricing
                | ItemPhotos
                | ExecutionParams
                | PaymentProcessing
                | LegalAspects
        )
    }
}
