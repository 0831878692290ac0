// Copyright 2025 Cowboy AI, LLC.

//! Order wizard event definitions
//!
//! Events are the closed input alphabet of the wizard. An event may carry
//! an arbitrary payload map; the payload is merged into the session's
//! context store atomically with the transition it triggers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Payload carried by an event, keyed by context-store keys
pub type EventPayload = HashMap<String, serde_json::Value>;

/// One of the order wizard's input events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// Begin a new order (INITIAL only)
    StartOrder,
    /// A client has been chosen for the order
    ClientSelected,
    /// Branch, receipt number and basic order info are in place
    OrderInfoCompleted,
    /// Enter the nested item sub-wizard
    StartItemWizard,
    /// Item basic info substep finished
    BasicInfoCompleted,
    /// Item characteristics substep finished
    CharacteristicsCompleted,
    /// Item defects/stains substep finished
    DefectsCompleted,
    /// Item pricing substep finished
    PricingCompleted,
    /// Item photos substep finished (or explicitly skipped)
    PhotosCompleted,
    /// Commit the drafted item and return to item management
    ItemAdded,
    /// Abort the item sub-wizard, discarding the draft
    CancelItemWizard,
    /// Add a fully-formed item directly to the list (internal)
    AddItem,
    /// Replace an item at an index (internal)
    EditItem,
    /// Remove an item at an index (internal)
    DeleteItem,
    /// Item entry finished, move on to execution parameters
    ItemsCompleted,
    /// Execution date and urgency set
    ExecutionParamsSet,
    /// Order-wide discounts chosen
    DiscountsApplied,
    /// Payment parameters captured
    PaymentProcessed,
    /// Additional info captured
    AdditionalInfoCompleted,
    /// Open the final review
    ReviewOrder,
    /// Review approved
    OrderApproved,
    /// Terms accepted and signature validated
    TermsAccepted,
    /// Receipt document produced
    ReceiptGenerated,
    /// Follow the happy path forward from the current state
    GoForward,
    /// Step back to the previous state
    GoBack,
    /// Abandon the order
    CancelOrder,
    /// Mark the session's data as saved (internal)
    AutoSave,
    /// Run the current step's validation without transitioning (internal)
    ValidateStep,
}

impl OrderEvent {
    /// All events
    pub const ALL: [OrderEvent; 28] = [
        OrderEvent::StartOrder,
        OrderEvent::ClientSelected,
        OrderEvent::OrderInfoCompleted,
        OrderEvent::StartItemWizard,
        OrderEvent::BasicInfoCompleted,
        OrderEvent::CharacteristicsCompleted,
        OrderEvent::DefectsCompleted,
        OrderEvent::PricingCompleted,
        OrderEvent::PhotosCompleted,
        OrderEvent::ItemAdded,
        OrderEvent::CancelItemWizard,
        OrderEvent::AddItem,
        OrderEvent::EditItem,
        OrderEvent::DeleteItem,
        OrderEvent::ItemsCompleted,
        OrderEvent::ExecutionParamsSet,
        OrderEvent::DiscountsApplied,
        OrderEvent::PaymentProcessed,
        OrderEvent::AdditionalInfoCompleted,
        OrderEvent::ReviewOrder,
        OrderEvent::OrderApproved,
        OrderEvent::TermsAccepted,
        OrderEvent::ReceiptGenerated,
        OrderEvent::GoForward,
        OrderEvent::GoBack,
        OrderEvent::CancelOrder,
        OrderEvent::AutoSave,
        OrderEvent::ValidateStep,
    ];

    /// Name of this event as it appears on the wire and in logs
    pub fn name(&self) -> &'static str {
        match self {
            OrderEvent::StartOrder => "START_ORDER",
            OrderEvent::ClientSelected => "CLIENT_SELECTED",
            OrderEvent::OrderInfoCompleted => "ORDER_INFO_COMPLETED",
            OrderEvent::StartItemWizard => "START_ITEM_WIZARD",
            OrderEvent::BasicInfoCompleted => "BASIC_INFO_COMPLETED",
            OrderEvent::CharacteristicsCompleted => "CHARACTERISTICS_COMPLETED",
            OrderEvent::DefectsCompleted => "DEFECTS_COMPLETED",
            OrderEvent::PricingCompleted => "PRICING_COMPLETED",
            OrderEvent::PhotosCompleted => "PHOTOS_COMPLETED",
            OrderEvent::ItemAdded => "ITEM_ADDED",
            OrderEvent::CancelItemWizard => "CANCEL_ITEM_WIZARD",
            OrderEvent::AddItem => "ADD_ITEM",
            OrderEvent::EditItem => "EDIT_ITEM",
            OrderEvent::DeleteItem => "DELETE_ITEM",
            OrderEvent::ItemsCompleted => "ITEMS_COMPLETED",
            OrderEvent::ExecutionParamsSet => "EXECUTION_PARAMS_SET",
            OrderEvent::DiscountsApplied => "DISCOUNTS_APPLIED",
            OrderEvent::PaymentProcessed => "PAYMENT_PROCESSED",
            OrderEvent::AdditionalInfoCompleted => "ADDITIONAL_INFO_COMPLETED",
            OrderEvent::ReviewOrder => "REVIEW_ORDER",
            OrderEvent::OrderApproved => "ORDER_APPROVED",
            OrderEvent::TermsAccepted => "TERMS_ACCEPTED",
            OrderEvent::ReceiptGenerated => "RECEIPT_GENERATED",
            OrderEvent::GoForward => "GO_FORWARD",
            OrderEvent::GoBack => "GO_BACK",
            OrderEvent::CancelOrder => "CANCEL_ORDER",
            OrderEvent::AutoSave => "AUTO_SAVE",
            OrderEvent::ValidateStep => "VALIDATE_STEP",
        }
    }

    /// Internal events mutate session data without changing state
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            OrderEvent::AutoSave
                | OrderEvent::ValidateStep
                | OrderEvent::AddItem
                | OrderEvent::EditItem
                | OrderEvent::DeleteItem
        )
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
