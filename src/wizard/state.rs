// Copyright 2025 Cowboy AI, LLC.

//! Order wizard state definitions
//!
//! The closed set of states the order wizard can be in, partitioned into
//! four stage groups plus the two terminal states. The nested item
//! sub-wizard's inner states live in this enum too, but their transition
//! logic is owned by [`crate::wizard::item_wizard`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the order wizard's workflow states
///
/// `current_state` of a session is always a member of this set; there is
/// no "unknown" or null state once a session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Freshly created session, nothing entered yet
    Initial,
    /// Stage 1: choosing or creating the client
    ClientSelection,
    /// Stage 1: branch, receipt number and basic order info
    OrderInitialization,
    /// Stage 2: item list overview, entry point of the item sub-wizard
    ItemManagement,
    /// Stage 2 (sub-wizard): basic item info is being entered
    ItemWizardActive,
    /// Stage 2 (sub-wizard): basic info captured, characteristics next
    ItemBasicInfo,
    /// Stage 2 (sub-wizard): characteristics captured, defects next
    ItemCharacteristics,
    /// Stage 2 (sub-wizard): defects and stains captured, pricing next
    ItemDefectsStains,
    /// Stage 2 (sub-wizard): price computed, photos next
    ItemPricing,
    /// Stage 2 (sub-wizard): photos attached or skipped, ready to add
    ItemPhotos,
    /// Stage 2 (sub-wizard): item committed, control returns to the manager
    ItemCompleted,
    /// Stage 3: execution date and urgency
    ExecutionParams,
    /// Stage 3: order-wide discounts
    GlobalDiscounts,
    /// Stage 3: payment method and prepayment
    PaymentProcessing,
    /// Stage 3: free-form notes and extras
    AdditionalInfo,
    /// Stage 4: order summary shown for confirmation
    OrderConfirmation,
    /// Stage 4: final line-by-line review
    OrderReview,
    /// Stage 4: terms acceptance and signature capture
    LegalAspects,
    /// Stage 4: receipt document generation
    ReceiptGeneration,
    /// Terminal: order created successfully
    Completed,
    /// Terminal: order abandoned
    Cancelled,
}

/// Stage group a state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Client selection and order initialization
    ClientIntake,
    /// Item entry, including the nested sub-wizard
    Items,
    /// Execution, discount and payment parameters
    ExecutionPayment,
    /// Confirmation, legal aspects and the receipt
    Confirmation,
    /// Terminal states
    Closed,
}

impl Stage {
    /// Stage number as exposed in status views (1..=5)
    pub fn number(&self) -> u8 {
        match self {
            Stage::ClientIntake => 1,
            Stage::Items => 2,
            Stage::ExecutionPayment => 3,
            Stage::Confirmation => 4,
            Stage::Closed => 5,
        }
    }

    /// Human-readable stage name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ClientIntake => "Client & order info",
            Stage::Items => "Items",
            Stage::ExecutionPayment => "Execution & payment",
            Stage::Confirmation => "Confirmation & receipt",
            Stage::Closed => "Closed",
        }
    }
}

impl OrderState {
    /// All states, in workflow order
    pub const ALL: [OrderState; 21] = [
        OrderState::Initial,
        OrderState::ClientSelection,
        OrderState::OrderInitialization,
        OrderState::ItemManagement,
        OrderState::ItemWizardActive,
        OrderState::ItemBasicInfo,
        OrderState::ItemCharacteristics,
        OrderState::ItemDefectsStains,
        OrderState::ItemPricing,
        OrderState::ItemPhotos,
        OrderState::ItemCompleted,
        OrderState::ExecutionParams,
        OrderState::GlobalDiscounts,
        OrderState::PaymentProcessing,
        OrderState::AdditionalInfo,
        OrderState::OrderConfirmation,
        OrderState::OrderReview,
        OrderState::LegalAspects,
        OrderState::ReceiptGeneration,
        OrderState::Completed,
        OrderState::Cancelled,
    ];

    /// Name of this state as it appears on the wire and in logs
    pub fn name(&self) -> &'static str {
        match self {
            OrderState::Initial => "INITIAL",
            OrderState::ClientSelection => "CLIENT_SELECTION",
            OrderState::OrderInitialization => "ORDER_INITIALIZATION",
            OrderState::ItemManagement => "ITEM_MANAGEMENT",
            OrderState::ItemWizardActive => "ITEM_WIZARD_ACTIVE",
            OrderState::ItemBasicInfo => "ITEM_BASIC_INFO",
            OrderState::ItemCharacteristics => "ITEM_CHARACTERISTICS",
            OrderState::ItemDefectsStains => "ITEM_DEFECTS_STAINS",
            OrderState::ItemPricing => "ITEM_PRICING",
            OrderState::ItemPhotos => "ITEM_PHOTOS",
            OrderState::ItemCompleted => "ITEM_COMPLETED",
            OrderState::ExecutionParams => "EXECUTION_PARAMS",
            OrderState::GlobalDiscounts => "GLOBAL_DISCOUNTS",
            OrderState::PaymentProcessing => "PAYMENT_PROCESSING",
            OrderState::AdditionalInfo => "ADDITIONAL_INFO",
            OrderState::OrderConfirmation => "ORDER_CONFIRMATION",
            OrderState::OrderReview => "ORDER_REVIEW",
            OrderState::LegalAspects => "LEGAL_ASPECTS",
            OrderState::ReceiptGeneration => "RECEIPT_GENERATION",
            OrderState::Completed => "COMPLETED",
            OrderState::Cancelled => "CANCELLED",
        }
    }

    /// Stage group this state belongs to
    pub fn stage(&self) -> Stage {
        match self {
            OrderState::Initial | OrderState::ClientSelection | OrderState::OrderInitialization => {
                Stage::ClientIntake
            }
            OrderState::ItemManagement
            | OrderState::ItemWizardActive
            | OrderState::ItemBasicInfo
            | OrderState::ItemCharacteristics
            | OrderState::ItemDefectsStains
            | OrderState::ItemPricing
            | OrderState::ItemPhotos
            | OrderState::ItemCompleted => Stage::Items,
            OrderState::ExecutionParams
            | OrderState::GlobalDiscounts
            | OrderState::PaymentProcessing
            | OrderState::AdditionalInfo => Stage::ExecutionPayment,
            OrderState::OrderConfirmation
            | OrderState::OrderReview
            | OrderState::LegalAspects
            | OrderState::ReceiptGeneration => Stage::Confirmation,
            OrderState::Completed | OrderState::Cancelled => Stage::Closed,
        }
    }

    /// Check if this is a terminal state (accepts no further events)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Cancelled)
    }

    /// Check if this state is inside the nested item sub-wizard
    pub fn in_item_wizard(&self) -> bool {
        matches!(
            self,
            OrderState::ItemWizardActive
                | OrderState::ItemBasicInfo
                | OrderState::ItemCharacteristics
                | OrderState::ItemDefectsStains
                | OrderState::ItemPricing
                | OrderState::ItemPhotos
                | OrderState::ItemCompleted
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
