// Copyright 2025 Cowboy AI, LLC.

//! Nested item sub-wizard
//!
//! A self-contained six-step chain for entering one order item:
//! basic info, characteristics, defects/stains, pricing, photos, done.
//! The parent graph composes it at exactly two boundary events:
//! `START_ITEM_WIZARD` enters from `ITEM_MANAGEMENT`, and `ITEM_ADDED`
//! commits the draft and returns control to `ITEM_MANAGEMENT`. The
//! parent does not enumerate the inner cycle; everything between the
//! boundaries is resolved here.

use crate::wizard::event::OrderEvent;
use crate::wizard::state::OrderState;

/// Substep of the item sub-wizard, used to pick the right validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStep {
    /// Name, category, quantity
    BasicInfo,
    /// Material, color, filler, wear level
    Characteristics,
    /// Defects and stains lists
    DefectsStains,
    /// Base price, modifiers, computed total
    Pricing,
    /// Photo references or an explicit skip
    Photos,
}

/// Transition logic of the item sub-wizard
///
/// The inner chain, in order. Each state's forward event completes the
/// substep being entered there:
///
/// ```text
/// ITEM_WIZARD_ACTIVE --BASIC_INFO_COMPLETED--> ITEM_BASIC_INFO
///   --CHARACTERISTICS_COMPLETED--> ITEM_CHARACTERISTICS
///   --DEFECTS_COMPLETED--> ITEM_DEFECTS_STAINS
///   --PRICING_COMPLETED--> ITEM_PRICING
///   --PHOTOS_COMPLETED--> ITEM_PHOTOS
///   --ITEM_ADDED--> ITEM_COMPLETED (-> ITEM_MANAGEMENT, same commit)
/// ```
pub struct ItemWizard;

impl ItemWizard {
    /// State the sub-wizard is entered from and exits back to
    pub const PARENT: OrderState = OrderState::ItemManagement;

    /// Event that enters the sub-wizard from the parent
    pub const ENTRY_EVENT: OrderEvent = OrderEvent::StartItemWizard;

    /// Event that commits the draft and exits the sub-wizard
    pub const EXIT_EVENT: OrderEvent = OrderEvent::ItemAdded;

    /// First inner state after entry
    pub const ENTRY_STATE: OrderState = OrderState::ItemWizardActive;

    /// Forward event and target for an inner state
    pub fn forward(state: OrderState) -> Option<(OrderEvent, OrderState)> {
        match state {
            OrderState::ItemWizardActive => {
                Some((OrderEvent::BasicInfoCompleted, OrderState::ItemBasicInfo))
            }
            OrderState::ItemBasicInfo => Some((
                OrderEvent::CharacteristicsCompleted,
                OrderState::ItemCharacteristics,
            )),
            OrderState::ItemCharacteristics => {
                Some((OrderEvent::DefectsCompleted, OrderState::ItemDefectsStains))
            }
            OrderState::ItemDefectsStains => {
                Some((OrderEvent::PricingCompleted, OrderState::ItemPricing))
            }
            OrderState::ItemPricing => {
                Some((OrderEvent::PhotosCompleted, OrderState::ItemPhotos))
            }
            OrderState::ItemPhotos => Some((OrderEvent::ItemAdded, OrderState::ItemCompleted)),
            _ => None,
        }
    }

    /// Backward (`GO_BACK`) target for an inner state
    ///
    /// The first inner state backs out to the parent; `ITEM_COMPLETED`
    /// is transient and has no backward edge.
    pub fn back(state: OrderState) -> Option<OrderState> {
        match state {
            OrderState::ItemWizardActive => Some(Self::PARENT),
            OrderState::ItemBasicInfo => Some(OrderState::ItemWizardActive),
            OrderState::ItemCharacteristics => Some(OrderState::ItemBasicInfo),
            OrderState::ItemDefectsStains => Some(OrderState::ItemCharacteristics),
            OrderState::ItemPricing => Some(OrderState::ItemDefectsStains),
            OrderState::ItemPhotos => Some(OrderState::ItemPricing),
            _ => None,
        }
    }

    /// The substep a forward event completes
    pub fn step_of(event: OrderEvent) -> Option<ItemStep> {
        match event {
            OrderEvent::BasicInfoCompleted => Some(ItemStep::BasicInfo),
            OrderEvent::CharacteristicsCompleted => Some(ItemStep::Characteristics),
            OrderEvent::DefectsCompleted => Some(ItemStep::DefectsStains),
            OrderEvent::PricingCompleted => Some(ItemStep::Pricing),
            OrderEvent::PhotosCompleted => Some(ItemStep::Photos),
            _ => None,
        }
    }

    /// Resolve an event against the inner table
    ///
    /// Returns the target state, or `None` if the event is not legal
    /// from the given inner state. `CANCEL_ITEM_WIZARD` aborts back to
    /// the parent from any active inner state.
    pub fn resolve(state: OrderState, event: OrderEvent) -> Option<OrderState> {
        if !state.in_item_wizard() {
            return None;
        }
        match event {
            OrderEvent::GoBack => Self::back(state),
            OrderEvent::CancelItemWizard if state != OrderState::ItemCompleted => {
                Some(Self::PARENT)
            }
            // The transient terminal hands control back to the parent.
            OrderEvent::ItemAdded if state == OrderState::ItemCompleted => Some(Self::PARENT),
            _ => Self::forward(state)
                .and_then(|(fwd, target)| (fwd == event).then_some(target)),
        }
    }
}
