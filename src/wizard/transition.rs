// Copyright 2025 Cowboy AI, LLC.

//! Transition table for the order wizard
//!
//! A data-driven map from (state, event) to outcome. The graph is not a
//! simple chain: several states have forward, backward and cancel edges,
//! and stage 2 contains a cycle through the item sub-wizard that only an
//! explicit `ITEMS_COMPLETED` breaks. Everything here is pure: no
//! context access, no side effects. Guards live in the stage
//! coordinators and are evaluated by the orchestrator after legality.

use serde::{Deserialize, Serialize};

use crate::wizard::event::OrderEvent;
use crate::wizard::item_wizard::ItemWizard;
use crate::wizard::state::OrderState;

/// Outcome of resolving an event against the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The event moves the session to the given state
    External(OrderState),
    /// The event is accepted but mutates session data only
    Internal,
}

/// The wizard's static transition graph
///
/// Stateless; all methods are associated functions so callers never
/// need an instance.
pub struct TransitionTable;

impl TransitionTable {
    /// Resolve an event from a state
    ///
    /// `None` means the event is illegal there: the orchestrator rejects
    /// it outright with no transition, no side effect and no history
    /// entry. Terminal states resolve nothing.
    pub fn resolve(state: OrderState, event: OrderEvent) -> Option<Transition> {
        use OrderEvent::*;
        use OrderState::*;

        if state.is_terminal() {
            return None;
        }

        // Bookkeeping events are accepted everywhere outside terminals.
        if matches!(event, AutoSave | ValidateStep) {
            return Some(Transition::Internal);
        }

        // Item-list operations stay within ITEM_MANAGEMENT.
        if matches!(event, AddItem | EditItem | DeleteItem) {
            return (state == ItemManagement).then_some(Transition::Internal);
        }

        // Cancellation is legal from every non-terminal, non-initial state.
        if event == CancelOrder {
            return (state != Initial).then_some(Transition::External(Cancelled));
        }

        // GO_FORWARD aliases the state's happy-path forward event.
        if event == GoForward {
            return Self::forward_event(state).and_then(|fwd| Self::resolve(state, fwd));
        }

        // The nested sub-wizard owns its inner cycle.
        if state.in_item_wizard() {
            return ItemWizard::resolve(state, event).map(Transition::External);
        }

        let target = match (state, event) {
            (Initial, StartOrder) => ClientSelection,

            (ClientSelection, ClientSelected) => OrderInitialization,

            (OrderInitialization, OrderInfoCompleted) => ItemManagement,
            (OrderInitialization, GoBack) => ClientSelection,

            (ItemManagement, StartItemWizard) => ItemWizard::ENTRY_STATE,
            (ItemManagement, ItemsCompleted) => ExecutionParams,
            (ItemManagement, GoBack) => OrderInitialization,

            (ExecutionParams, ExecutionParamsSet) => GlobalDiscounts,
            (ExecutionParams, GoBack) => ItemManagement,

            (GlobalDiscounts, DiscountsApplied) => PaymentProcessing,
            (GlobalDiscounts, GoBack) => ExecutionParams,

            (PaymentProcessing, PaymentProcessed) => AdditionalInfo,
            (PaymentProcessing, GoBack) => GlobalDiscounts,

            (AdditionalInfo, AdditionalInfoCompleted) => OrderConfirmation,
            (AdditionalInfo, GoBack) => PaymentProcessing,

            (OrderConfirmation, ReviewOrder) => OrderReview,
            (OrderConfirmation, GoBack) => AdditionalInfo,

            (OrderReview, OrderApproved) => LegalAspects,
            (OrderReview, GoBack) => OrderConfirmation,

            (LegalAspects, TermsAccepted) => ReceiptGeneration,
            (LegalAspects, GoBack) => OrderReview,

            (ReceiptGeneration, ReceiptGenerated) => Completed,
            (ReceiptGeneration, GoBack) => LegalAspects,

            _ => return None,
        };

        Some(Transition::External(target))
    }

    /// The happy-path forward event for a state, if it has one
    pub fn forward_event(state: OrderState) -> Option<OrderEvent> {
        use OrderState::*;

        if state.in_item_wizard() {
            return ItemWizard::forward(state).map(|(event, _)| event);
        }
        match state {
            Initial => Some(OrderEvent::StartOrder),
            ClientSelection => Some(OrderEvent::ClientSelected),
            OrderInitialization => Some(OrderEvent::OrderInfoCompleted),
            ItemManagement => Some(OrderEvent::ItemsCompleted),
            ExecutionParams => Some(OrderEvent::ExecutionParamsSet),
            GlobalDiscounts => Some(OrderEvent::DiscountsApplied),
            PaymentProcessing => Some(OrderEvent::PaymentProcessed),
            AdditionalInfo => Some(OrderEvent::AdditionalInfoCompleted),
            OrderConfirmation => Some(OrderEvent::ReviewOrder),
            OrderReview => Some(OrderEvent::OrderApproved),
            LegalAspects => Some(OrderEvent::TermsAccepted),
            ReceiptGeneration => Some(OrderEvent::ReceiptGenerated),
            _ => None,
        }
    }

    /// All events legal from a state
    pub fn available_events(state: OrderState) -> Vec<OrderEvent> {
        OrderEvent::ALL
            .into_iter()
            .filter(|event| Self::resolve(state, *event).is_some())
            .collect()
    }

    /// All states reachable from a state in one transition
    pub fn possible_transitions(state: OrderState) -> Vec<OrderState> {
        let mut targets = Vec::new();
        for event in OrderEvent::ALL {
            if let Some(Transition::External(target)) = Self::resolve(state, event) {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    /// Check whether a direct transition between two states exists
    pub fn can_transition(from: OrderState, to: OrderState) -> bool {
        Self::possible_transitions(from).contains(&to)
    }

    /// Check whether an event is legal from a state
    pub fn can_send_event(state: OrderState, event: OrderEvent) -> bool {
        Self::resolve(state, event).is_some()
    }

    /// Linear happy-path successor, ignoring guards
    ///
    /// For `ITEM_MANAGEMENT` the expected next step is entering the item
    /// sub-wizard (the operator usually adds an item before moving on).
    pub fn next_expected_state(state: OrderState) -> Option<OrderState> {
        use OrderState::*;

        if state.in_item_wizard() {
            return match state {
                ItemCompleted => Some(ItemManagement),
                _ => ItemWizard::forward(state).map(|(_, target)| target),
            };
        }
        match state {
            Initial => Some(ClientSelection),
            ClientSelection => Some(OrderInitialization),
            OrderInitialization => Some(ItemManagement),
            ItemManagement => Some(ItemWizard::ENTRY_STATE),
            ExecutionParams => Some(GlobalDiscounts),
            GlobalDiscounts => Some(PaymentProcessing),
            PaymentProcessing => Some(AdditionalInfo),
            AdditionalInfo => Some(OrderConfirmation),
            OrderConfirmation => Some(OrderReview),
            OrderReview => Some(LegalAspects),
            LegalAspects => Some(ReceiptGeneration),
            ReceiptGeneration => Some(Completed),
            _ => None,
        }
    }

    /// Linear happy-path predecessor, for back-navigation hints
    pub fn previous_state(state: OrderState) -> Option<OrderState> {
        use OrderState::*;

        match state {
            ClientSelection => Some(Initial),
            OrderInitialization => Some(ClientSelection),
            ItemManagement => Some(OrderInitialization),
            ItemWizardActive => Some(ItemManagement),
            ItemBasicInfo => Some(ItemWizardActive),
            ItemCharacteristics => Some(ItemBasicInfo),
            ItemDefectsStains => Some(ItemCharacteristics),
            ItemPricing => Some(ItemDefectsStains),
            ItemPhotos => Some(ItemPricing),
            ItemCompleted => Some(ItemPhotos),
            ExecutionParams => Some(ItemManagement),
            GlobalDiscounts => Some(ExecutionParams),
            PaymentProcessing => Some(GlobalDiscounts),
            AdditionalInfo => Some(PaymentProcessing),
            OrderConfirmation => Some(AdditionalInfo),
            OrderReview => Some(OrderConfirmation),
            LegalAspects => Some(OrderReview),
            ReceiptGeneration => Some(LegalAspects),
            _ => None,
        }
    }

    /// Check whether a state is final
    pub fn is_final(state: OrderState) -> bool {
        state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OrderState::Initial, OrderEvent::StartOrder, OrderState::ClientSelection)]
    #[test_case(
        OrderState::ClientSelection,
        OrderEvent::ClientSelected,
        OrderState::OrderInitialization
    )]
    #[test_case(
        OrderState::OrderInitialization,
        OrderEvent::OrderInfoCompleted,
        OrderState::ItemManagement
    )]
    #[test_case(
        OrderState::ItemManagement,
        OrderEvent::StartItemWizard,
        OrderState::ItemWizardActive
    )]
    #[test_case(
        OrderState::ItemManagement,
        OrderEvent::ItemsCompleted,
        OrderState::ExecutionParams
    )]
    #[test_case(
        OrderState::ExecutionParams,
        OrderEvent::ExecutionParamsSet,
        OrderState::GlobalDiscounts
    )]
    #[test_case(
        OrderState::GlobalDiscounts,
        OrderEvent::DiscountsApplied,
        OrderState::PaymentProcessing
    )]
    #[test_case(
        OrderState::PaymentProcessing,
        OrderEvent::PaymentProcessed,
        OrderState::AdditionalInfo
    )]
    #[test_case(
        OrderState::AdditionalInfo,
        OrderEvent::AdditionalInfoCompleted,
        OrderState::OrderConfirmation
    )]
    #[test_case(OrderState::OrderConfirmation, OrderEvent::ReviewOrder, OrderState::OrderReview)]
    #[test_case(OrderState::OrderReview, OrderEvent::OrderApproved, OrderState::LegalAspects)]
    #[test_case(
        OrderState::LegalAspects,
        OrderEvent::TermsAccepted,
        OrderState::ReceiptGeneration
    )]
    #[test_case(
        OrderState::ReceiptGeneration,
        OrderEvent::ReceiptGenerated,
        OrderState::Completed
    )]
    fn happy_path_edges(from: OrderState, event: OrderEvent, to: OrderState) {
        assert_eq!(
            TransitionTable::resolve(from, event),
            Some(Transition::External(to))
        );
    }

    #[test]
    fn terminal_states_accept_no_events() {
        for state in [OrderState::Completed, OrderState::Cancelled] {
            assert!(TransitionTable::available_events(state).is_empty());
            assert!(TransitionTable::possible_transitions(state).is_empty());
        }
    }

    #[test]
    fn cancellation_reaches_cancelled_from_every_working_state() {
        for state in OrderState::ALL {
            let expected = !state.is_terminal() && state != OrderState::Initial;
            assert_eq!(
                TransitionTable::resolve(state, OrderEvent::CancelOrder)
                    == Some(Transition::External(OrderState::Cancelled)),
                expected,
                "cancel policy wrong for {state}"
            );
        }
    }

    #[test]
    fn go_forward_aliases_the_forward_event() {
        for state in OrderState::ALL {
            let via_alias = TransitionTable::resolve(state, OrderEvent::GoForward);
            let via_event = TransitionTable::forward_event(state)
                .and_then(|fwd| TransitionTable::resolve(state, fwd));
            assert_eq!(via_alias, via_event, "alias mismatch for {state}");
        }
    }

    #[test]
    fn go_back_never_skips_states() {
        // Every GO_BACK edge lands on the state's linear predecessor,
        // except the predecessors that are not re-enterable (INITIAL).
        for state in OrderState::ALL {
            if let Some(Transition::External(target)) =
                TransitionTable::resolve(state, OrderEvent::GoBack)
            {
                assert_eq!(Some(target), TransitionTable::previous_state(state));
            }
        }
    }

    #[test]
    fn item_cycle_is_broken_only_by_items_completed() {
        // ITEM_MANAGEMENT can loop through the sub-wizard forever; the
        // only edge into stage 3 is ITEMS_COMPLETED.
        let into_stage3: Vec<_> = OrderEvent::ALL
            .into_iter()
            .filter(|event| {
                TransitionTable::resolve(OrderState::ItemManagement, *event)
                    == Some(Transition::External(OrderState::ExecutionParams))
            })
            .collect();
        assert_eq!(
            into_stage3,
            vec![OrderEvent::ItemsCompleted, OrderEvent::GoForward]
        );
    }

    #[test]
    fn item_list_operations_are_internal_to_item_management() {
        for event in [OrderEvent::AddItem, OrderEvent::EditItem, OrderEvent::DeleteItem] {
            assert_eq!(
                TransitionTable::resolve(OrderState::ItemManagement, event),
                Some(Transition::Internal)
            );
            assert_eq!(TransitionTable::resolve(OrderState::ExecutionParams, event), None);
        }
    }

    #[test]
    fn possible_transitions_match_the_original_graph_shape() {
        // Spot-check the irregular fan-outs.
        let from_item_mgmt = TransitionTable::possible_transitions(OrderState::ItemManagement);
        assert!(from_item_mgmt.contains(&OrderState::ItemWizardActive));
        assert!(from_item_mgmt.contains(&OrderState::ExecutionParams));
        assert!(from_item_mgmt.contains(&OrderState::OrderInitialization));
        assert!(from_item_mgmt.contains(&OrderState::Cancelled));

        assert_eq!(
            TransitionTable::possible_transitions(OrderState::Initial),
            vec![OrderState::ClientSelection]
        );
    }
}
