//! End-to-end wizard scenarios
//!
//! Drives the full facade through the documented flows: stage 1 client
//! intake, the repeated item sub-wizard, execution/payment parameters
//! and the confirmation/legal/receipt stage, plus the rejection and
//! navigation edge cases.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{
    add_item_through_subwizard, collaborators, drive_to_item_management,
    drive_to_receipt_generation, payload,
};
use order_wizard::wizard::keys;
use order_wizard::{OrderEvent, OrderState, OrderWizard, WizardError};

#[tokio::test]
async fn new_session_starts_at_initial_and_start_order_enters_stage_one() {
    let wizard = OrderWizard::new(collaborators());
    let id = wizard.create_session().await;

    assert_eq!(wizard.current_state(id).await.unwrap(), OrderState::Initial);

    let status = wizard.send_event(id, OrderEvent::StartOrder).await.unwrap();
    assert_eq!(status.current_state, OrderState::ClientSelection);
    assert_eq!(status.stage_number, 1);
    assert_eq!(status.overall_progress, 0);
}

#[tokio::test]
async fn client_selection_with_context_data_advances_to_order_initialization() {
    let wizard = OrderWizard::new(collaborators());
    let id = wizard.create_session().await;
    wizard.send_event(id, OrderEvent::StartOrder).await.unwrap();

    wizard
        .set_data(id, keys::CLIENT, json!({"id": "c1"}))
        .await
        .unwrap();
    assert!(wizard.can_send_event(id, OrderEvent::ClientSelected).await);

    let status = wizard
        .send_event(id, OrderEvent::ClientSelected)
        .await
        .unwrap();
    assert_eq!(status.current_state, OrderState::OrderInitialization);
}

#[tokio::test]
async fn items_completed_with_zero_items_is_guard_rejected() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    let err = wizard
        .send_event(id, OrderEvent::ItemsCompleted)
        .await
        .unwrap_err();
    match err {
        WizardError::GuardRejected { errors, .. } => {
            assert_eq!(errors[0].field, keys::ITEMS);
        }
        other => panic!("expected guard rejection, got {other:?}"),
    }
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::ItemManagement
    );
}

#[tokio::test]
async fn one_item_subwizard_cycle_returns_to_item_management_with_one_more_item() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    let before = wizard.status(id).await.unwrap().items_count;
    add_item_through_subwizard(&wizard, id, "Wool coat").await;
    let after = wizard.status(id).await.unwrap();

    assert_eq!(after.items_count, before + 1);
    assert_eq!(after.current_state, OrderState::ItemManagement);

    // The commit records both hops: into ITEM_COMPLETED and back out.
    let history = wizard.history(id).await.unwrap();
    let tail: Vec<_> = history
        .iter()
        .rev()
        .take(2)
        .map(|record| (record.from, record.to))
        .collect();
    assert_eq!(
        tail,
        vec![
            (OrderState::ItemCompleted, OrderState::ItemManagement),
            (OrderState::ItemPhotos, OrderState::ItemCompleted),
        ]
    );
}

#[tokio::test]
async fn subwizard_loops_for_multiple_items() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    add_item_through_subwizard(&wizard, id, "Wool coat").await;
    add_item_through_subwizard(&wizard, id, "Silk dress").await;
    add_item_through_subwizard(&wizard, id, "Leather jacket").await;

    assert_eq!(wizard.status(id).await.unwrap().items_count, 3);
}

#[tokio::test]
async fn receipt_generated_is_only_legal_from_receipt_generation() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_receipt_generation(&wizard).await;

    // Back in LEGAL_ASPECTS, RECEIPT_GENERATED is not accepted.
    wizard.send_event(id, OrderEvent::GoBack).await.unwrap();
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::LegalAspects
    );
    let err = wizard
        .send_event(id, OrderEvent::ReceiptGenerated)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::IllegalTransition { .. }));

    // Only the legal stage's own forward event re-opens the door.
    wizard
        .send_event_with(
            id,
            OrderEvent::TermsAccepted,
            payload(&[
                (keys::TERMS_ACCEPTED, json!(true)),
                (keys::SIGNATURE, json!({"data": "base64-strokes"})),
            ]),
        )
        .await
        .unwrap();
    let status = wizard
        .send_event(id, OrderEvent::ReceiptGenerated)
        .await
        .unwrap();
    assert_eq!(status.current_state, OrderState::Completed);
    assert!(status.is_final_state);

    // Terminal: nothing is accepted any more.
    let err = wizard.send_event(id, OrderEvent::AutoSave).await.unwrap_err();
    assert!(matches!(err, WizardError::IllegalTransition { .. }));
}

#[tokio::test]
async fn full_happy_path_completes_with_full_progress() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_receipt_generation(&wizard).await;

    let status = wizard.status(id).await.unwrap();
    assert!(status.stage1_complete);
    assert!(status.stage2_complete);
    assert!(status.stage3_complete);
    assert!(status.stage4_complete);
    assert_eq!(status.overall_progress, 100);
    assert!(status.can_complete);
    assert!(status.blocking_reasons.is_empty());

    let done = wizard
        .send_event(id, OrderEvent::ReceiptGenerated)
        .await
        .unwrap();
    assert_eq!(done.current_state, OrderState::Completed);
    // The rendered document landed in the context.
    let receipt = wizard.get_data(id, keys::RECEIPT_REF).await.unwrap();
    assert!(receipt.is_some());
    assert!(done.missing_required_data.is_empty());
}

#[tokio::test]
async fn progress_steps_up_in_quarters_and_never_regresses() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;
    assert_eq!(wizard.status(id).await.unwrap().overall_progress, 25);

    add_item_through_subwizard(&wizard, id, "Wool coat").await;
    wizard
        .send_event(id, OrderEvent::ItemsCompleted)
        .await
        .unwrap();
    assert_eq!(wizard.status(id).await.unwrap().overall_progress, 50);

    // Navigating back into stage 2 keeps the derived progress.
    wizard.send_event(id, OrderEvent::GoBack).await.unwrap();
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::ItemManagement
    );
    assert_eq!(wizard.status(id).await.unwrap().overall_progress, 50);
}

#[tokio::test]
async fn cancellation_reaches_cancelled_and_freezes_the_session() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    let status = wizard.send_event(id, OrderEvent::CancelOrder).await.unwrap();
    assert_eq!(status.current_state, OrderState::Cancelled);
    assert!(status.is_final_state);
    assert!(status.available_events.is_empty());

    for event in [
        OrderEvent::StartOrder,
        OrderEvent::GoBack,
        OrderEvent::CancelOrder,
        OrderEvent::AutoSave,
    ] {
        assert!(!wizard.can_send_event(id, event).await);
        assert!(wizard.send_event(id, event).await.is_err());
    }
}

#[tokio::test]
async fn cancellation_is_reachable_from_inside_the_item_subwizard() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;
    wizard
        .send_event(id, OrderEvent::StartItemWizard)
        .await
        .unwrap();

    let status = wizard.send_event(id, OrderEvent::CancelOrder).await.unwrap();
    assert_eq!(status.current_state, OrderState::Cancelled);
}

#[tokio::test]
async fn cancel_item_wizard_discards_the_draft() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    wizard
        .send_event(id, OrderEvent::StartItemWizard)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::BasicInfoCompleted,
            payload(&[
                (keys::ITEM_NAME, json!("Wool coat")),
                (keys::ITEM_CATEGORY, json!("COAT")),
                (keys::ITEM_QUANTITY, json!(1)),
            ]),
        )
        .await
        .unwrap();

    let status = wizard
        .send_event(id, OrderEvent::CancelItemWizard)
        .await
        .unwrap();
    assert_eq!(status.current_state, OrderState::ItemManagement);
    assert_eq!(status.items_count, 0);
    assert!(wizard.get_data(id, keys::ITEM_NAME).await.unwrap().is_none());
}

#[tokio::test]
async fn go_back_walks_the_item_subwizard_in_reverse() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    wizard
        .send_event(id, OrderEvent::StartItemWizard)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::BasicInfoCompleted,
            payload(&[
                (keys::ITEM_NAME, json!("Wool coat")),
                (keys::ITEM_CATEGORY, json!("COAT")),
                (keys::ITEM_QUANTITY, json!(1)),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::ItemBasicInfo
    );

    wizard.send_event(id, OrderEvent::GoBack).await.unwrap();
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::ItemWizardActive
    );
    let status = wizard.send_event(id, OrderEvent::GoBack).await.unwrap();
    assert_eq!(status.current_state, OrderState::ItemManagement);
}

#[tokio::test]
async fn go_forward_alias_respects_the_underlying_guard() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    // GO_FORWARD out of ITEM_MANAGEMENT is ITEMS_COMPLETED and shares
    // its at-least-one-item guard.
    let err = wizard.send_event(id, OrderEvent::GoForward).await.unwrap_err();
    assert!(matches!(err, WizardError::GuardRejected { .. }));

    add_item_through_subwizard(&wizard, id, "Wool coat").await;
    let status = wizard.send_event(id, OrderEvent::GoForward).await.unwrap();
    assert_eq!(status.current_state, OrderState::ExecutionParams);
}

#[tokio::test]
async fn validate_step_reports_errors_without_transitioning() {
    let wizard = OrderWizard::new(collaborators());
    let id = wizard.create_session().await;
    wizard.send_event(id, OrderEvent::StartOrder).await.unwrap();

    let err = wizard
        .send_event(id, OrderEvent::ValidateStep)
        .await
        .unwrap_err();
    match err {
        WizardError::GuardRejected { errors, .. } => {
            assert_eq!(errors[0].field, keys::CLIENT);
        }
        other => panic!("expected guard rejection, got {other:?}"),
    }
    assert_eq!(
        wizard.current_state(id).await.unwrap(),
        OrderState::ClientSelection
    );

    wizard
        .set_data(id, keys::CLIENT, json!({"id": "c1"}))
        .await
        .unwrap();
    let status = wizard.send_event(id, OrderEvent::ValidateStep).await.unwrap();
    assert_eq!(status.current_state, OrderState::ClientSelection);
}

#[tokio::test]
async fn direct_item_list_operations_work_from_item_management() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    let item = json!({
        "name": "Silk dress",
        "category_code": "DRESS",
        "quantity": 1,
        "base_unit_price": 90.0,
        "unit_price": 90.0,
        "total_price": 90.0,
        "photo_skip_reason": "client declined",
        "tag": "T-9",
    });

    let status = wizard
        .send_event_with(
            id,
            OrderEvent::AddItem,
            payload(&[(keys::ITEM, item.clone())]),
        )
        .await
        .unwrap();
    assert_eq!(status.items_count, 1);
    assert_eq!(status.current_state, OrderState::ItemManagement);

    let mut replacement = item.clone();
    replacement["name"] = json!("Silk blouse");
    wizard
        .send_event_with(
            id,
            OrderEvent::EditItem,
            payload(&[
                (keys::ITEM_INDEX, json!(0)),
                (keys::ITEM, replacement),
            ]),
        )
        .await
        .unwrap();

    let items = wizard.get_data(id, keys::ITEMS).await.unwrap().unwrap();
    assert_eq!(items[0]["name"], json!("Silk blouse"));

    let status = wizard
        .send_event_with(
            id,
            OrderEvent::DeleteItem,
            payload(&[(keys::ITEM_INDEX, json!(0))]),
        )
        .await
        .unwrap();
    assert_eq!(status.items_count, 0);
}

#[tokio::test]
async fn pricing_step_computes_through_the_collaborator() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    wizard
        .send_event(id, OrderEvent::StartItemWizard)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::BasicInfoCompleted,
            payload(&[
                (keys::ITEM_NAME, json!("Wool coat")),
                (keys::ITEM_CATEGORY, json!("COAT")),
                (keys::ITEM_QUANTITY, json!(2)),
            ]),
        )
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::CharacteristicsCompleted,
            payload(&[
                (keys::ITEM_MATERIAL, json!("wool")),
                (keys::ITEM_COLOR, json!("navy")),
            ]),
        )
        .await
        .unwrap();
    wizard
        .send_event(id, OrderEvent::DefectsCompleted)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::PricingCompleted,
            payload(&[
                (keys::ITEM_BASE_PRICE, json!(100.0)),
                (keys::ITEM_EXPEDITE, json!(50.0)),
            ]),
        )
        .await
        .unwrap();

    let total = wizard
        .get_data(id, keys::ITEM_TOTAL_PRICE)
        .await
        .unwrap()
        .unwrap();
    // 100 * 1.5 surcharge * 2 pieces
    assert_eq!(total, json!(300.0));
}

#[tokio::test]
async fn status_is_idempotent_between_mutations() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    let first = wizard.status(id).await.unwrap();
    let second = wizard.status(id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn mark_saved_clears_the_unsaved_flag() {
    let wizard = OrderWizard::new(collaborators());
    let id = wizard.create_session().await;

    wizard
        .set_data(id, keys::UNIQUE_TAG, json!("ORD-TAG-1"))
        .await
        .unwrap();
    assert!(wizard.status(id).await.unwrap().has_unsaved_changes);

    wizard.mark_saved(id).await.unwrap();
    assert!(!wizard.status(id).await.unwrap().has_unsaved_changes);
}

#[tokio::test]
async fn reset_returns_a_session_to_initial_with_empty_context() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_item_management(&wizard).await;

    wizard.reset(id).await.unwrap();
    assert_eq!(wizard.current_state(id).await.unwrap(), OrderState::Initial);
    assert!(wizard.data(id).await.unwrap().is_empty());
    assert!(wizard.history(id).await.unwrap().is_empty());

    // The reset session is fully usable again.
    let status = wizard.send_event(id, OrderEvent::StartOrder).await.unwrap();
    assert_eq!(status.current_state, OrderState::ClientSelection);
}

#[tokio::test]
async fn disposed_sessions_are_gone() {
    let wizard = OrderWizard::new(collaborators());
    let id = wizard.create_session().await;

    assert!(wizard.dispose(id).await);
    assert!(matches!(
        wizard.status(id).await,
        Err(WizardError::SessionNotFound(_))
    ));
    assert!(!wizard.dispose(id).await);
}

#[tokio::test]
async fn every_transition_in_history_was_legal() {
    let wizard = OrderWizard::new(collaborators());
    let id = drive_to_receipt_generation(&wizard).await;
    wizard
        .send_event(id, OrderEvent::ReceiptGenerated)
        .await
        .unwrap();

    for record in wizard.history(id).await.unwrap() {
        assert!(
            order_wizard::TransitionTable::can_transition(record.from, record.to)
                || record.from == record.to,
            "illegal hop {} -> {} in history",
            record.from,
            record.to
        );
    }
}
