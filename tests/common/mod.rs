//! Shared in-memory collaborator fakes for the scenario tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use order_wizard::collaborators::{
    BranchDirectory, ClientDirectory, ClientRef, CollaboratorError, Collaborators, DocumentRef,
    LegalService, NewClient, PhotoRef, PhotoStore, PricingQuote, PricingRequest, PricingService,
    ReceiptNumberGenerator, ReceiptRenderer, SignaturePayload,
};
use order_wizard::wizard::keys;
use order_wizard::{EventPayload, OrderEvent, OrderState, OrderWizard, SessionId};

pub struct FakeClientDirectory;

#[async_trait]
impl ClientDirectory for FakeClientDirectory {
    async fn search(&self, query: String) -> Result<Vec<ClientRef>, CollaboratorError> {
        Ok(vec![ClientRef {
            id: "c1".into(),
            name: query,
        }])
    }

    async fn create(&self, client: NewClient) -> Result<ClientRef, CollaboratorError> {
        Ok(ClientRef {
            id: "c-new".into(),
            name: client.name,
        })
    }
}

pub struct FakeBranchDirectory;

#[async_trait]
impl BranchDirectory for FakeBranchDirectory {
    async fn is_available(&self, branch_id: String) -> Result<bool, CollaboratorError> {
        Ok(branch_id != "closed-branch")
    }
}

#[derive(Default)]
pub struct SequenceReceiptNumbers {
    counter: AtomicU64,
}

#[async_trait]
impl ReceiptNumberGenerator for SequenceReceiptNumbers {
    async fn next_number(&self, branch_code: String) -> Result<String, CollaboratorError> {
        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{branch_code}-{seq:06}"))
    }
}

pub struct FlatRatePricing;

#[async_trait]
impl PricingService for FlatRatePricing {
    async fn compute(&self, request: PricingRequest) -> Result<PricingQuote, CollaboratorError> {
        let surcharge = request.expedite_percent.unwrap_or(0.0) / 100.0;
        let discount = request.discount_percent.unwrap_or(0.0) / 100.0;
        let unit = request.base_unit_price * (1.0 + surcharge) * (1.0 - discount);
        Ok(PricingQuote {
            unit_price: unit,
            total_price: unit * f64::from(request.quantity),
            applied_modifiers: request.modifier_codes,
        })
    }
}

#[derive(Default)]
pub struct MemoryPhotoStore {
    counter: AtomicU64,
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn store(
        &self,
        _image: Vec<u8>,
        file_name: String,
    ) -> Result<PhotoRef, CollaboratorError> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PhotoRef {
            id: format!("photo-{id}"),
            file_name,
        })
    }
}

pub struct AcceptingLegalService;

#[async_trait]
impl LegalService for AcceptingLegalService {
    async fn validate(&self, signature: SignaturePayload) -> Result<bool, CollaboratorError> {
        Ok(signature.terms_accepted && !signature.data.trim().is_empty())
    }
}

pub struct StubReceiptRenderer;

#[async_trait]
impl ReceiptRenderer for StubReceiptRenderer {
    async fn render(&self, order: serde_json::Value) -> Result<DocumentRef, CollaboratorError> {
        let number = order
            .get("receipt_number")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        Ok(DocumentRef {
            id: format!("receipt-{number}"),
            url: format!("https://docs.example/{number}.pdf"),
        })
    }
}

pub fn collaborators() -> Collaborators {
    Collaborators {
        clients: Arc::new(FakeClientDirectory),
        branches: Arc::new(FakeBranchDirectory),
        receipt_numbers: Arc::new(SequenceReceiptNumbers::default()),
        pricing: Arc::new(FlatRatePricing),
        photos: Arc::new(MemoryPhotoStore::default()),
        legal: Arc::new(AcceptingLegalService),
        receipts: Arc::new(StubReceiptRenderer),
    }
}

pub fn payload(entries: &[(&str, serde_json::Value)]) -> EventPayload {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Drive a fresh session through stage 1 into `ITEM_MANAGEMENT`
pub async fn drive_to_item_management(wizard: &OrderWizard) -> SessionId {
    let id = wizard.create_session().await;
    wizard.send_event(id, OrderEvent::StartOrder).await.unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::ClientSelected,
            payload(&[(keys::CLIENT, json!({"id": "c1", "name": "Olena"}))]),
        )
        .await
        .unwrap();
    let status = wizard
        .send_event_with(
            id,
            OrderEvent::OrderInfoCompleted,
            payload(&[
                (keys::BRANCH, json!({"id": "b1", "code": "KYV"})),
                (keys::UNIQUE_TAG, json!("ORD-TAG-1")),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(status.current_state, OrderState::ItemManagement);
    id
}

/// Run one full item sub-wizard cycle, committing one item
pub async fn add_item_through_subwizard(wizard: &OrderWizard, id: SessionId, name: &str) {
    wizard
        .send_event(id, OrderEvent::StartItemWizard)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::BasicInfoCompleted,
            payload(&[
                (keys::ITEM_NAME, json!(name)),
                (keys::ITEM_CATEGORY, json!("COAT")),
                (keys::ITEM_QUANTITY, json!(1)),
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
        .send_event_with(
            id,
            OrderEvent::DefectsCompleted,
            payload(&[(keys::ITEM_DEFECTS, json!(["worn cuffs"]))]),
        )
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::PricingCompleted,
            payload(&[(keys::ITEM_BASE_PRICE, json!(150.0))]),
        )
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::PhotosCompleted,
            payload(&[(keys::ITEM_PHOTO_SKIP_REASON, json!("client declined"))]),
        )
        .await
        .unwrap();
    let status = wizard.send_event(id, OrderEvent::ItemAdded).await.unwrap();
    assert_eq!(status.current_state, OrderState::ItemManagement);
}

/// Drive a session all the way to `RECEIPT_GENERATION`
pub async fn drive_to_receipt_generation(wizard: &OrderWizard) -> SessionId {
    let id = drive_to_item_management(wizard).await;
    add_item_through_subwizard(wizard, id, "Wool coat").await;

    wizard
        .send_event(id, OrderEvent::ItemsCompleted)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::ExecutionParamsSet,
            payload(&[
                (keys::EXECUTION_DATE, json!("2025-03-01")),
                (keys::URGENCY, json!("standard")),
            ]),
        )
        .await
        .unwrap();
    wizard
        .send_event(id, OrderEvent::DiscountsApplied)
        .await
        .unwrap();
    wizard
        .send_event_with(
            id,
            OrderEvent::PaymentProcessed,
            payload(&[(keys::PAYMENT_METHOD, json!("card"))]),
        )
        .await
        .unwrap();
    wizard
        .send_event(id, OrderEvent::AdditionalInfoCompleted)
        .await
        .unwrap();
    wizard.send_event(id, OrderEvent::ReviewOrder).await.unwrap();
    wizard
        .send_event(id, OrderEvent::OrderApproved)
        .await
        .unwrap();
    let status = wizard
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
    assert_eq!(status.current_state, OrderState::ReceiptGeneration);
    id
}
