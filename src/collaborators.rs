// Copyright 2025 Cowboy AI, LLC.

//! External collaborator boundary
//!
//! The wizard core does no I/O of its own: client lookup, branch
//! checks, pricing, photo storage, legal validation and receipt
//! rendering are all behind these traits. Implementations live outside
//! the crate; tests substitute mocks or in-memory fakes. Blocking and
//! timeouts belong to implementations, not to the FSM.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a collaborator call
///
/// Surfaced to callers as a generic action failure; internals are
/// logged, not leaked.
#[derive(Debug, Clone, Error)]
#[error("{service}: {message}")]
pub struct CollaboratorError {
    /// Which collaborator failed
    pub service: &'static str,
    /// What went wrong
    pub message: String,
}

impl CollaboratorError {
    /// Create a new collaborator error
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Reference to an existing client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    /// Client identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// Data for creating a new client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

/// Inputs for a price computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Service category code
    pub category_code: String,
    /// Item name
    pub item_name: String,
    /// Material, if known
    pub material: Option<String>,
    /// Color, if known
    pub color: Option<String>,
    /// Quantity
    pub quantity: u32,
    /// Base unit price before modifiers
    pub base_unit_price: f64,
    /// Selected price modifier codes
    pub modifier_codes: Vec<String>,
    /// Expedite surcharge percent, when urgent
    pub expedite_percent: Option<f64>,
    /// Item-level discount percent
    pub discount_percent: Option<f64>,
}

/// A computed price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    /// Price per unit after modifiers
    pub unit_price: f64,
    /// Total for the requested quantity
    pub total_price: f64,
    /// Modifier codes that actually applied
    pub applied_modifiers: Vec<String>,
}

/// Reference to a stored photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Storage identifier
    pub id: String,
    /// Original file name
    pub file_name: String,
}

/// Captured signature plus the terms-acceptance flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    /// Encoded signature strokes or image
    pub data: String,
    /// Whether the client accepted the service terms
    pub terms_accepted: bool,
}

/// Reference to a rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document identifier
    pub id: String,
    /// Where the document can be fetched
    pub url: String,
}

/// Client lookup and creation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Find candidate clients for a search string
    async fn search(&self, query: String) -> Result<Vec<ClientRef>, CollaboratorError>;

    /// Create a new client and return its reference
    async fn create(&self, client: NewClient) -> Result<ClientRef, CollaboratorError>;
}

/// Branch directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchDirectory: Send + Sync {
    /// Confirm a branch exists and currently accepts orders
    async fn is_available(&self, branch_id: String) -> Result<bool, CollaboratorError>;
}

/// Receipt number generation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptNumberGenerator: Send + Sync {
    /// Produce a new unique receipt number for a branch
    async fn next_number(&self, branch_code: String) -> Result<String, CollaboratorError>;
}

/// Price computation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Compute the price for an item
    async fn compute(&self, request: PricingRequest) -> Result<PricingQuote, CollaboratorError>;
}

/// Photo storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store an uploaded image, returning its reference
    async fn store(&self, image: Vec<u8>, file_name: String)
        -> Result<PhotoRef, CollaboratorError>;
}

/// Signature and terms validation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegalService: Send + Sync {
    /// Validate a captured signature payload
    async fn validate(&self, signature: SignaturePayload) -> Result<bool, CollaboratorError>;
}

/// Receipt document rendering
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptRenderer: Send + Sync {
    /// Render the printable receipt for a finished order
    async fn render(&self, order: serde_json::Value) -> Result<DocumentRef, CollaboratorError>;
}

/// The full collaborator set the orchestrator works with
#[derive(Clone)]
pub struct Collaborators {
    /// Client lookup and creation
    pub clients: Arc<dyn ClientDirectory>,
    /// Branch availability
    pub branches: Arc<dyn BranchDirectory>,
    /// Receipt numbers
    pub receipt_numbers: Arc<dyn ReceiptNumberGenerator>,
    /// Price computation
    pub pricing: Arc<dyn PricingService>,
    /// Photo storage
    pub photos: Arc<dyn PhotoStore>,
    /// Legal validation
    pub legal: Arc<dyn LegalService>,
    /// Receipt rendering
    pub receipts: Arc<dyn ReceiptRenderer>,
}
