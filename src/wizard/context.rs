// Copyright 2025 Cowboy AI, LLC.

//! Per-session context store
//!
//! Holds all form data a wizard session has accumulated, keyed by
//! stage-namespaced strings, plus the bookkeeping timestamps used to
//! derive the unsaved-changes flag. Reads hand out snapshots, never the
//! live map.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WizardResult;
use crate::wizard::event::EventPayload;

/// Well-known context keys, namespaced per owning stage
///
/// A stage coordinator only writes keys in its own namespace; the item
/// sub-wizard drafts under `item.` and the committed list lives under
/// `stage2.`.
pub mod keys {
    /// Selected client reference (stage 1)
    pub const CLIENT: &str = "stage1.client";
    /// Selected branch reference (stage 1)
    pub const BRANCH: &str = "stage1.branch";
    /// Generated receipt number (stage 1)
    pub const RECEIPT_NUMBER: &str = "stage1.receipt_number";
    /// Order-level unique tag (stage 1)
    pub const UNIQUE_TAG: &str = "stage1.unique_tag";

    /// Committed order items, a JSON array (stage 2)
    pub const ITEMS: &str = "stage2.items";
    /// Index operand for item edit/delete operations (stage 2)
    pub const ITEM_INDEX: &str = "stage2.item_index";
    /// Fully-formed item operand for direct add/edit (stage 2)
    pub const ITEM: &str = "stage2.item";

    /// Namespace prefix of the in-progress item draft
    pub const ITEM_DRAFT_PREFIX: &str = "item.";
    /// Draft: item name
    pub const ITEM_NAME: &str = "item.name";
    /// Draft: category code
    pub const ITEM_CATEGORY: &str = "item.category_code";
    /// Draft: quantity
    pub const ITEM_QUANTITY: &str = "item.quantity";
    /// Draft: material
    pub const ITEM_MATERIAL: &str = "item.material";
    /// Draft: color
    pub const ITEM_COLOR: &str = "item.color";
    /// Draft: filler
    pub const ITEM_FILLER: &str = "item.filler";
    /// Draft: wear level
    pub const ITEM_WEAR_LEVEL: &str = "item.wear_level";
    /// Draft: defects list
    pub const ITEM_DEFECTS: &str = "item.defects";
    /// Draft: stains list
    pub const ITEM_STAINS: &str = "item.stains";
    /// Draft: base unit price
    pub const ITEM_BASE_PRICE: &str = "item.base_unit_price";
    /// Draft: selected price modifier codes
    pub const ITEM_MODIFIERS: &str = "item.modifiers";
    /// Draft: discount percent
    pub const ITEM_DISCOUNT: &str = "item.discount_percent";
    /// Draft: expedite surcharge percent
    pub const ITEM_EXPEDITE: &str = "item.expedite_percent";
    /// Draft: computed unit price
    pub const ITEM_UNIT_PRICE: &str = "item.unit_price";
    /// Draft: computed total price
    pub const ITEM_TOTAL_PRICE: &str = "item.total_price";
    /// Draft: stored photo references
    pub const ITEM_PHOTOS: &str = "item.photos";
    /// Draft: reason photos were skipped
    pub const ITEM_PHOTO_SKIP_REASON: &str = "item.photo_skip_reason";
    /// Draft: per-item tag
    pub const ITEM_TAG: &str = "item.tag";

    /// Requested execution date (stage 3)
    pub const EXECUTION_DATE: &str = "stage3.execution_date";
    /// Urgency level (stage 3)
    pub const URGENCY: &str = "stage3.urgency";
    /// Order-wide discount percent (stage 3)
    pub const DISCOUNT_PERCENT: &str = "stage3.discount_percent";
    /// Discount card number (stage 3)
    pub const DISCOUNT_CARD: &str = "stage3.discount_card";
    /// Payment method (stage 3)
    pub const PAYMENT_METHOD: &str = "stage3.payment_method";
    /// Prepaid amount (stage 3)
    pub const PREPAID_AMOUNT: &str = "stage3.prepaid_amount";
    /// Free-form order notes (stage 3)
    pub const ORDER_NOTES: &str = "stage3.notes";

    /// Terms-acceptance flag (stage 4)
    pub const TERMS_ACCEPTED: &str = "stage4.terms_accepted";
    /// Captured signature payload (stage 4)
    pub const SIGNATURE: &str = "stage4.signature";
    /// Generated receipt document reference (stage 4)
    pub const RECEIPT_REF: &str = "stage4.receipt_ref";
}

/// Key/value store of one wizard session
///
/// Values are arbitrary JSON; typed access goes through [`set`](Self::set)
/// and [`get`](Self::get). Every write bumps `last_modified`, so
/// `last_modified > last_saved` signals unsaved changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    data: IndexMap<String, Value>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    last_saved: DateTime<Utc>,
}

impl SessionContext {
    /// Create an empty context with all timestamps set to now
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            data: IndexMap::new(),
            created_at: now,
            last_modified: now,
            last_saved: now,
        }
    }

    /// Set a value, serializing it to JSON
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> WizardResult<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value);
        Ok(())
    }

    /// Set a raw JSON value
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
        self.touch();
    }

    /// Get a value, deserializing it from JSON
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a raw JSON value
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.shift_remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Remove every key under a namespace prefix
    pub fn remove_prefix(&mut self, prefix: &str) -> usize {
        let before = self.data.len();
        self.data.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.data.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Merge an event payload into the store
    pub fn merge(&mut self, payload: &EventPayload) {
        if payload.is_empty() {
            return;
        }
        for (key, value) in payload {
            self.data.insert(key.clone(), value.clone());
        }
        self.touch();
    }

    /// Read-only snapshot of the data, never the live map
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.data.clone()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Record that the session's data has been saved
    pub fn mark_saved(&mut self) {
        self.last_saved = Utc::now();
    }

    /// True while there are modifications newer than the last save
    pub fn has_unsaved_changes(&self) -> bool {
        self.last_modified > self.last_saved
    }

    /// When the session was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session's data was last modified
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// When the session's data was last saved
    pub fn last_saved(&self) -> DateTime<Utc> {
        self.last_saved
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut ctx = SessionContext::new();
        ctx.set(keys::CLIENT, serde_json::json!({"id": "c1"})).unwrap();
        ctx.set(keys::ITEM_QUANTITY, 3u32).unwrap();

        assert_eq!(ctx.get::<u32>(keys::ITEM_QUANTITY), Some(3));
        assert!(ctx.contains(keys::CLIENT));
        assert_eq!(ctx.get::<u32>("missing"), None);
    }

    #[test]
    fn writes_flag_unsaved_changes_until_marked_saved() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.has_unsaved_changes());

        ctx.set(keys::BRANCH, "b1").unwrap();
        assert!(ctx.has_unsaved_changes());

        ctx.mark_saved();
        assert!(!ctx.has_unsaved_changes());
    }

    #[test]
    fn remove_prefix_clears_the_item_draft_only() {
        let mut ctx = SessionContext::new();
        ctx.set(keys::ITEM_NAME, "coat").unwrap();
        ctx.set(keys::ITEM_MATERIAL, "wool").unwrap();
        ctx.set(keys::CLIENT, "c1").unwrap();

        assert_eq!(ctx.remove_prefix(keys::ITEM_DRAFT_PREFIX), 2);
        assert!(!ctx.contains(keys::ITEM_NAME));
        assert!(ctx.contains(keys::CLIENT));
    }

    #[test]
    fn snapshot_is_detached_from_the_live_map() {
        let mut ctx = SessionContext::new();
        ctx.set(keys::BRANCH, "b1").unwrap();

        let snapshot = ctx.snapshot();
        ctx.set(keys::BRANCH, "b2").unwrap();

        assert_eq!(snapshot.get(keys::BRANCH), Some(&serde_json::json!("b1")));
        assert_eq!(ctx.get::<String>(keys::BRANCH), Some("b2".to_string()));
    }

    #[test]
    fn merge_applies_every_payload_entry() {
        let mut ctx = SessionContext::new();
        let mut payload = EventPayload::new();
        payload.insert(keys::EXECUTION_DATE.into(), serde_json::json!("2025-03-01"));
        payload.insert(keys::URGENCY.into(), serde_json::json!("express_48h"));

        ctx.merge(&payload);
        assert_eq!(ctx.len(), 2);
        assert!(ctx.has_unsaved_changes());
    }
}
