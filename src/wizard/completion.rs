// Copyright 2025 Cowboy AI, LLC.

//! Derived completion and progress views
//!
//! Completion is never stored: every predicate here is a pure function
//! of the session's state, transition history and context snapshot, so
//! it cannot drift out of sync with the authoritative data. Stage
//! predicates are monotonic - once a stage is complete it stays
//! complete across back-navigation, because "progressed beyond" is
//! derived from the furthest stage the history has reached.

use indexmap::IndexMap;

use crate::wizard::context::{keys, SessionContext};
use crate::wizard::session::WizardSession;
use crate::wizard::state::OrderState;

/// Required context keys, in the order they are collected
const REQUIRED_KEYS: [&str; 9] = [
    keys::CLIENT,
    keys::BRANCH,
    keys::RECEIPT_NUMBER,
    keys::UNIQUE_TAG,
    keys::ITEMS,
    keys::EXECUTION_DATE,
    keys::PAYMENT_METHOD,
    keys::TERMS_ACCEPTED,
    keys::SIGNATURE,
];

/// Derived completion, progress and blocking views over a session
pub struct CompletionEngine;

impl CompletionEngine {
    /// Stage number of a state (1..=5, 5 being the terminal group)
    pub fn stage_of(state: OrderState) -> u8 {
        state.stage().number()
    }

    /// Human-readable name of a stage number
    pub fn stage_name(stage: u8) -> &'static str {
        match stage {
            1 => "Client & order info",
            2 => "Items",
            3 => "Execution & payment",
            4 => "Confirmation & receipt",
            _ => "Closed",
        }
    }

    /// Number of committed items in the context
    pub fn items_count(ctx: &SessionContext) -> usize {
        ctx.value(keys::ITEMS)
            .and_then(|value| value.as_array())
            .map(|items| items.len())
            .unwrap_or(0)
    }

    /// Stage 1 complete: moved past client intake with client, branch
    /// and basic order info captured
    pub fn is_stage1_complete(session: &WizardSession) -> bool {
        let ctx = session.context();
        session.furthest_stage() > 1
            && ctx.contains(keys::CLIENT)
            && ctx.contains(keys::BRANCH)
            && ctx.contains(keys::RECEIPT_NUMBER)
            && ctx.contains(keys::UNIQUE_TAG)
    }

    /// Stage 2 complete: stage 1 complete, moved past item entry, and at
    /// least one item committed
    pub fn is_stage2_complete(session: &WizardSession) -> bool {
        Self::is_stage1_complete(session)
            && session.furthest_stage() > 2
            && Self::items_count(session.context()) >= 1
    }

    /// Stage 3 complete: stage 2 complete, moved past execution and
    /// payment, with the date and payment method captured
    pub fn is_stage3_complete(session: &WizardSession) -> bool {
        let ctx = session.context();
        Self::is_stage2_complete(session)
            && session.furthest_stage() > 3
            && ctx.contains(keys::EXECUTION_DATE)
            && ctx.contains(keys::PAYMENT_METHOD)
    }

    /// Stage 4 complete: stage 3 complete, confirmation stage entered,
    /// terms accepted and signature captured
    ///
    /// The receipt reference is not part of this predicate: generating
    /// the receipt is the completing act itself, so requiring it here
    /// would make the predicate unsatisfiable before the terminal state.
    pub fn is_stage4_complete(session: &WizardSession) -> bool {
        let ctx = session.context();
        Self::is_stage3_complete(session)
            && session.furthest_stage() >= 4
            && ctx.get::<bool>(keys::TERMS_ACCEPTED).unwrap_or(false)
            && ctx.contains(keys::SIGNATURE)
    }

    /// Overall progress, stepped in quarters (0/25/50/75/100)
    pub fn overall_progress(session: &WizardSession) -> u8 {
        let stages = [
            Self::is_stage1_complete(session),
            Self::is_stage2_complete(session),
            Self::is_stage3_complete(session),
            Self::is_stage4_complete(session),
        ];
        stages.iter().filter(|complete| **complete).count() as u8 * 25
    }

    /// True once every stage predicate holds
    pub fn can_complete(session: &WizardSession) -> bool {
        Self::is_stage4_complete(session)
    }

    /// Human-readable reasons the order cannot complete yet, per stage
    pub fn blocking_reasons(session: &WizardSession) -> IndexMap<String, String> {
        let mut reasons = IndexMap::new();
        if !Self::is_stage1_complete(session) {
            reasons.insert(
                "stage1".to_string(),
                "Select a client and fill in branch, receipt number and unique tag".to_string(),
            );
        }
        if !Self::is_stage2_complete(session) {
            reasons.insert(
                "stage2".to_string(),
                "Add at least one item and finish item entry".to_string(),
            );
        }
        if !Self::is_stage3_complete(session) {
            reasons.insert(
                "stage3".to_string(),
                "Set the execution date and choose a payment method".to_string(),
            );
        }
        if !Self::is_stage4_complete(session) {
            reasons.insert(
                "stage4".to_string(),
                "Confirm the order, accept the terms and capture the signature".to_string(),
            );
        }
        reasons
    }

    /// Required context keys that are still missing, in collection order
    pub fn missing_required_data(ctx: &SessionContext) -> Vec<String> {
        REQUIRED_KEYS
            .iter()
            .filter(|key| match **key {
                keys::ITEMS => Self::items_count(ctx) == 0,
                keys::TERMS_ACCEPTED => !ctx.get::<bool>(keys::TERMS_ACCEPTED).unwrap_or(false),
                other => !ctx.contains(other),
            })
            .map(|key| (*key).to_string())
            .collect()
    }
}
