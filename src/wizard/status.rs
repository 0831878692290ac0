// Copyright 2025 Cowboy AI, LLC.

//! Consolidated session status view

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifiers::SessionId;
use crate::wizard::actions::ActionsAdvisor;
use crate::wizard::completion::CompletionEngine;
use crate::wizard::event::OrderEvent;
use crate::wizard::session::WizardSession;
use crate::wizard::state::OrderState;
use crate::wizard::transition::TransitionTable;

/// Everything a caller needs to render the wizard's current situation
///
/// Assembled on demand from the session, the transition table, the
/// completion engine and the actions advisor; nothing in it is stored.
/// Two calls with no intervening mutation produce identical views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardStatus {
    /// Session this view describes
    pub session_id: SessionId,
    /// Current workflow state
    pub current_state: OrderState,
    /// Wire name of the current state
    pub state_name: String,
    /// Stage number (1..=5)
    pub stage_number: u8,
    /// Human-readable stage name
    pub stage_name: String,
    /// Overall progress in percent, stepped in quarters
    pub overall_progress: u8,
    /// True once every stage predicate holds
    pub can_complete: bool,
    /// Stage 1 completion flag
    pub stage1_complete: bool,
    /// Stage 2 completion flag
    pub stage2_complete: bool,
    /// Stage 3 completion flag
    pub stage3_complete: bool,
    /// Stage 4 completion flag
    pub stage4_complete: bool,
    /// Operator-facing action suggestions
    pub available_actions: Vec<String>,
    /// Events legal from the current state
    pub available_events: Vec<OrderEvent>,
    /// Whether the current state needs operator input
    pub requires_input: bool,
    /// States reachable in one transition
    pub possible_transitions: Vec<OrderState>,
    /// Linear happy-path successor
    pub next_expected_state: Option<OrderState>,
    /// Linear happy-path predecessor
    pub previous_state: Option<OrderState>,
    /// Whether the current state is terminal
    pub is_final_state: bool,
    /// Per-stage reasons the order cannot complete yet
    pub blocking_reasons: IndexMap<String, String>,
    /// Required context keys still missing, in collection order
    pub missing_required_data: Vec<String>,
    /// Number of committed items
    pub items_count: usize,
    /// True while modifications are newer than the last save
    pub has_unsaved_changes: bool,
    /// When the session's data was last modified
    pub last_modified: DateTime<Utc>,
}

impl WizardStatus {
    /// Build the view for a session
    pub fn assemble(session: &WizardSession) -> Self {
        let state = session.current_state();
        let ctx = session.context();
        let stage_number = CompletionEngine::stage_of(state);

        Self {
            session_id: session.id(),
            current_state: state,
            state_name: state.name().to_string(),
            stage_number,
            stage_name: CompletionEngine::stage_name(stage_number).to_string(),
            overall_progress: CompletionEngine::overall_progress(session),
            can_complete: CompletionEngine::can_complete(session),
            stage1_complete: CompletionEngine::is_stage1_complete(session),
            stage2_complete: CompletionEngine::is_stage2_complete(session),
            stage3_complete: CompletionEngine::is_stage3_complete(session),
            stage4_complete: CompletionEngine::is_stage4_complete(session),
            available_actions: ActionsAdvisor::available_actions(state, ctx),
            available_events: TransitionTable::available_events(state),
            requires_input: ActionsAdvisor::requires_input(state),
            possible_transitions: TransitionTable::possible_transitions(state),
            next_expected_state: TransitionTable::next_expected_state(state),
            previous_state: TransitionTable::previous_state(state),
            is_final_state: TransitionTable::is_final(state),
            blocking_reasons: CompletionEngine::blocking_reasons(session),
            missing_required_data: CompletionEngine::missing_required_data(ctx),
            items_count: CompletionEngine::items_count(ctx),
            has_unsaved_changes: ctx.has_unsaved_changes(),
            last_modified: ctx.last_modified(),
        }
    }
}
