//! Reducer for bulk cancellation.

use super::types::summary_message;
use super::{BulkCancelAction, BulkCancelState, CancelStatus};
use crate::batch::BatchError;
use crate::environment::{DeskEnvironment, ProductionDeskEnvironment};
use crate::notice::Notice;
use auction_desk_core::{async_effect, effect::Effect, reducer::Reducer};
use smallvec::{SmallVec, smallvec};

/// Selection set plus batch lifecycle of the attendee list.
///
/// The selection is frozen while a batch is in flight and cleared only once
/// the batch has finished. A batch that never ran (unreachable backend)
/// leaves the selection in place for a retry.
pub struct BulkCancelReducer;

impl BulkCancelReducer {
    /// Create a new bulk cancellation reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BulkCancelReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BulkCancelReducer {
    type State = BulkCancelState;
    type Action = BulkCancelAction;
    type Environment = ProductionDeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let editing = matches!(
            action,
            BulkCancelAction::Select(_)
                | BulkCancelAction::Deselect(_)
                | BulkCancelAction::SelectAll(_)
                | BulkCancelAction::ClearSelection
        );
        if editing && state.status.is_cancelling() {
            tracing::debug!("Selection is frozen while a batch is in flight");
            return smallvec![Effect::None];
        }

        match action {
            BulkCancelAction::Select(attendee) => {
                state.select(attendee);
                smallvec![Effect::None]
            },

            BulkCancelAction::Deselect(guest_id) => {
                state.deselect(&guest_id);
                smallvec![Effect::None]
            },

            BulkCancelAction::SelectAll(attendees) => {
                for attendee in attendees {
                    state.select(attendee);
                }
                smallvec![Effect::None]
            },

            BulkCancelAction::ClearSelection => {
                state.clear_selection();
                smallvec![Effect::None]
            },

            BulkCancelAction::Submit { event_id, payload } => {
                if state.status.is_cancelling() {
                    tracing::debug!("Batch already in flight, ignoring submit");
                    return smallvec![Effect::None];
                }

                if state.selection_len() == 0 {
                    let message = BatchError::EmptySelection.to_string();
                    state
                        .notices
                        .push(Notice::error(message.clone(), env.clock().now()));
                    state.status = CancelStatus::Failed { message };
                    return smallvec![Effect::None];
                }

                let selected = state.selection().to_vec();
                state.status = CancelStatus::Cancelling {
                    attempted: selected.len(),
                };

                let canceller = env.canceller();
                smallvec![async_effect! {
                    let result = canceller.cancel_all(&event_id, &selected, &payload).await;
                    Some(BulkCancelAction::Settled { result })
                }]
            },

            BulkCancelAction::Settled { result } => {
                if !state.status.is_cancelling() {
                    tracing::debug!("Dropping settlement with no batch outstanding");
                    return smallvec![Effect::None];
                }

                let now = env.clock().now();
                match result {
                    Ok(result) => {
                        let summary = result.summary();
                        let message = summary_message(&summary);
                        let notice = if summary.is_success() {
                            Notice::success(message, now)
                        } else {
                            Notice::warning(message, now)
                        };
                        state.notices.push(notice);
                        state.clear_selection();
                        state.status = CancelStatus::Completed(summary);
                        state.last_result = Some(result);
                    },
                    Err(error) => {
                        let message = error.to_string();
                        state.notices.push(Notice::error(message.clone(), now));
                        state.status = CancelStatus::Failed { message };
                    },
                }
                smallvec![Effect::None]
            },
        }
    }
}
