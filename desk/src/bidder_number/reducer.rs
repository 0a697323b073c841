//! Reducer for bidder-number assignment.

use super::{AssignmentStatus, BidderNumberAction, BidderNumberAssigner, BidderNumberState};
use crate::environment::{DeskEnvironment, ProductionDeskEnvironment};
use crate::notice::Notice;
use auction_desk_core::{async_effect, effect::Effect, reducer::Reducer};
use smallvec::{SmallVec, smallvec};

/// Per-guest assignment state machine.
///
/// `Idle → Submitting → Succeeded | Failed`. Validation failures go straight
/// from `Idle` to `Failed`. A second submit for a guest that is already
/// `Submitting` is dropped, so at most one request per guest is in flight.
pub struct BidderNumberReducer;

impl BidderNumberReducer {
    /// Create a new bidder-number reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BidderNumberReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BidderNumberReducer {
    type State = BidderNumberState;
    type Action = BidderNumberAction;
    type Environment = ProductionDeskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BidderNumberAction::Submit {
                event_id,
                guest_id,
                input,
            } => {
                if state.status(&guest_id).is_submitting() {
                    tracing::debug!(%guest_id, "Assignment already in flight, ignoring submit");
                    return smallvec![Effect::None];
                }

                let number = match BidderNumberAssigner::parse_input(&event_id, &guest_id, &input) {
                    Ok(number) => number,
                    Err(error) => {
                        let message = error.to_string();
                        state
                            .notices
                            .push(Notice::error(message.clone(), env.clock().now()));
                        state.set_status(guest_id, AssignmentStatus::Failed { message });
                        return smallvec![Effect::None];
                    },
                };

                state.set_status(guest_id.clone(), AssignmentStatus::Submitting { number });

                let assigner = env.assigner();
                smallvec![async_effect! {
                    let result = assigner.assign(&event_id, &guest_id, number).await;
                    Some(BidderNumberAction::Settled { guest_id, result })
                }]
            },

            BidderNumberAction::Settled { guest_id, result } => {
                if !state.status(&guest_id).is_submitting() {
                    tracing::debug!(%guest_id, "Dropping settlement with no request outstanding");
                    return smallvec![Effect::None];
                }

                let now = env.clock().now();
                match result {
                    Ok(assignment) => {
                        let notice = if assignment.is_swap() {
                            Notice::warning(assignment.message(), now)
                        } else {
                            Notice::success(assignment.message(), now)
                        };
                        state.notices.push(notice);
                        state.set_status(guest_id, AssignmentStatus::Succeeded(assignment));
                    },
                    Err(error) => {
                        let message = error.to_string();
                        state.notices.push(Notice::error(message.clone(), now));
                        state.set_status(guest_id, AssignmentStatus::Failed { message });
                    },
                }
                smallvec![Effect::None]
            },

            BidderNumberAction::Dismiss { guest_id } => {
                if state.status(&guest_id).is_submitting() {
                    tracing::debug!(%guest_id, "Dialog stays open while a request is outstanding");
                } else {
                    state.set_status(guest_id, AssignmentStatus::Idle);
                }
                smallvec![Effect::None]
            },
        }
    }
}
