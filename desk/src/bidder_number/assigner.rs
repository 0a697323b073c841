//! Single bidder-number assignment against the backend.

use super::types::{AssignError, AssignmentOutcome, AssignmentResult};
use auction_desk_client::{
    AttendeeApi, BidderNumber, BidderNumberError, EventId, GuestId, ReadModel, ReadModelCache,
};
use std::sync::Arc;

/// Assigns one bidder number per call.
///
/// Collision handling belongs to the backend: a number already held by
/// another guest is swapped server-side and reported back as
/// [`AssignmentOutcome::Swapped`]. Nothing here checks uniqueness locally.
#[derive(Clone)]
pub struct BidderNumberAssigner {
    api: Arc<dyn AttendeeApi>,
    read_models: Arc<dyn ReadModelCache>,
}

impl BidderNumberAssigner {
    /// Create an assigner over the given backend and read-model cache
    #[must_use]
    pub fn new(api: Arc<dyn AttendeeApi>, read_models: Arc<dyn ReadModelCache>) -> Self {
        Self { api, read_models }
    }

    /// Parse operator input, then assign.
    ///
    /// # Errors
    ///
    /// [`AssignError::Validation`] without any request for non-numeric or
    /// out-of-range input, otherwise as [`Self::assign`].
    pub async fn assign_raw(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        input: &str,
    ) -> Result<AssignmentResult, AssignError> {
        let number = Self::parse_input(event_id, guest_id, input)?;
        self.assign(event_id, guest_id, number).await
    }

    /// Validate operator input locally. Rejections are logged and counted
    /// under `bidder_number.assigned{outcome="invalid"}`.
    ///
    /// # Errors
    ///
    /// [`BidderNumberError`] for non-numeric or out-of-range input.
    pub fn parse_input(
        event_id: &EventId,
        guest_id: &GuestId,
        input: &str,
    ) -> Result<BidderNumber, BidderNumberError> {
        BidderNumber::parse(input).inspect_err(|_| {
            tracing::debug!(%event_id, %guest_id, input, "Rejected bidder number input");
            metrics::counter!("bidder_number.assigned", "outcome" => "invalid").increment(1);
        })
    }

    /// Assign `number` to `guest_id` within `event_id`.
    ///
    /// Exactly one request. On success the attendee and bidder-number read
    /// models of the event are invalidated, for direct assignments and swaps
    /// alike.
    ///
    /// # Errors
    ///
    /// [`AssignError::Transport`] carrying the backend's message verbatim, or
    /// `"Failed to assign bidder number"` when it gave none.
    #[tracing::instrument(skip_all, fields(event_id = %event_id, guest_id = %guest_id, number = %number))]
    pub async fn assign(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        number: BidderNumber,
    ) -> Result<AssignmentResult, AssignError> {
        let response = match self.api.assign_bidder_number(event_id, guest_id, number).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "Bidder number assignment failed");
                metrics::counter!("bidder_number.assigned", "outcome" => "failed").increment(1);
                return Err(AssignError::from_api(error));
            },
        };

        let outcome = match response.previous_holder() {
            Some(previous_holder_id) => {
                tracing::info!(previous_holder_id = %previous_holder_id, "Bidder number swapped");
                metrics::counter!("bidder_number.assigned", "outcome" => "swapped").increment(1);
                AssignmentOutcome::Swapped {
                    previous_holder_id: previous_holder_id.clone(),
                }
            },
            None => {
                tracing::info!("Bidder number assigned");
                metrics::counter!("bidder_number.assigned", "outcome" => "assigned").increment(1);
                AssignmentOutcome::Assigned
            },
        };

        self.read_models
            .invalidate(&ReadModel::after_bidder_number_change(event_id));

        Ok(AssignmentResult {
            event_id: event_id.clone(),
            guest_id: guest_id.clone(),
            number,
            outcome,
        })
    }
}

impl std::fmt::Debug for BidderNumberAssigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidderNumberAssigner").finish_non_exhaustive()
    }
}
