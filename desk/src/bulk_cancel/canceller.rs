//! Bulk cancellation against the backend.

use crate::batch::{BatchError, BatchResult, BatchSettings, ItemOutcome, settle_all};
use auction_desk_client::{
    ApiError, AttendeeApi, AttendeeRecord, AttendeeType, CancelAttendeesPayload, EventId, GuestId,
    ReadModel, ReadModelCache,
};
use futures::future::{self, BoxFuture};
use std::collections::HashSet;
use std::sync::Arc;

/// Cancels a selection of attendees, each through the endpoint its type needs.
///
/// Requests are independent: one failure never stops or undoes another.
#[derive(Clone)]
pub struct BulkAttendeeCanceller {
    api: Arc<dyn AttendeeApi>,
    read_models: Arc<dyn ReadModelCache>,
    settings: BatchSettings,
}

impl BulkAttendeeCanceller {
    /// Create a canceller with default batch settings
    #[must_use]
    pub fn new(api: Arc<dyn AttendeeApi>, read_models: Arc<dyn ReadModelCache>) -> Self {
        Self {
            api,
            read_models,
            settings: BatchSettings::default(),
        }
    }

    /// Override batch settings
    #[must_use]
    pub const fn with_settings(mut self, settings: BatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Cancel every selected attendee of `event_id`.
    ///
    /// Attendees already cancelled count as successes without a request.
    /// A selection listing the same attendee twice yields one outcome for it.
    /// Whatever the outcome mix, the attendee list and the meal and seating
    /// aggregates of the event are invalidated afterwards.
    ///
    /// # Errors
    ///
    /// [`BatchError::EmptySelection`] for an empty selection and
    /// [`BatchError::TotalNetworkFailure`] when the reachability probe fails.
    /// Neither sends a cancellation.
    #[tracing::instrument(skip_all, fields(event_id = %event_id, selected = selected.len()))]
    pub async fn cancel_all(
        &self,
        event_id: &EventId,
        selected: &[AttendeeRecord],
        payload: &CancelAttendeesPayload,
    ) -> Result<BatchResult<GuestId>, BatchError> {
        if selected.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        if self.settings.preflight {
            if let Err(error) = self.api.health_check().await {
                tracing::warn!(error = %error, "Backend unreachable, batch not dispatched");
                metrics::counter!("attendees.cancel", "result" => "unreachable").increment(1);
                return Err(BatchError::TotalNetworkFailure(error));
            }
        }

        let distinct = distinct_by_id(selected);
        if distinct.len() < selected.len() {
            tracing::debug!(
                duplicates = selected.len() - distinct.len(),
                "Collapsed duplicate selections"
            );
        }

        let items = distinct
            .into_iter()
            .map(|attendee| (attendee.id.clone(), self.cancel_one(attendee, payload)))
            .collect();
        let result = settle_all(items, &self.settings).await;

        self.read_models
            .invalidate(&ReadModel::after_cancellation(event_id));

        for (guest_id, message) in result.failures() {
            tracing::warn!(%guest_id, error = message, "Attendee cancellation failed");
        }
        let skipped = result.skipped_count();
        metrics::counter!("attendees.cancel", "result" => "succeeded")
            .increment((result.success_count() - skipped) as u64);
        metrics::counter!("attendees.cancel", "result" => "skipped").increment(skipped as u64);
        metrics::counter!("attendees.cancel", "result" => "failed")
            .increment(result.failure_count() as u64);
        tracing::info!(summary = %result.summary(), "Bulk cancellation finished");

        Ok(result)
    }

    fn cancel_one<'a>(
        &'a self,
        attendee: &'a AttendeeRecord,
        payload: &'a CancelAttendeesPayload,
    ) -> BoxFuture<'a, ItemOutcome> {
        if attendee.status.is_cancelled() {
            return Box::pin(future::ready(ItemOutcome::Skipped));
        }

        match (attendee.attendee_type, &attendee.registration_id) {
            (AttendeeType::Registrant, Some(registration_id)) => Box::pin(async move {
                tracing::debug!(guest_id = %attendee.id, %registration_id, "Cancelling registration");
                outcome(self.api.cancel_registration(registration_id, payload).await)
            }),
            (AttendeeType::Registrant, None) => Box::pin(future::ready(ItemOutcome::Failed(
                format!("Registrant {} has no registration", attendee.id),
            ))),
            (AttendeeType::Guest, _) => Box::pin(async move {
                tracing::debug!(guest_id = %attendee.id, "Cancelling guest");
                outcome(self.api.cancel_guest(&attendee.id, payload).await)
            }),
        }
    }
}

impl std::fmt::Debug for BulkAttendeeCanceller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkAttendeeCanceller")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn outcome(response: Result<(), ApiError>) -> ItemOutcome {
    match response {
        Ok(()) => ItemOutcome::Succeeded,
        Err(error) => ItemOutcome::Failed(error.user_message()),
    }
}

/// First occurrence of each attendee id, in selection order
fn distinct_by_id(selected: &[AttendeeRecord]) -> Vec<&AttendeeRecord> {
    let mut seen: HashSet<&GuestId> = HashSet::with_capacity(selected.len());
    selected
        .iter()
        .filter(|attendee| seen.insert(&attendee.id))
        .collect()
}
