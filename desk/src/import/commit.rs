//! Applying an import plan to the backend.

use super::plan::{ImportAction, ImportPlan};
use crate::batch::{BatchError, BatchResult, BatchSettings, ItemOutcome, settle_all};
use auction_desk_client::{ApiError, AttendeeApi, ReadModel, ReadModelCache};
use futures::future::{self, BoxFuture};
use std::sync::Arc;

/// Commits import plans with the same settle-all rules as bulk cancellation.
#[derive(Clone)]
pub struct AttendeeImporter {
    api: Arc<dyn AttendeeApi>,
    read_models: Arc<dyn ReadModelCache>,
    settings: BatchSettings,
}

impl AttendeeImporter {
    /// Create an importer with default batch settings
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

    /// Run every create and update of `plan`; results are keyed by line.
    ///
    /// Unchanged rows count as skipped successes. Issues in the plan are not
    /// retried here. Afterwards the attendee and bidder-number read models
    /// of the event are invalidated.
    ///
    /// # Errors
    ///
    /// [`BatchError::TotalNetworkFailure`] when the reachability probe fails.
    #[tracing::instrument(skip_all, fields(event_id = %plan.event_id, rows = plan.actions.len()))]
    pub async fn commit(&self, plan: &ImportPlan) -> Result<BatchResult<usize>, BatchError> {
        if self.settings.preflight {
            if let Err(error) = self.api.health_check().await {
                tracing::warn!(error = %error, "Backend unreachable, import not dispatched");
                return Err(BatchError::TotalNetworkFailure(error));
            }
        }

        for warning in &plan.swap_warnings {
            tracing::info!(%warning, "Import will swap a bidder number");
        }

        let items = plan
            .actions
            .iter()
            .map(|action| (action.line(), self.apply(plan, action)))
            .collect();
        let result = settle_all(items, &self.settings).await;

        self.read_models
            .invalidate(&ReadModel::after_bidder_number_change(&plan.event_id));

        for (line, message) in result.failures() {
            tracing::warn!(line, error = message, "Import row failed");
        }
        metrics::counter!("attendees.import", "result" => "applied")
            .increment((result.success_count() - result.skipped_count()) as u64);
        metrics::counter!("attendees.import", "result" => "failed")
            .increment(result.failure_count() as u64);
        tracing::info!(summary = %result.summary(), "Import finished");

        Ok(result)
    }

    fn apply<'a>(&'a self, plan: &'a ImportPlan, action: &'a ImportAction) -> BoxFuture<'a, ItemOutcome> {
        match action {
            ImportAction::Unchanged { .. } => Box::pin(future::ready(ItemOutcome::Skipped)),
            ImportAction::Create { guest, .. } => Box::pin(async move {
                outcome(self.api.create_guest(&plan.event_id, guest).await)
            }),
            ImportAction::Update { guest_id, guest, .. } => Box::pin(async move {
                outcome(self.api.update_guest(guest_id, guest).await)
            }),
        }
    }
}

impl std::fmt::Debug for AttendeeImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendeeImporter")
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
