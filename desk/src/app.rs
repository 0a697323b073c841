//! Desk application wiring: client, read models and one store per command.

use crate::batch::{BatchError, BatchSummary, ItemOutcome};
use crate::bidder_number::{
    AssignmentStatus, BidderNumberAction, BidderNumberReducer, BidderNumberState,
};
use crate::bulk_cancel::{BulkCancelAction, BulkCancelReducer, BulkCancelState, CancelStatus};
use crate::cli::Command;
use crate::config::{ConfigError, DeskConfig};
use crate::directory::AttendeeDirectory;
use crate::environment::{DeskEnvironment, ProductionDeskEnvironment};
use crate::import::{self, ImportError, plan_import};
use crate::notice::Notice;
use auction_desk_client::{
    ApiClient, ApiError, AttendeeApi, CancelAttendeesPayload, EventId, GuestId,
};
use auction_desk_core::environment::{Clock, SystemClock};
use auction_desk_runtime::{Store, StoreError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a desk command before it produces a report
#[derive(Error, Debug)]
pub enum DeskError {
    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend call outside a batch failed (client setup, attendee list)
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Import file unusable
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Batch never ran
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Store rejected an action or an effect panicked
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a command did, ready to print
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    /// Detail lines (per-item failures, plan entries)
    pub lines: Vec<String>,
    /// Notices raised by the workflow
    pub notices: Vec<Notice>,
    /// Whether everything succeeded
    pub success: bool,
}

/// The auction desk: one backend, one attendee directory, three workflows.
pub struct DeskApp {
    config: DeskConfig,
    directory: Arc<AttendeeDirectory>,
    environment: ProductionDeskEnvironment,
}

impl DeskApp {
    /// Build the app over the reqwest client described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] for invalid configuration and
    /// [`DeskError::Api`] if the HTTP client can't be built.
    pub fn new(config: DeskConfig) -> Result<Self, DeskError> {
        config.validate()?;
        let client = ApiClient::new(config.client_config())?;
        tracing::info!(base_url = %client.base_url(), "Backend client ready");
        Ok(Self::with_api(config, Arc::new(client), Arc::new(SystemClock)))
    }

    /// Build the app over any backend implementation.
    #[must_use]
    pub fn with_api(config: DeskConfig, api: Arc<dyn AttendeeApi>, clock: Arc<dyn Clock>) -> Self {
        let directory = Arc::new(AttendeeDirectory::new(Arc::clone(&api)));
        let environment = ProductionDeskEnvironment::new(api, directory.clone(), clock)
            .with_batch_settings(config.batch);
        Self {
            config,
            directory,
            environment,
        }
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Run one CLI command.
    ///
    /// # Errors
    ///
    /// See [`DeskError`]. Per-item failures are reported, not returned.
    pub async fn run(&self, command: &Command) -> Result<CommandReport, DeskError> {
        match command {
            Command::Assign {
                event,
                guest,
                number,
            } => {
                self.assign(&EventId::new(event.as_str()), &GuestId::new(guest.as_str()), number)
                    .await
            },
            Command::Cancel {
                event,
                reason,
                notes,
                attendees,
            } => {
                let ids: Vec<GuestId> = attendees.iter().map(|id| GuestId::new(id.as_str())).collect();
                let payload = CancelAttendeesPayload {
                    reason: reason.clone(),
                    notes: notes.clone(),
                };
                self.cancel(&EventId::new(event.as_str()), &ids, payload).await
            },
            Command::Import {
                event,
                file,
                dry_run,
            } => self.import(&EventId::new(event.as_str()), file, *dry_run).await,
        }
    }

    /// Assign a bidder number typed by the operator.
    ///
    /// # Errors
    ///
    /// Only [`DeskError::Store`]; assignment failures are reported.
    pub async fn assign(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        input: &str,
    ) -> Result<CommandReport, DeskError> {
        let store = Store::new(
            BidderNumberState::new(),
            BidderNumberReducer::new(),
            self.environment.clone(),
        );
        store
            .send_and_settle(BidderNumberAction::Submit {
                event_id: event_id.clone(),
                guest_id: guest_id.clone(),
                input: input.to_string(),
            })
            .await?;

        let (status, notices) = store
            .state(|s| (s.status(guest_id), s.notices.clone()))
            .await;
        Ok(CommandReport {
            lines: Vec::new(),
            notices,
            success: matches!(status, AssignmentStatus::Succeeded(_)),
        })
    }

    /// Cancel the given attendees of an event.
    ///
    /// Ids not found in the event are reported and left out of the batch.
    ///
    /// # Errors
    ///
    /// [`DeskError::Api`] if the attendee list can't be fetched,
    /// [`DeskError::Store`] if the store fails.
    pub async fn cancel(
        &self,
        event_id: &EventId,
        attendee_ids: &[GuestId],
        payload: CancelAttendeesPayload,
    ) -> Result<CommandReport, DeskError> {
        let attendees = self.directory.attendees(event_id).await?;

        let mut lines = Vec::new();
        let mut selection = Vec::with_capacity(attendee_ids.len());
        for id in attendee_ids {
            match attendees.iter().find(|a| &a.id == id) {
                Some(attendee) => selection.push(attendee.clone()),
                None => lines.push(format!("{id}: not an attendee of {event_id}")),
            }
        }

        let store = Store::new(
            BulkCancelState::new(),
            BulkCancelReducer::new(),
            self.environment.clone(),
        );
        store
            .send_and_settle(BulkCancelAction::SelectAll(selection))
            .await?;
        store
            .send_and_settle(BulkCancelAction::Submit {
                event_id: event_id.clone(),
                payload,
            })
            .await?;

        let (status, result, notices) = store
            .state(|s| (s.status.clone(), s.last_result.clone(), s.notices.clone()))
            .await;
        if let Some(result) = &result {
            lines.extend(
                result
                    .failures()
                    .map(|(guest_id, message)| format!("{guest_id}: {message}")),
            );
        }

        let completed = matches!(status, CancelStatus::Completed(BatchSummary::AllSucceeded { .. }));
        Ok(CommandReport {
            success: completed && lines.is_empty(),
            lines,
            notices,
        })
    }

    /// Import guests from a JSON file; with `dry_run` only the plan is reported.
    ///
    /// # Errors
    ///
    /// [`DeskError::Import`] for an unreadable file, [`DeskError::Api`] if
    /// the attendee list can't be fetched, [`DeskError::Batch`] if the
    /// backend is unreachable.
    pub async fn import(
        &self,
        event_id: &EventId,
        path: &Path,
        dry_run: bool,
    ) -> Result<CommandReport, DeskError> {
        let rows = import::load_rows(path).await?;
        let existing = self.directory.attendees(event_id).await?;
        let plan = plan_import(event_id, &rows, &existing);

        let mut lines: Vec<String> = plan.issues.iter().map(ToString::to_string).collect();
        lines.extend(plan.swap_warnings.iter().map(ToString::to_string));
        let now = self.environment.clock().now();

        if dry_run {
            lines.extend(plan.actions.iter().map(ToString::to_string));
            let summary = format!(
                "Import plan: {} to create, {} to update, {} unchanged, {} rejected",
                plan.creates(),
                plan.updates(),
                plan.unchanged(),
                plan.issues.len()
            );
            return Ok(CommandReport {
                lines,
                notices: vec![Notice::success(summary, now)],
                success: plan.issues.is_empty(),
            });
        }

        let result = self.environment.importer().commit(&plan).await?;
        lines.extend(
            result
                .failures()
                .map(|(line, message)| format!("line {line}: {message}")),
        );

        let summary = result.summary();
        let message = format!("Import: {summary}");
        let notice = if summary.is_success() {
            Notice::success(message, now)
        } else {
            Notice::warning(message, now)
        };
        let swapped = plan
            .swap_warnings
            .iter()
            .filter(|warning| {
                result
                    .items()
                    .iter()
                    .any(|item| item.key == warning.line && item.outcome == ItemOutcome::Succeeded)
            })
            .count();
        let mut notices = vec![notice];
        if swapped > 0 {
            notices.push(Notice::warning(
                format!("{swapped} bidder number(s) were taken from other attendees"),
                now,
            ));
        }

        Ok(CommandReport {
            lines,
            notices,
            success: summary.is_success() && plan.issues.is_empty(),
        })
    }
}

impl std::fmt::Debug for DeskApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskApp")
            .field("batch", self.environment.batch_settings())
            .finish_non_exhaustive()
    }
}
