//! Types for bidder-number assignment.

use auction_desk_client::{ApiError, BidderNumber, BidderNumberError, EventId, GuestId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::notice::Notice;

/// Shown when the backend rejects an assignment without saying why
pub const ASSIGN_FAILED_MESSAGE: &str = "Failed to assign bidder number";

/// How the backend applied an accepted assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOutcome {
    /// The number was free
    Assigned,
    /// The number was held; its previous holder got a different one
    Swapped {
        /// Guest that held the number before
        previous_holder_id: GuestId,
    },
}

/// An accepted assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// Event the number belongs to
    pub event_id: EventId,
    /// Guest that now holds the number
    pub guest_id: GuestId,
    /// The number
    pub number: BidderNumber,
    /// Direct or swap
    pub outcome: AssignmentOutcome,
}

impl AssignmentResult {
    /// Whether another guest lost this number
    #[must_use]
    pub const fn is_swap(&self) -> bool {
        matches!(self.outcome, AssignmentOutcome::Swapped { .. })
    }

    /// Operator-facing text for this result
    #[must_use]
    pub fn message(&self) -> String {
        match &self.outcome {
            AssignmentOutcome::Assigned => format!("Bidder number {} assigned", self.number),
            AssignmentOutcome::Swapped { previous_holder_id } => format!(
                "Bidder number {} assigned. It was held by {previous_holder_id}, who has been given a different number",
                self.number
            ),
        }
    }
}

/// Why an assignment did not happen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    /// Input rejected locally; no request was sent
    #[error(transparent)]
    Validation(#[from] BidderNumberError),

    /// The backend rejected the request or could not be reached
    #[error("{message}")]
    Transport {
        /// Backend message, or the generic fallback
        message: String,
        /// Underlying client error
        #[source]
        source: ApiError,
    },
}

impl AssignError {
    /// Wrap a client error, surfacing the backend's message verbatim
    #[must_use]
    pub fn from_api(source: ApiError) -> Self {
        let message = source
            .backend_message()
            .unwrap_or(ASSIGN_FAILED_MESSAGE)
            .to_string();
        Self::Transport { message, source }
    }

    /// Whether no request was made
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Per-guest assignment state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssignmentStatus {
    /// No dialog activity
    #[default]
    Idle,
    /// A request is in flight
    Submitting {
        /// Number being requested
        number: BidderNumber,
    },
    /// The backend accepted the assignment
    Succeeded(AssignmentResult),
    /// Validation or backend failure; the dialog stays open
    Failed {
        /// Message shown to the operator
        message: String,
    },
}

impl AssignmentStatus {
    /// Whether a request is outstanding
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Whether the last attempt failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// State of the bidder-number workflow for one desk session
#[derive(Debug, Clone, Default)]
pub struct BidderNumberState {
    statuses: HashMap<GuestId, AssignmentStatus>,
    /// Notices raised so far, oldest first
    pub notices: Vec<Notice>,
}

impl BidderNumberState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a guest; `Idle` when never touched
    #[must_use]
    pub fn status(&self, guest_id: &GuestId) -> AssignmentStatus {
        self.statuses.get(guest_id).cloned().unwrap_or_default()
    }

    /// Number of guests with a request in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.statuses.values().filter(|s| s.is_submitting()).count()
    }

    /// Most recent notice
    #[must_use]
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub(crate) fn set_status(&mut self, guest_id: GuestId, status: AssignmentStatus) {
        if status == AssignmentStatus::Idle {
            self.statuses.remove(&guest_id);
        } else {
            self.statuses.insert(guest_id, status);
        }
    }
}
