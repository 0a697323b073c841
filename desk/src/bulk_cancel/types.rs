//! Types for bulk cancellation.

use crate::batch::{BatchResult, BatchSummary};
use crate::notice::Notice;
use auction_desk_client::{AttendeeRecord, GuestId};

/// Where the current batch stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CancelStatus {
    /// No batch submitted yet
    #[default]
    Idle,
    /// A batch is in flight
    Cancelling {
        /// Distinct attendees being processed
        attempted: usize,
    },
    /// The batch finished; some items may have failed
    Completed(BatchSummary),
    /// The batch never ran
    Failed {
        /// Message shown to the operator
        message: String,
    },
}

impl CancelStatus {
    /// Whether a batch is in flight
    #[must_use]
    pub const fn is_cancelling(&self) -> bool {
        matches!(self, Self::Cancelling { .. })
    }
}

/// Selection and batch progress of the attendee list
#[derive(Debug, Clone, Default)]
pub struct BulkCancelState {
    selection: Vec<AttendeeRecord>,
    /// Current batch status
    pub status: CancelStatus,
    /// Per-item outcomes of the last finished batch
    pub last_result: Option<BatchResult<GuestId>>,
    /// Notices raised so far, oldest first
    pub notices: Vec<Notice>,
}

impl BulkCancelState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected attendees, in selection order
    #[must_use]
    pub fn selection(&self) -> &[AttendeeRecord] {
        &self.selection
    }

    /// Number of selected attendees
    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Whether `guest_id` is selected
    #[must_use]
    pub fn is_selected(&self, guest_id: &GuestId) -> bool {
        self.selection.iter().any(|a| &a.id == guest_id)
    }

    /// Most recent notice
    #[must_use]
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub(crate) fn select(&mut self, attendee: AttendeeRecord) {
        if !self.is_selected(&attendee.id) {
            self.selection.push(attendee);
        }
    }

    pub(crate) fn deselect(&mut self, guest_id: &GuestId) {
        self.selection.retain(|a| &a.id != guest_id);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

/// Operator-facing text for a finished batch
#[must_use]
pub fn summary_message(summary: &BatchSummary) -> String {
    match summary {
        BatchSummary::AllSucceeded { count } => {
            format!("Cancelled {count} {}", attendees(*count))
        },
        BatchSummary::PartialFailure {
            success_count,
            failure_count,
            sample_messages,
        } => {
            let total = success_count + failure_count;
            let mut message = format!(
                "Cancelled {success_count} of {total} {}. {failure_count} failed",
                attendees(total)
            );
            if !sample_messages.is_empty() {
                message.push_str(": ");
                message.push_str(&sample_messages.join("; "));
            }
            message
        },
    }
}

const fn attendees(count: usize) -> &'static str {
    if count == 1 { "attendee" } else { "attendees" }
}
