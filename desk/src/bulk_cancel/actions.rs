//! Actions for the bulk cancellation reducer.

use crate::batch::{BatchError, BatchResult};
use auction_desk_client::{AttendeeRecord, CancelAttendeesPayload, EventId, GuestId};

/// Inputs of the bulk cancellation workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkCancelAction {
    /// Tick an attendee's checkbox
    Select(AttendeeRecord),

    /// Untick an attendee's checkbox
    Deselect(GuestId),

    /// Tick every given attendee
    SelectAll(Vec<AttendeeRecord>),

    /// Untick everything
    ClearSelection,

    /// Operator confirmed the cancel dialog
    Submit {
        /// Event the selection belongs to
        event_id: EventId,
        /// Reason and notes attached to every cancellation
        payload: CancelAttendeesPayload,
    },

    /// The batch finished
    Settled {
        /// Aggregate outcome, or why nothing ran
        result: Result<BatchResult<GuestId>, BatchError>,
    },
}
