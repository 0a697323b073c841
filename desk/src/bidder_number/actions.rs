//! Actions for the bidder-number reducer.

use super::types::{AssignError, AssignmentResult};
use auction_desk_client::{EventId, GuestId};

/// Inputs of the bidder-number workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidderNumberAction {
    /// Operator submitted the dialog
    Submit {
        /// Event the guest attends
        event_id: EventId,
        /// Guest receiving the number
        guest_id: GuestId,
        /// Raw text from the number field
        input: String,
    },

    /// The assignment request finished
    Settled {
        /// Guest the request was for
        guest_id: GuestId,
        /// Outcome
        result: Result<AssignmentResult, AssignError>,
    },

    /// Operator closed the dialog
    Dismiss {
        /// Guest whose dialog closed
        guest_id: GuestId,
    },
}
