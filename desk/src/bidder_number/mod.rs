//! Bidder-number assignment.
//!
//! Operators type a number into a per-guest dialog. The number is checked
//! locally for range, then sent to the backend, which owns uniqueness: if
//! another guest of the event already holds it, the backend moves that guest
//! to a different number and reports who it was.
//!
//! [`BidderNumberAssigner`] performs one assignment. [`BidderNumberReducer`]
//! wraps it in the per-guest dialog state machine and raises notices.

pub mod actions;
pub mod assigner;
pub mod reducer;
pub mod types;

pub use actions::BidderNumberAction;
pub use assigner::BidderNumberAssigner;
pub use reducer::BidderNumberReducer;
pub use types::{
    ASSIGN_FAILED_MESSAGE, AssignError, AssignmentOutcome, AssignmentResult, AssignmentStatus,
    BidderNumberState,
};
