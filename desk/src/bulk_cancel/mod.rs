//! Bulk attendee cancellation.
//!
//! Operators tick attendees in the event's attendee list and cancel them in
//! one go. Registrants are cancelled through their registration, guests
//! directly. Every request runs to completion independently; the outcome is
//! reported as a whole, or as a partial failure listing a few distinct
//! reasons. Successful cancellations are never rolled back.

pub mod actions;
pub mod canceller;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;

pub use actions::BulkCancelAction;
pub use canceller::BulkAttendeeCanceller;
pub use reducer::BulkCancelReducer;
pub use types::{BulkCancelState, CancelStatus, summary_message};
