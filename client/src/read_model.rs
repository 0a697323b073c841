//! Read models the workflows invalidate after a mutation

use crate::types::EventId;
use std::fmt;

/// A backend-derived view that may be stale after a mutation
///
/// The desk never patches these locally; it invalidates them and the next
/// reader refetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadModel {
    /// Attendee list of an event
    Attendees(EventId),
    /// Bidder-number board of an event
    BidderNumbers(EventId),
    /// Meal-choice aggregates of an event
    MealSummary(EventId),
    /// Seating/table aggregates of an event
    Seating(EventId),
}

impl ReadModel {
    /// Event the read model belongs to
    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        match self {
            Self::Attendees(id)
            | Self::BidderNumbers(id)
            | Self::MealSummary(id)
            | Self::Seating(id) => id,
        }
    }

    /// Models affected by a bidder-number change
    #[must_use]
    pub fn after_bidder_number_change(event_id: &EventId) -> Vec<Self> {
        vec![
            Self::Attendees(event_id.clone()),
            Self::BidderNumbers(event_id.clone()),
        ]
    }

    /// Models affected by cancelling attendees
    #[must_use]
    pub fn after_cancellation(event_id: &EventId) -> Vec<Self> {
        vec![
            Self::Attendees(event_id.clone()),
            Self::MealSummary(event_id.clone()),
            Self::Seating(event_id.clone()),
        ]
    }
}

impl fmt::Display for ReadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attendees(id) => write!(f, "attendees:{id}"),
            Self::BidderNumbers(id) => write!(f, "bidder-numbers:{id}"),
            Self::MealSummary(id) => write!(f, "meal-summary:{id}"),
            Self::Seating(id) => write!(f, "seating:{id}"),
        }
    }
}

/// Sink for read-model invalidations
pub trait ReadModelCache: Send + Sync {
    /// Mark the given models stale
    fn invalidate(&self, models: &[ReadModel]);
}
