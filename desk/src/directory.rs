//! Cached attendee lists, dropped on invalidation.

use auction_desk_client::{ApiError, AttendeeApi, AttendeeRecord, EventId, ReadModel, ReadModelCache};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-event attendee list cache backed by the attendees endpoint.
///
/// The cache is never patched locally. Mutations invalidate it and the next
/// read refetches, so the backend stays the only source of truth.
pub struct AttendeeDirectory {
    api: Arc<dyn AttendeeApi>,
    cache: RwLock<HashMap<EventId, Vec<AttendeeRecord>>>,
}

impl AttendeeDirectory {
    /// Create an empty directory over `api`
    #[must_use]
    pub fn new(api: Arc<dyn AttendeeApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Attendees of `event_id`, fetched on first use or after invalidation
    ///
    /// # Errors
    ///
    /// Returns the client error if the list has to be fetched and the fetch fails.
    pub async fn attendees(&self, event_id: &EventId) -> Result<Vec<AttendeeRecord>, ApiError> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_id)
        {
            return Ok(cached.clone());
        }

        tracing::debug!(%event_id, "Fetching attendee list");
        let attendees = self.api.list_attendees(event_id).await?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event_id.clone(), attendees.clone());
        Ok(attendees)
    }

    /// Whether the list of `event_id` is currently cached
    #[must_use]
    pub fn is_cached(&self, event_id: &EventId) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(event_id)
    }
}

impl ReadModelCache for AttendeeDirectory {
    fn invalidate(&self, models: &[ReadModel]) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        for model in models {
            match model {
                ReadModel::Attendees(event_id) | ReadModel::BidderNumbers(event_id) => {
                    if cache.remove(event_id).is_some() {
                        tracing::debug!(%model, "Invalidated read model");
                    }
                },
                // Aggregates are computed server-side; nothing is held locally
                ReadModel::MealSummary(_) | ReadModel::Seating(_) => {
                    tracing::debug!(%model, "Invalidated read model");
                },
            }
        }
    }
}

impl std::fmt::Debug for AttendeeDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendeeDirectory").finish_non_exhaustive()
    }
}
