//! The backend operations the desk workflows depend on

use crate::error::ApiError;
use crate::types::{
    AssignBidderNumberResponse, AttendeeRecord, BidderNumber, CancelAttendeesPayload, EventId,
    GuestId, GuestUpsert, RegistrationId,
};
use async_trait::async_trait;

/// Backend operations used by the assignment, cancellation and import workflows
///
/// Production uses [`crate::ApiClient`]; tests use the scripted mock from the
/// testing crate. Every method is exactly one network round trip.
#[async_trait]
pub trait AttendeeApi: Send + Sync {
    /// Assign `number` to `guest_id` within `event_id`.
    ///
    /// The backend detects collisions and performs the swap; a swap is
    /// reported through `previous_holder_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures or backend rejections.
    async fn assign_bidder_number(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        number: BidderNumber,
    ) -> Result<AssignBidderNumberResponse, ApiError>;

    /// Cancel a registrant through their registration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures or backend rejections.
    async fn cancel_registration(
        &self,
        registration_id: &RegistrationId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError>;

    /// Cancel (delete) a standalone guest.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures or backend rejections.
    async fn cancel_guest(
        &self,
        guest_id: &GuestId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError>;

    /// List every attendee of an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures, backend rejections or an
    /// unexpected response shape.
    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<AttendeeRecord>, ApiError>;

    /// Create a guest under an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures or backend rejections.
    async fn create_guest(&self, event_id: &EventId, guest: &GuestUpsert) -> Result<(), ApiError>;

    /// Update an existing guest.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for transport failures or backend rejections.
    async fn update_guest(&self, guest_id: &GuestId, guest: &GuestUpsert) -> Result<(), ApiError>;

    /// Check that the backend is reachable before dispatching a batch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the backend cannot be reached.
    async fn health_check(&self) -> Result<(), ApiError>;
}
