//! In-memory backend for workflow tests
//!
//! [`MockAttendeeApi`] behaves like the real backend where the workflows
//! care: it owns bidder-number uniqueness per event and performs the swap
//! itself, cancels attendees, and records every call. Individual targets can
//! be scripted to fail.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens after a test already panicked

use async_trait::async_trait;
use auction_desk_client::{
    ApiError, AssignBidderNumberResponse, AttendeeApi, AttendeeRecord, AttendeeStatus,
    AttendeeType, BidderNumber, CancelAttendeesPayload, EventId, GuestId, GuestUpsert, ReadModel,
    ReadModelCache, RegistrationId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Notify;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `POST /events/{event}/guests/{guest}/bidder-number`
    AssignBidderNumber {
        /// Event
        event_id: EventId,
        /// Guest
        guest_id: GuestId,
        /// Requested number
        number: BidderNumber,
    },
    /// `POST /registrations/{registration}/cancel`
    CancelRegistration {
        /// Registration
        registration_id: RegistrationId,
        /// Body
        payload: CancelAttendeesPayload,
    },
    /// `DELETE /guests/{guest}`
    CancelGuest {
        /// Guest
        guest_id: GuestId,
        /// Body
        payload: CancelAttendeesPayload,
    },
    /// `GET /events/{event}/attendees`
    ListAttendees {
        /// Event
        event_id: EventId,
    },
    /// `POST /events/{event}/guests`
    CreateGuest {
        /// Event
        event_id: EventId,
        /// Body
        guest: GuestUpsert,
    },
    /// `PATCH /guests/{guest}`
    UpdateGuest {
        /// Guest
        guest_id: GuestId,
        /// Body
        guest: GuestUpsert,
    },
    /// `GET /health`
    HealthCheck,
}

impl ApiCall {
    /// Whether this call cancels an attendee
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::CancelRegistration { .. } | Self::CancelGuest { .. })
    }
}

/// Scripted in-memory backend
#[derive(Debug, Default)]
pub struct MockAttendeeApi {
    attendees: RwLock<HashMap<EventId, Vec<AttendeeRecord>>>,
    /// Failures keyed by the id the request targets (guest, registration or email)
    failures: RwLock<HashMap<String, ApiError>>,
    calls: RwLock<Vec<ApiCall>>,
    unreachable: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl MockAttendeeApi {
    /// Empty backend where every call succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the attendees of an event
    #[must_use]
    pub fn with_attendees(self, event_id: &EventId, attendees: Vec<AttendeeRecord>) -> Self {
        self.attendees
            .write()
            .unwrap()
            .insert(event_id.clone(), attendees);
        self
    }

    /// Fail every request targeting `target` (guest id, registration id, or
    /// email for guest creation) with `error`
    #[must_use]
    pub fn failing(self, target: &str, error: ApiError) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(target.to_string(), error);
        self
    }

    /// Fail the health check, as if the backend were unreachable
    #[must_use]
    pub fn unreachable(self) -> Self {
        self.unreachable.store(true, Ordering::SeqCst);
        self
    }

    /// Park bidder-number assignments until `gate` is notified
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Every call received so far, in arrival order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Number of cancellation calls received so far
    #[must_use]
    pub fn cancellation_calls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| call.is_cancellation())
            .count()
    }

    /// Current attendee list of an event
    #[must_use]
    pub fn attendees(&self, event_id: &EventId) -> Vec<AttendeeRecord> {
        self.attendees
            .read()
            .unwrap()
            .get(event_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Bidder number currently held by a guest
    #[must_use]
    pub fn bidder_number_of(&self, event_id: &EventId, guest_id: &GuestId) -> Option<BidderNumber> {
        self.attendees(event_id)
            .into_iter()
            .find(|a| &a.id == guest_id)
            .and_then(|a| a.bidder_number)
    }

    fn record(&self, call: ApiCall) {
        self.calls.write().unwrap().push(call);
    }

    fn scripted_failure(&self, target: &str) -> Result<(), ApiError> {
        match self.failures.read().unwrap().get(target) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Backend {
            status: 404,
            message: Some(format!("{what} not found")),
        }
    }

    fn mark_cancelled(&self, matches: impl Fn(&AttendeeRecord) -> bool) -> bool {
        let mut events = self.attendees.write().unwrap();
        let mut found = false;
        for attendee in events.values_mut().flatten().filter(|a| matches(a)) {
            attendee.status = AttendeeStatus::Cancelled;
            found = true;
        }
        found
    }
}

#[async_trait]
impl AttendeeApi for MockAttendeeApi {
    async fn assign_bidder_number(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        number: BidderNumber,
    ) -> Result<AssignBidderNumberResponse, ApiError> {
        self.record(ApiCall::AssignBidderNumber {
            event_id: event_id.clone(),
            guest_id: guest_id.clone(),
            number,
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.scripted_failure(guest_id.as_str())?;

        let mut events = self.attendees.write().unwrap();
        let attendees = events
            .get_mut(event_id)
            .ok_or_else(|| Self::not_found("Event"))?;
        let guest_index = attendees
            .iter()
            .position(|a| &a.id == guest_id)
            .ok_or_else(|| Self::not_found("Guest"))?;

        let holder_index = attendees
            .iter()
            .position(|a| &a.id != guest_id && a.bidder_number == Some(number));

        // The previous holder moves to the lowest free number
        let previous_holder_id = if let Some(holder_index) = holder_index {
            let replacement = (BidderNumber::MIN..=BidderNumber::MAX)
                .filter_map(|n| BidderNumber::new(n).ok())
                .find(|candidate| {
                    *candidate != number
                        && attendees.iter().all(|a| a.bidder_number != Some(*candidate))
                })
                .ok_or(ApiError::Backend {
                    status: 409,
                    message: Some("No bidder numbers left".to_string()),
                })?;
            attendees[holder_index].bidder_number = Some(replacement);
            Some(attendees[holder_index].id.clone())
        } else {
            None
        };

        attendees[guest_index].bidder_number = Some(number);
        Ok(AssignBidderNumberResponse { previous_holder_id })
    }

    async fn cancel_registration(
        &self,
        registration_id: &RegistrationId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::CancelRegistration {
            registration_id: registration_id.clone(),
            payload: payload.clone(),
        });
        self.scripted_failure(registration_id.as_str())?;

        self.mark_cancelled(|a| a.registration_id.as_ref() == Some(registration_id));
        Ok(())
    }

    async fn cancel_guest(
        &self,
        guest_id: &GuestId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::CancelGuest {
            guest_id: guest_id.clone(),
            payload: payload.clone(),
        });
        self.scripted_failure(guest_id.as_str())?;

        self.mark_cancelled(|a| &a.id == guest_id);
        Ok(())
    }

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<AttendeeRecord>, ApiError> {
        self.record(ApiCall::ListAttendees {
            event_id: event_id.clone(),
        });
        self.scripted_failure(event_id.as_str())?;
        Ok(self.attendees(event_id))
    }

    async fn create_guest(&self, event_id: &EventId, guest: &GuestUpsert) -> Result<(), ApiError> {
        self.record(ApiCall::CreateGuest {
            event_id: event_id.clone(),
            guest: guest.clone(),
        });
        self.scripted_failure(&guest.email)?;

        let mut events = self.attendees.write().unwrap();
        let attendees = events.entry(event_id.clone()).or_default();
        let id = GuestId::new(format!("guest-{}", attendees.len() + 1));
        attendees.push(AttendeeRecord {
            id,
            attendee_type: AttendeeType::Guest,
            registration_id: None,
            status: AttendeeStatus::Confirmed,
            bidder_number: guest.bidder_number,
            name: Some(guest.name.clone()),
            email: Some(guest.email.clone()),
        });
        Ok(())
    }

    async fn update_guest(&self, guest_id: &GuestId, guest: &GuestUpsert) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateGuest {
            guest_id: guest_id.clone(),
            guest: guest.clone(),
        });
        self.scripted_failure(guest_id.as_str())?;

        let mut events = self.attendees.write().unwrap();
        let attendee = events
            .values_mut()
            .flatten()
            .find(|a| &a.id == guest_id)
            .ok_or_else(|| Self::not_found("Guest"))?;
        attendee.name = Some(guest.name.clone());
        attendee.email = Some(guest.email.clone());
        if guest.bidder_number.is_some() {
            attendee.bidder_number = guest.bidder_number;
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        self.record(ApiCall::HealthCheck);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ApiError::RequestFailed("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Read-model cache that records every invalidation
#[derive(Debug, Default)]
pub struct RecordingReadModelCache {
    invalidated: RwLock<Vec<ReadModel>>,
}

impl RecordingReadModelCache {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invalidated model, in order
    #[must_use]
    pub fn invalidated(&self) -> Vec<ReadModel> {
        self.invalidated.read().unwrap().clone()
    }

    /// Whether `model` was invalidated at least once
    #[must_use]
    pub fn was_invalidated(&self, model: &ReadModel) -> bool {
        self.invalidated.read().unwrap().contains(model)
    }
}

impl ReadModelCache for RecordingReadModelCache {
    fn invalidate(&self, models: &[ReadModel]) {
        self.invalidated.write().unwrap().extend_from_slice(models);
    }
}
