//! Attendee record builders for tests

#![allow(clippy::expect_used)] // Fixtures take literal, known-valid numbers

use auction_desk_client::{
    AttendeeRecord, AttendeeStatus, AttendeeType, BidderNumber, GuestId, RegistrationId,
};

/// A confirmed guest with no number, name or email
#[must_use]
pub fn guest(id: &str) -> AttendeeRecord {
    AttendeeRecord {
        id: GuestId::new(id),
        attendee_type: AttendeeType::Guest,
        registration_id: None,
        status: AttendeeStatus::Confirmed,
        bidder_number: None,
        name: None,
        email: None,
    }
}

/// A confirmed registrant owning `registration_id`
#[must_use]
pub fn registrant(id: &str, registration_id: &str) -> AttendeeRecord {
    AttendeeRecord {
        attendee_type: AttendeeType::Registrant,
        registration_id: Some(RegistrationId::new(registration_id)),
        ..guest(id)
    }
}

/// Chainable tweaks on a fixture record
pub trait AttendeeRecordExt {
    /// Set the bidder number
    ///
    /// # Panics
    ///
    /// Panics if `number` is outside 100 to 999.
    #[must_use]
    fn with_number(self, number: u16) -> Self;

    /// Set name and email
    #[must_use]
    fn named(self, name: &str, email: &str) -> Self;

    /// Set the status
    #[must_use]
    fn with_status(self, status: AttendeeStatus) -> Self;

    /// Mark as cancelled
    #[must_use]
    fn cancelled(self) -> Self;
}

impl AttendeeRecordExt for AttendeeRecord {
    fn with_number(mut self, number: u16) -> Self {
        self.bidder_number =
            Some(BidderNumber::new(number).expect("fixture bidder number must be in range"));
        self
    }

    fn named(mut self, name: &str, email: &str) -> Self {
        self.name = Some(name.to_string());
        self.email = Some(email.to_string());
        self
    }

    fn with_status(mut self, status: AttendeeStatus) -> Self {
        self.status = status;
        self
    }

    fn cancelled(self) -> Self {
        self.with_status(AttendeeStatus::Cancelled)
    }
}
