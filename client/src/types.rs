//! Wire and read-model types for the auction backend

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id! {
    /// Identifier of an auction event; the scope of bidder-number uniqueness.
    EventId
}

string_id! {
    /// Identifier of an attendee as exposed by the guests API.
    ///
    /// Registrants and the guests added under them share this id space.
    GuestId
}

string_id! {
    /// Identifier of a registration (the ticket purchase a registrant owns).
    RegistrationId
}

/// Message shown for any unusable bidder number input.
pub const BIDDER_NUMBER_RANGE_MESSAGE: &str = "Bidder number must be between 100 and 999";

/// Rejected bidder number input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BidderNumberError {
    /// Input was not an integer
    #[error("Bidder number must be between 100 and 999")]
    NotANumber(String),

    /// Integer outside [100, 999]
    #[error("Bidder number must be between 100 and 999")]
    OutOfRange(i64),
}

/// A three-digit bidder number, 100 to 999 inclusive.
///
/// The only constructors validate, so holding a `BidderNumber` means the
/// range check already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BidderNumber(u16);

impl BidderNumber {
    /// Smallest assignable bidder number
    pub const MIN: u16 = 100;
    /// Largest assignable bidder number
    pub const MAX: u16 = 999;

    /// Validate a numeric bidder number.
    ///
    /// # Errors
    ///
    /// Returns [`BidderNumberError::OutOfRange`] outside `[100, 999]`.
    pub fn new(value: u16) -> Result<Self, BidderNumberError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BidderNumberError::OutOfRange(i64::from(value)))
        }
    }

    /// Parse user-supplied text, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`BidderNumberError::NotANumber`] for non-integer text and
    /// [`BidderNumberError::OutOfRange`] for integers outside `[100, 999]`.
    pub fn parse(input: &str) -> Result<Self, BidderNumberError> {
        let trimmed = input.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| BidderNumberError::NotANumber(trimmed.to_string()))?;

        u16::try_from(value)
            .map_err(|_| BidderNumberError::OutOfRange(value))
            .and_then(Self::new)
    }

    /// The numeric value
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for BidderNumber {
    type Error = BidderNumberError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BidderNumber> for u16 {
    fn from(number: BidderNumber) -> Self {
        number.0
    }
}

impl fmt::Display for BidderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which backend operation cancels an attendee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeType {
    /// Primary ticket holder; cancelled through their registration
    Registrant,
    /// Guest added under a registrant or invited independently
    Guest,
}

/// Attendance status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendeeStatus {
    /// Registration confirmed
    Confirmed,
    /// Awaiting confirmation or payment
    Pending,
    /// Arrived at the event
    CheckedIn,
    /// Cancelled (the backend spells this both `cancelled` and `canceled`)
    Cancelled,
    /// Any status this client does not know about
    Other(String),
}

impl AttendeeStatus {
    /// Whether the attendee is already cancelled
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Canonical wire spelling
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::CheckedIn => "checked_in",
            Self::Cancelled => "cancelled",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for AttendeeStatus {
    fn from(status: String) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "pending" => Self::Pending,
            "checked_in" | "checked-in" => Self::CheckedIn,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(status),
        }
    }
}

impl From<AttendeeStatus> for String {
    fn from(status: AttendeeStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One attendee row from the backend read model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRecord {
    /// Attendee identifier
    pub id: GuestId,
    /// Registrant or guest
    pub attendee_type: AttendeeType,
    /// Present only for registrants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<RegistrationId>,
    /// Current status
    pub status: AttendeeStatus,
    /// Assigned bidder number, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder_number: Option<BidderNumber>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Reason/notes attached to every cancellation in a batch
///
/// Sent verbatim as the request body of each cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAttendeesPayload {
    /// Why the attendees are being cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Free-form staff notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of the bidder-number assignment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignBidderNumberRequest {
    /// Requested number
    pub number: BidderNumber,
}

/// Response of the bidder-number assignment endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignBidderNumberResponse {
    /// Guest who held the number before; present only when a swap happened
    #[serde(default)]
    pub previous_holder_id: Option<GuestId>,
}

impl AssignBidderNumberResponse {
    /// The previous holder, treating an empty id as absent
    #[must_use]
    pub fn previous_holder(&self) -> Option<&GuestId> {
        self.previous_holder_id
            .as_ref()
            .filter(|id| !id.as_str().is_empty())
    }
}

/// Body for creating or updating a guest during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestUpsert {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Requested bidder number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder_number: Option<BidderNumber>,
}
