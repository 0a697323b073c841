//! # Auction Backend Client
//!
//! Rust client library for the auction management REST backend: bidder-number
//! assignment, registrant and guest cancellation, and guest listing/upserts.
//!
//! ## Example
//!
//! ```no_run
//! use auction_desk_client::{ApiClient, AttendeeApi, ClientConfig};
//! use auction_desk_client::types::{BidderNumber, EventId, GuestId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("http://localhost:8080/api"))?;
//!
//!     let response = client
//!         .assign_bidder_number(
//!             &EventId::new("gala-2025"),
//!             &GuestId::new("guest-17"),
//!             BidderNumber::new(150)?,
//!         )
//!         .await?;
//!
//!     println!("Previous holder: {:?}", response.previous_holder_id);
//!     Ok(())
//! }
//! ```
//!
//! The [`AttendeeApi`] trait is the seam the orchestration layer depends on;
//! [`ApiClient`] is its reqwest implementation.

pub mod api;
pub mod client;
pub mod error;
pub mod read_model;
pub mod types;

// Re-export main types for convenience
pub use api::AttendeeApi;
pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;
pub use read_model::{ReadModel, ReadModelCache};
pub use types::{
    AssignBidderNumberResponse, AttendeeRecord, AttendeeStatus, AttendeeType, BidderNumber,
    BidderNumberError, CancelAttendeesPayload, EventId, GuestId, GuestUpsert, RegistrationId,
};
