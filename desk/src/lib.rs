//! # Auction Desk
//!
//! Front-desk workflows for auction events, built on the reducer/effect
//! architecture of `auction-desk-core` and the `Store` of
//! `auction-desk-runtime`:
//!
//! - [`bidder_number`]: assign a three-digit bidder number to a guest. The
//!   backend owns uniqueness and swaps numbers that are already held.
//! - [`bulk_cancel`]: cancel a selection of registrants and guests with one
//!   independent request each, reporting partial failures.
//! - [`import`]: reconcile a guest list file with the event's attendees and
//!   apply the differences.
//!
//! Every mutation is followed by invalidation of the read models it affects;
//! nothing is patched optimistically.
//!
//! ## Example
//!
//! ```ignore
//! use auction_desk::{DeskApp, DeskConfig};
//!
//! let app = DeskApp::new(DeskConfig::from_env())?;
//! let report = app
//!     .assign(&EventId::new("gala-2025"), &GuestId::new("guest-17"), "150")
//!     .await?;
//! for notice in &report.notices {
//!     println!("{notice}");
//! }
//! ```

pub mod app;
pub mod batch;
pub mod bidder_number;
pub mod bulk_cancel;
pub mod cli;
pub mod config;
pub mod directory;
pub mod environment;
pub mod import;
pub mod notice;

pub use app::{CommandReport, DeskApp, DeskError};
pub use batch::{
    BatchError, BatchResult, BatchSettings, BatchSummary, ItemOutcome, ItemResult,
    MAX_SAMPLE_MESSAGES,
};
pub use bidder_number::{
    AssignError, AssignmentOutcome, AssignmentResult, BidderNumberAssigner,
};
pub use bulk_cancel::BulkAttendeeCanceller;
pub use config::{ConfigError, DeskConfig};
pub use directory::AttendeeDirectory;
pub use environment::{DeskEnvironment, ProductionDeskEnvironment};
pub use import::{AttendeeImporter, ImportError, ImportPlan, ImportRow, plan_import};
pub use notice::{Notice, NoticeLevel};
