//! # Auction Desk Testing
//!
//! Testing utilities for the auction desk workflows.
//!
//! This crate provides:
//! - [`FixedClock`] / [`test_clock`] for deterministic timestamps
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`MockAttendeeApi`], an in-memory backend that enforces bidder-number
//!   uniqueness, performs swaps, and can be scripted to fail per target
//! - [`RecordingReadModelCache`], which records invalidations
//! - [`fixtures`] for building attendee records
//! - [`CountingRecorder`], an in-memory `metrics` recorder
//!
//! ## Example
//!
//! ```ignore
//! use auction_desk_testing::{MockAttendeeApi, RecordingReadModelCache};
//!
//! let api = Arc::new(MockAttendeeApi::new().with_attendees(&event_id, attendees));
//! let cache = Arc::new(RecordingReadModelCache::new());
//! let canceller = BulkAttendeeCanceller::new(api.clone(), cache.clone());
//!
//! let result = canceller.cancel_all(&event_id, &selection, &payload).await?;
//! assert_eq!(api.cancellation_calls(), 3);
//! ```

use auction_desk_core::environment::Clock;
use chrono::{DateTime, Utc};

pub mod api_mocks;
pub mod fixtures;
pub mod metrics_recorder;

/// Clocks for the desk environment
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Clock pinned to one instant, so notice timestamps are reproducible
    ///
    /// ```
    /// use auction_desk_testing::mocks::FixedClock;
    /// use auction_desk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(DateTime<Utc>);

    impl FixedClock {
        /// Pin the clock to `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self(time)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Doors-open time of the test gala, 2025-05-17 18:30 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::from_timestamp(1_747_506_600, 0).unwrap_or_default(),
        )
    }
}

// Re-export commonly used items
pub use api_mocks::{ApiCall, MockAttendeeApi, RecordingReadModelCache};
pub use fixtures::{AttendeeRecordExt, guest, registrant};
pub use metrics_recorder::CountingRecorder;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
