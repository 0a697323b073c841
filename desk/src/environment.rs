//! Environment shared by the desk reducers.

use crate::batch::BatchSettings;
use crate::bidder_number::BidderNumberAssigner;
use crate::bulk_cancel::BulkAttendeeCanceller;
use crate::import::AttendeeImporter;
use auction_desk_client::{AttendeeApi, ReadModelCache};
use auction_desk_core::environment::Clock;
use std::sync::Arc;

/// Dependencies the desk reducers need.
///
/// Production wires the reqwest client and the attendee directory; tests
/// wire `MockAttendeeApi`, `RecordingReadModelCache` and `FixedClock`.
pub trait DeskEnvironment: Send + Sync {
    /// Clock for notice timestamps
    fn clock(&self) -> &dyn Clock;

    /// Single bidder-number assignment orchestrator
    fn assigner(&self) -> BidderNumberAssigner;

    /// Bulk cancellation orchestrator
    fn canceller(&self) -> BulkAttendeeCanceller;

    /// Import commit orchestrator
    fn importer(&self) -> AttendeeImporter;
}

/// Production environment for the desk reducers.
#[derive(Clone)]
pub struct ProductionDeskEnvironment {
    api: Arc<dyn AttendeeApi>,
    read_models: Arc<dyn ReadModelCache>,
    clock: Arc<dyn Clock>,
    batch: BatchSettings,
}

impl ProductionDeskEnvironment {
    /// Create a new production environment.
    #[must_use]
    pub fn new(
        api: Arc<dyn AttendeeApi>,
        read_models: Arc<dyn ReadModelCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            read_models,
            clock,
            batch: BatchSettings::default(),
        }
    }

    /// Override batch settings
    #[must_use]
    pub const fn with_batch_settings(mut self, batch: BatchSettings) -> Self {
        self.batch = batch;
        self
    }

    /// Batch settings in effect
    #[must_use]
    pub const fn batch_settings(&self) -> &BatchSettings {
        &self.batch
    }
}

impl DeskEnvironment for ProductionDeskEnvironment {
    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn assigner(&self) -> BidderNumberAssigner {
        BidderNumberAssigner::new(Arc::clone(&self.api), Arc::clone(&self.read_models))
    }

    fn canceller(&self) -> BulkAttendeeCanceller {
        BulkAttendeeCanceller::new(Arc::clone(&self.api), Arc::clone(&self.read_models))
            .with_settings(self.batch)
    }

    fn importer(&self) -> AttendeeImporter {
        AttendeeImporter::new(Arc::clone(&self.api), Arc::clone(&self.read_models))
            .with_settings(self.batch)
    }
}
