//! Settle-all fan-out shared by bulk cancellation and import.
//!
//! Every item runs to completion regardless of how the others end. Results
//! are stored in input order, so the aggregate never depends on which
//! request finished first.

use auction_desk_client::ApiError;
use futures::StreamExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Distinct failure messages kept in a batch summary
pub const MAX_SAMPLE_MESSAGES: usize = 3;

/// Default cap on concurrent requests within one batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Why a batch did not run at all
///
/// Per-item failures are not batch errors; they are reported through
/// [`BatchSummary::PartialFailure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Nothing to do; no request was sent
    #[error("No attendees selected")]
    EmptySelection,

    /// The reachability probe failed; no item was attempted
    #[error("Unable to reach the server, nothing was changed: {}", .0.user_message())]
    TotalNetworkFailure(#[source] ApiError),
}

/// How a batch dispatches its requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Concurrent requests in flight per batch; `0` means unbounded
    pub max_concurrency: usize,
    /// Probe backend health before dispatching anything
    pub preflight: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            preflight: false,
        }
    }
}

impl BatchSettings {
    fn limit_for(&self, items: usize) -> usize {
        if self.max_concurrency == 0 {
            items.max(1)
        } else {
            self.max_concurrency
        }
    }
}

/// Outcome of one item of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    /// The request succeeded
    Succeeded,
    /// Nothing needed doing (already cancelled, unchanged row); counts as success
    Skipped,
    /// The request failed with this message
    Failed(String),
}

impl ItemOutcome {
    /// Whether the item counts towards the success total
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// One keyed item result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult<K> {
    /// Which item (attendee id, import line)
    pub key: K,
    /// What happened to it
    pub outcome: ItemOutcome,
}

/// Every item outcome of one batch, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult<K> {
    items: Vec<ItemResult<K>>,
}

impl<K> BatchResult<K> {
    /// Build from already ordered results
    #[must_use]
    pub const fn from_items(items: Vec<ItemResult<K>>) -> Self {
        Self { items }
    }

    /// All item results
    #[must_use]
    pub fn items(&self) -> &[ItemResult<K>] {
        &self.items
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch had no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that succeeded, including skipped ones
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    /// Items that needed no request
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == ItemOutcome::Skipped)
            .count()
    }

    /// Items that failed
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    /// Failed items with their messages
    pub fn failures(&self) -> impl Iterator<Item = (&K, &str)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Failed(message) => Some((&item.key, message.as_str())),
            _ => None,
        })
    }

    /// Up to [`MAX_SAMPLE_MESSAGES`] distinct failure messages, first seen first
    #[must_use]
    pub fn sample_messages(&self) -> Vec<String> {
        let mut samples: Vec<String> = Vec::new();
        for (_, message) in self.failures() {
            if samples.len() == MAX_SAMPLE_MESSAGES {
                break;
            }
            if !samples.iter().any(|seen| seen == message) {
                samples.push(message.to_string());
            }
        }
        samples
    }

    /// Aggregate view for reporting
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        let failure_count = self.failure_count();
        if failure_count == 0 {
            BatchSummary::AllSucceeded {
                count: self.items.len(),
            }
        } else {
            BatchSummary::PartialFailure {
                success_count: self.success_count(),
                failure_count,
                sample_messages: self.sample_messages(),
            }
        }
    }
}

/// Aggregate outcome of a batch
///
/// A partial failure is a normal outcome: the successful subset stays
/// committed and is never rolled back or retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchSummary {
    /// Every item succeeded
    AllSucceeded {
        /// Items processed
        count: usize,
    },
    /// Some items failed
    PartialFailure {
        /// Items that succeeded
        success_count: usize,
        /// Items that failed
        failure_count: usize,
        /// Distinct failure messages, at most [`MAX_SAMPLE_MESSAGES`]
        sample_messages: Vec<String>,
    },
}

impl BatchSummary {
    /// Whether every item succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::AllSucceeded { .. })
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllSucceeded { count } => write!(f, "{count} succeeded"),
            Self::PartialFailure {
                success_count,
                failure_count,
                sample_messages,
            } => {
                write!(f, "{success_count} succeeded, {failure_count} failed")?;
                if !sample_messages.is_empty() {
                    write!(f, ": {}", sample_messages.join("; "))?;
                }
                Ok(())
            },
        }
    }
}

/// Run every item future, at most `settings.max_concurrency` at a time, and
/// collect every outcome. Never stops early.
pub async fn settle_all<'a, K>(
    items: Vec<(K, BoxFuture<'a, ItemOutcome>)>,
    settings: &BatchSettings,
) -> BatchResult<K>
where
    K: Send + 'a,
{
    let limit = settings.limit_for(items.len());

    let pending: Vec<BoxFuture<'a, (usize, ItemResult<K>)>> =
        items.into_iter().enumerate().map(run_item).collect();

    let mut settled: Vec<(usize, ItemResult<K>)> = futures::stream::iter(pending)
        .buffer_unordered(limit)
        .collect()
        .await;

    settled.sort_unstable_by_key(|(index, _)| *index);
    BatchResult::from_items(settled.into_iter().map(|(_, item)| item).collect())
}

fn run_item<'a, K>(
    (index, (key, fut)): (usize, (K, BoxFuture<'a, ItemOutcome>)),
) -> BoxFuture<'a, (usize, ItemResult<K>)>
where
    K: Send + 'a,
{
    Box::pin(async move {
        let outcome = fut.await;
        (index, ItemResult { key, outcome })
    })
}
