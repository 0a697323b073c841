//! In-memory `metrics` recorder
//!
//! Install it for a closure with [`metrics::with_local_recorder`] and read
//! counter totals back by name and labels.

#![allow(clippy::unwrap_used)] // Lock poisoning only happens after a test already panicked
#![allow(clippy::missing_panics_doc)]

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Keeps every counter in memory; gauges and histograms are discarded
#[derive(Debug, Default)]
pub struct CountingRecorder {
    counters: RwLock<HashMap<Key, Arc<AtomicU64>>>,
}

impl CountingRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total of counter `name` over every series carrying all of `labels`
    #[must_use]
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.counters
            .read()
            .unwrap()
            .iter()
            .filter(|(key, _)| {
                key.name() == name
                    && labels.iter().all(|(label, value)| {
                        key.labels()
                            .any(|l| l.key() == *label && l.value() == *value)
                    })
            })
            .map(|(_, total)| total.load(Ordering::SeqCst))
            .sum()
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        let total = Arc::clone(self.counters.write().unwrap().entry(key.clone()).or_default());
        Counter::from_arc(total)
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_name_and_label() {
        let recorder = CountingRecorder::new();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("attendees.cancel", "result" => "failed").increment(2);
            metrics::counter!("attendees.cancel", "result" => "succeeded").increment(3);
            metrics::counter!("attendees.cancel", "result" => "failed").increment(1);
        });

        assert_eq!(recorder.counter("attendees.cancel", &[("result", "failed")]), 3);
        assert_eq!(recorder.counter("attendees.cancel", &[]), 6);
        assert_eq!(recorder.counter("attendees.import", &[]), 0);
    }
}
