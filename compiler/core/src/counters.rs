//! Telemetry counters.
//!
//! Phases record distribution samples (block counts, argument list
//! sizes) through [`Counters::histogram_inc`]. Samples are observation
//! points only; embedded builds may hand phases a sink they never read.

use rustc_hash::FxHashMap;
use std::sync::Mutex;

/// A histogram of sampled values: value -> occurrence count.
pub type Histogram = FxHashMap<usize, u64>;

/// A thread-safe sink for histogram samples.
#[derive(Debug, Default)]
pub struct Counters {
    histograms: Mutex<FxHashMap<&'static str, Histogram>>,
}

impl Counters {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `value` under `name`.
    pub fn histogram_inc(&self, name: &'static str, value: usize) {
        let mut histograms = self.histograms.lock().unwrap();
        *histograms.entry(name).or_default().entry(value).or_insert(0) += 1;
    }

    /// Returns a copy of the named histogram, if any samples exist.
    pub fn histogram(&self, name: &'static str) -> Option<Histogram> {
        self.histograms.lock().unwrap().get(name).cloned()
    }

    /// Returns the total number of samples recorded under `name`.
    pub fn sample_count(&self, name: &'static str) -> u64 {
        self.histogram(name)
            .map(|h| h.values().sum())
            .unwrap_or(0)
    }
}
