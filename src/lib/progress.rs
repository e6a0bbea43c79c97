//! Progress tracking utilities
//!
//! This module provides a thread-safe progress tracker for logging progress at regular intervals.
//! The tracker maintains an internal count and logs when interval boundaries are crossed.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// Maintains an internal count and logs progress messages when the count
/// crosses interval boundaries. Safe to use from multiple threads.
///
/// # Example
/// ```
/// use vartier_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed variants")
///     .with_interval(100);
///
/// for _ in 0..250 {
///     tracker.log_if_needed(1);  // Logs at 100, 200
/// }
/// tracker.log_final();  // Logs "Processed variants 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed (thread-safe).
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and a default interval of 1,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the logging interval.
    ///
    /// Progress will be logged each time the count crosses a multiple of
    /// this interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Add to the count and log if an interval boundary was crossed.
    ///
    /// Returns `true` if the final count is exactly a multiple of the
    /// interval, which `log_final` uses to avoid a duplicate line.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if additional == 0 {
            let count = self.count.load(Ordering::Relaxed);
            return count > 0 && count % self.interval == 0;
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        let prev_intervals = prev / self.interval;
        let new_intervals = new_count / self.interval;

        for i in (prev_intervals + 1)..=new_intervals {
            let milestone = i * self.interval;
            info!("{} {}", self.message, milestone);
        }

        new_count % self.interval == 0
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Log the final count if it is not exactly on an interval boundary.
    pub fn log_final(&self) {
        let count = self.count.load(Ordering::Relaxed);
        if count % self.interval != 0 {
            info!("{} {} (complete)", self.message, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let tracker = ProgressTracker::new("Items").with_interval(100);
        tracker.log_if_needed(50);
        tracker.log_if_needed(60);
        assert_eq!(tracker.count(), 110);
    }

    #[test]
    fn test_boundary_detection() {
        let tracker = ProgressTracker::new("Items").with_interval(100);
        assert!(!tracker.log_if_needed(50));
        assert!(!tracker.log_if_needed(60)); // 110, crossed but not on boundary
        assert!(tracker.log_if_needed(90)); // exactly 200
    }

    #[test]
    fn test_zero_additional_checks_current() {
        let tracker = ProgressTracker::new("Items").with_interval(100);
        assert!(!tracker.log_if_needed(0));
        tracker.log_if_needed(100);
        assert!(tracker.log_if_needed(0));
    }

    #[test]
    fn test_log_final_does_not_panic() {
        let tracker = ProgressTracker::new("Items").with_interval(100);
        tracker.log_if_needed(42);
        tracker.log_final();
    }
}
