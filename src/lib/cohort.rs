//! Cross-sample cohort statistics for a variant identity.
//!
//! Given every historical observation of one [`VariantIdentity`], the
//! aggregator computes the summary statistics attached to each report row:
//! cohort and run-scoped allele-fraction medians, population standard
//! deviation, percentile rank of the subject observation, occurrence counts,
//! and per-caller detection tallies. Aggregates are computed fresh on every
//! report run and never persisted.

use serde::{Deserialize, Serialize};

use crate::stats::{median, percentile_of_score, population_std_dev};
use crate::variant::{Caller, VariantObservation};

/// Per-caller detection counts over the fixed caller vocabulary.
///
/// The key space is enumerated up front, so tallying cannot grow unbounded
/// keys and iteration order is always vocabulary order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerCounts {
    counts: [u64; Caller::COUNT],
}

impl CallerCounts {
    /// An accumulator with all counts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for one caller.
    pub fn increment(&mut self, caller: Caller) {
        self.counts[caller.index()] += 1;
    }

    /// Increments the count for every caller in `callers`.
    pub fn record_all(&mut self, callers: &[Caller]) {
        for &caller in callers {
            self.increment(caller);
        }
    }

    /// The count for one caller.
    #[must_use]
    pub fn get(&self, caller: Caller) -> u64 {
        self.counts[caller.index()]
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// (caller, count) pairs in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (Caller, u64)> + '_ {
        Caller::VOCABULARY.iter().map(|&c| (c, self.get(c)))
    }

    /// `caller: count` pairs for callers seen at least once, joined with
    /// commas in vocabulary order (the report's "Caller Counts" field).
    #[must_use]
    pub fn summary(&self) -> String {
        self.iter()
            .filter(|(_, n)| *n > 0)
            .map(|(c, n)| format!("{c}: {n}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Summary statistics for one variant identity across the cohort.
///
/// Statistics are `None` when the observation set was empty (insufficient
/// data); counts are still well-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortAggregate {
    /// Number of cohort observations of this identity
    pub observation_count: usize,
    /// Number of observations within the current run
    pub times_seen_in_run: usize,
    /// Median allele fraction across the cohort
    pub vaf_median: Option<f64>,
    /// Population standard deviation of cohort allele fractions
    pub vaf_std_dev: Option<f64>,
    /// Median allele fraction within the current run
    pub run_vaf_median: Option<f64>,
    /// Percentile rank of the subject observation's allele fraction within
    /// the cohort (mean method)
    pub percentile_rank: Option<f64>,
    /// Libraries in the current run that also carry this identity
    pub matching_libraries_in_run: Vec<String>,
    /// Per-caller detection counts across the whole cohort
    pub caller_counts: CallerCounts,
}

impl CohortAggregate {
    /// The explicit marker for an empty observation set: all statistics
    /// absent, all counts zero.
    #[must_use]
    pub fn insufficient_data() -> Self {
        Self {
            observation_count: 0,
            times_seen_in_run: 0,
            vaf_median: None,
            vaf_std_dev: None,
            run_vaf_median: None,
            percentile_rank: None,
            matching_libraries_in_run: Vec::new(),
            caller_counts: CallerCounts::new(),
        }
    }

    /// True if the cohort statistics are defined.
    #[must_use]
    pub fn has_statistics(&self) -> bool {
        self.vaf_median.is_some()
    }
}

/// Computes cohort statistics for `subject` from every historical
/// observation sharing its identity.
///
/// `cohort` is the full retrieved observation set (the subject itself is
/// expected to be a member). An empty set yields
/// [`CohortAggregate::insufficient_data`] rather than a numeric error.
#[must_use]
pub fn aggregate(cohort: &[VariantObservation], subject: &VariantObservation) -> CohortAggregate {
    if cohort.is_empty() {
        return CohortAggregate::insufficient_data();
    }

    let mut vafs = Vec::with_capacity(cohort.len());
    let mut run_vafs = Vec::new();
    let mut matching_libraries = Vec::new();
    let mut caller_counts = CallerCounts::new();

    for obs in cohort {
        vafs.push(obs.max_som_aaf);
        if obs.run_id == subject.run_id {
            run_vafs.push(obs.max_som_aaf);
            matching_libraries.push(obs.library.clone());
        }
        caller_counts.record_all(&obs.callers);
    }

    CohortAggregate {
        observation_count: vafs.len(),
        times_seen_in_run: run_vafs.len(),
        vaf_median: median(&vafs),
        vaf_std_dev: population_std_dev(&vafs),
        run_vaf_median: median(&run_vafs),
        percentile_rank: percentile_of_score(&vafs, subject.max_som_aaf),
        matching_libraries_in_run: matching_libraries,
        caller_counts,
    }
}
