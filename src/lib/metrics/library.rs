//! Metrics for one sample-library reporting unit.
//!
//! These tallies are diagnostic output only; they have no effect on
//! classification.

use serde::{Deserialize, Serialize};

use super::Metric;
use crate::tier::{Tier, TierAssignment, TierCall};

/// Per-library report tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryReportMetrics {
    /// Sample identifier
    pub sample: String,

    /// Sequencing library identifier
    pub library: String,

    /// Sequencing run identifier
    pub run_id: String,

    /// Variants retrieved from the store for this unit
    pub variants_retrieved: u64,

    /// Variants iterated (retrieved rows actually examined)
    pub variants_iterated: u64,

    /// Variants excluded as off-target
    pub off_target: u64,

    /// Tier 1 variants passing quality thresholds
    pub tier1_pass: u64,

    /// Tier 1 variants failing quality thresholds
    pub tier1_fail: u64,

    /// Tier 3 variants passing quality thresholds
    pub tier3_pass: u64,

    /// Tier 3 variants failing quality thresholds
    pub tier3_fail: u64,

    /// Tier 4 variants passing quality thresholds
    pub tier4_pass: u64,

    /// Tier 4 variants failing quality thresholds
    pub tier4_fail: u64,
}

impl LibraryReportMetrics {
    /// Creates empty tallies for one unit.
    #[must_use]
    pub fn new(sample: &str, library: &str, run_id: &str) -> Self {
        Self {
            sample: sample.to_string(),
            library: library.to_string(),
            run_id: run_id.to_string(),
            ..Default::default()
        }
    }

    /// Records one classified variant.
    pub fn record(&mut self, assignment: TierAssignment) {
        match (assignment.tier, assignment.call) {
            (Tier::Tier1, TierCall::Pass) => self.tier1_pass += 1,
            (Tier::Tier1, TierCall::Fail) => self.tier1_fail += 1,
            (Tier::Tier3, TierCall::Pass) => self.tier3_pass += 1,
            (Tier::Tier3, TierCall::Fail) => self.tier3_fail += 1,
            (Tier::Tier4, TierCall::Pass) => self.tier4_pass += 1,
            (Tier::Tier4, TierCall::Fail) => self.tier4_fail += 1,
        }
    }

    /// The tally for one (tier, call) pair.
    #[must_use]
    pub fn tier_count(&self, tier: Tier, call: TierCall) -> u64 {
        match (tier, call) {
            (Tier::Tier1, TierCall::Pass) => self.tier1_pass,
            (Tier::Tier1, TierCall::Fail) => self.tier1_fail,
            (Tier::Tier3, TierCall::Pass) => self.tier3_pass,
            (Tier::Tier3, TierCall::Fail) => self.tier3_fail,
            (Tier::Tier4, TierCall::Pass) => self.tier4_pass,
            (Tier::Tier4, TierCall::Fail) => self.tier4_fail,
        }
    }

    /// Total variants passing quality thresholds across tiers.
    #[must_use]
    pub fn passing_total(&self) -> u64 {
        self.tier1_pass + self.tier3_pass + self.tier4_pass
    }

    /// Total variants classified (on-target).
    #[must_use]
    pub fn classified_total(&self) -> u64 {
        self.passing_total() + self.tier1_fail + self.tier3_fail + self.tier4_fail
    }
}

impl Metric for LibraryReportMetrics {
    fn metric_name() -> &'static str {
        "library report"
    }
}

impl super::ProcessingMetrics for LibraryReportMetrics {
    fn total_input(&self) -> u64 {
        self.variants_iterated
    }

    fn total_output(&self) -> u64 {
        self.passing_total()
    }

    fn total_filtered(&self) -> u64 {
        self.off_target
    }
}

/// Off-target tally for one region of one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffTargetRegionMetric {
    /// Sample identifier
    pub sample: String,

    /// Sequencing library identifier
    pub library: String,

    /// Region identifier (the no-region sentinel for unassigned variants)
    pub region: String,

    /// Number of off-target variants tallied against this region
    pub count: u64,
}

impl Metric for OffTargetRegionMetric {
    fn metric_name() -> &'static str {
        "off-target region"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_tier_count() {
        let mut metrics = LibraryReportMetrics::new("S1", "L1", "R1");
        metrics.record(TierAssignment { tier: Tier::Tier1, call: TierCall::Pass });
        metrics.record(TierAssignment { tier: Tier::Tier1, call: TierCall::Pass });
        metrics.record(TierAssignment { tier: Tier::Tier3, call: TierCall::Fail });
        metrics.record(TierAssignment { tier: Tier::Tier4, call: TierCall::Pass });

        assert_eq!(metrics.tier_count(Tier::Tier1, TierCall::Pass), 2);
        assert_eq!(metrics.tier_count(Tier::Tier3, TierCall::Fail), 1);
        assert_eq!(metrics.tier_count(Tier::Tier3, TierCall::Pass), 0);
        assert_eq!(metrics.passing_total(), 3);
        assert_eq!(metrics.classified_total(), 4);
    }

    #[test]
    fn test_new_captures_unit_context() {
        let metrics = LibraryReportMetrics::new("S1", "L1", "R1");
        assert_eq!(metrics.sample, "S1");
        assert_eq!(metrics.library, "L1");
        assert_eq!(metrics.run_id, "R1");
        assert_eq!(metrics.classified_total(), 0);
    }

    #[test]
    fn test_metric_trait_impl() {
        assert_eq!(LibraryReportMetrics::metric_name(), "library report");
        assert_eq!(OffTargetRegionMetric::metric_name(), "off-target region");
    }
}
