//! Coverage observations and the region-to-coverage join.
//!
//! The correlator joins a variant's region field to the coverage observed at
//! those regions within the same sample/library/run, emitting comma-joined
//! coverage and read-count strings that preserve a 1:1 positional
//! correspondence with the input regions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::panel::{split_regions, NO_REGION};

/// Coverage observed at one region for one sample/library/run, as produced
/// by a specific coverage program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageObservation {
    /// Region identifier
    pub region: String,
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Program that produced the coverage values
    pub program: String,
    /// Number of reads assigned to the region
    pub num_reads: u64,
    /// Mean depth of coverage over the region
    pub mean_coverage: f64,
}

/// Region-keyed coverage lookup for one sample-library unit.
///
/// Built from observations already filtered to the unit's
/// (sample, library, run, program); a later observation for the same region
/// replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageIndex {
    by_region: BTreeMap<String, (u64, f64)>,
}

impl CoverageIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation to the index.
    pub fn insert(&mut self, obs: &CoverageObservation) {
        self.by_region.insert(obs.region.clone(), (obs.num_reads, obs.mean_coverage));
    }

    /// Builds an index from a set of observations.
    #[must_use]
    pub fn from_observations(observations: &[CoverageObservation]) -> Self {
        let mut index = Self::new();
        for obs in observations {
            index.insert(obs);
        }
        index
    }

    /// (num_reads, mean_coverage) for one region, if observed.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<(u64, f64)> {
        self.by_region.get(region).copied()
    }

    /// Number of regions with coverage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_region.len()
    }

    /// True if no region has coverage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}

/// Joins a region field to its coverage, returning comma-joined
/// (coverage, reads) strings in the same order as the input regions.
///
/// A region with no coverage row yields the no-data marker in both strings;
/// the sentinel region field yields a single marker pair.
#[must_use]
pub fn correlate(region_field: &str, index: &CoverageIndex) -> (String, String) {
    let regions = split_regions(region_field);
    if regions.is_empty() {
        return (NO_REGION.to_string(), NO_REGION.to_string());
    }

    let mut coverage_values = Vec::with_capacity(regions.len());
    let mut reads_values = Vec::with_capacity(regions.len());
    for region in regions {
        match index.get(region) {
            Some((num_reads, mean_coverage)) => {
                coverage_values.push(mean_coverage.to_string());
                reads_values.push(num_reads.to_string());
            }
            None => {
                coverage_values.push(NO_REGION.to_string());
                reads_values.push(NO_REGION.to_string());
            }
        }
    }

    (coverage_values.join(","), reads_values.join(","))
}
