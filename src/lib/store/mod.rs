//! Query contracts for the variant and coverage stores.
//!
//! The persistent stores are external collaborators; this module defines the
//! read contracts the engine consumes. Result sets are unordered: callers
//! first ask for the advertised count, then request a page at least that
//! large (plus a fixed margin) so results are never silently truncated, and
//! finally impose a deterministic sort for stable output ordering. Zero-row
//! results are not errors.

pub mod tsv;

use anyhow::{bail, Result};

use crate::coverage::CoverageObservation;
use crate::errors::VartierError;
use crate::variant::{VariantIdentity, VariantObservation};

pub use tsv::{TsvCoverageStore, TsvVariantStore};

/// Extra rows requested beyond the advertised count, guarding against
/// concurrent writes between the count and the fetch.
pub const PAGE_MARGIN: usize = 1000;

/// Retrieval filter for one sample-library unit's variants.
///
/// The population-frequency ceiling is applied here, at retrieval time;
/// variants above it are never retrieved and never reach tier
/// classification.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantQuery {
    /// Reference genome build
    pub reference_genome: String,
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Maximum allowed population allele frequency
    pub max_pop_aaf: f64,
}

/// Retrieval filter for one region's coverage within a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageQuery {
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Coverage-producing program
    pub program: String,
    /// Region identifier
    pub region: String,
}

/// Read access to the cohort variant store.
///
/// Implementations must support concurrent reads from parallel units.
pub trait VariantStore: Send + Sync {
    /// Advertised number of rows matching a unit query.
    fn count_sample_variants(&self, query: &VariantQuery) -> Result<usize>;

    /// Fetches up to `limit` rows matching a unit query, unordered.
    fn fetch_sample_variants(
        &self,
        query: &VariantQuery,
        limit: usize,
    ) -> Result<Vec<VariantObservation>>;

    /// Advertised number of cohort observations of one identity, across all
    /// samples and runs.
    fn count_cohort_observations(&self, identity: &VariantIdentity) -> Result<usize>;

    /// Fetches up to `limit` cohort observations of one identity, unordered.
    fn fetch_cohort_observations(
        &self,
        identity: &VariantIdentity,
        limit: usize,
    ) -> Result<Vec<VariantObservation>>;

    /// Advertised total number of observations in the store.
    fn count_all_observations(&self) -> Result<usize>;

    /// Fetches up to `limit` observations from the whole store, unordered.
    fn fetch_all_observations(&self, limit: usize) -> Result<Vec<VariantObservation>>;
}

/// Read access to the coverage store.
pub trait CoverageStore: Send + Sync {
    /// Advertised number of rows matching a coverage query.
    fn count_region_coverage(&self, query: &CoverageQuery) -> Result<usize>;

    /// Fetches up to `limit` rows matching a coverage query, unordered.
    fn fetch_region_coverage(
        &self,
        query: &CoverageQuery,
        limit: usize,
    ) -> Result<Vec<CoverageObservation>>;
}

/// Sorts unit rows into the report's stable order:
/// (library, chrom, pos, ref, alt).
pub fn sort_sample_variants(observations: &mut [VariantObservation]) {
    observations.sort_by(|a, b| {
        (&a.library, &a.identity.chrom, a.identity.pos, &a.identity.ref_allele, &a.identity.alt_allele)
            .cmp(&(
                &b.library,
                &b.identity.chrom,
                b.identity.pos,
                &b.identity.ref_allele,
                &b.identity.alt_allele,
            ))
    });
}

/// Sorts cohort rows deterministically: (sample, library, run).
///
/// The aggregate statistics are order-invariant; the sort only stabilizes
/// derived list fields such as matching libraries.
pub fn sort_cohort_observations(observations: &mut [VariantObservation]) {
    observations
        .sort_by(|a, b| (&a.sample, &a.library, &a.run_id).cmp(&(&b.sample, &b.library, &b.run_id)));
}

fn guarded_page(returned: usize, advertised: usize, limit: usize) -> Result<()> {
    if returned > limit {
        bail!(VartierError::TruncatedResultSet { returned, advertised });
    }
    Ok(())
}

/// Retrieves every unit row for `query`: count, fetch with
/// count-plus-margin page size, then sort for stable report ordering.
pub fn retrieve_sample_variants(
    store: &dyn VariantStore,
    query: &VariantQuery,
) -> Result<Vec<VariantObservation>> {
    let advertised = store.count_sample_variants(query)?;
    let limit = advertised + PAGE_MARGIN;
    let mut rows = store.fetch_sample_variants(query, limit)?;
    guarded_page(rows.len(), advertised, limit)?;
    sort_sample_variants(&mut rows);
    Ok(rows)
}

/// Retrieves the full cohort for one identity with the same paging contract.
pub fn retrieve_cohort_observations(
    store: &dyn VariantStore,
    identity: &VariantIdentity,
) -> Result<Vec<VariantObservation>> {
    let advertised = store.count_cohort_observations(identity)?;
    let limit = advertised + PAGE_MARGIN;
    let mut rows = store.fetch_cohort_observations(identity, limit)?;
    guarded_page(rows.len(), advertised, limit)?;
    sort_cohort_observations(&mut rows);
    Ok(rows)
}

/// Retrieves every observation in the store (cohort enumeration).
pub fn retrieve_all_observations(store: &dyn VariantStore) -> Result<Vec<VariantObservation>> {
    let advertised = store.count_all_observations()?;
    let limit = advertised + PAGE_MARGIN;
    let rows = store.fetch_all_observations(limit)?;
    guarded_page(rows.len(), advertised, limit)?;
    Ok(rows)
}

/// Retrieves coverage rows for one region, sorted by (region, run).
pub fn retrieve_region_coverage(
    store: &dyn CoverageStore,
    query: &CoverageQuery,
) -> Result<Vec<CoverageObservation>> {
    let advertised = store.count_region_coverage(query)?;
    let limit = advertised + PAGE_MARGIN;
    let mut rows = store.fetch_region_coverage(query, limit)?;
    guarded_page(rows.len(), advertised, limit)?;
    rows.sort_by(|a, b| (&a.region, &a.run_id).cmp(&(&b.region, &b.run_id)));
    Ok(rows)
}
