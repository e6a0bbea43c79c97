//! The sample-library reporting engine.
//!
//! One unit of work covers one (sample, library) pair: load its target
//! panel, retrieve its variants and coverage from the stores, match against
//! the panel, enrich with cohort statistics and coverage, classify, and emit
//! report rows plus diagnostic tallies. Units share nothing mutable, so the
//! caller may run them in parallel; within a unit processing is sequential.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::cohort::aggregate;
use crate::coverage::{correlate, CoverageIndex, CoverageObservation};
use crate::errors::VartierError;
use crate::logging::ReportLog;
use crate::metrics::{LibraryReportMetrics, OffTargetRegionMetric};
use crate::panel::{is_off_target, is_targeted, split_regions, TargetPanel, NO_REGION};
use crate::progress::ProgressTracker;
use crate::report::ReportRow;
use crate::store::{
    retrieve_cohort_observations, retrieve_region_coverage, retrieve_sample_variants,
    CoverageQuery, CoverageStore, VariantQuery, VariantStore,
};
use crate::tier::{classify, Thresholds};
use crate::variant::Caller;

/// Read-only configuration shared by every unit of a run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Reference genome build the run was called against
    pub reference_genome: String,
    /// Reporting quality thresholds
    pub thresholds: Thresholds,
    /// Ordered active-caller set for dynamic report columns
    pub active_callers: Vec<Caller>,
    /// Program whose coverage rows are joined to variants
    pub coverage_program: String,
}

/// One sample-library unit of work.
#[derive(Debug, Clone)]
pub struct LibraryUnit {
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Path of the unit's target panel file
    pub panel_path: PathBuf,
}

/// Everything one unit produces.
#[derive(Debug, Clone)]
pub struct LibraryOutput {
    /// Classified report rows, in stable retrieval order
    pub rows: Vec<ReportRow>,
    /// Coverage rows for the unit's panel regions
    pub coverage: Vec<CoverageObservation>,
    /// Per-library tallies
    pub metrics: LibraryReportMetrics,
    /// Off-target tallies per region
    pub off_target_regions: Vec<OffTargetRegionMetric>,
}

fn store_error(unit: &LibraryUnit, error: &anyhow::Error) -> VartierError {
    VartierError::StoreQuery {
        sample: unit.sample.clone(),
        library: unit.library.clone(),
        reason: format!("{error:#}"),
    }
}

/// Processes one sample-library unit.
///
/// The panel is loaded before any store access, so configuration errors
/// abort the unit first; a store failure aborts the unit with
/// sample/library context and leaves other units unaffected.
///
/// # Errors
///
/// Returns a configuration error for a missing or malformed panel file, or
/// a store error if a query fails.
pub fn process_library(
    variant_store: &dyn VariantStore,
    coverage_store: &dyn CoverageStore,
    config: &ReportConfig,
    unit: &LibraryUnit,
    report_log: &mut ReportLog,
) -> Result<LibraryOutput> {
    log::info!("Processing variants for library {}", unit.library);
    report_log.line(&format!("Processing variants for library {}", unit.library))?;
    report_log.line(&format!(
        "Processing amplicons for library from file {}",
        unit.panel_path.display()
    ))?;

    let panel = TargetPanel::load(&unit.panel_path)?;

    let mut coverage_rows = Vec::new();
    for region in panel.regions() {
        let query = CoverageQuery {
            sample: unit.sample.clone(),
            library: unit.library.clone(),
            run_id: unit.run_id.clone(),
            program: config.coverage_program.clone(),
            region: region.clone(),
        };
        let rows = retrieve_region_coverage(coverage_store, &query)
            .map_err(|e| store_error(unit, &e))?;
        coverage_rows.extend(rows);
    }
    let coverage_index = CoverageIndex::from_observations(&coverage_rows);

    let query = VariantQuery {
        reference_genome: config.reference_genome.clone(),
        sample: unit.sample.clone(),
        library: unit.library.clone(),
        run_id: unit.run_id.clone(),
        max_pop_aaf: config.thresholds.max_pop_aaf,
    };
    let observations =
        retrieve_sample_variants(variant_store, &query).map_err(|e| store_error(unit, &e))?;

    let mut metrics = LibraryReportMetrics::new(&unit.sample, &unit.library, &unit.run_id);
    metrics.variants_retrieved = observations.len() as u64;
    log::info!("Retrieved {} total variants", observations.len());
    report_log.line(&format!("Retrieved {} total variants", observations.len()))?;

    let mut off_target_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut rows = Vec::new();
    let tracker = ProgressTracker::new("Processed variants").with_interval(1_000);

    for obs in &observations {
        metrics.variants_iterated += 1;
        tracker.log_if_needed(1);

        if is_off_target(&obs.region_field) {
            metrics.off_target += 1;
            *off_target_counts.entry(NO_REGION.to_string()).or_default() += 1;
            continue;
        }
        if !is_targeted(&obs.region_field, &panel) {
            metrics.off_target += 1;
            for region in split_regions(&obs.region_field) {
                *off_target_counts.entry(region.to_string()).or_default() += 1;
            }
            continue;
        }

        let cohort = retrieve_cohort_observations(variant_store, &obs.identity)
            .map_err(|e| store_error(unit, &e))?;
        let cohort_aggregate = aggregate(&cohort, obs);
        let (coverage_string, reads_string) = correlate(&obs.region_field, &coverage_index);
        let assignment = classify(obs, &config.thresholds);

        metrics.record(assignment);
        rows.push(ReportRow::build(
            obs,
            &cohort_aggregate,
            &coverage_string,
            &reads_string,
            assignment,
            &config.active_callers,
        ));
    }
    tracker.log_final();

    crate::logging::log_library_summary(&metrics);
    report_log.library_summary(&metrics)?;

    let off_target_regions = off_target_counts
        .into_iter()
        .map(|(region, count)| OffTargetRegionMetric {
            sample: unit.sample.clone(),
            library: unit.library.clone(),
            region,
            count,
        })
        .collect();

    Ok(LibraryOutput { rows, coverage: coverage_rows, metrics, off_target_regions })
}
