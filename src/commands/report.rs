//! Per-sample variant reporting from cohort and coverage store snapshots.
//!
//! For every sample in the sample sheet, each of its libraries is processed
//! as an independent unit: variants are retrieved (population-frequency
//! filtered), matched against the library's target panel, enriched with
//! cohort statistics and coverage, classified into tiers, and written as
//! TSV report sheets alongside per-library metrics and a plain-text
//! reporting log. Samples are processed in parallel; a failing sample does
//! not disturb the others.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fgoxide::io::DelimFile;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use vartier_lib::engine::{process_library, LibraryUnit, ReportConfig};
use vartier_lib::logging::{OperationTimer, ReportLog};
use vartier_lib::metrics::writer::write_metrics_auto;
use vartier_lib::metrics::{LibraryReportMetrics, OffTargetRegionMetric};
use vartier_lib::report::{ReportSink, SampleReport, TsvReportSink};
use vartier_lib::store::{TsvCoverageStore, TsvVariantStore};
use vartier_lib::validation::{validate_files_exist, validate_report_name};

use crate::commands::command::Command;
use crate::commands::common::{CallerOptions, StoreOptions, ThresholdOptions};

/// One row of the sample sheet: a sample-library unit and its panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSheetRecord {
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library_name: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Path of the library's target panel file
    pub panel: String,
}

/// Generate per-sample variant reports.
///
/// Classifies each sample's on-target variants into priority tiers with
/// cohort statistics and coverage context attached.
#[derive(Debug, Parser)]
#[command(
    name = "report",
    about = "\x1b[38;5;72m[REPORTING]\x1b[0m      \x1b[36mClassify and report variants per sample with cohort statistics\x1b[0m",
    long_about = r#"
Generate per-sample variant reports from store snapshots.

For each sample in the sample sheet, every library is processed as an
independent unit:

  1. The library's target panel is loaded (region ids in column 4).
  2. Variants are retrieved for the unit; rows above the population
     allele-frequency ceiling are excluded at retrieval.
  3. Off-target variants are tallied and excluded from tiering.
  4. Each on-target variant is enriched with cohort statistics (occurrence
     counts, VAF median/std-dev, percentile rank) and per-region coverage.
  5. Variants are classified: TIER1 (COSMIC/ClinVar evidence), TIER3
     (MED/HIGH severity), TIER4 (everything else), each PASS or FAIL
     against the somatic allele fraction and depth thresholds.

OUTPUTS (per sample, under --output-dir):

  <sample>.<report>.<tier>_<pass|fail>.txt   report sheets (TSV)
  <sample>.<report>.coverage.txt             coverage sheet with run context
  <sample>.<report>.metrics.txt              per-library tallies
  <sample>.<report>.off_target.txt           off-target counts per region
  <sample>.<report>.log                      plain-text reporting log

EXAMPLES:

  # Report every sample in the sheet with default thresholds
  vartier report -s samples.txt -v variants.txt -c coverage.txt -o reports/

  # Restrict report columns to two callers and raise the depth floor
  vartier report -s samples.txt -v variants.txt -c coverage.txt \
    --callers mutect,vardict --min-depth 500
"#
)]
pub struct Report {
    /// Sample sheet (TSV: sample, library_name, run_id, panel)
    #[arg(short = 's', long = "samples")]
    pub samples: PathBuf,

    #[command(flatten)]
    pub store: StoreOptions,

    /// Coverage store snapshot (TSV)
    #[arg(short = 'c', long = "coverage")]
    pub coverage: PathBuf,

    /// Output directory for report files
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Root name for report files (per sample)
    #[arg(short = 'r', long = "report-name", default_value = "report")]
    pub report_name: String,

    /// Reference genome build of the run
    #[arg(short = 'g', long = "genome", default_value = "GRCh37")]
    pub genome: String,

    /// Program whose coverage rows are joined to variants
    #[arg(long = "coverage-program", default_value = "sambamba")]
    pub coverage_program: String,

    #[command(flatten)]
    pub thresholds: ThresholdOptions,

    #[command(flatten)]
    pub callers: CallerOptions,
}

/// One sample with its library units, in sheet order.
#[derive(Debug, Clone)]
struct SampleGroup {
    sample: String,
    units: Vec<LibraryUnit>,
}

fn group_by_sample(records: Vec<SampleSheetRecord>) -> Vec<SampleGroup> {
    let mut groups: Vec<SampleGroup> = Vec::new();
    for record in records {
        let unit = LibraryUnit {
            sample: record.sample.clone(),
            library: record.library_name,
            run_id: record.run_id,
            panel_path: PathBuf::from(record.panel),
        };
        match groups.iter_mut().find(|g| g.sample == record.sample) {
            Some(group) => group.units.push(unit),
            None => groups.push(SampleGroup { sample: record.sample, units: vec![unit] }),
        }
    }
    groups
}

impl Report {
    fn process_sample(
        &self,
        group: &SampleGroup,
        variants: &TsvVariantStore,
        coverage: &TsvCoverageStore,
        config: &ReportConfig,
        sink: &TsvReportSink,
    ) -> Result<()> {
        info!("Processing variants for sample {}", group.sample);

        let mut report_log = ReportLog::create(&self.output_dir, &group.sample, &self.report_name)?;
        let mut rows = Vec::new();
        let mut coverage_rows = Vec::new();
        let mut metrics: Vec<LibraryReportMetrics> = Vec::new();
        let mut off_target: Vec<OffTargetRegionMetric> = Vec::new();

        for unit in &group.units {
            let output = process_library(variants, coverage, config, unit, &mut report_log)?;
            rows.extend(output.rows);
            coverage_rows.extend(output.coverage);
            metrics.push(output.metrics);
            off_target.extend(output.off_target_regions);
        }

        let report = SampleReport {
            sample: group.sample.clone(),
            libraries: group.units.iter().map(|u| u.library.clone()).collect(),
            run_id: group.units.first().map(|u| u.run_id.clone()).unwrap_or_default(),
            thresholds: config.thresholds,
            active_callers: config.active_callers.clone(),
            rows,
            coverage: coverage_rows,
        };
        sink.write_sample(&report)?;

        let metrics_path =
            self.output_dir.join(format!("{}.{}.metrics.txt", group.sample, self.report_name));
        write_metrics_auto(&metrics_path, &metrics)?;

        let off_target_path =
            self.output_dir.join(format!("{}.{}.off_target.txt", group.sample, self.report_name));
        write_metrics_auto(&off_target_path, &off_target)?;

        report_log.flush()?;
        Ok(())
    }
}

impl Command for Report {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("Command line: {command_line}");

        validate_files_exist(&[
            (self.samples.clone(), "Sample sheet"),
            (self.coverage.clone(), "Coverage store snapshot"),
        ])?;
        self.store.validate()?;
        validate_report_name(&self.report_name)?;
        let thresholds = self.thresholds.to_thresholds()?;
        let active_callers = self.callers.to_callers()?;

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.output_dir.display())
        })?;

        let timer = OperationTimer::new("Loading store snapshots");
        let variants = TsvVariantStore::load(&self.store.variants)?;
        let coverage = TsvCoverageStore::load(&self.coverage)?;
        timer.log_completion(variants.len() as u64);

        let records: Vec<SampleSheetRecord> = DelimFile::default()
            .read_tsv(&self.samples)
            .with_context(|| format!("Failed to read sample sheet: {}", self.samples.display()))?;
        if records.is_empty() {
            bail!("Sample sheet is empty: {}", self.samples.display());
        }
        let groups = group_by_sample(records);

        let config = ReportConfig {
            reference_genome: self.genome.clone(),
            thresholds,
            active_callers,
            coverage_program: self.coverage_program.clone(),
        };
        let sink = TsvReportSink::new(&self.output_dir, &self.report_name);

        info!("Processing {} samples", groups.len());
        let failures: Vec<String> = groups
            .par_iter()
            .filter_map(|group| {
                self.process_sample(group, &variants, &coverage, &config, &sink)
                    .err()
                    .map(|e| format!("{}: {e:#}", group.sample))
            })
            .collect();

        for failure in &failures {
            log::error!("Sample failed: {failure}");
        }
        if !failures.is_empty() {
            bail!("{} of {} samples failed", failures.len(), groups.len());
        }

        info!("Wrote reports for {} samples to {}", groups.len(), self.output_dir.display());
        Ok(())
    }
}
