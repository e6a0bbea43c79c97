//! Report row assembly and output adapters.
//!
//! One [`ReportRow`] is built per on-target, classified variant, merging
//! identity, sample context, cohort statistics, coverage strings, and the
//! tier assignment. Rows are presentation-ready strings; spreadsheet styling
//! and file layout belong to the adapter behind [`ReportSink`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::cohort::CohortAggregate;
use crate::coverage::CoverageObservation;
use crate::metrics::format_float;
use crate::panel::NO_REGION;
use crate::tier::{Thresholds, Tier, TierAssignment, TierCall};
use crate::variant::{Caller, VariantObservation};

/// Free-text fields at or beyond this length are replaced with a
/// placeholder to bound row size.
pub const MAX_TEXT_LEN: usize = 200;

/// Placeholder for over-length allele strings.
pub const LONG_ALLELE_PLACEHOLDER: &str = "Length > 200bp";

/// Placeholder for over-length codon/amino-acid change strings.
pub const LONG_CHANGE_PLACEHOLDER: &str = "Length > 200aa";

/// The fixed report columns, in output order; dynamic per-caller columns
/// follow.
pub const FIXED_COLUMNS: [&str; 35] = [
    "Sample",
    "Library",
    "Gene",
    "Amplicon",
    "Ref",
    "Alt",
    "Codon",
    "AA",
    "Max Caller Somatic VAF",
    "Num Times in Database",
    "Num Times in Run",
    "Median VAF in DB",
    "Median VAF in Run",
    "StdDev VAF",
    "VAF Percentile Rank",
    "Callers",
    "Caller Counts",
    "COSMIC IDs",
    "Num COSMIC Samples",
    "COSMIC AA",
    "Clinvar Significance",
    "Clinvar HGVS",
    "Clinvar Disease",
    "Coverage",
    "Num Reads",
    "Impact",
    "Severity",
    "Maximum Population AF",
    "Min Caller Depth",
    "Max Caller Depth",
    "Chrom",
    "Start",
    "End",
    "rsIDs",
    "Matching Samples in Run",
];

fn truncate_allele(value: &str) -> String {
    if value.len() < MAX_TEXT_LEN { value.to_string() } else { LONG_ALLELE_PLACEHOLDER.to_string() }
}

fn truncate_change(value: &str) -> String {
    if value.len() < MAX_TEXT_LEN { value.to_string() } else { LONG_CHANGE_PLACEHOLDER.to_string() }
}

fn text_or_none(value: &str) -> String {
    if value.is_empty() { NO_REGION.to_string() } else { value.to_string() }
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() { NO_REGION.to_string() } else { values.join(",") }
}

fn stat_or_none(value: Option<f64>) -> String {
    value.map_or_else(|| NO_REGION.to_string(), format_float)
}

/// One populated report record for an on-target, classified variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Tier assigned to the variant
    pub tier: Tier,
    /// Pass/fail quality sub-flag
    pub call: TierCall,
    fixed: Vec<String>,
    caller_fields: Vec<String>,
}

impl ReportRow {
    /// Builds a row from the classified observation and its enrichments.
    ///
    /// `active_callers` selects and orders the dynamic allele-fraction
    /// columns; it must match the set passed to [`ReportRow::header`].
    #[must_use]
    pub fn build(
        obs: &VariantObservation,
        aggregate: &CohortAggregate,
        coverage_string: &str,
        reads_string: &str,
        assignment: TierAssignment,
        active_callers: &[Caller],
    ) -> Self {
        let fixed = vec![
            obs.sample.clone(),
            obs.library.clone(),
            obs.gene.clone(),
            obs.region_field.clone(),
            truncate_allele(&obs.identity.ref_allele),
            truncate_allele(&obs.identity.alt_allele),
            truncate_change(&obs.codon_change),
            truncate_change(&obs.aa_change),
            format_float(obs.max_som_aaf),
            aggregate.observation_count.to_string(),
            aggregate.times_seen_in_run.to_string(),
            stat_or_none(aggregate.vaf_median),
            stat_or_none(aggregate.run_vaf_median),
            stat_or_none(aggregate.vaf_std_dev),
            stat_or_none(aggregate.percentile_rank),
            list_or_none(
                &obs.callers.iter().map(|c| c.name().to_string()).collect::<Vec<_>>(),
            ),
            text_or_none(&aggregate.caller_counts.summary()),
            list_or_none(&obs.cosmic_ids),
            text_or_none(&obs.cosmic_num_samples),
            text_or_none(&obs.cosmic_aa),
            list_or_none(&obs.clinvar_significance),
            text_or_none(&obs.clinvar_hgvs),
            text_or_none(&obs.clinvar_disease),
            coverage_string.to_string(),
            reads_string.to_string(),
            text_or_none(&obs.impact),
            obs.severity.to_string(),
            format_float(obs.max_pop_aaf),
            obs.min_depth.to_string(),
            obs.max_depth.to_string(),
            obs.identity.chrom.clone(),
            obs.identity.pos.to_string(),
            obs.end.to_string(),
            list_or_none(&obs.rs_ids),
            list_or_none(&aggregate.matching_libraries_in_run),
        ];

        let caller_fields = active_callers
            .iter()
            .map(|&caller| {
                obs.aaf_for(caller)
                    .map_or_else(|| NO_REGION.to_string(), format_float)
            })
            .collect();

        Self { tier: assignment.tier, call: assignment.call, fixed, caller_fields }
    }

    /// The header row for the given active-caller set.
    #[must_use]
    pub fn header(active_callers: &[Caller]) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(active_callers.iter().map(|c| c.column_label().to_string()))
            .collect()
    }

    /// The row's fields, aligned with [`ReportRow::header`].
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        self.fixed.iter().chain(self.caller_fields.iter()).cloned().collect()
    }

    /// The row as one tab-delimited line.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.fields().join("\t")
    }
}

/// Everything the renderer needs for one sample's report.
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Sample identifier
    pub sample: String,
    /// Libraries contributing to the report, in processing order
    pub libraries: Vec<String>,
    /// Sequencing run identifier
    pub run_id: String,
    /// Thresholds in effect for the run
    pub thresholds: Thresholds,
    /// Ordered active-caller set used for the dynamic columns
    pub active_callers: Vec<Caller>,
    /// Classified report rows across the sample's libraries
    pub rows: Vec<ReportRow>,
    /// Coverage rows for the sample's panel regions
    pub coverage: Vec<CoverageObservation>,
}

impl SampleReport {
    /// Rows belonging to one (tier, call) sheet.
    pub fn rows_for(&self, tier: Tier, call: TierCall) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |row| row.tier == tier && row.call == call)
    }
}

/// Output adapter: renders one sample's report into a presentation format.
pub trait ReportSink {
    /// Writes the full sample report.
    ///
    /// # Errors
    ///
    /// Returns an error if any output file cannot be written.
    fn write_sample(&self, report: &SampleReport) -> Result<()>;
}

/// TSV output adapter: one file per tier/call sheet plus a coverage sheet
/// with a run-context block.
#[derive(Debug, Clone)]
pub struct TsvReportSink {
    out_dir: PathBuf,
    report_name: String,
}

impl TsvReportSink {
    /// Creates a sink writing under `out_dir` with the given report root
    /// name.
    #[must_use]
    pub fn new<P: AsRef<Path>>(out_dir: P, report_name: &str) -> Self {
        Self { out_dir: out_dir.as_ref().to_path_buf(), report_name: report_name.to_string() }
    }

    /// Path of one tier/call sheet for a sample.
    #[must_use]
    pub fn sheet_path(&self, sample: &str, tier: Tier, call: TierCall) -> PathBuf {
        self.out_dir.join(format!(
            "{sample}.{}.{}_{}.txt",
            self.report_name,
            tier.file_label(),
            call.file_label()
        ))
    }

    /// Path of the coverage sheet for a sample.
    #[must_use]
    pub fn coverage_path(&self, sample: &str) -> PathBuf {
        self.out_dir.join(format!("{sample}.{}.coverage.txt", self.report_name))
    }

    fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{line}")
                .with_context(|| format!("Failed to write report file: {}", path.display()))?;
        }
        writer.flush().with_context(|| format!("Failed to flush report file: {}", path.display()))
    }

    fn coverage_lines(report: &SampleReport) -> Vec<String> {
        let mut lines = vec![
            format!("Sample\t{}", report.sample),
            format!("Libraries\t{}", report.libraries.iter().join(" | ")),
            format!("Run ID\t{}", report.run_id),
            format!(
                "Minimum Reportable Somatic Allele Frequency\t{}",
                report.thresholds.min_somatic_aaf
            ),
            format!("Minimum Amplicon Depth\t{}", report.thresholds.min_depth),
            format!("Maximum Population Allele Frequency\t{}", report.thresholds.max_pop_aaf),
            "Sample\tLibrary\tAmplicon\tNum Reads\tCoverage".to_string(),
        ];
        lines.extend(report.coverage.iter().map(|c| {
            format!("{}\t{}\t{}\t{}\t{}", c.sample, c.library, c.region, c.num_reads, c.mean_coverage)
        }));
        lines
    }
}

impl ReportSink for TsvReportSink {
    fn write_sample(&self, report: &SampleReport) -> Result<()> {
        let header = ReportRow::header(&report.active_callers).join("\t");

        for tier in Tier::ALL {
            for call in [TierCall::Pass, TierCall::Fail] {
                let mut lines = vec![header.clone()];
                lines.extend(report.rows_for(tier, call).map(ReportRow::to_line));
                Self::write_lines(&self.sheet_path(&report.sample, tier, call), &lines)?;
            }
        }

        Self::write_lines(&self.coverage_path(&report.sample), &Self::coverage_lines(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::aggregate;
    use crate::tier::classify;
    use crate::variant::{Severity, VariantIdentity};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn observation() -> VariantObservation {
        let mut caller_aaf = BTreeMap::new();
        caller_aaf.insert(Caller::Mutect, 0.12);
        caller_aaf.insert(Caller::Vardict, 0.11);
        VariantObservation {
            identity: VariantIdentity {
                reference_genome: "GRCh37".to_string(),
                chrom: "7".to_string(),
                pos: 55_242_464,
                ref_allele: "A".to_string(),
                alt_allele: "T".to_string(),
            },
            end: 55_242_464,
            sample: "S1".to_string(),
            library: "L1".to_string(),
            run_id: "R1".to_string(),
            callers: vec![Caller::Mutect, Caller::Vardict],
            caller_aaf,
            max_som_aaf: 0.12,
            min_depth: 210.0,
            max_depth: 480.0,
            max_pop_aaf: 0.0001,
            region_field: "AMPL1".to_string(),
            cosmic_ids: vec!["COSM6224".to_string()],
            cosmic_num_samples: "1234".to_string(),
            cosmic_aa: "p.L858R".to_string(),
            clinvar_significance: vec!["pathogenic".to_string()],
            clinvar_hgvs: String::new(),
            clinvar_disease: String::new(),
            rs_ids: Vec::new(),
            severity: Severity::High,
            impact: "missense".to_string(),
            gene: "EGFR".to_string(),
            transcript: String::new(),
            codon_change: "c.2573T>G".to_string(),
            aa_change: "p.L858R".to_string(),
        }
    }

    fn build_row(obs: &VariantObservation, active: &[Caller]) -> ReportRow {
        let agg = aggregate(std::slice::from_ref(obs), obs);
        let assignment = classify(obs, &Thresholds::default());
        ReportRow::build(obs, &agg, "480.5", "1500", assignment, active)
    }

    #[test]
    fn test_header_and_fields_align() {
        let active = vec![Caller::Mutect, Caller::Vardict];
        let obs = observation();
        let row = build_row(&obs, &active);
        assert_eq!(ReportRow::header(&active).len(), row.fields().len());
    }

    #[test]
    fn test_dynamic_caller_columns_follow_active_set() {
        let obs = observation();

        let active = vec![Caller::Mutect, Caller::Pindel];
        let header = ReportRow::header(&active);
        assert_eq!(header[FIXED_COLUMNS.len()], "MuTect_AF");
        assert_eq!(header[FIXED_COLUMNS.len() + 1], "Pindel_AF");

        let row = build_row(&obs, &active);
        let fields = row.fields();
        assert_eq!(fields[FIXED_COLUMNS.len()], format_float(0.12));
        // Pindel did not call this variant
        assert_eq!(fields[FIXED_COLUMNS.len() + 1], NO_REGION);
    }

    #[test]
    fn test_row_carries_context_and_statistics() {
        let obs = observation();
        let row = build_row(&obs, &[Caller::Mutect]);
        let fields = row.fields();
        assert_eq!(fields[0], "S1");
        assert_eq!(fields[1], "L1");
        assert_eq!(fields[2], "EGFR");
        assert_eq!(fields[9], "1"); // times in database
        assert_eq!(fields[14], format_float(50.0)); // percentile rank, N = 1
        assert_eq!(fields[15], "mutect,vardict");
        assert_eq!(fields[23], "480.5");
        assert_eq!(fields[24], "1500");
        assert_eq!(fields[26], "HIGH");
        assert_eq!(row.tier, Tier::Tier1);
        assert_eq!(row.call, TierCall::Pass);
    }

    #[test]
    fn test_long_alleles_are_truncated() {
        let mut obs = observation();
        obs.identity.ref_allele = "A".repeat(MAX_TEXT_LEN);
        obs.aa_change = "p.".repeat(150);
        let row = build_row(&obs, &[Caller::Mutect]);
        let fields = row.fields();
        assert_eq!(fields[4], LONG_ALLELE_PLACEHOLDER);
        assert_eq!(fields[7], LONG_CHANGE_PLACEHOLDER);
        // Alt was short, left as-is
        assert_eq!(fields[5], "T");
    }

    #[test]
    fn test_empty_fields_render_no_data_marker() {
        let mut obs = observation();
        obs.cosmic_ids.clear();
        obs.clinvar_significance.clear();
        obs.callers.clear();
        obs.caller_aaf.clear();
        let agg = aggregate(&[], &obs);
        let assignment = classify(&obs, &Thresholds::default());
        let row = ReportRow::build(&obs, &agg, NO_REGION, NO_REGION, assignment, &[Caller::Mutect]);
        let fields = row.fields();
        assert_eq!(fields[11], NO_REGION); // median undefined
        assert_eq!(fields[14], NO_REGION); // percentile undefined
        assert_eq!(fields[15], NO_REGION); // no callers
        assert_eq!(fields[17], NO_REGION); // no cosmic ids
    }

    #[test]
    fn test_tsv_sink_writes_sheets() {
        let dir = TempDir::new().unwrap();
        let obs = observation();
        let active = vec![Caller::Mutect, Caller::Vardict];
        let report = SampleReport {
            sample: "S1".to_string(),
            libraries: vec!["L1".to_string()],
            run_id: "R1".to_string(),
            thresholds: Thresholds::default(),
            active_callers: active.clone(),
            rows: vec![build_row(&obs, &active)],
            coverage: vec![CoverageObservation {
                region: "AMPL1".to_string(),
                sample: "S1".to_string(),
                library: "L1".to_string(),
                run_id: "R1".to_string(),
                program: "sambamba".to_string(),
                num_reads: 1500,
                mean_coverage: 480.5,
            }],
        };

        let sink = TsvReportSink::new(dir.path(), "report");
        sink.write_sample(&report).unwrap();

        let tier1_pass =
            fs::read_to_string(sink.sheet_path("S1", Tier::Tier1, TierCall::Pass)).unwrap();
        assert!(tier1_pass.starts_with("Sample\tLibrary\tGene"));
        assert!(tier1_pass.contains("EGFR"));
        assert!(tier1_pass.contains("MuTect_AF"));

        // Other sheets exist but hold only the header
        let tier4_fail =
            fs::read_to_string(sink.sheet_path("S1", Tier::Tier4, TierCall::Fail)).unwrap();
        assert_eq!(tier4_fail.lines().count(), 1);

        let coverage = fs::read_to_string(sink.coverage_path("S1")).unwrap();
        assert!(coverage.contains("Sample\tS1"));
        assert!(coverage.contains("Run ID\tR1"));
        assert!(coverage.contains("AMPL1"));
        assert!(coverage.contains("1500"));
    }
}
