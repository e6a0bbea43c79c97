//! Fixture builders for CLI integration tests.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use vartier_lib::coverage::CoverageObservation;
use vartier_lib::store::{TsvCoverageStore, TsvVariantStore};
use vartier_lib::variant::{Caller, Severity, VariantIdentity, VariantObservation};

/// Path of the compiled vartier binary under test.
pub fn vartier_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vartier"))
}

/// A baseline on-target observation for sample S1 / library L1 / run R1.
pub fn observation(chrom: &str, pos: u64, region_field: &str) -> VariantObservation {
    let mut caller_aaf = BTreeMap::new();
    caller_aaf.insert(Caller::Mutect, 0.02);
    VariantObservation {
        identity: VariantIdentity {
            reference_genome: "GRCh37".to_string(),
            chrom: chrom.to_string(),
            pos,
            ref_allele: "A".to_string(),
            alt_allele: "T".to_string(),
        },
        end: pos,
        sample: "S1".to_string(),
        library: "L1".to_string(),
        run_id: "R1".to_string(),
        callers: vec![Caller::Mutect],
        caller_aaf,
        max_som_aaf: 0.02,
        min_depth: 250.0,
        max_depth: 300.0,
        max_pop_aaf: 0.0001,
        region_field: region_field.to_string(),
        cosmic_ids: Vec::new(),
        cosmic_num_samples: String::new(),
        cosmic_aa: String::new(),
        clinvar_significance: Vec::new(),
        clinvar_hgvs: String::new(),
        clinvar_disease: String::new(),
        rs_ids: Vec::new(),
        severity: Severity::Low,
        impact: String::new(),
        gene: "EGFR".to_string(),
        transcript: String::new(),
        codon_change: String::new(),
        aa_change: String::new(),
    }
}

/// A coverage row for sample S1 / library L1 / run R1 from sambamba.
pub fn coverage(region: &str, num_reads: u64, mean_coverage: f64) -> CoverageObservation {
    CoverageObservation {
        region: region.to_string(),
        sample: "S1".to_string(),
        library: "L1".to_string(),
        run_id: "R1".to_string(),
        program: "sambamba".to_string(),
        num_reads,
        mean_coverage,
    }
}

/// Writes a variant store snapshot and returns its path.
pub fn write_variant_snapshot(dir: &Path, observations: &[VariantObservation]) -> PathBuf {
    let path = dir.join("variants.txt");
    TsvVariantStore::write_snapshot(&path, observations).unwrap();
    path
}

/// Writes a coverage store snapshot and returns its path.
pub fn write_coverage_snapshot(dir: &Path, observations: &[CoverageObservation]) -> PathBuf {
    let path = dir.join("coverage.txt");
    TsvCoverageStore::write_snapshot(&path, observations).unwrap();
    path
}

/// Writes a panel file with one line per region id and returns its path.
pub fn write_panel(dir: &Path, regions: &[&str]) -> PathBuf {
    let path = dir.join("panel.bed");
    let mut file = std::fs::File::create(&path).unwrap();
    for (i, region) in regions.iter().enumerate() {
        writeln!(file, "7\t{}\t{}\t{}", i * 100, i * 100 + 50, region).unwrap();
    }
    path
}

/// Writes a sample sheet over (sample, library, run, panel) rows and
/// returns its path.
pub fn write_sample_sheet(dir: &Path, rows: &[(&str, &str, &str, &Path)]) -> PathBuf {
    let path = dir.join("samples.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "sample\tlibrary_name\trun_id\tpanel").unwrap();
    for (sample, library, run_id, panel) in rows {
        writeln!(file, "{sample}\t{library}\t{run_id}\t{}", panel.display()).unwrap();
    }
    path
}
