//! End-to-end tests for `vartier report`.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

use vartier_lib::variant::Severity;

use crate::helpers::{
    coverage, observation, vartier_binary, write_coverage_snapshot, write_panel,
    write_sample_sheet, write_variant_snapshot,
};

#[test]
fn test_report_command_end_to_end() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("reports");

    // Tier 1 pass: COSMIC evidence, thresholds met
    let mut tier1_pass = observation("7", 100, "AMPL1");
    tier1_pass.cosmic_ids = vec!["COSM123".to_string()];

    // Tier 1 fail: COSMIC evidence but shallow depth
    let mut tier1_fail = observation("7", 150, "AMPL1");
    tier1_fail.cosmic_ids = vec!["COSM456".to_string()];
    tier1_fail.max_depth = 100.0;

    // Tier 3: benign in ClinVar but HIGH severity
    let mut tier3 = observation("7", 200, "AMPL2");
    tier3.clinvar_significance = vec!["benign".to_string()];
    tier3.severity = Severity::High;

    // Off-target: no region assigned
    let sentinel = observation("7", 300, "None");

    // Common variant: excluded at retrieval by the population-frequency
    // ceiling, so it never appears in any tally
    let mut common = observation("7", 400, "AMPL1");
    common.max_pop_aaf = 0.25;

    let variants = write_variant_snapshot(
        dir.path(),
        &[tier1_pass, tier1_fail, tier3, sentinel, common],
    );
    let coverage_path = write_coverage_snapshot(
        dir.path(),
        &[coverage("AMPL1", 1500, 480.5), coverage("AMPL2", 900, 310.0)],
    );
    let panel = write_panel(dir.path(), &["AMPL1", "AMPL2"]);
    let samples = write_sample_sheet(dir.path(), &[("S1", "L1", "R1", &panel)]);

    let status = Command::new(vartier_binary())
        .args([
            "report",
            "-s",
            samples.to_str().unwrap(),
            "-v",
            variants.to_str().unwrap(),
            "-c",
            coverage_path.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run vartier report");
    assert!(status.success());

    // Tier sheets hold the expected variants
    let tier1_pass_sheet =
        fs::read_to_string(out_dir.join("S1.report.tier1_pass.txt")).unwrap();
    assert!(tier1_pass_sheet.starts_with("Sample\tLibrary\tGene"));
    assert!(tier1_pass_sheet.contains("COSM123"));
    assert_eq!(tier1_pass_sheet.lines().count(), 2);

    let tier1_fail_sheet =
        fs::read_to_string(out_dir.join("S1.report.tier1_fail.txt")).unwrap();
    assert!(tier1_fail_sheet.contains("COSM456"));

    let tier3_pass_sheet =
        fs::read_to_string(out_dir.join("S1.report.tier3_pass.txt")).unwrap();
    assert!(tier3_pass_sheet.contains("benign"));

    // The filtered and off-target variants reached no sheet
    for sheet in ["tier4_pass", "tier4_fail"] {
        let content = fs::read_to_string(out_dir.join(format!("S1.report.{sheet}.txt"))).unwrap();
        assert_eq!(content.lines().count(), 1, "{sheet} should hold only the header");
    }

    // Coverage sheet carries run context and rows
    let coverage_sheet = fs::read_to_string(out_dir.join("S1.report.coverage.txt")).unwrap();
    assert!(coverage_sheet.contains("Sample\tS1"));
    assert!(coverage_sheet.contains("Run ID\tR1"));
    assert!(coverage_sheet.contains("AMPL1\t1500\t480.5"));

    // Metrics: 4 retrieved (common excluded at retrieval), 1 off-target
    let metrics = fs::read_to_string(out_dir.join("S1.report.metrics.txt")).unwrap();
    let data_line = metrics.lines().nth(1).unwrap();
    let fields: Vec<&str> = data_line.split('\t').collect();
    let header: Vec<&str> = metrics.lines().next().unwrap().split('\t').collect();
    let field_of = |name: &str| fields[header.iter().position(|h| *h == name).unwrap()];
    assert_eq!(field_of("variants_retrieved"), "4");
    assert_eq!(field_of("variants_iterated"), "4");
    assert_eq!(field_of("off_target"), "1");
    assert_eq!(field_of("tier1_pass"), "1");
    assert_eq!(field_of("tier1_fail"), "1");
    assert_eq!(field_of("tier3_pass"), "1");

    // Off-target tallies by region
    let off_target = fs::read_to_string(out_dir.join("S1.report.off_target.txt")).unwrap();
    assert!(off_target.contains("None\t1"));

    // Plain-text reporting log
    let log = fs::read_to_string(out_dir.join("S1.report.log")).unwrap();
    assert!(log.starts_with("Reporting Log for sample S1"));
    assert!(log.contains("Processing variants for library L1"));
    assert!(log.contains("Retrieved 4 total variants"));
    assert!(log.contains("L1: passing 1 tier 1 variants"));
}

#[test]
fn test_report_command_multiple_samples() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("reports");

    let s1_variant = observation("7", 100, "AMPL1");
    let mut s2_variant = observation("7", 100, "AMPL1");
    s2_variant.sample = "S2".to_string();
    s2_variant.library = "L2".to_string();

    let variants = write_variant_snapshot(dir.path(), &[s1_variant, s2_variant]);
    let coverage_path = write_coverage_snapshot(dir.path(), &[coverage("AMPL1", 1500, 480.5)]);
    let panel = write_panel(dir.path(), &["AMPL1"]);
    let samples = write_sample_sheet(
        dir.path(),
        &[("S1", "L1", "R1", &panel), ("S2", "L2", "R1", &panel)],
    );

    let status = Command::new(vartier_binary())
        .args([
            "report",
            "-s",
            samples.to_str().unwrap(),
            "-v",
            variants.to_str().unwrap(),
            "-c",
            coverage_path.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run vartier report");
    assert!(status.success());

    // Each sample gets its own report set; the shared identity counts twice
    for sample in ["S1", "S2"] {
        let sheet =
            fs::read_to_string(out_dir.join(format!("{sample}.report.tier4_pass.txt"))).unwrap();
        assert_eq!(sheet.lines().count(), 2);
        let row = sheet.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields[9], "2", "cohort count spans samples");
    }
}

#[test]
fn test_report_command_restricted_caller_columns() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("reports");

    let variants = write_variant_snapshot(dir.path(), &[observation("7", 100, "AMPL1")]);
    let coverage_path = write_coverage_snapshot(dir.path(), &[coverage("AMPL1", 1500, 480.5)]);
    let panel = write_panel(dir.path(), &["AMPL1"]);
    let samples = write_sample_sheet(dir.path(), &[("S1", "L1", "R1", &panel)]);

    let status = Command::new(vartier_binary())
        .args([
            "report",
            "-s",
            samples.to_str().unwrap(),
            "-v",
            variants.to_str().unwrap(),
            "-c",
            coverage_path.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--callers",
            "vardict,mutect",
        ])
        .status()
        .expect("Failed to run vartier report");
    assert!(status.success());

    let sheet = fs::read_to_string(out_dir.join("S1.report.tier4_pass.txt")).unwrap();
    let header = sheet.lines().next().unwrap();
    // Active-set order, and only the active callers
    assert!(header.ends_with("VarDict_AF\tMuTect_AF"));
    assert!(!header.contains("FreeBayes_AF"));
}

#[test]
fn test_report_command_fails_cleanly_on_missing_panel() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("reports");

    let variants = write_variant_snapshot(dir.path(), &[observation("7", 100, "AMPL1")]);
    let coverage_path = write_coverage_snapshot(dir.path(), &[]);
    let missing_panel = dir.path().join("missing_panel.bed");
    let samples = write_sample_sheet(dir.path(), &[("S1", "L1", "R1", &missing_panel)]);

    let output = Command::new(vartier_binary())
        .args([
            "report",
            "-s",
            samples.to_str().unwrap(),
            "-v",
            variants.to_str().unwrap(),
            "-c",
            coverage_path.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run vartier report");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("panel"));
}

#[test]
fn test_report_command_rejects_unknown_caller() {
    let dir = TempDir::new().unwrap();

    let variants = write_variant_snapshot(dir.path(), &[observation("7", 100, "AMPL1")]);
    let coverage_path = write_coverage_snapshot(dir.path(), &[]);
    let panel = write_panel(dir.path(), &["AMPL1"]);
    let samples = write_sample_sheet(dir.path(), &[("S1", "L1", "R1", &panel)]);

    let output = Command::new(vartier_binary())
        .args([
            "report",
            "-s",
            samples.to_str().unwrap(),
            "-v",
            variants.to_str().unwrap(),
            "-c",
            coverage_path.to_str().unwrap(),
            "--callers",
            "mutect,strelka",
        ])
        .output()
        .expect("Failed to run vartier report");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("strelka"));
}
