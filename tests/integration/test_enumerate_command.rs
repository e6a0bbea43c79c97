//! End-to-end tests for `vartier enumerate`.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

use vartier_lib::variant::Caller;

use crate::helpers::{observation, vartier_binary, write_variant_snapshot};

#[test]
fn test_enumerate_command_groups_by_identity() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("variant_counts.txt");

    // The same identity observed twice, a second identity once
    let first = observation("7", 100, "AMPL1");
    let mut second = observation("7", 100, "AMPL1");
    second.sample = "S2".to_string();
    second.library = "L2".to_string();
    second.run_id = "R2".to_string();
    second.callers = vec![Caller::Mutect, Caller::Vardict];
    let mut other = observation("17", 500, "AMPL9");
    other.callers = vec![Caller::Pindel];

    let variants = write_variant_snapshot(dir.path(), &[first, second, other]);

    let status = Command::new(vartier_binary())
        .args([
            "enumerate",
            "-v",
            variants.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run vartier enumerate");
    assert!(status.success());

    let content = fs::read_to_string(&output_path).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("variant_key\tnum_instances\tnum_mutect"));

    let rows: Vec<Vec<&str>> = lines.map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 2);

    // Sorted by identity: chromosome "17" before "7"
    assert_eq!(rows[0][0], "GRCh37-17-500-A-T");
    assert_eq!(rows[0][1], "1");

    let shared = &rows[1];
    assert_eq!(shared[0], "GRCh37-7-100-A-T");
    assert_eq!(shared[1], "2");
    // Two MuTect detections, one VarDict
    assert_eq!(shared[2], "2");
    assert_eq!(shared[3], "1");
}

#[test]
fn test_enumerate_command_empty_store() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("variant_counts.txt");
    let variants = write_variant_snapshot(dir.path(), &[]);

    let status = Command::new(vartier_binary())
        .args([
            "enumerate",
            "-v",
            variants.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run vartier enumerate");
    assert!(status.success());
    assert!(output_path.exists());
}
