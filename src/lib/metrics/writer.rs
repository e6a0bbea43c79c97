//! Utilities for writing metrics files.
//!
//! Convenience wrappers around `DelimFile::write_tsv` with consistent error
//! messages across commands.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::Serialize;
use std::path::Path;

use super::Metric;

/// Write metrics to a TSV file with consistent error handling.
///
/// # Arguments
/// * `path` - Path to the output TSV file
/// * `metrics` - The metrics to write (must implement Serialize)
/// * `description` - Human-readable description of the metrics for error messages
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics<P: AsRef<Path>, T: Serialize>(
    path: P,
    metrics: &[T],
    description: &str,
) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default()
        .write_tsv(&path_ref, metrics)
        .with_context(|| format!("Failed to write {} metrics: {}", description, path_ref.display()))
}

/// Write metrics implementing the [`Metric`] trait to a TSV file, using the
/// metric's own name in error messages.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics_auto<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    write_metrics(path, metrics, T::metric_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::LibraryReportMetrics;
    use fgoxide::io::DelimFile;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_metrics_success() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let metrics = vec![
            LibraryReportMetrics {
                sample: "S1".to_string(),
                library: "L1".to_string(),
                run_id: "R1".to_string(),
                variants_retrieved: 120,
                variants_iterated: 120,
                off_target: 5,
                tier1_pass: 2,
                ..Default::default()
            },
        ];

        write_metrics(temp_file.path(), &metrics, "test")?;

        let content = fs::read_to_string(temp_file.path())?;
        assert!(content.contains("variants_retrieved"));
        assert!(content.contains("120"));
        assert!(content.contains("S1"));

        Ok(())
    }

    #[test]
    fn test_write_metrics_invalid_path() {
        let metrics = vec![LibraryReportMetrics::default()];
        let result = write_metrics("/invalid/path/metrics.txt", &metrics, "test");
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Failed to write test metrics"));
        }
    }

    #[test]
    fn test_write_metrics_empty() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let metrics: Vec<LibraryReportMetrics> = vec![];
        write_metrics(temp_file.path(), &metrics, "empty")?;
        assert!(temp_file.path().exists());
        Ok(())
    }

    #[test]
    fn test_roundtrip_tsv() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let original = vec![
            LibraryReportMetrics {
                sample: "S1".to_string(),
                library: "L1".to_string(),
                run_id: "R1".to_string(),
                variants_iterated: 10,
                tier3_fail: 4,
                ..Default::default()
            },
            LibraryReportMetrics {
                sample: "S1".to_string(),
                library: "L2".to_string(),
                run_id: "R1".to_string(),
                variants_iterated: 20,
                tier4_pass: 7,
                ..Default::default()
            },
        ];

        write_metrics_auto(temp_file.path(), &original)?;
        let read: Vec<LibraryReportMetrics> = DelimFile::default().read_tsv(&temp_file.path())?;
        assert_eq!(original, read);

        Ok(())
    }
}
