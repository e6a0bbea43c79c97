//! Enhanced logging utilities for formatted output.
//!
//! This module provides consistent logging helpers for report summaries and
//! operation timing, plus the per-sample plain-text reporting log that
//! accompanies each report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::metrics::LibraryReportMetrics;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use vartier_lib::logging::format_count;
///
/// assert_eq!(format_count(123), "123");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();

    bytes
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a percentage with specified decimal places.
///
/// # Examples
///
/// ```
/// use vartier_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use vartier_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Logs a formatted summary of one library's report tallies.
pub fn log_library_summary(metrics: &LibraryReportMetrics) {
    log::info!("Variant Reporting Summary for library {}:", metrics.library);
    log::info!("  Retrieved: {}", format_count(metrics.variants_retrieved));
    log::info!("  Iterated: {}", format_count(metrics.variants_iterated));
    log::info!("  Off-target: {}", format_count(metrics.off_target));
    log::info!(
        "  Tier 1: {} pass / {} fail",
        format_count(metrics.tier1_pass),
        format_count(metrics.tier1_fail)
    );
    log::info!(
        "  Tier 3: {} pass / {} fail",
        format_count(metrics.tier3_pass),
        format_count(metrics.tier3_fail)
    );
    log::info!(
        "  Tier 4: {} pass / {} fail",
        format_count(metrics.tier4_pass),
        format_count(metrics.tier4_fail)
    );
    if metrics.variants_iterated > 0 {
        let pass_rate = metrics.passing_total() as f64 / metrics.variants_iterated as f64;
        log::info!("  Pass rate: {}", format_percent(pass_rate, 2));
    }
}

/// Operation timing and summary helper.
///
/// Tracks operation timing and provides formatted summary output.
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with an item count.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {}",
            self.operation,
            format_count(count),
            format_duration(duration)
        );
    }
}

/// Per-sample plain-text reporting log.
///
/// One file per sample (`<sample>.<report>.log`), opened with a run header
/// and appended to as each library is processed. Informational only, never
/// machine-parsed downstream.
pub struct ReportLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl ReportLog {
    /// Creates the log file and writes the run header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(dir: &Path, sample: &str, report_name: &str) -> Result<Self> {
        let path = dir.join(format!("{sample}.{report_name}.log"));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create reporting log: {}", path.display()))?;
        let mut log = Self { writer: BufWriter::new(file), path };
        log.line(&format!("Reporting Log for sample {sample}"))?;
        log.line("---------------------------------------------")?;
        Ok(log)
    }

    /// Appends one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    pub fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")
            .with_context(|| format!("Failed to write reporting log: {}", self.path.display()))
    }

    /// Appends the per-library summary lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be written.
    pub fn library_summary(&mut self, metrics: &LibraryReportMetrics) -> Result<()> {
        self.line(&format!(
            "{}: iterated through {} variants",
            metrics.library, metrics.variants_iterated
        ))?;
        self.line(&format!(
            "{}: filtered {} off-target variants",
            metrics.library, metrics.off_target
        ))?;
        self.line(&format!(
            "{}: passing {} tier 1 variants",
            metrics.library, metrics.tier1_pass
        ))?;
        self.line(&format!(
            "{}: passing {} tier 3 variants",
            metrics.library, metrics.tier3_pass
        ))?;
        self.line(&format!(
            "{}: passing {} tier 4 variants",
            metrics.library, metrics.tier4_pass
        ))?;
        Ok(())
    }

    /// Flushes buffered lines to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush reporting log: {}", self.path.display()))
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
