#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: Scientific/bioinformatics code intentionally casts between numeric types
// - missing_*_doc: Documentation improvements tracked separately
// - needless_pass_by_value: Some APIs designed for ownership transfer
// - unnecessary_wraps: Some Result returns are for API consistency
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::items_after_statements,
    clippy::unused_self,
    clippy::match_same_arms,
    clippy::unnecessary_wraps,
    clippy::too_many_lines,
    clippy::redundant_closure_for_method_calls,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::uninlined_format_args
)]

//! # vartier - Variant Cohort Statistics & Tiering Library
//!
//! This library decides which detected sequence variants are reportable for
//! a sequenced sample/library, ranks them by clinical significance, and
//! attaches contextual evidence: how often the same variant has been seen
//! across the historical cohort, and how well-covered its regions were.
//!
//! ## Overview
//!
//! The library is organized into several key modules:
//!
//! ### Core Functionality
//!
//! - **[`panel`]** - Target panel loading and region membership
//! - **[`cohort`]** - Cross-sample aggregate statistics per variant identity
//! - **[`coverage`]** - Coverage observations and the region-coverage join
//! - **[`tier`]** - The ordered tier decision policy and quality thresholds
//! - **[`engine`]** - The per-(sample, library) unit of work
//! - **[`report`]** - Report row assembly and output adapters
//!
//! ### Store Access
//!
//! - **[`store`]** - Query contracts for the variant and coverage stores,
//!   with count-then-limit paging and TSV snapshot adapters
//!
//! ### Utilities
//!
//! - **[`variant`]** - Variant identity, observations, caller vocabulary
//! - **[`stats`]** - Median, population std-dev, percentile rank
//! - **[`metrics`]** - Structured diagnostics and TSV writing
//! - **[`validation`]** - Input validation with structured errors
//! - **[`progress`]** - Progress tracking and logging
//! - **[`logging`]** - Formatted summaries and the per-sample report log
//!
//! ## Quick Start
//!
//! ```no_run
//! use vartier_lib::engine::{process_library, LibraryUnit, ReportConfig};
//! use vartier_lib::logging::ReportLog;
//! use vartier_lib::store::{TsvCoverageStore, TsvVariantStore};
//! use vartier_lib::tier::Thresholds;
//! use vartier_lib::variant::Caller;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> anyhow::Result<()> {
//! let variants = TsvVariantStore::load("variants.txt")?;
//! let coverage = TsvCoverageStore::load("coverage.txt")?;
//!
//! let config = ReportConfig {
//!     reference_genome: "GRCh37".to_string(),
//!     thresholds: Thresholds::default(),
//!     active_callers: Caller::VOCABULARY.to_vec(),
//!     coverage_program: "sambamba".to_string(),
//! };
//! let unit = LibraryUnit {
//!     sample: "S1".to_string(),
//!     library: "L1".to_string(),
//!     run_id: "R1".to_string(),
//!     panel_path: PathBuf::from("panel.bed"),
//! };
//!
//! let mut log = ReportLog::create(Path::new("."), &unit.sample, "report")?;
//! let output = process_library(&variants, &coverage, &config, &unit, &mut log)?;
//! println!("{} rows classified", output.rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Each (sample, library) unit reads its own panel, queries the stores, and
//! emits rows with no shared mutable state, so units are safe to run in
//! parallel over any worker pool as long as the store handles are `Sync`.

pub mod cohort;
pub mod coverage;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod progress;
pub mod report;
pub mod stats;
pub mod store;
pub mod tier;
pub mod validation;
pub mod variant;

// Re-export commonly used types
pub use errors::VartierError;
pub use tier::{Tier, TierAssignment, TierCall, Thresholds};
pub use variant::{Caller, VariantIdentity, VariantObservation};
