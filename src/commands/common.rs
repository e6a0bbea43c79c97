//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use vartier_lib::tier::Thresholds;
use vartier_lib::validation::{parse_active_callers, validate_file_exists};
use vartier_lib::variant::Caller;

/// Store snapshot inputs for commands that query the variant store.
#[derive(Debug, Clone, Args)]
pub struct StoreOptions {
    /// Variant store snapshot (TSV)
    #[arg(short = 'v', long = "variants")]
    pub variants: PathBuf,
}

impl StoreOptions {
    /// Validates that the snapshot file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot file does not exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.variants, "Variant store snapshot")?;
        Ok(())
    }
}

/// Reporting quality thresholds.
#[derive(Debug, Clone, Args)]
pub struct ThresholdOptions {
    /// Minimum reportable somatic variant allele fraction
    #[arg(short = 't', long = "min-somatic-af", default_value = "0.01")]
    pub min_somatic_af: f64,

    /// Minimum depth threshold for variant reporting
    #[arg(short = 'd', long = "min-depth", default_value = "200.0")]
    pub min_depth: f64,

    /// Maximum allowed population allele frequency
    #[arg(short = 'p', long = "max-pop-af", default_value = "0.005")]
    pub max_pop_af: f64,
}

impl ThresholdOptions {
    /// Builds the validated threshold set.
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is outside its valid range.
    pub fn to_thresholds(&self) -> anyhow::Result<Thresholds> {
        let thresholds = Thresholds {
            min_somatic_aaf: self.min_somatic_af,
            min_depth: self.min_depth,
            max_pop_aaf: self.max_pop_af,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        let defaults = Thresholds::default();
        Self {
            min_somatic_af: defaults.min_somatic_aaf,
            min_depth: defaults.min_depth,
            max_pop_af: defaults.max_pop_aaf,
        }
    }
}

/// The ordered active-caller set for dynamic report columns.
#[derive(Debug, Clone, Args)]
pub struct CallerOptions {
    /// Active callers, in column order
    #[arg(
        long = "callers",
        value_delimiter = ',',
        default_value = "mutect,vardict,freebayes,scalpel,platypus,pindel"
    )]
    pub callers: Vec<String>,
}

impl CallerOptions {
    /// Parses the configured names against the supported vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown caller name or an empty set.
    pub fn to_callers(&self) -> anyhow::Result<Vec<Caller>> {
        Ok(parse_active_callers(&self.callers)?)
    }
}

impl Default for CallerOptions {
    fn default() -> Self {
        Self { callers: Caller::VOCABULARY.iter().map(|c| c.name().to_string()).collect() }
    }
}
