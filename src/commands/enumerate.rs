//! Cohort-wide variant enumeration.
//!
//! Scans every observation in the variant store, groups by genomic
//! identity, and writes one record per distinct variant: the flattened
//! identity key, how many times it has been observed, and per-caller
//! detection counts over the supported vocabulary.

use ahash::AHashMap;
use anyhow::Result;
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use vartier_lib::cohort::CallerCounts;
use vartier_lib::logging::{format_count, OperationTimer};
use vartier_lib::metrics::write_metrics;
use vartier_lib::store::{retrieve_all_observations, TsvVariantStore};
use vartier_lib::variant::{Caller, VariantIdentity};

use crate::commands::command::Command;
use crate::commands::common::StoreOptions;

/// One output record of the enumeration: a distinct variant identity with
/// its cohort-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumerationRecord {
    /// Flattened identity key (genome-chrom-pos-ref-alt)
    pub variant_key: String,
    /// Total observations of this identity
    pub num_instances: u64,
    /// Detections by MuTect
    pub num_mutect: u64,
    /// Detections by VarDict
    pub num_vardict: u64,
    /// Detections by FreeBayes
    pub num_freebayes: u64,
    /// Detections by Scalpel
    pub num_scalpel: u64,
    /// Detections by Platypus
    pub num_platypus: u64,
    /// Detections by Pindel
    pub num_pindel: u64,
}

impl EnumerationRecord {
    fn new(identity: &VariantIdentity, instances: u64, counts: &CallerCounts) -> Self {
        Self {
            variant_key: identity.key(),
            num_instances: instances,
            num_mutect: counts.get(Caller::Mutect),
            num_vardict: counts.get(Caller::Vardict),
            num_freebayes: counts.get(Caller::Freebayes),
            num_scalpel: counts.get(Caller::Scalpel),
            num_platypus: counts.get(Caller::Platypus),
            num_pindel: counts.get(Caller::Pindel),
        }
    }
}

/// Enumerate distinct variants across the whole cohort.
///
/// Produces one TSV row per distinct variant identity with observation and
/// per-caller detection counts.
#[derive(Debug, Parser)]
#[command(
    name = "enumerate",
    about = "\x1b[38;5;72m[REPORTING]\x1b[0m      \x1b[36mEnumerate distinct variants across the cohort with caller counts\x1b[0m",
    long_about = r#"
Enumerate distinct variants across the whole cohort.

Every observation in the variant store is grouped by genomic identity
(genome, chromosome, position, ref, alt). One record is written per
distinct identity:

  variant_key     genome-chrom-pos-ref-alt
  num_instances   observations across all samples and runs
  num_<caller>    detections per supported caller

Records are sorted by identity for stable output.

EXAMPLES:

  vartier enumerate -v variants.txt -o variant_counts.txt
"#
)]
pub struct Enumerate {
    #[command(flatten)]
    pub store: StoreOptions,

    /// Output file for enumeration records (TSV)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl Command for Enumerate {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("Command line: {command_line}");
        self.store.validate()?;

        let timer = OperationTimer::new("Enumerating cohort variants");
        let store = TsvVariantStore::load(&self.store.variants)?;
        let observations = retrieve_all_observations(&store)?;
        info!("Retrieved {} variants from the database", format_count(observations.len() as u64));

        let mut by_identity: AHashMap<VariantIdentity, (u64, CallerCounts)> = AHashMap::new();
        for obs in &observations {
            let entry = by_identity.entry(obs.identity.clone()).or_default();
            entry.0 += 1;
            entry.1.record_all(&obs.callers);
        }

        let mut identities: Vec<&VariantIdentity> = by_identity.keys().collect();
        identities.sort();

        let records: Vec<EnumerationRecord> = identities
            .iter()
            .map(|&identity| {
                let (instances, counts) = &by_identity[identity];
                EnumerationRecord::new(identity, *instances, counts)
            })
            .collect();

        write_metrics(&self.output, &records, "variant enumeration")?;
        timer.log_completion(records.len() as u64);
        info!("Wrote {} distinct variants to {}", records.len(), self.output.display());
        Ok(())
    }
}
