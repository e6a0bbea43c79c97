//! Core variant domain types.
//!
//! This module defines the genomic identity key used for cohort lookups, the
//! per-sample variant observation record, and the fixed vocabulary of
//! supported variant callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::VartierError;

/// The fixed vocabulary of variant callers whose allele fractions can be
/// reported.
///
/// Observations may name callers outside this vocabulary; those detections
/// never reach report columns or caller-count accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Caller {
    /// MuTect somatic SNV caller
    Mutect,
    /// VarDict somatic caller
    Vardict,
    /// FreeBayes haplotype-based caller
    Freebayes,
    /// Scalpel indel caller
    Scalpel,
    /// Platypus haplotype-based caller
    Platypus,
    /// Pindel structural/indel caller
    Pindel,
}

impl Caller {
    /// All supported callers, in canonical report-column order.
    pub const VOCABULARY: [Caller; 6] = [
        Caller::Mutect,
        Caller::Vardict,
        Caller::Freebayes,
        Caller::Scalpel,
        Caller::Platypus,
        Caller::Pindel,
    ];

    /// Number of supported callers.
    pub const COUNT: usize = Self::VOCABULARY.len();

    /// The lowercase name used in store records and configuration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Caller::Mutect => "mutect",
            Caller::Vardict => "vardict",
            Caller::Freebayes => "freebayes",
            Caller::Scalpel => "scalpel",
            Caller::Platypus => "platypus",
            Caller::Pindel => "pindel",
        }
    }

    /// The allele-fraction column label used in report output.
    #[must_use]
    pub fn column_label(&self) -> &'static str {
        match self {
            Caller::Mutect => "MuTect_AF",
            Caller::Vardict => "VarDict_AF",
            Caller::Freebayes => "FreeBayes_AF",
            Caller::Scalpel => "Scalpel_AF",
            Caller::Platypus => "Platypus_AF",
            Caller::Pindel => "Pindel_AF",
        }
    }

    /// Index of this caller within [`Caller::VOCABULARY`].
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Looks up a caller by its lowercase store/configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Caller> {
        Self::VOCABULARY.iter().copied().find(|c| c.name() == name)
    }

    /// Comma-separated list of supported caller names, for error messages.
    #[must_use]
    pub fn supported_names() -> String {
        Self::VOCABULARY.iter().map(|c| c.name()).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Caller {
    type Err = VartierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| VartierError::UnknownCaller {
            name: s.to_string(),
            supported: Self::supported_names(),
        })
    }
}

/// Functional severity of a variant's predicted effect.
///
/// Ordinal: `Low < Med < High`. Unrecognized store values are treated as
/// [`Severity::Low`] by [`Severity::parse_lossy`] so that a single malformed
/// annotation cannot abort a reporting unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Low predicted impact
    #[default]
    Low,
    /// Medium predicted impact
    Med,
    /// High predicted impact
    High,
}

impl Severity {
    /// The uppercase form used in store records and report output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Med => "MED",
            Severity::High => "HIGH",
        }
    }

    /// Parses a severity, substituting [`Severity::Low`] for unrecognized
    /// values (data-quality anomaly handling).
    #[must_use]
    pub fn parse_lossy(s: &str) -> Severity {
        s.parse().unwrap_or(Severity::Low)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = VartierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MED" => Ok(Severity::Med),
            "HIGH" => Ok(Severity::High),
            other => Err(VartierError::InvalidParameter {
                parameter: "severity".to_string(),
                reason: format!("unrecognized value '{other}'"),
            }),
        }
    }
}

/// The genomic identity of a variant: the natural key for cohort lookups.
///
/// Two observations are the same variant iff all five fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantIdentity {
    /// Reference genome build (e.g., "GRCh37")
    pub reference_genome: String,
    /// Chromosome name
    pub chrom: String,
    /// 1-based start position
    pub pos: u64,
    /// Reference allele
    pub ref_allele: String,
    /// Alternate allele
    pub alt_allele: String,
}

impl VariantIdentity {
    /// The flattened `genome-chrom-pos-ref-alt` key used in enumeration
    /// output.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.reference_genome, self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

impl fmt::Display for VariantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// One sample/library/run's sighting of a [`VariantIdentity`], carrying the
/// annotations attached upstream of reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantObservation {
    /// Genomic identity of the variant
    pub identity: VariantIdentity,
    /// 1-based end position
    pub end: u64,
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Callers that detected this variant, in store order
    pub callers: Vec<Caller>,
    /// Per-caller somatic allele fractions; a detecting caller with no
    /// recorded fraction is a data-quality anomaly rendered as the no-data
    /// marker
    pub caller_aaf: BTreeMap<Caller, f64>,
    /// Maximum somatic allele fraction across callers
    pub max_som_aaf: f64,
    /// Minimum depth reported across callers
    pub min_depth: f64,
    /// Maximum depth reported across callers
    pub max_depth: f64,
    /// Maximum population allele frequency across population databases
    pub max_pop_aaf: f64,
    /// Region assignment: the no-region sentinel or a comma-separated list
    /// of region identifiers
    pub region_field: String,
    /// COSMIC identifiers
    pub cosmic_ids: Vec<String>,
    /// COSMIC sample count annotation (free text)
    pub cosmic_num_samples: String,
    /// COSMIC amino-acid annotation (free text)
    pub cosmic_aa: String,
    /// ClinVar significance terms
    pub clinvar_significance: Vec<String>,
    /// ClinVar HGVS annotation (free text)
    pub clinvar_hgvs: String,
    /// ClinVar disease annotation (free text)
    pub clinvar_disease: String,
    /// dbSNP rs identifiers
    pub rs_ids: Vec<String>,
    /// Predicted severity
    pub severity: Severity,
    /// Predicted impact (free text)
    pub impact: String,
    /// Gene symbol
    pub gene: String,
    /// Transcript identifier
    pub transcript: String,
    /// Codon change (free text, may be long)
    pub codon_change: String,
    /// Amino-acid change (free text, may be long)
    pub aa_change: String,
}

impl VariantObservation {
    /// The allele fraction reported by `caller`, if it detected this variant
    /// and recorded one.
    #[must_use]
    pub fn aaf_for(&self, caller: Caller) -> Option<f64> {
        self.caller_aaf.get(&caller).copied()
    }
}
