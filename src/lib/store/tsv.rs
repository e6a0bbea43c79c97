//! TSV-backed read-only store adapters.
//!
//! Store snapshots are tab-delimited files with one row per observation;
//! list-valued fields are comma-joined and per-caller allele fractions are
//! one optional column per supported caller. The adapters load a snapshot
//! fully into memory and answer the query contracts over it, which also
//! makes them the reference implementation for tests.

use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageObservation;
use crate::store::{CoverageQuery, CoverageStore, VariantQuery, VariantStore};
use crate::variant::{Caller, Severity, VariantIdentity, VariantObservation};

/// One variant observation row of a store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Reference genome build
    pub reference_genome: String,
    /// Chromosome name
    pub chrom: String,
    /// 1-based start position
    pub pos: u64,
    /// Reference allele
    #[serde(rename = "ref")]
    pub ref_allele: String,
    /// Alternate allele
    #[serde(rename = "alt")]
    pub alt_allele: String,
    /// 1-based end position
    pub end: u64,
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library_name: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Comma-joined caller names
    pub callers: String,
    /// Region field: sentinel or comma-joined region identifiers
    pub amplicon: String,
    /// Gene symbol
    pub gene: String,
    /// Transcript identifier
    pub transcript: String,
    /// Codon change
    pub codon_change: String,
    /// Amino-acid change
    pub aa_change: String,
    /// Severity (LOW/MED/HIGH)
    pub severity: String,
    /// Predicted impact
    pub impact: String,
    /// Maximum somatic allele fraction across callers
    pub max_som_aaf: f64,
    /// Minimum caller depth
    pub min_depth: f64,
    /// Maximum caller depth
    pub max_depth: f64,
    /// Maximum population allele frequency
    pub max_maf_all: f64,
    /// Comma-joined COSMIC identifiers
    pub cosmic_ids: String,
    /// COSMIC sample count annotation
    pub cosmic_num_samples: String,
    /// COSMIC amino-acid annotation
    pub cosmic_aa: String,
    /// Comma-joined ClinVar significance terms
    pub clinvar_significance: String,
    /// ClinVar HGVS annotation
    pub clinvar_hgvs: String,
    /// ClinVar disease annotation
    pub clinvar_disease: String,
    /// Comma-joined rs identifiers
    pub rs_ids: String,
    /// MuTect allele fraction, if called
    pub mutect_aaf: Option<f64>,
    /// VarDict allele fraction, if called
    pub vardict_aaf: Option<f64>,
    /// FreeBayes allele fraction, if called
    pub freebayes_aaf: Option<f64>,
    /// Scalpel allele fraction, if called
    pub scalpel_aaf: Option<f64>,
    /// Platypus allele fraction, if called
    pub platypus_aaf: Option<f64>,
    /// Pindel allele fraction, if called
    pub pindel_aaf: Option<f64>,
}

fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() || field == "None" {
        return Vec::new();
    }
    field.split(',').map(str::to_string).collect()
}

fn join_list(values: &[String]) -> String {
    values.join(",")
}

impl VariantRecord {
    fn caller_aaf_field(&self, caller: Caller) -> Option<f64> {
        match caller {
            Caller::Mutect => self.mutect_aaf,
            Caller::Vardict => self.vardict_aaf,
            Caller::Freebayes => self.freebayes_aaf,
            Caller::Scalpel => self.scalpel_aaf,
            Caller::Platypus => self.platypus_aaf,
            Caller::Pindel => self.pindel_aaf,
        }
    }

    /// Converts a snapshot row into the domain observation.
    ///
    /// Caller names outside the vocabulary and unrecognized severities are
    /// data-quality anomalies: the former are dropped, the latter read as
    /// LOW.
    #[must_use]
    pub fn into_observation(self) -> VariantObservation {
        let callers: Vec<Caller> = self
            .callers
            .split(',')
            .filter(|name| !name.is_empty())
            .filter_map(|name| {
                let caller = Caller::from_name(name);
                if caller.is_none() {
                    log::debug!("Dropping unsupported caller '{name}' from store record");
                }
                caller
            })
            .collect();

        let caller_aaf = Caller::VOCABULARY
            .iter()
            .filter_map(|&c| self.caller_aaf_field(c).map(|aaf| (c, aaf)))
            .collect();

        VariantObservation {
            identity: VariantIdentity {
                reference_genome: self.reference_genome,
                chrom: self.chrom,
                pos: self.pos,
                ref_allele: self.ref_allele,
                alt_allele: self.alt_allele,
            },
            end: self.end,
            sample: self.sample,
            library: self.library_name,
            run_id: self.run_id,
            callers,
            caller_aaf,
            max_som_aaf: self.max_som_aaf,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            max_pop_aaf: self.max_maf_all,
            region_field: self.amplicon,
            cosmic_ids: split_list(&self.cosmic_ids),
            cosmic_num_samples: self.cosmic_num_samples,
            cosmic_aa: self.cosmic_aa,
            clinvar_significance: split_list(&self.clinvar_significance),
            clinvar_hgvs: self.clinvar_hgvs,
            clinvar_disease: self.clinvar_disease,
            rs_ids: split_list(&self.rs_ids),
            severity: Severity::parse_lossy(&self.severity),
            impact: self.impact,
            gene: self.gene,
            transcript: self.transcript,
            codon_change: self.codon_change,
            aa_change: self.aa_change,
        }
    }
}

impl From<&VariantObservation> for VariantRecord {
    fn from(obs: &VariantObservation) -> Self {
        Self {
            reference_genome: obs.identity.reference_genome.clone(),
            chrom: obs.identity.chrom.clone(),
            pos: obs.identity.pos,
            ref_allele: obs.identity.ref_allele.clone(),
            alt_allele: obs.identity.alt_allele.clone(),
            end: obs.end,
            sample: obs.sample.clone(),
            library_name: obs.library.clone(),
            run_id: obs.run_id.clone(),
            callers: obs.callers.iter().map(Caller::name).collect::<Vec<_>>().join(","),
            amplicon: obs.region_field.clone(),
            gene: obs.gene.clone(),
            transcript: obs.transcript.clone(),
            codon_change: obs.codon_change.clone(),
            aa_change: obs.aa_change.clone(),
            severity: obs.severity.as_str().to_string(),
            impact: obs.impact.clone(),
            max_som_aaf: obs.max_som_aaf,
            min_depth: obs.min_depth,
            max_depth: obs.max_depth,
            max_maf_all: obs.max_pop_aaf,
            cosmic_ids: join_list(&obs.cosmic_ids),
            cosmic_num_samples: obs.cosmic_num_samples.clone(),
            cosmic_aa: obs.cosmic_aa.clone(),
            clinvar_significance: join_list(&obs.clinvar_significance),
            clinvar_hgvs: obs.clinvar_hgvs.clone(),
            clinvar_disease: obs.clinvar_disease.clone(),
            rs_ids: join_list(&obs.rs_ids),
            mutect_aaf: obs.aaf_for(Caller::Mutect),
            vardict_aaf: obs.aaf_for(Caller::Vardict),
            freebayes_aaf: obs.aaf_for(Caller::Freebayes),
            scalpel_aaf: obs.aaf_for(Caller::Scalpel),
            platypus_aaf: obs.aaf_for(Caller::Platypus),
            pindel_aaf: obs.aaf_for(Caller::Pindel),
        }
    }
}

/// One coverage row of a store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    /// Region identifier
    pub region: String,
    /// Sample identifier
    pub sample: String,
    /// Sequencing library identifier
    pub library_name: String,
    /// Sequencing run identifier
    pub run_id: String,
    /// Coverage-producing program
    pub program_name: String,
    /// Number of reads assigned to the region
    pub num_reads: u64,
    /// Mean depth of coverage over the region
    pub mean_coverage: f64,
}

impl CoverageRecord {
    /// Converts a snapshot row into the domain observation.
    #[must_use]
    pub fn into_observation(self) -> CoverageObservation {
        CoverageObservation {
            region: self.region,
            sample: self.sample,
            library: self.library_name,
            run_id: self.run_id,
            program: self.program_name,
            num_reads: self.num_reads,
            mean_coverage: self.mean_coverage,
        }
    }
}

impl From<&CoverageObservation> for CoverageRecord {
    fn from(obs: &CoverageObservation) -> Self {
        Self {
            region: obs.region.clone(),
            sample: obs.sample.clone(),
            library_name: obs.library.clone(),
            run_id: obs.run_id.clone(),
            program_name: obs.program.clone(),
            num_reads: obs.num_reads,
            mean_coverage: obs.mean_coverage,
        }
    }
}

/// In-memory variant store loaded from a TSV snapshot.
#[derive(Debug, Clone, Default)]
pub struct TsvVariantStore {
    observations: Vec<VariantObservation>,
}

impl TsvVariantStore {
    /// Builds a store over already-parsed observations.
    #[must_use]
    pub fn from_observations(observations: Vec<VariantObservation>) -> Self {
        Self { observations }
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row fails to parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let records: Vec<VariantRecord> = DelimFile::default()
            .read_tsv(&path_ref)
            .with_context(|| format!("Failed to read variant store snapshot: {}", path_ref.display()))?;
        Ok(Self::from_observations(
            records.into_iter().map(VariantRecord::into_observation).collect(),
        ))
    }

    /// Writes observations as a snapshot file (test fixtures, exports).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_snapshot<P: AsRef<Path>>(
        path: P,
        observations: &[VariantObservation],
    ) -> Result<()> {
        let path_ref = path.as_ref();
        let records: Vec<VariantRecord> = observations.iter().map(VariantRecord::from).collect();
        DelimFile::default()
            .write_tsv(&path_ref, records)
            .with_context(|| format!("Failed to write variant store snapshot: {}", path_ref.display()))
    }

    /// Number of observations in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    fn matches_query(obs: &VariantObservation, query: &VariantQuery) -> bool {
        obs.identity.reference_genome == query.reference_genome
            && obs.sample == query.sample
            && obs.library == query.library
            && obs.run_id == query.run_id
            && obs.max_pop_aaf <= query.max_pop_aaf
    }
}

impl VariantStore for TsvVariantStore {
    fn count_sample_variants(&self, query: &VariantQuery) -> Result<usize> {
        Ok(self.observations.iter().filter(|o| Self::matches_query(o, query)).count())
    }

    fn fetch_sample_variants(
        &self,
        query: &VariantQuery,
        limit: usize,
    ) -> Result<Vec<VariantObservation>> {
        Ok(self
            .observations
            .iter()
            .filter(|o| Self::matches_query(o, query))
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_cohort_observations(&self, identity: &VariantIdentity) -> Result<usize> {
        Ok(self.observations.iter().filter(|o| &o.identity == identity).count())
    }

    fn fetch_cohort_observations(
        &self,
        identity: &VariantIdentity,
        limit: usize,
    ) -> Result<Vec<VariantObservation>> {
        Ok(self
            .observations
            .iter()
            .filter(|o| &o.identity == identity)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_all_observations(&self) -> Result<usize> {
        Ok(self.observations.len())
    }

    fn fetch_all_observations(&self, limit: usize) -> Result<Vec<VariantObservation>> {
        Ok(self.observations.iter().take(limit).cloned().collect())
    }
}

/// In-memory coverage store loaded from a TSV snapshot.
#[derive(Debug, Clone, Default)]
pub struct TsvCoverageStore {
    observations: Vec<CoverageObservation>,
}

impl TsvCoverageStore {
    /// Builds a store over already-parsed observations.
    #[must_use]
    pub fn from_observations(observations: Vec<CoverageObservation>) -> Self {
        Self { observations }
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row fails to parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let records: Vec<CoverageRecord> = DelimFile::default()
            .read_tsv(&path_ref)
            .with_context(|| format!("Failed to read coverage store snapshot: {}", path_ref.display()))?;
        Ok(Self::from_observations(
            records.into_iter().map(CoverageRecord::into_observation).collect(),
        ))
    }

    /// Writes observations as a snapshot file (test fixtures, exports).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_snapshot<P: AsRef<Path>>(
        path: P,
        observations: &[CoverageObservation],
    ) -> Result<()> {
        let path_ref = path.as_ref();
        let records: Vec<CoverageRecord> = observations.iter().map(CoverageRecord::from).collect();
        DelimFile::default()
            .write_tsv(&path_ref, records)
            .with_context(|| format!("Failed to write coverage store snapshot: {}", path_ref.display()))
    }

    fn matches_query(obs: &CoverageObservation, query: &CoverageQuery) -> bool {
        obs.sample == query.sample
            && obs.library == query.library
            && obs.run_id == query.run_id
            && obs.program == query.program
            && obs.region == query.region
    }
}

impl CoverageStore for TsvCoverageStore {
    fn count_region_coverage(&self, query: &CoverageQuery) -> Result<usize> {
        Ok(self.observations.iter().filter(|o| Self::matches_query(o, query)).count())
    }

    fn fetch_region_coverage(
        &self,
        query: &CoverageQuery,
        limit: usize,
    ) -> Result<Vec<CoverageObservation>> {
        Ok(self
            .observations
            .iter()
            .filter(|o| Self::matches_query(o, query))
            .take(limit)
            .cloned()
            .collect())
    }
}
