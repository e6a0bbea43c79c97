//! Priority tier classification for reportable variants.
//!
//! The decision policy is an explicit ordered rule list evaluated top-down;
//! the first matching rule selects the tier. The pass/fail sub-flag is
//! derived from quality thresholds within whichever tier was selected.
//! Classification is a pure function of the observation's annotation and
//! quality fields; population-frequency filtering happens at retrieval time
//! and never here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VartierError};
use crate::variant::{Severity, VariantObservation};

/// ClinVar significance terms that place a variant in tier 1.
pub const TIER1_CLINVAR_TERMS: [&str; 3] = ["pathogenic", "likely-pathogenic", "drug-response"];

/// Priority tier of a reportable variant. Tier 1 carries the highest
/// clinical relevance; there is no tier 2 in this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Known COSMIC or ClinVar-significant variants
    Tier1,
    /// Other MED/HIGH severity variants
    Tier3,
    /// Everything else
    Tier4,
}

impl Tier {
    /// All tiers in priority order.
    pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier3, Tier::Tier4];

    /// Uppercase form used in report output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Tier1 => "TIER1",
            Tier::Tier3 => "TIER3",
            Tier::Tier4 => "TIER4",
        }
    }

    /// Lowercase form used in output file names.
    #[must_use]
    pub fn file_label(&self) -> &'static str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier3 => "tier3",
            Tier::Tier4 => "tier4",
        }
    }

    /// Human-readable sheet description, mirroring the report layout.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Tier::Tier1 => "COSMIC/ClinVar",
            Tier::Tier3 => "Other MED/HIGH Impact",
            Tier::Tier4 => "LOW Impact",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality sub-flag attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierCall {
    /// Meets the somatic allele fraction and depth thresholds
    Pass,
    /// Below the somatic allele fraction or depth threshold
    Fail,
}

impl TierCall {
    /// Uppercase form used in report output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TierCall::Pass => "PASS",
            TierCall::Fail => "FAIL",
        }
    }

    /// Lowercase form used in output file names.
    #[must_use]
    pub fn file_label(&self) -> &'static str {
        match self {
            TierCall::Pass => "pass",
            TierCall::Fail => "fail",
        }
    }
}

impl fmt::Display for TierCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal (tier, pass/fail) assignment for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierAssignment {
    /// Priority tier
    pub tier: Tier,
    /// Quality sub-flag within the tier
    pub call: TierCall,
}

/// Reporting quality thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum reportable somatic allele fraction
    pub min_somatic_aaf: f64,
    /// Minimum maximum-caller depth
    pub min_depth: f64,
    /// Maximum allowed population allele frequency (applied at retrieval)
    pub max_pop_aaf: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { min_somatic_aaf: 0.01, min_depth: 200.0, max_pop_aaf: 0.005 }
    }
}

impl Thresholds {
    /// Validates threshold ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if a fraction threshold is outside [0, 1] or the
    /// depth threshold is negative.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_somatic_aaf) {
            return Err(VartierError::InvalidThreshold {
                name: "min-somatic-af".to_string(),
                value: self.min_somatic_aaf,
                min: 0.0,
                max: 1.0,
            });
        }
        if !(0.0..=1.0).contains(&self.max_pop_aaf) {
            return Err(VartierError::InvalidThreshold {
                name: "max-pop-af".to_string(),
                value: self.max_pop_aaf,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.min_depth < 0.0 {
            return Err(VartierError::InvalidThreshold {
                name: "min-depth".to_string(),
                value: self.min_depth,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(())
    }
}

/// One rule of the tier decision policy.
struct TierRule {
    tier: Tier,
    applies: fn(&VariantObservation) -> bool,
}

/// The decision policy, evaluated top-down; the final rule is a catch-all,
/// so the policy is exhaustive.
const TIER_RULES: [TierRule; 3] = [
    TierRule { tier: Tier::Tier1, applies: has_clinical_evidence },
    TierRule { tier: Tier::Tier3, applies: has_elevated_severity },
    TierRule { tier: Tier::Tier4, applies: |_| true },
];

fn has_clinical_evidence(obs: &VariantObservation) -> bool {
    !obs.cosmic_ids.is_empty()
        || obs
            .clinvar_significance
            .iter()
            .any(|term| TIER1_CLINVAR_TERMS.contains(&term.as_str()))
}

fn has_elevated_severity(obs: &VariantObservation) -> bool {
    obs.severity >= Severity::Med
}

/// Classifies one observation into its terminal (tier, pass/fail) pair.
#[must_use]
pub fn classify(obs: &VariantObservation, thresholds: &Thresholds) -> TierAssignment {
    let tier = TIER_RULES
        .iter()
        .find(|rule| (rule.applies)(obs))
        .map(|rule| rule.tier)
        .unwrap_or(Tier::Tier4);

    let call = if obs.max_som_aaf < thresholds.min_somatic_aaf
        || obs.max_depth < thresholds.min_depth
    {
        TierCall::Fail
    } else {
        TierCall::Pass
    };

    TierAssignment { tier, call }
}
