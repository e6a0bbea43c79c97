//! Target panel loading and region membership.
//!
//! A panel file is tab-delimited with the region identifier in the 4th
//! column (0-indexed column 3); the full file is read into an ordered
//! identifier list. A variant's region field either holds the no-region
//! sentinel or a comma-separated list of region identifiers.

use std::fs;
use std::path::Path;

use crate::errors::{Result, VartierError};

/// Sentinel value marking a variant with no region assignment.
///
/// Also used as the no-data marker in report fields.
pub const NO_REGION: &str = "None";

/// Ordered list of target region identifiers for one sample-library unit.
///
/// Read-only for the duration of processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPanel {
    regions: Vec<String>,
}

impl TargetPanel {
    /// Builds a panel from an ordered list of region identifiers.
    #[must_use]
    pub fn new(regions: Vec<String>) -> Self {
        Self { regions }
    }

    /// Loads a panel file: tab-delimited, one region per line, identifier in
    /// column 3.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing, unreadable,
    /// empty, or has a line with fewer than 4 columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content =
            fs::read_to_string(path_ref).map_err(|e| VartierError::InvalidFileFormat {
                file_type: "panel".to_string(),
                path: path_ref.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut regions = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let region = line.split('\t').nth(3).ok_or_else(|| {
                VartierError::InvalidFileFormat {
                    file_type: "panel".to_string(),
                    path: path_ref.display().to_string(),
                    reason: format!("line {} has fewer than 4 columns", line_num + 1),
                }
            })?;
            regions.push(region.to_string());
        }

        if regions.is_empty() {
            return Err(VartierError::InvalidFileFormat {
                file_type: "panel".to_string(),
                path: path_ref.display().to_string(),
                reason: "no target regions found".to_string(),
            });
        }

        Ok(Self { regions })
    }

    /// The target regions, in file order.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Number of target regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if the panel holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// True if `region` is one of the panel's targets.
    #[must_use]
    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }
}

/// Splits a region field into its listed region identifiers.
///
/// The sentinel yields no regions.
#[must_use]
pub fn split_regions(region_field: &str) -> Vec<&str> {
    if region_field == NO_REGION {
        return Vec::new();
    }
    region_field.split(',').collect()
}

/// True if the region field is the no-region sentinel.
#[must_use]
pub fn is_off_target(region_field: &str) -> bool {
    region_field == NO_REGION
}

/// True if at least one region listed in `region_field` is in `panel`,
/// short-circuiting on the first match. The sentinel is never targeted.
#[must_use]
pub fn is_targeted(region_field: &str, panel: &TargetPanel) -> bool {
    if is_off_target(region_field) {
        return false;
    }
    region_field.split(',').any(|region| panel.contains(region))
}
