//! Input validation utilities
//!
//! This module provides common validation functions for command-line
//! parameters and file paths with consistent error messages, using the
//! structured error types from [`crate::errors`].

use std::path::Path;

use crate::errors::{Result, VartierError};
use crate::variant::Caller;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Sample sheet")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use vartier_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/panel.bed", "Panel");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(VartierError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Parse an ordered active-caller set from configuration names.
///
/// # Errors
/// Returns an error for the first name outside the supported vocabulary, or
/// if the set is empty.
pub fn parse_active_callers(names: &[String]) -> Result<Vec<Caller>> {
    if names.is_empty() {
        return Err(VartierError::InvalidParameter {
            parameter: "callers".to_string(),
            reason: "at least one active caller is required".to_string(),
        });
    }
    names.iter().map(|name| name.parse::<Caller>()).collect()
}

/// Validate that a name is usable as a report file-name component.
///
/// # Errors
/// Returns an error if the name is empty or contains a path separator.
pub fn validate_report_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VartierError::InvalidParameter {
            parameter: "report-name".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if name.contains('/') || name.contains('\\') {
        return Err(VartierError::InvalidParameter {
            parameter: "report-name".to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_file_exists() {
        let file = NamedTempFile::new().unwrap();
        assert!(validate_file_exists(file.path(), "Test file").is_ok());

        let err = validate_file_exists("/nonexistent/file.txt", "Test file").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_files_exist_reports_first_missing() {
        let file = NamedTempFile::new().unwrap();
        let files = vec![
            (file.path().to_path_buf(), "Present"),
            (std::path::PathBuf::from("/nonexistent/a.txt"), "Missing"),
        ];
        let err = validate_files_exist(&files).unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_parse_active_callers() {
        let names = vec!["mutect".to_string(), "pindel".to_string()];
        let callers = parse_active_callers(&names).unwrap();
        assert_eq!(callers, vec![Caller::Mutect, Caller::Pindel]);
    }

    #[test]
    fn test_parse_active_callers_rejects_unknown() {
        let names = vec!["mutect".to_string(), "strelka".to_string()];
        let err = parse_active_callers(&names).unwrap_err();
        assert!(err.to_string().contains("strelka"));
    }

    #[test]
    fn test_parse_active_callers_rejects_empty() {
        let err = parse_active_callers(&[]).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_validate_report_name() {
        assert!(validate_report_name("report").is_ok());
        assert!(validate_report_name("").is_err());
        assert!(validate_report_name("a/b").is_err());
    }
}
