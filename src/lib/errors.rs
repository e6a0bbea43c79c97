//! Custom error types for vartier operations.

use thiserror::Error;

/// Result type alias for vartier operations
pub type Result<T> = std::result::Result<T, VartierError>;

/// Error type for vartier operations
#[derive(Error, Debug)]
pub enum VartierError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Invalid reporting threshold
    #[error("Invalid threshold '{name}': {value} (must be between {min} and {max})")]
    InvalidThreshold {
        /// The threshold name
        name: String,
        /// The invalid value
        value: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Caller name outside the supported vocabulary
    #[error("Unknown variant caller '{name}' (supported: {supported})")]
    UnknownCaller {
        /// The unrecognized caller name
        name: String,
        /// Comma-separated supported caller names
        supported: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "panel", "sample sheet")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Store query failed for a sample-library unit
    #[error("Store query failed for sample '{sample}' library '{library}': {reason}")]
    StoreQuery {
        /// The sample being processed
        sample: String,
        /// The library being processed
        library: String,
        /// Explanation of the failure
        reason: String,
    },

    /// Store returned more rows than the requested page size
    #[error("Store returned {returned} rows for an advertised count of {advertised}; results would be truncated")]
    TruncatedResultSet {
        /// Rows actually returned
        returned: usize,
        /// Count the store advertised before retrieval
        advertised: usize,
    },
}
