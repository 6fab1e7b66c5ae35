/// Error types for the OMR post-processing library
use thiserror::Error;

/// Main error type for OMR operations.
///
/// Every variant is fatal to the run it occurs in: malformed input or a
/// broken scenario invariant aborts processing rather than producing a
/// partial or silently-wrong table.
#[derive(Error, Debug)]
pub enum OmrError {
    /// Malformed input structure: DSS pathname segments, run-id tokens,
    /// scenario-letter detection, name-map misses, unknown variable labels
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// A cross-scenario pivot/diff/KS step found zero or more than one
    /// OMR-marked scenario, or no Baseline
    #[error("Scenario cardinality error: {0}")]
    ScenarioCardinality(String),

    /// User-supplied argument failed validation before processing began
    #[error("Validation error: {0}")]
    Validation(String),

    /// An ECDF or KS computation was handed an empty sample
    #[error("Empty sample: {0}")]
    EmptySample(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using OmrError
pub type Result<T> = std::result::Result<T, OmrError>;
