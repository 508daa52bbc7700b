//! Error types for pathway_forte

use thiserror::Error;

/// Main error type for both analysis pipelines
#[derive(Error, Debug)]
pub enum ForteError {
    #[error("Gene id column '{column}' not found in count matrix (available columns: {available})")]
    MissingGeneColumn { column: String, available: String },

    #[error("Differential expression engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    #[error("Differential expression engine failed: {reason}")]
    EngineFailed { reason: String },

    #[error("Invalid count matrix: {reason}")]
    InvalidCountMatrix { reason: String },

    #[error("Invalid design matrix: {reason}")]
    InvalidDesignMatrix { reason: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid pathway graph in {path}: {reason}")]
    InvalidGraph { path: String, reason: String },

    #[error("Invalid equivalence mapping: {reason}")]
    InvalidMapping { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for pathway_forte operations
pub type Result<T> = std::result::Result<T, ForteError>;
