//! Error taxonomy for the scoring pipeline
//!
//! Per-source read failures are handled inside ingestion (logged, skipped)
//! and never reach this enum; everything here is either fatal (`NoData`) or
//! converted to a structured report entry by the caller.

use thiserror::Error;

/// Errors surfaced by ingestion and analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No valid CSV files found in {folder}")]
    NoData { folder: String },

    #[error("No records for {group} / {trial_type}: group excluded from SDT metrics")]
    DegenerateGroup { group: String, trial_type: String },

    #[error("Insufficient paired data: need at least {required} matched participants, got {actual}")]
    InsufficientPairedData { required: usize, actual: usize },

    #[error("Failed to read folder {folder}: {source}")]
    FolderRead {
        folder: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
