//! Application error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from case handling and combined analysis.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write case file: {path}")]
    CaseFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Sizing error: {0}")]
    Sizing(String),

    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type for vf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<vf_sizing::SizingError> for AppError {
    fn from(err: vf_sizing::SizingError) -> Self {
        AppError::Sizing(err.to_string())
    }
}

impl From<vf_analysis::AnalysisError> for AppError {
    fn from(err: vf_analysis::AnalysisError) -> Self {
        AppError::Analysis(err.to_string())
    }
}
