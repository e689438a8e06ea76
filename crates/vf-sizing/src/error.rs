//! Error types for sizing operations.

use thiserror::Error;
use vf_core::error::VfError;

/// Errors that abort a sizing request.
///
/// Numeric trouble inside a calculation is not an error: it is recovered with
/// a flagged [`vf_core::Fallback`] on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Wrong service: {what}")]
    WrongService { what: &'static str },
}

impl SizingError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SizingError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type SizingOutcome<T> = Result<T, SizingError>;

impl From<SizingError> for VfError {
    fn from(e: SizingError) -> Self {
        match e {
            SizingError::InvalidInput { field, reason: _ } => VfError::InvalidArg { what: field },
            SizingError::NonPhysical { what } => VfError::Invariant { what },
            SizingError::WrongService { what } => VfError::InvalidArg { what },
        }
    }
}
