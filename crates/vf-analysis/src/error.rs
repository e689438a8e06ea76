//! Error types for cavitation and noise analysis.

use thiserror::Error;
use vf_core::error::VfError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: &'static str, reason: String },
}

impl AnalysisError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type AnalysisOutcome<T> = Result<T, AnalysisError>;

impl From<AnalysisError> for VfError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::InvalidInput { field, .. } => VfError::InvalidArg { what: field },
        }
    }
}

/// Reject a non-finite or non-positive input field.
pub(crate) fn require_positive(value: f64, field: &'static str) -> AnalysisOutcome<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalysisError::invalid(
            field,
            format!("must be positive and finite, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_converts_to_core_error() {
        let err = AnalysisError::invalid("fl", "must lie in (0, 1]");
        assert!(err.to_string().contains("fl"));
        let vf: VfError = err.into();
        assert_eq!(vf, VfError::InvalidArg { what: "fl" });
    }

    #[test]
    fn positive_check_reports_field() {
        match require_positive(-1.0, "distance") {
            Err(AnalysisError::InvalidInput { field, .. }) => assert_eq!(field, "distance"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
