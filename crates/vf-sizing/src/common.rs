//! Common utilities for sizing calculations.

use crate::error::{SizingError, SizingOutcome};
use vf_core::numeric::ensure_finite;

/// Smallest Cv used as a divisor.
pub const MIN_CV: f64 = 1e-6;

/// Ensure a value is finite, returning SizingError if not.
pub fn check_finite(value: f64, what: &'static str) -> SizingOutcome<f64> {
    ensure_finite(value, what).map_err(|_| SizingError::NonPhysical { what })
}

/// Reject a non-finite or non-positive input field.
pub fn require_positive(value: f64, field: &'static str) -> SizingOutcome<()> {
    if !value.is_finite() {
        return Err(SizingError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(SizingError::invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}

/// Reject a value outside the half-open interval `(lo, hi]`.
pub fn require_in_range(value: f64, lo: f64, hi: f64, field: &'static str) -> SizingOutcome<()> {
    if !value.is_finite() || value <= lo || value > hi {
        return Err(SizingError::invalid(
            field,
            format!("must lie in ({lo}, {hi}], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive(1.0, "flow").is_ok());
        assert!(require_positive(0.0, "flow").is_err());
        assert!(require_positive(f64::NAN, "flow").is_err());
    }

    #[test]
    fn test_require_in_range() {
        assert!(require_in_range(1.0, 0.0, 1.0, "fl").is_ok());
        assert!(require_in_range(0.0, 0.0, 1.0, "fl").is_err());
        assert!(require_in_range(1.01, 0.0, 1.0, "fl").is_err());
    }
}
