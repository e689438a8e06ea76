use std::fmt;

use serde::{Deserialize, Serialize};

use crate::VfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Denominators smaller than this are treated as zero.
pub const EPSILON_DIV: Real = 1e-12;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VfError::NonFinite { what, value: v })
    }
}

/// A conservative value substituted for one that could not be computed.
///
/// Every substitution is carried on the result that used it, so a caller can
/// always tell a genuine computation from an assumed default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    /// Quantity that was replaced.
    pub quantity: String,
    /// Value assumed in its place.
    pub assumed: Real,
    /// Why the computed value was rejected.
    pub reason: String,
}

impl Fallback {
    pub fn new(quantity: impl Into<String>, assumed: Real, reason: impl Into<String>) -> Self {
        Self {
            quantity: quantity.into(),
            assumed,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} could not be computed ({}); assumed {}",
            self.quantity, self.reason, self.assumed
        )
    }
}

/// A computed value, or a flagged fallback standing in for one.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub value: Real,
    pub fallback: Option<Fallback>,
}

impl Estimate {
    pub fn computed(value: Real) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    /// Substitute `value` for `quantity` and log the substitution.
    pub fn assumed(quantity: &str, value: Real, reason: impl Into<String>) -> Self {
        let fallback = Fallback::new(quantity, value, reason);
        tracing::warn!(
            quantity = %fallback.quantity,
            assumed = fallback.assumed,
            reason = %fallback.reason,
            "numeric fallback substituted"
        );
        Self {
            value,
            fallback: Some(fallback),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Move any fallback into `log` and return the value.
    pub fn record(self, log: &mut Vec<Fallback>) -> Real {
        if let Some(fallback) = self.fallback {
            log.push(fallback);
        }
        self.value
    }
}

/// Accept `value` if finite, otherwise fall back to `default`.
pub fn finite_or(value: Real, quantity: &str, default: Real) -> Estimate {
    if value.is_finite() {
        Estimate::computed(value)
    } else {
        Estimate::assumed(quantity, default, format!("non-finite result ({value})"))
    }
}

/// `num / den`, falling back to `default` on a near-zero denominator.
pub fn checked_div(num: Real, den: Real, quantity: &str, default: Real) -> Estimate {
    if !den.is_finite() || den.abs() < EPSILON_DIV {
        return Estimate::assumed(quantity, default, "division by near-zero denominator");
    }
    finite_or(num / den, quantity, default)
}

/// `sqrt(arg)`, falling back to `default` for a negative argument.
pub fn checked_sqrt(arg: Real, quantity: &str, default: Real) -> Estimate {
    if !arg.is_finite() || arg < 0.0 {
        return Estimate::assumed(
            quantity,
            default,
            format!("square root of negative argument ({arg})"),
        );
    }
    Estimate::computed(arg.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn checked_div_flags_zero_denominator() {
        let est = checked_div(1.0, 0.0, "ratio", 0.5);
        assert_eq!(est.value, 0.5);
        assert!(est.is_fallback());

        let est = checked_div(1.0, 4.0, "ratio", 0.5);
        assert_eq!(est.value, 0.25);
        assert!(!est.is_fallback());
    }

    #[test]
    fn record_moves_fallback_into_log() {
        let mut log = Vec::new();
        let v = checked_sqrt(-4.0, "velocity", 1.0).record(&mut log);
        assert_eq!(v, 1.0);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].quantity, "velocity");
        assert!(log[0].to_string().contains("assumed 1"));

        let v = checked_sqrt(4.0, "velocity", 1.0).record(&mut log);
        assert_eq!(v, 2.0);
        assert_eq!(log.len(), 1);
    }
}
