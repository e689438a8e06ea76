//! vf-core: shared foundation for valveflow.
//!
//! Contains:
//! - units (uom SI types, constructors, metric/imperial unit systems)
//! - numeric (Real, fallback-tracked estimates, checked arithmetic)
//! - constants (ISA 75.01 / IEC 60534-2-1 sizing constants, physical constants)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use constants::SizingConstants;
pub use error::{VfError, VfResult};
pub use numeric::*;
pub use units::*;
