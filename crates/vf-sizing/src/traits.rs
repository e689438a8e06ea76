//! Sizing engine trait.

use crate::config::SizingConfig;
use crate::error::SizingOutcome;
use crate::process::{FluidPhase, ProcessConditions};
use crate::result::SizingResult;
use crate::valve::{Installation, ValveCharacteristics};

/// A sizing method for one fluid phase.
pub trait SizingEngine: Send + Sync {
    /// Engine name for diagnostics.
    fn name(&self) -> &str;

    fn phase(&self) -> FluidPhase;

    /// Size `valve` for `process` in `installation`.
    ///
    /// Inputs are validated first; out-of-domain numerics inside the
    /// calculation are recovered as flagged fallbacks on the result.
    fn size(
        &self,
        process: &ProcessConditions,
        valve: &ValveCharacteristics,
        installation: &Installation,
        config: &SizingConfig,
    ) -> SizingOutcome<SizingResult>;
}
