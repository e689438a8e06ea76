//! vf-sizing: control-valve sizing per ISA 75.01 / IEC 60534-2-1.
//!
//! Provides:
//! - piping geometry factor Fp and reducer effects
//! - iterative Reynolds-number correction Fr
//! - liquid sizing with choked-flow, authority and scenario checks
//! - gas sizing with expansion factor, critical ratios and Mach diagnostics
//!
//! Every engine implements [`SizingEngine`] and is a pure function of its
//! inputs. Invalid inputs are rejected with [`SizingError`]; numeric trouble
//! inside a calculation is recovered with a flagged [`vf_core::Fallback`].
//!
//! # Example
//!
//! ```
//! use vf_sizing::{
//!     FlowCharacteristic, FlowRates, Fluid, Installation, LiquidProperties,
//!     NominalPipeSize, ProcessConditions, ValveCharacteristics, ValveStyle, size_liquid,
//! };
//! use vf_core::UnitSystem;
//!
//! let process = ProcessConditions {
//!     units: UnitSystem::Metric,
//!     temperature: 293.15,
//!     inlet_pressure: 10.0,
//!     outlet_pressure: 2.0,
//!     flow: FlowRates::normal(120.0),
//!     fluid: Fluid::Liquid(LiquidProperties {
//!         density: 998.0,
//!         viscosity: 1.0,
//!         vapor_pressure: 0.032,
//!         critical_pressure: None,
//!     }),
//! };
//! let valve = ValveCharacteristics {
//!     style: ValveStyle::Globe,
//!     fl: 0.9,
//!     xt: 0.75,
//!     fd: 1.0,
//!     max_cv: 800.0,
//!     characteristic: FlowCharacteristic::Linear,
//! };
//! let result = size_liquid(&process, &valve, &Installation::line_size(NominalPipeSize::Three))
//!     .unwrap();
//! assert!(!result.is_choked);
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod gas;
pub mod geometry;
pub mod liquid;
pub mod pipe;
pub mod process;
pub mod result;
pub mod reynolds;
pub mod scenario;
pub mod traits;
pub mod validate;
pub mod valve;

// Re-exports
pub use config::SizingConfig;
pub use error::{SizingError, SizingOutcome};
pub use gas::GasSizing;
pub use geometry::{ReducerEffects, fp_factor, fp_factor_with, reducer_effects};
pub use liquid::LiquidSizing;
pub use pipe::{NominalPipeSize, PipeSchedule, PipeTable, StandardPipeTable};
pub use process::{
    FlowRates, Fluid, FluidPhase, GasProperties, LiquidProperties, ProcessConditions,
};
pub use result::{Diagnostics, GasDiagnostics, LiquidDiagnostics, SizingFactors, SizingResult};
pub use reynolds::{FlowRegime, ReynoldsConfig, ReynoldsInput, ReynoldsResult, fr_factor};
pub use scenario::{Assessment, OpeningLimits, ScenarioKind, ScenarioResult};
pub use traits::SizingEngine;
pub use valve::{FlowCharacteristic, Installation, ValveCharacteristics, ValveStyle};

/// Engine for `phase`, using the standard pipe table.
pub fn engine_for(phase: FluidPhase) -> Box<dyn SizingEngine> {
    match phase {
        FluidPhase::Liquid => Box::new(LiquidSizing::new()),
        FluidPhase::Gas => Box::new(GasSizing::new()),
    }
}

/// Size a valve with the engine matching the process phase.
pub fn size(
    process: &ProcessConditions,
    valve: &ValveCharacteristics,
    installation: &Installation,
    config: &SizingConfig,
) -> SizingOutcome<SizingResult> {
    engine_for(process.phase()).size(process, valve, installation, config)
}

/// Liquid sizing with default configuration.
pub fn size_liquid(
    process: &ProcessConditions,
    valve: &ValveCharacteristics,
    installation: &Installation,
) -> SizingOutcome<SizingResult> {
    LiquidSizing::new().size(process, valve, installation, &SizingConfig::default())
}

/// Gas sizing with default configuration.
pub fn size_gas(
    process: &ProcessConditions,
    valve: &ValveCharacteristics,
    installation: &Installation,
) -> SizingOutcome<SizingResult> {
    GasSizing::new().size(process, valve, installation, &SizingConfig::default())
}
