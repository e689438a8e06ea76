//! Sizing results.

use serde::{Deserialize, Serialize};
use vf_core::numeric::Fallback;
use vf_core::units::UnitSystem;

use crate::geometry::ReducerEffects;
use crate::process::FluidPhase;
use crate::reynolds::ReynoldsResult;
use crate::scenario::{Assessment, ScenarioResult};
use crate::valve::ValveStyle;

/// Correction factors used (or not) in the Cv equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingFactors {
    pub fp: f64,
    /// Whether Fp entered the Cv equation.
    pub fp_applied: bool,
    pub fr: f64,
    pub fr_applied: bool,
    /// Gas expansion factor.
    pub y: Option<f64>,
    /// Liquid critical pressure ratio factor.
    pub ff: Option<f64>,
}

/// Where the critical pressure behind Ff came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalPressureBasis {
    Supplied,
    /// Density band typical of water.
    WaterLikeEstimate,
    /// Generic hydrocarbon estimate.
    HydrocarbonEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidChoking {
    pub critical_pressure: f64,
    pub critical_pressure_basis: CriticalPressureBasis,
    pub ff: f64,
    /// FL^2 (p1 - Ff Pv)
    pub allowable_delta_p: f64,
    /// (allowable - dp) / allowable; negative when choked.
    pub choking_margin: f64,
    /// (p1 - Pv) / dp
    pub sigma_service: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityRating {
    Excellent,
    Good,
    Poor,
    VeryPoor,
}

impl AuthorityRating {
    pub fn from_authority(authority: f64) -> Self {
        if authority > 0.5 {
            AuthorityRating::Excellent
        } else if authority > 0.25 {
            AuthorityRating::Good
        } else if authority > 0.1 {
            AuthorityRating::Poor
        } else {
            AuthorityRating::VeryPoor
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AuthorityRating::Excellent => "Excellent - Good control expected",
            AuthorityRating::Good => "Good - Adequate control",
            AuthorityRating::Poor => "Poor - Control may be difficult",
            AuthorityRating::VeryPoor => "Very Poor - Consider system redesign",
        }
    }
}

/// Valve share of the total control-loop pressure drop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValveAuthority {
    pub valve_delta_p: f64,
    /// Velocity-head estimate of the line loss.
    pub piping_delta_p: f64,
    pub total_delta_p: f64,
    pub authority: f64,
    pub rating: AuthorityRating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidDiagnostics {
    pub specific_gravity: f64,
    pub pipe_diameter: f64,
    pub valve_diameter: f64,
    pub choking: LiquidChoking,
    pub reynolds: ReynoldsResult,
    pub authority: ValveAuthority,
    pub reducers: ReducerEffects,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasCriticalFlow {
    /// p2 / p1
    pub pressure_ratio: f64,
    pub critical_ratio_perfect: f64,
    pub critical_ratio_valve: f64,
    /// (ratio - critical_valve) / critical_valve; non-positive when choked.
    pub choking_margin: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachBand {
    Low,
    Moderate,
    HighSubsonic,
    Supersonic,
}

impl MachBand {
    pub fn from_mach(mach: f64) -> Self {
        if mach > 1.0 {
            MachBand::Supersonic
        } else if mach > 0.8 {
            MachBand::HighSubsonic
        } else if mach > 0.3 {
            MachBand::Moderate
        } else {
            MachBand::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MachBand::Supersonic => "Supersonic - Review design",
            MachBand::HighSubsonic => "High subsonic - Monitor noise",
            MachBand::Moderate => "Moderate - Acceptable",
            MachBand::Low => "Low - Good",
        }
    }
}

/// Velocities at the valve and in the line, SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasVelocity {
    pub inlet_density_kg_m3: f64,
    pub sonic_velocity_ideal_mps: f64,
    /// Ideal sonic velocity scaled by sqrt(Z).
    pub sonic_velocity_mps: f64,
    pub flow_area_m2: f64,
    pub valve_velocity_mps: f64,
    pub mach_number: f64,
    pub mach_band: MachBand,
    pub pipe_velocity_mps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasDiagnostics {
    pub pipe_diameter: f64,
    pub critical: GasCriticalFlow,
    pub velocity: GasVelocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Diagnostics {
    Liquid(LiquidDiagnostics),
    Gas(GasDiagnostics),
}

/// Outcome of one sizing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub phase: FluidPhase,
    pub units: UnitSystem,
    pub style: ValveStyle,
    /// Cv before viscous correction.
    pub cv_basic: f64,
    pub cv_required: f64,
    pub is_choked: bool,
    pub delta_p: f64,
    /// Pressure drop the Cv equation was evaluated at.
    pub effective_delta_p: f64,
    pub factors: SizingFactors,
    pub rated_cv: f64,
    /// Travel needed for `cv_required`, percent.
    pub opening_percent: f64,
    pub rated_capacity_exceeded: bool,
    pub scenarios: Vec<ScenarioResult>,
    pub diagnostics: Diagnostics,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub fallbacks: Vec<Fallback>,
}

impl SizingResult {
    pub fn liquid(&self) -> Option<&LiquidDiagnostics> {
        match &self.diagnostics {
            Diagnostics::Liquid(d) => Some(d),
            Diagnostics::Gas(_) => None,
        }
    }

    pub fn gas(&self) -> Option<&GasDiagnostics> {
        match &self.diagnostics {
            Diagnostics::Gas(d) => Some(d),
            Diagnostics::Liquid(_) => None,
        }
    }

    /// Worst scenario assessment.
    pub fn worst_assessment(&self) -> Assessment {
        self.scenarios
            .iter()
            .map(|s| s.assessment)
            .max()
            .unwrap_or(Assessment::Good)
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_bands() {
        assert_eq!(AuthorityRating::from_authority(0.9), AuthorityRating::Excellent);
        assert_eq!(AuthorityRating::from_authority(0.5), AuthorityRating::Good);
        assert_eq!(AuthorityRating::from_authority(0.2), AuthorityRating::Poor);
        assert_eq!(AuthorityRating::from_authority(0.1), AuthorityRating::VeryPoor);
    }

    #[test]
    fn mach_bands() {
        assert_eq!(MachBand::from_mach(0.1), MachBand::Low);
        assert_eq!(MachBand::from_mach(0.5), MachBand::Moderate);
        assert_eq!(MachBand::from_mach(0.9), MachBand::HighSubsonic);
        assert_eq!(MachBand::from_mach(1.2), MachBand::Supersonic);
        assert_eq!(MachBand::from_mach(1.0), MachBand::HighSubsonic);
    }
}
