//! Process conditions handed to the sizing engines.
//!
//! Values are raw numbers in the units of [`ProcessConditions::units`]; see
//! [`UnitSystem`] for the unit of each quantity.

use serde::{Deserialize, Serialize};
use vf_core::units::UnitSystem;

/// Liquid service properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidProperties {
    pub density: f64,
    /// Kinematic viscosity, cSt.
    pub viscosity: f64,
    pub vapor_pressure: f64,
    /// Thermodynamic critical pressure when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_pressure: Option<f64>,
}

fn default_compressibility() -> f64 {
    1.0
}

/// Gas or vapour service properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    /// kg/kmol
    pub molecular_weight: f64,
    /// Ratio of specific heats k = cp/cv.
    pub specific_heat_ratio: f64,
    #[serde(default = "default_compressibility")]
    pub compressibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Fluid {
    Liquid(LiquidProperties),
    Gas(GasProperties),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluidPhase {
    Liquid,
    Gas,
}

impl Fluid {
    pub fn phase(&self) -> FluidPhase {
        match self {
            Fluid::Liquid(_) => FluidPhase::Liquid,
            Fluid::Gas(_) => FluidPhase::Gas,
        }
    }
}

/// Normal flow with optional operating extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowRates {
    pub normal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl FlowRates {
    pub fn normal(normal: f64) -> Self {
        Self {
            normal,
            minimum: None,
            maximum: None,
        }
    }

    /// Max/min ratio when both extremes are given.
    pub fn turndown(&self) -> Option<f64> {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) if min > 0.0 => Some(max / min),
            _ => None,
        }
    }
}

/// Operating point of one sizing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConditions {
    #[serde(default)]
    pub units: UnitSystem,
    /// Absolute temperature.
    pub temperature: f64,
    /// Absolute inlet pressure p1.
    pub inlet_pressure: f64,
    /// Absolute outlet pressure p2.
    pub outlet_pressure: f64,
    pub flow: FlowRates,
    pub fluid: Fluid,
}

impl ProcessConditions {
    pub fn delta_p(&self) -> f64 {
        self.inlet_pressure - self.outlet_pressure
    }

    /// p2 / p1
    pub fn pressure_ratio(&self) -> f64 {
        self.outlet_pressure / self.inlet_pressure
    }

    pub fn phase(&self) -> FluidPhase {
        self.fluid.phase()
    }

    pub fn liquid(&self) -> Option<&LiquidProperties> {
        match &self.fluid {
            Fluid::Liquid(props) => Some(props),
            Fluid::Gas(_) => None,
        }
    }

    pub fn gas(&self) -> Option<&GasProperties> {
        match &self.fluid {
            Fluid::Gas(props) => Some(props),
            Fluid::Liquid(_) => None,
        }
    }
}
