//! Minimum / normal / maximum operating scenarios and opening assessment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Minimum,
    Normal,
    Maximum,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Minimum,
        ScenarioKind::Normal,
        ScenarioKind::Maximum,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::Minimum => "Minimum",
            ScenarioKind::Normal => "Normal",
            ScenarioKind::Maximum => "Maximum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Assessment {
    Good,
    Warning,
    Critical,
}

/// Valve opening bands, in percent of travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningLimits {
    /// Below this the operating point is critical.
    pub critical_min: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    /// Above this the operating point is critical.
    pub critical_max: f64,
}

impl OpeningLimits {
    pub const LIQUID: Self = Self {
        critical_min: 10.0,
        warning_min: 20.0,
        warning_max: 80.0,
        critical_max: 90.0,
    };

    pub const GAS: Self = Self {
        critical_min: 0.0,
        warning_min: 10.0,
        warning_max: 85.0,
        critical_max: 95.0,
    };

    pub fn assess(&self, opening_percent: f64) -> (Assessment, &'static str) {
        if opening_percent < self.critical_min {
            (Assessment::Critical, "Critical - Below minimum opening")
        } else if opening_percent < self.warning_min {
            (Assessment::Warning, "Warning - Below recommended minimum")
        } else if opening_percent > self.critical_max {
            (Assessment::Critical, "Critical - Above maximum opening, insufficient capacity")
        } else if opening_percent > self.warning_max {
            (Assessment::Warning, "Warning - Above recommended maximum, limited margin")
        } else {
            (Assessment::Good, "Good - Within recommended range")
        }
    }
}

/// One evaluated operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,
    pub description: String,
    pub flow: f64,
    pub inlet_pressure: f64,
    pub outlet_pressure: f64,
    pub delta_p: f64,
    /// Gas scenarios only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choked: Option<bool>,
    /// Cv needed at this point; `None` when the point has no forward drop.
    pub cv: Option<f64>,
    /// Scenario Cv over the required Cv of the sizing case.
    pub capacity_ratio: Option<f64>,
    /// Travel on the valve's inherent characteristic.
    pub opening_percent: Option<f64>,
    pub assessment: Assessment,
    pub message: String,
}

impl ScenarioResult {
    /// Warning line for a scenario at or above `level`.
    pub fn warning(&self, level: Assessment) -> Option<String> {
        (self.assessment >= level).then(|| format!("{} flow: {}", self.kind.label(), self.message))
    }
}
