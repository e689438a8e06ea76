//! Sizing configuration.

use serde::{Deserialize, Serialize};

use crate::reynolds::ReynoldsConfig;
use crate::scenario::OpeningLimits;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub reynolds: ReynoldsConfig,
    pub liquid_opening: OpeningLimits,
    pub gas_opening: OpeningLimits,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            reynolds: ReynoldsConfig::default(),
            liquid_opening: OpeningLimits::LIQUID,
            gas_opening: OpeningLimits::GAS,
        }
    }
}
