//! Calculation settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vf_analysis::CavitationConfig;
use vf_sizing::SizingConfig;

use crate::error::AppResult;
use crate::format::read_file;

/// Settings applied to every case of a run. Missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sizing: SizingConfig,
    pub cavitation: CavitationConfig,
    /// Noise level at the observation distance above which a note is raised.
    pub noise_limit_dba: f64,
    /// Required ratio of corrected service sigma to the scaled manufacturer sigma.
    pub cavitation_safety_margin: f64,
    /// Observation distance for noise, metres.
    pub observation_distance_m: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sizing: SizingConfig::default(),
            cavitation: CavitationConfig::default(),
            noise_limit_dba: 85.0,
            cavitation_safety_margin: 1.2,
            observation_distance_m: 1.0,
        }
    }
}

impl Settings {
    /// Read settings from a YAML or JSON file.
    pub fn load(path: &Path) -> AppResult<Self> {
        read_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FileFormat;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "noise_limit_dba: 80\nsizing:\n  reynolds:\n    max_iterations: 20\n";
        let settings: Settings = FileFormat::Yaml
            .parse(Path::new("settings.yaml"), yaml)
            .unwrap();
        assert_eq!(settings.noise_limit_dba, 80.0);
        assert_eq!(settings.sizing.reynolds.max_iterations, 20);
        assert_eq!(settings.cavitation_safety_margin, 1.2);
        assert_eq!(settings.cavitation.reference_size_mm, 100.0);
        assert_eq!(settings.observation_distance_m, 1.0);
    }
}
