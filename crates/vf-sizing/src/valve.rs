//! Valve description: style, trim factors and inherent flow characteristic.

use serde::{Deserialize, Serialize};
use vf_core::numeric::Estimate;

use crate::pipe::{NominalPipeSize, PipeSchedule};

/// Valve body style family.
///
/// Coefficients and cavitation exponents are keyed on this enum; free-text
/// style names are mapped with [`ValveStyle::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValveStyle {
    #[default]
    Globe,
    Ball,
    Butterfly,
}

impl ValveStyle {
    pub const ALL: [ValveStyle; 3] = [ValveStyle::Globe, ValveStyle::Ball, ValveStyle::Butterfly];

    /// Map a catalogue style name onto a style family.
    ///
    /// Unrecognised names fall into the globe family.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .collect();
        let has_word = |w: &str| words.iter().any(|word| *word == w);

        if lower.contains("butterfly") || has_word("wafer") || has_word("lug") {
            ValveStyle::Butterfly
        } else if lower.contains("ball") || has_word("v-notch") || has_word("vnotch") {
            ValveStyle::Ball
        } else {
            ValveStyle::Globe
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValveStyle::Globe => "globe",
            ValveStyle::Ball => "ball",
            ValveStyle::Butterfly => "butterfly",
        }
    }

    /// Sensitivity of Fp to a diameter reduction.
    pub fn fp_coefficient(self) -> f64 {
        match self {
            ValveStyle::Globe => 0.3,
            ValveStyle::Ball => 0.2,
            ValveStyle::Butterfly => 0.5,
        }
    }

    /// Diameter ratio at and above which Fp is exactly 1.
    pub fn fp_unity_beta(self) -> f64 {
        match self {
            ValveStyle::Globe | ValveStyle::Ball => 1.0,
            ValveStyle::Butterfly => 0.95,
        }
    }
}

impl From<String> for ValveStyle {
    fn from(name: String) -> Self {
        ValveStyle::from_name(&name)
    }
}

impl From<ValveStyle> for String {
    fn from(style: ValveStyle) -> Self {
        style.name().to_string()
    }
}

impl std::fmt::Display for ValveStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn default_rangeability() -> f64 {
    50.0
}

/// Inherent flow characteristic: relative Cv as a function of relative travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowCharacteristic {
    /// Cv/Cv_max = L
    Linear,
    /// Cv/Cv_max = R^(L-1)
    EqualPercentage {
        #[serde(default = "default_rangeability")]
        rangeability: f64,
    },
    /// Cv/Cv_max = sqrt(L)
    QuickOpening,
    /// Cv/Cv_max = L^1.5
    ModifiedParabolic,
}

impl Default for FlowCharacteristic {
    fn default() -> Self {
        FlowCharacteristic::EqualPercentage {
            rangeability: default_rangeability(),
        }
    }
}

impl FlowCharacteristic {
    /// Relative Cv at relative travel `travel` (0..1).
    pub fn relative_cv(&self, travel: f64) -> f64 {
        let travel = travel.clamp(0.0, 1.0);
        match *self {
            FlowCharacteristic::Linear => travel,
            FlowCharacteristic::EqualPercentage { rangeability } => {
                rangeability.powf(travel - 1.0)
            }
            FlowCharacteristic::QuickOpening => travel.sqrt(),
            FlowCharacteristic::ModifiedParabolic => travel.powf(1.5),
        }
    }

    /// Relative travel needed to pass `relative_cv` of rated capacity.
    ///
    /// Values above 1 mean the rated Cv is insufficient. Equal-percentage
    /// trim cannot control below `1/R` and reports zero travel there.
    pub fn travel_for(&self, relative_cv: f64) -> Estimate {
        if !relative_cv.is_finite() || relative_cv <= 0.0 {
            return Estimate::assumed(
                "valve travel",
                0.0,
                format!("relative Cv {relative_cv} is not positive"),
            );
        }
        let travel = match *self {
            FlowCharacteristic::Linear => relative_cv,
            FlowCharacteristic::EqualPercentage { rangeability } => {
                if rangeability <= 1.0 {
                    return Estimate::assumed(
                        "valve travel",
                        relative_cv,
                        format!("rangeability {rangeability} must exceed 1; linear travel used"),
                    );
                }
                (1.0 + relative_cv.ln() / rangeability.ln()).max(0.0)
            }
            FlowCharacteristic::QuickOpening => relative_cv * relative_cv,
            FlowCharacteristic::ModifiedParabolic => relative_cv.powf(2.0 / 3.0),
        };
        Estimate::computed(travel)
    }
}

/// Valve trim and capacity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveCharacteristics {
    pub style: ValveStyle,
    /// Liquid pressure-recovery factor, (0, 1].
    pub fl: f64,
    /// Terminal pressure-drop ratio, (0, 1].
    pub xt: f64,
    /// Style modifier, (0, 2].
    pub fd: f64,
    /// Rated Cv at full travel.
    pub max_cv: f64,
    #[serde(default)]
    pub characteristic: FlowCharacteristic,
}

impl ValveCharacteristics {
    /// Opening in percent needed to pass `cv` on this valve.
    pub fn opening_percent(&self, cv: f64) -> Estimate {
        let mut estimate = self.characteristic.travel_for(cv / self.max_cv);
        estimate.value *= 100.0;
        estimate
    }
}

/// Where the valve sits: line size, body size and line schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub pipe_size: NominalPipeSize,
    pub valve_size: NominalPipeSize,
    #[serde(default)]
    pub schedule: PipeSchedule,
}

impl Installation {
    /// Line-size valve in schedule 40 pipe.
    pub fn line_size(size: NominalPipeSize) -> Self {
        Self {
            pipe_size: size,
            valve_size: size,
            schedule: PipeSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_aliases() {
        assert_eq!(ValveStyle::from_name("Single Seat Globe"), ValveStyle::Globe);
        assert_eq!(ValveStyle::from_name("double seat"), ValveStyle::Globe);
        assert_eq!(ValveStyle::from_name("Segmented Ball"), ValveStyle::Ball);
        assert_eq!(ValveStyle::from_name("V-Notch"), ValveStyle::Ball);
        assert_eq!(ValveStyle::from_name("wafer"), ValveStyle::Butterfly);
        assert_eq!(ValveStyle::from_name("High Performance Lug"), ValveStyle::Butterfly);
        assert_eq!(ValveStyle::from_name("angle"), ValveStyle::Globe);
        assert_eq!(ValveStyle::from_name("eccentric plug"), ValveStyle::Globe);
        assert_eq!(ValveStyle::from_name(""), ValveStyle::Globe);
    }

    #[test]
    fn characteristic_end_points() {
        let chars = [
            FlowCharacteristic::Linear,
            FlowCharacteristic::default(),
            FlowCharacteristic::QuickOpening,
            FlowCharacteristic::ModifiedParabolic,
        ];
        for c in chars {
            assert!((c.relative_cv(1.0) - 1.0).abs() < 1e-12);
            let travel = c.travel_for(1.0);
            assert!(!travel.is_fallback());
            assert!((travel.value - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn travel_inverts_relative_cv() {
        let chars = [
            FlowCharacteristic::Linear,
            FlowCharacteristic::EqualPercentage { rangeability: 30.0 },
            FlowCharacteristic::QuickOpening,
            FlowCharacteristic::ModifiedParabolic,
        ];
        for c in chars {
            for travel in [0.2, 0.5, 0.8] {
                let phi = c.relative_cv(travel);
                assert!((c.travel_for(phi).value - travel).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn equal_percentage_below_rangeability_is_closed() {
        let c = FlowCharacteristic::EqualPercentage { rangeability: 50.0 };
        assert_eq!(c.travel_for(0.01).value, 0.0);
    }

    #[test]
    fn zero_cv_is_flagged() {
        let est = FlowCharacteristic::Linear.travel_for(0.0);
        assert!(est.is_fallback());
        assert_eq!(est.value, 0.0);
    }

    #[test]
    fn opening_percent_on_linear_trim() {
        let valve = ValveCharacteristics {
            style: ValveStyle::Globe,
            fl: 0.9,
            xt: 0.75,
            fd: 1.0,
            max_cv: 200.0,
            characteristic: FlowCharacteristic::Linear,
        };
        assert!((valve.opening_percent(100.0).value - 50.0).abs() < 1e-12);
        assert!(valve.opening_percent(300.0).value > 100.0);
    }

    #[test]
    fn characteristic_deserializes_with_default_rangeability() {
        let c: FlowCharacteristic =
            serde_json::from_str(r#"{"kind":"equal_percentage"}"#).unwrap();
        assert_eq!(c, FlowCharacteristic::EqualPercentage { rangeability: 50.0 });
        let style: ValveStyle = serde_json::from_str(r#""Segmented Ball""#).unwrap();
        assert_eq!(style, ValveStyle::Ball);
    }
}
