//! Nominal pipe sizes, schedules and internal-diameter lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vf_core::units::UnitSystem;

use crate::error::SizingError;

/// Nominal pipe size (NPS) designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NominalPipeSize {
    Half,
    ThreeQuarter,
    One,
    OneAndHalf,
    Two,
    Three,
    Four,
    Six,
    Eight,
    Ten,
    Twelve,
}

impl NominalPipeSize {
    pub const ALL: [NominalPipeSize; 11] = [
        NominalPipeSize::Half,
        NominalPipeSize::ThreeQuarter,
        NominalPipeSize::One,
        NominalPipeSize::OneAndHalf,
        NominalPipeSize::Two,
        NominalPipeSize::Three,
        NominalPipeSize::Four,
        NominalPipeSize::Six,
        NominalPipeSize::Eight,
        NominalPipeSize::Ten,
        NominalPipeSize::Twelve,
    ];

    /// Nominal size in inches.
    pub fn inches(self) -> f64 {
        match self {
            NominalPipeSize::Half => 0.5,
            NominalPipeSize::ThreeQuarter => 0.75,
            NominalPipeSize::One => 1.0,
            NominalPipeSize::OneAndHalf => 1.5,
            NominalPipeSize::Two => 2.0,
            NominalPipeSize::Three => 3.0,
            NominalPipeSize::Four => 4.0,
            NominalPipeSize::Six => 6.0,
            NominalPipeSize::Eight => 8.0,
            NominalPipeSize::Ten => 10.0,
            NominalPipeSize::Twelve => 12.0,
        }
    }

    pub fn from_inches(inches: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|size| (size.inches() - inches).abs() < 1e-9)
    }

    fn label(self) -> &'static str {
        match self {
            NominalPipeSize::Half => "1/2in",
            NominalPipeSize::ThreeQuarter => "3/4in",
            NominalPipeSize::One => "1in",
            NominalPipeSize::OneAndHalf => "1-1/2in",
            NominalPipeSize::Two => "2in",
            NominalPipeSize::Three => "3in",
            NominalPipeSize::Four => "4in",
            NominalPipeSize::Six => "6in",
            NominalPipeSize::Eight => "8in",
            NominalPipeSize::Ten => "10in",
            NominalPipeSize::Twelve => "12in",
        }
    }
}

impl fmt::Display for NominalPipeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse `"3"`, `"3in"`, `"3\""`, `"1-1/2"`, `"1 1/2in"`, `"1.5"` or `"1/2"`.
fn parse_inches(text: &str) -> Option<f64> {
    let lower = text.trim().to_ascii_lowercase();
    let body = lower
        .strip_suffix('"')
        .or_else(|| lower.strip_suffix("in"))
        .unwrap_or(&lower)
        .trim();

    let fraction = |s: &str| -> Option<f64> {
        match s.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.trim().parse().ok()?;
                let den: f64 = den.trim().parse().ok()?;
                (den != 0.0).then(|| num / den)
            }
            None => s.trim().parse().ok(),
        }
    };

    match body.split_once(['-', ' ']) {
        Some((whole, frac)) if frac.contains('/') => {
            let whole: f64 = whole.trim().parse().ok()?;
            Some(whole + fraction(frac)?)
        }
        _ => fraction(body),
    }
}

impl FromStr for NominalPipeSize {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_inches(s)
            .and_then(Self::from_inches)
            .ok_or_else(|| SizingError::invalid("nominal_size", format!("unknown pipe size '{s}'")))
    }
}

impl TryFrom<String> for NominalPipeSize {
    type Error = SizingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NominalPipeSize> for String {
    fn from(size: NominalPipeSize) -> Self {
        size.label().to_string()
    }
}

/// Pipe wall schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PipeSchedule {
    #[serde(rename = "SCH10")]
    Sch10,
    #[serde(rename = "SCH20")]
    Sch20,
    #[default]
    #[serde(rename = "SCH40")]
    Sch40,
    #[serde(rename = "SCH80")]
    Sch80,
    #[serde(rename = "SCH160")]
    Sch160,
    #[serde(rename = "SCHXXS")]
    SchXxs,
}

impl PipeSchedule {
    /// Wall thickness as a fraction of internal diameter.
    pub fn wall_thickness_ratio(self) -> f64 {
        match self {
            PipeSchedule::Sch10 => 0.03,
            PipeSchedule::Sch20 => 0.05,
            PipeSchedule::Sch40 => 0.08,
            PipeSchedule::Sch80 => 0.12,
            PipeSchedule::Sch160 => 0.20,
            PipeSchedule::SchXxs => 0.25,
        }
    }
}

impl FromStr for PipeSchedule {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let number = compact.strip_prefix("SCH").unwrap_or(&compact);
        match number {
            "10" => Ok(PipeSchedule::Sch10),
            "20" => Ok(PipeSchedule::Sch20),
            "40" | "STD" => Ok(PipeSchedule::Sch40),
            "80" | "XS" => Ok(PipeSchedule::Sch80),
            "160" => Ok(PipeSchedule::Sch160),
            "XXS" => Ok(PipeSchedule::SchXxs),
            _ => Err(SizingError::invalid(
                "pipe_schedule",
                format!("unknown schedule '{s}'"),
            )),
        }
    }
}

/// Source of internal diameters for nominal sizes.
pub trait PipeTable: Send + Sync {
    /// Internal diameter in the diameter unit of `units` (mm or in).
    fn internal_diameter(&self, size: NominalPipeSize, units: UnitSystem) -> f64;
}

/// Schedule 40 internal diameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPipeTable;

impl StandardPipeTable {
    fn row(size: NominalPipeSize) -> (f64, f64) {
        // (mm, in)
        match size {
            NominalPipeSize::Half => (15.8, 0.622),
            NominalPipeSize::ThreeQuarter => (20.9, 0.824),
            NominalPipeSize::One => (26.6, 1.049),
            NominalPipeSize::OneAndHalf => (40.9, 1.610),
            NominalPipeSize::Two => (52.5, 2.067),
            NominalPipeSize::Three => (77.9, 3.068),
            NominalPipeSize::Four => (102.3, 4.026),
            NominalPipeSize::Six => (154.1, 6.065),
            NominalPipeSize::Eight => (202.7, 7.981),
            NominalPipeSize::Ten => (254.5, 10.020),
            NominalPipeSize::Twelve => (303.2, 11.938),
        }
    }
}

impl PipeTable for StandardPipeTable {
    fn internal_diameter(&self, size: NominalPipeSize, units: UnitSystem) -> f64 {
        let (id_mm, id_in) = Self::row(size);
        match units {
            UnitSystem::Metric => id_mm,
            UnitSystem::Imperial => id_in,
        }
    }
}
