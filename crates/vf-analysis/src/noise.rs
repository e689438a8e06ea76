//! IEC 60534-8-3 aerodynamic noise prediction.
//!
//! Stream power is converted to sound power with a Mach-dependent acoustic
//! efficiency, attenuated by the pipe wall (mass law) and spread
//! cylindrically from 1 m to the observation distance. All arithmetic is in
//! SI; inputs are converted from the caller's unit system on entry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uom::si::length::meter;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::cubic_meter_per_second;
use vf_core::constants::{R_GAS, REFERENCE_SOUND_POWER_W, STEEL_DENSITY_KG_M3, valve_area_from_cv};
use vf_core::{Estimate, Fallback, UnitSystem, checked_sqrt, finite_or};
use vf_sizing::PipeSchedule;

use crate::error::{AnalysisError, AnalysisOutcome, require_positive};

/// Sound power level assumed when acoustic power cannot be computed.
pub const LW_FALLBACK_DB: f64 = 50.0;
/// Transmission loss assumed when the mass law cannot be evaluated.
pub const TL_FALLBACK_DB: f64 = 15.0;
const FREQUENCY_FALLBACK_HZ: f64 = 1000.0;
const VELOCITY_FALLBACK_MPS: f64 = 100.0;
const MACH_FALLBACK: f64 = 0.3;

const STROUHAL: f64 = 0.2;
const FREQUENCY_BOUNDS_HZ: (f64, f64) = (100.0, 10_000.0);
const MIN_CHAR_DIMENSION_M: f64 = 0.001;
/// Geometric spreading and impedance term between pipe wall and 1 m.
const SPL_1M_OFFSET_DB: f64 = 8.0;

const ETA_LOW_MACH: f64 = 1e-4;
const ETA_CUBIC: f64 = 1e-3;
const ETA_MAX: f64 = 0.01;

/// Request for [`predict_noise`]. Values are in `units`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseInput {
    #[serde(default)]
    pub units: UnitSystem,
    /// Volumetric flow at inlet conditions.
    pub flow: f64,
    pub inlet_pressure: f64,
    pub outlet_pressure: f64,
    /// Absolute temperature.
    pub temperature: f64,
    pub molecular_weight: f64,
    pub specific_heat_ratio: f64,
    pub cv: f64,
    /// Downstream pipe internal diameter.
    pub pipe_diameter: f64,
    #[serde(default)]
    pub pipe_schedule: PipeSchedule,
    /// Observation distance from the pipe wall, in metres.
    #[serde(default = "default_distance")]
    pub distance: f64,
}

fn default_distance() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoiseLevel {
    Acceptable,
    Moderate,
    High,
    Critical,
}

impl NoiseLevel {
    pub fn from_spl(spl: f64) -> Self {
        if spl >= 90.0 {
            NoiseLevel::Critical
        } else if spl >= 85.0 {
            NoiseLevel::High
        } else if spl >= 75.0 {
            NoiseLevel::Moderate
        } else {
            NoiseLevel::Acceptable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoiseLevel::Acceptable => "Acceptable",
            NoiseLevel::Moderate => "Moderate",
            NoiseLevel::High => "High",
            NoiseLevel::Critical => "Critical",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NoiseLevel::Critical => "Excessive noise - immediate mitigation required",
            NoiseLevel::High => "High noise level - mitigation recommended",
            NoiseLevel::Moderate => "Moderate noise level - monitor regularly",
            NoiseLevel::Acceptable => "Noise level within acceptable limits",
        }
    }

    pub fn actions(self) -> Vec<String> {
        let actions: &[&str] = match self {
            NoiseLevel::Critical => &[
                "Install acoustic insulation on pipe",
                "Consider low-noise valve trim",
                "Implement hearing protection requirements",
                "Evaluate process modifications",
            ],
            NoiseLevel::High => &[
                "Consider acoustic treatment",
                "Implement noise monitoring program",
                "Evaluate low-noise trim options",
            ],
            NoiseLevel::Moderate => &[
                "Regular noise level monitoring",
                "Consider future acoustic treatment",
            ],
            NoiseLevel::Acceptable => &["Standard operation - no special requirements"],
        };
        actions.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Display for NoiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Named exposure limits checked against the 1 m level.
pub const REGULATORY_LIMITS: [(&str, f64); 3] = [
    ("OSHA (8hr TWA)", 85.0),
    ("EU Directive", 87.0),
    ("General Industrial", 80.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub standard: String,
    pub limit_dba: f64,
    pub passes: bool,
}

pub fn check_compliance(spl: f64) -> Vec<ComplianceCheck> {
    REGULATORY_LIMITS
        .iter()
        .map(|(standard, limit)| ComplianceCheck {
            standard: standard.to_string(),
            limit_dba: *limit,
            passes: spl < *limit,
        })
        .collect()
}

/// Stream-to-sound conversion at the valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticPower {
    pub density_kg_m3: f64,
    pub mass_flow_kg_s: f64,
    pub mechanical_power_w: f64,
    pub mach_number: f64,
    pub acoustic_efficiency: f64,
    pub acoustic_power_w: f64,
    /// Sound power level re 1 pW.
    pub sound_power_level_db: f64,
    pub jet_velocity_mps: f64,
    pub peak_frequency_hz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmissionLoss {
    pub wall_thickness_m: f64,
    pub surface_mass_kg_m2: f64,
    pub mass_law_db: f64,
    pub cylinder_correction_db: f64,
    pub frequency_correction_db: f64,
    pub total_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseResult {
    pub acoustic: AcousticPower,
    pub transmission: TransmissionLoss,
    pub spl_1m: f64,
    pub distance: f64,
    pub distance_correction_db: f64,
    pub spl_at_distance: f64,
    pub assessment: NoiseLevel,
    pub description: String,
    pub recommended_actions: Vec<String>,
    pub compliance: Vec<ComplianceCheck>,
    pub fallbacks: Vec<Fallback>,
}

impl NoiseResult {
    pub fn sound_power_level(&self) -> f64 {
        self.acoustic.sound_power_level_db
    }

    pub fn peak_frequency(&self) -> f64 {
        self.acoustic.peak_frequency_hz
    }
}

/// Exit Mach number of an isentropic expansion from `p1` to `ratio * p1`.
/// Sonic at or below the critical pressure ratio.
pub fn isentropic_mach(ratio: f64, k: f64) -> Estimate {
    let critical = (2.0 / (k + 1.0)).powf(k / (k - 1.0));
    if ratio <= critical {
        return Estimate::computed(1.0);
    }
    let arg = 2.0 / (k - 1.0) * (ratio.powf(-(k - 1.0) / k) - 1.0);
    checked_sqrt(arg, "mach number", MACH_FALLBACK)
}

/// Fraction of stream power radiated as sound.
///
/// Flat below Mach 0.3, cubic above, never below the flat value and capped
/// at 1%.
pub fn acoustic_efficiency(mach: f64) -> f64 {
    let eta = if mach > 0.3 {
        (ETA_CUBIC * mach.powi(3)).max(ETA_LOW_MACH)
    } else {
        ETA_LOW_MACH
    };
    eta.min(ETA_MAX)
}

fn validate(input: &NoiseInput) -> AnalysisOutcome<()> {
    require_positive(input.flow, "flow")?;
    require_positive(input.inlet_pressure, "inlet_pressure")?;
    require_positive(input.outlet_pressure, "outlet_pressure")?;
    if input.inlet_pressure <= input.outlet_pressure {
        return Err(AnalysisError::invalid(
            "inlet_pressure",
            format!(
                "must exceed outlet pressure ({} <= {})",
                input.inlet_pressure, input.outlet_pressure
            ),
        ));
    }
    require_positive(input.temperature, "temperature")?;
    require_positive(input.molecular_weight, "molecular_weight")?;
    if !input.specific_heat_ratio.is_finite() || input.specific_heat_ratio <= 1.0 {
        return Err(AnalysisError::invalid(
            "specific_heat_ratio",
            format!("must exceed 1, got {}", input.specific_heat_ratio),
        ));
    }
    require_positive(input.cv, "cv")?;
    require_positive(input.pipe_diameter, "pipe_diameter")?;
    require_positive(input.distance, "distance")?;
    Ok(())
}

fn acoustic_power(input: &NoiseInput, fallbacks: &mut Vec<Fallback>) -> AcousticPower {
    let units = input.units;
    let p1 = units.pressure(input.inlet_pressure).get::<pascal>();
    let p2 = units.pressure(input.outlet_pressure).get::<pascal>();
    let t = units.temperature(input.temperature).get::<kelvin>();
    let q = units.gas_flow(input.flow).get::<cubic_meter_per_second>();
    let k = input.specific_heat_ratio;
    let delta_p = p1 - p2;

    let density = p1 * input.molecular_weight / (R_GAS * t);
    let mass_flow = q * density;
    let mechanical_power = mass_flow * delta_p / density;

    let mach = isentropic_mach(p2 / p1, k).record(fallbacks);
    let eta = acoustic_efficiency(mach);
    let acoustic = eta * mechanical_power;

    let lw = if acoustic.is_finite() && acoustic > 0.0 {
        Estimate::computed(10.0 * (acoustic / REFERENCE_SOUND_POWER_W).log10())
    } else {
        Estimate::assumed(
            "sound power level",
            LW_FALLBACK_DB,
            format!("non-positive acoustic power ({acoustic})"),
        )
    };
    let lw = lw.record(fallbacks);

    let velocity =
        checked_sqrt(2.0 * delta_p / density, "jet velocity", VELOCITY_FALLBACK_MPS).record(fallbacks);
    let char_dimension = valve_area_from_cv(input.cv).sqrt().max(MIN_CHAR_DIMENSION_M);
    let frequency = finite_or(
        STROUHAL * velocity / char_dimension,
        "peak frequency",
        FREQUENCY_FALLBACK_HZ,
    )
    .record(fallbacks)
    .clamp(FREQUENCY_BOUNDS_HZ.0, FREQUENCY_BOUNDS_HZ.1);

    debug!(density, mach, eta, lw, frequency, "acoustic power");

    AcousticPower {
        density_kg_m3: density,
        mass_flow_kg_s: mass_flow,
        mechanical_power_w: mechanical_power,
        mach_number: mach,
        acoustic_efficiency: eta,
        acoustic_power_w: acoustic,
        sound_power_level_db: lw,
        jet_velocity_mps: velocity,
        peak_frequency_hz: frequency,
    }
}

fn frequency_correction(frequency: f64) -> f64 {
    if frequency < 500.0 {
        -5.0
    } else if frequency > 4000.0 {
        2.0
    } else {
        0.0
    }
}

/// Pipe-wall transmission loss at `frequency` for a steel pipe of internal
/// diameter `diameter_m`.
pub fn transmission_loss(
    diameter_m: f64,
    schedule: PipeSchedule,
    frequency: f64,
    fallbacks: &mut Vec<Fallback>,
) -> TransmissionLoss {
    let wall_thickness = diameter_m * schedule.wall_thickness_ratio();
    let surface_mass = wall_thickness * STEEL_DENSITY_KG_M3;
    let frequency_correction_db = frequency_correction(frequency);

    let mass_arg = frequency * surface_mass;
    if !(mass_arg.is_finite() && mass_arg > 0.0 && diameter_m > 0.0) {
        let total = Estimate::assumed(
            "transmission loss",
            TL_FALLBACK_DB,
            format!("mass law undefined for f*m = {mass_arg}"),
        )
        .record(fallbacks);
        return TransmissionLoss {
            wall_thickness_m: wall_thickness,
            surface_mass_kg_m2: surface_mass,
            mass_law_db: total,
            cylinder_correction_db: 0.0,
            frequency_correction_db: 0.0,
            total_db: total,
        };
    }

    let mass_law_db = 20.0 * mass_arg.log10() - 47.0;
    let cylinder_correction_db = -10.0 * diameter_m.log10() + 5.0;
    let total_db = (mass_law_db + cylinder_correction_db + frequency_correction_db).max(0.0);

    TransmissionLoss {
        wall_thickness_m: wall_thickness,
        surface_mass_kg_m2: surface_mass,
        mass_law_db,
        cylinder_correction_db,
        frequency_correction_db,
        total_db,
    }
}

/// Predict sound pressure level outside the downstream pipe.
pub fn predict_noise(input: &NoiseInput) -> AnalysisOutcome<NoiseResult> {
    validate(input)?;
    let mut fallbacks = Vec::new();

    let acoustic = acoustic_power(input, &mut fallbacks);
    let diameter_m = input.units.diameter(input.pipe_diameter).get::<meter>();
    let transmission = transmission_loss(
        diameter_m,
        input.pipe_schedule,
        acoustic.peak_frequency_hz,
        &mut fallbacks,
    );

    let spl_1m = acoustic.sound_power_level_db - transmission.total_db - SPL_1M_OFFSET_DB;
    let distance_correction_db = 10.0 * input.distance.log10();
    let spl_at_distance = spl_1m - distance_correction_db;

    let assessment = NoiseLevel::from_spl(spl_1m);
    info!(
        lw = acoustic.sound_power_level_db,
        tl = transmission.total_db,
        spl_1m,
        assessment = assessment.label(),
        "noise prediction complete"
    );

    Ok(NoiseResult {
        acoustic,
        transmission,
        spl_1m,
        distance: input.distance,
        distance_correction_db,
        spl_at_distance,
        assessment,
        description: assessment.description().to_string(),
        recommended_actions: assessment.actions(),
        compliance: check_compliance(spl_1m),
        fallbacks,
    })
}
