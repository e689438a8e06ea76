//! Gas and vapour sizing engine (ISA 75.01 / IEC 60534-2-1).

use uom::si::length::meter;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::cubic_meter_per_second;
use vf_core::constants::{AIR_DENSITY_REF_KG_M3, R_GAS, SizingConstants, valve_area_from_cv};
use vf_core::numeric::{Estimate, Fallback, checked_div, checked_sqrt};
use vf_core::units::UnitSystem;

use crate::common::check_finite;
use crate::config::SizingConfig;
use crate::error::{SizingError, SizingOutcome};
use crate::geometry::fp_factor_with;
use crate::pipe::{PipeTable, StandardPipeTable};
use crate::process::{FluidPhase, GasProperties, ProcessConditions};
use crate::result::{
    Diagnostics, GasCriticalFlow, GasDiagnostics, GasVelocity, MachBand, SizingFactors,
    SizingResult,
};
use crate::scenario::{Assessment, ScenarioKind, ScenarioResult};
use crate::traits::SizingEngine;
use crate::validate::{validate_process, validate_valve};
use crate::valve::{Installation, ValveCharacteristics};

const Y_FALLBACK: f64 = 0.8;
const SONIC_FALLBACK_MPS: f64 = 300.0;

/// Critical pressure ratios for `pressure_ratio` = p2/p1.
///
/// Choked when the ratio is at or below the valve critical ratio.
pub fn critical_flow(pressure_ratio: f64, k: f64, xt: f64) -> (GasCriticalFlow, bool) {
    let critical_ratio_perfect = (2.0 / (k + 1.0)).powf(k / (k - 1.0));
    let critical_ratio_valve = xt * critical_ratio_perfect;
    let is_choked = pressure_ratio <= critical_ratio_valve;
    let choking_margin = if critical_ratio_valve > 0.0 {
        (pressure_ratio - critical_ratio_valve) / critical_ratio_valve
    } else {
        0.0
    };
    (
        GasCriticalFlow {
            pressure_ratio,
            critical_ratio_perfect,
            critical_ratio_valve,
            choking_margin,
        },
        is_choked,
    )
}

/// Expansion factor Y.
///
/// Choked: (2/3) sqrt(k xT). Otherwise the isentropic-work form, clamped to
/// [0.1, 1], with the linear form 1 - (1 - ratio)/(3 k xT) as a flagged
/// fallback and 0.8 when neither evaluates.
pub fn expansion_factor(pressure_ratio: f64, k: f64, xt: f64, is_choked: bool) -> Estimate {
    if is_choked {
        return Estimate::computed((2.0 / 3.0) * (k * xt).sqrt());
    }

    let exponent = (k - 1.0) / k;
    let work = (k / (k - 1.0)) * (1.0 - pressure_ratio.powf(exponent)) / (1.0 - pressure_ratio);
    if work.is_finite() && work >= 0.0 {
        return Estimate::computed(work.sqrt().clamp(0.1, 1.0));
    }

    let simple = 1.0 - (1.0 - pressure_ratio) / (3.0 * k * xt);
    if simple.is_finite() {
        return Estimate::assumed(
            "expansion factor",
            simple.clamp(0.1, 1.0),
            "isentropic approximation not evaluable; linear form used",
        );
    }
    Estimate::assumed(
        "expansion factor",
        Y_FALLBACK,
        "no expansion factor form evaluable",
    )
}

/// Inlet density in kg/m³ from the real-gas law.
pub fn inlet_density(units: UnitSystem, p1: f64, temperature: f64, gas: &GasProperties) -> Estimate {
    let p_pa = units.pressure(p1).get::<pascal>();
    let t_k = units.temperature(temperature).get::<kelvin>();
    checked_div(
        p_pa * gas.molecular_weight,
        gas.compressibility * R_GAS * t_k,
        "inlet density",
        AIR_DENSITY_REF_KG_M3,
    )
}

/// Required Cv at one operating point, caller units.
fn gas_cv(
    units: UnitSystem,
    flow: f64,
    p1: f64,
    delta_p: f64,
    y: f64,
    density: f64,
    is_choked: bool,
) -> f64 {
    let n = SizingConstants::for_units(units);
    let relative_density = density / AIR_DENSITY_REF_KG_M3;
    if is_choked {
        flow / (n.n6 * p1 * y * relative_density.sqrt())
    } else {
        flow / (n.n9 * y * p1 * (delta_p * relative_density).sqrt())
    }
}

/// Sizing engine for compressible service.
///
/// Fp and Fr are not applied; the line size feeds the velocity diagnostics.
pub struct GasSizing<'a> {
    table: &'a dyn PipeTable,
}

impl GasSizing<'static> {
    pub fn new() -> Self {
        Self {
            table: &StandardPipeTable,
        }
    }
}

impl Default for GasSizing<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GasSizing<'a> {
    pub fn with_table(table: &'a dyn PipeTable) -> Self {
        Self { table }
    }

    fn velocities(
        &self,
        process: &ProcessConditions,
        gas: &GasProperties,
        cv: f64,
        density: f64,
        pipe_diameter: f64,
        fallbacks: &mut Vec<Fallback>,
    ) -> GasVelocity {
        let units = process.units;
        let t_k = units.temperature(process.temperature).get::<kelvin>();
        let k = gas.specific_heat_ratio;

        let sonic_ideal = checked_sqrt(
            k * R_GAS * t_k / gas.molecular_weight,
            "sonic velocity",
            SONIC_FALLBACK_MPS,
        )
        .record(fallbacks);
        let sonic = sonic_ideal * gas.compressibility.sqrt();

        let q = units
            .gas_flow(process.flow.normal)
            .get::<cubic_meter_per_second>();
        let flow_area = valve_area_from_cv(cv);
        let valve_velocity = checked_div(q, flow_area, "valve velocity", 0.0).record(fallbacks);
        let mach = checked_div(valve_velocity, sonic, "Mach number", 0.0).record(fallbacks);

        let d = units.diameter(pipe_diameter).get::<meter>();
        let pipe_area = std::f64::consts::PI * d * d / 4.0;
        let pipe_velocity = checked_div(q, pipe_area, "line velocity", 0.0).record(fallbacks);

        GasVelocity {
            inlet_density_kg_m3: density,
            sonic_velocity_ideal_mps: sonic_ideal,
            sonic_velocity_mps: sonic,
            flow_area_m2: flow_area,
            valve_velocity_mps: valve_velocity,
            mach_number: mach,
            mach_band: MachBand::from_mach(mach),
            pipe_velocity_mps: pipe_velocity,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn scenario(
        &self,
        kind: ScenarioKind,
        process: &ProcessConditions,
        gas: &GasProperties,
        valve: &ValveCharacteristics,
        config: &SizingConfig,
        cv_required: f64,
        fallbacks: &mut Vec<Fallback>,
    ) -> ScenarioResult {
        let (flow_factor, p1_factor, p2_factor, description) = match kind {
            ScenarioKind::Minimum => (0.3, 1.0, 1.1, "30% flow, higher backpressure"),
            ScenarioKind::Normal => (1.0, 1.0, 1.0, "Normal operating conditions"),
            ScenarioKind::Maximum => (1.5, 1.1, 1.0, "150% flow, higher supply pressure"),
        };
        let flow = process.flow.normal * flow_factor;
        let inlet_pressure = process.inlet_pressure * p1_factor;
        let outlet_pressure = process.outlet_pressure * p2_factor;
        let delta_p = inlet_pressure - outlet_pressure;

        if delta_p <= 0.0 {
            return ScenarioResult {
                kind,
                description: description.to_string(),
                flow,
                inlet_pressure,
                outlet_pressure,
                delta_p,
                choked: None,
                cv: None,
                capacity_ratio: None,
                opening_percent: None,
                assessment: Assessment::Critical,
                message: "Critical - No forward pressure drop".to_string(),
            };
        }

        let k = gas.specific_heat_ratio;
        let ratio = outlet_pressure / inlet_pressure;
        let (_, is_choked) = critical_flow(ratio, k, valve.xt);
        let y = expansion_factor(ratio, k, valve.xt, is_choked).record(fallbacks);
        let density = inlet_density(process.units, inlet_pressure, process.temperature, gas)
            .record(fallbacks);
        let cv = gas_cv(
            process.units,
            flow,
            inlet_pressure,
            delta_p,
            y,
            density,
            is_choked,
        );
        let opening = valve.opening_percent(cv).record(fallbacks);
        let (assessment, message) = config.gas_opening.assess(opening);

        ScenarioResult {
            kind,
            description: description.to_string(),
            flow,
            inlet_pressure,
            outlet_pressure,
            delta_p,
            choked: Some(is_choked),
            cv: Some(cv),
            capacity_ratio: Some(cv / cv_required),
            opening_percent: Some(opening),
            assessment,
            message: message.to_string(),
        }
    }
}

impl SizingEngine for GasSizing<'_> {
    fn name(&self) -> &str {
        "ISA 75.01 gas"
    }

    fn phase(&self) -> FluidPhase {
        FluidPhase::Gas
    }

    fn size(
        &self,
        process: &ProcessConditions,
        valve: &ValveCharacteristics,
        installation: &Installation,
        config: &SizingConfig,
    ) -> SizingOutcome<SizingResult> {
        let gas = process.gas().ok_or(SizingError::WrongService {
            what: "gas sizing requires gas properties",
        })?;
        let mut warnings = validate_process(process)?;
        warnings.extend(validate_valve(valve)?);

        let units = process.units;
        let k = gas.specific_heat_ratio;
        let mut fallbacks = Vec::new();
        let mut recommendations = Vec::new();

        let delta_p = process.delta_p();
        let pressure_ratio = process.pressure_ratio();
        let (critical, is_choked) = critical_flow(pressure_ratio, k, valve.xt);
        let y = expansion_factor(pressure_ratio, k, valve.xt, is_choked).record(&mut fallbacks);
        tracing::debug!(
            pressure_ratio,
            critical_ratio_valve = critical.critical_ratio_valve,
            is_choked,
            y,
            "gas expansion"
        );

        let density = inlet_density(units, process.inlet_pressure, process.temperature, gas)
            .record(&mut fallbacks);
        let cv_required = check_finite(
            gas_cv(
                units,
                process.flow.normal,
                process.inlet_pressure,
                delta_p,
                y,
                density,
                is_choked,
            ),
            "required Cv",
        )?;
        let effective_delta_p = if is_choked {
            process.inlet_pressure * (1.0 - critical.critical_ratio_valve)
        } else {
            delta_p
        };

        let pipe_diameter = self.table.internal_diameter(installation.pipe_size, units);
        let velocity = self.velocities(process, gas, cv_required, density, pipe_diameter, &mut fallbacks);
        let fp = fp_factor_with(
            self.table,
            units,
            installation.valve_size,
            installation.pipe_size,
            valve.style,
        )
        .record(&mut fallbacks);

        let scenarios: Vec<ScenarioResult> = ScenarioKind::ALL
            .iter()
            .map(|kind| self.scenario(*kind, process, gas, valve, config, cv_required, &mut fallbacks))
            .collect();

        let opening_percent = valve.opening_percent(cv_required).record(&mut fallbacks);
        let rated_capacity_exceeded = cv_required > valve.max_cv;

        if is_choked {
            warnings.push("Flow is choked (sonic) - maximum flow rate achieved".to_string());
            recommendations
                .push("Consider larger valve or increased downstream pressure".to_string());
        }
        if velocity.mach_number > 0.8 {
            warnings.push(format!(
                "High Mach number ({:.2}) - noise and erosion concerns",
                velocity.mach_number
            ));
            recommendations.push("Consider low-noise trim or velocity reduction".to_string());
        }
        if pressure_ratio < 0.3 {
            warnings.push("Very low pressure ratio - high velocity potential".to_string());
            recommendations.push("Verify downstream pressure requirements".to_string());
        }
        if rated_capacity_exceeded {
            warnings.push(format!(
                "Required Cv ({cv_required:.1}) exceeds rated Cv ({:.1})",
                valve.max_cv
            ));
            recommendations.push("Select a larger valve size or higher-capacity trim".to_string());
        }
        warnings.extend(scenarios.iter().filter_map(|s| s.warning(Assessment::Critical)));
        warnings.extend(fallbacks.iter().map(ToString::to_string));

        tracing::info!(
            cv_required,
            y,
            is_choked,
            mach = velocity.mach_number,
            warnings = warnings.len(),
            "gas sizing complete"
        );

        Ok(SizingResult {
            phase: FluidPhase::Gas,
            units,
            style: valve.style,
            cv_basic: cv_required,
            cv_required,
            is_choked,
            delta_p,
            effective_delta_p,
            factors: SizingFactors {
                fp,
                fp_applied: false,
                fr: 1.0,
                fr_applied: false,
                y: Some(y),
                ff: None,
            },
            rated_cv: valve.max_cv,
            opening_percent,
            rated_capacity_exceeded,
            scenarios,
            diagnostics: Diagnostics::Gas(GasDiagnostics {
                pipe_diameter,
                critical,
                velocity,
            }),
            warnings,
            recommendations,
            fallbacks,
        })
    }
}
