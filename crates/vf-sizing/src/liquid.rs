//! Liquid sizing engine (ISA 75.01 / IEC 60534-2-1).

use uom::si::length::meter;
use uom::si::mass_density::kilogram_per_cubic_meter;
use uom::si::volume_rate::cubic_meter_per_second;
use vf_core::constants::{SizingConstants, water_density};
use vf_core::numeric::{Estimate, Fallback, checked_div, checked_sqrt};
use vf_core::units::{UnitSystem, pa};

use crate::common::check_finite;
use crate::config::SizingConfig;
use crate::error::{SizingError, SizingOutcome};
use crate::geometry::{fp_factor_with, reducer_effects};
use crate::pipe::{PipeTable, StandardPipeTable};
use crate::process::{FluidPhase, LiquidProperties, ProcessConditions};
use crate::result::{
    AuthorityRating, CriticalPressureBasis, Diagnostics, LiquidChoking, LiquidDiagnostics,
    SizingFactors, SizingResult, ValveAuthority,
};
use crate::reynolds::{ReynoldsInput, fr_factor};
use crate::scenario::{Assessment, ScenarioKind, ScenarioResult};
use crate::traits::SizingEngine;
use crate::validate::{validate_process, validate_valve};
use crate::valve::{Installation, ValveCharacteristics};

/// Line loss coefficient for the authority estimate (f = 0.02 over 100 D).
const PIPE_LOSS_K: f64 = 2.0;

const FF_FALLBACK: f64 = 0.9;

/// Critical pressure estimate when none is supplied.
///
/// Density bands are a placeholder heuristic, not a standard method.
fn estimated_critical_pressure(units: UnitSystem, density: f64) -> (f64, CriticalPressureBasis) {
    let water_like = match units {
        UnitSystem::Metric => (900.0..=1100.0).contains(&density),
        UnitSystem::Imperial => (55.0..=70.0).contains(&density),
    };
    let pc = match (units, water_like) {
        (UnitSystem::Metric, true) => 221.2,
        (UnitSystem::Metric, false) => 50.0,
        (UnitSystem::Imperial, true) => 3206.0,
        (UnitSystem::Imperial, false) => 725.0,
    };
    let basis = if water_like {
        CriticalPressureBasis::WaterLikeEstimate
    } else {
        CriticalPressureBasis::HydrocarbonEstimate
    };
    (pc, basis)
}

/// Liquid critical pressure ratio factor Ff = 0.96 - 0.28 sqrt(Pv / Pc).
pub fn ff_factor(vapor_pressure: f64, critical_pressure: f64) -> Estimate {
    let ratio = checked_div(vapor_pressure, critical_pressure, "Ff", FF_FALLBACK);
    if ratio.is_fallback() {
        return ratio;
    }
    let root = checked_sqrt(ratio.value, "Ff", FF_FALLBACK);
    if root.is_fallback() {
        return root;
    }
    Estimate::computed((0.96 - 0.28 * root.value).clamp(0.7, 0.98))
}

/// Choked-flow analysis at one operating point.
fn choking(
    p1: f64,
    delta_p: f64,
    liquid: &LiquidProperties,
    fl: f64,
    ff: f64,
    fallbacks: &mut Vec<Fallback>,
) -> (f64, f64, f64) {
    let allowable = fl * fl * (p1 - ff * liquid.vapor_pressure);
    let margin = checked_div(allowable - delta_p, allowable, "choking margin", 0.0).record(fallbacks);
    let sigma = checked_div(
        p1 - liquid.vapor_pressure,
        delta_p,
        "service sigma",
        f64::MAX,
    )
    .record(fallbacks);
    (allowable, margin, sigma)
}

/// Sizing engine for incompressible service.
pub struct LiquidSizing<'a> {
    table: &'a dyn PipeTable,
}

impl LiquidSizing<'static> {
    pub fn new() -> Self {
        Self {
            table: &StandardPipeTable,
        }
    }
}

impl Default for LiquidSizing<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LiquidSizing<'a> {
    pub fn with_table(table: &'a dyn PipeTable) -> Self {
        Self { table }
    }

    fn authority(
        &self,
        process: &ProcessConditions,
        liquid: &LiquidProperties,
        pipe_diameter: f64,
        valve_delta_p: f64,
        fallbacks: &mut Vec<Fallback>,
    ) -> ValveAuthority {
        let units = process.units;
        let q = units
            .liquid_flow(process.flow.normal)
            .get::<cubic_meter_per_second>();
        let d = units.diameter(pipe_diameter).get::<meter>();
        let rho = units.density(liquid.density).get::<kilogram_per_cubic_meter>();

        let area = std::f64::consts::PI * d * d / 4.0;
        let velocity = checked_div(q, area, "line velocity", 0.0).record(fallbacks);
        let loss_pa = PIPE_LOSS_K * rho * velocity * velocity / 2.0;
        let piping_delta_p = units.pressure_value(pa(loss_pa));

        let total_delta_p = valve_delta_p + piping_delta_p;
        let authority =
            checked_div(valve_delta_p, total_delta_p, "valve authority", 0.0).record(fallbacks);

        ValveAuthority {
            valve_delta_p,
            piping_delta_p,
            total_delta_p,
            authority,
            rating: AuthorityRating::from_authority(authority),
        }
    }
}

struct LiquidScenarioBasis<'p> {
    process: &'p ProcessConditions,
    liquid: &'p LiquidProperties,
    valve: &'p ValveCharacteristics,
    config: &'p SizingConfig,
    specific_gravity: f64,
    fp: f64,
    fr: f64,
    ff: f64,
    cv_required: f64,
}

impl LiquidScenarioBasis<'_> {
    fn evaluate(&self, kind: ScenarioKind, fallbacks: &mut Vec<Fallback>) -> ScenarioResult {
        let (flow_factor, dp_factor, description) = match kind {
            ScenarioKind::Minimum => (0.3, 0.7, "30% flow (minimum controllable)"),
            ScenarioKind::Normal => (1.0, 1.0, "100% flow (normal operation)"),
            ScenarioKind::Maximum => (1.25, 1.4, "125% flow (maximum design)"),
        };
        let p = self.process;
        let n1 = SizingConstants::for_units(p.units).n1;

        let flow = p.flow.normal * flow_factor;
        let delta_p = p.delta_p() * dp_factor;
        let outlet_pressure = p.outlet_pressure;
        let inlet_pressure = outlet_pressure + delta_p;

        let (allowable, _, _) = choking(
            inlet_pressure,
            delta_p,
            self.liquid,
            self.valve.fl,
            self.ff,
            fallbacks,
        );
        let effective = delta_p.min(allowable);

        let cv = checked_div(
            flow / self.fp,
            n1 * (effective / self.specific_gravity).sqrt() * self.fr,
            "scenario Cv",
            self.cv_required,
        )
        .record(fallbacks);
        let opening = self.valve.opening_percent(cv).record(fallbacks);
        let (assessment, message) = self.config.liquid_opening.assess(opening);

        ScenarioResult {
            kind,
            description: description.to_string(),
            flow,
            inlet_pressure,
            outlet_pressure,
            delta_p,
            choked: Some(delta_p > allowable),
            cv: Some(cv),
            capacity_ratio: Some(cv / self.cv_required),
            opening_percent: Some(opening),
            assessment,
            message: message.to_string(),
        }
    }
}

impl SizingEngine for LiquidSizing<'_> {
    fn name(&self) -> &str {
        "ISA 75.01 liquid"
    }

    fn phase(&self) -> FluidPhase {
        FluidPhase::Liquid
    }

    fn size(
        &self,
        process: &ProcessConditions,
        valve: &ValveCharacteristics,
        installation: &Installation,
        config: &SizingConfig,
    ) -> SizingOutcome<SizingResult> {
        let liquid = process.liquid().ok_or(SizingError::WrongService {
            what: "liquid sizing requires liquid properties",
        })?;
        let mut warnings = validate_process(process)?;
        warnings.extend(validate_valve(valve)?);

        let units = process.units;
        let mut fallbacks = Vec::new();
        let mut recommendations = Vec::new();

        // Step 1
        let delta_p = process.delta_p();
        let specific_gravity = liquid.density / water_density(units);

        // Step 2
        let (critical_pressure, critical_pressure_basis) = match liquid.critical_pressure {
            Some(pc) => (pc, CriticalPressureBasis::Supplied),
            None => estimated_critical_pressure(units, liquid.density),
        };
        let ff = ff_factor(liquid.vapor_pressure, critical_pressure).record(&mut fallbacks);
        tracing::debug!(ff, critical_pressure, ?critical_pressure_basis, "liquid Ff");

        // Step 3
        let (allowable_delta_p, choking_margin, sigma_service) = choking(
            process.inlet_pressure,
            delta_p,
            liquid,
            valve.fl,
            ff,
            &mut fallbacks,
        );
        let is_choked = delta_p > allowable_delta_p;
        let effective_delta_p = delta_p.min(allowable_delta_p);

        // Step 4
        let fp = fp_factor_with(
            self.table,
            units,
            installation.valve_size,
            installation.pipe_size,
            valve.style,
        )
        .record(&mut fallbacks);

        // Step 5
        let n1 = SizingConstants::for_units(units).n1;
        let cv_basic = check_finite(
            (process.flow.normal / fp) / (n1 * (effective_delta_p / specific_gravity).sqrt()),
            "basic Cv",
        )?;

        // Step 6
        let pipe_diameter = self.table.internal_diameter(installation.pipe_size, units);
        let valve_diameter = self.table.internal_diameter(installation.valve_size, units);
        let reynolds = fr_factor(
            &ReynoldsInput {
                units,
                flow_rate: process.flow.normal,
                cv_initial: cv_basic,
                viscosity: liquid.viscosity,
                fd: valve.fd,
                pipe_diameter,
                specific_gravity,
            },
            &config.reynolds,
        );
        fallbacks.extend(reynolds.fallbacks.iter().cloned());
        let fr = reynolds.fr;
        let cv_required = check_finite(reynolds.cv_corrected, "required Cv")?;

        // Step 7
        let authority = self.authority(process, liquid, pipe_diameter, effective_delta_p, &mut fallbacks);
        let reducers = reducer_effects(
            self.table,
            units,
            installation.pipe_size,
            installation.valve_size,
            installation.pipe_size,
        );

        // Step 8
        let basis = LiquidScenarioBasis {
            process,
            liquid,
            valve,
            config,
            specific_gravity,
            fp,
            fr,
            ff,
            cv_required,
        };
        let scenarios: Vec<ScenarioResult> = ScenarioKind::ALL
            .iter()
            .map(|kind| basis.evaluate(*kind, &mut fallbacks))
            .collect();

        let opening_percent = valve.opening_percent(cv_required).record(&mut fallbacks);
        let rated_capacity_exceeded = cv_required > valve.max_cv;

        if is_choked {
            warnings.push("Flow is choked - valve capacity limited by cavitation".to_string());
            recommendations
                .push("Consider anti-cavitation trim or increase downstream pressure".to_string());
        }
        if fr < 0.8 {
            warnings.push(format!("Significant viscous effects (Fr = {fr:.3})"));
            recommendations.push("Consider larger valve or verify viscosity data".to_string());
        }
        if authority.authority < 0.25 {
            warnings.push(format!("Poor valve authority ({:.2})", authority.authority));
            recommendations
                .push("Increase valve pressure drop or reduce system losses".to_string());
        }
        if rated_capacity_exceeded {
            warnings.push(format!(
                "Required Cv ({cv_required:.1}) exceeds rated Cv ({:.1})",
                valve.max_cv
            ));
            recommendations.push("Select a larger valve size or higher-capacity trim".to_string());
        }
        warnings.extend(scenarios.iter().filter_map(|s| s.warning(Assessment::Warning)));
        warnings.extend(fallbacks.iter().map(ToString::to_string));

        tracing::info!(
            cv_basic,
            cv_required,
            fp,
            fr,
            is_choked,
            warnings = warnings.len(),
            "liquid sizing complete"
        );

        Ok(SizingResult {
            phase: FluidPhase::Liquid,
            units,
            style: valve.style,
            cv_basic,
            cv_required,
            is_choked,
            delta_p,
            effective_delta_p,
            factors: SizingFactors {
                fp,
                fp_applied: true,
                fr,
                fr_applied: true,
                y: None,
                ff: Some(ff),
            },
            rated_cv: valve.max_cv,
            opening_percent,
            rated_capacity_exceeded,
            scenarios,
            diagnostics: Diagnostics::Liquid(LiquidDiagnostics {
                specific_gravity,
                pipe_diameter,
                valve_diameter,
                choking: LiquidChoking {
                    critical_pressure,
                    critical_pressure_basis,
                    ff,
                    allowable_delta_p,
                    choking_margin,
                    sigma_service,
                },
                reynolds,
                authority,
                reducers,
            }),
            warnings,
            recommendations,
            fallbacks,
        })
    }
}
