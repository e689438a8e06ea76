//! Input validation ahead of any sizing calculation.
//!
//! Hard checks reject non-physical requests with [`SizingError::InvalidInput`].
//! Softer checks return advisory notes that are carried into the result
//! warnings; they never abort the calculation.

use uom::si::pressure::bar;
use uom::si::thermodynamic_temperature::kelvin;

use crate::common::{require_in_range, require_positive};
use crate::error::{SizingError, SizingOutcome};
use crate::process::{Fluid, GasProperties, LiquidProperties, ProcessConditions};
use crate::valve::ValveCharacteristics;

const MAX_TYPICAL_INLET_BAR: f64 = 500.0;
const MAX_TYPICAL_VISCOSITY_CST: f64 = 1000.0;

/// Validate process conditions, returning advisory notes.
pub fn validate_process(process: &ProcessConditions) -> SizingOutcome<Vec<String>> {
    let mut notes = Vec::new();

    check_pressures(process, &mut notes)?;
    require_positive(process.temperature, "temperature")?;
    check_flows(process, &mut notes)?;

    match &process.fluid {
        Fluid::Liquid(liquid) => check_liquid(process, liquid, &mut notes)?,
        Fluid::Gas(gas) => check_gas(gas, &mut notes)?,
    }

    Ok(notes)
}

fn check_pressures(process: &ProcessConditions, notes: &mut Vec<String>) -> SizingOutcome<()> {
    let p1 = process.inlet_pressure;
    let p2 = process.outlet_pressure;
    require_positive(p1, "inlet_pressure")?;
    require_positive(p2, "outlet_pressure")?;
    if p1 <= p2 {
        return Err(SizingError::invalid(
            "inlet_pressure",
            format!("must exceed outlet pressure ({p1} <= {p2})"),
        ));
    }

    let ratio = process.pressure_ratio();
    if ratio < 0.05 {
        notes.push(format!("Very low pressure ratio ({ratio:.3}) - check for errors"));
    } else if ratio > 0.98 {
        notes.push(format!(
            "Very high pressure ratio ({ratio:.3}) - limited valve authority"
        ));
    }

    let p1_si = process.units.pressure(p1);
    if p1_si.get::<bar>() > MAX_TYPICAL_INLET_BAR {
        notes.push(format!(
            "Inlet pressure ({p1:.1} {}) exceeds typical industrial range",
            process.units.pressure_label()
        ));
    }

    let dp_percent = process.delta_p() / p1 * 100.0;
    if dp_percent > 90.0 {
        notes.push(format!(
            "Very high pressure drop ({dp_percent:.0}%) - review system design"
        ));
    } else if dp_percent < 5.0 {
        notes.push(format!(
            "Very low pressure drop ({dp_percent:.0}%) - poor valve authority expected"
        ));
    }
    Ok(())
}

fn check_flows(process: &ProcessConditions, notes: &mut Vec<String>) -> SizingOutcome<()> {
    let flow = &process.flow;
    require_positive(flow.normal, "normal_flow")?;

    if let Some(min) = flow.minimum {
        require_positive(min, "minimum_flow")?;
        if min >= flow.normal {
            return Err(SizingError::invalid(
                "minimum_flow",
                format!("must be less than normal flow ({min} >= {})", flow.normal),
            ));
        }
    }
    if let Some(max) = flow.maximum {
        require_positive(max, "maximum_flow")?;
        if max <= flow.normal {
            return Err(SizingError::invalid(
                "maximum_flow",
                format!("must be greater than normal flow ({max} <= {})", flow.normal),
            ));
        }
    }

    if let Some(turndown) = flow.turndown() {
        if turndown > 100.0 {
            notes.push(format!(
                "Very high turndown ratio ({turndown:.1}:1) - verify requirements"
            ));
        } else if turndown < 2.0 {
            notes.push(format!(
                "Low turndown ratio ({turndown:.1}:1) - limited control range"
            ));
        }
    }
    Ok(())
}

fn check_liquid(
    process: &ProcessConditions,
    liquid: &LiquidProperties,
    notes: &mut Vec<String>,
) -> SizingOutcome<()> {
    require_positive(liquid.density, "density")?;
    require_positive(liquid.viscosity, "viscosity")?;

    let pv = liquid.vapor_pressure;
    if !pv.is_finite() || pv < 0.0 {
        return Err(SizingError::invalid(
            "vapor_pressure",
            format!("must be non-negative, got {pv}"),
        ));
    }
    if pv >= process.inlet_pressure {
        return Err(SizingError::invalid(
            "vapor_pressure",
            format!(
                "must be below inlet pressure ({pv} >= {}); fluid flashes at the inlet",
                process.inlet_pressure
            ),
        ));
    }
    if let Some(pc) = liquid.critical_pressure {
        require_positive(pc, "critical_pressure")?;
    }

    if liquid.viscosity > MAX_TYPICAL_VISCOSITY_CST {
        notes.push(format!(
            "Very high viscosity ({:.1} cSt) - verify Reynolds correction",
            liquid.viscosity
        ));
    }
    if pv >= process.outlet_pressure {
        notes.push("Vapor pressure exceeds outlet pressure - cavitation likely".to_string());
    }

    let t_k = process.units.temperature(process.temperature).get::<kelvin>();
    if t_k < 223.15 {
        notes.push("Very low temperature for liquid service - check phase conditions".to_string());
    } else if t_k > 673.15 {
        notes.push("High temperature for liquid service - verify fluid properties".to_string());
    }
    Ok(())
}

fn check_gas(gas: &GasProperties, notes: &mut Vec<String>) -> SizingOutcome<()> {
    require_positive(gas.molecular_weight, "molecular_weight")?;
    let k = gas.specific_heat_ratio;
    if !k.is_finite() || k <= 1.0 {
        return Err(SizingError::invalid(
            "specific_heat_ratio",
            format!("must exceed 1, got {k}"),
        ));
    }
    require_positive(gas.compressibility, "compressibility")?;

    if gas.molecular_weight > 200.0 {
        notes.push(format!(
            "Very high molecular weight ({:.1}) - verify gas properties",
            gas.molecular_weight
        ));
    }
    if k > 2.0 {
        notes.push(format!("Specific heat ratio ({k:.2}) outside typical range"));
    }
    if gas.compressibility > 2.0 {
        notes.push(format!(
            "High compressibility factor ({:.2}) - verify conditions",
            gas.compressibility
        ));
    }
    Ok(())
}

/// Validate valve factors, returning advisory notes.
pub fn validate_valve(valve: &ValveCharacteristics) -> SizingOutcome<Vec<String>> {
    require_in_range(valve.fl, 0.0, 1.0, "fl")?;
    require_in_range(valve.xt, 0.0, 1.0, "xt")?;
    require_in_range(valve.fd, 0.0, 2.0, "fd")?;
    require_positive(valve.max_cv, "max_cv")?;

    let mut notes = Vec::new();
    if valve.fl < 0.1 {
        notes.push(format!("FL factor ({:.2}) outside typical range (0.1-1.0)", valve.fl));
    }
    if valve.xt < 0.1 {
        notes.push(format!("xT factor ({:.2}) outside typical range (0.1-1.0)", valve.xt));
    }
    if valve.fd < 0.1 {
        notes.push(format!("Fd factor ({:.2}) outside typical range (0.1-2.0)", valve.fd));
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::FlowRates;
    use crate::valve::{FlowCharacteristic, ValveStyle};
    use vf_core::units::UnitSystem;

    fn water() -> ProcessConditions {
        ProcessConditions {
            units: UnitSystem::Metric,
            temperature: 293.15,
            inlet_pressure: 10.0,
            outlet_pressure: 2.0,
            flow: FlowRates::normal(120.0),
            fluid: Fluid::Liquid(LiquidProperties {
                density: 998.0,
                viscosity: 1.0,
                vapor_pressure: 0.032,
                critical_pressure: None,
            }),
        }
    }

    fn air() -> ProcessConditions {
        ProcessConditions {
            fluid: Fluid::Gas(GasProperties {
                molecular_weight: 28.97,
                specific_heat_ratio: 1.4,
                compressibility: 1.0,
            }),
            ..water()
        }
    }

    fn field_of(err: SizingError) -> &'static str {
        match err {
            SizingError::InvalidInput { field, .. } => field,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn clean_water_case_has_no_notes() {
        let notes = validate_process(&water()).unwrap();
        assert!(notes.is_empty(), "{notes:?}");
    }

    #[test]
    fn rejects_reversed_pressures() {
        let mut p = water();
        p.outlet_pressure = 12.0;
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "inlet_pressure");
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let mut p = water();
        p.temperature = 0.0;
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "temperature");

        let mut p = water();
        p.flow.normal = -1.0;
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "normal_flow");

        let mut p = water();
        if let Fluid::Liquid(l) = &mut p.fluid {
            l.density = 0.0;
        }
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "density");
    }

    #[test]
    fn rejects_vapor_pressure_at_inlet() {
        let mut p = water();
        if let Fluid::Liquid(l) = &mut p.fluid {
            l.vapor_pressure = 10.0;
        }
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "vapor_pressure");
    }

    #[test]
    fn flags_cavitation_prone_vapor_pressure() {
        let mut p = water();
        if let Fluid::Liquid(l) = &mut p.fluid {
            l.vapor_pressure = 3.0;
        }
        let notes = validate_process(&p).unwrap();
        assert!(notes.iter().any(|n| n.contains("cavitation likely")));
    }

    #[test]
    fn rejects_inconsistent_flow_extremes() {
        let mut p = water();
        p.flow.maximum = Some(100.0);
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "maximum_flow");

        let mut p = water();
        p.flow.minimum = Some(130.0);
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "minimum_flow");
    }

    #[test]
    fn turndown_advisories() {
        let mut p = water();
        p.flow.minimum = Some(1.0);
        p.flow.maximum = Some(150.0);
        let notes = validate_process(&p).unwrap();
        assert!(notes.iter().any(|n| n.contains("Very high turndown")));
    }

    #[test]
    fn gas_checks() {
        let notes = validate_process(&air()).unwrap();
        assert!(notes.is_empty(), "{notes:?}");

        let mut p = air();
        if let Fluid::Gas(g) = &mut p.fluid {
            g.specific_heat_ratio = 1.0;
        }
        assert_eq!(field_of(validate_process(&p).unwrap_err()), "specific_heat_ratio");

        let mut p = air();
        if let Fluid::Gas(g) = &mut p.fluid {
            g.molecular_weight = 250.0;
            g.compressibility = 2.5;
        }
        let notes = validate_process(&p).unwrap();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn high_inlet_pressure_is_judged_in_bar() {
        let mut p = water();
        p.units = UnitSystem::Imperial;
        p.inlet_pressure = 600.0;
        p.outlet_pressure = 300.0;
        let notes = validate_process(&p).unwrap();
        assert!(!notes.iter().any(|n| n.contains("industrial range")));

        let mut p = water();
        p.inlet_pressure = 600.0;
        p.outlet_pressure = 300.0;
        let notes = validate_process(&p).unwrap();
        assert!(notes.iter().any(|n| n.contains("industrial range")));
    }

    #[test]
    fn valve_factor_ranges() {
        let mut valve = ValveCharacteristics {
            style: ValveStyle::Globe,
            fl: 0.9,
            xt: 0.75,
            fd: 1.0,
            max_cv: 150.0,
            characteristic: FlowCharacteristic::Linear,
        };
        assert!(validate_valve(&valve).unwrap().is_empty());

        valve.fl = 1.2;
        assert_eq!(field_of(validate_valve(&valve).unwrap_err()), "fl");

        valve.fl = 0.05;
        assert_eq!(validate_valve(&valve).unwrap().len(), 1);

        valve.fl = 0.9;
        valve.fd = 2.5;
        assert_eq!(field_of(validate_valve(&valve).unwrap_err()), "fd");
    }
}
