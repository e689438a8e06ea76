//! End-to-end sizing checks against worked cases.

use proptest::prelude::*;
use vf_core::{SizingConstants, UnitSystem};
use vf_sizing::{
    Assessment, FlowCharacteristic, FlowRates, FlowRegime, Fluid, GasProperties, Installation,
    LiquidProperties, NominalPipeSize, ProcessConditions, SizingConfig, SizingError,
    ValveCharacteristics, ValveStyle, size, size_gas, size_liquid,
};

fn water_case() -> ProcessConditions {
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

fn air_case() -> ProcessConditions {
    ProcessConditions {
        units: UnitSystem::Metric,
        temperature: 293.15,
        inlet_pressure: 10.0,
        outlet_pressure: 2.0,
        flow: FlowRates::normal(1000.0),
        fluid: Fluid::Gas(GasProperties {
            molecular_weight: 28.97,
            specific_heat_ratio: 1.4,
            compressibility: 1.0,
        }),
    }
}

fn globe(max_cv: f64) -> ValveCharacteristics {
    ValveCharacteristics {
        style: ValveStyle::Globe,
        fl: 0.9,
        xt: 0.75,
        fd: 1.0,
        max_cv,
        characteristic: FlowCharacteristic::Linear,
    }
}

#[test]
fn water_through_three_inch_globe() {
    let result = size_liquid(
        &water_case(),
        &globe(800.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();

    assert!(!result.is_choked);
    assert!(result.factors.fp >= 0.98 && result.factors.fp <= 1.0);

    let sg = 998.0 / 1000.0;
    let expected_basic = (120.0 / result.factors.fp) / (0.0865 * (8.0_f64 / sg).sqrt());
    assert!((result.cv_basic - expected_basic).abs() / expected_basic < 1e-12);
    assert!((result.cv_required - result.cv_basic).abs() / result.cv_basic < 0.05);

    let diag = result.liquid().unwrap();
    assert_eq!(diag.reynolds.regime, FlowRegime::Turbulent);
    assert_eq!(diag.reynolds.fr, 1.0);
    assert_eq!(result.effective_delta_p, result.delta_p);
    assert!(diag.choking.sigma_service > 1.0);
    assert!(result.fallbacks.is_empty());
}

#[test]
fn air_at_ratio_point_two_is_choked() {
    let result = size_gas(
        &air_case(),
        &globe(200.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();

    let gas = result.gas().unwrap();
    assert!((gas.critical.critical_ratio_perfect - 0.528).abs() < 1e-3);
    assert!((gas.critical.critical_ratio_valve - 0.396).abs() < 1e-3);
    assert!(result.is_choked);
    let y = result.factors.y.unwrap();
    assert!((y - 0.683).abs() < 1e-3);
}

#[test]
fn gas_ratio_exactly_at_critical_is_choked() {
    let k: f64 = 1.4;
    let xt = 0.75;
    let critical_valve = xt * (2.0 / (k + 1.0)).powf(k / (k - 1.0));

    let mut process = air_case();
    process.inlet_pressure = 1.0;
    process.outlet_pressure = critical_valve;

    let result = size_gas(
        &process,
        &globe(200.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();
    assert!(result.is_choked);
}

#[test]
fn unchoked_liquid_round_trip_recovers_cv() {
    let target_cv = 100.0;
    let mut process = water_case();
    if let Fluid::Liquid(liquid) = &mut process.fluid {
        liquid.viscosity = 0.3;
    }
    let sg = 0.998;
    let n1 = SizingConstants::METRIC.n1;
    process.flow.normal = target_cv * n1 * (process.delta_p() / sg).sqrt();

    let result = size_liquid(
        &process,
        &globe(200.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();

    assert!(!result.is_choked);
    assert_eq!(result.factors.fp, 1.0);
    assert_eq!(result.factors.fr, 1.0);
    assert!((result.cv_required - target_cv).abs() / target_cv < 1e-6);
}

#[test]
fn imperial_liquid_uses_imperial_constants() {
    let process = ProcessConditions {
        units: UnitSystem::Imperial,
        temperature: 528.0,
        inlet_pressure: 145.0,
        outlet_pressure: 29.0,
        flow: FlowRates::normal(528.0),
        fluid: Fluid::Liquid(LiquidProperties {
            density: 62.3,
            viscosity: 1.0,
            vapor_pressure: 0.46,
            critical_pressure: None,
        }),
    };
    let result = size_liquid(
        &process,
        &globe(200.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();

    let sg = 62.3 / 62.4;
    let expected = 528.0 / (116.0_f64 / sg).sqrt();
    assert!((result.cv_basic - expected).abs() / expected < 1e-12);
    assert!(!result.is_choked);
    assert!(result.liquid().unwrap().authority.piping_delta_p > 0.0);
}

#[test]
fn flashing_inlet_is_rejected_with_field() {
    let mut process = water_case();
    if let Fluid::Liquid(liquid) = &mut process.fluid {
        liquid.vapor_pressure = 12.0;
    }
    let err = size_liquid(
        &process,
        &globe(800.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap_err();
    match err {
        SizingError::InvalidInput { field, .. } => assert_eq!(field, "vapor_pressure"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn cavitating_service_chokes() {
    let mut process = water_case();
    process.outlet_pressure = 0.5;
    if let Fluid::Liquid(liquid) = &mut process.fluid {
        liquid.vapor_pressure = 0.4;
    }
    let valve = ValveCharacteristics {
        fl: 0.6,
        ..globe(800.0)
    };
    let result = size_liquid(
        &process,
        &valve,
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();
    assert!(result.is_choked);
    assert!(result.effective_delta_p < result.delta_p);
    let choking = result.liquid().unwrap().choking;
    assert!(choking.choking_margin < 0.0);
    assert!(result.warnings.iter().any(|w| w.contains("Flow is choked")));
}

#[test]
fn dispatch_follows_phase() {
    let config = SizingConfig::default();
    let install = Installation::line_size(NominalPipeSize::Three);
    let liquid = size(&water_case(), &globe(800.0), &install, &config).unwrap();
    assert!(liquid.liquid().is_some());
    let gas = size(&air_case(), &globe(200.0), &install, &config).unwrap();
    assert!(gas.gas().is_some());
}

#[test]
fn reduced_valve_applies_fp() {
    let install = Installation {
        pipe_size: NominalPipeSize::Four,
        valve_size: NominalPipeSize::Two,
        schedule: Default::default(),
    };
    let line = size_liquid(
        &water_case(),
        &globe(800.0),
        &Installation::line_size(NominalPipeSize::Four),
    )
    .unwrap();
    let reduced = size_liquid(&water_case(), &globe(800.0), &install).unwrap();
    assert!(reduced.factors.fp < 1.0);
    assert!(reduced.cv_basic > line.cv_basic);
    let reducers = reduced.liquid().unwrap().reducers;
    assert!(reducers.total_geometry_effect < 1.0);
}

#[test]
fn scenario_assessments_are_reported() {
    let result = size_liquid(
        &water_case(),
        &globe(520.0),
        &Installation::line_size(NominalPipeSize::Three),
    )
    .unwrap();
    assert_eq!(result.scenarios.len(), 3);
    assert!(result.worst_assessment() >= Assessment::Warning);
    assert!(result.warnings.iter().any(|w| w.contains("flow: ")));
}

proptest! {
    #[test]
    fn liquid_cv_positive_and_drop_bounded(
        p1 in 2.0_f64..50.0,
        ratio in 0.06_f64..0.95,
        flow in 1.0_f64..500.0,
        density in 500.0_f64..1200.0,
        viscosity in 0.3_f64..200.0,
        pv_frac in 0.0_f64..0.9,
        fl in 0.5_f64..1.0,
    ) {
        let p2 = p1 * ratio;
        let process = ProcessConditions {
            units: UnitSystem::Metric,
            temperature: 300.0,
            inlet_pressure: p1,
            outlet_pressure: p2,
            flow: FlowRates::normal(flow),
            fluid: Fluid::Liquid(LiquidProperties {
                density,
                viscosity,
                vapor_pressure: pv_frac * p1,
                critical_pressure: None,
            }),
        };
        let valve = ValveCharacteristics { fl, ..globe(1000.0) };
        let result = size_liquid(&process, &valve, &Installation::line_size(NominalPipeSize::Four))
            .unwrap();

        prop_assert!(result.cv_required > 0.0);
        prop_assert!(result.effective_delta_p <= result.delta_p);
        if result.is_choked {
            prop_assert!(result.effective_delta_p < result.delta_p);
        } else {
            prop_assert_eq!(result.effective_delta_p, result.delta_p);
        }
    }
}
