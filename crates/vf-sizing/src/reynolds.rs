//! Reynolds-number correction Fr for viscous liquid service.
//!
//! The valve Reynolds number depends on the Cv it is evaluated at, and the
//! corrected Cv depends on Fr, so the pair is solved by bounded fixed-point
//! iteration. Every step is kept in [`ReynoldsResult::trace`].

use serde::{Deserialize, Serialize};
use uom::si::volume_rate::cubic_meter_per_second;
use vf_core::constants::{SizingConstants, valve_area_from_cv};
use vf_core::numeric::{Estimate, Fallback, checked_div};
use vf_core::units::UnitSystem;

use crate::common::MIN_CV;

/// Upper Reynolds number of the laminar band.
pub const LAMINAR_UPPER: f64 = 56.0;
/// Reynolds number from which Fr is exactly 1.
pub const TURBULENT_LOWER: f64 = 40_000.0;
/// Reynolds number assumed when it cannot be computed.
pub const FALLBACK_REYNOLDS: f64 = 100_000.0;

/// Iteration controls for the Fr solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReynoldsConfig {
    pub max_iterations: usize,
    /// Relative Cv change below which the iteration stops.
    pub tolerance: f64,
}

impl Default for ReynoldsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 0.001,
        }
    }
}

/// Inputs of the Fr calculation, in the units of `units`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReynoldsInput {
    pub units: UnitSystem,
    pub flow_rate: f64,
    /// Cv before viscous correction.
    pub cv_initial: f64,
    /// Kinematic viscosity, cSt.
    pub viscosity: f64,
    pub fd: f64,
    /// Internal pipe diameter (mm or in).
    pub pipe_diameter: f64,
    pub specific_gravity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowRegime {
    Laminar,
    TransitionalLow,
    TransitionalMixed,
    TransitionalHigh,
    Turbulent,
}

impl FlowRegime {
    pub fn classify(reynolds: f64) -> Self {
        if reynolds <= LAMINAR_UPPER {
            FlowRegime::Laminar
        } else if reynolds <= 2300.0 {
            FlowRegime::TransitionalLow
        } else if reynolds <= 4000.0 {
            FlowRegime::TransitionalMixed
        } else if reynolds <= TURBULENT_LOWER {
            FlowRegime::TransitionalHigh
        } else {
            FlowRegime::Turbulent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowRegime::Laminar => "Laminar",
            FlowRegime::TransitionalLow => "Transitional (Low)",
            FlowRegime::TransitionalMixed => "Transitional (Mixed)",
            FlowRegime::TransitionalHigh => "Transitional (High)",
            FlowRegime::Turbulent => "Turbulent",
        }
    }
}

impl std::fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One fixed-point step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReynoldsIteration {
    pub iteration: usize,
    /// Cv the Reynolds number was evaluated at.
    pub cv: f64,
    pub reynolds_number: f64,
    pub fr: f64,
    pub cv_new: f64,
    pub relative_change: f64,
}

/// Flow quantities derived from the valve area estimated from Cv.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicFlow {
    pub valve_area_m2: f64,
    pub volume_flow_m3s: f64,
    pub velocity_mps: f64,
    pub hydraulic_diameter_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReynoldsResult {
    pub reynolds_number: f64,
    pub fr: f64,
    pub cv_initial: f64,
    pub cv_corrected: f64,
    /// cv_corrected / cv_initial
    pub correction_factor: f64,
    pub regime: FlowRegime,
    /// Fr < 0.5: the viscous penalty more than doubles Cv.
    pub correction_significant: bool,
    pub iterations: usize,
    pub converged: bool,
    pub trace: Vec<ReynoldsIteration>,
    pub characteristic: CharacteristicFlow,
    pub warnings: Vec<String>,
    pub fallbacks: Vec<Fallback>,
}

fn laminar_fr(reynolds: f64) -> f64 {
    (0.019 * reynolds.max(1.0).powf(0.67)).max(0.01)
}

/// Fr as a function of valve Reynolds number.
///
/// Non-decreasing in `reynolds`; exactly 1 from [`TURBULENT_LOWER`] up.
/// A non-finite input maps to 1.
pub fn fr_from_reynolds(reynolds: f64) -> f64 {
    if !reynolds.is_finite() {
        return 1.0;
    }
    if reynolds <= LAMINAR_UPPER {
        return laminar_fr(reynolds);
    }
    if reynolds >= TURBULENT_LOWER {
        return 1.0;
    }
    let lo = LAMINAR_UPPER.log10();
    let hi = TURBULENT_LOWER.log10();
    let t = (reynolds.log10() - lo) / (hi - lo);
    let fr_lam = laminar_fr(LAMINAR_UPPER);
    (fr_lam + t * (1.0 - fr_lam)).clamp(fr_lam, 1.0)
}

/// Valve Reynolds number at `cv`.
///
/// Re = N4 Fd Q sqrt(SG) / (N2 D^1.25 nu sqrt(Cv))
pub fn valve_reynolds(input: &ReynoldsInput, cv: f64) -> Estimate {
    let positive = [
        ("flow rate", input.flow_rate),
        ("specific gravity", input.specific_gravity),
        ("style modifier", input.fd),
        ("pipe diameter", input.pipe_diameter),
        ("viscosity", input.viscosity),
        ("Cv", cv),
    ];
    if let Some((name, value)) = positive
        .iter()
        .find(|(_, v)| !v.is_finite() || *v <= 0.0)
    {
        return Estimate::assumed(
            "Reynolds number",
            FALLBACK_REYNOLDS,
            format!("{name} is not positive ({value}); turbulent flow assumed"),
        );
    }

    let n = SizingConstants::for_units(input.units);
    let numerator = n.n4 * input.fd * input.flow_rate * input.specific_gravity.sqrt();
    let denominator = n.n2 * input.pipe_diameter.powf(1.25) * input.viscosity * cv.sqrt();
    checked_div(numerator, denominator, "Reynolds number", FALLBACK_REYNOLDS)
}

fn characteristic_flow(input: &ReynoldsInput, cv: f64, fallbacks: &mut Vec<Fallback>) -> CharacteristicFlow {
    let valve_area_m2 = valve_area_from_cv(cv.max(0.0));
    let volume_flow_m3s = input
        .units
        .liquid_flow(input.flow_rate)
        .get::<cubic_meter_per_second>();
    let velocity_mps =
        checked_div(volume_flow_m3s, valve_area_m2, "characteristic velocity", 0.0).record(fallbacks);
    CharacteristicFlow {
        valve_area_m2,
        volume_flow_m3s,
        velocity_mps,
        hydraulic_diameter_m: 2.0 * (valve_area_m2 / std::f64::consts::PI).sqrt(),
    }
}

fn reynolds_warnings(reynolds: f64, fr: f64, correction: f64) -> Vec<String> {
    let mut warnings = Vec::new();

    if reynolds < LAMINAR_UPPER {
        warnings.push(format!(
            "Laminar flow (Re = {reynolds:.0}) - Standard equations may not apply"
        ));
    } else if reynolds < 2300.0 {
        warnings.push(format!(
            "Low Reynolds number ({reynolds:.0}) - Transitional flow effects"
        ));
    }

    if fr < 0.1 {
        warnings.push(format!("Very low Fr factor ({fr:.3}) - Review calculation inputs"));
    } else if fr < 0.5 {
        warnings.push(format!("Low Fr factor ({fr:.3}) - Significant viscous effects"));
    }

    if correction > 2.0 {
        warnings.push(format!(
            "Large sizing correction ({correction:.1}x) - Consider process optimization"
        ));
    } else if correction > 1.5 {
        warnings.push(format!("Significant sizing correction ({correction:.1}x) required"));
    }

    warnings
}

/// Solve for Fr and the viscosity-corrected Cv.
pub fn fr_factor(input: &ReynoldsInput, config: &ReynoldsConfig) -> ReynoldsResult {
    let mut fallbacks = Vec::new();
    let cv_initial = input.cv_initial.max(MIN_CV);
    let max_iterations = config.max_iterations.max(1);

    let mut trace = Vec::with_capacity(max_iterations);
    let mut cv_current = cv_initial;
    let mut reynolds = FALLBACK_REYNOLDS;
    let mut fr = 1.0;
    let mut converged = false;

    for iteration in 1..=max_iterations {
        let estimate = valve_reynolds(input, cv_current);
        let failed = estimate.is_fallback();
        reynolds = estimate.record(&mut fallbacks);
        fr = if failed { 1.0 } else { fr_from_reynolds(reynolds) };

        let cv_new = cv_initial / fr;
        let relative_change = (cv_new - cv_current).abs() / cv_current;
        tracing::debug!(iteration, reynolds, fr, cv = cv_current, cv_new, "Fr iteration");

        trace.push(ReynoldsIteration {
            iteration,
            cv: cv_current,
            reynolds_number: reynolds,
            fr,
            cv_new,
            relative_change,
        });
        cv_current = cv_new;

        if failed || relative_change < config.tolerance {
            converged = !failed;
            break;
        }
    }

    if !converged && fallbacks.is_empty() {
        tracing::warn!(max_iterations, "Fr iteration did not converge");
    }

    let correction_factor = cv_current / cv_initial;
    let regime = FlowRegime::classify(reynolds);
    let characteristic = characteristic_flow(input, cv_current, &mut fallbacks);

    let mut warnings = reynolds_warnings(reynolds, fr, correction_factor);
    if !converged && fallbacks.is_empty() {
        warnings.push(format!(
            "Reynolds correction did not converge within {max_iterations} iterations"
        ));
    }
    warnings.extend(fallbacks.iter().map(ToString::to_string));

    ReynoldsResult {
        reynolds_number: reynolds,
        fr,
        cv_initial,
        cv_corrected: cv_current,
        correction_factor,
        regime,
        correction_significant: fr < 0.5,
        iterations: trace.len(),
        converged,
        trace,
        characteristic,
        warnings,
        fallbacks,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fr_is_non_decreasing(a in 0.0_f64..1e6, b in 0.0_f64..1e6) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(fr_from_reynolds(lo) <= fr_from_reynolds(hi));
        }

        #[test]
        fn fr_is_bounded(re in 0.0_f64..1e8) {
            let fr = fr_from_reynolds(re);
            prop_assert!((0.01..=1.0).contains(&fr));
        }
    }
}
