//! Piping geometry factor Fp and reducer loss effects.

use serde::{Deserialize, Serialize};
use vf_core::numeric::{Estimate, checked_div};
use vf_core::units::UnitSystem;

use crate::pipe::{NominalPipeSize, PipeTable, StandardPipeTable};
use crate::valve::ValveStyle;

/// Lower edge of the globe near-unity band.
const GLOBE_NEAR_UNITY_BETA: f64 = 0.9;

fn fp_formula(beta: f64, coefficient: f64) -> f64 {
    let reduction = 1.0 - beta * beta;
    (1.0 / (1.0 + coefficient * reduction * reduction)).sqrt()
}

/// Fp for a valve-to-pipe diameter ratio `beta`.
///
/// Globe bodies use a straight line between the full formula at
/// beta = 0.9 and unity at beta = 1, so Fp stays continuous and monotone.
pub fn fp_from_beta(beta: f64, style: ValveStyle) -> f64 {
    if beta >= style.fp_unity_beta() {
        return 1.0;
    }
    let c = style.fp_coefficient();
    let fp = match style {
        ValveStyle::Globe if beta >= GLOBE_NEAR_UNITY_BETA => {
            let anchor = fp_formula(GLOBE_NEAR_UNITY_BETA, c);
            1.0 - (1.0 - anchor) * (1.0 - beta) / (1.0 - GLOBE_NEAR_UNITY_BETA)
        }
        _ => fp_formula(beta, c),
    };
    fp.clamp(0.1, 1.0)
}

/// Fp for nominal sizes looked up in `table`.
pub fn fp_factor_with(
    table: &dyn PipeTable,
    units: UnitSystem,
    valve_size: NominalPipeSize,
    pipe_size: NominalPipeSize,
    style: ValveStyle,
) -> Estimate {
    let d_valve = table.internal_diameter(valve_size, units);
    let d_pipe = table.internal_diameter(pipe_size, units);
    let beta = checked_div(d_valve, d_pipe, "diameter ratio", 1.0);
    let fp = fp_from_beta(beta.value, style);
    tracing::debug!(beta = beta.value, fp, style = %style, "piping geometry factor");
    Estimate {
        value: fp,
        fallback: beta.fallback,
    }
}

/// Fp using the standard pipe table.
pub fn fp_factor(valve_size: NominalPipeSize, pipe_size: NominalPipeSize, style: ValveStyle) -> f64 {
    fp_factor_with(
        &StandardPipeTable,
        UnitSystem::Metric,
        valve_size,
        pipe_size,
        style,
    )
    .value
}

/// Loss coefficients for a pipe-reducer-valve-expander-pipe run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReducerEffects {
    /// d_valve / d_upstream
    pub upstream_beta: f64,
    /// d_valve / d_downstream
    pub downstream_beta: f64,
    pub velocity_ratio_upstream: f64,
    pub velocity_ratio_downstream: f64,
    pub loss_coefficient_upstream: f64,
    pub loss_coefficient_downstream: f64,
    /// sqrt(1 / (1 + k_up + k_down)); diagnostic only.
    pub total_geometry_effect: f64,
}

impl ReducerEffects {
    pub const NONE: Self = Self {
        upstream_beta: 1.0,
        downstream_beta: 1.0,
        velocity_ratio_upstream: 1.0,
        velocity_ratio_downstream: 1.0,
        loss_coefficient_upstream: 0.0,
        loss_coefficient_downstream: 0.0,
        total_geometry_effect: 1.0,
    };
}

/// Contraction loss for a diameter ratio `small / large`.
fn contraction_k(ratio: f64) -> f64 {
    0.5 * (1.0 - ratio * ratio)
}

/// Borda-Carnot expansion loss for a diameter ratio `small / large`.
fn expansion_k(ratio: f64) -> f64 {
    let r = 1.0 - ratio * ratio;
    r * r
}

/// Reducer and expander effects from raw internal diameters.
pub fn reducer_effects_from_diameters(d_up: f64, d_valve: f64, d_down: f64) -> ReducerEffects {
    if ![d_up, d_valve, d_down].iter().all(|d| d.is_finite() && *d > 0.0) {
        tracing::warn!(d_up, d_valve, d_down, "non-positive diameter; reducer effects skipped");
        return ReducerEffects::NONE;
    }

    let beta_up = d_valve / d_up;
    let beta_down = d_valve / d_down;

    let k_up = if beta_up < 1.0 {
        contraction_k(beta_up)
    } else {
        expansion_k(1.0 / beta_up)
    };
    let k_down = if beta_down < 1.0 {
        expansion_k(beta_down)
    } else {
        contraction_k(1.0 / beta_down)
    };

    ReducerEffects {
        upstream_beta: beta_up,
        downstream_beta: beta_down,
        velocity_ratio_upstream: (d_up / d_valve).powi(2),
        velocity_ratio_downstream: (d_valve / d_down).powi(2),
        loss_coefficient_upstream: k_up,
        loss_coefficient_downstream: k_down,
        total_geometry_effect: (1.0 / (1.0 + k_up + k_down)).sqrt(),
    }
}

/// Reducer and expander effects for nominal sizes.
pub fn reducer_effects(
    table: &dyn PipeTable,
    units: UnitSystem,
    upstream: NominalPipeSize,
    valve: NominalPipeSize,
    downstream: NominalPipeSize,
) -> ReducerEffects {
    reducer_effects_from_diameters(
        table.internal_diameter(upstream, units),
        table.internal_diameter(valve, units),
        table.internal_diameter(downstream, units),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_at_line_size_for_all_styles() {
        for style in ValveStyle::ALL {
            assert_eq!(fp_from_beta(1.0, style), 1.0);
            assert_eq!(
                fp_factor(NominalPipeSize::Three, NominalPipeSize::Three, style),
                1.0
            );
        }
    }

    #[test]
    fn butterfly_unity_band() {
        assert_eq!(fp_from_beta(0.96, ValveStyle::Butterfly), 1.0);
        assert!(fp_from_beta(0.94, ValveStyle::Butterfly) < 1.0);
    }

    #[test]
    fn globe_near_unity_band_is_continuous() {
        let below = fp_from_beta(0.9 - 1e-9, ValveStyle::Globe);
        let at = fp_from_beta(0.9, ValveStyle::Globe);
        assert!((below - at).abs() < 1e-8);
        let near_one = fp_from_beta(1.0 - 1e-9, ValveStyle::Globe);
        assert!((near_one - 1.0).abs() < 1e-8);
    }

    #[test]
    fn butterfly_most_sensitive() {
        let beta = 0.6;
        let globe = fp_from_beta(beta, ValveStyle::Globe);
        let ball = fp_from_beta(beta, ValveStyle::Ball);
        let butterfly = fp_from_beta(beta, ValveStyle::Butterfly);
        assert!(butterfly < globe && globe < ball);
    }

    #[test]
    fn reduced_trim_in_larger_line() {
        let fp = fp_factor(NominalPipeSize::Two, NominalPipeSize::Four, ValveStyle::Globe);
        let beta: f64 = 52.5 / 102.3;
        let expected = (1.0 / (1.0 + 0.3 * (1.0 - beta * beta).powi(2))).sqrt();
        assert!((fp - expected).abs() < 1e-12);
        assert!(fp > 0.1 && fp < 1.0);
    }

    #[test]
    fn line_size_installation_has_no_reducer_loss() {
        let fx = reducer_effects(
            &StandardPipeTable,
            UnitSystem::Metric,
            NominalPipeSize::Three,
            NominalPipeSize::Three,
            NominalPipeSize::Three,
        );
        assert_eq!(fx.loss_coefficient_upstream, 0.0);
        assert_eq!(fx.loss_coefficient_downstream, 0.0);
        assert_eq!(fx.total_geometry_effect, 1.0);
    }

    #[test]
    fn swaged_valve_losses() {
        let fx = reducer_effects_from_diameters(100.0, 50.0, 100.0);
        assert!((fx.loss_coefficient_upstream - 0.375).abs() < 1e-12);
        assert!((fx.loss_coefficient_downstream - 0.5625).abs() < 1e-12);
        assert!((fx.velocity_ratio_upstream - 4.0).abs() < 1e-12);
        assert!((fx.velocity_ratio_downstream - 0.25).abs() < 1e-12);
        let expected = (1.0_f64 / (1.0 + 0.375 + 0.5625)).sqrt();
        assert!((fx.total_geometry_effect - expected).abs() < 1e-12);
    }

    #[test]
    fn bad_diameters_yield_neutral_effects() {
        assert_eq!(reducer_effects_from_diameters(0.0, 50.0, 100.0), ReducerEffects::NONE);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fp_bounded(beta in 0.0_f64..2.0, idx in 0usize..3) {
            let fp = fp_from_beta(beta, ValveStyle::ALL[idx]);
            prop_assert!((0.1..=1.0).contains(&fp));
        }

        #[test]
        fn fp_strictly_decreasing_below_threshold(
            a in 0.05_f64..0.94,
            gap in 1e-3_f64..0.3,
            idx in 0usize..3,
        ) {
            let style = ValveStyle::ALL[idx];
            let hi = (a + gap).min(style.fp_unity_beta() - 1e-6);
            prop_assume!(hi > a + 1e-6);
            prop_assert!(fp_from_beta(a, style) < fp_from_beta(hi, style));
        }
    }
}
