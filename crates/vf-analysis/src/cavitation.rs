//! ISA RP75.23 cavitation analysis.
//!
//! Five reference sigma limits are scaled to service conditions with a
//! pressure scale effect (PSE) and a size scale effect (SSE):
//!
//! ```text
//! sigma_scaled = (sigma_ref * SSE - 1) * PSE + 1
//! ```
//!
//! The FL-corrected service sigma is then compared against the scaled limits,
//! most severe first.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uom::si::length::millimeter;
use vf_core::{Estimate, Fallback, Length};
use vf_sizing::ValveStyle;

use crate::error::{AnalysisError, AnalysisOutcome, require_positive};

const PSE_BOUNDS: (f64, f64) = (0.5, 2.0);
const SSE_BOUNDS: (f64, f64) = (0.7, 1.5);

/// Manufacturer headroom below which a close-to-limit note is added.
const MANUFACTURER_HEADROOM_PERCENT: f64 = 20.0;

/// Reference sigma limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaLevel {
    Incipient,
    Constant,
    Damage,
    Choking,
    Manufacturer,
}

impl SigmaLevel {
    pub const ALL: [SigmaLevel; 5] = [
        SigmaLevel::Incipient,
        SigmaLevel::Constant,
        SigmaLevel::Damage,
        SigmaLevel::Choking,
        SigmaLevel::Manufacturer,
    ];

    /// Order in which service sigma is checked against the limits.
    pub const SEVERITY_ORDER: [SigmaLevel; 5] = [
        SigmaLevel::Choking,
        SigmaLevel::Damage,
        SigmaLevel::Constant,
        SigmaLevel::Incipient,
        SigmaLevel::Manufacturer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SigmaLevel::Incipient => "incipient",
            SigmaLevel::Constant => "constant",
            SigmaLevel::Damage => "damage",
            SigmaLevel::Choking => "choking",
            SigmaLevel::Manufacturer => "manufacturer",
        }
    }

    pub fn risk(self) -> CavitationRisk {
        match self {
            SigmaLevel::Choking => CavitationRisk::Critical,
            SigmaLevel::Damage => CavitationRisk::High,
            SigmaLevel::Constant => CavitationRisk::Moderate,
            SigmaLevel::Incipient => CavitationRisk::Low,
            SigmaLevel::Manufacturer => CavitationRisk::Caution,
        }
    }

    /// Pressure scale exponent. Grows with severity and with the
    /// pressure-recovery sensitivity of the style.
    pub fn pse_exponent(self, style: ValveStyle) -> f64 {
        let row = match style {
            ValveStyle::Globe => [0.10, 0.15, 0.20, 0.25, 0.15],
            ValveStyle::Ball => [0.15, 0.20, 0.25, 0.30, 0.20],
            ValveStyle::Butterfly => [0.20, 0.25, 0.30, 0.35, 0.25],
        };
        row[self.index()]
    }

    pub fn sse_exponent(self, style: ValveStyle) -> f64 {
        let row = match style {
            ValveStyle::Globe => [0.05, 0.08, 0.12, 0.15, 0.08],
            ValveStyle::Ball => [0.08, 0.12, 0.15, 0.20, 0.12],
            ValveStyle::Butterfly => [0.10, 0.15, 0.20, 0.25, 0.15],
        };
        row[self.index()]
    }

    fn index(self) -> usize {
        match self {
            SigmaLevel::Incipient => 0,
            SigmaLevel::Constant => 1,
            SigmaLevel::Damage => 2,
            SigmaLevel::Choking => 3,
            SigmaLevel::Manufacturer => 4,
        }
    }
}

/// Risk label derived from the most severe limit reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CavitationRisk {
    None,
    Caution,
    Low,
    Moderate,
    High,
    Critical,
}

impl CavitationRisk {
    pub fn label(self) -> &'static str {
        match self {
            CavitationRisk::None => "None",
            CavitationRisk::Caution => "Caution",
            CavitationRisk::Low => "Low",
            CavitationRisk::Moderate => "Moderate",
            CavitationRisk::High => "High",
            CavitationRisk::Critical => "Critical",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CavitationRisk::Critical => "Severe cavitation with flow limitation",
            CavitationRisk::High => "Cavitation-induced damage potential",
            CavitationRisk::Moderate => "Steady cavitation - monitor for wear",
            CavitationRisk::Low => "Beginning of cavitation - generally acceptable",
            CavitationRisk::Caution => "Above manufacturer recommended limit",
            CavitationRisk::None => "No cavitation detected",
        }
    }

    pub fn is_cavitating(self) -> bool {
        self != CavitationRisk::None
    }
}

impl std::fmt::Display for CavitationRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference sigma for each limit at the reference size and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmaTable {
    pub incipient: f64,
    pub constant: f64,
    pub damage: f64,
    pub choking: f64,
    pub manufacturer: f64,
}

impl Default for SigmaTable {
    fn default() -> Self {
        Self {
            incipient: 15.0,
            constant: 8.0,
            damage: 4.0,
            choking: 2.0,
            manufacturer: 6.0,
        }
    }
}

impl SigmaTable {
    pub fn get(&self, level: SigmaLevel) -> f64 {
        match level {
            SigmaLevel::Incipient => self.incipient,
            SigmaLevel::Constant => self.constant,
            SigmaLevel::Damage => self.damage,
            SigmaLevel::Choking => self.choking,
            SigmaLevel::Manufacturer => self.manufacturer,
        }
    }
}

/// Reference conditions of the sigma table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavitationConfig {
    /// Valve size at which the reference sigmas were measured, in mm.
    pub reference_size_mm: f64,
    /// Valve pressure drop p1 - p2 of the reference test, in the caller's
    /// pressure unit. The pressure scale effect compares the service p1 - p2
    /// against it, so reference data quoted as p1 - Pv must be converted.
    pub reference_pressure_diff: f64,
    pub sigma_reference: SigmaTable,
}

impl Default for CavitationConfig {
    fn default() -> Self {
        Self {
            reference_size_mm: 100.0,
            reference_pressure_diff: 100.0,
            sigma_reference: SigmaTable::default(),
        }
    }
}

/// One sigma limit after scaling to service conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelAnalysis {
    pub level: SigmaLevel,
    pub sigma_reference: f64,
    pub pse: f64,
    pub sse: f64,
    pub sigma_scaled: f64,
    /// `sigma_scaled - sigma_corrected`; positive when the limit is reached.
    pub margin: f64,
    /// Distance of the corrected sigma above the limit, in percent of the limit.
    pub headroom_percent: f64,
    pub violated: bool,
    /// Largest pressure drop that keeps service sigma at this limit.
    pub allowable_delta_p: f64,
}

/// Monitoring plan for a risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringPlan {
    pub frequency: String,
    pub parameters: Vec<String>,
    pub special: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CavitationRecommendations {
    pub primary: Vec<String>,
    pub actions: Vec<String>,
    pub alternatives: Vec<String>,
    pub monitoring: MonitoringPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CavitationResult {
    pub delta_p: f64,
    /// `p1 - Pv`.
    pub pressure_margin: f64,
    pub sigma_service: f64,
    pub sigma_corrected: f64,
    pub fl: f64,
    pub style: ValveStyle,
    /// Per-limit scaling, in [`SigmaLevel::ALL`] order.
    pub levels: Vec<LevelAnalysis>,
    /// Most severe limit reached, if any.
    pub current_level: Option<SigmaLevel>,
    pub risk: CavitationRisk,
    /// Scaled sigma of the current level over the corrected sigma.
    pub severity_factor: f64,
    pub recommendations: CavitationRecommendations,
    pub fallbacks: Vec<Fallback>,
}

impl CavitationResult {
    pub fn level(&self, level: SigmaLevel) -> Option<&LevelAnalysis> {
        self.levels.iter().find(|l| l.level == level)
    }

    pub fn is_cavitating(&self) -> bool {
        self.risk.is_cavitating()
    }
}

/// `(ratio)^exponent` clamped to `bounds`; 1 when the ratio is unusable.
fn scale_effect(ratio: f64, exponent: f64, bounds: (f64, f64), quantity: &str) -> Estimate {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Estimate::assumed(quantity, 1.0, format!("non-positive scale ratio ({ratio})"));
    }
    Estimate::computed(ratio.powf(exponent).clamp(bounds.0, bounds.1))
}

fn allowable_drop(pressure_margin: f64, sigma_scaled: f64) -> Estimate {
    if sigma_scaled > 0.0 {
        Estimate::computed(pressure_margin / sigma_scaled)
    } else {
        Estimate::assumed(
            "allowable pressure drop",
            0.0,
            format!("non-positive scaled sigma ({sigma_scaled})"),
        )
    }
}

fn validate(
    p1: f64,
    p2: f64,
    vapor_pressure: f64,
    fl: f64,
    valve_size_mm: f64,
    config: &CavitationConfig,
) -> AnalysisOutcome<()> {
    require_positive(p1, "inlet_pressure")?;
    require_positive(p2, "outlet_pressure")?;
    if p1 <= p2 {
        return Err(AnalysisError::invalid(
            "inlet_pressure",
            format!("must exceed outlet pressure ({p1} <= {p2})"),
        ));
    }
    if !vapor_pressure.is_finite() || vapor_pressure < 0.0 {
        return Err(AnalysisError::invalid(
            "vapor_pressure",
            format!("must be non-negative, got {vapor_pressure}"),
        ));
    }
    if vapor_pressure >= p1 {
        return Err(AnalysisError::invalid(
            "vapor_pressure",
            format!("must be below inlet pressure ({vapor_pressure} >= {p1})"),
        ));
    }
    if !fl.is_finite() || fl <= 0.0 || fl > 1.0 {
        return Err(AnalysisError::invalid("fl", format!("must lie in (0, 1], got {fl}")));
    }
    require_positive(valve_size_mm, "valve_size")?;
    require_positive(config.reference_size_mm, "reference_size_mm")?;
    require_positive(config.reference_pressure_diff, "reference_pressure_diff")?;
    for level in SigmaLevel::ALL {
        let field = match level {
            SigmaLevel::Incipient => "sigma_reference.incipient",
            SigmaLevel::Constant => "sigma_reference.constant",
            SigmaLevel::Damage => "sigma_reference.damage",
            SigmaLevel::Choking => "sigma_reference.choking",
            SigmaLevel::Manufacturer => "sigma_reference.manufacturer",
        };
        require_positive(config.sigma_reference.get(level), field)?;
    }
    Ok(())
}

/// Scale the reference sigmas to service and assess cavitation risk.
///
/// Pressures share one unit with `config.reference_pressure_diff`.
pub fn analyze_cavitation(
    p1: f64,
    p2: f64,
    vapor_pressure: f64,
    fl: f64,
    valve_size: Length,
    style: ValveStyle,
    config: &CavitationConfig,
) -> AnalysisOutcome<CavitationResult> {
    let valve_size_mm = valve_size.get::<millimeter>();
    validate(p1, p2, vapor_pressure, fl, valve_size_mm, config)?;

    let mut fallbacks = Vec::new();
    let delta_p = p1 - p2;
    let pressure_margin = p1 - vapor_pressure;
    let sigma_service = pressure_margin / delta_p;
    let sigma_corrected = sigma_service * fl;

    let pressure_ratio = delta_p / config.reference_pressure_diff;
    let size_ratio = valve_size_mm / config.reference_size_mm;

    let levels: Vec<LevelAnalysis> = SigmaLevel::ALL
        .iter()
        .map(|&level| {
            let sigma_reference = config.sigma_reference.get(level);
            let pse = scale_effect(
                pressure_ratio,
                level.pse_exponent(style),
                PSE_BOUNDS,
                "pressure scale effect",
            )
            .record(&mut fallbacks);
            let sse = scale_effect(
                size_ratio,
                level.sse_exponent(style),
                SSE_BOUNDS,
                "size scale effect",
            )
            .record(&mut fallbacks);
            let sigma_scaled = (sigma_reference * sse - 1.0) * pse + 1.0;
            let margin = sigma_scaled - sigma_corrected;
            let headroom_percent = if sigma_scaled > 0.0 {
                -margin / sigma_scaled * 100.0
            } else {
                0.0
            };
            let allowable_delta_p =
                allowable_drop(pressure_margin, sigma_scaled).record(&mut fallbacks);
            debug!(level = level.label(), pse, sse, sigma_scaled, "scaled sigma");
            LevelAnalysis {
                level,
                sigma_reference,
                pse,
                sse,
                sigma_scaled,
                margin,
                headroom_percent,
                violated: sigma_corrected <= sigma_scaled,
                allowable_delta_p,
            }
        })
        .collect();

    let current = SigmaLevel::SEVERITY_ORDER
        .iter()
        .filter_map(|level| levels.iter().find(|l| l.level == *level))
        .find(|l| l.violated);
    let current_level = current.map(|l| l.level);
    let risk = current_level.map_or(CavitationRisk::None, SigmaLevel::risk);
    let severity_factor = current.map_or(0.0, |l| l.sigma_scaled / sigma_corrected);

    let manufacturer_headroom = levels
        .iter()
        .find(|l| l.level == SigmaLevel::Manufacturer)
        .map_or(100.0, |l| l.headroom_percent);
    let recommendations = recommendations_for(risk, manufacturer_headroom);

    info!(
        sigma_service,
        sigma_corrected,
        risk = risk.label(),
        "cavitation analysis complete"
    );

    Ok(CavitationResult {
        delta_p,
        pressure_margin,
        sigma_service,
        sigma_corrected,
        fl,
        style,
        levels,
        current_level,
        risk,
        severity_factor,
        recommendations,
        fallbacks,
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn monitoring_plan(risk: CavitationRisk) -> MonitoringPlan {
    let (frequency, parameters, special): (&str, &[&str], &str) = match risk {
        CavitationRisk::Critical => (
            "Continuous or weekly",
            &[
                "Noise",
                "Vibration",
                "Pressure drop",
                "Visual inspection",
                "Performance",
            ],
            "Consider online monitoring system",
        ),
        CavitationRisk::High => (
            "Monthly",
            &["Noise", "Vibration", "Performance trends"],
            "Document all operational changes",
        ),
        CavitationRisk::Moderate => (
            "Quarterly",
            &["Visual inspection", "Performance verification"],
            "Monitor for gradual degradation",
        ),
        CavitationRisk::Low | CavitationRisk::Caution => (
            "Semi-annually",
            &["Standard maintenance inspection"],
            "Standard documentation",
        ),
        CavitationRisk::None => ("Annual", &["Routine maintenance"], "Standard operation"),
    };
    MonitoringPlan {
        frequency: frequency.to_string(),
        parameters: strings(parameters),
        special: special.to_string(),
    }
}

fn recommendations_for(risk: CavitationRisk, manufacturer_headroom: f64) -> CavitationRecommendations {
    let (primary, actions, alternatives): (&[&str], &[&str], &[&str]) = match risk {
        CavitationRisk::Critical => (
            &[
                "Immediate design review required",
                "Flow is severely limited by cavitation",
            ],
            &[
                "Consider multi-stage pressure reduction",
                "Evaluate anti-cavitation trim designs",
                "Increase downstream pressure if possible",
                "Consider multiple valves in parallel",
            ],
            &[
                "Multi-stage trim (cage with multiple restriction stages)",
                "Series valve arrangement",
                "Different valve technology (rotary vs linear)",
                "Process condition modifications",
            ],
        ),
        CavitationRisk::High => (
            &[
                "Design modification recommended",
                "High potential for trim damage",
            ],
            &[
                "Consider cavitation-resistant materials (Stellite, ceramics)",
                "Evaluate low-recovery valve designs",
                "Implement vibration monitoring",
                "Plan for frequent inspection",
            ],
            &[
                "Hardened trim materials",
                "Low FL valve design",
                "Staged pressure reduction",
            ],
        ),
        CavitationRisk::Moderate => (
            &[
                "Monitor operation closely",
                "Acceptable with proper materials",
            ],
            &[
                "Establish regular inspection schedule",
                "Monitor noise and vibration levels",
                "Consider material upgrades for critical service",
            ],
            &[],
        ),
        CavitationRisk::Low => (
            &[
                "Acceptable operation",
                "Minimal cavitation effects expected",
            ],
            &[
                "Standard maintenance procedures",
                "Periodic performance monitoring",
            ],
            &[],
        ),
        CavitationRisk::Caution => (
            &["Operating beyond manufacturer recommended limit"],
            &["Confirm trim suitability with the manufacturer"],
            &[],
        ),
        CavitationRisk::None => (
            &["Excellent - No cavitation concerns"],
            &["Standard operation and maintenance"],
            &[],
        ),
    };

    let mut primary = strings(primary);
    let mut actions = strings(actions);
    if manufacturer_headroom < MANUFACTURER_HEADROOM_PERCENT {
        primary.push("Operating close to manufacturer limits".to_string());
        actions.push("Verify manufacturer acceptance for this application".to_string());
    }

    CavitationRecommendations {
        primary,
        actions,
        alternatives: strings(alternatives),
        monitoring: monitoring_plan(risk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_core::mm;

    fn analyze(p2: f64) -> CavitationResult {
        analyze_cavitation(
            10.0,
            p2,
            0.032,
            0.9,
            mm(76.2),
            ValveStyle::Globe,
            &CavitationConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn large_drop_is_critical() {
        let result = analyze(2.0);
        assert!((result.sigma_service - 9.968 / 8.0).abs() < 1e-12);
        assert_eq!(result.current_level, Some(SigmaLevel::Choking));
        assert_eq!(result.risk, CavitationRisk::Critical);
        assert!(result.severity_factor > 1.0);
        assert!(!result.recommendations.alternatives.is_empty());
        assert_eq!(
            result.recommendations.monitoring.frequency,
            "Continuous or weekly"
        );
    }

    #[test]
    fn small_drop_is_incipient() {
        let result = analyze(9.0);
        assert_eq!(result.current_level, Some(SigmaLevel::Incipient));
        assert_eq!(result.risk, CavitationRisk::Low);
        assert!(result.level(SigmaLevel::Damage).is_some_and(|l| !l.violated));
    }

    #[test]
    fn tiny_drop_is_clear() {
        let result = analyze(9.9);
        assert_eq!(result.current_level, None);
        assert_eq!(result.risk, CavitationRisk::None);
        assert_eq!(result.severity_factor, 0.0);
        assert_eq!(
            result.recommendations.primary,
            vec!["Excellent - No cavitation concerns".to_string()]
        );
    }

    #[test]
    fn pse_is_clamped() {
        let result = analyze(9.9999);
        for level in &result.levels {
            assert!(level.pse >= 0.5 && level.pse <= 2.0);
            assert!(level.sse >= 0.7 && level.sse <= 1.5);
        }
    }

    #[test]
    fn margins_and_allowable_drops_are_consistent() {
        let result = analyze(2.0);
        for level in &result.levels {
            assert!((level.margin - (level.sigma_scaled - result.sigma_corrected)).abs() < 1e-12);
            assert_eq!(level.violated, level.margin >= 0.0);
            assert!(
                (level.allowable_delta_p * level.sigma_scaled - result.pressure_margin).abs()
                    < 1e-9
            );
        }
    }

    #[test]
    fn reference_conditions_give_unit_scaling() {
        let config = CavitationConfig {
            reference_pressure_diff: 8.0,
            ..CavitationConfig::default()
        };
        let result =
            analyze_cavitation(10.0, 2.0, 0.032, 0.9, mm(100.0), ValveStyle::Ball, &config)
                .unwrap();
        for level in &result.levels {
            assert!((level.pse - 1.0).abs() < 1e-12);
            assert!((level.sse - 1.0).abs() < 1e-12);
            assert!((level.sigma_scaled - level.sigma_reference).abs() < 1e-9);
        }
    }

    #[test]
    fn pressure_scale_follows_valve_drop() {
        let config = CavitationConfig {
            reference_pressure_diff: 8.0,
            ..CavitationConfig::default()
        };
        let low_pv =
            analyze_cavitation(10.0, 2.0, 0.032, 0.9, mm(100.0), ValveStyle::Globe, &config)
                .unwrap();
        let high_pv =
            analyze_cavitation(10.0, 2.0, 1.5, 0.9, mm(100.0), ValveStyle::Globe, &config)
                .unwrap();
        for (a, b) in low_pv.levels.iter().zip(&high_pv.levels) {
            assert!((a.pse - 1.0).abs() < 1e-12);
            assert_eq!(a.pse, b.pse);
        }
        assert!(high_pv.sigma_service < low_pv.sigma_service);
    }

    #[test]
    fn close_to_manufacturer_limit_is_noted() {
        // corrected sigma 6.5 sits 8% above the manufacturer sigma of 6.
        let p1 = 10.0;
        let dp = p1 * 0.9 / 6.5;
        let config = CavitationConfig {
            reference_pressure_diff: dp,
            ..CavitationConfig::default()
        };
        let result = analyze_cavitation(
            p1,
            p1 - dp,
            0.0,
            0.9,
            mm(100.0),
            ValveStyle::Globe,
            &config,
        )
        .unwrap();
        assert!(
            result
                .recommendations
                .primary
                .iter()
                .any(|r| r == "Operating close to manufacturer limits")
        );
    }

    #[test]
    fn exponents_grow_with_recovery_sensitivity() {
        for level in SigmaLevel::ALL {
            assert!(level.pse_exponent(ValveStyle::Globe) < level.pse_exponent(ValveStyle::Ball));
            assert!(
                level.pse_exponent(ValveStyle::Ball) < level.pse_exponent(ValveStyle::Butterfly)
            );
            assert!(level.sse_exponent(ValveStyle::Globe) < level.sse_exponent(ValveStyle::Ball));
        }
    }

    #[test]
    fn invalid_inputs_name_field() {
        let config = CavitationConfig::default();
        let err = analyze_cavitation(2.0, 10.0, 0.0, 0.9, mm(50.0), ValveStyle::Globe, &config)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { field: "inlet_pressure", .. }));

        let err = analyze_cavitation(10.0, 2.0, 11.0, 0.9, mm(50.0), ValveStyle::Globe, &config)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { field: "vapor_pressure", .. }));

        let err = analyze_cavitation(10.0, 2.0, 0.0, 1.2, mm(50.0), ValveStyle::Globe, &config)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { field: "fl", .. }));
    }

    #[test]
    fn sigma_table_reads_from_partial_yaml_style_json() {
        let config: CavitationConfig =
            serde_json::from_str(r#"{"sigma_reference": {"manufacturer": 5.0}}"#).unwrap();
        assert_eq!(config.sigma_reference.manufacturer, 5.0);
        assert_eq!(config.sigma_reference.incipient, 15.0);
        assert_eq!(config.reference_size_mm, 100.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use vf_core::mm;

    fn style() -> impl Strategy<Value = ValveStyle> {
        prop_oneof![
            Just(ValveStyle::Globe),
            Just(ValveStyle::Ball),
            Just(ValveStyle::Butterfly),
        ]
    }

    proptest! {
        #[test]
        fn scaled_sigma_order_is_preserved(
            delta_p in 1.0_f64..10_000.0,
            size in 10.0_f64..1000.0,
            style in style(),
        ) {
            let p2 = 1.0;
            let p1 = p2 + delta_p;
            let result = analyze_cavitation(
                p1, p2, 0.0, 0.9, mm(size), style, &CavitationConfig::default(),
            ).unwrap();
            let scaled = |level| result.level(level).map(|l| l.sigma_scaled).unwrap_or(f64::NAN);
            prop_assert!(scaled(SigmaLevel::Choking) <= scaled(SigmaLevel::Damage));
            prop_assert!(scaled(SigmaLevel::Damage) <= scaled(SigmaLevel::Constant));
            prop_assert!(scaled(SigmaLevel::Constant) <= scaled(SigmaLevel::Incipient));
        }
    }
}
