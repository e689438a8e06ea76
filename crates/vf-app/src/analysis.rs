//! Combined sizing, cavitation and noise analysis of a case.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;
use uom::si::length::inch;
use vf_analysis::{
    CavitationResult, NoiseInput, NoiseResult, SigmaLevel, analyze_cavitation, predict_noise,
};
use vf_sizing::{Fluid, PipeTable, SizingResult, StandardPipeTable};

use crate::case::SizingCase;
use crate::error::AppResult;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub case: String,
    pub sizing: SizingResult,
    /// Liquid service only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cavitation: Option<CavitationResult>,
    /// Gas service only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseResult>,
    /// Findings that depend on the run settings.
    pub notes: Vec<String>,
}

impl AnalysisReport {
    /// Fallbacks substituted anywhere in the analysis.
    pub fn fallback_count(&self) -> usize {
        self.sizing.fallbacks.len()
            + self.cavitation.as_ref().map_or(0, |c| c.fallbacks.len())
            + self.noise.as_ref().map_or(0, |n| n.fallbacks.len())
    }
}

/// Outcome of one case in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub case: String,
    pub result: AppResult<AnalysisReport>,
}

/// Size the valve, then run cavitation (liquid) or noise (gas) analysis.
pub fn analyze(case: &SizingCase, settings: &Settings) -> AppResult<AnalysisReport> {
    let _span = tracing::info_span!("analyze", case = %case.name).entered();

    let sizing = vf_sizing::size(
        &case.process,
        &case.valve,
        &case.installation,
        &settings.sizing,
    )?;
    let mut notes = Vec::new();

    let (cavitation, noise) = match &case.process.fluid {
        Fluid::Liquid(liquid) => {
            let valve_size = Length::new::<inch>(case.installation.valve_size.inches());
            let result = analyze_cavitation(
                case.process.inlet_pressure,
                case.process.outlet_pressure,
                liquid.vapor_pressure,
                case.valve.fl,
                valve_size,
                case.valve.style,
                &settings.cavitation,
            )?;
            if let Some(limit) = result.level(SigmaLevel::Manufacturer) {
                let required = limit.sigma_scaled * settings.cavitation_safety_margin;
                if result.sigma_corrected < required {
                    notes.push(format!(
                        "Corrected sigma {:.2} is below {:.1}x the manufacturer limit ({:.2})",
                        result.sigma_corrected, settings.cavitation_safety_margin, required
                    ));
                }
            }
            (Some(result), None)
        }
        Fluid::Gas(gas) => {
            let input = NoiseInput {
                units: case.process.units,
                flow: case.process.flow.normal,
                inlet_pressure: case.process.inlet_pressure,
                outlet_pressure: case.process.outlet_pressure,
                temperature: case.process.temperature,
                molecular_weight: gas.molecular_weight,
                specific_heat_ratio: gas.specific_heat_ratio,
                cv: sizing.cv_required,
                pipe_diameter: StandardPipeTable
                    .internal_diameter(case.installation.pipe_size, case.process.units),
                pipe_schedule: case.installation.schedule,
                distance: settings.observation_distance_m,
            };
            let result = predict_noise(&input)?;
            if result.spl_at_distance > settings.noise_limit_dba {
                notes.push(format!(
                    "Predicted {:.1} dBA at {} m exceeds the {:.1} dBA limit",
                    result.spl_at_distance, result.distance, settings.noise_limit_dba
                ));
            }
            (None, Some(result))
        }
    };

    Ok(AnalysisReport {
        case: case.name.clone(),
        sizing,
        cavitation,
        noise,
        notes,
    })
}

/// Analyze independent cases in parallel; order follows `cases`.
pub fn analyze_batch(cases: &[SizingCase], settings: &Settings) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = cases
        .par_iter()
        .map(|case| BatchOutcome {
            case: case.name.clone(),
            result: analyze(case, settings),
        })
        .collect();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(cases = outcomes.len(), failed, "batch analysis complete");
    outcomes
}
