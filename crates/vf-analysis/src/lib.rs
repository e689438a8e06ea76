//! vf-analysis: secondary valve performance checks.
//!
//! - [`cavitation`]: ISA RP75.23 five-level sigma scaling and risk assessment
//! - [`noise`]: IEC 60534-8-3 aerodynamic noise with pipe transmission loss
//!
//! Both are pure functions of their inputs. Like the sizing engines they
//! reject invalid input with a typed error and flag any numeric fallback on
//! the result.

pub mod cavitation;
pub mod error;
pub mod noise;

// Re-exports
pub use cavitation::{
    CavitationConfig, CavitationResult, CavitationRisk, LevelAnalysis, SigmaLevel, SigmaTable,
    analyze_cavitation,
};
pub use error::{AnalysisError, AnalysisOutcome};
pub use noise::{NoiseInput, NoiseLevel, NoiseResult, predict_noise};
