//! Application layer for valveflow.
//!
//! Loads sizing cases and settings from YAML or JSON, runs the combined
//! sizing + cavitation/noise analysis, and evaluates batches in parallel.
//! Shared by the CLI; the calculation crates themselves never touch files.

pub mod analysis;
pub mod case;
pub mod error;
pub mod format;
pub mod settings;

// Re-exports
pub use analysis::{AnalysisReport, BatchOutcome, analyze, analyze_batch};
pub use case::{SizingCase, load_case, load_cases, save_case, save_cases};
pub use error::{AppError, AppResult};
pub use format::FileFormat;
pub use settings::Settings;
