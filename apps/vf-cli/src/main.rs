use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vf_app::{
    AnalysisReport, AppResult, FileFormat, Settings, analyze, analyze_batch, load_case, load_cases,
};

#[derive(Parser)]
#[command(name = "vf-cli")]
#[command(about = "ValveFlow CLI - Control valve sizing per ISA 75.01 / IEC 60534", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and print advisory notes
    Validate {
        /// Path to the case YAML/JSON file
        case_path: PathBuf,
    },
    /// Size a valve and run cavitation or noise analysis
    Analyze {
        /// Path to the case YAML/JSON file
        case_path: PathBuf,
        /// Optional settings YAML/JSON file
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Output format of the report
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// Analyze every case in a batch file or directory
    Batch {
        /// Batch file (list of cases) or directory of case files
        cases_path: PathBuf,
        /// Optional settings YAML/JSON file
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for FileFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => FileFormat::Json,
            OutputFormat::Yaml => FileFormat::Yaml,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Analyze {
            case_path,
            settings,
            format,
        } => cmd_analyze(&case_path, settings.as_deref(), format),
        Commands::Batch {
            cases_path,
            settings,
        } => cmd_batch(&cases_path, settings.as_deref()),
    }
}

fn load_settings(path: Option<&Path>) -> AppResult<Settings> {
    match path {
        Some(p) => Settings::load(p),
        None => Ok(Settings::default()),
    }
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    let notes = case.validate()?;
    println!("✓ Case '{}' is valid", case.name);
    for note in notes {
        println!("  note: {}", note);
    }
    Ok(())
}

fn cmd_analyze(case_path: &Path, settings: Option<&Path>, format: OutputFormat) -> AppResult<()> {
    let settings = load_settings(settings)?;
    let case = load_case(case_path)?;
    let report = analyze(&case, &settings)?;
    println!("{}", FileFormat::from(format).render(&report)?);
    Ok(())
}

fn cmd_batch(cases_path: &Path, settings: Option<&Path>) -> AppResult<()> {
    let settings = load_settings(settings)?;
    let cases = load_cases(cases_path)?;
    println!("Analyzing {} case(s) from {}", cases.len(), cases_path.display());

    for outcome in analyze_batch(&cases, &settings) {
        match &outcome.result {
            Ok(report) => println!("  {}", summary_line(report)),
            Err(e) => println!("  {}: FAILED - {}", outcome.case, e),
        }
    }
    Ok(())
}

fn summary_line(report: &AnalysisReport) -> String {
    let sizing = &report.sizing;
    let mut line = format!(
        "{}: Cv {:.1} ({:.0}% open){}",
        report.case,
        sizing.cv_required,
        sizing.opening_percent,
        if sizing.is_choked { ", choked" } else { "" }
    );
    if let Some(cavitation) = &report.cavitation {
        line.push_str(&format!(", cavitation {}", cavitation.risk));
    }
    if let Some(noise) = &report.noise {
        line.push_str(&format!(", {:.1} dBA ({})", noise.spl_at_distance, noise.assessment));
    }
    if !sizing.warnings.is_empty() || !report.notes.is_empty() {
        line.push_str(&format!(
            ", {} warning(s)",
            sizing.warnings.len() + report.notes.len()
        ));
    }
    line
}
