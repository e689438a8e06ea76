//! Sizing case files.
//!
//! A case bundles process conditions, valve data and installation under a
//! name. Files are YAML or JSON, chosen by extension. A batch file holds a
//! list of cases; a batch directory holds one case per file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vf_sizing::{Installation, ProcessConditions, SizingOutcome, ValveCharacteristics, validate};

use crate::error::{AppError, AppResult};
use crate::format::{FileFormat, read_file, write_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingCase {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub process: ProcessConditions,
    pub valve: ValveCharacteristics,
    pub installation: Installation,
}

impl SizingCase {
    /// Run input validation without sizing; returns the advisory notes.
    pub fn validate(&self) -> SizingOutcome<Vec<String>> {
        let mut notes = validate::validate_process(&self.process)?;
        notes.extend(validate::validate_valve(&self.valve)?);
        Ok(notes)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CaseFile {
    Many(Vec<SizingCase>),
    One(SizingCase),
}

pub fn load_case(path: &Path) -> AppResult<SizingCase> {
    read_file(path)
}

pub fn save_case(path: &Path, case: &SizingCase) -> AppResult<()> {
    write_file(path, case)
}

pub fn save_cases(path: &Path, cases: &[SizingCase]) -> AppResult<()> {
    write_file(path, &cases)
}

/// Load every case in a batch file, or in each YAML/JSON file of a directory
/// (sorted by file name).
pub fn load_cases(path: &Path) -> AppResult<Vec<SizingCase>> {
    if !path.is_dir() {
        return match read_file::<CaseFile>(path)? {
            CaseFile::Many(cases) => Ok(cases),
            CaseFile::One(case) => Ok(vec![case]),
        };
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(|e| AppError::CaseFileRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && FileFormat::from_path(p).is_ok())
        .collect();
    files.sort();

    let mut cases = Vec::new();
    for file in files {
        match read_file::<CaseFile>(&file)? {
            CaseFile::Many(many) => cases.extend(many),
            CaseFile::One(case) => cases.push(case),
        }
    }
    tracing::debug!(count = cases.len(), dir = %path.display(), "loaded cases");
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_YAML: &str = r#"
name: FV-101 water
process:
  units: metric
  temperature: 293.15
  inlet_pressure: 10.0
  outlet_pressure: 2.0
  flow:
    normal: 120.0
  fluid:
    phase: liquid
    density: 998.0
    viscosity: 1.0
    vapor_pressure: 0.032
valve:
  style: globe
  fl: 0.9
  xt: 0.75
  fd: 1.0
  max_cv: 800.0
installation:
  pipe_size: 3in
  valve_size: 3in
"#;

    #[test]
    fn yaml_case_parses_with_defaults() {
        let case: SizingCase = FileFormat::Yaml
            .parse(Path::new("water.yaml"), WATER_YAML)
            .unwrap();
        assert_eq!(case.name, "FV-101 water");
        assert_eq!(case.installation.schedule, vf_sizing::PipeSchedule::Sch40);
        assert!(case.process.liquid().is_some());
        assert!(case.validate().is_ok());
    }

    #[test]
    fn single_case_loads_as_batch() {
        let dir = std::env::temp_dir().join("vf_app_case_single");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("water.yaml");
        std::fs::write(&path, WATER_YAML).unwrap();

        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "FV-101 water");
    }
}
