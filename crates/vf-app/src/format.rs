//! YAML / JSON file handling shared by cases and settings.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, path: &Path, content: &str) -> AppResult<T> {
        let parsed = match self {
            FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| AppError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn render<T: Serialize>(self, value: &T) -> AppResult<String> {
        match self {
            FileFormat::Yaml => {
                serde_yaml::to_string(value).map_err(|e| AppError::Serialize(e.to_string()))
            }
            FileFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|e| AppError::Serialize(e.to_string()))
            }
        }
    }
}

pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| AppError::CaseFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    format.parse(path, &content)
}

pub(crate) fn write_file<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let content = FileFormat::from_path(path)?.render(value)?;
    std::fs::write(path, content).map_err(|e| AppError::CaseFileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
