//! Registry and planner files may be written as RON, TOML or JSON; the
//! extension decides. A base name present in two formats is an error.

use craftplan_core::registry::RegistryError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Failures reading game data or a recipe directory. A malformed recipe
/// document is never one of these.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no {file}.{{ron,toml,json}} in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("{file}: expected a .ron, .toml or .json extension")]
    UnsupportedFormat { file: PathBuf },

    #[error("both {a} and {b} exist; keep one")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("cannot read {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("no recipe directory for {version} at {dir}")]
    MissingRecipeDir { version: String, dir: PathBuf },

    /// Items or tags in `dir` failed registry validation.
    #[error("registry in {dir} rejected: {source}")]
    Registry {
        dir: PathBuf,
        source: RegistryError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ron,
    Toml,
    Json,
}

fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

const EXTENSIONS: [&str; 3] = ["ron", "toml", "json"];

/// The `name.{ron,toml,json}` file in `dir`, if there is exactly one.
pub fn find_data_file(dir: &Path, name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .filter(|candidate| candidate.is_file());
    let first = present.next();
    match (first, present.next()) {
        (Some(a), Some(b)) => Err(DataLoadError::ConflictingFormats { a, b }),
        (first, _) => Ok(first),
    }
}

/// [`find_data_file`] for files a registry cannot do without.
pub fn require_data_file(dir: &Path, name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Deserialize one data file in whichever format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a top-level list. TOML has no top-level arrays, so there the
/// list is the array under `toml_key` (`[[items]]`).
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
