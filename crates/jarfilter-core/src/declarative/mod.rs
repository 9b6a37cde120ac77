//! Filter declarations driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ ConfigBuilder (validate)
//! FilterSet (pure domain model)
//! ```

use std::path::{Path, PathBuf};

pub mod config_dto;
pub mod loader;

use crate::filter_set::FilterSet;

/// Errors from reading TOML and loading filter declarations.
#[derive(Debug, thiserror::Error)]
pub enum LoadFiltersError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content into a validated [`FilterSet`].
///
/// Returns an empty set if no `[[filter]]` sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or rule validation fails.
pub fn load_filters_from_toml(content: &str) -> Result<FilterSet, LoadFiltersError> {
    let dto: config_dto::FilterFileDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}

/// Reads and parses a TOML filter file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_filters_from_file(path: &Path) -> Result<FilterSet, LoadFiltersError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadFiltersError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_filters_from_toml(&content)
}
