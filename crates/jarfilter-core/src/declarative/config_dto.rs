//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a filter file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterFileDto {
    /// One entry per filtered artifact.
    #[serde(rename = "filter", default)]
    pub filters: Vec<FilterDto>,
}

/// TOML representation of one artifact's filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterDto {
    /// Group matched against the archive's directory.
    pub group: String,
    /// Artifact matched against the start of the archive's file name.
    pub artifact: String,
    /// Exclusions, in declaration order.
    #[serde(default)]
    pub exclude: Vec<ExcludeDto>,
}

/// TOML representation of an exclude path with optional keeps.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeDto {
    /// Excluded entry-name prefix (e.g., "linux/").
    pub path: String,
    /// Suffixes appended to `path` that stay in the archive.
    #[serde(default)]
    pub keep: Vec<String>,
}
