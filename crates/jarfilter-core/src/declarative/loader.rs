//! DTO → Domain model conversion with validation.

use super::config_dto::{ExcludeDto, FilterDto, FilterFileDto};
use crate::builder::ConfigBuilder;
use crate::filter_set::FilterSet;
use crate::model::{FilterConfig, RuleError};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A declaration was rejected by the rule model.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "filter[0].exclude[1]").
        context: String,
        /// The underlying rule error.
        source: RuleError,
    },
}

/// Converts a `FilterFileDto` to a validated `FilterSet`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: FilterFileDto) -> Result<FilterSet, LoadError> {
    let configs = dto
        .filters
        .iter()
        .enumerate()
        .map(|(i, f)| convert_filter(f, i))
        .collect::<Result<Vec<_>, _>>()?;

    FilterSet::new(configs).map_err(|e| LoadError::Validation {
        context: "filter".to_string(),
        source: e,
    })
}

fn convert_filter(dto: &FilterDto, index: usize) -> Result<FilterConfig, LoadError> {
    let ctx = format!("filter[{index}]");
    let mut builder =
        ConfigBuilder::new(&dto.group, &dto.artifact).map_err(|e| LoadError::Validation {
            context: ctx.clone(),
            source: e,
        })?;

    for (j, exclude) in dto.exclude.iter().enumerate() {
        add_exclude(&mut builder, exclude).map_err(|e| LoadError::Validation {
            context: format!("{ctx}.exclude[{j}]"),
            source: e,
        })?;
    }

    builder.finalize().map_err(|e| LoadError::Validation {
        context: ctx,
        source: e,
    })
}

fn add_exclude(builder: &mut ConfigBuilder, dto: &ExcludeDto) -> Result<(), RuleError> {
    if dto.keep.is_empty() {
        builder.exclude(&dto.path)?;
    } else {
        builder.exclude_with_keeps(&dto.path, |keeps| {
            for suffix in &dto.keep {
                keeps.keep(suffix)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}
