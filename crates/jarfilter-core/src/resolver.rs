//! Maps an archive on disk to the one configuration that applies to it.
//!
//! A configuration is a candidate for an archive when:
//!
//! 1. the archive's containing directory contains the configuration's group
//!    as a substring (dependency caches lay artifacts out under their group),
//! 2. and the archive's file name starts with the configuration's artifact.
//!
//! Resolution is pure string matching; it never touches the filesystem.

use std::path::Path;

use tracing::debug;

use crate::error::FilterError;
use crate::model::FilterConfig;

/// Tests whether `config` claims the archive at `archive`.
#[must_use]
pub fn is_candidate(config: &FilterConfig, archive: &Path) -> bool {
    let (Some(parent), Some(file_name)) = (archive.parent(), archive.file_name()) else {
        return false;
    };
    parent.to_string_lossy().contains(config.group())
        && file_name.to_string_lossy().starts_with(config.artifact())
}

/// Selects the single configuration applicable to `archive`.
///
/// Returns `Ok(None)` when nothing matches; the archive should then be used
/// unchanged.
///
/// # Errors
///
/// Returns [`FilterError::Ambiguous`] listing every match when more than one
/// configuration claims the archive.
pub fn resolve<'a, I>(archive: &Path, configs: I) -> Result<Option<&'a FilterConfig>, FilterError>
where
    I: IntoIterator<Item = &'a FilterConfig>,
{
    let candidates: Vec<&FilterConfig> = configs
        .into_iter()
        .filter(|config| is_candidate(config, archive))
        .collect();

    match candidates.as_slice() {
        [] => Ok(None),
        [config] => {
            debug!("Resolved {} to filter {}", archive.display(), config);
            Ok(Some(*config))
        }
        _ => Err(FilterError::Ambiguous {
            archive: archive.to_path_buf(),
            matches: candidates.iter().map(|c| c.name()).collect(),
        }),
    }
}
