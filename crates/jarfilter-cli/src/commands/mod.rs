//! Subcommand implementations.

pub mod check;
pub mod filter;
pub mod init;
pub mod output;
pub mod plan;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Absolute, symlink-free location of an archive argument.
///
/// Resolution matches on the archive's directory, which a bare relative
/// argument such as `lwjgl-3.3.3.jar` does not carry.
fn locate_archive(cwd: &Path, archive: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(cwd.join(archive))
        .with_context(|| format!("Failed to locate {}", archive.display()))
}
