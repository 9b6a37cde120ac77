//! Plan command implementation.

use anyhow::{Context, Result};
use jarfilter_core::FilterSet;
use std::path::Path;

use super::output;
use crate::OutputFormat;

/// Runs the plan command.
pub fn run(archive: &Path, format: OutputFormat, filters: &FilterSet, cwd: &Path) -> Result<()> {
    let source = super::locate_archive(cwd, archive)?;

    let Some(config) = filters.resolve(&source)? else {
        println!(
            "{}: no filter applies, archive would stay unchanged",
            archive.display()
        );
        return Ok(());
    };

    let report = jarfilter_core::plan(config, &source)
        .with_context(|| format!("Failed to read {}", archive.display()))?;

    output::print_plan(&report, format)
}
