//! Check command implementation.

use anyhow::Result;

use crate::filter_file::{FilterFile, Origin};

/// Runs the check command.
pub fn run(file: &FilterFile) -> Result<()> {
    let origin = match file.origin {
        Origin::Explicit => "--config",
        Origin::Project => "project",
        Origin::Global => "global",
    };
    println!("{} ({origin})", file.path.display());

    for config in &file.filters {
        println!("{config}");
        for rule in config.rules().values() {
            if rule.is_unconditional() {
                println!("  exclude {}", rule.exclude_path());
            } else {
                println!(
                    "  exclude {} keep {}",
                    rule.exclude_path(),
                    rule.keep_paths().join(", ")
                );
            }
        }
    }

    println!("\n\x1b[32m{} filter(s) OK\x1b[0m", file.filters.len());
    Ok(())
}
