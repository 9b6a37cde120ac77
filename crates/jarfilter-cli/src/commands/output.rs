//! Shared output formatting for filter reports.

use anyhow::Result;
use jarfilter_core::{EntryAction, EntryOutcome, TransformReport};
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// What happened to one archive passed to `filter`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArchiveResult {
    /// A filtered copy was written.
    Filtered {
        /// The source archive.
        archive: PathBuf,
        /// Entry-level outcome.
        report: TransformReport,
    },
    /// No filter applies; the original stays as-is.
    Unchanged {
        /// The source archive.
        archive: PathBuf,
    },
    /// Resolution or filtering failed.
    Failed {
        /// The source archive.
        archive: PathBuf,
        /// Error description.
        error: String,
    },
}

impl ArchiveResult {
    /// Returns `true` for failed archives.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Print `filter` results in the specified format.
pub fn print_results(results: &[ArchiveResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_results_text(results),
        OutputFormat::Json => return print_json(results),
        OutputFormat::Compact => {
            for result in results {
                if let ArchiveResult::Filtered { report, .. } = result {
                    print_compact(report);
                }
            }
        }
    }
    Ok(())
}

/// Print a dry-run report in the specified format.
pub fn print_plan(report: &TransformReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{} ({})", report.source.display(), report.filter);
            for entry in &report.entries {
                println!("  {}", describe_entry(entry));
            }
            print_summary(report);
        }
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_results_text(results: &[ArchiveResult]) {
    let mut filtered = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for result in results {
        match result {
            ArchiveResult::Filtered { archive, report } => {
                filtered += 1;
                let destination = report
                    .destination
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!(
                    "{} ({}) -> {}",
                    archive.display(),
                    report.filter,
                    destination
                );
                for entry in report.entries.iter().filter(|e| !e.is_kept()) {
                    println!("  {}", describe_entry(entry));
                }
                print_summary(report);
            }
            ArchiveResult::Unchanged { archive } => {
                unchanged += 1;
                println!("{} (no filter, unchanged)", archive.display());
            }
            ArchiveResult::Failed { archive, error } => {
                failed += 1;
                println!("{}", archive.display());
                println!("  \x1b[31merror\x1b[0m: {error}");
            }
        }
        println!();
    }

    let summary_color = if failed > 0 { "\x1b[31m" } else { "\x1b[32m" };
    println!(
        "{summary_color}{filtered} filtered, {unchanged} unchanged, {failed} failed\x1b[0m"
    );
}

fn describe_entry(entry: &EntryOutcome) -> String {
    match (entry.action, &entry.rule, &entry.keep) {
        (EntryAction::Excluded, Some(rule), _) => {
            format!("\x1b[31m-\x1b[0m {} (excluded by `{rule}`)", entry.name)
        }
        (EntryAction::Kept, _, Some(keep)) => {
            format!("\x1b[32m+\x1b[0m {} (kept by `{keep}`)", entry.name)
        }
        _ => format!("  {}", entry.name),
    }
}

fn print_summary(report: &TransformReport) {
    println!(
        "  {} kept, {} excluded",
        report.kept_count(),
        report.excluded_count()
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &TransformReport) {
    for entry in &report.entries {
        println!(
            "{}: {} {}",
            report.source.display(),
            entry.action,
            entry.name
        );
    }
}
