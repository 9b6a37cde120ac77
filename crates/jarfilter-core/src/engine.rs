//! Archive transform engine.
//!
//! Walks a source archive in central directory order and copies every entry
//! that survives a [`FilterConfig`] into a fresh destination archive. Kept
//! entries keep their compression method, CRC, DOS timestamp, extra fields
//! (including extended timestamps) and unix mode. Excluded entries are never
//! read. Archives listing an entry name twice are rejected.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use zip::ZipWriter;

use crate::archive;
use crate::error::FilterError;
use crate::model::{Disposition, FilterConfig};
use crate::resolver;

/// Whether an entry made it into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryAction {
    /// Copied to the destination.
    Kept,
    /// Left out of the destination.
    Excluded,
}

impl std::fmt::Display for EntryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kept => write!(f, "kept"),
            Self::Excluded => write!(f, "excluded"),
        }
    }
}

/// Decision taken for one source entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    /// Entry name as stored in the archive.
    pub name: String,
    /// What happened to the entry.
    pub action: EntryAction,
    /// Exclude path of the rule that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Keep path that rescued the entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep: Option<String>,
}

impl EntryOutcome {
    fn new(name: String, disposition: Disposition<'_>) -> Self {
        let (action, rule, keep) = match disposition {
            Disposition::Unmatched => (EntryAction::Kept, None, None),
            Disposition::Kept { rule, keep } => {
                (EntryAction::Kept, Some(rule.to_string()), Some(keep.to_string()))
            }
            Disposition::Excluded { rule } => (EntryAction::Excluded, Some(rule.to_string()), None),
        };
        Self {
            name,
            action,
            rule,
            keep,
        }
    }

    /// Returns `true` if the entry was copied.
    #[must_use]
    pub fn is_kept(&self) -> bool {
        self.action == EntryAction::Kept
    }
}

/// Result of filtering (or planning to filter) one archive.
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    /// Identity (`group:artifact`) of the configuration applied.
    pub filter: String,
    /// The source archive.
    pub source: PathBuf,
    /// The written archive; `None` for a dry run.
    pub destination: Option<PathBuf>,
    /// One outcome per source entry, in source order.
    pub entries: Vec<EntryOutcome>,
}

impl TransformReport {
    /// Counts kept entries.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_kept()).count()
    }

    /// Counts excluded entries.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.entries.len() - self.kept_count()
    }

    /// Returns the names of kept entries, in source order.
    #[must_use]
    pub fn kept_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_kept())
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// Outcome of [`transform_artifact`].
#[derive(Debug, Clone)]
pub enum Transformed {
    /// No configuration applies; use the original archive as-is.
    Unchanged,
    /// A filtered archive was written.
    Filtered(TransformReport),
}

/// Decides every entry of `source` without writing anything.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or its directory read.
pub fn plan(config: &FilterConfig, source: &Path) -> Result<TransformReport, FilterError> {
    let reader = archive::open(source)?;
    let entries = reader
        .file_names()
        .map(|name| EntryOutcome::new(name.to_string(), config.disposition(name)))
        .collect();

    Ok(TransformReport {
        filter: config.name(),
        source: source.to_path_buf(),
        destination: None,
        entries,
    })
}

/// Writes a copy of `source` to `destination` without the entries `config`
/// excludes.
///
/// An existing `destination` is deleted first. On failure the partially
/// written destination is removed again.
///
/// # Errors
///
/// Returns an error if the destination is the source itself, if the old
/// destination cannot be deleted, or if any read or write fails. Entry copy
/// failures name the entry.
pub fn execute(
    config: &FilterConfig,
    source: &Path,
    destination: &Path,
) -> Result<TransformReport, FilterError> {
    if is_same_file(source, destination) {
        return Err(FilterError::io(
            destination,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination is the source archive",
            ),
        ));
    }

    info!(
        "Filtering {} with {} into {}",
        source.display(),
        config,
        destination.display()
    );

    remove_existing(destination)?;

    let entries = match write_filtered(config, source, destination) {
        Ok(entries) => entries,
        Err(e) => {
            discard(destination);
            return Err(e);
        }
    };

    let report = TransformReport {
        filter: config.name(),
        source: source.to_path_buf(),
        destination: Some(destination.to_path_buf()),
        entries,
    };

    info!(
        "Wrote {}: {} kept, {} excluded",
        destination.display(),
        report.kept_count(),
        report.excluded_count()
    );

    Ok(report)
}

/// Resolves the configuration for `source` and applies it.
///
/// Returns [`Transformed::Unchanged`] when no configuration matches; nothing
/// is written in that case.
///
/// # Errors
///
/// Returns [`FilterError::Ambiguous`] if several configurations match, or any
/// error from [`execute`].
pub fn transform_artifact<'a, I>(
    source: &Path,
    configs: I,
    destination: &Path,
) -> Result<Transformed, FilterError>
where
    I: IntoIterator<Item = &'a FilterConfig>,
{
    match resolver::resolve(source, configs)? {
        Some(config) => execute(config, source, destination).map(Transformed::Filtered),
        None => {
            debug!("No filter for {}, leaving it unchanged", source.display());
            Ok(Transformed::Unchanged)
        }
    }
}

fn write_filtered(
    config: &FilterConfig,
    source: &Path,
    destination: &Path,
) -> Result<Vec<EntryOutcome>, FilterError> {
    let mut reader = archive::open(source)?;
    let file = File::create(destination).map_err(|e| FilterError::io(destination, e))?;
    let mut writer = ZipWriter::new(file);

    let names: Vec<String> = reader.file_names().map(str::to_string).collect();
    let mut entries = Vec::with_capacity(names.len());
    for (index, name) in names.into_iter().enumerate() {
        let disposition = config.disposition(&name);

        if disposition.is_kept() {
            debug!("kept {name}");
            archive::copy_entry(&mut reader, index, &mut writer).map_err(|e| {
                FilterError::Entry {
                    archive: source.to_path_buf(),
                    entry: name.clone(),
                    source: e,
                }
            })?;
        } else {
            debug!(
                "excluded {name} (rule `{}`)",
                disposition.rule().unwrap_or_default()
            );
        }

        entries.push(EntryOutcome::new(name, disposition));
    }

    if !reader.comment().is_empty() {
        writer.set_raw_comment(reader.comment().into());
    }
    writer
        .finish()
        .map_err(|e| FilterError::archive(destination, e))?;

    Ok(entries)
}

fn remove_existing(destination: &Path) -> Result<(), FilterError> {
    match fs::remove_file(destination) {
        Ok(()) => {
            debug!("Removed existing {}", destination.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FilterError::io(destination, e)),
    }
}

fn discard(destination: &Path) {
    if let Err(e) = fs::remove_file(destination) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(
                "Failed to remove partial output {}: {}",
                destination.display(),
                e
            );
        }
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
