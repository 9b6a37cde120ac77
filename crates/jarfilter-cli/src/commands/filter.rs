//! Filter command implementation.

use anyhow::{bail, Context, Result};
use jarfilter_core::{FilterSet, TransformReport};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::output::{self, ArchiveResult};
use crate::OutputFormat;

/// Runs the filter command.
pub fn run(
    archives: &[PathBuf],
    out_dir: &Path,
    format: OutputFormat,
    filters: &FilterSet,
    cwd: &Path,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    tracing::info!(
        "Filtering {} archive(s) with {} filter(s)",
        archives.len(),
        filters.len()
    );

    let mut written = HashMap::new();
    let results: Vec<ArchiveResult> = archives
        .iter()
        .map(|archive| filter_one(filters, cwd, archive, out_dir, &mut written))
        .collect();

    output::print_results(&results, format)?;

    if results.iter().any(ArchiveResult::is_failure) {
        std::process::exit(1);
    }

    Ok(())
}

/// Filters one archive argument. `written` maps every output produced so far
/// to its source archive.
fn filter_one(
    filters: &FilterSet,
    cwd: &Path,
    archive: &Path,
    out_dir: &Path,
    written: &mut HashMap<PathBuf, PathBuf>,
) -> ArchiveResult {
    match try_filter(filters, cwd, archive, out_dir, written) {
        Ok(Some(report)) => ArchiveResult::Filtered {
            archive: archive.to_path_buf(),
            report,
        },
        Ok(None) => ArchiveResult::Unchanged {
            archive: archive.to_path_buf(),
        },
        Err(e) => {
            tracing::warn!("Failed to filter {}: {:#}", archive.display(), e);
            ArchiveResult::Failed {
                archive: archive.to_path_buf(),
                error: format!("{e:#}"),
            }
        }
    }
}

fn try_filter(
    filters: &FilterSet,
    cwd: &Path,
    archive: &Path,
    out_dir: &Path,
    written: &mut HashMap<PathBuf, PathBuf>,
) -> Result<Option<TransformReport>> {
    let source = super::locate_archive(cwd, archive)?;
    let Some(config) = filters.resolve(&source)? else {
        return Ok(None);
    };

    let file_name = source
        .file_name()
        .with_context(|| format!("{} has no file name", source.display()))?;
    let destination = out_dir.join(file_name);
    if let Some(earlier) = written.get(&destination) {
        bail!(
            "{} was already written from {}",
            destination.display(),
            earlier.display()
        );
    }

    let report = jarfilter_core::execute(config, &source, &destination)?;
    written.insert(destination, source);
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarfilter_core::declarative::load_filters_from_toml;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::{ZipArchive, ZipWriter};

    fn filters() -> FilterSet {
        load_filters_from_toml(
            r#"
[[filter]]
group = "org.lwjgl"
artifact = "lwjgl"
exclude = [{ path = "linux/" }]
"#,
        )
        .unwrap()
    }

    fn write_jar(path: &Path, payload: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for name in ["linux/lib.so", "windows/lib.dll"] {
            writer
                .start_file(name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(payload).unwrap();
        }
        writer.finish().unwrap();
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn archive_without_filter_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let jar = tmp.path().join("com.example/other-1.0.jar");
        write_jar(&jar, b"x");
        let out = tmp.path().join("out");

        let result = filter_one(&filters(), tmp.path(), &jar, &out, &mut HashMap::new());

        assert!(matches!(result, ArchiveResult::Unchanged { .. }));
        assert!(!out.join("other-1.0.jar").exists());
    }

    #[test]
    fn relative_archive_resolves_against_working_directory() {
        let tmp = TempDir::new().unwrap();
        let cwd = tmp.path().join("caches/org.lwjgl/lwjgl/3.3.3");
        write_jar(&cwd.join("lwjgl-3.3.3.jar"), b"x");
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();

        let result = filter_one(
            &filters(),
            &cwd,
            Path::new("lwjgl-3.3.3.jar"),
            &out,
            &mut HashMap::new(),
        );

        assert!(matches!(result, ArchiveResult::Filtered { .. }));
        assert_eq!(entry_names(&out.join("lwjgl-3.3.3.jar")), ["windows/lib.dll"]);
    }

    #[test]
    fn missing_archive_is_reported_as_failure() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();

        let result = filter_one(
            &filters(),
            tmp.path(),
            Path::new("org.lwjgl/lwjgl-3.3.3.jar"),
            &out,
            &mut HashMap::new(),
        );

        assert!(result.is_failure());
        assert!(!out.join("lwjgl-3.3.3.jar").exists());
    }

    #[test]
    fn same_output_name_is_not_written_twice() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a/org.lwjgl/lwjgl-3.3.3.jar");
        let second = tmp.path().join("b/org.lwjgl/lwjgl-3.3.3.jar");
        write_jar(&first, b"first");
        write_jar(&second, b"second");
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let mut written = HashMap::new();

        let results = [
            filter_one(&filters(), tmp.path(), &first, &out, &mut written),
            filter_one(&filters(), tmp.path(), &second, &out, &mut written),
        ];

        assert!(matches!(results[0], ArchiveResult::Filtered { .. }));
        let ArchiveResult::Failed { error, .. } = &results[1] else {
            panic!("expected the second archive to fail");
        };
        assert!(error.contains("already written"), "{error}");

        let mut kept = ZipArchive::new(File::open(out.join("lwjgl-3.3.3.jar")).unwrap()).unwrap();
        let mut data = String::new();
        std::io::Read::read_to_string(&mut kept.by_index(0).unwrap(), &mut data).unwrap();
        assert_eq!(data, "first");
    }
}
