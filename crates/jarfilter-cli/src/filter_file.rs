//! Finding and loading the filter file.
//!
//! The first existing file wins:
//!
//! 1. the `--config` path (must exist)
//! 2. `jarfilter.toml`, then `.jarfilter.toml`, in the working directory
//! 3. `config.toml` in `$JARFILTER_CONFIG_DIR`, else in `~/.jarfilter/`
//!
//! Commands that need filters fail when none of these exist.

use anyhow::{bail, Context, Result};
use jarfilter_core::declarative::load_filters_from_file;
use jarfilter_core::FilterSet;
use std::path::{Path, PathBuf};

/// Overrides the global filter directory.
pub const CONFIG_DIR_ENV: &str = "JARFILTER_CONFIG_DIR";

const PROJECT_FILE_NAMES: [&str; 2] = ["jarfilter.toml", ".jarfilter.toml"];

const GLOBAL_FILE_NAME: &str = "config.toml";

/// Which search step produced the filter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Passed with `--config`.
    Explicit,
    /// Found in the working directory.
    Project,
    /// Found in the global filter directory.
    Global,
}

/// A located and validated filter file.
#[derive(Debug)]
pub struct FilterFile {
    /// Where the file was read from.
    pub path: PathBuf,
    /// How it was found.
    pub origin: Origin,
    /// The validated filters it declares.
    pub filters: FilterSet,
}

/// Finds and loads the filter file for `project_dir`.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<FilterFile> {
    load_with_global_dir(project_dir, explicit, global_dir().as_deref())
}

/// Testable core: takes the global directory instead of reading the environment.
fn load_with_global_dir(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<FilterFile> {
    let (path, origin) = find(project_dir, explicit, global_dir)?;
    if origin == Origin::Global {
        tracing::info!("Using global filter file {}", path.display());
    }

    let filters = load_filters_from_file(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::debug!("Loaded {} filter(s) from {}", filters.len(), path.display());

    Ok(FilterFile {
        path,
        origin,
        filters,
    })
}

fn find(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<(PathBuf, Origin)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Filter file {} does not exist", path.display());
        }
        return Ok((path.to_path_buf(), Origin::Explicit));
    }

    let mut searched = Vec::new();
    for name in PROJECT_FILE_NAMES {
        let candidate = project_dir.join(name);
        if candidate.is_file() {
            return Ok((candidate, Origin::Project));
        }
        searched.push(candidate);
    }
    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_FILE_NAME);
        if candidate.is_file() {
            return Ok((candidate, Origin::Global));
        }
        searched.push(candidate);
    }

    let searched: Vec<String> = searched
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect();
    bail!(
        "No filter file found. Searched:\n{}\nRun `jarfilter init` to create one.",
        searched.join("\n")
    )
}

fn global_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".jarfilter")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn filter_toml(group: &str) -> String {
        format!(
            "[[filter]]\ngroup = \"{group}\"\nartifact = \"lwjgl\"\nexclude = [{{ path = \"linux/\" }}]\n"
        )
    }

    #[test]
    fn project_file_filters_are_loaded() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".jarfilter.toml"), filter_toml("org.lwjgl")).unwrap();

        let file = load_with_global_dir(project.path(), None, None).unwrap();

        assert_eq!(file.origin, Origin::Project);
        assert_eq!(file.path, project.path().join(".jarfilter.toml"));
        assert!(file.filters.get("org.lwjgl:lwjgl").is_some());
    }

    #[test]
    fn explicit_file_shadows_project_file() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("jarfilter.toml"), filter_toml("org.project")).unwrap();
        let explicit = project.path().join("ci-filters.toml");
        fs::write(&explicit, filter_toml("org.ci")).unwrap();

        let file = load_with_global_dir(project.path(), Some(&explicit), None).unwrap();

        assert_eq!(file.origin, Origin::Explicit);
        assert!(file.filters.get("org.ci:lwjgl").is_some());
        assert!(file.filters.get("org.project:lwjgl").is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("jarfilter.toml"), filter_toml("org.lwjgl")).unwrap();

        let err = load_with_global_dir(project.path(), Some(&project.path().join("nope.toml")), None)
            .unwrap_err();

        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn global_file_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), filter_toml("org.global")).unwrap();

        let file = load_with_global_dir(project.path(), None, Some(global.path())).unwrap();

        assert_eq!(file.origin, Origin::Global);
        assert_eq!(file.filters.len(), 1);
    }

    #[test]
    fn nothing_found_lists_every_searched_location() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let err = load_with_global_dir(project.path(), None, Some(global.path()))
            .unwrap_err()
            .to_string();

        assert!(err.contains("jarfilter.toml"));
        assert!(err.contains(".jarfilter.toml"));
        assert!(err.contains(&global.path().join("config.toml").display().to_string()));
        assert!(err.contains("jarfilter init"));
    }

    #[test]
    fn invalid_filters_name_the_file() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("jarfilter.toml"),
            "[[filter]]\ngroup = \"org.lwjgl\"\nartifact = \"lwjgl\"\n",
        )
        .unwrap();

        let err = load_with_global_dir(project.path(), None, None).unwrap_err();

        assert!(format!("{err:#}").contains("jarfilter.toml"));
    }

    #[test]
    fn directory_named_like_a_filter_file_is_skipped() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("jarfilter.toml")).unwrap();
        fs::write(project.path().join(".jarfilter.toml"), filter_toml("org.lwjgl")).unwrap();

        let file = load_with_global_dir(project.path(), None, None).unwrap();

        assert_eq!(file.path, project.path().join(".jarfilter.toml"));
    }
}
