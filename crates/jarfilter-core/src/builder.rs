//! Incremental construction of [`FilterConfig`] values.
//!
//! Per-declaration checks run as each exclude or keep is added; the
//! cross-rule overlap check runs once in [`ConfigBuilder::finalize`].

use std::collections::BTreeMap;

use crate::model::{FilterConfig, FilterRule, RuleError, PATH_SEPARATOR};

/// Builder for a [`FilterConfig`].
///
/// ```
/// use jarfilter_core::ConfigBuilder;
///
/// let mut builder = ConfigBuilder::new("org.lwjgl", "lwjgl")?;
/// builder
///     .exclude("windows/")?
///     .exclude_with_keeps("linux/", |keeps| {
///         keeps.keep("x64/")?;
///         Ok(())
///     })?;
/// let config = builder.finalize()?;
/// assert_eq!(config.rules().len(), 2);
/// # Ok::<(), jarfilter_core::RuleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    group: String,
    artifact: String,
    rules: Vec<FilterRule>,
}

impl ConfigBuilder {
    /// Starts a configuration for the artifact `group:artifact`.
    ///
    /// # Errors
    ///
    /// Returns error if either identifier is empty or contains whitespace.
    pub fn new(group: &str, artifact: &str) -> Result<Self, RuleError> {
        Ok(Self {
            group: validate_identifier("group", group)?,
            artifact: validate_identifier("artifact", artifact)?,
            rules: Vec::new(),
        })
    }

    /// Returns the `group:artifact` identity being built.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Registers an unconditional exclusion of every entry starting with `path`.
    ///
    /// # Errors
    ///
    /// Returns error if `path` is blank, multi-line, starts with `/`, or was
    /// already declared.
    pub fn exclude(&mut self, path: &str) -> Result<&mut Self, RuleError> {
        self.check_exclude_path(path)?;
        self.rules.push(FilterRule::new(path.to_string(), Vec::new()));
        Ok(self)
    }

    /// Registers an exclusion of `path` with keep exceptions.
    ///
    /// `keeps` receives a [`KeepCollector`] bound to `path`; every suffix it
    /// collects is appended to `path` to form a keep path. The collector is
    /// only reachable inside the closure.
    ///
    /// # Errors
    ///
    /// Returns error if `path` is invalid, if the closure fails, if no keep was
    /// collected, or if two keep paths prefix each other.
    pub fn exclude_with_keeps<F>(&mut self, path: &str, keeps: F) -> Result<&mut Self, RuleError>
    where
        F: FnOnce(&mut KeepCollector<'_>) -> Result<(), RuleError>,
    {
        self.check_exclude_path(path)?;

        let mut collector = KeepCollector {
            exclude: path,
            suffixes: Vec::new(),
        };
        keeps(&mut collector)?;

        if collector.suffixes.is_empty() {
            return Err(RuleError::NoKeeps {
                exclude: path.to_string(),
            });
        }

        let keep_paths: Vec<String> = collector
            .suffixes
            .iter()
            .map(|suffix| format!("{path}{suffix}"))
            .collect();

        if let Some((shorter, longer)) = find_overlap(&keep_paths) {
            return Err(RuleError::OverlappingKeeps {
                exclude: path.to_string(),
                shorter,
                longer,
            });
        }

        self.rules.push(FilterRule::new(path.to_string(), keep_paths));
        Ok(self)
    }

    /// Validates the whole rule set and freezes it.
    ///
    /// # Errors
    ///
    /// Returns error if no exclude was declared or if two exclude paths
    /// prefix each other.
    pub fn finalize(self) -> Result<FilterConfig, RuleError> {
        if self.rules.is_empty() {
            return Err(RuleError::NoExcludes { name: self.name() });
        }

        let excludes: Vec<String> = self
            .rules
            .iter()
            .map(|rule| rule.exclude_path().to_string())
            .collect();
        if let Some((shorter, longer)) = find_overlap(&excludes) {
            return Err(RuleError::OverlappingExcludes {
                name: self.name(),
                shorter,
                longer,
            });
        }

        let rules: BTreeMap<String, FilterRule> = self
            .rules
            .into_iter()
            .map(|rule| (rule.exclude_path().to_string(), rule))
            .collect();

        Ok(FilterConfig::new(self.group, self.artifact, rules))
    }

    fn check_exclude_path(&self, path: &str) -> Result<(), RuleError> {
        check_single_line("exclude path", path)?;
        if path.starts_with(PATH_SEPARATOR) {
            return Err(RuleError::LeadingSeparator {
                path: path.to_string(),
            });
        }
        if self.rules.iter().any(|rule| rule.exclude_path() == path) {
            return Err(RuleError::DuplicateExclude {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

/// Collects keep suffixes for one exclude path.
///
/// Handed out by [`ConfigBuilder::exclude_with_keeps`] for the duration of
/// its closure.
#[derive(Debug)]
pub struct KeepCollector<'a> {
    exclude: &'a str,
    suffixes: Vec<String>,
}

impl KeepCollector<'_> {
    /// Returns the exclude path the suffixes are appended to.
    #[must_use]
    pub fn exclude_path(&self) -> &str {
        self.exclude
    }

    /// Returns the number of suffixes collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    /// Returns `true` if nothing was collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Keeps every entry starting with `exclude_path + suffix`.
    ///
    /// # Errors
    ///
    /// Returns error if `suffix` is blank, multi-line, already collected, or
    /// starts with the exclude path itself.
    pub fn keep(&mut self, suffix: &str) -> Result<&mut Self, RuleError> {
        check_single_line("keep suffix", suffix)?;
        if self.suffixes.iter().any(|s| s == suffix) {
            return Err(RuleError::DuplicateKeep {
                exclude: self.exclude.to_string(),
                suffix: suffix.to_string(),
            });
        }
        if suffix.starts_with(self.exclude) {
            return Err(RuleError::RedundantKeep {
                exclude: self.exclude.to_string(),
                suffix: suffix.to_string(),
            });
        }
        self.suffixes.push(suffix.to_string());
        Ok(self)
    }
}

fn validate_identifier(field: &'static str, value: &str) -> Result<String, RuleError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(RuleError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

fn check_single_line(what: &'static str, value: &str) -> Result<(), RuleError> {
    if value.trim().is_empty() {
        return Err(RuleError::BlankPath { what });
    }
    if value.contains(['\n', '\r']) {
        return Err(RuleError::MultiLinePath {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Finds the first pair of paths where one prefixes the other.
///
/// Paths are scanned shortest first, so only the longer of a pair can start
/// with the shorter. Ties keep declaration order.
fn find_overlap(paths: &[String]) -> Option<(String, String)> {
    let mut sorted: Vec<&String> = paths.iter().collect();
    sorted.sort_by_key(|p| p.len());

    for (i, shorter) in sorted.iter().enumerate() {
        for longer in &sorted[i + 1..] {
            if longer.starts_with(shorter.as_str()) {
                return Some(((*shorter).clone(), (*longer).clone()));
            }
        }
    }
    None
}
