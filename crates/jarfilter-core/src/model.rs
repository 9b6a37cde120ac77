//! Pure domain model for archive filter rules.
//!
//! This module contains no serde, no zip, no I/O dependencies.
//! Values are only produced by [`crate::ConfigBuilder`], which enforces the
//! disjoint subtree invariants before anything here is constructed.

use std::collections::BTreeMap;
use std::fmt;

/// Separator used by archive entry names.
pub(crate) const PATH_SEPARATOR: char = '/';

// ────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────

/// A single exclusion: an entry-name prefix plus optional keep paths that
/// carve exceptions out of it.
#[derive(Debug, Clone, Eq)]
pub struct FilterRule {
    exclude_path: String,
    keep_paths: Vec<String>,
}

impl FilterRule {
    pub(crate) fn new(exclude_path: String, keep_paths: Vec<String>) -> Self {
        Self {
            exclude_path,
            keep_paths,
        }
    }

    /// Returns the excluded entry-name prefix.
    #[must_use]
    pub fn exclude_path(&self) -> &str {
        &self.exclude_path
    }

    /// Returns the full keep paths (exclude path + suffix), in declaration order.
    #[must_use]
    pub fn keep_paths(&self) -> &[String] {
        &self.keep_paths
    }

    /// Returns `true` if the whole prefix is excluded without exceptions.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.keep_paths.is_empty()
    }

    /// Tests whether this rule covers an entry name at all.
    #[must_use]
    pub fn matches(&self, entry_name: &str) -> bool {
        entry_name.starts_with(&self.exclude_path)
    }

    /// Returns the keep path that rescues `entry_name`, if any.
    #[must_use]
    pub fn keep_for(&self, entry_name: &str) -> Option<&str> {
        self.keep_paths
            .iter()
            .find(|keep| entry_name.starts_with(keep.as_str()))
            .map(String::as_str)
    }
}

// Keep paths are a set; declaration order only matters for diagnostics.
impl PartialEq for FilterRule {
    fn eq(&self, other: &Self) -> bool {
        self.exclude_path == other.exclude_path
            && self.keep_paths.len() == other.keep_paths.len()
            && self
                .keep_paths
                .iter()
                .all(|keep| other.keep_paths.contains(keep))
    }
}

/// What happens to one archive entry under a [`FilterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<'a> {
    /// No rule covers the entry.
    Unmatched,
    /// A rule covers the entry but one of its keep paths rescues it.
    Kept {
        /// Exclude path of the matching rule.
        rule: &'a str,
        /// Keep path that matched.
        keep: &'a str,
    },
    /// A rule covers the entry and nothing rescues it.
    Excluded {
        /// Exclude path of the matching rule.
        rule: &'a str,
    },
}

impl Disposition<'_> {
    /// Returns `true` if the entry survives filtering.
    #[must_use]
    pub fn is_kept(&self) -> bool {
        !matches!(self, Self::Excluded { .. })
    }

    /// Returns the exclude path of the rule that matched, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::Unmatched => None,
            Self::Kept { rule, .. } | Self::Excluded { rule } => Some(*rule),
        }
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated, immutable filter configuration for one logical artifact.
///
/// Exclude paths are pairwise disjoint, so at most one rule ever matches a
/// given entry name and matching never depends on declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    group: String,
    artifact: String,
    rules: BTreeMap<String, FilterRule>,
}

impl FilterConfig {
    pub(crate) fn new(group: String, artifact: String, rules: BTreeMap<String, FilterRule>) -> Self {
        Self {
            group,
            artifact,
            rules,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the artifact identifier.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Returns the lookup identity, `group:artifact`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Returns all rules keyed by exclude path.
    #[must_use]
    pub fn rules(&self) -> &BTreeMap<String, FilterRule> {
        &self.rules
    }

    /// Returns the rule with the given exclude path.
    #[must_use]
    pub fn rule(&self, exclude_path: &str) -> Option<&FilterRule> {
        self.rules.get(exclude_path)
    }

    /// Returns the single rule covering `entry_name`, if any.
    #[must_use]
    pub fn matching_rule(&self, entry_name: &str) -> Option<&FilterRule> {
        self.rules.values().find(|rule| rule.matches(entry_name))
    }

    /// Decides what happens to an archive entry.
    #[must_use]
    pub fn disposition(&self, entry_name: &str) -> Disposition<'_> {
        let Some(rule) = self.matching_rule(entry_name) else {
            return Disposition::Unmatched;
        };
        match rule.keep_for(entry_name) {
            Some(keep) => Disposition::Kept {
                rule: rule.exclude_path(),
                keep,
            },
            None => Disposition::Excluded {
                rule: rule.exclude_path(),
            },
        }
    }
}

impl fmt::Display for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Malformed or conflicting rule declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Group or artifact identifier is empty or contains whitespace.
    #[error("invalid {field} `{value}`: must be non-empty and contain no whitespace")]
    InvalidIdentifier {
        /// Which identifier (`group` or `artifact`).
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An exclude path or keep suffix is blank.
    #[error("{what} must not be blank")]
    BlankPath {
        /// What was being declared.
        what: &'static str,
    },

    /// An exclude path or keep suffix spans several lines.
    #[error("{what} `{value}` must be a single line")]
    MultiLinePath {
        /// What was being declared.
        what: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An exclude path starts with `/`.
    #[error("exclude path `{path}` must not start with `/`")]
    LeadingSeparator {
        /// The rejected path.
        path: String,
    },

    /// The same exclude path was declared twice.
    #[error("exclude path `{path}` is already declared")]
    DuplicateExclude {
        /// The repeated path.
        path: String,
    },

    /// The same keep suffix was declared twice for one rule.
    #[error("keep `{suffix}` is already declared for exclude `{exclude}`")]
    DuplicateKeep {
        /// Exclude path of the rule.
        exclude: String,
        /// The repeated suffix.
        suffix: String,
    },

    /// A keep suffix starts with its own exclude path.
    #[error("keep `{suffix}` starts with its exclude path `{exclude}`; declare only the part after it")]
    RedundantKeep {
        /// Exclude path of the rule.
        exclude: String,
        /// The rejected suffix.
        suffix: String,
    },

    /// `exclude_with_keeps` was used but no keep was declared.
    #[error("exclude `{exclude}` declares no keeps; use a plain exclude instead")]
    NoKeeps {
        /// Exclude path of the rule.
        exclude: String,
    },

    /// Two keep paths of one rule prefix each other.
    #[error("keep path `{shorter}` overlaps keep path `{longer}` in exclude `{exclude}`")]
    OverlappingKeeps {
        /// Exclude path of the rule.
        exclude: String,
        /// The covering keep path.
        shorter: String,
        /// The covered keep path.
        longer: String,
    },

    /// A configuration was finalized without any exclude.
    #[error("filter `{name}` declares no excludes")]
    NoExcludes {
        /// The configuration identity.
        name: String,
    },

    /// Two configurations share one `group:artifact` identity.
    #[error("filter `{name}` is declared more than once")]
    DuplicateFilter {
        /// The repeated identity.
        name: String,
    },

    /// Two exclude paths prefix each other.
    #[error("exclude path `{shorter}` overlaps exclude path `{longer}` in filter `{name}`")]
    OverlappingExcludes {
        /// The configuration identity.
        name: String,
        /// The covering exclude path.
        shorter: String,
        /// The covered exclude path.
        longer: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(exclude: &str, keeps: &[&str]) -> FilterRule {
        FilterRule::new(
            exclude.to_string(),
            keeps.iter().map(|k| format!("{exclude}{k}")).collect(),
        )
    }

    fn config(rules: Vec<FilterRule>) -> FilterConfig {
        FilterConfig::new(
            "org.lwjgl".to_string(),
            "lwjgl".to_string(),
            rules
                .into_iter()
                .map(|r| (r.exclude_path().to_string(), r))
                .collect(),
        )
    }

    // -- FilterRule --

    #[test]
    fn rule_matches_by_prefix() {
        let r = rule("native/linux", &[]);
        assert!(r.matches("native/linux/x86_64/lib.so"));
        assert!(r.matches("native/linux-arm/lib.so"));
        assert!(!r.matches("native/windows/lib.dll"));
        assert!(r.is_unconditional());
    }

    #[test]
    fn rule_matching_is_case_sensitive() {
        let r = rule("native/linux", &[]);
        assert!(!r.matches("Native/Linux/lib.so"));
    }

    #[test]
    fn rule_keep_for_finds_rescuing_path() {
        let r = rule("native/linux", &["/x86_64", "/aarch64"]);
        assert_eq!(
            r.keep_for("native/linux/aarch64/lib.so"),
            Some("native/linux/aarch64")
        );
        assert_eq!(r.keep_for("native/linux/arm/lib.so"), None);
    }

    #[test]
    fn rule_equality_ignores_keep_order() {
        let a = rule("native/linux", &["/x86_64", "/aarch64"]);
        let b = rule("native/linux", &["/aarch64", "/x86_64"]);
        let c = rule("native/linux", &["/x86_64"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    // -- Disposition --

    #[test]
    fn disposition_of_unmatched_entry() {
        let cfg = config(vec![rule("native/linux", &["/x86_64"])]);
        let d = cfg.disposition("readme.txt");
        assert_eq!(d, Disposition::Unmatched);
        assert!(d.is_kept());
        assert_eq!(d.rule(), None);
    }

    #[test]
    fn disposition_of_rescued_entry() {
        let cfg = config(vec![rule("native/linux", &["/x86_64"])]);
        let d = cfg.disposition("native/linux/x86_64/lib.so");
        assert_eq!(
            d,
            Disposition::Kept {
                rule: "native/linux",
                keep: "native/linux/x86_64",
            }
        );
        assert!(d.is_kept());
    }

    #[test]
    fn disposition_of_excluded_entry() {
        let cfg = config(vec![
            rule("native/linux", &["/x86_64"]),
            rule("native/windows", &[]),
        ]);
        let d = cfg.disposition("native/linux/arm/lib.so");
        assert!(!d.is_kept());
        assert_eq!(d.rule(), Some("native/linux"));
        assert!(!cfg.disposition("native/windows/x64/lib.dll").is_kept());
    }

    // -- FilterConfig --

    #[test]
    fn config_name_is_group_colon_artifact() {
        let cfg = config(vec![rule("a/", &[])]);
        assert_eq!(cfg.name(), "org.lwjgl:lwjgl");
        assert_eq!(cfg.to_string(), "org.lwjgl:lwjgl");
    }

    #[test]
    fn config_lookup_by_exclude_path() {
        let cfg = config(vec![rule("a/", &[]), rule("b/", &["x"])]);
        assert!(cfg.rule("a/").is_some());
        assert!(cfg.rule("c/").is_none());
        assert_eq!(cfg.matching_rule("b/y").map(FilterRule::exclude_path), Some("b/"));
    }

    #[test]
    fn config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilterConfig>();
    }
}
