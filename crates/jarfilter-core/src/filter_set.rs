//! A validated collection of filter configurations.

use std::path::Path;

use crate::engine::{self, Transformed};
use crate::error::FilterError;
use crate::model::{FilterConfig, RuleError};
use crate::resolver;

/// Every configuration declared in one place, with unique identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    configs: Vec<FilterConfig>,
}

impl FilterSet {
    /// Creates a set from already validated configurations.
    ///
    /// # Errors
    ///
    /// Returns error if two configurations share a `group:artifact` identity.
    pub fn new(configs: Vec<FilterConfig>) -> Result<Self, RuleError> {
        for (i, config) in configs.iter().enumerate() {
            if configs[..i].iter().any(|c| c.name() == config.name()) {
                return Err(RuleError::DuplicateFilter {
                    name: config.name(),
                });
            }
        }
        Ok(Self { configs })
    }

    /// Returns the configurations in declaration order.
    #[must_use]
    pub fn configs(&self) -> &[FilterConfig] {
        &self.configs
    }

    /// Returns `true` if no configuration is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Returns the number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Looks a configuration up by its `group:artifact` identity.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterConfig> {
        self.configs.iter().find(|c| c.name() == name)
    }

    /// Selects the configuration applicable to `archive`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Ambiguous`] if more than one configuration matches.
    pub fn resolve(&self, archive: &Path) -> Result<Option<&FilterConfig>, FilterError> {
        resolver::resolve(archive, &self.configs)
    }

    /// Resolves and filters `source` into `destination`.
    ///
    /// # Errors
    ///
    /// See [`engine::transform_artifact`].
    pub fn transform(&self, source: &Path, destination: &Path) -> Result<Transformed, FilterError> {
        engine::transform_artifact(source, &self.configs, destination)
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterConfig;
    type IntoIter = std::slice::Iter<'a, FilterConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}
