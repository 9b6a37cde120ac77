//! # jarfilter-core
//!
//! Strips entries out of jar/zip archives according to declarative
//! path-prefix rules.
//!
//! This crate provides:
//!
//! - [`ConfigBuilder`] / [`KeepCollector`] for declaring exclude paths and
//!   their keep exceptions, validated into an immutable [`FilterConfig`]
//! - [`resolve`] for picking the one configuration that applies to an archive
//! - [`execute`] / [`plan`] for rewriting (or dry-running) an archive
//! - [`declarative`] for loading a [`FilterSet`] from TOML
//!
//! ## Example
//!
//! ```no_run
//! use jarfilter_core::{execute, ConfigBuilder};
//! use std::path::Path;
//!
//! let mut builder = ConfigBuilder::new("org.lwjgl", "lwjgl")?;
//! builder.exclude_with_keeps("linux/", |keeps| {
//!     keeps.keep("x64/")?;
//!     Ok(())
//! })?;
//! let config = builder.finalize()?;
//!
//! let report = execute(&config, Path::new("lwjgl-3.3.3.jar"), Path::new("out/lwjgl-3.3.3.jar"))?;
//! println!("{} entries excluded", report.excluded_count());
//! # Ok::<(), jarfilter_core::FilterError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod builder;
mod engine;
mod error;
mod filter_set;
mod model;
mod resolver;

/// TOML declarations for filter sets.
pub mod declarative;

pub use builder::{ConfigBuilder, KeepCollector};
pub use engine::{
    execute, plan, transform_artifact, EntryAction, EntryOutcome, TransformReport, Transformed,
};
pub use error::{ErrorKind, FilterError};
pub use filter_set::FilterSet;
pub use model::{Disposition, FilterConfig, FilterRule, RuleError};
pub use resolver::{is_candidate, resolve};
