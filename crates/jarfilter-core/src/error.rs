//! Error types shared by the resolver and the transform engine.

use std::path::PathBuf;

use miette::Diagnostic;

use crate::model::RuleError;

/// Broad error category, for callers that only need to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or conflicting rule declarations.
    InvalidArgument,
    /// More than one configuration matches an archive.
    Ambiguous,
    /// Reading or writing an archive failed.
    Io,
}

/// Errors raised while building, resolving or applying filters.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum FilterError {
    /// A rule declaration was rejected.
    #[error(transparent)]
    #[diagnostic(code(jarfilter::invalid_argument))]
    InvalidArgument(#[from] RuleError),

    /// Several configurations claim the same archive.
    #[error("{} matches more than one filter: {}", .archive.display(), .matches.join(", "))]
    #[diagnostic(
        code(jarfilter::ambiguous),
        help("make group/artifact pairs specific enough that only one matches")
    )]
    Ambiguous {
        /// The archive being resolved.
        archive: PathBuf,
        /// Identities (`group:artifact`) of every matching configuration.
        matches: Vec<String>,
    },

    /// A filesystem operation on an archive file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(code(jarfilter::io))]
    Io {
        /// File being opened, created or deleted.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The archive container could not be read or finished.
    #[error("archive error in {}: {source}", .path.display())]
    #[diagnostic(code(jarfilter::io))]
    Archive {
        /// The archive file.
        path: PathBuf,
        /// Underlying error.
        source: zip::result::ZipError,
    },

    /// The central directory lists an entry name more than once.
    #[error("{} lists entry `{entry}` more than once", .archive.display())]
    #[diagnostic(code(jarfilter::io))]
    DuplicateEntry {
        /// The source archive.
        archive: PathBuf,
        /// The repeated entry name.
        entry: String,
    },

    /// Copying a single entry failed.
    #[error("failed to copy entry `{entry}` of {}: {source}", .archive.display())]
    #[diagnostic(code(jarfilter::io))]
    Entry {
        /// The source archive.
        archive: PathBuf,
        /// Name of the entry being copied.
        entry: String,
        /// Underlying error.
        source: zip::result::ZipError,
    },
}

impl FilterError {
    /// Returns the broad category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::Io { .. }
            | Self::Archive { .. }
            | Self::DuplicateEntry { .. }
            | Self::Entry { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let invalid = FilterError::from(RuleError::BlankPath {
            what: "exclude path",
        });
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let ambiguous = FilterError::Ambiguous {
            archive: PathBuf::from("g/a-ext-1.0.jar"),
            matches: vec!["g:a".to_string(), "g:a-ext".to_string()],
        };
        assert_eq!(ambiguous.kind(), ErrorKind::Ambiguous);

        let io = FilterError::io("out.jar", std::io::Error::other("denied"));
        assert_eq!(io.kind(), ErrorKind::Io);

        let duplicate = FilterError::DuplicateEntry {
            archive: PathBuf::from("in.jar"),
            entry: "x.txt".to_string(),
        };
        assert_eq!(duplicate.kind(), ErrorKind::Io);
        assert_eq!(duplicate.to_string(), "in.jar lists entry `x.txt` more than once");
    }

    #[test]
    fn ambiguous_message_lists_every_match() {
        let err = FilterError::Ambiguous {
            archive: PathBuf::from("g/a-ext-1.0.jar"),
            matches: vec!["g:a".to_string(), "g:a-ext".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "g/a-ext-1.0.jar matches more than one filter: g:a, g:a-ext"
        );
    }

    #[test]
    fn entry_error_names_the_entry() {
        let err = FilterError::Entry {
            archive: PathBuf::from("in.jar"),
            entry: "native/linux/lib.so".to_string(),
            source: zip::result::ZipError::FileNotFound,
        };
        assert!(err.to_string().contains("`native/linux/lib.so`"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
