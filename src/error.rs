//! Load pipeline error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boxed cause carried by decoder and cache failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a configuration load.
///
/// Every variant is terminal: a load either returns a complete merged tree or
/// one of these. Unresolved placeholders are not represented here; they stay
/// in the output as literal text.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No registered decoder claims the file's extension.
    #[error("no decoder registered for {path}")]
    UnsupportedFormat {
        /// Path of the unrecognized file.
        path: PathBuf,
    },

    /// A decoder failed to read or parse a file.
    #[error("failed to parse {path}")]
    Parse {
        /// Path of the malformed or unreadable file.
        path: PathBuf,
        /// Underlying decoder or I/O error.
        #[source]
        source: BoxedSource,
    },

    /// Merge was invoked with zero decoded documents.
    #[error("no configuration documents were loaded")]
    EmptyConfiguration,

    /// An import path does not exist after both absolute and relative
    /// resolution attempts.
    #[error("import target {path} not found (imported from {imported_from})")]
    MissingImport {
        /// The resolved path that does not exist.
        path: PathBuf,
        /// The file whose imports directive referenced it.
        imported_from: PathBuf,
    },

    /// The cache artifact could not be read or written.
    #[error("cache artifact {path} failed")]
    Cache {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying serialization or I/O error.
        #[source]
        source: BoxedSource,
    },
}

impl LoadError {
    /// Create a parse error wrapping the underlying cause.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        Self::Parse {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a cache error wrapping the underlying cause.
    pub fn cache(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        Self::Cache {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a missing-import error.
    pub fn missing_import(path: impl Into<PathBuf>, imported_from: &Path) -> Self {
        Self::MissingImport {
            path: path.into(),
            imported_from: imported_from.to_path_buf(),
        }
    }
}
