//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or parsing a manifest document.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A required `#property` line is absent or empty.
    #[error("manifest is missing required property '#{0}'")]
    MissingProperty(&'static str),
    /// No `runtime:` dependency line was found.
    #[error("manifest does not declare a runtime")]
    MissingRuntime,
    /// A dependency line has an empty name or version.
    #[error("invalid dependency entry on line {line}: '{content}'")]
    InvalidEntry {
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },
}

/// Failures while constructing an [`crate::Application`].
#[derive(Debug, Error)]
pub enum AppError {
    /// The manifest at `path` could not be loaded.
    #[error("could not load manifest {path}: {source}")]
    Manifest {
        /// Manifest location.
        path: PathBuf,
        /// Underlying parse or I/O failure.
        #[source]
        source: ManifestError,
    },
    /// No installation path was given and none could be derived from the manifest path.
    #[error("cannot derive an application path from {0}")]
    NoApplicationPath(PathBuf),
}
