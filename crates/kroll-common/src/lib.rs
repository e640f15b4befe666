//! ---
//! kr_section: "01-core-functionality"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Shared primitives and utilities for the launcher."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
//! Shared primitives for the Kroll boot workspace: configuration loading,
//! tracing initialisation and build version metadata.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{
    BootConfig, FilesConfig, InstallerConfig, LauncherConfig, LoadedBootConfig, LoggingConfig,
    PathsConfig,
};
pub use logging::{init_tracing, LogFormat};
pub use version::VersionInfo;
