//! ---
//! kr_section: "01-core-functionality"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Shared primitives and utilities for the launcher."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

const KROLL_DIR: &str = ".kroll";
const APPDATA_DIR: &str = "appdata";
const DEFAULT_INSTALLER: &str = "installer";

fn default_manifest_filename() -> String {
    "manifest".to_owned()
}

fn default_update_filename() -> String {
    ".update".to_owned()
}

fn default_host_executable() -> String {
    "kroll-host".to_owned()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for the boot launcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub installer: InstallerConfig,
    #[serde(default)]
    pub launcher: LauncherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where a [`BootConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedBootConfig {
    pub config: BootConfig,
    /// `None` when no configuration file existed and defaults were used.
    pub source: Option<PathBuf>,
}

impl BootConfig {
    pub const ENV_CONFIG_PATH: &str = "KROLL_BOOT_CONFIG";
    pub const DEFAULT_FILENAME: &str = "boot.toml";

    /// Load configuration from disk, respecting the `KROLL_BOOT_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// An explicit `KROLL_BOOT_CONFIG` path must exist. Candidate paths are
    /// optional; when none of them exists the defaults are returned.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedBootConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedBootConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.is_file() {
                let config = Self::from_path(path)?;
                return Ok(LoadedBootConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!(
            inspected = %candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "no boot configuration found; using defaults"
        );
        Ok(LoadedBootConfig {
            config: Self::default(),
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading boot configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<BootConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.launcher.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for BootConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: BootConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Filesystem roots used while booting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Overrides the application home normally derived from the executable location.
    #[serde(default)]
    pub home: Option<PathBuf>,
    /// Root of the per-application data directories.
    #[serde(default)]
    pub data_root: Option<PathBuf>,
    /// Directories holding installed runtimes, modules and SDKs.
    #[serde(default)]
    pub runtime_homes: Vec<PathBuf>,
}

impl PathsConfig {
    /// Absolute application home override, if configured.
    pub fn home(&self) -> Result<Option<PathBuf>> {
        self.home.as_deref().map(absolute).transpose()
    }

    /// Root under which `<root>/<app id>` data directories live.
    pub fn data_root(&self) -> Result<PathBuf> {
        match &self.data_root {
            Some(root) => absolute(root),
            None => Ok(user_kroll_dir()?.join(APPDATA_DIR)),
        }
    }

    /// Ordered runtime homes searched after the application's bundled components.
    pub fn runtime_homes(&self) -> Result<Vec<PathBuf>> {
        if self.runtime_homes.is_empty() {
            return Ok(vec![user_kroll_dir()?]);
        }
        self.runtime_homes.iter().map(|p| absolute(p)).collect()
    }
}

/// Well-known file names inside the bundle and the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_manifest_filename")]
    pub manifest: String,
    #[serde(default = "default_update_filename")]
    pub update: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest_filename(),
            update: default_update_filename(),
        }
    }
}

impl FilesConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, name) in [("manifest", &self.manifest), ("update", &self.update)] {
            if !is_plain_file_name(name) {
                return Err(anyhow!(
                    "files.{} must be a plain file name, got '{}'",
                    field,
                    name
                ));
            }
        }
        Ok(())
    }
}

/// External installer invocation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Installer executable; relative paths resolve against the application home.
    #[serde(default)]
    pub program: Option<PathBuf>,
    /// Extra arguments passed before the generated ones.
    #[serde(default)]
    pub args: Vec<String>,
}

impl InstallerConfig {
    /// Effective installer executable for an application rooted at `home`.
    pub fn program_for(&self, home: &Path) -> PathBuf {
        match &self.program {
            Some(program) if program.is_absolute() => program.clone(),
            Some(program) => home.join(program),
            None => home.join(DEFAULT_INSTALLER),
        }
    }
}

/// Process handoff settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Host executable name, relative to the resolved runtime directory.
    #[serde(default = "default_host_executable")]
    pub host_executable: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            host_executable: default_host_executable(),
        }
    }
}

impl LauncherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host_executable.trim().is_empty() {
            return Err(anyhow!("launcher.host_executable cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling log file; no file is written when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty() && Path::new(name).file_name() == Some(OsStr::new(name))
}

fn user_kroll_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(KROLL_DIR))
        .ok_or_else(|| anyhow!("cannot determine the user home directory"))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .with_context(|| format!("unable to absolutize {}", path.display()))?
        .into_owned())
}
