//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use kroll_common::config::BootConfig;
use tracing::debug;

use crate::collaborators::BootPlatform;
use crate::environment::Environment;

/// Dynamic loader search path the module list is prepended to.
#[cfg(target_os = "macos")]
pub const LIBRARY_PATH_ENV: &str = "DYLD_LIBRARY_PATH";
#[cfg(windows)]
pub const LIBRARY_PATH_ENV: &str = "PATH";
#[cfg(not(any(target_os = "macos", windows)))]
pub const LIBRARY_PATH_ENV: &str = "LD_LIBRARY_PATH";

/// Platform adapter for the running operating system.
#[derive(Debug, Clone)]
pub struct NativePlatform {
    home_override: Option<PathBuf>,
    data_root: PathBuf,
}

impl NativePlatform {
    pub fn new(home_override: Option<PathBuf>, data_root: PathBuf) -> Self {
        Self {
            home_override,
            data_root,
        }
    }

    pub fn from_config(config: &BootConfig) -> Result<Self> {
        Ok(Self::new(config.paths.home()?, config.paths.data_root()?))
    }

    /// Directory containing the running executable, with symlinks resolved.
    pub fn executable_directory() -> io::Result<PathBuf> {
        let executable = std::env::current_exe()?.canonicalize()?;
        executable.parent().map(PathBuf::from).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} has no parent directory", executable.display()),
            )
        })
    }
}

impl BootPlatform for NativePlatform {
    fn application_home(&self) -> io::Result<PathBuf> {
        match &self.home_override {
            Some(home) => Ok(home.clone()),
            None => Self::executable_directory(),
        }
    }

    fn application_data_directory(&self, app_id: &str) -> PathBuf {
        self.data_root.join(app_id)
    }

    fn prepare_launch(&self, environment: &mut dyn Environment, module_list: &OsStr) {
        let mut value = OsString::from(module_list);
        if let Some(existing) = environment.get(LIBRARY_PATH_ENV) {
            value.push(existing);
        }
        debug!(variable = LIBRARY_PATH_ENV, value = ?value, "library path prepared");
        environment.set(LIBRARY_PATH_ENV, &value);
    }
}
