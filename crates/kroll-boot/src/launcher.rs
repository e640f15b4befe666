//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::Command;

use kroll_common::config::LauncherConfig;
use tracing::info;

use crate::collaborators::{LaunchRequest, Launcher};

/// Hands the process over to the runtime host executable.
///
/// On unix the current process image is replaced. Elsewhere the host runs as
/// a child and the launcher exits with its status.
#[derive(Debug, Clone)]
pub struct ExecLauncher {
    host_executable: String,
}

impl ExecLauncher {
    pub fn new(host_executable: impl Into<String>) -> Self {
        Self {
            host_executable: host_executable.into(),
        }
    }

    pub fn from_config(config: &LauncherConfig) -> Self {
        Self::new(config.host_executable.clone())
    }

    /// Host executable inside the resolved runtime directory.
    pub fn host_path(&self, request: &LaunchRequest<'_>) -> PathBuf {
        request.runtime_path.join(&self.host_executable)
    }

    /// Command for the handoff. The program name is not forwarded.
    pub fn command(&self, request: &LaunchRequest<'_>) -> Command {
        let mut command = Command::new(self.host_path(request));
        command
            .args(request.arguments.iter().skip(1))
            .envs(request.environment.variables());
        command
    }
}

impl Default for ExecLauncher {
    fn default() -> Self {
        Self::from_config(&LauncherConfig::default())
    }
}

impl Launcher for ExecLauncher {
    fn launch(&mut self, request: &LaunchRequest<'_>) -> String {
        let mut command = self.command(request);
        info!(
            app_id = %request.app_id,
            host = %self.host_path(request).display(),
            "executing runtime host"
        );

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let err = command.exec();
            return format!("{}: {}", self.host_path(request).display(), err);
        }

        #[cfg(not(unix))]
        {
            match command.status() {
                Ok(status) => std::process::exit(status.code().unwrap_or(1)),
                Err(err) => format!("{}: {}", self.host_path(request).display(), err),
            }
        }
    }
}
