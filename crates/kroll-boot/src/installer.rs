//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use kroll_app::Dependency;
use kroll_common::config::InstallerConfig;
use tracing::{error, info};

use crate::collaborators::{InstallRequest, Installer};

/// Runs an external installer executable and waits for it.
#[derive(Debug, Clone, Default)]
pub struct CommandInstaller {
    config: InstallerConfig,
}

impl CommandInstaller {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// Installer executable for the request.
    pub fn program(&self, request: &InstallRequest<'_>) -> PathBuf {
        self.config.program_for(request.app_path)
    }

    /// Command line passed to the installer: configured extras first, then the
    /// application identity, then one `kind:name:<op><version>` per dependency.
    pub fn install_arguments(&self, request: &InstallRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.config.args.iter().map(OsString::from).collect();
        args.push("--app-path".into());
        args.push(request.app_path.as_os_str().to_owned());
        args.push("--app-id".into());
        args.push(request.app_id.into());
        args.push("--app-name".into());
        args.push(request.app_name.into());
        if let Some(update) = request.update_file {
            args.push("--update-file".into());
            args.push(update.as_os_str().to_owned());
        }
        if request.force {
            args.push("--force".into());
        }
        args.extend(
            request
                .dependencies
                .iter()
                .map(|dependency| OsString::from(dependency_argument(dependency))),
        );
        args
    }
}

fn dependency_argument(dependency: &Dependency) -> String {
    format!(
        "{}:{}:{}{}",
        dependency.kind,
        dependency.name,
        dependency.requirement.symbol(),
        dependency.version
    )
}

impl Installer for CommandInstaller {
    fn run(&mut self, request: &InstallRequest<'_>) -> bool {
        let program = self.program(request);
        let args = self.install_arguments(request);
        info!(
            program = %program.display(),
            app_id = %request.app_id,
            dependencies = request.dependencies.len(),
            "starting installer"
        );

        match Command::new(&program).args(&args).status() {
            Ok(status) if status.success() => true,
            Ok(status) => {
                info!(program = %program.display(), %status, "installer exited unsuccessfully");
                false
            }
            Err(err) => {
                error!(program = %program.display(), error = %err, "failed to start installer");
                false
            }
        }
    }
}
