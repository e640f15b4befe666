//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
//! Interfaces the orchestrator sequences. Native implementations live in
//! [`crate::loader`], [`crate::platform`], [`crate::installer`] and
//! [`crate::launcher`].

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use kroll_app::{AppError, Component, Dependency};

use crate::environment::{Environment, LaunchEnvironment};

/// The application descriptor as seen by the orchestrator.
pub trait BootApplication {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Installation root.
    fn path(&self) -> &Path;
    /// Directory of the resolved runtime, if resolution found one.
    fn runtime_path(&self) -> Option<&Path>;
    /// Resolved modules, in resolution order.
    fn modules(&self) -> &[Component];
    /// Every component found by the last resolution.
    fn resolved_components(&self) -> Vec<Component>;
    /// Resolve the dependency graph and return the dependencies still missing.
    fn resolve_dependencies(&mut self) -> Vec<Dependency>;
    fn is_installed(&self) -> bool;
    fn has_argument(&self, name: &str) -> bool;
    fn set_arguments(&mut self, arguments: Vec<String>);
    fn arguments(&self) -> &[String];
}

/// Constructs application descriptors from manifest files.
pub trait ApplicationLoader {
    type Application: BootApplication;

    /// Load the manifest at `manifest`. `base` overrides the installation root
    /// that relative component lookups resolve against.
    fn load(&self, manifest: &Path, base: Option<&Path>) -> Result<Self::Application, AppError>;
}

/// Platform-specific locations and the pre-launch hook.
pub trait BootPlatform {
    /// Installation root of the running bundle.
    fn application_home(&self) -> io::Result<PathBuf>;
    /// Private data directory for `app_id`; the update marker lives here.
    fn application_data_directory(&self, app_id: &str) -> PathBuf;
    /// Last adjustments before handoff, given the assembled module list.
    fn prepare_launch(&self, environment: &mut dyn Environment, module_list: &OsStr);
}

/// Input to an installer run.
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    pub app_id: &'a str,
    pub app_name: &'a str,
    pub app_path: &'a Path,
    /// Update marker being applied, when an update substitution occurred.
    pub update_file: Option<&'a Path>,
    pub dependencies: &'a [Dependency],
    pub force: bool,
}

/// Installs missing dependencies. A single blocking call; the installer does
/// its own user-facing reporting.
pub trait Installer {
    fn run(&mut self, request: &InstallRequest<'_>) -> bool;
}

/// Input to the process handoff.
#[derive(Debug, Clone)]
pub struct LaunchRequest<'a> {
    pub app_id: &'a str,
    pub runtime_path: &'a Path,
    /// Captured arguments, including the program name.
    pub arguments: &'a [String],
    pub environment: &'a LaunchEnvironment,
}

/// Replaces the current process with the runtime.
pub trait Launcher {
    /// Does not return on success. The returned string describes the failure.
    fn launch(&mut self, request: &LaunchRequest<'_>) -> String;
}
