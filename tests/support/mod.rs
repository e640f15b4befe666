//! ---
//! kr_section: "05-testing"
//! kr_subsection: "integration-tests"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Integration and validation tests for the Kroll boot stack."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kroll_app::component::install_path;
use kroll_app::{Component, Dependency, DependencyKind, INSTALLED_MARKER};
use kroll_boot::{
    BootError, BootOptions, BootOrchestrator, BootReporter, BootServices, Environment,
    FsApplicationLoader, InstallRequest, Installer, LaunchRequest, Launcher, NativePlatform,
};
use parking_lot::Mutex;
use tempfile::{tempdir, TempDir};

pub const LAUNCH_FAILURE: &str = "exec disabled in tests";

#[derive(Debug, Clone)]
pub struct RecordedInstall {
    pub app_id: String,
    pub dependencies: Vec<Dependency>,
    pub update_file: Option<PathBuf>,
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct RecordedLaunch {
    pub runtime: PathBuf,
    pub arguments: Vec<String>,
    pub variables: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub installs: Vec<RecordedInstall>,
    pub environment: HashMap<String, String>,
    pub launches: Vec<RecordedLaunch>,
    pub resolved: Vec<String>,
    pub unresolved: Vec<String>,
    pub errors: Vec<String>,
}

pub type Shared = Arc<Mutex<Recorder>>;

/// Installer double that lays out component directories the way a real
/// installer would.
pub struct ScriptedInstaller {
    recorder: Shared,
    install_root: PathBuf,
    components: Vec<(DependencyKind, String, String)>,
    mark_installed: bool,
    succeed: bool,
}

impl ScriptedInstaller {
    pub fn new(install_root: &Path) -> Self {
        Self {
            recorder: Shared::default(),
            install_root: install_root.to_path_buf(),
            components: Vec::new(),
            mark_installed: true,
            succeed: true,
        }
    }

    pub fn providing(mut self, kind: DependencyKind, name: &str, version: &str) -> Self {
        self.components.push((kind, name.to_owned(), version.to_owned()));
        self
    }

    /// Completes without installing anything, as after a user cancellation.
    pub fn cancelled(mut self) -> Self {
        self.components.clear();
        self.mark_installed = false;
        self
    }

    pub fn failing(mut self) -> Self {
        self.succeed = false;
        self
    }
}

impl Installer for ScriptedInstaller {
    fn run(&mut self, request: &InstallRequest<'_>) -> bool {
        self.recorder.lock().installs.push(RecordedInstall {
            app_id: request.app_id.to_owned(),
            dependencies: request.dependencies.to_vec(),
            update_file: request.update_file.map(Path::to_path_buf),
            force: request.force,
        });
        if !self.succeed {
            return false;
        }
        for (kind, name, version) in &self.components {
            fs::create_dir_all(install_path(&self.install_root, *kind, name, version)).unwrap();
        }
        if self.mark_installed {
            fs::write(request.app_path.join(INSTALLED_MARKER), "").unwrap();
        }
        true
    }
}

struct RecordingEnvironment(Shared);

impl Environment for RecordingEnvironment {
    fn set(&mut self, key: &str, value: &OsStr) {
        self.0
            .lock()
            .environment
            .insert(key.to_owned(), value.to_string_lossy().into_owned());
    }

    fn get(&self, key: &str) -> Option<OsString> {
        self.0.lock().environment.get(key).map(OsString::from)
    }
}

struct RecordingLauncher(Shared);

impl Launcher for RecordingLauncher {
    fn launch(&mut self, request: &LaunchRequest<'_>) -> String {
        self.0.lock().launches.push(RecordedLaunch {
            runtime: request.runtime_path.to_path_buf(),
            arguments: request.arguments.to_vec(),
            variables: request
                .environment
                .variables()
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string_lossy().into_owned()))
                .collect(),
        });
        LAUNCH_FAILURE.to_owned()
    }
}

struct RecordingReporter(Shared);

impl BootReporter for RecordingReporter {
    fn resolved(&mut self, component: &Component) {
        self.0.lock().resolved.push(format!("{} {}", component.name, component.version));
    }

    fn unresolved(&mut self, dependency: &Dependency) {
        self.0.lock().unresolved.push(dependency.to_string());
    }

    fn error(&mut self, message: &str) {
        self.0.lock().errors.push(message.to_owned());
    }
}

/// Scratch layout: an application bundle, a runtime home and a data root.
pub struct Sandbox {
    _root: TempDir,
    pub app: PathBuf,
    pub runtime_home: PathBuf,
    pub data_root: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempdir().unwrap();
        let app = root.path().join("Demo");
        let runtime_home = root.path().join("kroll");
        let data_root = root.path().join("appdata");
        for dir in [&app, &runtime_home, &data_root] {
            fs::create_dir_all(dir).unwrap();
        }
        Self {
            _root: root,
            app,
            runtime_home,
            data_root,
        }
    }

    pub fn write_manifest(&self, filename: &str, contents: &str) -> PathBuf {
        let path = self.app.join(filename);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn install(&self, root: &Path, kind: DependencyKind, name: &str, version: &str) -> PathBuf {
        let path = install_path(root, kind, name, version);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn mark_installed(&self) {
        fs::write(self.app.join(INSTALLED_MARKER), "").unwrap();
    }

    pub fn write_update(&self, app_id: &str, filename: &str, contents: &str) -> PathBuf {
        let dir = self.data_root.join(app_id);
        fs::create_dir_all(&dir).unwrap();
        let marker = dir.join(filename);
        fs::write(&marker, contents).unwrap();
        marker
    }

    /// Orchestrator over the real loader and platform with recording doubles
    /// at the process boundary.
    pub fn orchestrator(
        &self,
        installer: ScriptedInstaller,
        options: BootOptions,
    ) -> (BootOrchestrator<FsApplicationLoader>, Shared) {
        let recorder = installer.recorder.clone();
        let services = BootServices {
            loader: FsApplicationLoader::new(vec![self.runtime_home.clone()]),
            platform: Box::new(NativePlatform::new(Some(self.app.clone()), self.data_root.clone())),
            installer: Box::new(installer),
            environment: Box::new(RecordingEnvironment(recorder.clone())),
            launcher: Box::new(RecordingLauncher(recorder.clone())),
            reporter: Box::new(RecordingReporter(recorder.clone())),
        };
        (BootOrchestrator::new(services, options), recorder)
    }
}

pub fn boot(orchestrator: BootOrchestrator<FsApplicationLoader>, args: &[&str]) -> BootError {
    let arguments = args.iter().map(|arg| arg.to_string()).collect();
    match orchestrator.run(arguments) {
        Ok(never) => match never {},
        Err(err) => err,
    }
}
