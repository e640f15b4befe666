//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;

use kroll_app::{Component, Dependency};
use kroll_common::config::{BootConfig, FilesConfig};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::collaborators::{
    ApplicationLoader, BootApplication, BootPlatform, InstallRequest, Installer, LaunchRequest,
    Launcher,
};
use crate::context::BootContext;
use crate::environment::{Environment, LaunchEnvironment, ProcessEnvironment};
use crate::error::{BootError, BootStep};
use crate::filter::filter_for_sdk_install;
use crate::installer::CommandInstaller;
use crate::launcher::ExecLauncher;
use crate::loader::FsApplicationLoader;
use crate::platform::NativePlatform;
use crate::reporter::{BootReporter, ConsoleReporter};
use crate::update::UpdateDetector;

const DEBUG_ARGUMENT: &str = "debug";
const FORCE_INSTALL_ARGUMENT: &str = "force-install";

/// File names and recognised arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOptions {
    pub manifest_filename: String,
    pub update_filename: String,
    /// Enables the resolution printout.
    pub debug_argument: String,
    /// Forces the install step.
    pub force_install_argument: String,
}

impl BootOptions {
    pub fn from_config(files: &FilesConfig) -> Self {
        Self {
            manifest_filename: files.manifest.clone(),
            update_filename: files.update.clone(),
            ..Self::default()
        }
    }
}

impl Default for BootOptions {
    fn default() -> Self {
        let files = FilesConfig::default();
        Self {
            manifest_filename: files.manifest,
            update_filename: files.update,
            debug_argument: DEBUG_ARGUMENT.to_owned(),
            force_install_argument: FORCE_INSTALL_ARGUMENT.to_owned(),
        }
    }
}

/// Collaborators sequenced by the orchestrator.
pub struct BootServices<L: ApplicationLoader> {
    pub loader: L,
    pub platform: Box<dyn BootPlatform>,
    pub installer: Box<dyn Installer>,
    pub environment: Box<dyn Environment>,
    pub launcher: Box<dyn Launcher>,
    pub reporter: Box<dyn BootReporter>,
}

impl BootServices<FsApplicationLoader> {
    /// Native adapters wired from configuration, acting on the current process.
    pub fn native(config: &BootConfig) -> anyhow::Result<Self> {
        Ok(Self {
            loader: FsApplicationLoader::from_config(config)?,
            platform: Box::new(NativePlatform::from_config(config)?),
            installer: Box::new(CommandInstaller::new(config.installer.clone())),
            environment: Box::new(ProcessEnvironment),
            launcher: Box::new(ExecLauncher::from_config(&config.launcher)),
            reporter: Box::new(ConsoleReporter),
        })
    }
}

/// Inputs of the install decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallDecision {
    pub force_install: bool,
    pub missing_dependencies: bool,
    pub not_installed: bool,
    pub update_pending: bool,
}

impl InstallDecision {
    pub fn evaluate<A: BootApplication>(
        context: &BootContext<A>,
        missing: &[Dependency],
        force_install: bool,
    ) -> Self {
        Self {
            force_install,
            missing_dependencies: !missing.is_empty(),
            not_installed: !context.application().is_installed(),
            update_pending: context.update_occurred(),
        }
    }

    /// Whether the installer must run.
    pub fn required(&self) -> bool {
        self.force_install || self.missing_dependencies || self.not_installed || self.update_pending
    }
}

/// Outcome of a dry run: what a boot would do, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct BootReport {
    pub app_id: String,
    pub app_name: String,
    pub home: PathBuf,
    pub manifest: PathBuf,
    pub update_file: Option<PathBuf>,
    pub installed: bool,
    pub resolved: Vec<Component>,
    pub missing: Vec<Dependency>,
    pub install: InstallDecision,
    pub install_required: bool,
    /// Present when the application is runnable as-is.
    pub environment: Option<LaunchEnvironment>,
}

/// Sequential boot state machine: manifest load, update substitution,
/// resolution, conditional install, environment assembly and handoff.
///
/// Terminal on the first failure; there are no retries at this layer.
pub struct BootOrchestrator<L: ApplicationLoader> {
    services: BootServices<L>,
    options: BootOptions,
}

impl<L: ApplicationLoader> BootOrchestrator<L> {
    pub fn new(services: BootServices<L>, options: BootOptions) -> Self {
        Self { services, options }
    }

    /// Boot the bundle and hand off to its runtime.
    ///
    /// Only returns on failure: a successful handoff replaces the process.
    pub fn run(mut self, arguments: Vec<String>) -> Result<Infallible, BootError> {
        let result = self.boot(arguments);
        if let Err(err) = &result {
            if err.is_user_visible() {
                error!(step = %err.step(), code = err.exit_code(), error = %err, "boot aborted");
                self.services.reporter.error(&err.to_string());
            } else {
                // The installer already told the user what went wrong.
                info!(step = %err.step(), code = err.exit_code(), error = %err, "boot aborted");
            }
        }
        result
    }

    /// Run the boot sequence up to the install decision without installing,
    /// touching the environment, deleting the update marker or launching.
    pub fn inspect(&mut self, arguments: Vec<String>) -> Result<BootReport, BootError> {
        let (context, missing) = self.prepare(arguments, false)?;
        let force = self.force_install(&context);
        let install = InstallDecision::evaluate(&context, &missing, force);
        let application = context.application();
        let environment = if missing.is_empty() && application.is_installed() {
            application.runtime_path().map(|runtime| {
                LaunchEnvironment::assemble(application.path(), runtime, application.modules())
            })
        } else {
            None
        };
        Ok(BootReport {
            app_id: application.id().to_owned(),
            app_name: application.name().to_owned(),
            home: context.home().to_path_buf(),
            manifest: context.manifest_path().to_path_buf(),
            update_file: context.update_file().map(PathBuf::from),
            installed: application.is_installed(),
            resolved: application.resolved_components(),
            missing,
            install,
            install_required: install.required(),
            environment,
        })
    }

    fn boot(&mut self, arguments: Vec<String>) -> Result<Infallible, BootError> {
        let (mut context, mut missing) = self.prepare(arguments, true)?;

        let force = self.force_install(&context);
        let decision = InstallDecision::evaluate(&context, &missing, force);
        info!(step = %BootStep::InstallDecision, ?decision, required = decision.required(), "install decision");
        if decision.required() {
            self.install(&context, missing, force)?;
            missing = self.resolve(&mut context, false);
        }

        self.final_check(&context, missing)?;
        let environment = self.assemble_environment(&context)?;

        debug!(step = %BootStep::PlatformBootstrap, "running platform pre-launch hook");
        self.services
            .platform
            .prepare_launch(self.services.environment.as_mut(), environment.module_list());

        self.cleanup_update(&context);
        Err(self.handoff(&context, &environment))
    }

    /// Steps LocateHome through the first ResolveDependencies pass.
    fn prepare(
        &mut self,
        arguments: Vec<String>,
        report_resolution: bool,
    ) -> Result<(BootContext<L::Application>, Vec<Dependency>), BootError> {
        let home = self
            .services
            .platform
            .application_home()
            .map_err(BootError::HomeUnavailable)?;
        debug!(step = %BootStep::LocateHome, home = %home.display(), "application home located");

        let manifest_path = home.join(&self.options.manifest_filename);
        if !manifest_path.is_file() {
            return Err(BootError::ManifestMissing(manifest_path));
        }

        let mut application = self
            .services
            .loader
            .load(&manifest_path, None)
            .map_err(|source| BootError::ManifestUnreadable {
                path: manifest_path.clone(),
                source,
            })?;
        info!(
            step = %BootStep::LoadApplication,
            app_id = %application.id(),
            manifest = %manifest_path.display(),
            "application loaded"
        );

        application.set_arguments(arguments.clone());
        debug!(step = %BootStep::BindArguments, count = arguments.len(), "arguments bound");
        let mut context = BootContext::new(home, manifest_path, arguments, application);

        let detector = UpdateDetector::new(
            &self.services.loader,
            self.services.platform.as_ref(),
            &self.options.update_filename,
        );
        let updated = detector.detect(&mut context);
        debug!(step = %BootStep::CheckUpdate, updated, "update check complete");

        let missing = self.resolve(&mut context, report_resolution);
        Ok((context, missing))
    }

    fn resolve(
        &mut self,
        context: &mut BootContext<L::Application>,
        report_resolution: bool,
    ) -> Vec<Dependency> {
        let missing = context.application_mut().resolve_dependencies();
        let application = context.application();
        info!(
            step = %BootStep::ResolveDependencies,
            resolved = application.resolved_components().len(),
            missing = missing.len(),
            "dependencies resolved"
        );
        if report_resolution && application.has_argument(&self.options.debug_argument) {
            let reporter = self.services.reporter.as_mut();
            for component in application.resolved_components() {
                reporter.resolved(&component);
            }
            for dependency in &missing {
                reporter.unresolved(dependency);
            }
        }
        missing
    }

    fn force_install(&self, context: &BootContext<L::Application>) -> bool {
        context
            .application()
            .has_argument(&self.options.force_install_argument)
    }

    fn install(
        &mut self,
        context: &BootContext<L::Application>,
        missing: Vec<Dependency>,
        force: bool,
    ) -> Result<(), BootError> {
        let dependencies = filter_for_sdk_install(missing);
        let application = context.application();
        let request = InstallRequest {
            app_id: application.id(),
            app_name: application.name(),
            app_path: application.path(),
            update_file: context.update_file(),
            dependencies: &dependencies,
            force,
        };
        info!(
            step = %BootStep::Install,
            dependencies = dependencies.len(),
            force,
            "running installer"
        );
        if self.services.installer.run(&request) {
            Ok(())
        } else {
            Err(BootError::InstallerFailed)
        }
    }

    fn final_check(
        &self,
        context: &BootContext<L::Application>,
        missing: Vec<Dependency>,
    ) -> Result<(), BootError> {
        let installed = context.application().is_installed();
        if !missing.is_empty() || !installed {
            return Err(BootError::Unresolved { missing, installed });
        }
        debug!(step = %BootStep::FinalCheck, "application is runnable");
        Ok(())
    }

    fn assemble_environment(
        &mut self,
        context: &BootContext<L::Application>,
    ) -> Result<LaunchEnvironment, BootError> {
        let application = context.application();
        let runtime = application
            .runtime_path()
            .ok_or(BootError::RuntimeUnresolved)?;
        let environment =
            LaunchEnvironment::assemble(application.path(), runtime, application.modules());
        environment.apply(self.services.environment.as_mut());
        info!(
            step = %BootStep::AssembleEnvironment,
            runtime = %runtime.display(),
            modules = application.modules().len(),
            "launch environment assembled"
        );
        Ok(environment)
    }

    /// Deletion failure is not fatal; the marker stays and is detected again
    /// on the next boot.
    fn cleanup_update(&self, context: &BootContext<L::Application>) {
        let Some(marker) = context.update_file() else {
            return;
        };
        match fs::remove_file(marker) {
            Ok(()) => debug!(step = %BootStep::CleanupUpdate, marker = %marker.display(), "update marker removed"),
            Err(err) => warn!(
                step = %BootStep::CleanupUpdate,
                marker = %marker.display(),
                error = %err,
                "failed to remove update marker"
            ),
        }
    }

    fn handoff(
        &mut self,
        context: &BootContext<L::Application>,
        environment: &LaunchEnvironment,
    ) -> BootError {
        let application = context.application();
        let Some(runtime_path) = application.runtime_path() else {
            return BootError::RuntimeUnresolved;
        };
        let request = LaunchRequest {
            app_id: application.id(),
            runtime_path,
            arguments: application.arguments(),
            environment,
        };
        info!(step = %BootStep::Handoff, runtime = %runtime_path.display(), "handing off to runtime");
        let failure = self.services.launcher.launch(&request);
        BootError::HandoffFailed(failure)
    }
}
