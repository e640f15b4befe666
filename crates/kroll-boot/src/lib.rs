//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
//! Boot orchestrator, update detection, and native launch adapters for Kroll bundles.

pub mod collaborators;
pub mod context;
pub mod environment;
pub mod error;
pub mod filter;
pub mod installer;
pub mod launcher;
pub mod loader;
pub mod orchestrator;
pub mod platform;
pub mod reporter;
pub mod update;

pub use collaborators::{
    ApplicationLoader, BootApplication, BootPlatform, InstallRequest, Installer, LaunchRequest,
    Launcher,
};
pub use context::BootContext;
pub use environment::{Environment, LaunchEnvironment, ProcessEnvironment, MODULE_SEPARATOR};
pub use error::{BootError, BootStep};
pub use filter::filter_for_sdk_install;
pub use installer::CommandInstaller;
pub use launcher::ExecLauncher;
pub use loader::FsApplicationLoader;
pub use orchestrator::{BootOptions, BootOrchestrator, BootReport, BootServices, InstallDecision};
pub use platform::NativePlatform;
pub use reporter::{BootReporter, ConsoleReporter};
pub use update::UpdateDetector;
