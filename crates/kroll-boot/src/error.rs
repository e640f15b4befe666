//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::fmt;
use std::path::PathBuf;

use kroll_app::{AppError, Dependency};
use serde::Serialize;
use thiserror::Error;

/// Steps of the boot sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootStep {
    LocateHome,
    LoadManifest,
    LoadApplication,
    BindArguments,
    CheckUpdate,
    ResolveDependencies,
    InstallDecision,
    Install,
    FinalCheck,
    AssembleEnvironment,
    PlatformBootstrap,
    CleanupUpdate,
    Handoff,
}

impl BootStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootStep::LocateHome => "locate-home",
            BootStep::LoadManifest => "load-manifest",
            BootStep::LoadApplication => "load-application",
            BootStep::BindArguments => "bind-arguments",
            BootStep::CheckUpdate => "check-update",
            BootStep::ResolveDependencies => "resolve-dependencies",
            BootStep::InstallDecision => "install-decision",
            BootStep::Install => "install",
            BootStep::FinalCheck => "final-check",
            BootStep::AssembleEnvironment => "assemble-environment",
            BootStep::PlatformBootstrap => "platform-bootstrap",
            BootStep::CleanupUpdate => "cleanup-update",
            BootStep::Handoff => "handoff",
        }
    }
}

impl fmt::Display for BootStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal boot failures. The display text of user-visible variants is the
/// message shown to the user.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("Application packaging error: could not locate the application home: {0}")]
    HomeUnavailable(#[source] std::io::Error),
    #[error("Application packaging error: no manifest was found at: {}", .0.display())]
    ManifestMissing(PathBuf),
    #[error("Application packaging error: could not read manifest at: {}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: AppError,
    },
    #[error("installer did not complete successfully")]
    InstallerFailed,
    #[error("application is not runnable: {} unresolved dependencies (installed: {installed})", .missing.len())]
    Unresolved {
        missing: Vec<Dependency>,
        installed: bool,
    },
    #[error("resolved application has no runtime")]
    RuntimeUnresolved,
    #[error("Launching application failed: {0}")]
    HandoffFailed(String),
}

impl BootError {
    /// Step the failure originated from.
    pub fn step(&self) -> BootStep {
        match self {
            BootError::HomeUnavailable(_) => BootStep::LocateHome,
            BootError::ManifestMissing(_) => BootStep::LoadManifest,
            BootError::ManifestUnreadable { .. } => BootStep::LoadApplication,
            BootError::InstallerFailed => BootStep::Install,
            BootError::Unresolved { .. } => BootStep::FinalCheck,
            BootError::RuntimeUnresolved => BootStep::AssembleEnvironment,
            BootError::HandoffFailed(_) => BootStep::Handoff,
        }
    }

    /// Stable process exit code for the failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            BootError::HomeUnavailable(_) => 10,
            BootError::ManifestMissing(_) => 11,
            BootError::ManifestUnreadable { .. } => 12,
            BootError::InstallerFailed => 20,
            BootError::Unresolved { .. } => 21,
            BootError::RuntimeUnresolved => 22,
            BootError::HandoffFailed(_) => 30,
        }
    }

    /// Whether the orchestrator shows this failure to the user. Installer
    /// failures and unresolved dependencies were already reported by the
    /// installer or follow a user cancellation.
    pub fn is_user_visible(&self) -> bool {
        match self {
            BootError::HomeUnavailable(_)
            | BootError::ManifestMissing(_)
            | BootError::ManifestUnreadable { .. }
            | BootError::RuntimeUnresolved
            | BootError::HandoffFailed(_) => true,
            BootError::InstallerFailed | BootError::Unresolved { .. } => false,
        }
    }
}
