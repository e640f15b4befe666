//! ---
//! kr_section: "04-binaries"
//! kr_subsection: "binary"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Binary entrypoint for the boot launcher."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use kroll_boot::{BootOptions, BootOrchestrator, BootServices, NativePlatform};
use kroll_common::config::{BootConfig, LoadedBootConfig};
use kroll_common::logging::init_tracing;
use kroll_common::version::VersionInfo;
use tracing::info;

/// Exit status for an unusable launcher configuration.
const CONFIG_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    // Every argument belongs to the application.
    let arguments: Vec<String> = std::env::args().collect();

    let loaded = match load_config() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("krollboot: invalid configuration: {err:#}");
            return ExitCode::from(CONFIG_EXIT_CODE);
        }
    };
    if let Err(err) = init_tracing("krollboot", &loaded.config.logging) {
        eprintln!("krollboot: logging unavailable: {err:#}");
    }
    info!(
        version = %VersionInfo::current().cli_string(),
        config = ?loaded.source,
        "krollboot starting"
    );

    let services = match BootServices::native(&loaded.config) {
        Ok(services) => services,
        Err(err) => {
            eprintln!("krollboot: invalid configuration: {err:#}");
            return ExitCode::from(CONFIG_EXIT_CODE);
        }
    };
    let orchestrator = BootOrchestrator::new(services, BootOptions::from_config(&loaded.config.files));
    match orchestrator.run(arguments) {
        Ok(never) => match never {},
        Err(err) => ExitCode::from(err.exit_code()),
    }
}

/// `$KROLL_BOOT_CONFIG`, else `boot.toml` next to the executable.
fn load_config() -> Result<LoadedBootConfig> {
    let candidates: Vec<PathBuf> = NativePlatform::executable_directory()
        .map(|dir| dir.join(BootConfig::DEFAULT_FILENAME))
        .into_iter()
        .collect();
    BootConfig::load_with_source(&candidates)
}
