//! ---
//! kr_section: "04-binaries"
//! kr_subsection: "binary"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Control CLI for inspecting Kroll bundles."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use kroll_boot::{BootOptions, BootOrchestrator, BootReport, BootServices};
use kroll_common::config::BootConfig;
use kroll_common::logging::init_tracing;

const PROGRAM_NAME: &str = "krollboot";

/// Shared options for commands that dry-run a bundle.
#[derive(Debug, Args)]
pub struct InspectOptions {
    /// Application bundle directory (the directory holding its manifest).
    #[arg(long, value_name = "DIR")]
    pub app: PathBuf,
    /// Configuration file; defaults to `$KROLL_BOOT_CONFIG`, then `<DIR>/boot.toml`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
    /// Arguments the application would be launched with.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Print what a boot of the bundle would do.
pub fn run_inspect(options: &InspectOptions) -> Result<()> {
    let report = inspect(options)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

/// Print the variables the runtime would be launched with.
pub fn run_env(options: &InspectOptions) -> Result<()> {
    let report = inspect(options)?;
    let Some(environment) = &report.environment else {
        bail!(
            "{} is not runnable: {} unresolved dependencies (installed: {})",
            report.app_id,
            report.missing.len(),
            yes_no(report.installed)
        );
    };
    if options.json {
        let variables: serde_json::Map<String, serde_json::Value> = environment
            .variables()
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string_lossy().into_owned().into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&variables)?);
    } else {
        for (key, value) in environment.variables() {
            println!("{key}={}", value.to_string_lossy());
        }
    }
    Ok(())
}

fn inspect(options: &InspectOptions) -> Result<BootReport> {
    let mut config = load_config(options)?;
    config.paths.home = Some(options.app.clone());
    init_tracing("krollctl", &config.logging)?;

    let services = BootServices::native(&config)?;
    let mut orchestrator = BootOrchestrator::new(services, BootOptions::from_config(&config.files));
    let mut arguments = vec![PROGRAM_NAME.to_owned()];
    arguments.extend(options.args.iter().cloned());
    Ok(orchestrator.inspect(arguments)?)
}

fn load_config(options: &InspectOptions) -> Result<BootConfig> {
    match &options.config {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?
            .parse::<BootConfig>()
            .with_context(|| format!("invalid config file {}", path.display())),
        None => BootConfig::load(&[options.app.join(BootConfig::DEFAULT_FILENAME)]),
    }
}

fn render_report(report: &BootReport) {
    println!("Application: {} ({})", report.app_name, report.app_id);
    println!("Home:        {}", report.home.display());
    println!("Manifest:    {}", report.manifest.display());
    match &report.update_file {
        Some(marker) => println!("Update:      {}", marker.display()),
        None => println!("Update:      none"),
    }
    println!("Installed:   {}", yes_no(report.installed));
    println!("Resolved:");
    for component in &report.resolved {
        let origin = if component.bundled { " (bundled)" } else { "" };
        println!(
            "  {} {} {}{}",
            component.name,
            component.version,
            component.path.display(),
            origin
        );
    }
    if !report.missing.is_empty() {
        println!("Missing:");
        for dependency in &report.missing {
            println!("  {dependency}");
        }
    }
    println!("Install required: {}", yes_no(report.install_required));
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
