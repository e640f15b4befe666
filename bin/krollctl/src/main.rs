//! ---
//! kr_section: "04-binaries"
//! kr_subsection: "binary"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Control CLI for inspecting Kroll bundles."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use anyhow::Result;
use clap::{Parser, Subcommand};
use kroll_common::version::VersionInfo;

mod inspect;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Kroll bundle inspection utility",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Dry-run the boot sequence and report what it would do")]
    Inspect(inspect::InspectOptions),
    #[command(about = "Print the launch environment of a runnable bundle")]
    Env(inspect::InspectOptions),
    #[command(about = "Print extended version information")]
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect(options) => inspect::run_inspect(&options)?,
        Commands::Env(options) => inspect::run_env(&options)?,
        Commands::Version => println!("{}", VersionInfo::current().extended()),
    }
    Ok(())
}
