//! Patchbay CLI - test harness for patchbay dependency graphs.

mod commands;
mod config;
mod patches;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(author, version, about = "Patchbay graph engine harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered operations and their ports
    Ops(commands::ops::OpsArgs),

    /// Build a demo patch and drive it for a number of cycles
    Run(commands::run::RunArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ops(args) => commands::ops::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}
