//! recipe-ci CLI - Recipe autodetection and CI job preparation

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("recipe_ci=debug")
    } else {
        EnvFilter::new("recipe_ci=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Autodetect(args) => commands::autodetect::execute(args),
        Commands::PrepareEnv(args) => commands::prepare_env::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
