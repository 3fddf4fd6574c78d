//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// recipe-ci - Recipe autodetection and CI environment preparation
#[derive(Parser)]
#[command(name = "recipe-ci")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect the recipe, resolve its configuration and run the build
    Autodetect(AutodetectArgs),

    /// Export a CI job's configuration as environment variables
    PrepareEnv(PrepareEnvArgs),

    /// Show what is detected about the recipe
    Inspect(InspectArgs),

    /// Show the resolved build configuration without building
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct AutodetectArgs {
    /// Download cache directory (defaults to <tmp>/conan)
    #[arg(long, value_name = "DIR")]
    pub download_cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct PrepareEnvArgs {
    /// CI platform: gha, azp or gl
    #[arg(long)]
    pub platform: String,

    /// Job configuration as a JSON document
    #[arg(long, env = "BPT_CONFIG", value_name = "JSON")]
    pub config: String,

    /// Name of the configuration to use from a map of configurations (azp only)
    #[arg(long, value_name = "NAME")]
    pub select_config: Option<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Recipe directory (defaults to BPT_CWD or the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
