//! Automatic build of the recipe in the working directory.
//!
//! Prepares the job (download cache, system requirements), then either
//! defers to a custom `build.py` or inspects the recipe, resolves its
//! configuration and runs the package builder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::PackageBuilder;
use crate::core::inspect::classify;
use crate::core::layout::{custom_build_script, DirectoryStructure, CUSTOM_BUILD_SCRIPT};
use crate::core::recipe::RecipeDescriptor;
use crate::ops::resolve::{ResolvedConfig, Resolver};
use crate::util::context::{GlobalContext, WORK_DIR_VAR};
use crate::util::env::EnvSnapshot;
use crate::util::fs::{ensure_dir, make_world_writable};
use crate::util::process::{find_python, CommandRunner, ProcessBuilder};

/// Options for [`run_autodetect`].
#[derive(Debug, Clone)]
pub struct AutodetectOptions {
    /// Shared package download cache
    pub download_cache: PathBuf,
}

impl Default for AutodetectOptions {
    fn default() -> Self {
        AutodetectOptions {
            download_cache: std::env::temp_dir().join("conan"),
        }
    }
}

/// What an autodetect run did.
#[derive(Debug)]
pub enum Outcome {
    /// A custom build script ran instead of the builder.
    CustomBuild(PathBuf),
    /// The builder ran with this configuration.
    Built(ResolvedConfig),
}

/// Commands that configure Conan inside (or before) a build.
fn entry_commands(env: &EnvSnapshot, download_cache: &Path) -> Vec<String> {
    let mut commands = Vec::new();
    if let Some(script) = env.get_non_empty("CONAN_DOCKER_ENTRY_SCRIPT") {
        commands.push(script.to_string());
    }
    commands.push(format!(
        "conan config set storage.download_cache=\"{}\"",
        download_cache.display()
    ));
    commands.push("conan config set general.revisions_enabled=1".to_string());
    commands
}

/// Enable the shared download cache.
///
/// Docker builds get the cache mounted and configured through the entry
/// script; local builds configure Conan directly.
pub fn enable_download_cache(
    env: &mut EnvSnapshot,
    runner: &mut dyn CommandRunner,
    download_cache: &Path,
) -> Result<()> {
    tracing::info!("Enabling Conan download cache ...");

    ensure_dir(download_cache)?;
    make_world_writable(download_cache)?;

    let commands = entry_commands(env, download_cache);

    if env.get_non_empty("CONAN_DOCKER_IMAGE").is_some() {
        let mount = format!("-v '{0}':'{0}'", download_cache.display());
        let run_options = match env.get_non_empty("CONAN_DOCKER_RUN_OPTIONS") {
            Some(existing) => format!("{} {}", existing, mount),
            None => mount,
        };
        env.set("CONAN_DOCKER_ENTRY_SCRIPT", commands.join("; "));
        env.set("CONAN_DOCKER_RUN_OPTIONS", run_options);
    } else {
        for command in &commands {
            runner.run_best_effort(&ProcessBuilder::shell(command.as_str()).with_env(env));
        }
    }

    Ok(())
}

/// Run a custom build script in its own directory.
///
/// The script runs without the working directory variable; it already
/// starts inside the recipe directory.
fn run_custom_build(env: &EnvSnapshot, runner: &mut dyn CommandRunner, script: &Path) -> Result<()> {
    tracing::info!("Custom build.py detected. Executing ...");

    let dir = script
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let python = find_python(env).unwrap_or_else(|| PathBuf::from("python"));

    runner
        .run_strict(
            &ProcessBuilder::new(python)
                .arg(CUSTOM_BUILD_SCRIPT)
                .with_env(env)
                .env_remove(WORK_DIR_VAR)
                .cwd(dir),
        )
        .with_context(|| format!("custom build script {} failed", script.display()))
}

/// Inspect the recipe in the working directory and resolve its configuration.
pub fn resolve_recipe(ctx: &GlobalContext) -> Result<ResolvedConfig> {
    let structure = DirectoryStructure::detect(ctx.cwd())?;
    let recipe_path = ctx.recipe_path();
    let recipe = RecipeDescriptor::load(&recipe_path)
        .with_context(|| format!("failed to inspect {}", recipe_path.display()))?
        .with_structure(structure);

    let classification = classify(&recipe);
    let config = ctx.load_config();
    let resolved = Resolver::from_context(ctx, &config).resolve(&recipe, &classification)?;
    Ok(resolved)
}

/// Build the recipe in the working directory.
pub fn run_autodetect(
    ctx: &mut GlobalContext,
    runner: &mut dyn CommandRunner,
    builder: &mut dyn PackageBuilder,
    options: &AutodetectOptions,
) -> Result<Outcome> {
    enable_download_cache(ctx.env_mut(), runner, &options.download_cache)?;

    ctx.env_mut().set("CONAN_SYSREQUIRES_MODE", "enabled");

    if let Some(script) = custom_build_script(&ctx.work_dir()) {
        run_custom_build(ctx.env(), runner, &script)?;
        return Ok(Outcome::CustomBuild(script));
    }

    let resolved = resolve_recipe(ctx)?;
    builder.run(&resolved, ctx.env())?;
    Ok(Outcome::Built(resolved))
}
