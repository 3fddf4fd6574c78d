//! Conan Package Tools driver.
//!
//! Runs `ConanMultiPackager` through a small embedded Python script. The
//! resolved configuration is passed to the script as environment variables,
//! mostly the `CONAN_*` names the packager itself understands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::PackageBuilder;
use crate::ops::options::format_options;
use crate::ops::resolve::{BuildStrategy, ResolvedConfig};
use crate::util::env::EnvSnapshot;
use crate::util::process::{find_python, CommandRunner, ProcessBuilder};

/// Overrides the program used to run the driver script.
pub const BUILDER_PROGRAM_VAR: &str = "RECIPE_CI_BUILDER";

const DRIVER_SCRIPT: &str = include_str!("driver.py");

fn flag(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

/// Environment variables describing a resolved configuration to the driver.
pub fn builder_env(config: &ResolvedConfig) -> Vec<(String, String)> {
    let mut vars = vec![
        ("CONAN_USERNAME".to_string(), config.username.clone()),
        ("CONAN_LOGIN_USERNAME".to_string(), config.login_username.clone()),
        ("CONAN_CHANNEL".to_string(), config.channel.clone()),
        ("CONAN_REFERENCE".to_string(), config.reference.clone()),
        ("CONAN_UPLOAD".to_string(), config.upload.to_string()),
        (
            "CONAN_REMOTES".to_string(),
            config
                .remotes
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(","),
        ),
        (
            "CONAN_UPLOAD_ONLY_WHEN_STABLE".to_string(),
            flag(config.upload_only_when_stable),
        ),
        (
            "CONAN_STABLE_BRANCH_PATTERN".to_string(),
            config.stable_branch_pattern.clone(),
        ),
    ];

    if let Some(ref archs) = config.archs {
        vars.push(("CONAN_ARCHS".to_string(), archs.join(",")));
    }
    if let Some(ref policy) = config.build_policy {
        vars.push(("CONAN_BUILD_POLICY".to_string(), policy.clone()));
    }

    match &config.strategy {
        BuildStrategy::Minimal { options } => {
            vars.push(("RECIPE_CI_STRATEGY".to_string(), "minimal".to_string()));
            vars.push(("CONAN_OPTIONS".to_string(), format_options(options)));
        }
        BuildStrategy::Default {
            shared_option_name,
            pure_c,
            dll_with_static_runtime,
        } => {
            vars.push(("RECIPE_CI_STRATEGY".to_string(), "default".to_string()));
            if let Some(name) = shared_option_name {
                vars.push(("RECIPE_CI_SHARED_OPTION_NAME".to_string(), name.clone()));
            }
            vars.push(("RECIPE_CI_PURE_C".to_string(), flag(*pure_c)));
            vars.push((
                "RECIPE_CI_DLL_WITH_STATIC_RUNTIME".to_string(),
                flag(*dll_with_static_runtime),
            ));
        }
    }

    vars
}

/// Builds with Conan Package Tools' `ConanMultiPackager`.
#[derive(Debug)]
pub struct MultiPackager<R: CommandRunner> {
    runner: R,
    work_dir: PathBuf,
}

impl<R: CommandRunner> MultiPackager<R> {
    /// Create a builder that runs in the recipe directory.
    pub fn new(runner: R, work_dir: impl AsRef<Path>) -> Self {
        MultiPackager {
            runner,
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Program that runs the driver script.
    ///
    /// `RECIPE_CI_BUILDER` > a Python interpreter in PATH > `python`.
    pub fn program(env: &EnvSnapshot) -> PathBuf {
        env.get_non_empty(BUILDER_PROGRAM_VAR)
            .map(PathBuf::from)
            .or_else(|| find_python(env))
            .unwrap_or_else(|| PathBuf::from("python"))
    }

    fn process(&self, config: &ResolvedConfig, env: &EnvSnapshot) -> ProcessBuilder {
        let mut process = ProcessBuilder::new(Self::program(env))
            .arg("-c")
            .arg(DRIVER_SCRIPT)
            .with_env(env)
            .cwd(&self.work_dir);
        for (key, value) in builder_env(config) {
            process = process.env(key, value);
        }
        process
    }
}

impl<R: CommandRunner> PackageBuilder for MultiPackager<R> {
    fn run(&mut self, config: &ResolvedConfig, env: &EnvSnapshot) -> Result<()> {
        tracing::info!("Running ConanMultiPackager for {}", config.reference);
        let process = self.process(config, env);
        self.runner
            .run_strict(&process)
            .with_context(|| format!("failed to build {}", config.reference))
    }
}
