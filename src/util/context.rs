//! Global context for recipe-ci operations.
//!
//! Provides centralized access to configuration, paths, the host platform
//! and the captured environment.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_dir, load_config, project_config_path, Config};
use crate::util::env::EnvSnapshot;

/// Name of the recipe file inside a recipe directory.
pub const RECIPE_FILE: &str = "conanfile.py";

/// Environment variable pointing at the recipe directory, relative to the
/// repository root.
pub const WORK_DIR_VAR: &str = "BPT_CWD";

/// Operating system of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    Macos,
    Windows,
    Other,
}

impl HostOs {
    /// Detect the host operating system.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => HostOs::Linux,
            "macos" => HostOs::Macos,
            "windows" => HostOs::Windows,
            _ => HostOs::Other,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Linux => write!(f, "Linux"),
            HostOs::Macos => write!(f, "Macos"),
            HostOs::Windows => write!(f, "Windows"),
            HostOs::Other => write!(f, "Other"),
        }
    }
}

/// Global context containing configuration, paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Repository root (the process working directory)
    cwd: PathBuf,

    /// Global configuration directory (~/.recipe-ci/)
    home: PathBuf,

    /// Environment captured at startup
    env: EnvSnapshot,

    /// Host operating system
    host_os: HostOs,
}

impl GlobalContext {
    /// Create a new GlobalContext from the current process.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".recipe-ci"));

        Ok(GlobalContext {
            cwd,
            home,
            env: EnvSnapshot::capture(),
            host_os: HostOs::current(),
        })
    }

    /// Create a GlobalContext with explicit parts.
    pub fn from_parts(cwd: PathBuf, env: EnvSnapshot, host_os: HostOs) -> Self {
        GlobalContext {
            home: cwd.join(".recipe-ci-home"),
            cwd,
            env,
            host_os,
        }
    }

    /// Get the repository root.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the captured environment.
    pub fn env(&self) -> &EnvSnapshot {
        &self.env
    }

    /// Get the captured environment for modification.
    pub fn env_mut(&mut self) -> &mut EnvSnapshot {
        &mut self.env
    }

    /// Get the host operating system.
    pub fn host_os(&self) -> HostOs {
        self.host_os
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &project_config_path(&self.cwd))
    }

    /// Directory holding the recipe.
    ///
    /// `BPT_CWD` is resolved against the repository root when set.
    pub fn work_dir(&self) -> PathBuf {
        match self.env.get_non_empty(WORK_DIR_VAR) {
            Some(dir) => self.cwd.join(dir),
            None => self.cwd.clone(),
        }
    }

    /// Path of the recipe file.
    pub fn recipe_path(&self) -> PathBuf {
        self.work_dir().join(RECIPE_FILE)
    }
}
