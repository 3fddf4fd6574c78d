//! Configuration file support for recipe-ci.
//!
//! recipe-ci supports two configuration file locations:
//! - Global: `~/.recipe-ci/config.toml` - User-wide defaults
//! - Project: `.recipe-ci/config.toml` - Repository-specific overrides
//!
//! Project config takes precedence over global config. Environment
//! variables always take precedence over both; the config file only
//! replaces the built-in fallbacks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Organization that owns the shared package repository.
pub const DEFAULT_ORGANIZATION: &str = "bincrafters";

/// Repository name used when `BINTRAY_REPOSITORY` is unset.
pub const DEFAULT_REPOSITORY: &str = "public-conan";

/// Base URL of per-user upload repositories.
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://api.bintray.com/conan";

/// recipe-ci configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback values used when neither the environment nor CI supply one
    pub defaults: DefaultsConfig,
}

/// Fallback settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Organization name (default username and fallback remote owner)
    pub organization: Option<String>,

    /// Upload repository name
    pub repository: Option<String>,

    /// Base URL for upload repositories
    pub upload_base_url: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.defaults.organization.is_some() {
            self.defaults.organization = other.defaults.organization;
        }
        if other.defaults.repository.is_some() {
            self.defaults.repository = other.defaults.repository;
        }
        if other.defaults.upload_base_url.is_some() {
            self.defaults.upload_base_url = other.defaults.upload_base_url;
        }
    }

    /// The organization name.
    pub fn organization(&self) -> &str {
        self.defaults
            .organization
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION)
    }

    /// The upload repository name.
    pub fn repository(&self) -> &str {
        self.defaults
            .repository
            .as_deref()
            .unwrap_or(DEFAULT_REPOSITORY)
    }

    /// The upload base URL, without a trailing slash.
    pub fn upload_base_url(&self) -> &str {
        self.defaults
            .upload_base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_BASE_URL)
            .trim_end_matches('/')
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.recipe-ci/config.toml)
/// 2. Global config (~/.recipe-ci/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global recipe-ci config directory (~/.recipe-ci).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".recipe-ci"))
}

/// Get the project config path (.recipe-ci/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".recipe-ci").join("config.toml")
}
