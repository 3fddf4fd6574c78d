//! Build configuration resolution.
//!
//! Every field is resolved with the same precedence:
//!
//! 1. An explicit environment variable (`CONAN_USERNAME`, ...)
//! 2. A value inferred from the CI system running the job
//! 3. A value derived from the recipe
//! 4. The configured (or built-in) fallback
//!
//! CI systems are checked in a fixed order: AppVeyor, Travis, CircleCI.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::inspect::Classification;
use crate::core::layout::DirectoryStructure;
use crate::core::recipe::RecipeDescriptor;
use crate::ops::options::{parse_option_list, OptionMap, OptionsError};
use crate::util::config::Config;
use crate::util::context::{GlobalContext, HostOs};
use crate::util::env::EnvSnapshot;

/// Stable branch pattern for single-recipe repositories.
pub const DEFAULT_STABLE_BRANCH_PATTERN: &str = "stable/*";

/// Stable branch pattern for multi-version repositories.
pub const MULTI_VERSION_STABLE_BRANCH_PATTERN: &str = "main";

/// Architecture built on macOS when none is requested.
pub const MACOS_DEFAULT_ARCH: &str = "x86_64";

/// Error resolving the build configuration.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no version for `{name}`: set CONAN_VERSION, build from a `<channel>/<version>` branch, or declare `version` in the recipe")]
    MissingVersion { name: String },

    #[error("invalid CONAN_OPTIONS")]
    Options(#[from] OptionsError),
}

/// A CI system recipe-ci knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiSystem {
    AppVeyor,
    Travis,
    CircleCi,
}

impl CiSystem {
    /// Detect the CI system running this process, in detection order.
    pub fn detect(env: &EnvSnapshot) -> Option<Self> {
        if env.get_non_empty("APPVEYOR_REPO_NAME").is_some() {
            Some(CiSystem::AppVeyor)
        } else if env.get_non_empty("TRAVIS_REPO_SLUG").is_some() {
            Some(CiSystem::Travis)
        } else if env.get_non_empty("CIRCLECI").is_some() {
            Some(CiSystem::CircleCi)
        } else {
            None
        }
    }
}

impl fmt::Display for CiSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CiSystem::AppVeyor => write!(f, "AppVeyor"),
            CiSystem::Travis => write!(f, "Travis CI"),
            CiSystem::CircleCi => write!(f, "CircleCI"),
        }
    }
}

/// Values inferred from CI repository and branch variables.
///
/// The repository `owner/name` gives the username; a `channel/version`
/// branch gives channel and version. Values without a `/` yield nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiVars {
    pub username: String,
    pub channel: String,
    pub version: String,
}

impl CiVars {
    /// Read CI variables from an environment snapshot.
    pub fn from_env(env: &EnvSnapshot) -> Self {
        let repo_name = first_non_empty(env, &["APPVEYOR_REPO_NAME", "TRAVIS_REPO_SLUG"])
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}/{}",
                    env.get("CIRCLE_PROJECT_USERNAME").unwrap_or_default(),
                    env.get("CIRCLE_PROJECT_REPONAME").unwrap_or_default()
                )
            });
        let repo_branch =
            first_non_empty(env, &["APPVEYOR_REPO_BRANCH", "TRAVIS_BRANCH", "CIRCLE_BRANCH"])
                .unwrap_or_default();

        let username = repo_name
            .split_once('/')
            .map(|(owner, _)| owner.to_string())
            .unwrap_or_default();
        let (channel, version) = repo_branch
            .split_once('/')
            .map(|(channel, version)| (channel.to_string(), version.to_string()))
            .unwrap_or_default();

        CiVars {
            username,
            channel,
            version,
        }
    }
}

fn first_non_empty<'e>(env: &'e EnvSnapshot, keys: &[&str]) -> Option<&'e str> {
    keys.iter().find_map(|key| env.get_non_empty(key))
}

/// A remote repository: URL plus optional `@`-separated flags
/// (SSL verification, remote name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl Remote {
    /// Parse `url[@flag...]`.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split('@').map(str::to_string);
        Remote {
            url: parts.next().unwrap_or_default(),
            flags: parts.collect(),
        }
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        for flag in &self.flags {
            write!(f, "@{}", flag)?;
        }
        Ok(())
    }
}

/// How the external builder is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildStrategy {
    /// A single configuration with the given options; used for installers
    /// and header-only packages.
    Minimal { options: OptionMap },
    /// The builder's common build matrix.
    Default {
        shared_option_name: Option<String>,
        pure_c: bool,
        dll_with_static_runtime: bool,
    },
}

/// The canonical build configuration handed to the external builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub username: String,
    pub login_username: String,
    pub channel: String,
    pub version: String,
    /// `name/version`
    pub reference: String,
    /// Upload target; always `remotes[0]` unless remotes were given explicitly
    pub upload: Remote,
    pub remotes: Vec<Remote>,
    pub archs: Option<Vec<String>>,
    pub build_policy: Option<String>,
    pub upload_only_when_stable: bool,
    pub stable_branch_pattern: String,
    pub strategy: BuildStrategy,
}

/// Resolves a [`ResolvedConfig`] from the environment and a recipe.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    env: &'a EnvSnapshot,
    config: &'a Config,
    host_os: HostOs,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a EnvSnapshot, config: &'a Config, host_os: HostOs) -> Self {
        Resolver {
            env,
            config,
            host_os,
        }
    }

    /// Create a resolver reading the context's environment and host.
    pub fn from_context(ctx: &'a GlobalContext, config: &'a Config) -> Self {
        Self::new(ctx.env(), config, ctx.host_os())
    }

    pub fn ci_vars(&self) -> CiVars {
        CiVars::from_env(self.env)
    }

    /// `CONAN_USERNAME` > CI repository owner > organization.
    ///
    /// An empty `CONAN_USERNAME` counts as unset.
    pub fn username(&self, ci: &CiVars) -> String {
        self.env
            .get_non_empty("CONAN_USERNAME")
            .or(Some(ci.username.as_str()).filter(|u| !u.is_empty()))
            .unwrap_or(self.config.organization())
            .to_string()
    }

    /// `CONAN_CHANNEL` > CI branch prefix.
    ///
    /// An empty `CONAN_CHANNEL` is kept as an explicit empty channel.
    pub fn channel(&self, ci: &CiVars) -> String {
        self.env
            .get("CONAN_CHANNEL")
            .unwrap_or(ci.channel.as_str())
            .to_string()
    }

    /// `CONAN_VERSION` > CI branch suffix > recipe version.
    ///
    /// An empty `CONAN_VERSION` counts as unset.
    pub fn version(&self, ci: &CiVars, recipe: &RecipeDescriptor) -> Result<String, ResolveError> {
        self.env
            .get_non_empty("CONAN_VERSION")
            .or(Some(ci.version.as_str()).filter(|v| !v.is_empty()))
            .or(recipe.version())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::MissingVersion {
                name: recipe.name().to_string(),
            })
    }

    /// `CONAN_LOGIN_USERNAME` > username.
    ///
    /// An empty `CONAN_LOGIN_USERNAME` counts as unset.
    pub fn login_username(&self, username: &str) -> String {
        self.env
            .get_non_empty("CONAN_LOGIN_USERNAME")
            .unwrap_or(username)
            .to_string()
    }

    /// URL of a user's upload repository.
    pub fn user_repository(&self, username: &str) -> String {
        let repository = self
            .env
            .get_non_empty("BINTRAY_REPOSITORY")
            .unwrap_or(self.config.repository());
        format!(
            "{}/{}/{}",
            self.config.upload_base_url(),
            username.to_lowercase(),
            repository
        )
    }

    /// `CONAN_UPLOAD` > the user's repository.
    pub fn upload(&self, username: &str) -> Remote {
        match self.env.get_non_empty("CONAN_UPLOAD") {
            Some(upload) => Remote::parse(upload),
            None => Remote::parse(&self.user_repository(username)),
        }
    }

    /// `CONAN_REMOTES` > synthesized list.
    ///
    /// The synthesized list starts with the upload target. Users other than
    /// the organization get the organization's own repository appended as a
    /// read fallback; `CONAN_UPLOAD` never replaces that entry.
    pub fn remotes(&self, username: &str) -> Vec<Remote> {
        if let Some(remotes) = self.env.get_list("CONAN_REMOTES").filter(|r| !r.is_empty()) {
            return remotes.iter().map(|r| Remote::parse(r)).collect();
        }

        let mut remotes = vec![self.upload(username)];
        let organization = self.config.organization();
        if username != organization {
            remotes.push(Remote::parse(&self.user_repository(organization)));
        }
        remotes
    }

    /// `CONAN_UPLOAD_ONLY_WHEN_STABLE`, on by default.
    pub fn upload_only_when_stable(&self) -> bool {
        self.env.get_bool("CONAN_UPLOAD_ONLY_WHEN_STABLE", true)
    }

    /// `CONAN_STABLE_BRANCH_PATTERN` > layout default.
    pub fn stable_branch_pattern(&self, structure: DirectoryStructure) -> String {
        let default = if structure.is_multi_version() {
            MULTI_VERSION_STABLE_BRANCH_PATTERN
        } else {
            DEFAULT_STABLE_BRANCH_PATTERN
        };
        self.env
            .get_non_empty("CONAN_STABLE_BRANCH_PATTERN")
            .unwrap_or(default)
            .to_string()
    }

    /// `CONAN_ARCHS` > `x86_64` on macOS > unset (the builder decides).
    pub fn archs(&self) -> Option<Vec<String>> {
        match self.env.get("CONAN_ARCHS") {
            None if self.host_os == HostOs::Macos => Some(vec![MACOS_DEFAULT_ARCH.to_string()]),
            None => None,
            Some(archs) if archs.is_empty() => None,
            Some(_) => self.env.get_list("CONAN_ARCHS"),
        }
    }

    /// `CONAN_BUILD_POLICY` > caller default.
    pub fn build_policy(&self, default: Option<&str>) -> Option<String> {
        self.env
            .get_non_empty("CONAN_BUILD_POLICY")
            .or(default)
            .map(str::to_string)
    }

    /// Pick the builder strategy for a classified recipe.
    pub fn strategy(
        &self,
        recipe: &RecipeDescriptor,
        classification: &Classification,
    ) -> Result<BuildStrategy, ResolveError> {
        if classification.is_single_configuration() {
            let entries = self.env.get_list("CONAN_OPTIONS").unwrap_or_default();
            let options = parse_option_list(entries.as_slice())?;
            return Ok(BuildStrategy::Minimal { options });
        }

        let shared_option_name = recipe
            .is_shared()
            .then(|| format!("{}:shared", recipe.name()));

        Ok(BuildStrategy::Default {
            shared_option_name,
            pure_c: classification.is_pure_c(),
            dll_with_static_runtime: false,
        })
    }

    /// Resolve the full configuration.
    pub fn resolve(
        &self,
        recipe: &RecipeDescriptor,
        classification: &Classification,
    ) -> Result<ResolvedConfig, ResolveError> {
        let ci = self.ci_vars();
        if let Some(system) = CiSystem::detect(self.env) {
            tracing::debug!("reading repository and branch from {}", system);
        }

        let username = self.username(&ci);
        let channel = self.channel(&ci);
        let version = self.version(&ci, recipe)?;
        let login_username = self.login_username(&username);
        let reference = format!("{}/{}", recipe.name(), version);

        let config = ResolvedConfig {
            upload: self.upload(&username),
            remotes: self.remotes(&username),
            archs: self.archs(),
            build_policy: self.build_policy(None),
            upload_only_when_stable: self.upload_only_when_stable(),
            stable_branch_pattern: self.stable_branch_pattern(recipe.structure()),
            strategy: self.strategy(recipe, classification)?,
            username,
            login_username,
            channel,
            version,
            reference,
        };

        tracing::info!(
            "Building {}@{}/{}",
            config.reference,
            config.username,
            if config.channel.is_empty() { "_" } else { config.channel.as_str() }
        );
        Ok(config)
    }
}
