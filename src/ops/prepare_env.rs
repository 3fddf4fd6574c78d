//! Per-job CI environment preparation.
//!
//! A CI matrix entry (compiler, version, docker image, build type, options)
//! is turned into environment variables for the following build step, using
//! each platform's own mechanism for persisting variables between steps:
//!
//! - GitHub Actions (`gha`): lines appended to the `$GITHUB_ENV` file
//! - Azure Pipelines (`azp`): `##vso[task.setvariable ...]` logging commands
//! - GitLab (`gl`): nothing to persist, the variables are only recorded
//!
//! The platform is also prepared for the compiler: Xcode selection for
//! Apple Clang, CMake for MSVC and disk cleanup on GitHub's Linux runners.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::util::env::EnvSnapshot;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Supported platform tags.
pub const PLATFORMS: [&str; 3] = ["gha", "azp", "gl"];

/// Xcode installation for each Apple Clang version.
const XCODE_VERSIONS: &[(&str, &str)] = &[
    ("9.1", "/Applications/Xcode_9.4.1.app"),
    ("10.0", "/Applications/Xcode_10.3.app"),
    ("11.0", "/Applications/Xcode_11.5.app"),
    ("12.0", "/Applications/Xcode_12.4.app"),
];

/// Frees disk space on GitHub-hosted Linux runners before docker builds.
const GHA_CLEANUP_COMMANDS: &[&str] = &[
    "docker system prune --all --force --volumes",
    r#"sudo rm -rf "/usr/local/share/boost""#,
    r#"sudo rm -rf "$AGENT_TOOLSDIRECTORY/CodeQL""#,
    r#"sudo rm -rf "$AGENT_TOOLSDIRECTORY/Ruby""#,
    r#"sudo rm -rf "$AGENT_TOOLSDIRECTORY/boost""#,
    r#"sudo rm -rf "$AGENT_TOOLSDIRECTORY/go""#,
    r#"sudo rm -rf "$AGENT_TOOLSDIRECTORY/node""#,
];

/// Error preparing a job environment.
#[derive(Debug, Error)]
pub enum PrepareEnvError {
    #[error("unsupported platform `{0}`: only GitHub Actions (gha), Azure Pipelines (azp) and GitLab (gl) are supported")]
    UnsupportedPlatform(String),

    #[error("selecting a configuration is only supported on Azure Pipelines, not {platform}")]
    SelectConfigNotSupported { platform: Platform },

    #[error("no job configuration named `{0}`")]
    UnknownConfig(String),

    #[error("invalid job configuration")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("invalid {compiler} version `{version}`")]
    InvalidCompilerVersion { compiler: String, version: String },

    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

/// A CI platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GithubActions,
    AzurePipelines,
    GitLab,
}

impl Platform {
    /// The short tag used on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::GithubActions => "gha",
            Platform::AzurePipelines => "azp",
            Platform::GitLab => "gl",
        }
    }
}

impl FromStr for Platform {
    type Err = PrepareEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gha" => Ok(Platform::GithubActions),
            "azp" => Ok(Platform::AzurePipelines),
            "gl" => Ok(Platform::GitLab),
            _ => Err(PrepareEnvError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GithubActions => write!(f, "GitHub Actions"),
            Platform::AzurePipelines => write!(f, "Azure Pipelines"),
            Platform::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Command-line syntax of the shell a job runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellSyntax {
    Posix,
    /// `cmd.exe`, used by MSVC jobs
    Cmd,
}

impl ShellSyntax {
    /// Shell syntax of the runner that builds with `compiler`.
    pub fn for_compiler(compiler: &str) -> Self {
        if is_msvc(compiler) {
            ShellSyntax::Cmd
        } else {
            ShellSyntax::Posix
        }
    }
}

/// One CI matrix entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Compiler family: `GCC`, `CLANG`, `APPLE_CLANG`, `VISUAL` or `MSVC`
    pub compiler: String,
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(rename = "dockerImage", default)]
    pub docker_image: String,
    #[serde(rename = "buildType", default)]
    pub build_type: String,
    /// Options by package, in document order
    #[serde(default)]
    pub options: Option<IndexMap<String, IndexMap<String, Value>>>,
    /// Recipe directory relative to the repository root
    pub cwd: String,
    #[serde(deserialize_with = "string_or_number")]
    pub recipe_version: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

fn is_msvc(compiler: &str) -> bool {
    matches!(compiler, "VISUAL" | "MSVC")
}

fn is_gcc_or_clang(compiler: &str) -> bool {
    matches!(compiler, "GCC" | "CLANG")
}

/// Give a bare Apple Clang major version a `.0` minor.
pub fn normalize_apple_clang_version(version: &str) -> String {
    if version.contains('.') {
        version.to_string()
    } else {
        format!("{}.0", version)
    }
}

/// Xcode installation path for an Apple Clang version.
pub fn xcode_path(version: &str) -> Option<&'static str> {
    XCODE_VERSIONS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, path)| *path)
}

/// Docker image for a GCC or Clang job that did not name one.
///
/// GCC 11+ and Clang 12+ use the newer Ubuntu-based images.
pub fn default_docker_image(compiler: &str, version: &str) -> Result<String, PrepareEnvError> {
    let numeric: f64 = version
        .parse()
        .map_err(|_| PrepareEnvError::InvalidCompilerVersion {
            compiler: compiler.to_string(),
            version: version.to_string(),
        })?;

    let modern = (compiler == "GCC" && numeric >= 11.0) || (compiler == "CLANG" && numeric >= 12.0);
    let image = format!(
        "conanio/{}{}",
        compiler.to_lowercase(),
        version.replace('.', "")
    );

    Ok(if modern {
        format!("{}-ubuntu16.04", image)
    } else {
        image
    })
}

/// Shell command persisting one variable on the platform, if it has a
/// mechanism for it.
pub fn emission_command(
    platform: Platform,
    syntax: ShellSyntax,
    name: &str,
    value: &str,
    github_env: Option<&str>,
) -> Option<String> {
    match (platform, syntax) {
        (Platform::GithubActions, ShellSyntax::Cmd) => Some(format!(
            "echo {}={}>> {}",
            name,
            value,
            github_env.unwrap_or("%GITHUB_ENV%")
        )),
        (Platform::GithubActions, ShellSyntax::Posix) => {
            Some(format!(r#"echo "{}={}" >> $GITHUB_ENV"#, name, value))
        }
        (Platform::AzurePipelines, ShellSyntax::Cmd) => Some(format!(
            "echo ##vso[task.setvariable variable={}]{}",
            name, value
        )),
        (Platform::AzurePipelines, ShellSyntax::Posix) => Some(format!(
            "echo \"##vso[task.setvariable variable={}]{}\"",
            name, value
        )),
        (Platform::GitLab, _) => None,
    }
}

/// Render job options as a `package:option=value` list, keeping the
/// document's order.
fn job_options(options: &IndexMap<String, IndexMap<String, Value>>) -> String {
    options
        .iter()
        .flat_map(|(package, package_options)| {
            package_options.iter().map(move |(option, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Bool(true) => "True".to_string(),
                    Value::Bool(false) => "False".to_string(),
                    other => other.to_string(),
                };
                format!("{}:{}={}", package, option, value)
            })
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Where variables go while preparing a job.
struct JobEnvironment<'a> {
    platform: Platform,
    syntax: ShellSyntax,
    env: &'a mut EnvSnapshot,
    runner: &'a mut dyn CommandRunner,
    hook: Option<&'a mut dyn FnMut(&str, &str)>,
}

impl JobEnvironment<'_> {
    fn set(&mut self, name: &str, value: &str) {
        if let Some(hook) = self.hook.as_mut() {
            (**hook)(name, value);
            return;
        }

        tracing::info!("{} = {}", name, value);
        self.env.set(name, value);
        if let Some(command) = emission_command(
            self.platform,
            self.syntax,
            name,
            value,
            self.env.get("GITHUB_ENV"),
        ) {
            self.best_effort(&command);
        }
    }

    fn best_effort(&mut self, command: &str) {
        self.runner
            .run_best_effort(&ProcessBuilder::shell(command).with_env(self.env));
    }

    fn strict(&mut self, command: &str) -> anyhow::Result<()> {
        self.runner
            .run_strict(&ProcessBuilder::shell(command).with_env(self.env))
    }
}

/// Prepare the environment of one CI job.
///
/// `document` is a single job configuration, or with `select_config` (Azure
/// Pipelines only) a map of named configurations. Variables are passed to
/// `set_env_variable` when given; otherwise they are recorded in `env` and
/// persisted through the platform's mechanism.
pub fn prepare_env<'a>(
    platform: &str,
    document: &Value,
    select_config: Option<&str>,
    env: &'a mut EnvSnapshot,
    runner: &'a mut dyn CommandRunner,
    set_env_variable: Option<&'a mut dyn FnMut(&str, &str)>,
) -> Result<(), PrepareEnvError> {
    let platform: Platform = platform.parse()?;

    if platform != Platform::AzurePipelines && select_config.is_some() {
        return Err(PrepareEnvError::SelectConfigNotSupported { platform });
    }

    let document = match select_config {
        Some(key) => document
            .get(key)
            .ok_or_else(|| PrepareEnvError::UnknownConfig(key.to_string()))?,
        None => document,
    };
    let job = JobConfig::deserialize(document).map_err(PrepareEnvError::InvalidConfig)?;

    let compiler = job.compiler.as_str();
    let mut out = JobEnvironment {
        platform,
        syntax: ShellSyntax::for_compiler(compiler),
        env,
        runner,
        hook: set_env_variable,
    };

    out.set("BPT_CWD", &job.cwd);
    out.set("CONAN_VERSION", &job.recipe_version);

    let compiler_version = if compiler == "APPLE_CLANG" {
        normalize_apple_clang_version(&job.version)
    } else {
        job.version.clone()
    };
    out.set(&format!("CONAN_{}_VERSIONS", compiler), &compiler_version);

    if is_gcc_or_clang(compiler) {
        let docker_image = if job.docker_image.is_empty() {
            default_docker_image(compiler, &compiler_version)?
        } else {
            job.docker_image.clone()
        };
        out.set("CONAN_DOCKER_IMAGE", &docker_image);
    }

    if !job.build_type.is_empty() {
        out.set("CONAN_BUILD_TYPES", &job.build_type);
    }

    if let Some(options) = job.options.as_ref().filter(|o| !o.is_empty()) {
        out.set("CONAN_OPTIONS", &job_options(options));
    }

    if matches!(platform, Platform::GithubActions | Platform::AzurePipelines) {
        if compiler == "APPLE_CLANG" {
            if let Some(xcode) = xcode_path(&compiler_version) {
                tracing::info!("executing: xcode-select -switch \"{}\"", xcode);
                out.best_effort(&format!("sudo xcode-select -switch \"{}\"", xcode));
            }
            out.best_effort("clang++ --version");
        }

        if is_msvc(compiler) {
            out.strict("pip install --upgrade cmake")?;
        }
    }

    if platform == Platform::GithubActions && is_gcc_or_clang(compiler) {
        for command in GHA_CLEANUP_COMMANDS {
            out.best_effort(command);
        }
    }

    if platform != Platform::GitLab {
        out.best_effort("conan user");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockExecutor;
    use crate::util::process::CommandStatus;
    use serde_json::json;

    fn collect(
        platform: &str,
        document: &Value,
        select_config: Option<&str>,
        exec: &mut MockExecutor,
    ) -> Result<Vec<(String, String)>, PrepareEnvError> {
        let mut env = EnvSnapshot::new();
        let mut vars = Vec::new();
        let mut hook = |name: &str, value: &str| vars.push((name.to_string(), value.to_string()));
        prepare_env(platform, document, select_config, &mut env, exec, Some(&mut hook))?;
        Ok(vars)
    }

    fn var<'v>(vars: &'v [(String, String)], name: &str) -> Option<&'v str> {
        vars.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn gcc_job() -> Value {
        json!({
            "compiler": "GCC",
            "version": "9",
            "cwd": "recipes/zlib/all",
            "recipe_version": "1.2.11",
            "buildType": "Release",
            "options": {"zlib": {"shared": true, "minizip": "False"}}
        })
    }

    #[test]
    fn test_unknown_platform() {
        let mut exec = MockExecutor::new();
        let err = collect("travis", &gcc_job(), None, &mut exec).unwrap_err();
        assert!(matches!(err, PrepareEnvError::UnsupportedPlatform(p) if p == "travis"));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_select_config_rejected_outside_azure() {
        for platform in ["gha", "gl"] {
            let mut exec = MockExecutor::new();
            let err = collect(platform, &gcc_job(), Some("linux_gcc_9"), &mut exec).unwrap_err();
            assert!(matches!(err, PrepareEnvError::SelectConfigNotSupported { .. }));
            assert!(exec.calls().is_empty());
        }
    }

    #[test]
    fn test_select_config_on_azure() {
        let document = json!({
            "linux_gcc_9": gcc_job(),
            "mac_clang": {
                "compiler": "APPLE_CLANG",
                "version": "11",
                "cwd": ".",
                "recipe_version": "2.0"
            }
        });

        let mut exec = MockExecutor::new();
        let vars = collect("azp", &document, Some("mac_clang"), &mut exec).unwrap();
        assert_eq!(var(&vars, "CONAN_APPLE_CLANG_VERSIONS"), Some("11.0"));
        assert_eq!(var(&vars, "CONAN_VERSION"), Some("2.0"));

        let mut exec = MockExecutor::new();
        let err = collect("azp", &document, Some("windows"), &mut exec).unwrap_err();
        assert!(matches!(err, PrepareEnvError::UnknownConfig(k) if k == "windows"));
    }

    #[test]
    fn test_options_keep_document_order() {
        let document: Value = serde_json::from_str(
            r#"{"compiler": "GCC", "version": "9", "cwd": "all", "recipe_version": "1.0",
                "options": {"zlib": {"shared": true, "minizip": false},
                            "bzip2": {"build_executable": "False", "fPIC": true}}}"#,
        )
        .unwrap();

        let mut exec = MockExecutor::new();
        let vars = collect("gl", &document, None, &mut exec).unwrap();
        assert_eq!(
            var(&vars, "CONAN_OPTIONS"),
            Some("zlib:shared=True,zlib:minizip=False,bzip2:build_executable=False,bzip2:fPIC=True")
        );
    }

    #[test]
    fn test_gcc_job_variables_in_order() {
        let mut exec = MockExecutor::new();
        let vars = collect("gl", &gcc_job(), None, &mut exec).unwrap();

        let names: Vec<_> = vars.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "BPT_CWD",
                "CONAN_VERSION",
                "CONAN_GCC_VERSIONS",
                "CONAN_DOCKER_IMAGE",
                "CONAN_BUILD_TYPES",
                "CONAN_OPTIONS"
            ]
        );
        assert_eq!(var(&vars, "BPT_CWD"), Some("recipes/zlib/all"));
        assert_eq!(var(&vars, "CONAN_GCC_VERSIONS"), Some("9"));
        assert_eq!(var(&vars, "CONAN_DOCKER_IMAGE"), Some("conanio/gcc9"));
        assert_eq!(var(&vars, "CONAN_BUILD_TYPES"), Some("Release"));
        assert_eq!(
            var(&vars, "CONAN_OPTIONS"),
            Some("zlib:shared=True,zlib:minizip=False")
        );
        // GitLab runs no platform commands
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_numeric_versions_are_accepted() {
        let document = json!({
            "compiler": "CLANG",
            "version": 13,
            "cwd": ".",
            "recipe_version": 1.5
        });
        let mut exec = MockExecutor::new();
        let vars = collect("gl", &document, None, &mut exec).unwrap();
        assert_eq!(var(&vars, "CONAN_CLANG_VERSIONS"), Some("13"));
        assert_eq!(var(&vars, "CONAN_VERSION"), Some("1.5"));
        assert_eq!(
            var(&vars, "CONAN_DOCKER_IMAGE"),
            Some("conanio/clang13-ubuntu16.04")
        );
        assert_eq!(var(&vars, "CONAN_BUILD_TYPES"), None);
        assert_eq!(var(&vars, "CONAN_OPTIONS"), None);
    }

    #[test]
    fn test_explicit_docker_image_wins() {
        let mut document = gcc_job();
        document["dockerImage"] = json!("myorg/gcc9-custom");
        let mut exec = MockExecutor::new();
        let vars = collect("gl", &document, None, &mut exec).unwrap();
        assert_eq!(var(&vars, "CONAN_DOCKER_IMAGE"), Some("myorg/gcc9-custom"));
    }

    #[test]
    fn test_default_docker_image() {
        assert_eq!(default_docker_image("GCC", "4.9").unwrap(), "conanio/gcc49");
        assert_eq!(default_docker_image("GCC", "10").unwrap(), "conanio/gcc10");
        assert_eq!(
            default_docker_image("GCC", "11").unwrap(),
            "conanio/gcc11-ubuntu16.04"
        );
        assert_eq!(default_docker_image("CLANG", "11").unwrap(), "conanio/clang11");
        assert_eq!(
            default_docker_image("CLANG", "12").unwrap(),
            "conanio/clang12-ubuntu16.04"
        );
        assert!(matches!(
            default_docker_image("GCC", "9.x"),
            Err(PrepareEnvError::InvalidCompilerVersion { .. })
        ));
    }

    #[test]
    fn test_apple_clang_version_normalization() {
        assert_eq!(normalize_apple_clang_version("12"), "12.0");
        assert_eq!(normalize_apple_clang_version("9.1"), "9.1");
    }

    #[test]
    fn test_xcode_path() {
        assert_eq!(xcode_path("9.1"), Some("/Applications/Xcode_9.4.1.app"));
        assert_eq!(xcode_path("12.0"), Some("/Applications/Xcode_12.4.app"));
        assert_eq!(xcode_path("13.0"), None);
    }

    #[test]
    fn test_apple_clang_switches_xcode() {
        let document = json!({
            "compiler": "APPLE_CLANG",
            "version": "10",
            "cwd": ".",
            "recipe_version": "1.0"
        });
        let mut exec = MockExecutor::new();
        let vars = collect("gha", &document, None, &mut exec).unwrap();

        assert_eq!(var(&vars, "CONAN_APPLE_CLANG_VERSIONS"), Some("10.0"));
        assert_eq!(var(&vars, "CONAN_DOCKER_IMAGE"), None);

        let xcode = exec.position("xcode-select -switch \"/Applications/Xcode_10.3.app\"");
        let clang = exec.position("clang++ --version");
        let user = exec.position("conan user");
        assert!(xcode.is_some());
        assert!(xcode < clang);
        assert!(clang < user);
        assert!(!exec.ran("docker system prune"));
    }

    #[test]
    fn test_gha_gcc_runs_cleanup() {
        let mut exec = MockExecutor::new();
        collect("gha", &gcc_job(), None, &mut exec).unwrap();

        assert!(exec.ran("docker system prune --all --force --volumes"));
        assert!(exec.ran("$AGENT_TOOLSDIRECTORY/node"));
        assert!(exec.position("docker system prune") < exec.position("conan user"));
    }

    #[test]
    fn test_cleanup_failures_are_ignored() {
        let mut exec = MockExecutor::new();
        exec.expect_contains("sudo rm", CommandStatus::exited(1));
        exec.expect_contains("conan user", CommandStatus::exited(1));

        assert!(collect("gha", &gcc_job(), None, &mut exec).is_ok());
    }

    #[test]
    fn test_msvc_installs_cmake_strictly() {
        let document = json!({
            "compiler": "VISUAL",
            "version": "16",
            "cwd": ".",
            "recipe_version": "1.0"
        });

        let mut exec = MockExecutor::new();
        collect("azp", &document, None, &mut exec).unwrap();
        assert!(exec.ran("pip install --upgrade cmake"));

        let mut exec = MockExecutor::new();
        exec.expect_contains("pip install", CommandStatus::exited(1));
        let err = collect("azp", &document, None, &mut exec).unwrap_err();
        assert!(matches!(err, PrepareEnvError::Command(_)));
        assert!(!exec.ran("conan user"));
    }

    #[test]
    fn test_default_sink_records_and_persists() {
        let mut env = EnvSnapshot::from_pairs([("GITHUB_ENV", "/tmp/github_env")]);
        let mut exec = MockExecutor::new();

        prepare_env("gha", &gcc_job(), None, &mut env, &mut exec, None).unwrap();

        assert_eq!(env.get("BPT_CWD"), Some("recipes/zlib/all"));
        assert_eq!(env.get("CONAN_DOCKER_IMAGE"), Some("conanio/gcc9"));
        assert!(exec.ran(r#"echo "BPT_CWD=recipes/zlib/all" >> $GITHUB_ENV"#));
        assert!(exec.ran(r#"echo "CONAN_GCC_VERSIONS=9" >> $GITHUB_ENV"#));

        // Child processes see the snapshot, including GITHUB_ENV
        let first = &exec.recorded()[0];
        assert_eq!(first.process.get_env("GITHUB_ENV"), Some("/tmp/github_env"));
    }

    #[test]
    fn test_default_sink_gitlab_only_records() {
        let mut env = EnvSnapshot::new();
        let mut exec = MockExecutor::new();

        prepare_env("gl", &gcc_job(), None, &mut env, &mut exec, None).unwrap();

        assert_eq!(env.get("CONAN_VERSION"), Some("1.2.11"));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_emission_commands() {
        assert_eq!(
            emission_command(Platform::GithubActions, ShellSyntax::Posix, "A", "1", None).as_deref(),
            Some(r#"echo "A=1" >> $GITHUB_ENV"#)
        );
        assert_eq!(
            emission_command(
                Platform::GithubActions,
                ShellSyntax::Cmd,
                "A",
                "1",
                Some(r"D:\a\_temp\env")
            )
            .as_deref(),
            Some(r"echo A=1>> D:\a\_temp\env")
        );
        assert_eq!(
            emission_command(Platform::AzurePipelines, ShellSyntax::Posix, "A", "1", None)
                .as_deref(),
            Some("echo \"##vso[task.setvariable variable=A]1\"")
        );
        assert_eq!(
            emission_command(Platform::AzurePipelines, ShellSyntax::Cmd, "A", "1", None).as_deref(),
            Some("echo ##vso[task.setvariable variable=A]1")
        );
        assert_eq!(
            emission_command(Platform::GitLab, ShellSyntax::Posix, "A", "1", None),
            None
        );
    }

    #[test]
    fn test_shell_syntax_for_compiler() {
        assert_eq!(ShellSyntax::for_compiler("VISUAL"), ShellSyntax::Cmd);
        assert_eq!(ShellSyntax::for_compiler("MSVC"), ShellSyntax::Cmd);
        assert_eq!(ShellSyntax::for_compiler("GCC"), ShellSyntax::Posix);
    }

    #[test]
    fn test_platform_tags() {
        for tag in PLATFORMS {
            let platform: Platform = tag.parse().unwrap();
            assert_eq!(platform.tag(), tag);
        }
    }
}
