//! Subprocess execution utilities.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::util::env::EnvSnapshot;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    env_remove: Vec<String>,
    env_clear: bool,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            env_remove: Vec::new(),
            env_clear: false,
            cwd: None,
        }
    }

    /// Run a command line through the platform shell.
    ///
    /// Uses `cmd /C` on Windows and `sh -c` elsewhere.
    pub fn shell(command_line: impl Into<String>) -> Self {
        if cfg!(windows) {
            ProcessBuilder::new("cmd").arg("/C").arg(command_line.into())
        } else {
            ProcessBuilder::new("sh").arg("-c").arg(command_line.into())
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Remove an environment variable, including one copied from a snapshot.
    pub fn env_remove(mut self, key: impl AsRef<str>) -> Self {
        let key = key.as_ref();
        self.env.remove(key);
        self.env_remove.push(key.to_string());
        self
    }

    /// Replace the inherited environment with the contents of a snapshot.
    pub fn with_env(mut self, snapshot: &EnvSnapshot) -> Self {
        self.env_clear = true;
        for (key, value) in snapshot.iter() {
            self.env.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment variable explicitly set on this builder.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if self.env_clear {
            cmd.env_clear();
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        for key in &self.env_remove {
            cmd.env_remove(key);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio and return the exit status.
    pub fn status(&self) -> Result<CommandStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    /// A successful exit.
    pub fn ok() -> Self {
        CommandStatus { code: Some(0) }
    }

    /// An exit with the given code.
    pub fn exited(code: i32) -> Self {
        CommandStatus { code: Some(code) }
    }

    /// Whether the command exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes external commands.
///
/// Two failure policies exist: best-effort commands (cleanup, pruning)
/// ignore failure, strict commands (tool installation, environment setup)
/// abort the run.
pub trait CommandRunner {
    /// Run a command to completion.
    fn status(&mut self, process: &ProcessBuilder) -> Result<CommandStatus>;

    /// Run a command, logging and ignoring any failure.
    fn run_best_effort(&mut self, process: &ProcessBuilder) {
        match self.status(process) {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::debug!(
                "`{}` exited with {:?} (ignored)",
                process.display_command(),
                status.code
            ),
            Err(e) => tracing::warn!("{:#} (ignored)", e),
        }
    }

    /// Run a command and require success.
    fn run_strict(&mut self, process: &ProcessBuilder) -> Result<()> {
        let status = self.status(process)?;
        if !status.success() {
            bail!(
                "`{}` failed with exit code {:?}",
                process.display_command(),
                status.code
            );
        }
        Ok(())
    }
}

/// Runs commands on the host system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&mut self, process: &ProcessBuilder) -> Result<CommandStatus> {
        tracing::debug!("running `{}`", process.display_command());
        process.status()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find a Python interpreter.
///
/// An explicit `RECIPE_CI_PYTHON` wins; otherwise `python` then `python3`
/// are searched in PATH.
pub fn find_python(env: &EnvSnapshot) -> Option<PathBuf> {
    if let Some(python) = env.get_non_empty("RECIPE_CI_PYTHON") {
        return find_executable(python).or_else(|| Some(PathBuf::from(python)));
    }

    ["python", "python3"]
        .iter()
        .find_map(|name| find_executable(name))
}
