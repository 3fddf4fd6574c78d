//! Test utilities and mocks for recipe-ci unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use recipe_ci::test_support::MockExecutor;
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::new();
//!     exec.expect_contains("pip install", CommandStatus::exited(1));
//!
//!     // Hand `&mut exec` to code taking a `CommandRunner`...
//! }
//! ```

pub mod fixtures;

use anyhow::{bail, Result};

use crate::builder::PackageBuilder;
use crate::ops::resolve::ResolvedConfig;
use crate::util::env::EnvSnapshot;
use crate::util::process::{CommandRunner, CommandStatus, ProcessBuilder};

pub use fixtures::*;

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Substring the command line must contain.
    pub contains: String,
    /// Status to return when matched.
    pub status: CommandStatus,
}

/// A command seen by the MockExecutor.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    /// The full command line.
    pub command: String,
    /// The process as it was built.
    pub process: ProcessBuilder,
}

/// Mock process executor for testing command execution.
///
/// Records every command. Commands that match no expectation succeed.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<RecordedCommand>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Return `status` for commands containing a substring.
    pub fn expect_contains(&mut self, substring: &str, status: CommandStatus) -> &mut Self {
        self.expectations.push(CommandExpectation {
            contains: substring.to_string(),
            status,
        });
        self
    }

    /// Get the command lines that were run, in order.
    pub fn calls(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.command.as_str()).collect()
    }

    /// Get the recorded processes, in order.
    pub fn recorded(&self) -> &[RecordedCommand] {
        &self.calls
    }

    /// Whether any command line contains the substring.
    pub fn ran(&self, substring: &str) -> bool {
        self.calls.iter().any(|c| c.command.contains(substring))
    }

    /// Position of the first command containing the substring.
    pub fn position(&self, substring: &str) -> Option<usize> {
        self.calls.iter().position(|c| c.command.contains(substring))
    }
}

impl CommandRunner for MockExecutor {
    fn status(&mut self, process: &ProcessBuilder) -> Result<CommandStatus> {
        let command = process.display_command();
        self.calls.push(RecordedCommand {
            command: command.clone(),
            process: process.clone(),
        });

        Ok(self
            .expectations
            .iter()
            .find(|exp| command.contains(&exp.contains))
            .map(|exp| exp.status)
            .unwrap_or_else(CommandStatus::ok))
    }
}

/// Package builder that records what it was asked to build.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    /// Configurations passed to `run`, in order.
    pub runs: Vec<ResolvedConfig>,
    /// Environment passed alongside each run.
    pub envs: Vec<EnvSnapshot>,
    /// Fail every run with this message.
    pub fail_with: Option<String>,
}

impl PackageBuilder for RecordingBuilder {
    fn run(&mut self, config: &ResolvedConfig, env: &EnvSnapshot) -> Result<()> {
        self.runs.push(config.clone());
        self.envs.push(env.clone());
        if let Some(ref message) = self.fail_with {
            bail!("{}", message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_records_and_matches() {
        let mut exec = MockExecutor::new();
        exec.expect_contains("pip install", CommandStatus::exited(1));

        let ok = exec.status(&ProcessBuilder::new("conan").arg("user")).unwrap();
        let failed = exec
            .status(&ProcessBuilder::new("pip").args(["install", "cmake"]))
            .unwrap();

        assert!(ok.success());
        assert!(!failed.success());
        assert_eq!(exec.calls(), vec!["conan user", "pip install cmake"]);
        assert_eq!(exec.position("pip"), Some(1));
        assert!(exec.ran("conan"));
    }

    #[test]
    fn test_mock_executor_strict_failure() {
        let mut exec = MockExecutor::new();
        exec.expect_contains("false", CommandStatus::exited(1));

        assert!(exec.run_strict(&ProcessBuilder::new("false")).is_err());
        // Best effort swallows the same failure
        exec.run_best_effort(&ProcessBuilder::new("false"));
        assert_eq!(exec.calls().len(), 2);
    }
}
