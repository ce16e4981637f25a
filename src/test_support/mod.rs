//! Test utilities and mocks for unit tests.
//!
//! Provides a [`CommandRunner`] double that records every command and
//! answers from canned expectations, and a [`ToolchainResolver`] double
//! with a fixed answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use gwen_build::test_support::{MockRunner, project_fixture};
//!
//! #[test]
//! fn test_example() {
//!     let runner = MockRunner::new().with_artifacts();
//!     runner.expect_contains("wrengen", CommandResult::failure("parse error"));
//!
//!     // Run stages against `runner`, then inspect `runner.calls()`...
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::builder::toolchain::{ToolchainLocation, ToolchainResolver};
use crate::util::process::{CommandResult, CommandRunner, ProcessBuilder};

pub use fixtures::*;

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Result to return when matched.
    pub result: CommandResult,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, result: CommandResult) -> Self {
        CommandExpectation {
            pattern,
            result,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// Recording command runner.
///
/// Unmatched commands succeed with empty output. With
/// [`with_artifacts`](MockRunner::with_artifacts), a successful command
/// carrying `-o <path>` leaves a small file at `<path>`, the way `go build`
/// would.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Mutex<Vec<CommandExpectation>>,
    calls: Mutex<Vec<ProcessBuilder>>,
    create_outputs: bool,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Fabricate `-o` outputs of successful commands.
    pub fn with_artifacts(mut self) -> Self {
        self.create_outputs = true;
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, result: CommandResult) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            result,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, result: CommandResult) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            result,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, result: CommandResult) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            result,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.expectations.lock().unwrap().push(expectation);
        self
    }

    /// Display strings of all commands that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    /// Number of recorded commands containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }

    fn fabricate_output(cmd: &ProcessBuilder) {
        let args = cmd.get_args();
        let Some(pos) = args.iter().position(|a| a == "-o") else {
            return;
        };
        let Some(out) = args.get(pos + 1) else {
            return;
        };

        let mut path = PathBuf::from(out);
        if path.is_relative() {
            if let Some(cwd) = cmd.get_cwd() {
                path = cwd.join(path);
            }
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"\x7fELF fabricated").unwrap();
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> CommandResult {
        self.calls.lock().unwrap().push(cmd.clone());
        let display = cmd.display_command();

        let matched = {
            let mut expectations = self.expectations.lock().unwrap();
            expectations
                .iter_mut()
                .find(|exp| exp.pattern.matches(&display) && exp.available())
                .map(|exp| {
                    exp.used += 1;
                    exp.result.clone()
                })
        };

        let result = matched.unwrap_or_else(|| CommandResult::success(""));
        if result.succeeded && self.create_outputs {
            Self::fabricate_output(cmd);
        }
        result
    }
}

/// Toolchain resolver with a fixed answer. Counts how often it was asked.
#[derive(Debug, Default)]
pub struct FixedToolchain {
    location: ToolchainLocation,
    calls: AtomicUsize,
}

impl FixedToolchain {
    pub fn found(dir: impl AsRef<Path>) -> Self {
        FixedToolchain {
            location: ToolchainLocation::found(dir.as_ref()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn missing() -> Self {
        FixedToolchain::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ToolchainResolver for FixedToolchain {
    fn locate(&self, _tool: &str) -> ToolchainLocation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pattern_matching() {
        assert!(CommandPattern::Exact("go version".into()).matches("go version"));
        assert!(!CommandPattern::Exact("go version".into()).matches("go version -m"));
        assert!(CommandPattern::StartsWith("go build".into()).matches("go build -o bin/gwen"));
        assert!(CommandPattern::Contains("wrengen".into()).matches("go run ./cmd/wrengen"));
        assert!(CommandPattern::Any.matches("anything"));
    }

    #[test]
    fn test_mock_runner_records_and_matches() {
        let runner = MockRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("go test".into()),
                CommandResult::failure("FAIL"),
            )
            .times(1),
        );

        let first = runner.run(&ProcessBuilder::new("go").args(["test", "./..."]));
        let second = runner.run(&ProcessBuilder::new("go").args(["test", "./..."]));

        assert!(!first.succeeded);
        assert!(second.succeeded);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_mock_runner_fabricates_outputs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let runner = MockRunner::new().with_artifacts();

        runner.run(
            &ProcessBuilder::new("go")
                .args(["build", "-o", "bin/gwen", "./cmd/gwen"])
                .cwd(tmp.path()),
        );

        assert!(tmp.path().join("bin/gwen").is_file());
    }
}
