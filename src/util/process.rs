//! Subprocess execution utilities.
//!
//! Every stage goes through a [`CommandRunner`], so the pipeline can be
//! exercised against a recording double without spawning real tools.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::util::interrupt;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
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

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment override, if one was set.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory override.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Outcome of a single external invocation.
///
/// `output` holds stdout when the command succeeded and stderr when it
/// failed. A result is never partially filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub succeeded: bool,
    pub output: String,
    /// The child was stopped by an operator interrupt.
    pub interrupted: bool,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        CommandResult {
            succeeded: true,
            output: output.into(),
            interrupted: false,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        CommandResult {
            succeeded: false,
            output: output.into(),
            interrupted: false,
        }
    }

    pub fn interrupted(output: impl Into<String>) -> Self {
        CommandResult {
            succeeded: false,
            output: output.into(),
            interrupted: true,
        }
    }
}

/// Executes external commands on behalf of the build stages.
pub trait CommandRunner {
    /// Run `cmd` to completion. Never retries.
    fn run(&self, cmd: &ProcessBuilder) -> CommandResult;
}

/// Runs commands as real child processes.
///
/// When constructed with a toolchain directory, that directory is put in
/// front of the inherited `PATH` for every command that does not set `PATH`
/// itself.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    path_prefix: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner { path_prefix: None }
    }

    /// Prepend `dir` to the search path of every command.
    pub fn with_path_prefix(dir: impl Into<PathBuf>) -> Self {
        SystemRunner {
            path_prefix: Some(dir.into()),
        }
    }

    pub fn path_prefix(&self) -> Option<&Path> {
        self.path_prefix.as_deref()
    }

    fn prepare(&self, cmd: &ProcessBuilder) -> ProcessBuilder {
        match &self.path_prefix {
            Some(dir) if cmd.get_env("PATH").is_none() => {
                let path = prepend_path(dir, std::env::var_os("PATH"));
                cmd.clone().env("PATH", path.to_string_lossy())
            }
            _ => cmd.clone(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> CommandResult {
        let cmd = self.prepare(cmd);
        tracing::debug!("running `{}`", cmd.display_command());

        let output = match cmd.exec() {
            Ok(output) => output,
            Err(e) => return CommandResult::failure(format!("{:#}", e)),
        };

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if killed_by_interrupt(&output.status) || interrupt::is_interrupted() {
            return CommandResult::interrupted(stderr);
        }

        if output.status.success() {
            CommandResult::success(String::from_utf8_lossy(&output.stdout))
        } else {
            tracing::debug!(
                "`{}` exited with {:?}",
                cmd.display_command(),
                output.status.code()
            );
            CommandResult::failure(stderr)
        }
    }
}

/// Build a search path with `dir` first, followed by `inherited`.
pub fn prepend_path(dir: &Path, inherited: Option<OsString>) -> OsString {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(ref inherited) = inherited {
        entries.extend(std::env::split_paths(inherited));
    }

    std::env::join_paths(&entries).unwrap_or_else(|_| {
        // A directory containing the separator cannot be joined; keep it verbatim.
        let mut joined = dir.as_os_str().to_os_string();
        if let Some(inherited) = inherited {
            joined.push(if cfg!(windows) { ";" } else { ":" });
            joined.push(inherited);
        }
        joined
    })
}

#[cfg(unix)]
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(windows)]
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    // STATUS_CONTROL_C_EXIT
    status.code() == Some(0xC000_013A_u32 as i32)
}

#[cfg(not(any(unix, windows)))]
fn killed_by_interrupt(_status: &ExitStatus) -> bool {
    false
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("go").args(["build", "-o", "bin/gwen", "./cmd/gwen"]);

        assert_eq!(pb.display_command(), "go build -o bin/gwen ./cmd/gwen");
    }

    #[test]
    fn test_env_override_lookup() {
        let pb = ProcessBuilder::new("go").env("CGO_ENABLED", "1");
        assert_eq!(pb.get_env("CGO_ENABLED"), Some("1"));
        assert_eq!(pb.get_env("PATH"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_success_captures_stdout() {
        let result = SystemRunner::new().run(&ProcessBuilder::new("echo").arg("hello"));

        assert!(result.succeeded);
        assert!(!result.interrupted);
        assert_eq!(result.output.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failure_captures_stderr() {
        let cmd = ProcessBuilder::new("sh").args(["-c", "echo out; echo boom >&2; exit 3"]);
        let result = SystemRunner::new().run(&cmd);

        assert!(!result.succeeded);
        assert_eq!(result.output.trim(), "boom");
    }

    #[test]
    fn test_run_missing_program_fails() {
        let result = SystemRunner::new().run(&ProcessBuilder::new("gwen-build-no-such-tool"));

        assert!(!result.succeeded);
        assert!(result.output.contains("failed to spawn"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_respects_cwd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = SystemRunner::new().run(&ProcessBuilder::new("pwd").cwd(tmp.path()));

        assert!(result.succeeded);
        let reported = PathBuf::from(result.output.trim()).canonicalize().unwrap();
        assert_eq!(reported, tmp.path().canonicalize().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_path_prefix_applied_when_not_overridden() {
        let runner = SystemRunner::with_path_prefix("/opt/mingw/bin");
        let result = runner.run(&ProcessBuilder::new("sh").args(["-c", "echo $PATH"]));

        assert!(result.succeeded);
        assert!(result.output.trim().starts_with("/opt/mingw/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_path_wins_over_prefix() {
        let runner = SystemRunner::with_path_prefix("/opt/mingw/bin");
        let cmd = ProcessBuilder::new("/bin/sh")
            .args(["-c", "echo $PATH"])
            .env("PATH", "/custom/bin");
        let result = runner.run(&cmd);

        assert!(result.succeeded);
        assert_eq!(result.output.trim(), "/custom/bin");
    }

    #[test]
    fn test_prepend_path_puts_dir_first() {
        let inherited = std::env::join_paths(["/usr/bin", "/bin"]).unwrap();
        let joined = prepend_path(Path::new("/toolchain/bin"), Some(inherited));

        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(entries[0], PathBuf::from("/toolchain/bin"));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_prepend_path_without_inherited() {
        let joined = prepend_path(Path::new("/toolchain/bin"), None);
        assert_eq!(joined, OsString::from("/toolchain/bin"));
    }
}
