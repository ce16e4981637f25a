//! Centralized shell output.
//!
//! All user-facing status lines go through [`Shell`], formatted as a
//! right-aligned 12-column status word followed by the message, on stderr.
//! Diagnostics that only matter when debugging go through `tracing`.

use std::fmt::Display;
use std::time::{Duration, Instant};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus captured tool output
    Verbose,
}

/// Status types for output messages.
///
/// Shell handles all formatting - callers just specify the semantic status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses
    Built,
    Generated,
    Copied,
    Removed,
    Finished,

    // In-progress statuses
    Building,
    Generating,
    Copying,
    Testing,
    Cleaning,

    Warning,
}

impl Status {
    /// Get the display text for this status.
    fn as_str(&self) -> &'static str {
        match self {
            Status::Built => "Built",
            Status::Generated => "Generated",
            Status::Copied => "Copied",
            Status::Removed => "Removed",
            Status::Finished => "Finished",
            Status::Building => "Building",
            Status::Generating => "Generating",
            Status::Copying => "Copying",
            Status::Testing => "Testing",
            Status::Cleaning => "Cleaning",
            Status::Warning => "Warning",
        }
    }

    /// Get the width for alignment (12 characters).
    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    verbosity: Verbosity,
}

impl Shell {
    /// Create a new shell with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Shell { verbosity }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    ///
    /// Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print a plain line to stdout (reports such as the artifact summary).
    pub fn print(&self, msg: impl Display) {
        if !self.is_quiet() {
            println!("{}", msg);
        }
    }

    /// Print captured tool output, indented, in verbose mode only.
    pub fn tool_output(&self, output: &str) {
        if !self.is_verbose() {
            return;
        }
        for line in output.lines() {
            eprintln!("{:>width$} {}", "", line, width = 12);
        }
    }

    /// Print the run banner.
    pub fn banner(&self, title: &str) {
        if self.is_quiet() {
            return;
        }
        let rule = "=".repeat(50);
        eprintln!("{}", rule);
        eprintln!("   {}", title);
        eprintln!("{}", rule);
    }

    /// Format a status prefix.
    fn format_status(&self, status: Status) -> String {
        format!("{:>width$}", status.as_str(), width = status.width())
    }

    /// Start a timed span; `finish` reports the elapsed time.
    pub fn span(&self, status: Status, msg: impl Display) -> Span<'_> {
        self.status(status, &msg);
        Span {
            shell: self,
            start: Instant::now(),
        }
    }
}

/// A scoped timing span.
pub struct Span<'a> {
    shell: &'a Shell,
    start: Instant,
}

impl Span<'_> {
    /// Report completion with the elapsed time.
    pub fn finish(self, msg: impl Display) {
        let elapsed = self.start.elapsed();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", msg, format_duration(elapsed)),
        );
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
