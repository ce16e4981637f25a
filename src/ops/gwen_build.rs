//! Implementation of the build commands.
//!
//! Every command maps to a fixed, hand-ordered list of stages. The list is
//! run top to bottom; the first failing stage stops the run.

use std::fmt;

use anyhow::{Context, Result};

use crate::builder::{
    BinaryBuildStage, BuildContext, BuildError, BuildTarget, CodeGenStage, NativeLibraryStage,
    Stage, StageOutcome,
};
use crate::core::layout::PRIMARY_TARGET;
use crate::ops::gwen_clean::CleanStage;
use crate::ops::gwen_test::TestStage;
use crate::util::config::Config;
use crate::util::fs::{format_size, list_files};
use crate::util::interrupt;
use crate::util::process::CommandRunner;
use crate::util::shell::Status;

/// Title shown in the run banner.
pub const BANNER_TITLE: &str = "Wren.go Build System";

/// What to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildCommand {
    /// Native library, code generation, both binaries
    #[default]
    All,
    /// Native library and code generation
    Wren,
    /// Code generation and the CLI binary
    Cli,
    /// Code generation and the language server binary
    Lsp,
    /// Code generation only
    Generate,
    /// Run the Go test suite
    Test,
    /// Remove build outputs
    Clean,
}

impl BuildCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildCommand::All => "all",
            BuildCommand::Wren => "wren",
            BuildCommand::Cli => "cli",
            BuildCommand::Lsp => "lsp",
            BuildCommand::Generate => "generate",
            BuildCommand::Test => "test",
            BuildCommand::Clean => "clean",
        }
    }

    /// Whether a successful run ends with the artifact summary.
    pub fn reports_artifacts(&self) -> bool {
        matches!(
            self,
            BuildCommand::All | BuildCommand::Wren | BuildCommand::Cli | BuildCommand::Lsp
        )
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for the build commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Request static linking
    pub static_link: bool,

    /// Primary target source path
    pub target: String,

    /// Primary output name (default: last component of `target`)
    pub output: Option<String>,

    /// Copy runtime libraries next to the primary binary (Windows)
    pub copy_runtime_libraries: bool,

    /// Package to scope `test` to
    pub package: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            static_link: true,
            target: PRIMARY_TARGET.to_string(),
            output: None,
            copy_runtime_libraries: true,
            package: None,
        }
    }
}

impl BuildOptions {
    /// Defaults overridden by the `[build]` configuration table.
    pub fn from_config(config: &Config) -> Self {
        let defaults = BuildOptions::default();
        BuildOptions {
            static_link: config.static_link(),
            target: config.build.target.clone().unwrap_or(defaults.target),
            output: config.build.output.clone(),
            copy_runtime_libraries: config.copy_runtime_libs(),
            package: None,
        }
    }

    fn primary_target(&self) -> BuildTarget {
        BuildTarget::new(self.target.clone(), self.output.clone())
            .with_static_link(self.static_link)
            .with_runtime_libraries(self.copy_runtime_libraries)
    }

    fn lsp_target(&self) -> BuildTarget {
        BuildTarget::lsp().with_static_link(self.static_link)
    }
}

/// The ordered stage list for `command`.
pub fn plan(command: BuildCommand, opts: &BuildOptions) -> Vec<Box<dyn Stage>> {
    match command {
        BuildCommand::Clean => vec![Box::new(CleanStage)],
        BuildCommand::Test => vec![Box::new(TestStage::new(opts.package.clone()))],
        BuildCommand::Generate => vec![Box::new(CodeGenStage::new())],
        BuildCommand::Wren => vec![Box::new(NativeLibraryStage), Box::new(CodeGenStage::new())],
        BuildCommand::Cli => vec![
            Box::new(CodeGenStage::new()),
            Box::new(BinaryBuildStage::new(opts.primary_target())),
        ],
        BuildCommand::Lsp => vec![
            Box::new(CodeGenStage::new()),
            Box::new(BinaryBuildStage::new(opts.lsp_target())),
        ],
        BuildCommand::All => vec![
            Box::new(NativeLibraryStage),
            Box::new(CodeGenStage::new()),
            Box::new(BinaryBuildStage::new(opts.primary_target())),
            Box::new(BinaryBuildStage::new(opts.lsp_target())),
        ],
    }
}

/// Run `stages` in order, stopping at the first failure or interrupt.
pub fn run_stages(
    stages: &[Box<dyn Stage>],
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
) -> StageOutcome {
    run_stages_with(stages, ctx, runner, &interrupt::is_interrupted)
}

/// An interrupt may land during a stage's own work, after its last child
/// exited, so the flag is checked once more after the final stage.
fn run_stages_with(
    stages: &[Box<dyn Stage>],
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
    interrupted: &dyn Fn() -> bool,
) -> StageOutcome {
    for stage in stages {
        if interrupted() {
            return Err(BuildError::Interrupted);
        }
        tracing::debug!("running stage `{}`", stage.name());
        stage.run(ctx, runner)?;
    }
    if interrupted() {
        return Err(BuildError::Interrupted);
    }
    Ok(())
}

/// A file left in `bin/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub size: u64,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  - {} ({})", self.name, format_size(self.size))
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Files in `bin/`, only collected for commands that build
    pub artifacts: Vec<Artifact>,
}

/// Run `command` against the project described by `ctx`.
///
/// Stage failures come back as [`BuildError`] inside the `anyhow::Error`.
pub fn build(
    command: BuildCommand,
    opts: &BuildOptions,
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
) -> Result<BuildReport> {
    build_with(command, opts, ctx, runner, &interrupt::is_interrupted)
}

fn build_with(
    command: BuildCommand,
    opts: &BuildOptions,
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
    interrupted: &dyn Fn() -> bool,
) -> Result<BuildReport> {
    ctx.shell.banner(BANNER_TITLE);
    ctx.shell.print(format!("Platform: {}", ctx.platform));
    tracing::debug!("project root: {}", ctx.root().display());

    let stages = plan(command, opts);
    let span = ctx.shell.span(Status::Building, format!("`{}`", command));
    run_stages_with(&stages, ctx, runner, interrupted)?;

    if !command.reports_artifacts() {
        span.finish(command);
        return Ok(BuildReport::default());
    }
    span.finish("Build complete!");

    let bin_dir = ctx.layout.bin_dir();
    let artifacts: Vec<Artifact> = list_files(&bin_dir)
        .with_context(|| format!("failed to list {}", bin_dir.display()))?
        .into_iter()
        .map(|(name, size)| Artifact { name, size })
        .collect();

    if interrupted() {
        return Err(BuildError::Interrupted.into());
    }

    ctx.shell.print("Binaries are in the bin/ directory:");
    for artifact in &artifacts {
        ctx.shell.print(artifact);
    }

    Ok(BuildReport { artifacts })
}
