//! Build stages.
//!
//! Each stage is one ordered unit of the pipeline with a single outcome.
//! Stages never run concurrently and never retry; the first failure stops
//! the pipeline.

pub mod binary;
pub mod codegen;
pub mod context;
pub mod errors;
pub mod native;
pub mod runtime_libs;
pub mod toolchain;

pub use binary::{BinaryBuildStage, BuildTarget};
pub use codegen::{CodeGenStage, HelperTool};
pub use context::BuildContext;
pub use errors::{BuildError, StageOutcome};
pub use native::NativeLibraryStage;
pub use runtime_libs::copy_runtime_libraries;
pub use toolchain::{KnownDirs, SearchPath, ToolchainLocation, ToolchainResolver};

use crate::util::process::{CommandRunner, ProcessBuilder};

/// One step of the build pipeline.
pub trait Stage {
    /// Short name used in status output.
    fn name(&self) -> &str;

    /// Run the stage to completion.
    fn run(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome;
}

/// Run `cmd`, mapping failure to [`BuildError::CommandFailed`] for `step`.
///
/// Returns the captured stdout on success.
pub fn run_step(
    runner: &dyn CommandRunner,
    cmd: &ProcessBuilder,
    step: &str,
) -> StageOutcome<String> {
    let result = runner.run(cmd);
    if result.interrupted {
        return Err(BuildError::Interrupted);
    }
    if result.succeeded {
        Ok(result.output)
    } else {
        Err(BuildError::command_failed(step, result.output))
    }
}
