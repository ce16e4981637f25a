//! Native Wren library build.
//!
//! The C library has its own build scripts; this stage only picks the right
//! one for the host and runs it. The script leaves `build/libwren.a` behind
//! for the Go linker. Its absence surfaces later as a link failure.

use crate::builder::context::BuildContext;
use crate::builder::errors::{BuildError, StageOutcome};
use crate::builder::{run_step, Stage};
use crate::util::fs::make_executable;
use crate::util::process::CommandRunner;
use crate::util::shell::Status;

/// Runs `build_wren.bat` / `build_wren.sh`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLibraryStage;

impl Stage for NativeLibraryStage {
    fn name(&self) -> &str {
        "wren library"
    }

    fn run(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome {
        ctx.shell.status(Status::Building, "Wren C library");

        let script = ctx.layout.native_script(ctx.platform.family);
        if !script.is_file() {
            return Err(BuildError::MissingArtifact {
                what: "build script",
                path: script,
            });
        }

        if !ctx.platform.family.is_windows() {
            make_executable(&script).map_err(BuildError::io(format!(
                "failed to prepare {}",
                script.display()
            )))?;
        }

        ctx.require_compiler()?;

        let output = run_step(runner, &ctx.command(&script), "build Wren library")?;
        ctx.shell.tool_output(&output);
        ctx.shell.status(Status::Built, "Wren C library");
        Ok(())
    }
}
