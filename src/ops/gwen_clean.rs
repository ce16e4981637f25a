//! Implementation of `gwen-build clean`.

use crate::builder::{BuildContext, BuildError, Stage, StageOutcome};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::process::CommandRunner;
use crate::util::shell::Status;

/// Removes the disposable `build/` and `bin/` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanStage;

impl Stage for CleanStage {
    fn name(&self) -> &str {
        "clean"
    }

    fn run(&self, ctx: &BuildContext, _runner: &dyn CommandRunner) -> StageOutcome {
        ctx.shell.status(Status::Cleaning, "build artifacts");

        for dir in ctx.layout.output_dirs() {
            let removed = remove_dir_all_if_exists(&dir)
                .map_err(BuildError::io(format!("failed to remove {}", dir.display())))?;
            if removed {
                let name = dir.file_name().unwrap_or(dir.as_os_str()).to_string_lossy();
                ctx.shell.status(Status::Removed, format!("{}/", name));
            }
        }

        ctx.shell.status(Status::Finished, "clean");
        Ok(())
    }
}
