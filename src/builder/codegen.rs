//! Code generation.
//!
//! Two generators run back to back:
//! 1. `wrengen` scans `builtin/` and writes the FFI bindings
//!    (`cmd/gwen/builtin_wren.go`).
//! 2. `wrenlsp-gen` reads those bindings and emits the language server's
//!    builtin symbol table. It is a development tool, built from source the
//!    first time it is needed.

use std::cell::OnceCell;
use std::path::PathBuf;

use crate::builder::context::BuildContext;
use crate::builder::errors::{BuildError, StageOutcome};
use crate::builder::{run_step, Stage};
use crate::core::layout::{BINDINGS_DIR, LSP_GEN_NAME, LSP_GEN_SOURCE, WRENGEN_PACKAGE};
use crate::util::process::CommandRunner;
use crate::util::shell::Status;

/// A helper binary that is built from source only when it is missing.
///
/// The answer is memoized: once the binary is known to exist, later calls
/// in the same run neither check nor rebuild.
#[derive(Debug)]
pub struct HelperTool {
    name: &'static str,
    source: &'static str,
    ready: OnceCell<PathBuf>,
}

impl HelperTool {
    pub fn new(name: &'static str, source: &'static str) -> Self {
        HelperTool {
            name,
            source,
            ready: OnceCell::new(),
        }
    }

    /// The `wrenlsp-gen` symbol generator.
    pub fn lsp_gen() -> Self {
        HelperTool::new(LSP_GEN_NAME, LSP_GEN_SOURCE)
    }

    /// Where the binary lives: the project root, with the host extension.
    pub fn path(&self, ctx: &BuildContext) -> PathBuf {
        ctx.root().join(ctx.platform.executable_name(self.name))
    }

    /// Make sure the binary exists, building it if needed. Returns its path.
    pub fn ensure_built(
        &self,
        ctx: &BuildContext,
        runner: &dyn CommandRunner,
    ) -> StageOutcome<PathBuf> {
        if let Some(path) = self.ready.get() {
            return Ok(path.clone());
        }

        let path = self.path(ctx);
        if path.is_file() {
            tracing::debug!("{} already built at {}", self.name, path.display());
        } else {
            ctx.shell.status(Status::Building, format!("{} tool", self.name));
            let cmd = ctx.go(["build", "-o"]).arg(&path).arg(self.source);
            run_step(runner, &cmd, &format!("build {}", self.name))?;
            ctx.shell.status(Status::Built, format!("{} tool", self.name));
        }

        Ok(self.ready.get_or_init(|| path).clone())
    }
}

/// Binding and LSP symbol generation.
#[derive(Debug)]
pub struct CodeGenStage {
    lsp_gen: HelperTool,
}

impl CodeGenStage {
    pub fn new() -> Self {
        CodeGenStage {
            lsp_gen: HelperTool::lsp_gen(),
        }
    }

    fn generate_bindings(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome {
        ctx.shell.status(Status::Generating, "FFI bindings");
        let cmd = ctx.go(["run", WRENGEN_PACKAGE, "-dir", BINDINGS_DIR]);
        let output = run_step(runner, &cmd, "generate FFI bindings")?;
        ctx.shell.tool_output(&output);
        ctx.shell.status(Status::Generated, "FFI bindings");
        Ok(())
    }

    fn generate_lsp_symbols(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome {
        let tool = self.lsp_gen.ensure_built(ctx, runner)?;

        let bindings = ctx.layout.generated_bindings();
        if !bindings.is_file() {
            return Err(BuildError::MissingArtifact {
                what: "generated bindings",
                path: bindings,
            });
        }

        ctx.shell.status(Status::Generating, "LSP builtin symbols");
        let output = run_step(
            runner,
            &ctx.command(&tool).arg(&bindings),
            "generate LSP builtin symbols",
        )?;
        ctx.shell.tool_output(&output);
        ctx.shell.status(Status::Generated, "LSP builtin symbols");
        Ok(())
    }
}

impl Default for CodeGenStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for CodeGenStage {
    fn name(&self) -> &str {
        "code generation"
    }

    fn run(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome {
        self.generate_bindings(ctx, runner)?;
        self.generate_lsp_symbols(ctx, runner)
    }
}
