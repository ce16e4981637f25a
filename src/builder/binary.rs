//! Go binary builds.
//!
//! Every binary links against the native library produced by the native
//! stage, so cgo is forced on and pointed at `build/` through the
//! environment. Link flags depend on the host family.

use std::path::Path;

use crate::builder::context::BuildContext;
use crate::builder::errors::{BuildError, StageOutcome};
use crate::builder::runtime_libs::copy_runtime_libraries;
use crate::builder::{run_step, Stage};
use crate::core::layout::{LSP_OUTPUT, LSP_TARGET, NATIVE_LIB_NAME, PRIMARY_TARGET};
use crate::core::platform::PlatformFamily;
use crate::util::fs::{ensure_dir, file_size, format_size};
use crate::util::process::{CommandRunner, ProcessBuilder};
use crate::util::shell::Status;

const LINUX_STATIC_FLAGS: &[&str] = &["-ldflags", "-extldflags \"-static\"", "-tags", "netgo"];
const STRIP_FLAGS: &[&str] = &["-ldflags", "-s -w"];

/// One Go binary to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Package path relative to the project root, e.g. `cmd/gwen`
    pub source_path: String,

    /// Output file name without extension
    pub output_name: String,

    /// Whether static linking is requested
    pub static_link: bool,

    /// Whether runtime libraries are copied next to the output (Windows)
    pub copy_runtime_libraries: bool,
}

impl BuildTarget {
    /// A target whose output name defaults to the last path component.
    pub fn new(source_path: impl Into<String>, output_name: Option<String>) -> Self {
        let source_path = source_path.into();
        let trimmed = source_path.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
        let output_name = output_name.unwrap_or_else(|| {
            Path::new(trimmed)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| trimmed.to_string())
        });

        BuildTarget {
            source_path: trimmed.to_string(),
            output_name,
            static_link: true,
            copy_runtime_libraries: true,
        }
    }

    /// The `gwen` CLI.
    pub fn primary() -> Self {
        BuildTarget::new(PRIMARY_TARGET, None)
    }

    /// The `gwen-lsp` language server. Never bundles runtime libraries.
    pub fn lsp() -> Self {
        BuildTarget::new(LSP_TARGET, Some(LSP_OUTPUT.to_string())).with_runtime_libraries(false)
    }

    pub fn with_static_link(mut self, static_link: bool) -> Self {
        self.static_link = static_link;
        self
    }

    pub fn with_runtime_libraries(mut self, copy: bool) -> Self {
        self.copy_runtime_libraries = copy;
        self
    }
}

/// Extra `go build` arguments for a static link request on `family`.
///
/// Windows and macOS cannot link cgo binaries fully static; they get a
/// stripped dynamic binary instead.
pub fn link_flags(family: PlatformFamily, static_link: bool) -> &'static [&'static str] {
    if !static_link {
        return &[];
    }
    match family {
        PlatformFamily::Linux => LINUX_STATIC_FLAGS,
        PlatformFamily::Darwin | PlatformFamily::Windows => STRIP_FLAGS,
        PlatformFamily::Other => &[],
    }
}

/// The `go build` invocation for `target`.
pub fn go_build_command(ctx: &BuildContext, target: &BuildTarget) -> ProcessBuilder {
    let output = ctx.layout.binary_output(&target.output_name, &ctx.platform);
    let cgo_ldflags = format!(
        "-L{} -l{} -lm",
        ctx.layout.build_dir().display(),
        NATIVE_LIB_NAME
    );

    ctx.go(["build", "-o"])
        .arg(&output)
        .args(link_flags(ctx.platform.family, target.static_link))
        .arg(format!("./{}", target.source_path))
        .env("CGO_ENABLED", "1")
        .env("CGO_LDFLAGS", cgo_ldflags)
}

/// Builds one Go binary into `bin/`.
#[derive(Debug, Clone)]
pub struct BinaryBuildStage {
    target: BuildTarget,
}

impl BinaryBuildStage {
    pub fn new(target: BuildTarget) -> Self {
        BinaryBuildStage { target }
    }

    fn bundle_runtime_libraries(&self, ctx: &BuildContext, out_dir: &Path) {
        if !self.target.copy_runtime_libraries || !ctx.platform.family.is_windows() {
            return;
        }
        match copy_runtime_libraries(ctx, out_dir) {
            Ok(_) | Err(BuildError::ToolchainNotFound { .. }) => {}
            Err(e) => ctx.shell.warn(e),
        }
    }
}

impl Stage for BinaryBuildStage {
    fn name(&self) -> &str {
        &self.target.source_path
    }

    fn run(&self, ctx: &BuildContext, runner: &dyn CommandRunner) -> StageOutcome {
        ctx.shell.status(Status::Building, &self.target.source_path);

        let bin_dir = ctx.layout.bin_dir();
        ensure_dir(&bin_dir).map_err(BuildError::io(format!(
            "failed to create {}",
            bin_dir.display()
        )))?;

        if self.target.static_link && ctx.platform.family == PlatformFamily::Darwin {
            ctx.shell.warn("full static linking is not available on macOS, stripping only");
        }

        ctx.require_compiler()?;

        let cmd = go_build_command(ctx, &self.target);
        let output = run_step(runner, &cmd, &format!("build {}", self.target.source_path))?;
        ctx.shell.tool_output(&output);

        let binary = ctx.layout.binary_output(&self.target.output_name, &ctx.platform);
        if !binary.is_file() {
            return Err(BuildError::MissingArtifact {
                what: "built binary",
                path: binary,
            });
        }
        let size = file_size(&binary)
            .map_err(BuildError::io(format!("failed to inspect {}", binary.display())))?;
        ctx.shell.status(
            Status::Built,
            format!("{} ({})", binary.display(), format_size(size)),
        );

        self.bundle_runtime_libraries(ctx, &bin_dir);
        Ok(())
    }
}
