//! Runtime shared libraries bundled next to Windows binaries.
//!
//! MinGW-built cgo binaries load the compiler's runtime DLLs at startup.
//! Distributions name them differently, so each slot has a primary name
//! (TDM-GCC 64-bit) and an alternate (plain MinGW-w64) at the same index.

use std::path::Path;

use crate::builder::context::BuildContext;
use crate::builder::errors::{BuildError, StageOutcome};
use crate::builder::toolchain::COMPILER;
use crate::util::fs::copy_into;
use crate::util::shell::Status;

/// Primary runtime library names.
pub const PRIMARY_RUNTIME_LIBS: [&str; 3] = [
    "libgcc_s_seh_64-1.dll",
    "libwinpthread_64-1.dll",
    "libstdc++_64-6.dll",
];

/// Alternate names, paired with [`PRIMARY_RUNTIME_LIBS`] by position.
pub const ALTERNATE_RUNTIME_LIBS: [&str; 3] = [
    "libgcc_s_seh-1.dll",
    "libwinpthread-1.dll",
    "libstdc++-6.dll",
];

/// Copy the toolchain's runtime DLLs into `out_dir`.
///
/// Returns the number of files copied. Off Windows this is a no-op that
/// returns `Ok(0)`. Missing or uncopyable slots are skipped with a warning;
/// the call only fails when the toolchain is unknown or nothing was copied.
pub fn copy_runtime_libraries(ctx: &BuildContext, out_dir: &Path) -> StageOutcome<usize> {
    if !ctx.platform.family.is_windows() {
        return Ok(0);
    }

    let Some(toolchain_dir) = ctx.toolchain.directory() else {
        ctx.shell.warn("cannot copy runtime libraries: toolchain directory unknown");
        return Err(BuildError::ToolchainNotFound {
            tool: COMPILER.to_string(),
        });
    };

    ctx.shell.status(
        Status::Copying,
        format!("runtime libraries from {}", toolchain_dir.display()),
    );

    let mut copied = 0;
    for (primary, alternate) in PRIMARY_RUNTIME_LIBS.into_iter().zip(ALTERNATE_RUNTIME_LIBS) {
        let Some(src) = [primary, alternate]
            .into_iter()
            .map(|name| toolchain_dir.join(name))
            .find(|path| path.is_file())
        else {
            ctx.shell.warn(format!("{} not found (also tried {})", primary, alternate));
            continue;
        };

        match copy_into(&src, out_dir) {
            Ok(dst) => {
                tracing::debug!("copied {} to {}", src.display(), dst.display());
                copied += 1;
            }
            Err(e) => ctx.shell.warn(format!("{:#}", e)),
        }
    }

    if copied == 0 {
        return Err(BuildError::NoRuntimeLibraries {
            dir: out_dir.to_path_buf(),
        });
    }

    ctx.shell.status(
        Status::Copied,
        format!("{} runtime {}", copied, if copied == 1 { "library" } else { "libraries" }),
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::ToolchainLocation;
    use crate::core::platform::PlatformDescriptor;
    use crate::test_support::quiet_context;
    use tempfile::TempDir;

    fn windows_ctx(root: &Path, toolchain: Option<&Path>) -> BuildContext {
        let location = match toolchain {
            Some(dir) => ToolchainLocation::found(dir),
            None => ToolchainLocation::not_found(),
        };
        quiet_context(PlatformDescriptor::from_host("windows", "x86_64"), root)
            .with_toolchain(location)
    }

    #[test]
    fn test_noop_off_windows() {
        let tmp = TempDir::new().unwrap();
        let ctx = quiet_context(PlatformDescriptor::from_host("linux", "x86_64"), tmp.path());

        assert_eq!(copy_runtime_libraries(&ctx, tmp.path()).unwrap(), 0);
    }

    #[test]
    fn test_unknown_toolchain_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let ctx = windows_ctx(tmp.path(), None);

        let err = copy_runtime_libraries(&ctx, tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::ToolchainNotFound { .. }));
    }

    #[test]
    fn test_copies_alternates_when_primaries_absent() {
        let toolchain = TempDir::new().unwrap();
        std::fs::write(toolchain.path().join("libgcc_s_seh-1.dll"), "gcc").unwrap();
        std::fs::write(toolchain.path().join("libwinpthread-1.dll"), "pthread").unwrap();
        let out = TempDir::new().unwrap();
        let ctx = windows_ctx(out.path(), Some(toolchain.path()));

        let copied = copy_runtime_libraries(&ctx, out.path()).unwrap();

        assert_eq!(copied, 2);
        assert!(out.path().join("libgcc_s_seh-1.dll").is_file());
        assert!(out.path().join("libwinpthread-1.dll").is_file());
        assert!(!out.path().join("libstdc++-6.dll").exists());
    }

    #[test]
    fn test_primary_name_preferred() {
        let toolchain = TempDir::new().unwrap();
        std::fs::write(toolchain.path().join("libstdc++_64-6.dll"), "primary").unwrap();
        std::fs::write(toolchain.path().join("libstdc++-6.dll"), "alternate").unwrap();
        let out = TempDir::new().unwrap();
        let ctx = windows_ctx(out.path(), Some(toolchain.path()));

        assert_eq!(copy_runtime_libraries(&ctx, out.path()).unwrap(), 1);
        assert!(out.path().join("libstdc++_64-6.dll").is_file());
        assert!(!out.path().join("libstdc++-6.dll").exists());
    }

    #[test]
    fn test_nothing_found_is_an_error() {
        let toolchain = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let ctx = windows_ctx(out.path(), Some(toolchain.path()));

        let err = copy_runtime_libraries(&ctx, out.path()).unwrap_err();
        assert!(matches!(err, BuildError::NoRuntimeLibraries { .. }));
    }
}
