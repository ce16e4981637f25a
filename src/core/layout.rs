//! Fixed project layout of a wren.go checkout.
//!
//! All paths the pipeline reads or writes are derived here from the
//! project root.

use std::path::{Path, PathBuf};

use crate::core::platform::{PlatformDescriptor, PlatformFamily};

/// Disposable native library output directory.
pub const BUILD_DIR: &str = "build";
/// Disposable binary output directory.
pub const BIN_DIR: &str = "bin";

/// Native library build script on Windows.
pub const NATIVE_SCRIPT_WINDOWS: &str = "build_wren.bat";
/// Native library build script everywhere else.
pub const NATIVE_SCRIPT_UNIX: &str = "build_wren.sh";
/// Name of the static library the script produces (`-lwren`).
pub const NATIVE_LIB_NAME: &str = "wren";

/// Directory scanned by the binding generator.
pub const BINDINGS_DIR: &str = "builtin";
/// Go package of the binding generator.
pub const WRENGEN_PACKAGE: &str = "./cmd/wrengen";
/// Entry point of the LSP symbol generator.
pub const LSP_GEN_SOURCE: &str = "./cmd/wrenlsp-gen/main.go";
/// Output name of the LSP symbol generator, at the project root.
pub const LSP_GEN_NAME: &str = "wrenlsp-gen";
/// Generated bindings consumed by the LSP symbol generator.
pub const GENERATED_BINDINGS: &str = "cmd/gwen/builtin_wren.go";

/// Primary target (CLI).
pub const PRIMARY_TARGET: &str = "cmd/gwen";
/// Secondary target (language server).
pub const LSP_TARGET: &str = "cmd/gwen-lsp";
/// Output name of the secondary target.
pub const LSP_OUTPUT: &str = "gwen-lsp";

/// Paths of a project checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Layout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Both disposable output directories.
    pub fn output_dirs(&self) -> [PathBuf; 2] {
        [self.build_dir(), self.bin_dir()]
    }

    /// The native library build script for `family`.
    pub fn native_script(&self, family: PlatformFamily) -> PathBuf {
        let script = if family.is_windows() {
            NATIVE_SCRIPT_WINDOWS
        } else {
            NATIVE_SCRIPT_UNIX
        };
        self.root.join(script)
    }

    pub fn generated_bindings(&self) -> PathBuf {
        self.root.join(GENERATED_BINDINGS)
    }

    /// Output path of a binary target.
    pub fn binary_output(&self, output_name: &str, platform: &PlatformDescriptor) -> PathBuf {
        self.bin_dir().join(platform.executable_name(output_name))
    }
}
