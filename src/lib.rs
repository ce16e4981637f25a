//! gwen-build - build driver for the wren.go project
//!
//! Compiles the native Wren library, runs the binding and LSP symbol
//! generators, and links the `gwen` and `gwen-lsp` Go binaries, adapting
//! the toolchain and link flags to the host.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording command runner and a fixed
/// toolchain resolver.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildContext, BuildError, Stage, StageOutcome};
pub use crate::core::platform::{PlatformDescriptor, PlatformFamily};
pub use ops::gwen_build::{build, BuildCommand, BuildOptions};
