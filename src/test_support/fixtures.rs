//! Test fixtures for common test scenarios.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::builder::context::BuildContext;
use crate::core::layout::{
    BINDINGS_DIR, GENERATED_BINDINGS, LSP_TARGET, NATIVE_SCRIPT_UNIX, NATIVE_SCRIPT_WINDOWS,
    PRIMARY_TARGET,
};
use crate::core::platform::PlatformDescriptor;
use crate::util::shell::{Shell, Verbosity};

/// A minimal wren.go checkout on disk.
///
/// Contains both native build scripts, the bindings directory, the two
/// binary packages, and an already generated `builtin_wren.go`.
pub fn project_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_project(tmp.path());
    tmp
}

/// Populate `root` with the files the pipeline expects.
pub fn write_project(root: &Path) {
    write(root, NATIVE_SCRIPT_UNIX, "#!/bin/sh\nset -e\nmkdir -p build\n");
    write(root, NATIVE_SCRIPT_WINDOWS, "@echo off\r\nmkdir build\r\n");
    write(
        root,
        &format!("{}/math.go", BINDINGS_DIR),
        "package builtin\n\n//wren:bind\nfunc Abs(x float64) float64 { return x }\n",
    );
    write(root, &format!("{}/main.go", PRIMARY_TARGET), "package main\n\nfunc main() {}\n");
    write(root, &format!("{}/main.go", LSP_TARGET), "package main\n\nfunc main() {}\n");
    write(root, GENERATED_BINDINGS, "// Code generated by wrengen. DO NOT EDIT.\npackage main\n");
    write(root, "cmd/wrenlsp-gen/main.go", "package main\n\nfunc main() {}\n");
}

/// A context for `platform` rooted at `root` that prints nothing.
pub fn quiet_context(platform: PlatformDescriptor, root: &Path) -> BuildContext {
    BuildContext::new(platform, root).with_shell(Shell::new(Verbosity::Quiet))
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
