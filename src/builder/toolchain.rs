//! C toolchain location.
//!
//! cgo needs `gcc` on the search path. Windows machines rarely have it
//! there, so the known MinGW/TDM install locations are searched and the first
//! directory containing the compiler is prepended to `PATH` for every
//! command.
//!
//! Resolution goes through [`ToolchainResolver`] so tests can simulate
//! present or missing toolchains without touching the real filesystem.

use std::path::{Path, PathBuf};

use crate::util::process::find_executable;

/// Compiler executable looked for on Windows.
pub const WINDOWS_COMPILER: &str = "gcc.exe";

/// Compiler executable looked for on the search path.
pub const COMPILER: &str = "gcc";

/// Where a toolchain was found.
///
/// `None` means "use the process search path unmodified".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainLocation {
    pub directory: Option<PathBuf>,
}

impl ToolchainLocation {
    pub fn found(dir: impl Into<PathBuf>) -> Self {
        ToolchainLocation {
            directory: Some(dir.into()),
        }
    }

    pub fn not_found() -> Self {
        ToolchainLocation { directory: None }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn is_found(&self) -> bool {
        self.directory.is_some()
    }
}

/// Finds the directory that provides a tool.
pub trait ToolchainResolver {
    /// Locate the directory containing `tool`.
    fn locate(&self, tool: &str) -> ToolchainLocation;
}

/// Searches a fixed, ordered list of directories. First match wins.
#[derive(Debug, Clone)]
pub struct KnownDirs {
    candidates: Vec<PathBuf>,
}

impl KnownDirs {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        KnownDirs { candidates }
    }

    /// The well-known MinGW/TDM-GCC install locations, in priority order,
    /// followed by `extra`.
    pub fn windows_defaults(extra: &[PathBuf]) -> Self {
        let mut candidates = vec![
            PathBuf::from("C:/TDM-GCC-64/bin"),
            PathBuf::from("C:/MinGW/bin"),
            PathBuf::from("C:/mingw64/bin"),
        ];

        if let Some(dirs) = directories::BaseDirs::new() {
            let scoop = dirs.home_dir().join("scoop").join("apps");
            candidates.push(scoop.join("tdm-gcc").join("current").join("bin"));
            candidates.push(scoop.join("gcc").join("current").join("bin"));
        }

        candidates.extend(extra.iter().cloned());
        KnownDirs { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl ToolchainResolver for KnownDirs {
    fn locate(&self, tool: &str) -> ToolchainLocation {
        for dir in &self.candidates {
            if dir.join(tool).is_file() {
                tracing::debug!("found {} in {}", tool, dir.display());
                return ToolchainLocation::found(dir);
            }
        }
        tracing::debug!("{} not found in {} known location(s)", tool, self.candidates.len());
        ToolchainLocation::not_found()
    }
}

/// Looks the tool up on the process search path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPath;

impl ToolchainResolver for SearchPath {
    fn locate(&self, tool: &str) -> ToolchainLocation {
        match find_executable(tool).as_deref().and_then(Path::parent) {
            Some(dir) => ToolchainLocation::found(dir),
            None => ToolchainLocation::not_found(),
        }
    }
}
