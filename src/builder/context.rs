//! Build context - platform, toolchain, and project layout.
//!
//! Everything the stages need to know about the host is computed once,
//! here, and passed explicitly to every stage.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::builder::errors::{BuildError, StageOutcome};
use crate::builder::toolchain::{
    KnownDirs, SearchPath, ToolchainLocation, ToolchainResolver, COMPILER, WINDOWS_COMPILER,
};
use crate::core::layout::Layout;
use crate::core::platform::PlatformDescriptor;
use crate::util::config::{Config, DEFAULT_GO};
use crate::util::process::{ProcessBuilder, SystemRunner};
use crate::util::shell::Shell;

/// Immutable per-run build context.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Host platform
    pub platform: PlatformDescriptor,

    /// Located C toolchain directory (Windows only)
    pub toolchain: ToolchainLocation,

    /// Whether any C compiler is reachable, located or on PATH
    pub compiler_available: bool,

    /// Project paths
    pub layout: Layout,

    /// Go program
    pub go: String,

    /// Status output
    pub shell: Shell,
}

impl BuildContext {
    /// Create a context with no located toolchain and the default Go program.
    pub fn new(platform: PlatformDescriptor, root: impl Into<PathBuf>) -> Self {
        BuildContext {
            platform,
            toolchain: ToolchainLocation::not_found(),
            compiler_available: true,
            layout: Layout::new(root),
            go: DEFAULT_GO.to_string(),
            shell: Shell::default(),
        }
    }

    /// Detect the host and its toolchain for the project at `root`.
    pub fn detect(root: impl Into<PathBuf>, config: &Config, shell: Shell) -> Self {
        let known = KnownDirs::windows_defaults(&config.build.toolchain_dirs);
        Self::resolve(
            PlatformDescriptor::describe(),
            root,
            config,
            shell,
            &known,
            &SearchPath,
        )
    }

    /// Build a context, consulting the resolvers only on Windows.
    pub fn resolve(
        platform: PlatformDescriptor,
        root: impl Into<PathBuf>,
        config: &Config,
        shell: Shell,
        known: &dyn ToolchainResolver,
        search: &dyn ToolchainResolver,
    ) -> Self {
        let (toolchain, compiler_available) = if platform.family.is_windows() {
            let location = known.locate(WINDOWS_COMPILER);
            let available = location.is_found() || search.locate(COMPILER).is_found();
            match location.directory() {
                Some(dir) => tracing::debug!("using toolchain in {}", dir.display()),
                None if available => {
                    tracing::debug!("no known toolchain directory, using gcc from PATH")
                }
                None => tracing::warn!("no C compiler found in known locations or on PATH"),
            }
            (location, available)
        } else {
            (ToolchainLocation::not_found(), true)
        };

        BuildContext {
            platform,
            toolchain,
            compiler_available,
            layout: Layout::new(root),
            go: config.go_program().to_string(),
            shell,
        }
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainLocation) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_compiler_available(mut self, available: bool) -> Self {
        self.compiler_available = available;
        self
    }

    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// A runner that puts the located toolchain first on `PATH` on Windows.
    pub fn runner(&self) -> SystemRunner {
        match self.toolchain.directory() {
            Some(dir) if self.platform.family.is_windows() => SystemRunner::with_path_prefix(dir),
            _ => SystemRunner::new(),
        }
    }

    /// Fail when cgo compilation cannot possibly find a C compiler.
    pub fn require_compiler(&self) -> StageOutcome {
        if self.compiler_available {
            Ok(())
        } else {
            Err(BuildError::ToolchainNotFound {
                tool: COMPILER.to_string(),
            })
        }
    }

    /// A command that runs from the project root.
    pub fn command(&self, program: impl AsRef<Path>) -> ProcessBuilder {
        ProcessBuilder::new(program).cwd(self.root())
    }

    /// A Go tool invocation from the project root.
    pub fn go<I, S>(&self, args: I) -> ProcessBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command(&self.go).args(args)
    }
}
