//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use gwen_build::ops::BuildCommand;

/// Build driver for wren.go: native library, bindings, and Go binaries
#[derive(Parser)]
#[command(name = "gwen-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// What to build
    #[arg(value_enum, default_value_t = CommandArg::All)]
    pub command: CommandArg,

    /// Disable static linking
    #[arg(long)]
    pub no_static: bool,

    /// Primary target to build
    #[arg(long, value_name = "PATH")]
    pub target: Option<String>,

    /// Primary output binary name (default: last component of the target)
    #[arg(long, value_name = "NAME")]
    pub output: Option<String>,

    /// Do not copy MinGW runtime DLLs next to the binary (Windows only)
    #[arg(long)]
    pub no_copy_dlls: bool,

    /// Run `test` for a single package
    #[arg(long, value_name = "PKG")]
    pub package: Option<String>,

    /// Project root (default: current directory)
    #[arg(short = 'C', long = "project", value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommandArg {
    /// Full build: Wren library, code generation, CLI and LSP binaries
    All,
    /// Wren C library and code generation
    Wren,
    /// Code generation and the CLI binary
    Cli,
    /// Code generation and the LSP binary
    Lsp,
    /// Code generation only
    Generate,
    /// Run the Go test suite
    Test,
    /// Remove build/ and bin/
    Clean,
}

impl From<CommandArg> for BuildCommand {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::All => BuildCommand::All,
            CommandArg::Wren => BuildCommand::Wren,
            CommandArg::Cli => BuildCommand::Cli,
            CommandArg::Lsp => BuildCommand::Lsp,
            CommandArg::Generate => BuildCommand::Generate,
            CommandArg::Test => BuildCommand::Test,
            CommandArg::Clean => BuildCommand::Clean,
        }
    }
}
