//! Shared utilities

pub mod config;
pub mod fs;
pub mod interrupt;
pub mod process;
pub mod shell;

pub use config::Config;
pub use process::{CommandResult, CommandRunner, ProcessBuilder, SystemRunner};
pub use shell::{Shell, Status, Verbosity};
