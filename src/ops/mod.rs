//! High-level operations.
//!
//! This module contains the implementation of the gwen-build commands.

pub mod gwen_build;
pub mod gwen_clean;

pub use gwen_build::{build, plan, run_stages, BuildCommand, BuildOptions, BuildReport};
pub use gwen_clean::CleanStage;
pub use gwen_test::TestStage;
