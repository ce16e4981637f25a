//! Every `gwen-build` command

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::Cli;
use gwen_build::builder::BuildContext;
use gwen_build::ops::gwen_build::{build, BuildOptions};
use gwen_build::util::config::load_project_config;
use gwen_build::util::shell::Shell;

pub fn execute(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let root: PathBuf = match cli.project {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    if !root.is_dir() {
        bail!("project directory not found: {}", root.display());
    }

    // Configuration first, then CLI flags on top
    let config = load_project_config(&root);
    let mut opts = BuildOptions::from_config(&config);
    if cli.no_static {
        opts.static_link = false;
    }
    if cli.no_copy_dlls {
        opts.copy_runtime_libraries = false;
    }
    if let Some(target) = cli.target {
        opts.target = target;
    }
    if cli.output.is_some() {
        opts.output = cli.output;
    }
    opts.package = cli.package;

    let shell = Shell::from_flags(cli.quiet, cli.verbose);
    let ctx = BuildContext::detect(root, &config, shell);
    let runner = ctx.runner();

    build(cli.command.into(), &opts, &ctx, &runner)?;
    Ok(())
}
