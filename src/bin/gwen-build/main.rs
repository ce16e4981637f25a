//! gwen-build - build driver for wren.go

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use gwen_build::builder::BuildError;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<BuildError>() {
            Some(BuildError::Interrupted) => eprintln!("\nBuild interrupted"),
            Some(_) => eprintln!("error: {:#}", e),
            None => eprintln!("error: {:?}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gwen_build=debug")
    } else {
        EnvFilter::new("gwen_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    gwen_build::util::interrupt::install_handler()?;

    commands::build::execute(cli)
}
