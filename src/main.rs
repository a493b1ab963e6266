use std::io;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use frameworkify::cli::Cli;
use frameworkify::{frameworkify, Cctools};

fn run(cli: &Cli) -> Result<()> {
    let editor = Cctools::new(cli.tool_config());
    let rewrites = frameworkify(&editor, &cli.executable, &cli.libraries, &cli.options())
        .with_context(|| format!("Failed to frameworkify {}", cli.executable.display()))?;
    tracing::debug!("applied {} rewrites", rewrites.len());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG; --verbose only raises the default.
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = cli.validate() {
        e.exit();
    }

    if let Err(e) = run(&cli) {
        Cli::command()
            .error(ErrorKind::InvalidValue, format!("{e:#}"))
            .exit();
    }
}
