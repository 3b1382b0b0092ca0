//! bel-enrichment: curation sheets for under-annotated genes of a BEL graph.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use belrich_cli::{cli::Cli, commands};
use belrich_common::Config;

const DEFAULT_FILTER: &str = "belrich=info,warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries tables, so logs go to stderr
    let filter = match cli.log_level {
        Some(level) => EnvFilter::new(format!("belrich={},warn", level.as_str())),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.as_deref())?;
    commands::run(cli.command, &config, cli.sep.as_deref()).await
}
