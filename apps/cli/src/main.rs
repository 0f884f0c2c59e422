//! sitepages CLI — renders the About and Faculty page data as JSON.
//!
//! Stands in for the rendering layer: every command prints the exact shape
//! a page template would receive.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
