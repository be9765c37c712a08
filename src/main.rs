//! Mythos - narrative arc construction over symbolic events
//!
//! Usage:
//!   mythos world seed              Add the genesis events
//!   mythos ingest --title ...      Ingest a symbolic event
//!   mythos arc evt_001 --depth 3   Construct a narrative arc
//!   mythos handle < request.json   Run a JSON action envelope
//!   mythos --help                  Show all commands

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use mythos::cli::output::OutputMode;
use mythos::cli::Cli;
use mythos::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so stdout stays clean for JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mythos=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_flags(cli.json, cli.md);

    if cli.command.needs_context() {
        let ctx = Arc::new(AppContext::new(cli.data_path.clone()).await?);
        mythos::cli::execute(&cli.command, &ctx, mode).await?;
    } else {
        mythos::cli::execute_standalone(&cli.command)?;
    }

    Ok(())
}
