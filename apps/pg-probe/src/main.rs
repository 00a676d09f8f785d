//! pg-probe - Entry Point
//!
//! Attempts one PostgreSQL connection and reports the outcome.

use clap::Parser;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    core_config::tracing::install_color_eyre();
    pg_probe::run(pg_probe::Cli::parse()).await
}
