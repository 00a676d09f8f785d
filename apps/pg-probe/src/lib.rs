//! PostgreSQL connectivity probe
//!
//! Reads connection settings from the environment, tries to open one
//! connection, prints a single line describing the outcome and closes the
//! connection again.
//!
//! ## Output
//!
//! Exactly one line on stdout:
//!
//! ```text
//! Successfully connected to database!
//! Connection failed: <error>
//! ```
//!
//! Logs go to stderr through `tracing`.
//!
//! ## Exit status
//!
//! By default the process exits with 0 whatever the outcome. Pass
//! `--strict` to exit with 1 when the probe fails.

use clap::Parser;
use core_config::tracing::init_tracing;
use core_config::{Environment, FromEnv};
use database::postgres::{probe_connection, PostgresConfig, ProbeOutcome};
use eyre::{Result, WrapErr};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug, Default)]
#[command(name = "pg-probe", version)]
#[command(about = "Check that a PostgreSQL database accepts a connection")]
#[command(
    long_about = "Check that a PostgreSQL database accepts a connection.\n\n\
    Connection settings come from POSTGRES_HOST (db), POSTGRES_PORT (5432), \
    POSTGRES_DB (postgres), POSTGRES_USER (postgres), POSTGRES_PASSWORD and \
    POSTGRES_CONNECT_TIMEOUT_SECS."
)]
pub struct Cli {
    /// Exit with status 1 when the connection fails
    #[arg(long)]
    pub strict: bool,
}

/// Write the outcome line
pub fn report<W: Write>(outcome: &ProbeOutcome, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", outcome.report_line())
}

/// Probe the database and write the outcome line to `out`
///
/// Returns whether the connection succeeded. Connection failures are
/// reported, never returned as errors.
pub async fn probe_to<W: Write>(config: &PostgresConfig, out: &mut W) -> bool {
    let outcome = probe_connection(config).await;
    finish(&outcome, out)
}

/// Probe the database and print the outcome line to stdout
pub async fn probe(config: &PostgresConfig) -> bool {
    let outcome = probe_connection(config).await;
    finish(&outcome, &mut io::stdout().lock())
}

fn finish<W: Write>(outcome: &ProbeOutcome, out: &mut W) -> bool {
    if let Err(e) = report(outcome, out) {
        warn!(error = %e, "Failed to write probe report");
    }

    info!(
        connected = outcome.connected,
        elapsed_ms = outcome.elapsed_ms,
        "Probe finished"
    );
    outcome.connected
}

/// Process exit status for a probe result
///
/// Without `strict` the result is discarded and the status is always 0.
pub fn exit_status(connected: bool, strict: bool) -> u8 {
    if connected || !strict { 0 } else { 1 }
}

/// Run the probe
///
/// 1. Sets up structured logging (JSON for production, pretty otherwise)
/// 2. Loads the PostgreSQL settings from the environment
/// 3. Probes once and prints the outcome
///
/// # Errors
///
/// Returns an error only if the configuration is invalid, e.g. a
/// non-numeric `POSTGRES_PORT`. A failed connection is not an error.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = PostgresConfig::from_env().wrap_err("Invalid PostgreSQL configuration")?;
    info!(url = %config.redacted_url(), strict = cli.strict, "Probing PostgreSQL");

    let connected = probe(&config).await;
    Ok(ExitCode::from(exit_status(connected, cli.strict)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::try_parse_from(["pg-probe"]).unwrap();
        assert!(!cli.strict);
    }

    #[test]
    fn test_cli_strict() {
        let cli = Cli::try_parse_from(["pg-probe", "--strict"]).unwrap();
        assert!(cli.strict);
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["pg-probe", "db"]).is_err());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(true, false), 0);
        assert_eq!(exit_status(false, false), 0);
        assert_eq!(exit_status(true, true), 0);
        assert_eq!(exit_status(false, true), 1);
    }

    #[test]
    fn test_report_success_line() {
        let mut out = Vec::new();
        report(&ProbeOutcome::connected(3), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Successfully connected to database!\n");
    }

    #[test]
    fn test_report_failure_line() {
        let mut out = Vec::new();
        let outcome = ProbeOutcome::failed("Connection failed: timed out".to_string(), 5000);
        report(&outcome, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Connection failed: timed out\n");
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_port() {
        let result = temp_env::async_with_vars(
            [("POSTGRES_PORT", Some("not-a-port"))],
            run(Cli::default()),
        )
        .await;

        let err = result.unwrap_err();
        assert!(format!("{:?}", err).contains("POSTGRES_PORT"));
    }
}
