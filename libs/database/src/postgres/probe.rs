use std::time::Instant;
use tracing::warn;

use super::{connect_once, PostgresConfig};

/// Printed when the probe connects
pub const SUCCESS_MESSAGE: &str = "Successfully connected to database!";

/// Result of a single connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the connection was established
    pub connected: bool,

    /// Error description when the attempt failed
    pub message: Option<String>,

    /// Time spent on the attempt in milliseconds
    pub elapsed_ms: u64,
}

impl ProbeOutcome {
    /// Create a successful outcome
    pub fn connected(elapsed_ms: u64) -> Self {
        Self {
            connected: true,
            message: None,
            elapsed_ms,
        }
    }

    /// Create a failed outcome
    pub fn failed(message: String, elapsed_ms: u64) -> Self {
        Self {
            connected: false,
            message: Some(message),
            elapsed_ms,
        }
    }

    /// The one line reported to the user
    pub fn report_line(&self) -> String {
        match (self.connected, &self.message) {
            (true, _) => SUCCESS_MESSAGE.to_string(),
            (false, Some(message)) => message.clone(),
            (false, None) => "Connection failed: unknown error".to_string(),
        }
    }
}

/// Probe PostgreSQL connectivity
///
/// Opens one connection, closes it right away, and folds any failure into
/// the outcome. Never returns an error.
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, probe_connection};
///
/// let outcome = probe_connection(&PostgresConfig::new()).await;
/// println!("{}", outcome.report_line());
/// ```
pub async fn probe_connection(config: &PostgresConfig) -> ProbeOutcome {
    let start = Instant::now();

    match connect_once(config).await {
        Ok(()) => ProbeOutcome::connected(start.elapsed().as_millis() as u64),
        Err(e) => {
            let elapsed = start.elapsed().as_millis() as u64;
            warn!(
                url = %config.redacted_url(),
                elapsed_ms = elapsed,
                error = %e,
                "PostgreSQL connection probe failed"
            );
            ProbeOutcome::failed(e.to_string(), elapsed)
        }
    }
}
