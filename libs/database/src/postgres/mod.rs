//! PostgreSQL connectivity
//!
//! Provides connection configuration, single-connection helpers and the
//! connectivity probe.

mod config;
mod connector;
mod probe;

pub use config::{
    PostgresConfig, DEFAULT_APPLICATION_NAME, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_USERNAME,
};
pub use connector::{connect, connect_once};
pub use probe::{probe_connection, ProbeOutcome, SUCCESS_MESSAGE};

// Re-export sqlx types for convenience
pub use sqlx::PgConnection;
