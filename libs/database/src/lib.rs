//! Database library providing PostgreSQL connectivity helpers
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL connection and probe support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Examples
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::new().with_password("secret");
//! let outcome = postgres::probe_connection(&config).await;
//! println!("{}", outcome.report_line());
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
