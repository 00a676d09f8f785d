//! Shared test utilities
//!
//! - `TestDatabase`: PostgreSQL container with automatic cleanup (feature: "postgres")
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::TestDatabase;
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let port = db.host_port;
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::{TestDatabase, TEST_PASSWORD};
