//! PostgreSQL test infrastructure
//!
//! Provides a `TestDatabase` helper that starts a password-protected
//! PostgreSQL container for testing.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Password of the `postgres` superuser inside the container
pub const TEST_PASSWORD: &str = "postgres";

/// Test database wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
pub struct TestDatabase {
    #[allow(dead_code)]
    container: ContainerAsync<Postgres>,
    pub pool: PgPool,
    pub host: String,
    pub host_port: u16,
    pub connection_string: String,
}

impl TestDatabase {
    /// Start a fresh PostgreSQL container
    ///
    /// Host connections require the password ([`TEST_PASSWORD`]); the image
    /// uses scram-sha-256 for them.
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// # }
    /// ```
    pub async fn new() -> Self {
        // Use Postgres 18 to match production
        let postgres = Postgres::default()
            .with_password(TEST_PASSWORD)
            .with_tag("18-alpine");

        let container = postgres
            .start()
            .await
            .expect("Failed to start Postgres container");

        let host = container
            .get_host()
            .await
            .expect("Failed to get container host")
            .to_string();

        let host_port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get host port");

        let connection_string = format!(
            "postgres://postgres:{}@{}:{}/postgres",
            TEST_PASSWORD, host, host_port
        );

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&connection_string)
            .await
            .expect("Failed to connect to test database");

        tracing::info!(port = host_port, "Test database ready (Postgres 18)");

        Self {
            container,
            pool,
            host,
            host_port,
            connection_string,
        }
    }

    /// Get a cloned pool handle
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Number of server backends opened with the given `application_name`
    pub async fn backends_named(&self, application_name: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT count(*) FROM pg_stat_activity WHERE application_name = $1",
        )
        .bind(application_name)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to query pg_stat_activity")
    }

    /// Wait until no backend with the given `application_name` remains
    ///
    /// Backends exit shortly after the client terminates, so this polls for
    /// up to `timeout`. Returns the last observed count.
    pub async fn wait_for_no_backends(&self, application_name: &str, timeout: Duration) -> i64 {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let count = self.backends_named(application_name).await;
            if count == 0 || tokio::time::Instant::now() >= deadline {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

// Container is automatically cleaned up when TestDatabase is dropped
impl Drop for TestDatabase {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test database container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let db = TestDatabase::new().await;
        assert!(db.connection_string.starts_with("postgres://"));
        assert_eq!(db.backends_named("nobody-uses-this-name").await, 0);
    }
}
