use sqlx::{Connection, PgConnection};
use std::io;
use tracing::{debug, info};

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Open a single PostgreSQL connection
///
/// Makes exactly one attempt. A configured connect timeout bounds it;
/// otherwise it is bounded by the network stack alone. The caller owns
/// the returned connection and is responsible for closing it.
pub async fn connect(config: &PostgresConfig) -> DatabaseResult<PgConnection> {
    debug!(
        url = %config.redacted_url(),
        timeout_secs = ?config.connect_timeout_secs,
        "Connecting to PostgreSQL"
    );

    let options = config.connect_options();
    let attempt = PgConnection::connect_with(&options);

    let result = match config.connect_timeout() {
        Some(limit) => match tokio::time::timeout(limit, attempt).await {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connection attempt timed out after {}s", limit.as_secs()),
            ))),
        },
        None => attempt.await,
    };

    result.map_err(DatabaseError::ConnectionFailed)
}

/// Open a single connection to PostgreSQL and close it again
///
/// The handle is closed before this returns. When establishing the
/// connection fails there is no handle to release.
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_once};
///
/// let config = PostgresConfig::new().with_password("secret");
/// connect_once(&config).await?;
/// ```
pub async fn connect_once(config: &PostgresConfig) -> DatabaseResult<()> {
    let conn = connect(config).await?;
    info!(url = %config.redacted_url(), "Successfully connected to PostgreSQL database");

    conn.close().await.map_err(DatabaseError::ConnectionFailed)?;
    debug!("PostgreSQL connection closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// A localhost port with nothing listening on it
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_connect_once_refused() {
        let config = PostgresConfig::new()
            .with_host("127.0.0.1")
            .with_port(closed_port())
            .with_connect_timeout(5);

        let result = connect_once(&config).await;
        let err = result.unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(sqlx::Error::Io(_))));
        assert!(err.to_string().starts_with("Connection failed: "));
    }

    #[tokio::test]
    async fn test_connect_once_unresolvable_host() {
        let config = PostgresConfig::new()
            .with_host("pg-probe-does-not-exist.invalid")
            .with_connect_timeout(5);

        let result = connect_once(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_connect_times_out_on_silent_server() {
        // Accepts the TCP connection but never answers the startup message
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let config = PostgresConfig::new()
            .with_host("127.0.0.1")
            .with_port(port)
            .with_connect_timeout(1);

        let err = connect(&config).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));

        server.abort();
    }
}
