/// Unified database error type
///
/// Every way a connection attempt can fail (name resolution, refused
/// connection, rejected credentials, timeout) collapses into
/// [`DatabaseError::ConnectionFailed`]. The client error is kept as the
/// source so callers can still inspect the cause.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_connection_failed_display_embeds_cause() {
        let err = DatabaseError::ConnectionFailed(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "Connection refused",
        )));
        let msg = err.to_string();
        assert!(msg.starts_with("Connection failed: "));
        assert!(msg.contains("Connection refused"));
    }

    #[test]
    fn test_connection_failed_keeps_source() {
        let err = DatabaseError::ConnectionFailed(sqlx::Error::Configuration("bad host".into()));
        let source = err.source().expect("source should be preserved");
        assert!(source.to_string().contains("bad host"));
    }
}
