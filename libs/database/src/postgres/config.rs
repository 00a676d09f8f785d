use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions as _;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{env_optional, env_or_default, env_parse_optional, env_parse_or, ConfigError, FromEnv};

/// Default PostgreSQL host
pub const DEFAULT_HOST: &str = "db";

/// Default PostgreSQL port (the libpq default)
pub const DEFAULT_PORT: u16 = 5432;

/// Default database name
pub const DEFAULT_DATABASE: &str = "postgres";

/// Default user name
pub const DEFAULT_USERNAME: &str = "postgres";

/// `application_name` reported to the server for probe connections
pub const DEFAULT_APPLICATION_NAME: &str = "pg-probe";

/// PostgreSQL connection parameters
///
/// Holds everything needed to open a single connection. The defaults are
/// host `db`, database `postgres`, user `postgres` on port 5432 with no
/// password and no explicit connect timeout.
///
/// # Example
///
/// ```ignore
/// use database::postgres::PostgresConfig;
///
/// // Manual construction
/// let config = PostgresConfig::new()
///     .with_host("127.0.0.1")
///     .with_password("secret");
///
/// // From environment variables (requires `config` feature)
/// let config = PostgresConfig::from_env()?;
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,

    /// `None` means no password is sent; the server decides whether that is enough
    pub password: Option<String>,

    /// Upper bound on the connection attempt. `None` leaves the client default in place.
    pub connect_timeout_secs: Option<u64>,

    pub application_name: String,
}

impl PostgresConfig {
    /// Create a config with the default connection parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    /// Connection URL with the password masked, for logs and error reports
    pub fn redacted_url(&self) -> String {
        let password = if self.password.is_some() { ":***" } else { "" };
        // IPv6 literals need brackets in the authority part
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "postgres://{}{}@{}:{}/{}",
            self.username, password, host, self.port, self.database
        )
    }

    /// Convert this config into sqlx connect options for a single connection
    ///
    /// Parameters are set field by field, so no URL escaping is involved.
    /// Without a password, the `PGPASSWORD` environment variable still applies.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .application_name(&self.application_name)
            .disable_statement_logging();

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }

    /// Connect timeout, if one is configured
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            connect_timeout_secs: None,
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        }
    }
}

// Hand-written so the password never reaches logs through `{:?}`
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("application_name", &self.application_name)
            .finish()
    }
}

/// Load PostgresConfig from environment variables
///
/// Environment variables:
/// - `POSTGRES_PASSWORD` (optional) - unset means no password
/// - `POSTGRES_HOST` (optional, default: db)
/// - `POSTGRES_PORT` (optional, default: 5432)
/// - `POSTGRES_DB` (optional, default: postgres)
/// - `POSTGRES_USER` (optional, default: postgres)
/// - `POSTGRES_CONNECT_TIMEOUT_SECS` (optional, default: client default)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("POSTGRES_HOST", DEFAULT_HOST),
            port: env_parse_or("POSTGRES_PORT", DEFAULT_PORT)?,
            database: env_or_default("POSTGRES_DB", DEFAULT_DATABASE),
            username: env_or_default("POSTGRES_USER", DEFAULT_USERNAME),
            password: env_optional("POSTGRES_PASSWORD"),
            connect_timeout_secs: env_parse_optional("POSTGRES_CONNECT_TIMEOUT_SECS")?,
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        })
    }
}
