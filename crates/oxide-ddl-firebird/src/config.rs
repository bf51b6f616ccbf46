//! Connection settings.
//!
//! Settings come either from the builder methods or from a `Key=Value;`
//! connection string:
//!
//! ```rust
//! use oxide_ddl_firebird::FirebirdConfig;
//!
//! let config: FirebirdConfig =
//!     "Database=/data/shop.fdb; DataSource=db.local; Port=3051; User=SYSDBA; Password=secret"
//!         .parse()
//!         .unwrap();
//! assert_eq!(config.host, "db.local");
//! assert_eq!(config.port, 3051);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rsfbclient_core::Charset;
use tracing::warn;

use crate::error::FirebirdError;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3050;

/// Default SQL dialect.
pub const DEFAULT_DIALECT: u8 = 3;

/// Default connection character set.
pub const DEFAULT_CHARSET: &str = "UTF8";

/// Keys accepted in a connection string but not used by the wire client.
const IGNORED_KEYS: &[&str] = &[
    "servertype",
    "pooling",
    "connectionlifetime",
    "packetsize",
];

/// Where and how to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct FirebirdConfig {
    /// Database path (or alias) on the server.
    pub database: String,
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// SQL dialect, 1 or 3.
    pub dialect: u8,
    /// Connection character set.
    pub charset: String,
    /// SQL role to connect with.
    pub role: Option<String>,
}

impl FirebirdConfig {
    /// Creates settings for `database` on the local server with the stock
    /// administrator account.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            user: "SYSDBA".to_string(),
            password: "masterkey".to_string(),
            dialect: DEFAULT_DIALECT,
            charset: DEFAULT_CHARSET.to_string(),
            role: None,
        }
    }

    /// Sets the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the server port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the SQL dialect.
    ///
    /// # Errors
    ///
    /// Only dialects 1 and 3 are accepted.
    pub fn dialect(mut self, dialect: u8) -> Result<Self, FirebirdError> {
        self.dialect = check_dialect(dialect)?;
        Ok(self)
    }

    /// Sets the connection character set.
    ///
    /// # Errors
    ///
    /// Fails for a character set the wire client does not know.
    pub fn charset(mut self, charset: impl Into<String>) -> Result<Self, FirebirdError> {
        self.charset = check_charset(charset.into())?;
        Ok(self)
    }

    /// Sets the SQL role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns the database as a filesystem path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.database).to_path_buf()
    }
}

impl fmt::Debug for FirebirdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebirdConfig")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dialect", &self.dialect)
            .field("charset", &self.charset)
            .field("role", &self.role)
            .finish()
    }
}

/// Renders a connection string with the password masked.
impl fmt::Display for FirebirdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Database={}; DataSource={}; Port={}; User={}; Password=***; Dialect={}; CharSet={}",
            self.database, self.host, self.port, self.user, self.dialect, self.charset
        )?;
        if let Some(role) = &self.role {
            write!(f, "; Role={role}")?;
        }
        Ok(())
    }
}

fn check_dialect(dialect: u8) -> Result<u8, FirebirdError> {
    match dialect {
        1 | 3 => Ok(dialect),
        other => Err(FirebirdError::Config(format!(
            "unsupported dialect {other}, expected 1 or 3"
        ))),
    }
}

fn check_charset(charset: String) -> Result<String, FirebirdError> {
    Charset::from_str(&charset)
        .map_err(|e| FirebirdError::Config(format!("unknown character set '{charset}': {e}")))?;
    Ok(charset)
}

impl FromStr for FirebirdConfig {
    type Err = FirebirdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut database = None;
        let mut config = Self::new(String::new());

        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| FirebirdError::Config(format!("expected Key=Value, got '{pair}'")))?;
            let value = value.trim();
            let key: String = key
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();

            match key.as_str() {
                "database" | "initialcatalog" => database = Some(value.to_string()),
                "datasource" | "server" | "host" => config.host = value.to_string(),
                "port" => {
                    config.port = value
                        .parse()
                        .map_err(|_| FirebirdError::Config(format!("invalid port '{value}'")))?;
                }
                "user" | "userid" | "username" => config.user = value.to_string(),
                "password" | "pwd" => config.password = value.to_string(),
                "dialect" => {
                    let dialect = value
                        .parse()
                        .map_err(|_| FirebirdError::Config(format!("invalid dialect '{value}'")))?;
                    config.dialect = check_dialect(dialect)?;
                }
                "charset" | "characterset" => config.charset = check_charset(value.to_string())?,
                "role" => config.role = Some(value.to_string()).filter(|r| !r.is_empty()),
                ignored if IGNORED_KEYS.contains(&ignored) => {}
                _ => warn!(key = %key, "Ignoring unknown connection string key"),
            }
        }

        config.database = database
            .filter(|d| !d.is_empty())
            .ok_or_else(|| FirebirdError::Config("missing Database".to_string()))?;
        Ok(config)
    }
}
