use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DbalError, Result};

fn default_charset() -> String {
    ConnectionParams::DEFAULT_CHARSET.to_string()
}

/// Parameters for one database connection.
///
/// Normally deserialized from the application's settings. `prefix` and
/// `charset` may be changed on a live driver; everything else is fixed once
/// the driver is built.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl ConnectionParams {
    pub const DEFAULT_CHARSET: &'static str = "utf8";

    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            prefix: String::new(),
            charset: default_charset(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Checks that the fields every backend needs are present.
    ///
    /// # Errors
    /// Returns `DbalError::ConfigError` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(DbalError::ConfigError("host is required".to_string()));
        }
        if self.user.is_empty() {
            return Err(DbalError::ConfigError("user is required".to_string()));
        }
        if self.database.is_empty() {
            return Err(DbalError::ConfigError("database is required".to_string()));
        }
        if self.charset.is_empty() {
            return Err(DbalError::ConfigError("charset must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("prefix", &self.prefix)
            .field("charset", &self.charset)
            .finish()
    }
}
