use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Extended error information for the most recent statement:
/// SQLSTATE, backend-native error code and message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorInfo {
    pub sqlstate: String,
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    /// SQLSTATE reported when the last statement succeeded.
    pub const SUCCESS_STATE: &'static str = "00000";

    pub fn new(
        sqlstate: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sqlstate: sqlstate.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Error info describing a successful statement.
    pub fn success() -> Self {
        Self::new(Self::SUCCESS_STATE, "", "")
    }

    pub fn is_success(&self) -> bool {
        self.sqlstate == Self::SUCCESS_STATE
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() || self.code == self.sqlstate {
            write!(f, "[{}] {}", self.sqlstate, self.message)
        } else {
            write!(f, "[{}] ({}) {}", self.sqlstate, self.code, self.message)
        }
    }
}

/// Error type for dbal operations
#[derive(Debug, Error)]
pub enum DbalError {
    #[error("Invalid connection parameters: {0}")]
    ConfigError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected to the database")]
    NotConnected,

    #[error("Query failed: {0}")]
    QueryFailed(ErrorInfo),

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("Cannot encode value of type {0}")]
    UnencodableValue(String),

    #[error("Result set has already been freed")]
    ResultFreed,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unsupported character set: {0}")]
    UnsupportedCharset(String),

    #[error("Cannot import dump file {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DbalError {
    /// Diagnostics carried by a failed statement, if this is one.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            DbalError::QueryFailed(info) => Some(info),
            _ => None,
        }
    }
}

/// Result type alias for dbal operations
pub type Result<T> = std::result::Result<T, DbalError>;
