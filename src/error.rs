use thiserror::Error;

/// Generic engine failure (`SQLITE_ERROR`).
pub const SQLITE_ERROR: i32 = 1;
/// Engine API used out of order (`SQLITE_MISUSE`).
pub const SQLITE_MISUSE: i32 = 21;
/// Parameter or column index out of range (`SQLITE_RANGE`).
pub const SQLITE_RANGE: i32 = 25;

/// A non-success status reported by the engine: the raw (extended) result code plus the
/// engine's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct EngineError {
    /// Extended result code as returned by `SQLite`.
    pub code: i32,
    /// Human readable message from the engine.
    pub message: String,
}

impl EngineError {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn misuse(message: impl Into<String>) -> Self {
        Self::new(SQLITE_MISUSE, message)
    }

    /// The primary result code (the low byte of the extended code).
    #[must_use]
    pub fn primary_code(&self) -> i32 {
        self.code & 0xff
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message) => {
                let message = message.unwrap_or_else(|| failure.to_string());
                EngineError::new(failure.extended_code, message)
            }
            // Prepare errors carry the offending offset when built against a modern engine.
            #[cfg(feature = "bundled")]
            rusqlite::Error::SqlInputError { error, msg, .. } => {
                EngineError::new(error.extended_code, msg)
            }
            rusqlite::Error::InvalidParameterCount(given, expected) => EngineError::new(
                SQLITE_RANGE,
                format!("bind index {given} out of range (statement takes {expected})"),
            ),
            rusqlite::Error::InvalidColumnIndex(idx) => {
                EngineError::new(SQLITE_RANGE, format!("column index {idx} out of range"))
            }
            rusqlite::Error::InvalidQuery => EngineError::misuse(err.to_string()),
            other => EngineError::new(SQLITE_ERROR, other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SqlTypedError {
    /// The caller broke the statement protocol (bind after leaving Ready, stepping a
    /// terminal statement, `execute()` producing a row).
    #[error("Usage error: {0}")]
    Usage(String),

    /// The engine rejected prepare/bind/step/finalize.
    #[error("{context}: {source}")]
    Engine {
        context: String,
        #[source]
        source: EngineError,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqlTypedError {
    pub(crate) fn engine(context: impl Into<String>, source: EngineError) -> Self {
        SqlTypedError::Engine {
            context: context.into(),
            source,
        }
    }

    /// Engine result code, when the error came from the engine.
    #[must_use]
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            SqlTypedError::Engine { source, .. } => Some(source.code),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, SqlTypedError::Usage(_))
    }
}

impl From<rusqlite::Error> for SqlTypedError {
    fn from(err: rusqlite::Error) -> Self {
        SqlTypedError::engine("sqlite", EngineError::from(err))
    }
}
