use std::time::Duration;

use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

use crate::error::SqlTypedError;
use crate::hooks::FailureHooks;

use super::connection::Connection;

/// Options for opening a `SQLite` connection.
///
/// Serializable so it can live in an application's config file:
/// ```rust
/// use sql_typed_core::ConnectionOptions;
///
/// let opts = ConnectionOptions::from_json(r#"{ "db_path": "app.db", "busy_timeout_ms": 250 }"#)
///     .expect("valid options");
/// assert_eq!(opts.db_path, "app.db");
/// assert!(!opts.read_only);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub db_path: String,
    pub read_only: bool,
    pub create_if_missing: bool,
    pub busy_timeout_ms: Option<u64>,
    pub journal_wal: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            db_path: ":memory:".to_owned(),
            read_only: false,
            create_if_missing: true,
            busy_timeout_ms: None,
            journal_wal: false,
        }
    }
}

impl ConnectionOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> ConnectionOptionsBuilder {
        ConnectionOptionsBuilder::new(db_path)
    }

    /// Parse options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `SqlTypedError::ConfigError` if the JSON does not describe valid options.
    pub fn from_json(json: &str) -> Result<Self, SqlTypedError> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| SqlTypedError::ConfigError(format!("invalid connection options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject combinations the engine cannot honour.
    ///
    /// # Errors
    /// Returns `SqlTypedError::ConfigError` describing the first conflict found.
    pub fn validate(&self) -> Result<(), SqlTypedError> {
        if self.db_path.is_empty() {
            return Err(SqlTypedError::ConfigError("db_path must not be empty".into()));
        }
        if self.read_only && self.journal_wal {
            return Err(SqlTypedError::ConfigError(
                "journal_wal requires a writable connection".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn open_flags(&self) -> OpenFlags {
        if self.read_only {
            return OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        }
        let mut flags = OpenFlags::default();
        if !self.create_if_missing {
            flags.remove(OpenFlags::SQLITE_OPEN_CREATE);
        }
        flags
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    /// Open a connection with no failure hooks.
    ///
    /// # Errors
    /// Returns `SqlTypedError` if the options are invalid or the engine refuses to open.
    pub fn open(&self) -> Result<Connection, SqlTypedError> {
        Connection::open_with(self, FailureHooks::default())
    }
}

/// Fluent builder for [`ConnectionOptions`] plus the failure hooks the connection hands to
/// its statements.
#[derive(Debug, Clone)]
pub struct ConnectionOptionsBuilder {
    opts: ConnectionOptions,
    hooks: FailureHooks,
}

impl ConnectionOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: ConnectionOptions::new(db_path),
            hooks: FailureHooks::default(),
        }
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.opts.create_if_missing = create;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn journal_wal(mut self, wal: bool) -> Self {
        self.opts.journal_wal = wal;
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: FailureHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn on_usage_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_usage(hook);
        self
    }

    #[must_use]
    pub fn on_engine_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(i32, &str) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_engine(hook);
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionOptions {
        self.opts
    }

    /// Open the connection.
    ///
    /// # Errors
    /// Returns `SqlTypedError` if the options are invalid or the engine refuses to open.
    pub fn open(self) -> Result<Connection, SqlTypedError> {
        Connection::open_with(&self.opts, self.hooks)
    }
}
