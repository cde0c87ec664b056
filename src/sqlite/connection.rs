use std::cell::RefCell;
use std::fmt;
use std::path::Path;

use crate::error::{EngineError, SqlTypedError};
use crate::hooks::FailureHooks;
use crate::statement::Statement;
use crate::tuple::{BindRow, ExtractRow};

use super::config::ConnectionOptions;

/// Owns the engine handle. Statements borrow the connection, so none can outlive it.
pub struct Connection {
    handle: Option<rusqlite::Connection>,
    db_path: String,
    hooks: FailureHooks,
    last_error: RefCell<Option<EngineError>>,
}

impl Connection {
    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns `SqlTypedError::Engine` if the engine cannot open the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqlTypedError> {
        ConnectionOptions::new(path.as_ref().to_string_lossy().into_owned()).open()
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns `SqlTypedError::Engine` if the engine cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqlTypedError> {
        ConnectionOptions::in_memory().open()
    }

    /// Open with explicit options and hooks. An open failure is reported to the engine hook
    /// with the database path as context.
    ///
    /// # Errors
    /// Returns `SqlTypedError::ConfigError` for invalid options, `SqlTypedError::Engine` if the
    /// engine refuses to open or apply a pragma.
    pub fn open_with(opts: &ConnectionOptions, hooks: FailureHooks) -> Result<Self, SqlTypedError> {
        opts.validate()?;
        let report = |err: rusqlite::Error| {
            let err = EngineError::from(err);
            tracing::error!(code = err.code, db_path = %opts.db_path, "failed to open database: {}", err.message);
            hooks.engine_failure(err.code, &opts.db_path);
            SqlTypedError::engine(format!("failed to open {}", opts.db_path), err)
        };

        let handle = rusqlite::Connection::open_with_flags(&opts.db_path, opts.open_flags())
            .map_err(report)?;
        if let Some(timeout) = opts.busy_timeout() {
            handle.busy_timeout(timeout).map_err(report)?;
        }
        if opts.journal_wal {
            handle
                .execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(report)?;
        }
        tracing::debug!(db_path = %opts.db_path, read_only = opts.read_only, "opened database");

        Ok(Self {
            handle: Some(handle),
            db_path: opts.db_path.clone(),
            hooks,
            last_error: RefCell::new(None),
        })
    }

    /// Close the engine handle. Closing twice is a no-op.
    ///
    /// # Errors
    /// Returns `SqlTypedError::Engine` if the engine refuses to close; the connection then
    /// stays open.
    pub fn close(&mut self) -> Result<(), SqlTypedError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.close() {
            Ok(()) => {
                tracing::debug!(db_path = %self.db_path, "closed database");
                Ok(())
            }
            Err((handle, err)) => {
                self.handle = Some(handle);
                let err = EngineError::from(err);
                self.record_error(&err);
                self.hooks.engine_failure(err.code, "failed to close database");
                Err(SqlTypedError::engine("failed to close database", err))
            }
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Result code of the most recent engine failure seen on this connection, `0` if none.
    #[must_use]
    pub fn last_error_code(&self) -> i32 {
        self.last_error.borrow().as_ref().map_or(0, |err| err.code)
    }

    /// Message of the most recent engine failure seen on this connection.
    #[must_use]
    pub fn last_error_message(&self) -> String {
        self.last_error
            .borrow()
            .as_ref()
            .map_or_else(|| "not an error".to_owned(), |err| err.message.clone())
    }

    #[must_use]
    pub fn hooks(&self) -> &FailureHooks {
        &self.hooks
    }

    /// Replace the hooks handed to statements prepared from now on.
    pub fn set_hooks(&mut self, hooks: FailureHooks) {
        self.hooks = hooks;
    }

    /// Run one or more semicolon-separated statements that return no rows (schema setup,
    /// pragmas, seeding).
    ///
    /// # Errors
    /// Returns `SqlTypedError::Engine` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlTypedError> {
        let handle = self.handle.as_ref().ok_or_else(|| {
            SqlTypedError::ConnectionError("execute_batch on a closed connection".into())
        })?;
        handle.execute_batch(sql).map_err(|err| {
            let err = EngineError::from(err);
            self.record_error(&err);
            self.hooks.engine_failure(err.code, "failed to execute batch");
            SqlTypedError::engine("failed to execute batch", err)
        })
    }

    /// Prepare a statement whose rows are read as `R`.
    pub fn prepare<R: ExtractRow>(&self, sql: &str) -> Statement<'_, R> {
        Statement::new(self, sql)
    }

    /// Prepare a statement and bind `params` to it.
    pub fn prepare_with<R: ExtractRow, P: BindRow + ?Sized>(
        &self,
        sql: &str,
        params: &P,
    ) -> Statement<'_, R> {
        Statement::with_params(self, sql, params)
    }

    pub(crate) fn handle(&self) -> Option<&rusqlite::Connection> {
        self.handle.as_ref()
    }

    pub(crate) fn record_error(&self, err: &EngineError) {
        *self.last_error.borrow_mut() = Some(err.clone());
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("db_path", &self.db_path)
            .field("open", &self.handle.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}
