//! Typed prepared statements.
//!
//! A [`Statement`] owns one prepared query and the tuple its rows are read into. Its status
//! only moves forward:
//!
//! ```text
//! Ready --step(row)--> Running --step(row)--> Running
//!   |                    |
//!   +--step(done)--------+--step(done)--> Finished
//!   any state --engine error--> Failed
//! ```
//!
//! Finished and Failed are terminal. Calling an operation in a state where it is not allowed
//! is a usage error: the usage hook fires, nothing is sent to the engine and the status does
//! not change. Engine errors go through a single reporting path that fires the engine hook,
//! records the error on the connection, releases the handle and marks the statement Failed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{BindColumn, BindTarget};
use crate::error::{EngineError, SqlTypedError};
use crate::hooks::FailureHooks;
use crate::rows::RowSequence;
use crate::sqlite::Connection;
use crate::sqlite::raw::{RawStatement, RawStep};
use crate::tuple::{BindRow, ExtractRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementStatus {
    /// Prepared, parameters may be bound, nothing stepped yet.
    Ready,
    /// The last step produced a row; the tuple holds it.
    Running,
    /// The engine reported no more rows.
    Finished,
    /// An engine error occurred; the handle has been released.
    Failed,
}

impl StatementStatus {
    #[must_use]
    pub fn can_step(self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }
}

impl fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What one call to [`Statement::step`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Row,
    Done,
}

/// A prepared query whose result rows are read into `R`, a tuple of column types.
///
/// The statement borrows its [`Connection`], so the connection cannot be closed or dropped
/// while the statement is alive.
///
/// ```
/// use sql_typed_core::prelude::*;
///
/// let conn = Connection::open_in_memory()?;
/// conn.execute_batch("CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'one');")?;
///
/// let mut stmt = conn.prepare_with::<(String,), _>("SELECT name FROM t WHERE id = ?", &(1,));
/// let (name,) = stmt.execute_single()?;
/// assert_eq!(name, "one");
/// assert!(stmt.is_ok());
/// # Ok::<(), SqlTypedError>(())
/// ```
pub struct Statement<'conn, R = ()> {
    conn: &'conn Connection,
    raw: RawStatement<'conn>,
    sql: String,
    status: StatementStatus,
    row: R,
    hooks: FailureHooks,
    last_error: Option<EngineError>,
}

impl<'conn, R: ExtractRow> Statement<'conn, R> {
    /// Prepare `sql` on `conn`.
    ///
    /// Preparation failure does not return an error: the statement starts out Failed, the
    /// engine hook fires once and [`Statement::is_ok`] is false.
    pub fn new(conn: &'conn Connection, sql: &str) -> Self {
        let mut stmt = Self {
            conn,
            raw: RawStatement::released(),
            sql: sql.to_owned(),
            status: StatementStatus::Ready,
            row: R::default(),
            hooks: conn.hooks().clone(),
            last_error: None,
        };

        let prepared = match conn.handle() {
            Some(handle) => RawStatement::prepare(handle, sql),
            None => Err(EngineError::misuse("prepare on a closed connection")),
        };
        match prepared {
            Ok(raw) => {
                let columns = raw.column_names().len();
                if columns != R::ARITY {
                    tracing::warn!(
                        sql,
                        columns,
                        arity = R::ARITY,
                        "column count does not match row tuple"
                    );
                }
                stmt.raw = raw;
                tracing::debug!(sql, "statement ready");
            }
            Err(err) => {
                stmt.fail(err, "failed to prepare statement");
            }
        }
        stmt
    }

    /// Prepare `sql` and bind `params`. A bind failure leaves the statement Failed.
    pub fn with_params<P: BindRow + ?Sized>(conn: &'conn Connection, sql: &str, params: &P) -> Self {
        let mut stmt = Self::new(conn, sql);
        if stmt.status == StatementStatus::Ready {
            if let Err(err) = stmt.bind(params) {
                tracing::debug!(sql, "bind at construction failed: {err}");
            }
        }
        stmt
    }

    /// Replace the failure hooks inherited from the connection.
    #[must_use]
    pub fn with_hooks(mut self, hooks: FailureHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Advance by one row. On a row the tuple is refreshed in place.
    ///
    /// # Errors
    /// `SqlTypedError::Usage` if the statement is Finished or Failed (no engine call is
    /// made); `SqlTypedError::Engine` if the engine fails, after which the statement is Failed.
    pub fn step(&mut self) -> Result<StepOutcome, SqlTypedError> {
        match self.status {
            StatementStatus::Finished => {
                return Err(self.usage("tried to step statement after finish"));
            }
            StatementStatus::Failed => {
                return Err(self.usage("tried to step statement after failure"));
            }
            StatementStatus::Ready | StatementStatus::Running => {}
        }

        let result = self.raw.step();
        match self.ensure(result, "failed to step statement")? {
            RawStep::Row => {
                self.row.extract_row(&self.raw.columns());
                if self.status == StatementStatus::Ready {
                    tracing::debug!(sql = %self.sql, "statement running");
                }
                self.status = StatementStatus::Running;
                Ok(StepOutcome::Row)
            }
            RawStep::Done => {
                self.status = StatementStatus::Finished;
                tracing::debug!(sql = %self.sql, steps = self.raw.steps(), "statement finished");
                Ok(StepOutcome::Done)
            }
        }
    }

    #[must_use]
    pub fn can_step(&self) -> bool {
        self.status.can_step()
    }

    /// Run a statement that is not expected to return rows.
    ///
    /// If the statement produces a row anyway, that row is kept as the current tuple and the
    /// statement stays Running.
    ///
    /// # Errors
    /// `SqlTypedError::Usage` if the statement is not Ready or produced a row;
    /// `SqlTypedError::Engine` if the engine fails.
    pub fn execute(&mut self) -> Result<(), SqlTypedError> {
        if self.status != StatementStatus::Ready {
            return Err(self.usage("tried to execute statement at invalid status"));
        }
        match self.step()? {
            StepOutcome::Done => Ok(()),
            StepOutcome::Row => Err(self.usage("got row in statement execute")),
        }
    }

    /// Run a statement that must return exactly one row and hand it back.
    ///
    /// # Errors
    /// `SqlTypedError::Usage` if the statement is not Ready, produced no row, or produced
    /// more than one; `SqlTypedError::Engine` if the engine fails.
    pub fn execute_single(&mut self) -> Result<&R, SqlTypedError> {
        if self.status != StatementStatus::Ready {
            return Err(self.usage("tried to execute statement at invalid status"));
        }
        if self.step()? == StepOutcome::Done {
            return Err(self.usage("got no row in statement execute"));
        }
        match self.step()? {
            StepOutcome::Done => Ok(&self.row),
            StepOutcome::Row => Err(self.usage("got more than one row in statement execute")),
        }
    }

    /// Bind a whole parameter tuple, starting at parameter 0.
    ///
    /// # Errors
    /// `SqlTypedError::Usage` unless the statement is Ready; `SqlTypedError::Engine` if the
    /// engine rejects a bind, after which the statement is Failed. Parameters bound before the
    /// failing one are not rolled back.
    pub fn bind<P: BindRow + ?Sized>(&mut self, params: &P) -> Result<(), SqlTypedError> {
        if self.status != StatementStatus::Ready {
            return Err(self.usage("tried to bind tuple in statement at invalid status"));
        }
        let arity = params.arity();
        if arity != self.raw.parameter_count() {
            tracing::debug!(
                sql = %self.sql,
                arity,
                declared = self.raw.parameter_count(),
                "parameter count does not match bound tuple"
            );
        }
        let result = params.bind_row(&mut BindTarget::new(&mut self.raw));
        self.ensure(result, "failed to bind parameters")
    }

    /// Bind one value into the 0-based parameter `index`.
    ///
    /// # Errors
    /// Same as [`Statement::bind`].
    pub fn bind_index<T: BindColumn + ?Sized>(
        &mut self,
        index: usize,
        value: &T,
    ) -> Result<(), SqlTypedError> {
        if self.status != StatementStatus::Ready {
            return Err(self.usage("tried to bind value in statement at invalid status"));
        }
        let result = value.bind(&mut BindTarget::new(&mut self.raw), index);
        self.ensure(result, "failed to bind parameter")
    }

    /// Iterate the remaining rows. See [`RowSequence`].
    pub fn rows(&mut self) -> RowSequence<'_, 'conn, R> {
        RowSequence::new(self)
    }
}

impl<'conn, R> Statement<'conn, R> {
    /// The current row, present only while the statement is Running.
    #[must_use]
    pub fn row(&self) -> Option<&R> {
        (self.status == StatementStatus::Running).then_some(&self.row)
    }

    #[must_use]
    pub fn status(&self) -> StatementStatus {
        self.status
    }

    /// False once an engine error has occurred.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status != StatementStatus::Failed
    }

    /// The engine error that failed this statement, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.raw.parameter_count()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.raw.column_names().len()
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.raw.column_names()
    }

    /// Number of step calls sent to the engine so far.
    #[must_use]
    pub fn engine_steps(&self) -> u64 {
        self.raw.steps()
    }

    #[must_use]
    pub fn hooks(&self) -> &FailureHooks {
        &self.hooks
    }

    pub(crate) fn is_running(&self) -> bool {
        self.status == StatementStatus::Running
    }

    pub(crate) fn current_row(&self) -> &R {
        &self.row
    }

    fn usage(&self, message: &str) -> SqlTypedError {
        tracing::warn!(sql = %self.sql, status = %self.status, "{message}");
        self.hooks.usage_failure(message);
        SqlTypedError::Usage(message.to_owned())
    }

    fn ensure<T>(&mut self, result: Result<T, EngineError>, context: &str) -> Result<T, SqlTypedError> {
        result.map_err(|err| self.fail(err, context))
    }

    fn fail(&mut self, err: EngineError, context: &str) -> SqlTypedError {
        self.report_engine(&err, context);
        self.status = StatementStatus::Failed;
        if let Err(finalize_err) = self.raw.finalize() {
            self.report_engine(&finalize_err, "failed to finalize statement");
        }
        self.last_error = Some(err.clone());
        SqlTypedError::engine(context, err)
    }

    fn report_engine(&self, err: &EngineError, context: &str) {
        tracing::error!(code = err.code, sql = %self.sql, "{context}: {}", err.message);
        self.hooks
            .engine_failure(err.code, &format!("{context}: {}", err.message));
        self.conn.record_error(err);
    }
}

impl<R> Drop for Statement<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.raw.finalize() {
            tracing::debug!(sql = %self.sql, code = err.code, "finalize on drop failed: {}", err.message);
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Statement<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("status", &self.status)
            .field("row", &self.row)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
