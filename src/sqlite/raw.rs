//! The engine boundary: one prepared query and the primitive calls made against it.
//!
//! Indexes are 0-based here and translated to the engine's 1-based parameter indexes in
//! exactly one place ([`RawStatement::bind_value`]).

use rusqlite::types::{ToSqlOutput, ValueRef};

use crate::codec::ColumnSource;
use crate::error::EngineError;
use crate::types::ColumnValue;

use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawStep {
    Row,
    Done,
}

enum Handle<'conn> {
    /// Prepared, accepting binds, not stepped yet.
    Prepared(rusqlite::Statement<'conn>),
    /// At least one step was issued.
    Stepping(Cursor<'conn>),
    /// Finalized, or never prepared.
    Released,
}

/// Owns the rusqlite statement and, once stepping starts, the cursor over it.
pub(crate) struct RawStatement<'conn> {
    handle: Handle<'conn>,
    current: Vec<ColumnValue>,
    parameter_count: usize,
    column_names: Vec<String>,
    steps: u64,
}

impl<'conn> RawStatement<'conn> {
    pub(crate) fn prepare(
        conn: &'conn rusqlite::Connection,
        sql: &str,
    ) -> Result<Self, EngineError> {
        let stmt = conn.prepare(sql)?;
        let parameter_count = stmt.parameter_count();
        let column_names = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        tracing::trace!(sql, parameter_count, "prepared statement");
        Ok(Self {
            handle: Handle::Prepared(stmt),
            current: Vec::new(),
            parameter_count,
            column_names,
            steps: 0,
        })
    }

    /// A statement that never got a handle (prepare failed).
    pub(crate) fn released() -> Self {
        Self {
            handle: Handle::Released,
            current: Vec::new(),
            parameter_count: 0,
            column_names: Vec::new(),
            steps: 0,
        }
    }

    pub(crate) fn bind_value(&mut self, index: usize, value: ValueRef<'_>) -> Result<(), EngineError> {
        let stmt = match &mut self.handle {
            Handle::Prepared(stmt) => stmt,
            Handle::Stepping(_) => return Err(EngineError::misuse("bind on a stepped statement")),
            Handle::Released => return Err(EngineError::misuse("bind on a released statement")),
        };
        tracing::trace!(index, kind = ?value.data_type(), "bind parameter");
        stmt.raw_bind_parameter(index + 1, ToSqlOutput::Borrowed(value))?;
        Ok(())
    }

    /// Issue one engine step. The first call opens the cursor, freezing the bound parameters.
    pub(crate) fn step(&mut self) -> Result<RawStep, EngineError> {
        if matches!(self.handle, Handle::Prepared(_)) {
            self.handle = match std::mem::replace(&mut self.handle, Handle::Released) {
                Handle::Prepared(stmt) => Handle::Stepping(Cursor::open(stmt)),
                other => other,
            };
        }
        let Handle::Stepping(cursor) = &mut self.handle else {
            return Err(EngineError::misuse("step on a released statement"));
        };
        self.steps += 1;
        tracing::trace!(step = self.steps, "engine step");
        match cursor.advance(self.column_names.len(), &mut self.current) {
            Ok(true) => Ok(RawStep::Row),
            Ok(false) => Ok(RawStep::Done),
            Err(err) => {
                self.current.clear();
                Err(err)
            }
        }
    }

    /// Columns of the row produced by the last successful step.
    pub(crate) fn columns(&self) -> ColumnSource<'_> {
        ColumnSource::new(&self.current)
    }

    /// Release the handle. Safe to call any number of times.
    pub(crate) fn finalize(&mut self) -> Result<(), EngineError> {
        self.current.clear();
        let stmt = match std::mem::replace(&mut self.handle, Handle::Released) {
            Handle::Prepared(stmt) => stmt,
            Handle::Stepping(cursor) => cursor.close(),
            Handle::Released => return Ok(()),
        };
        tracing::trace!("finalize statement");
        stmt.finalize().map_err(EngineError::from)
    }

    pub(crate) fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub(crate) fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Engine step calls issued so far.
    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }
}
