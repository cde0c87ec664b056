//! A prepared statement paired with the engine cursor stepping it.
//!
//! rusqlite only steps a statement through a `Rows` value that mutably borrows it, so the two
//! are kept together in one self-referencing struct for as long as the statement runs.

// `#[self_referencing]` expands to unsafe code.
#![allow(unsafe_code)]

use ouroboros::self_referencing;

use crate::error::EngineError;
use crate::types::ColumnValue;

use super::query::sqlite_extract_value;

#[self_referencing]
pub(crate) struct Cursor<'conn> {
    stmt: rusqlite::Statement<'conn>,
    #[borrows(mut stmt)]
    #[not_covariant]
    rows: rusqlite::Rows<'this>,
}

impl<'conn> Cursor<'conn> {
    /// Start stepping `stmt`. Parameters must already be bound; no engine step is issued yet.
    pub(crate) fn open(stmt: rusqlite::Statement<'conn>) -> Self {
        Cursor::new(stmt, |stmt| stmt.raw_query())
    }

    /// Issue exactly one engine step. On a row, its first `width` columns replace the
    /// contents of `out` and `true` is returned; `false` means the engine is done.
    pub(crate) fn advance(
        &mut self,
        width: usize,
        out: &mut Vec<ColumnValue>,
    ) -> Result<bool, EngineError> {
        out.clear();
        self.with_rows_mut(|rows| -> Result<bool, EngineError> {
            let Some(row) = rows.next()? else {
                return Ok(false);
            };
            for idx in 0..width {
                out.push(sqlite_extract_value(row, idx)?);
            }
            Ok(true)
        })
    }

    /// Drop the cursor (resetting the statement) and hand the statement back.
    pub(crate) fn close(self) -> rusqlite::Statement<'conn> {
        self.into_heads().stmt
    }
}
