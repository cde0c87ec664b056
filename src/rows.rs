//! Single-pass row iteration over a [`Statement`].
//!
//! [`RowSequence`] lends each row out of the statement's own tuple, so no row is copied. The
//! borrow ends at the next pull, which the compiler enforces:
//!
//! ```compile_fail
//! use sql_typed_core::prelude::*;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let mut stmt = conn.prepare::<(i64,)>("SELECT 1 UNION ALL SELECT 2");
//! let mut rows = stmt.rows();
//! let first = rows.next().unwrap();
//! let second = rows.next().unwrap();
//! assert_ne!(first, second);
//! ```
//!
//! Use [`RowSequence::cloned`] (or a `for` loop over `&mut Statement`) when rows need to
//! outlive the pull.

use std::iter::FusedIterator;

use crate::statement::{Statement, StatementStatus, StepOutcome};
use crate::tuple::ExtractRow;

/// Lending cursor over the remaining rows of a statement.
///
/// The sequence ends as soon as the statement is no longer Running; an engine error ends it
/// the same way as the last row, so check [`Statement::is_ok`] afterwards. Pulls after the end
/// return `None` without calling the engine.
pub struct RowSequence<'s, 'conn, R> {
    stmt: &'s mut Statement<'conn, R>,
    started: bool,
}

impl<'s, 'conn, R: ExtractRow> RowSequence<'s, 'conn, R> {
    pub(crate) fn new(stmt: &'s mut Statement<'conn, R>) -> Self {
        Self {
            stmt,
            started: false,
        }
    }

    /// Pull the next row.
    ///
    /// The first pull steps a Ready statement, or yields the row a Running statement already
    /// holds.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&R> {
        let first = !self.started;
        self.started = true;

        match self.stmt.status() {
            StatementStatus::Running if first => {}
            StatementStatus::Ready | StatementStatus::Running => {
                if !matches!(self.stmt.step(), Ok(StepOutcome::Row)) {
                    return None;
                }
            }
            StatementStatus::Finished | StatementStatus::Failed => return None,
        }
        debug_assert!(self.stmt.is_running());
        Some(self.stmt.current_row())
    }

    /// Copy each row out so it can be kept.
    pub fn cloned(self) -> ClonedRows<'s, 'conn, R>
    where
        R: Clone,
    {
        ClonedRows { inner: self }
    }
}

/// Owning adapter over a [`RowSequence`]; see [`RowSequence::cloned`].
pub struct ClonedRows<'s, 'conn, R> {
    inner: RowSequence<'s, 'conn, R>,
}

impl<R: ExtractRow + Clone> Iterator for ClonedRows<'_, '_, R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        self.inner.next().cloned()
    }
}

impl<R: ExtractRow + Clone> FusedIterator for ClonedRows<'_, '_, R> {}

impl<'s, 'conn, R: ExtractRow + Clone> IntoIterator for &'s mut Statement<'conn, R> {
    type Item = R;
    type IntoIter = ClonedRows<'s, 'conn, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows().cloned()
    }
}

#[cfg(test)]
mod tests {
    use crate::sqlite::Connection;
    use crate::statement::StatementStatus;

    #[test]
    fn yields_each_row_then_stops_for_good() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare::<(i64,)>("SELECT 1 UNION ALL SELECT 2");
        let mut seen = Vec::new();
        let mut rows = stmt.rows();
        while let Some((n,)) = rows.next() {
            seen.push(*n);
        }
        assert!(rows.next().is_none());
        assert_eq!(seen, [1, 2]);

        let steps = stmt.engine_steps();
        assert!(stmt.rows().next().is_none());
        assert_eq!(stmt.engine_steps(), steps);
        assert_eq!(stmt.status(), StatementStatus::Finished);
    }

    #[test]
    fn running_statement_yields_current_row_first() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare::<(i64,)>("SELECT 1 UNION ALL SELECT 2");
        assert!(stmt.execute().is_err());
        let all: Vec<(i64,)> = stmt.rows().cloned().collect();
        assert_eq!(all, [(1,), (2,)]);
    }

    #[test]
    fn for_loop_over_statement_clones_rows() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare::<(String,)>("SELECT 'a' UNION ALL SELECT 'b'");
        let mut names = Vec::new();
        for (name,) in &mut stmt {
            names.push(name);
        }
        assert_eq!(names, ["a", "b"]);
    }
}
