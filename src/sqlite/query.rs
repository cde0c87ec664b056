use crate::error::EngineError;
use crate::types::ColumnValue;

use super::params::sqlite_to_column_value;

/// Extract a `ColumnValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `EngineError` if the engine cannot produce the column.
pub(crate) fn sqlite_extract_value(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<ColumnValue, EngineError> {
    let value = row.get_ref(idx)?;
    Ok(sqlite_to_column_value(value))
}
