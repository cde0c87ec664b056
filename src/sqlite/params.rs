use rusqlite::types::ValueRef;

use crate::types::ColumnValue;

/// Borrow a [`ColumnValue`] as an engine value.
#[must_use]
pub fn column_value_ref(value: &ColumnValue) -> ValueRef<'_> {
    match value {
        ColumnValue::Null => ValueRef::Null,
        ColumnValue::Integer(i) => ValueRef::Integer(*i),
        ColumnValue::Real(f) => ValueRef::Real(*f),
        ColumnValue::Text(s) => ValueRef::Text(s.as_bytes()),
        ColumnValue::Blob(b) => ValueRef::Blob(b),
    }
}

/// Copy an engine value out of the current row. Text that is not valid UTF-8 is decoded
/// lossily.
#[must_use]
pub fn sqlite_to_column_value(value: ValueRef<'_>) -> ColumnValue {
    match value {
        ValueRef::Null => ColumnValue::Null,
        ValueRef::Integer(i) => ColumnValue::Integer(i),
        ValueRef::Real(f) => ColumnValue::Real(f),
        ValueRef::Text(bytes) => ColumnValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => ColumnValue::Blob(bytes.to_vec()),
    }
}
