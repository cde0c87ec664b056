//! Column codecs: how one host type is bound into a parameter slot and read back out of a
//! result column.
//!
//! | host type | storage class |
//! |---|---|
//! | `Option<T>` | NULL when `None`, otherwise whatever `T` uses |
//! | integers, `bool` | INTEGER (through `i64`) |
//! | `f32`, `f64` | REAL (through `f64`) |
//! | `String`, `str`, `CStr`, `CString` | TEXT |
//! | `WideString<u16/u32>`, `[u16]`, `[u32]`, `[u16; N]`, `[u32; N]` | BLOB |
//! | `Vec<u8>`, `[u8]`, `[u8; N]` | BLOB |
//! | `chrono::NaiveDateTime` | TEXT (feature `chrono`) |
//! | `serde_json::Value` | TEXT (feature `json`) |
//! | `ColumnValue` | its own class |
//!
//! Binding reports an [`EngineError`]; extraction never fails and follows the engine's
//! conversion rules when the stored class differs from the requested one.

use std::borrow::Cow;

use rusqlite::types::ValueRef;

use crate::error::EngineError;
use crate::sqlite::params::column_value_ref;
use crate::sqlite::raw::RawStatement;
use crate::types::{ColumnValue, StorageClass};

mod blob;
#[cfg(feature = "chrono")]
mod datetime;
#[cfg(feature = "json")]
mod json;
mod numeric;
mod optional;
mod text;
mod wide;

pub use optional::Null;
pub use wide::{WideString, WideUnit};

/// Binds `self` into the 0-based parameter `index`.
pub trait BindColumn {
    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError>;
}

/// Reads the 0-based column `index` of the current row into a caller-owned slot.
pub trait ExtractColumn {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize);
}

/// A type that can be both bound and extracted.
pub trait ColumnCodec: BindColumn + ExtractColumn {}

impl<T: BindColumn + ExtractColumn> ColumnCodec for T {}

impl<T: BindColumn + ?Sized> BindColumn for &T {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        (**self).bind(target, index)
    }
}

impl<T: BindColumn + ?Sized> BindColumn for Box<T> {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        (**self).bind(target, index)
    }
}

/// The parameter side of a prepared statement, as seen by a codec.
pub struct BindTarget<'a, 'conn> {
    raw: &'a mut RawStatement<'conn>,
}

impl<'a, 'conn> BindTarget<'a, 'conn> {
    pub(crate) fn new(raw: &'a mut RawStatement<'conn>) -> Self {
        Self { raw }
    }

    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_null(&mut self, index: usize) -> Result<(), EngineError> {
        self.raw.bind_value(index, ValueRef::Null)
    }

    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_int64(&mut self, index: usize, value: i64) -> Result<(), EngineError> {
        self.raw.bind_value(index, ValueRef::Integer(value))
    }

    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_double(&mut self, index: usize, value: f64) -> Result<(), EngineError> {
        self.raw.bind_value(index, ValueRef::Real(value))
    }

    /// Bind a length-delimited copy of `bytes` as TEXT.
    ///
    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_text(&mut self, index: usize, bytes: &[u8]) -> Result<(), EngineError> {
        self.raw.bind_value(index, ValueRef::Text(bytes))
    }

    /// Bind a length-delimited copy of `bytes` as BLOB.
    ///
    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_blob(&mut self, index: usize, bytes: &[u8]) -> Result<(), EngineError> {
        self.raw.bind_value(index, ValueRef::Blob(bytes))
    }

    /// # Errors
    /// Returns the engine's status when it rejects the bind.
    pub fn bind_value(&mut self, index: usize, value: &ColumnValue) -> Result<(), EngineError> {
        self.raw.bind_value(index, column_value_ref(value))
    }

    /// Number of parameters the prepared query declares.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.raw.parameter_count()
    }
}

static NULL_VALUE: ColumnValue = ColumnValue::Null;

/// The current result row, as seen by a codec. Reads past the row width behave like NULL
/// columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSource<'a> {
    values: &'a [ColumnValue],
}

impl<'a> ColumnSource<'a> {
    #[must_use]
    pub fn new(values: &'a [ColumnValue]) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn column_value(&self, index: usize) -> &'a ColumnValue {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }

    #[must_use]
    pub fn column_type(&self, index: usize) -> StorageClass {
        self.column_value(index).storage_class()
    }

    #[must_use]
    pub fn column_int64(&self, index: usize) -> i64 {
        self.column_value(index).to_i64()
    }

    #[must_use]
    pub fn column_double(&self, index: usize) -> f64 {
        self.column_value(index).to_f64()
    }

    #[must_use]
    pub fn column_text(&self, index: usize) -> Cow<'a, str> {
        self.column_value(index).text_view()
    }

    #[must_use]
    pub fn column_blob(&self, index: usize) -> Cow<'a, [u8]> {
        self.column_value(index).blob_view()
    }

    /// Byte count the engine reports for the column; authoritative for blob extraction.
    #[must_use]
    pub fn column_bytes(&self, index: usize) -> usize {
        self.column_value(index).byte_len()
    }

    pub(crate) fn note_null_read(&self, index: usize, wanted: StorageClass) {
        if self.column_type(index) == StorageClass::Null {
            tracing::debug!(index, %wanted, "NULL read through a non-optional column");
        }
    }
}

impl BindColumn for ColumnValue {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_value(index, self)
    }
}

impl ExtractColumn for ColumnValue {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        slot.clone_from(source.column_value(index));
    }
}

/// Copy into a fixed buffer exactly the reported number of units, clamped to capacity, with
/// the rest zeroed.
pub(crate) fn copy_exact<T: Copy + Default>(
    slot: &mut [T],
    units: impl Iterator<Item = T>,
    reported: usize,
) {
    let capacity = slot.len();
    if reported > capacity {
        tracing::warn!(reported, capacity, "column truncated into fixed buffer");
    }
    let mut written = 0;
    for (dst, unit) in slot.iter_mut().zip(units.take(reported)) {
        *dst = unit;
        written += 1;
    }
    for dst in &mut slot[written..] {
        *dst = T::default();
    }
}
