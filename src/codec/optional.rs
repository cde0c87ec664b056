use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn};

/// Binds SQL NULL. Bind-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl BindColumn for Null {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_null(index)
    }
}

impl<T: BindColumn> BindColumn for Option<T> {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        match self {
            Some(value) => value.bind(target, index),
            None => target.bind_null(index),
        }
    }
}

// NULL is checked before the inner codec ever sees the column.
impl<T: ExtractColumn + Default> ExtractColumn for Option<T> {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        if source.column_type(index) == StorageClass::Null {
            *slot = None;
            return;
        }
        T::extract(slot.get_or_insert_with(T::default), source, index);
    }
}
