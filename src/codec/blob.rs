use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn, copy_exact};

impl BindColumn for [u8] {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_blob(index, self)
    }
}

impl BindColumn for Vec<u8> {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_blob(index, self)
    }
}

impl ExtractColumn for Vec<u8> {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Blob);
        let bytes = source.column_blob(index);
        slot.clear();
        slot.extend_from_slice(&bytes[..source.column_bytes(index)]);
    }
}

impl<const N: usize> BindColumn for [u8; N] {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_blob(index, self)
    }
}

impl<const N: usize> ExtractColumn for [u8; N] {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Blob);
        let bytes = source.column_blob(index);
        copy_exact(slot, bytes.iter().copied(), source.column_bytes(index));
    }
}
