use std::borrow::Cow;
use std::ffi::{CStr, CString};

use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn};

impl BindColumn for str {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_text(index, self.as_bytes())
    }
}

impl BindColumn for String {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        self.as_str().bind(target, index)
    }
}

impl BindColumn for Cow<'_, str> {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        self.as_ref().bind(target, index)
    }
}

impl ExtractColumn for String {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Text);
        slot.clear();
        slot.push_str(&source.column_text(index));
    }
}

// Terminated strings: only the bytes before the NUL reach the engine.
impl BindColumn for CStr {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_text(index, self.to_bytes())
    }
}

impl BindColumn for CString {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        self.as_c_str().bind(target, index)
    }
}

impl ExtractColumn for CString {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Text);
        let bytes = source.column_blob(index);
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        *slot = CString::new(&bytes[..end]).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;

    #[test]
    fn string_extraction_reuses_the_slot() {
        let values = [ColumnValue::Text("fresh".into())];
        let mut slot = String::from("stale contents");
        String::extract(&mut slot, &ColumnSource::new(&values), 0);
        assert_eq!(slot, "fresh");
    }

    #[test]
    fn cstring_extraction_stops_at_nul() {
        let values = [ColumnValue::Text("abc\0def".into())];
        let mut slot = CString::default();
        CString::extract(&mut slot, &ColumnSource::new(&values), 0);
        assert_eq!(slot.as_bytes(), b"abc");
    }
}
