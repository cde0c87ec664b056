use serde_json::Value as JsonValue;

use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn};

impl BindColumn for JsonValue {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        let encoded = self.to_string();
        target.bind_text(index, encoded.as_bytes())
    }
}

impl ExtractColumn for JsonValue {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        if source.column_type(index) == StorageClass::Null {
            *slot = JsonValue::Null;
            return;
        }
        let text = source.column_text(index);
        *slot = serde_json::from_str(&text).unwrap_or_else(|_| JsonValue::String(text.into_owned()));
    }
}
