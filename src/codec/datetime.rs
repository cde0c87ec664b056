use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn};

const BIND_FORMAT: &str = "%F %T%.f";
const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

impl BindColumn for NaiveDateTime {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        let formatted = self.format(BIND_FORMAT).to_string();
        target.bind_text(index, formatted.as_bytes())
    }
}

// Text that does not parse leaves the slot untouched.
impl ExtractColumn for NaiveDateTime {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Text);
        let text = source.column_text(index);
        match PARSE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
        {
            Some(parsed) => *slot = parsed,
            None => tracing::debug!(index, text = %text, "column is not a timestamp"),
        }
    }
}
