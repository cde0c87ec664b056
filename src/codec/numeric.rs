use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn};

// Every integral type goes through i64 with two's-complement casts, so u64 values above
// i64::MAX come back unchanged.
macro_rules! integral_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BindColumn for $ty {
                #[allow(clippy::cast_possible_wrap, clippy::cast_lossless, trivial_numeric_casts)]
                fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
                    target.bind_int64(index, *self as i64)
                }
            }

            impl ExtractColumn for $ty {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    trivial_numeric_casts
                )]
                fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
                    source.note_null_read(index, StorageClass::Integer);
                    *slot = source.column_int64(index) as $ty;
                }
            }
        )*
    };
}

integral_codec!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl BindColumn for bool {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_int64(index, i64::from(*self))
    }
}

impl ExtractColumn for bool {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Integer);
        *slot = source.column_int64(index) != 0;
    }
}

impl BindColumn for f64 {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_double(index, *self)
    }
}

impl ExtractColumn for f64 {
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Real);
        *slot = source.column_double(index);
    }
}

impl BindColumn for f32 {
    fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
        target.bind_double(index, f64::from(*self))
    }
}

impl ExtractColumn for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
        source.note_null_read(index, StorageClass::Real);
        *slot = source.column_double(index) as f32;
    }
}
