//! Positional composition of column codecs over tuples.
//!
//! Column `k` of a tuple is parameter/column `k` (0-based). Binding stops at the first
//! failing column and leaves earlier binds in place. Extraction never checks the row width:
//! a tuple wider than the row reads the missing columns as NULL.

use crate::codec::{BindColumn, BindTarget, ColumnSource, ExtractColumn};
use crate::error::EngineError;
use crate::types::ColumnValue;

/// A parameter set bound in one call.
pub trait BindRow {
    /// Number of parameters this value binds.
    fn arity(&self) -> usize;

    /// # Errors
    /// Returns the status of the first bind the engine rejected.
    fn bind_row(&self, target: &mut BindTarget<'_, '_>) -> Result<(), EngineError>;
}

/// The shape of one result row.
pub trait ExtractRow: Default {
    const ARITY: usize;

    fn extract_row(&mut self, source: &ColumnSource<'_>);
}

macro_rules! impl_row_codec {
    ($arity:expr; $($T:ident : $idx:tt),*) => {
        impl<$($T: BindColumn),*> BindRow for ($($T,)*) {
            fn arity(&self) -> usize {
                $arity
            }

            #[allow(unused_variables)]
            fn bind_row(&self, target: &mut BindTarget<'_, '_>) -> Result<(), EngineError> {
                $( self.$idx.bind(target, $idx)?; )*
                Ok(())
            }
        }

        impl<$($T: ExtractColumn + Default),*> ExtractRow for ($($T,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn extract_row(&mut self, source: &ColumnSource<'_>) {
                $( <$T as ExtractColumn>::extract(&mut self.$idx, source, $idx); )*
            }
        }
    };
}

impl_row_codec!(0;);
impl_row_codec!(1; A:0);
impl_row_codec!(2; A:0, B:1);
impl_row_codec!(3; A:0, B:1, C:2);
impl_row_codec!(4; A:0, B:1, C:2, D:3);
impl_row_codec!(5; A:0, B:1, C:2, D:3, E:4);
impl_row_codec!(6; A:0, B:1, C:2, D:3, E:4, F:5);
impl_row_codec!(7; A:0, B:1, C:2, D:3, E:4, F:5, G:6);
impl_row_codec!(8; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7);
impl_row_codec!(9; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8);
impl_row_codec!(10; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9);
impl_row_codec!(11; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10);
impl_row_codec!(12; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10, L:11);

// Dynamic parameter lists for callers that only know the values at runtime.
impl BindRow for [ColumnValue] {
    fn arity(&self) -> usize {
        self.len()
    }

    fn bind_row(&self, target: &mut BindTarget<'_, '_>) -> Result<(), EngineError> {
        for (index, value) in self.iter().enumerate() {
            value.bind(target, index)?;
        }
        Ok(())
    }
}

impl BindRow for Vec<ColumnValue> {
    fn arity(&self) -> usize {
        self.len()
    }

    fn bind_row(&self, target: &mut BindTarget<'_, '_>) -> Result<(), EngineError> {
        self.as_slice().bind_row(target)
    }
}
