//! Wide character strings. The engine has no wide text type, so these are stored as BLOBs of
//! `unit_count * unit_width` native-endian bytes.
//!
//! Extraction is deliberately asymmetric with binding: a growable [`WideString`] is read up
//! to the first zero code unit, while binding writes every unit. A value with an embedded
//! zero unit therefore comes back truncated. Fixed buffers (`[u16; N]`, `[u32; N]`) take
//! exactly the byte count the engine reports and are not affected.

use std::fmt;

use crate::error::EngineError;
use crate::types::StorageClass;

use super::{BindColumn, BindTarget, ColumnSource, ExtractColumn, copy_exact};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A code unit of a wide string.
pub trait WideUnit: Copy + Default + PartialEq + fmt::Debug + sealed::Sealed {
    /// Width of one unit in bytes.
    const WIDTH: usize;

    fn write_ne(self, out: &mut Vec<u8>);

    /// Decode one unit from exactly `WIDTH` bytes.
    fn read_ne(chunk: &[u8]) -> Self;

    fn is_zero(self) -> bool {
        self == Self::default()
    }
}

impl WideUnit for u16 {
    const WIDTH: usize = 2;

    fn write_ne(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_ne_bytes());
    }

    fn read_ne(chunk: &[u8]) -> Self {
        u16::from_ne_bytes([chunk[0], chunk[1]])
    }
}

impl WideUnit for u32 {
    const WIDTH: usize = 4;

    fn write_ne(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_ne_bytes());
    }

    fn read_ne(chunk: &[u8]) -> Self {
        u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
    }
}

/// Growable string of UTF-16 (`u16`) or UTF-32 (`u32`) code units.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString<C: WideUnit = u16> {
    units: Vec<C>,
}

impl<C: WideUnit> WideString<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    #[must_use]
    pub fn from_units(units: Vec<C>) -> Self {
        Self { units }
    }

    #[must_use]
    pub fn as_units(&self) -> &[C] {
        &self.units
    }

    #[must_use]
    pub fn into_units(self) -> Vec<C> {
        self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Size in bytes once bound.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.units.len() * C::WIDTH
    }
}

impl WideString<u16> {
    #[must_use]
    pub fn from_str_utf16(s: &str) -> Self {
        Self::from_units(s.encode_utf16().collect())
    }

    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl WideString<u32> {
    #[must_use]
    pub fn from_str_utf32(s: &str) -> Self {
        Self::from_units(s.chars().map(u32::from).collect())
    }

    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        self.units
            .iter()
            .map(|u| char::from_u32(*u).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl From<&str> for WideString<u16> {
    fn from(value: &str) -> Self {
        Self::from_str_utf16(value)
    }
}

impl From<&str> for WideString<u32> {
    fn from(value: &str) -> Self {
        Self::from_str_utf32(value)
    }
}

impl<C: WideUnit> fmt::Debug for WideString<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WideString").field(&self.units).finish()
    }
}

fn encode_units<C: WideUnit>(units: &[C]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(units.len() * C::WIDTH);
    for unit in units {
        unit.write_ne(&mut bytes);
    }
    bytes
}

// A trailing partial unit is dropped.
fn decode_units<'a, C: WideUnit + 'a>(bytes: &'a [u8]) -> impl Iterator<Item = C> + 'a {
    bytes.chunks_exact(C::WIDTH).map(C::read_ne)
}

macro_rules! wide_codec {
    ($($unit:ty),*) => {
        $(
            impl BindColumn for [$unit] {
                fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
                    target.bind_blob(index, &encode_units(self))
                }
            }

            impl BindColumn for WideString<$unit> {
                fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
                    self.units.as_slice().bind(target, index)
                }
            }

            impl ExtractColumn for WideString<$unit> {
                fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
                    source.note_null_read(index, StorageClass::Blob);
                    let bytes = source.column_blob(index);
                    // Reads to the first zero unit, not to the reported length.
                    slot.units.clear();
                    slot.units
                        .extend(decode_units::<$unit>(&bytes).take_while(|u| !u.is_zero()));
                }
            }

            impl<const N: usize> BindColumn for [$unit; N] {
                fn bind(&self, target: &mut BindTarget<'_, '_>, index: usize) -> Result<(), EngineError> {
                    self.as_slice().bind(target, index)
                }
            }

            impl<const N: usize> ExtractColumn for [$unit; N] {
                fn extract(slot: &mut Self, source: &ColumnSource<'_>, index: usize) {
                    source.note_null_read(index, StorageClass::Blob);
                    let bytes = source.column_blob(index);
                    let reported = source.column_bytes(index) / <$unit as WideUnit>::WIDTH;
                    copy_exact(slot, decode_units::<$unit>(&bytes), reported);
                }
            }
        )*
    };
}

wide_codec!(u16, u32);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;

    #[test]
    fn encoding_is_unit_count_times_width() {
        let wide = WideString::<u32>::from("héllo");
        assert_eq!(encode_units(wide.as_units()).len(), wide.byte_len());
        assert_eq!(wide.byte_len(), 5 * 4);
    }

    #[test]
    fn growable_extraction_stops_at_zero_unit() {
        let bytes = encode_units(&[0x41_u16, 0, 0x42]);
        let values = [ColumnValue::Blob(bytes)];
        let mut slot = WideString::<u16>::new();
        WideString::<u16>::extract(&mut slot, &ColumnSource::new(&values), 0);
        assert_eq!(slot.as_units(), &[0x41]);
    }

    #[test]
    fn fixed_extraction_copies_reported_units_past_zero() {
        let bytes = encode_units(&[0x41_u16, 0, 0x42]);
        let values = [ColumnValue::Blob(bytes)];
        let mut slot = [0xffff_u16; 5];
        <[u16; 5]>::extract(&mut slot, &ColumnSource::new(&values), 0);
        assert_eq!(slot, [0x41, 0, 0x42, 0, 0]);
    }

    #[test]
    fn trailing_partial_unit_is_dropped() {
        let values = [ColumnValue::Blob(vec![0x41, 0x00, 0x42])];
        let mut slot = [0_u16; 2];
        <[u16; 2]>::extract(&mut slot, &ColumnSource::new(&values), 0);
        assert_eq!(slot, [u16::from_ne_bytes([0x41, 0x00]), 0]);
    }

    #[test]
    fn utf32_round_trips_through_strings() {
        let wide = WideString::<u32>::from_str_utf32("naïve 🦀");
        assert_eq!(wide.to_string_lossy(), "naïve 🦀");
    }
}
