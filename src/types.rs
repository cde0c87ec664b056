use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The engine's native column types. Nothing else is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageClass::Null => "NULL",
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

/// One column value as the engine sees it.
///
/// Produced when a row is read and accepted when binding, so code that does not know its
/// column types up front can still move values through a statement:
/// ```rust
/// use sql_typed_core::prelude::*;
///
/// let params = vec![
///     ColumnValue::Integer(1),
///     ColumnValue::Text("alice".into()),
///     ColumnValue::Null,
/// ];
/// assert_eq!(params[1].storage_class(), StorageClass::Text);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ColumnValue {
    /// NULL value
    #[default]
    Null,
    /// Integer value (64-bit)
    Integer(i64),
    /// Floating point value (64-bit)
    Real(f64),
    /// Text value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
}

impl ColumnValue {
    #[must_use]
    pub fn storage_class(&self) -> StorageClass {
        match self {
            ColumnValue::Null => StorageClass::Null,
            ColumnValue::Integer(_) => StorageClass::Integer,
            ColumnValue::Real(_) => StorageClass::Real,
            ColumnValue::Text(_) => StorageClass::Text,
            ColumnValue::Blob(_) => StorageClass::Blob,
        }
    }

    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        if let ColumnValue::Integer(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        if let ColumnValue::Real(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let ColumnValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let ColumnValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Integer view with the engine's conversion rules: reals truncate toward zero, text and
    /// blobs parse their leading number, NULL reads as 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> i64 {
        match self {
            ColumnValue::Null => 0,
            ColumnValue::Integer(i) => *i,
            ColumnValue::Real(f) => *f as i64,
            ColumnValue::Text(s) => parse_leading_integer(s),
            ColumnValue::Blob(b) => parse_leading_integer(&String::from_utf8_lossy(b)),
        }
    }

    /// Real view with the engine's conversion rules; NULL reads as 0.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        match self {
            ColumnValue::Null => 0.0,
            ColumnValue::Integer(i) => *i as f64,
            ColumnValue::Real(f) => *f,
            ColumnValue::Text(s) => parse_leading_real(s),
            ColumnValue::Blob(b) => parse_leading_real(&String::from_utf8_lossy(b)),
        }
    }

    /// Text view. Numbers are rendered the way the engine renders them, blobs are decoded
    /// lossily, NULL is empty.
    #[must_use]
    pub fn text_view(&self) -> Cow<'_, str> {
        match self {
            ColumnValue::Null => Cow::Borrowed(""),
            ColumnValue::Integer(i) => Cow::Owned(i.to_string()),
            ColumnValue::Real(f) => Cow::Owned(render_real(*f)),
            ColumnValue::Text(s) => Cow::Borrowed(s.as_str()),
            ColumnValue::Blob(b) => String::from_utf8_lossy(b),
        }
    }

    /// Byte view: blobs and text as stored, numbers as their text rendering.
    #[must_use]
    pub fn blob_view(&self) -> Cow<'_, [u8]> {
        match self {
            ColumnValue::Blob(b) => Cow::Borrowed(b.as_slice()),
            ColumnValue::Text(s) => Cow::Borrowed(s.as_bytes()),
            ColumnValue::Null => Cow::Borrowed(&[]),
            other => match other.text_view() {
                Cow::Borrowed(s) => Cow::Owned(s.as_bytes().to_vec()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        }
    }

    /// Number of bytes the engine reports for this value (`sqlite3_column_bytes`).
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            ColumnValue::Null => 0,
            ColumnValue::Text(s) => s.len(),
            ColumnValue::Blob(b) => b.len(),
            other => other.text_view().len(),
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Real(value)
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(value: Vec<u8>) -> Self {
        ColumnValue::Blob(value)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ColumnValue::Null, Into::into)
    }
}

fn leading_number(s: &str) -> &str {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if !seen_exp && end > 0 => {
                seen_exp = true;
                if matches!(bytes.get(end + 1), Some(b'+' | b'-')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    trimmed[..end].trim_end_matches(['e', 'E', '+', '-'])
}

#[allow(clippy::cast_possible_truncation)]
fn parse_leading_integer(s: &str) -> i64 {
    let number = leading_number(s);
    number
        .parse::<i64>()
        .or_else(|_| number.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

fn parse_leading_real(s: &str) -> f64 {
    leading_number(s).parse::<f64>().unwrap_or(0.0)
}

// SQLite prints integral reals with a trailing ".0".
fn render_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_view_follows_engine_coercion() {
        assert_eq!(ColumnValue::Null.to_i64(), 0);
        assert_eq!(ColumnValue::Real(-3.9).to_i64(), -3);
        assert_eq!(ColumnValue::Text("  42abc".into()).to_i64(), 42);
        assert_eq!(ColumnValue::Text("1e3".into()).to_i64(), 1000);
        assert_eq!(ColumnValue::Text("abc".into()).to_i64(), 0);
        assert_eq!(ColumnValue::Blob(b"-7".to_vec()).to_i64(), -7);
    }

    #[test]
    fn real_view_follows_engine_coercion() {
        assert!((ColumnValue::Integer(2).to_f64() - 2.0).abs() < f64::EPSILON);
        assert!((ColumnValue::Text("2.5 apples".into()).to_f64() - 2.5).abs() < f64::EPSILON);
        assert!(ColumnValue::Null.to_f64().abs() < f64::EPSILON);
    }

    #[test]
    fn text_view_renders_numbers() {
        assert_eq!(ColumnValue::Integer(7).text_view(), "7");
        assert_eq!(ColumnValue::Real(1.0).text_view(), "1.0");
        assert_eq!(ColumnValue::Real(0.25).text_view(), "0.25");
        assert_eq!(ColumnValue::Null.text_view(), "");
    }

    #[test]
    fn byte_len_matches_views() {
        assert_eq!(ColumnValue::Text("héllo".into()).byte_len(), 6);
        assert_eq!(ColumnValue::Blob(vec![0, 1, 2]).byte_len(), 3);
        assert_eq!(ColumnValue::Integer(-12).byte_len(), 3);
        assert_eq!(ColumnValue::Null.byte_len(), 0);
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(ColumnValue::from(None::<i64>), ColumnValue::Null);
        assert_eq!(ColumnValue::from(Some("x")), ColumnValue::Text("x".into()));
    }
}
