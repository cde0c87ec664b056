//! Convenient imports for common functionality.
//!
//! This module re-exports the types needed to open a connection, prepare typed statements
//! and read their rows.

pub use crate::codec::{BindColumn, ColumnCodec, ExtractColumn, Null, WideString};
pub use crate::error::{EngineError, SqlTypedError};
pub use crate::hooks::FailureHooks;
pub use crate::rows::RowSequence;
pub use crate::sqlite::{Connection, ConnectionOptions};
pub use crate::statement::{Statement, StatementStatus, StepOutcome};
pub use crate::tuple::{BindRow, ExtractRow};
pub use crate::types::{ColumnValue, StorageClass};
