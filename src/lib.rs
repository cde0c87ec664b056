//! Typed statements over SQLite.
//!
//! A statement is prepared with the tuple type its rows are read into. Parameters are bound
//! from tuples, each row is decoded in place into the statement's tuple, and rows are pulled
//! one at a time:
//!
//! ```rust
//! use sql_typed_core::prelude::*;
//!
//! let conn = Connection::open_in_memory()?;
//! conn.execute_batch(
//!     "CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT);
//!      INSERT INTO test VALUES (1, 'Hello World'), (2, 'Hello Two');",
//! )?;
//!
//! let mut stmt = conn.prepare::<(i64, String)>("SELECT id, name FROM test ORDER BY id");
//! let mut rows = stmt.rows();
//! while let Some((id, name)) = rows.next() {
//!     println!("{id}: {name}");
//! }
//! assert!(stmt.is_ok());
//!
//! let mut insert = conn.prepare_with::<(), _>(
//!     "INSERT INTO test (id, name) VALUES (?, ?)",
//!     &(3, "Tree Hello"),
//! );
//! insert.execute()?;
//! # Ok::<(), SqlTypedError>(())
//! ```
//!
//! Misusing a statement (stepping it after it finished, binding after stepping) is a usage
//! error; engine failures put the statement in a terminal failed state. Both are returned as
//! [`SqlTypedError`] and also reported through the optional [`FailureHooks`].

pub mod codec;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod rows;
pub mod sqlite;
pub mod statement;
pub mod tuple;
pub mod types;

pub use codec::{BindColumn, ColumnCodec, ExtractColumn, Null, WideString};
pub use error::{EngineError, SqlTypedError};
pub use hooks::FailureHooks;
pub use rows::{ClonedRows, RowSequence};
pub use sqlite::{Connection, ConnectionOptions, ConnectionOptionsBuilder};
pub use statement::{Statement, StatementStatus, StepOutcome};
pub use tuple::{BindRow, ExtractRow};
pub use types::{ColumnValue, StorageClass};
