// SQLite module - everything that talks to rusqlite lives here
//
// - config: connection options and builder
// - connection: the connection collaborator (open/close/last error)
// - params: conversion between `ColumnValue` and rusqlite values
// - query: reading engine rows
// - cursor: a statement paired with the live cursor stepping it
// - raw: the prepared-statement handle and its primitive calls

pub mod config;
pub mod connection;
pub(crate) mod cursor;
pub mod params;
pub(crate) mod query;
pub(crate) mod raw;

pub use config::{ConnectionOptions, ConnectionOptionsBuilder};
pub use connection::Connection;
pub use params::{column_value_ref, sqlite_to_column_value};
