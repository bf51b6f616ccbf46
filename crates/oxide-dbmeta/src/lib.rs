//! Command layer of the `oxide-dbmeta` tool.
//!
//! - `build-db` creates a Firebird database file and runs a script
//!   directory against it.
//! - `export-scripts` writes the domains, tables and procedures of a
//!   database (or a recorded snapshot) as numbered script files.
//! - `update-db` runs a script directory against an existing database.

pub mod commands;
pub mod sqlite;

pub use commands::{build_db, export, update_db, ExportSource, ServerSettings, UpdateTarget};
pub use sqlite::SqliteTarget;
