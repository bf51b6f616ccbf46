//! # oxide-ddl-core
//!
//! Driver-agnostic building blocks for moving a schema in and out of a
//! Firebird-style catalog as plain DDL scripts.
//!
//! - [`types`] turns catalog type codes back into SQL type declarations.
//! - [`script`] splits scripts into statements, honouring `SET TERM`.
//! - [`catalog`] describes catalog rows and the [`Catalog`] query trait.
//! - [`generate`] renders domains, tables and procedures as DDL.
//! - [`export`] writes the generated DDL to numbered script files.
//! - [`runner`] applies a directory of scripts to a [`ScriptTarget`].
//!
//! Driver crates implement [`Catalog`] and [`ScriptTarget`]; this crate never
//! talks to a database itself.
//!
//! ## Splitting a script
//!
//! ```rust
//! use oxide_ddl_core::script::split_statements;
//!
//! let script = "\
//! CREATE DOMAIN D_ID AS INTEGER NOT NULL;
//! SET TERM $$ ;
//! CREATE PROCEDURE P AS BEGIN EXIT; END$$
//! SET TERM ; $$
//! ";
//! assert_eq!(
//!     split_statements(script),
//!     vec![
//!         "CREATE DOMAIN D_ID AS INTEGER NOT NULL",
//!         "CREATE PROCEDURE P AS BEGIN EXIT; END",
//!     ]
//! );
//! ```
//!
//! ## Declaring a type
//!
//! ```rust
//! use oxide_ddl_core::types::declare;
//!
//! assert_eq!(declare(16, 1, 8, -2, 0), "NUMERIC(18,2)");
//! assert_eq!(declare(37, 0, 80, 0, 20), "VARCHAR(20)");
//! ```

pub mod catalog;
pub mod error;
pub mod export;
pub mod generate;
pub mod runner;
pub mod script;
pub mod types;

pub use catalog::{Catalog, CatalogSnapshot, SnapshotCatalog};
pub use error::{DdlError, Result};
pub use export::{export_scripts, ExportSummary};
pub use generate::{ObjectClass, SchemaIntrospector};
pub use runner::{RunSummary, ScriptRunner, ScriptTarget};
pub use script::split_statements;
pub use types::{declare, FieldType, TypeDescriptor};
