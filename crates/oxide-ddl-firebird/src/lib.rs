//! # oxide-ddl-firebird
//!
//! Firebird driver for oxide-ddl, built on the pure Rust wire client of
//! `rsfbclient`.
//!
//! [`FirebirdDatabase`] implements both [`oxide_ddl_core::Catalog`] (reads
//! the `RDB$` system tables) and [`oxide_ddl_core::ScriptTarget`] (runs each
//! statement in its own transaction).
//!
//! ```rust,no_run
//! use oxide_ddl_firebird::{connect, FirebirdConfig};
//!
//! let config = FirebirdConfig::new("/var/lib/firebird/data/shop.fdb").password("secret");
//! let database = connect(&config)?;
//! database.close()?;
//! # Ok::<(), oxide_ddl_firebird::FirebirdError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;

pub use config::{FirebirdConfig, DEFAULT_CHARSET, DEFAULT_DIALECT, DEFAULT_PORT};
pub use database::{connect, create, FirebirdDatabase};
pub use error::{FirebirdError, Result};
