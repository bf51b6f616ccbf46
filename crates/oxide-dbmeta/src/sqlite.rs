//! SQLite scratch target.
//!
//! Lets `update-db` rehearse a script directory against a local SQLite file
//! (`sqlite:scratch.db`) before it goes near a Firebird server. Firebird-only
//! syntax such as domains will of course be rejected here.

use std::str::FromStr;

use oxide_ddl_core::ScriptTarget;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::warn;

/// URL prefix selecting this target.
pub const SQLITE_PREFIX: &str = "sqlite:";

/// Returns whether `target` names a SQLite database.
#[must_use]
pub fn is_sqlite_url(target: &str) -> bool {
    target.trim_start().starts_with(SQLITE_PREFIX)
}

/// A [`ScriptTarget`] over a single-connection SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteTarget {
    pool: SqlitePool,
}

impl SqliteTarget {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens `url`, creating the database file when missing.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url.trim())?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ScriptTarget for SqliteTarget {
    type Error = sqlx::Error;

    async fn execute_unit(&mut self, statement: &str) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        match sqlx::query(statement).execute(&mut *tx).await {
            Ok(_) => tx.commit().await,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}
