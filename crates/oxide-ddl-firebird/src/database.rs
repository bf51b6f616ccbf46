//! Live Firebird database handle.

use std::path::Path;
use std::str::FromStr;

use oxide_ddl_core::catalog::{
    Catalog, ColumnDescriptor, DomainDescriptor, ParameterDescriptor, RoutineDescriptor,
};
use oxide_ddl_core::ScriptTarget;
use rsfbclient::prelude::*;
use rsfbclient::{Connection, FbError, Row};
use rsfbclient_core::{Charset, Dialect, FirebirdClient};
use tracing::{debug, info};

use crate::catalog::{
    ColumnRow, DomainRow, ParameterRow, RoutineRow, DOMAINS_SQL, ROUTINES_SQL,
    ROUTINE_PARAMETERS_SQL, TABLE_COLUMNS_SQL,
};
use crate::config::FirebirdConfig;
use crate::error::{FirebirdError, Result};

/// An open connection used both as a [`Catalog`] and a [`ScriptTarget`].
///
/// The wire client is synchronous; each async method runs its query to
/// completion on the calling task.
pub struct FirebirdDatabase<C: FirebirdClient> {
    conn: Connection<C>,
}

impl<C: FirebirdClient> std::fmt::Debug for FirebirdDatabase<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebirdDatabase").finish_non_exhaustive()
    }
}

/// Connects to an existing database.
///
/// # Errors
///
/// Returns [`FirebirdError::Client`] when the server refuses the connection.
pub fn connect(config: &FirebirdConfig) -> Result<FirebirdDatabase<impl FirebirdClient>> {
    debug!(host = %config.host, port = config.port, database = %config.database, "Connecting");
    let conn = open(config, false)?;
    Ok(FirebirdDatabase { conn })
}

/// Creates a new database file and connects to it.
///
/// The parent directory is created when missing. An existing file is never
/// overwritten.
///
/// # Errors
///
/// Returns [`FirebirdError::DatabaseExists`] for an existing file and
/// [`FirebirdError::Client`] when the server rejects the creation.
pub fn create(config: &FirebirdConfig) -> Result<FirebirdDatabase<impl FirebirdClient>> {
    let path = config.database_path();
    prepare_database_path(&path)?;

    info!(database = %path.display(), "Creating database");
    let conn = open(config, true)?;
    Ok(FirebirdDatabase { conn })
}

/// Attaches to (or creates) the configured database.
fn open(config: &FirebirdConfig, create: bool) -> Result<Connection<impl FirebirdClient>> {
    let charset = Charset::from_str(&config.charset)
        .map_err(|e| FirebirdError::Config(format!("unknown character set '{}': {e}", config.charset)))?;

    let mut builder = rsfbclient::builder_pure_rust();
    builder
        .host(config.host.as_str())
        .port(config.port)
        .db_name(config.database.as_str())
        .user(config.user.as_str())
        .pass(config.password.as_str())
        .dialect(dialect(config.dialect))
        .charset(charset);
    if let Some(role) = &config.role {
        builder.role(role.as_str());
    }

    let conn = if create {
        builder.create_database()?
    } else {
        builder.connect()?
    };
    Ok(conn)
}

/// Maps a validated dialect number onto the client enum.
const fn dialect(number: u8) -> Dialect {
    match number {
        1 => Dialect::D1,
        _ => Dialect::D3,
    }
}

/// Checks that `path` is free and that its directory exists.
///
/// # Errors
///
/// Fails when the file exists or the directory cannot be created.
pub fn prepare_database_path(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(FirebirdError::DatabaseExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            debug!(directory = %parent.display(), "Creating database directory");
            std::fs::create_dir_all(parent).map_err(|source| FirebirdError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

impl<C: FirebirdClient> FirebirdDatabase<C> {
    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns the client error reported while detaching.
    pub fn close(self) -> Result<()> {
        self.conn.close()?;
        Ok(())
    }

    fn rows<T>(
        &mut self,
        sql: &str,
        decode: impl Fn(&Row) -> std::result::Result<T, FbError>,
    ) -> Result<Vec<T>> {
        let rows: Vec<Row> = self.conn.query(sql, ())?;
        let decoded = rows.iter().map(decode).collect::<std::result::Result<_, _>>()?;
        Ok(decoded)
    }
}

impl<C: FirebirdClient> Catalog for FirebirdDatabase<C> {
    type Error = FirebirdError;

    async fn domains(&mut self) -> Result<Vec<DomainDescriptor>> {
        let rows = self.rows(DOMAINS_SQL, DomainRow::from_row)?;
        debug!(count = rows.len(), "Fetched domains");
        Ok(rows.into_iter().map(DomainRow::into_descriptor).collect())
    }

    async fn table_columns(&mut self) -> Result<Vec<ColumnDescriptor>> {
        let rows = self.rows(TABLE_COLUMNS_SQL, ColumnRow::from_row)?;
        debug!(count = rows.len(), "Fetched table columns");
        Ok(rows.into_iter().map(ColumnRow::into_descriptor).collect())
    }

    async fn routines(&mut self) -> Result<Vec<RoutineDescriptor>> {
        let rows = self.rows(ROUTINES_SQL, RoutineRow::from_row)?;
        debug!(count = rows.len(), "Fetched procedures");
        Ok(rows.into_iter().map(RoutineRow::into_descriptor).collect())
    }

    async fn routine_parameters(&mut self, routine: &str) -> Result<Vec<ParameterDescriptor>> {
        let rows: Vec<Row> = self
            .conn
            .query(ROUTINE_PARAMETERS_SQL, (routine.to_string(),))?;
        let parameters = rows
            .iter()
            .map(ParameterRow::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(routine, count = parameters.len(), "Fetched parameters");
        Ok(parameters
            .into_iter()
            .map(ParameterRow::into_descriptor)
            .collect())
    }
}

impl<C: FirebirdClient> ScriptTarget for FirebirdDatabase<C> {
    type Error = FirebirdError;

    async fn execute_unit(&mut self, statement: &str) -> Result<()> {
        // Commits on Ok, rolls back on Err.
        self.conn
            .with_transaction(|tr| tr.execute(statement, ()).map(|_| ()))?;
        Ok(())
    }
}
