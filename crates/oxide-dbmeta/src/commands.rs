//! Subcommand implementations.
//!
//! Each command validates its inputs (script discovery, connection string)
//! before it opens or creates a database.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use oxide_ddl_core::{export_scripts, CatalogSnapshot, ExportSummary, RunSummary, ScriptRunner, SnapshotCatalog};
use oxide_ddl_firebird::FirebirdConfig;
use tracing::info;

use crate::sqlite::{is_sqlite_url, SqliteTarget};

/// Default name of the database file created by `build-db`.
pub const DEFAULT_FILE_NAME: &str = "DATABASE.FDB";

/// Server and account used to create a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl ServerSettings {
    fn config_for(&self, database: &Path) -> FirebirdConfig {
        FirebirdConfig::new(database.to_string_lossy())
            .host(self.host.clone())
            .port(self.port)
            .user(self.user.clone())
            .password(self.password.clone())
    }
}

/// Where `export-scripts` reads the schema from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSource {
    /// A live database.
    Connection(String),
    /// A recorded snapshot file.
    Snapshot(PathBuf),
}

/// Database named by an `update-db` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    /// A Firebird database.
    Firebird(FirebirdConfig),
    /// A `sqlite:` URL.
    Sqlite(String),
}

impl UpdateTarget {
    /// Parses a connection string.
    pub fn parse(connection: &str) -> anyhow::Result<Self> {
        if is_sqlite_url(connection) {
            return Ok(Self::Sqlite(connection.trim().to_string()));
        }
        Ok(Self::Firebird(connection.parse()?))
    }
}

/// Creates `<db_dir>/<file_name>` and runs every script of `scripts_dir`.
pub async fn build_db(
    db_dir: &Path,
    file_name: &str,
    scripts_dir: &Path,
    server: &ServerSettings,
    dry_run: bool,
) -> anyhow::Result<RunSummary> {
    let runner = ScriptRunner::discover(scripts_dir)?;
    if dry_run {
        info!("Dry run mode - SQL will be printed but not executed.");
        return Ok(runner.print_plan()?);
    }

    let path = std::path::absolute(db_dir.join(file_name))
        .with_context(|| format!("cannot resolve {}", db_dir.display()))?;
    let config = server.config_for(&path);

    let mut database = oxide_ddl_firebird::create(&config)
        .with_context(|| format!("failed to create database {}", path.display()))?;
    let summary = runner.run(&mut database).await?;
    database.close()?;

    info!(database = %path.display(), "Database built");
    Ok(summary)
}

/// Writes the DDL of `source` into `output_dir`.
///
/// When `save_snapshot` is set the catalog is also recorded as JSON.
pub async fn export(
    source: &ExportSource,
    output_dir: &Path,
    save_snapshot: Option<&Path>,
) -> anyhow::Result<ExportSummary> {
    let snapshot = match source {
        ExportSource::Snapshot(path) => CatalogSnapshot::load(path)?,
        ExportSource::Connection(connection) => {
            if is_sqlite_url(connection) {
                bail!("export-scripts needs a Firebird connection string");
            }
            let config: FirebirdConfig = connection.parse()?;
            let mut database = oxide_ddl_firebird::connect(&config)?;

            if save_snapshot.is_none() {
                let summary = export_scripts(&mut database, output_dir).await?;
                database.close()?;
                return Ok(summary);
            }
            let snapshot = CatalogSnapshot::capture(&mut database).await?;
            database.close()?;
            snapshot
        }
    };

    if let Some(path) = save_snapshot {
        snapshot.save(path)?;
        info!(file = %path.display(), "Saved catalog snapshot");
    }

    let mut catalog = SnapshotCatalog::new(snapshot);
    Ok(export_scripts(&mut catalog, output_dir).await?)
}

/// Runs every script of `scripts_dir` against an existing database.
pub async fn update_db(
    connection: &str,
    scripts_dir: &Path,
    dry_run: bool,
) -> anyhow::Result<RunSummary> {
    let target = UpdateTarget::parse(connection)?;
    let runner = ScriptRunner::discover(scripts_dir)?;
    if dry_run {
        info!("Dry run mode - SQL will be printed but not executed.");
        return Ok(runner.print_plan()?);
    }

    let summary = match target {
        UpdateTarget::Firebird(config) => {
            let mut database = oxide_ddl_firebird::connect(&config)?;
            let summary = runner.run(&mut database).await?;
            database.close()?;
            summary
        }
        UpdateTarget::Sqlite(url) => {
            let mut database = SqliteTarget::connect(&url).await?;
            runner.run(&mut database).await?
        }
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_ddl_core::catalog::DomainDescriptor;
    use oxide_ddl_core::{DdlError, TypeDescriptor};

    fn server() -> ServerSettings {
        ServerSettings {
            host: "localhost".into(),
            port: 3050,
            user: "SYSDBA".into(),
            password: "masterkey".into(),
        }
    }

    #[test]
    fn test_update_target_parse() {
        assert_eq!(
            UpdateTarget::parse(" sqlite:scratch.db").unwrap(),
            UpdateTarget::Sqlite("sqlite:scratch.db".into())
        );
        match UpdateTarget::parse("Database=/srv/a.fdb;Port=3051").unwrap() {
            UpdateTarget::Firebird(config) => assert_eq!(config.port, 3051),
            other @ UpdateTarget::Sqlite(_) => panic!("unexpected {other:?}"),
        }
        assert!(UpdateTarget::parse("Port=3051").is_err());
    }

    #[tokio::test]
    async fn test_build_with_empty_scripts_creates_nothing() {
        let scripts = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let db_dir = target.path().join("db");

        let err = build_db(&db_dir, DEFAULT_FILE_NAME, scripts.path(), &server(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DdlError>(),
            Some(DdlError::ScriptDirectoryEmpty(_))
        ));
        assert!(!db_dir.exists());
    }

    #[tokio::test]
    async fn test_build_dry_run_counts_statements() {
        let scripts = tempfile::tempdir().unwrap();
        std::fs::write(scripts.path().join("01_DOMAINS.sql"), "CREATE DOMAIN D AS INTEGER;").unwrap();
        std::fs::write(
            scripts.path().join("03_PROCEDURES.sql"),
            "SET TERM $$ ;\nCREATE PROCEDURE P AS BEGIN EXIT; END$$\nSET TERM ; $$\n",
        )
        .unwrap();
        let target = tempfile::tempdir().unwrap();

        let summary = build_db(target.path(), DEFAULT_FILE_NAME, scripts.path(), &server(), true)
            .await
            .unwrap();
        assert_eq!(summary, RunSummary { files: 2, statements: 2 });
        assert!(!target.path().join(DEFAULT_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_update_sqlite_target() {
        let scripts = tempfile::tempdir().unwrap();
        std::fs::write(
            scripts.path().join("02_TABLES.sql"),
            "CREATE TABLE a (x INTEGER);\nCREATE TABLE b (y INTEGER);\n",
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("scratch.db").display());

        let summary = update_db(&url, scripts.path(), false).await.unwrap();
        assert_eq!(summary, RunSummary { files: 1, statements: 2 });
    }

    #[tokio::test]
    async fn test_update_rejects_bad_connection_before_scripts() {
        let scripts = tempfile::tempdir().unwrap();
        let err = update_db("User=SYSDBA", scripts.path(), false).await.unwrap_err();
        assert!(err.downcast_ref::<DdlError>().is_none());
    }

    #[tokio::test]
    async fn test_export_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot_path = dir.path().join("schema.json");
        CatalogSnapshot::new()
            .domain(DomainDescriptor::new("D_ID", TypeDescriptor::new(8, 0, 4, 0, 0)).not_null())
            .save(&snapshot_path)
            .unwrap();

        let output = dir.path().join("out");
        let copy = dir.path().join("copy.json");
        let summary = export(&ExportSource::Snapshot(snapshot_path), &output, Some(&copy))
            .await
            .unwrap();

        assert_eq!(summary.files.len(), 3);
        let domains = std::fs::read_to_string(output.join("01_DOMAINS.sql")).unwrap();
        assert_eq!(domains, "CREATE DOMAIN D_ID AS INTEGER NOT NULL;\n\n");
        assert!(CatalogSnapshot::load(&copy).is_ok());
    }

    #[tokio::test]
    async fn test_export_rejects_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let source = ExportSource::Connection("sqlite:scratch.db".into());
        assert!(export(&source, dir.path(), None).await.is_err());
    }
}
