//! Export of generated DDL to script files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Catalog;
use crate::error::{DdlError, Result};
use crate::generate::{ObjectClass, SchemaIntrospector};

/// One written export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Object class the file holds.
    pub class: ObjectClass,
    /// Path of the written file.
    pub path: PathBuf,
    /// Number of statements written.
    pub statements: usize,
}

/// Files written by an export, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportSummary {
    /// One entry per object class.
    pub files: Vec<ExportedFile>,
}

/// Joins statements into file contents, one blank line after each.
#[must_use]
pub fn render_script(statements: &[String]) -> String {
    let mut contents = String::new();
    for statement in statements {
        contents.push_str(statement);
        if !statement.ends_with('\n') {
            contents.push('\n');
        }
        contents.push('\n');
    }
    contents
}

/// Exports every object class of `catalog` into `output_dir`.
///
/// Classes are generated and written one at a time, so when a catalog query
/// fails, the files of earlier classes stay on disk.
pub async fn export_scripts<C: Catalog>(catalog: &mut C, output_dir: &Path) -> Result<ExportSummary> {
    std::fs::create_dir_all(output_dir).map_err(|e| DdlError::io(output_dir, e))?;

    let mut introspector = SchemaIntrospector::new(catalog);
    let mut summary = ExportSummary::default();

    for class in ObjectClass::ALL {
        let statements = introspector.generate(class).await?;
        let path = output_dir.join(class.file_name());
        std::fs::write(&path, render_script(&statements)).map_err(|e| DdlError::io(&path, e))?;

        info!(
            class = %class,
            file = %path.display(),
            statements = statements.len(),
            "Exported scripts"
        );
        summary.files.push(ExportedFile {
            class,
            path,
            statements: statements.len(),
        });
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CatalogSnapshot, ColumnDescriptor, DomainDescriptor, ParameterDescriptor,
        RoutineDescriptor,
    };

    #[derive(Debug, thiserror::Error)]
    #[error("lost connection")]
    struct Lost;

    /// Answers domains, then loses the connection.
    struct FlakyCatalog;

    impl Catalog for FlakyCatalog {
        type Error = Lost;

        async fn domains(&mut self) -> std::result::Result<Vec<DomainDescriptor>, Lost> {
            Ok(Vec::new())
        }

        async fn table_columns(&mut self) -> std::result::Result<Vec<ColumnDescriptor>, Lost> {
            Err(Lost)
        }

        async fn routines(&mut self) -> std::result::Result<Vec<RoutineDescriptor>, Lost> {
            Err(Lost)
        }

        async fn routine_parameters(
            &mut self,
            _routine: &str,
        ) -> std::result::Result<Vec<ParameterDescriptor>, Lost> {
            Err(Lost)
        }
    }

    #[test]
    fn test_render_script() {
        let statements = vec![
            "CREATE DOMAIN A AS INTEGER;".to_string(),
            "SET TERM $$ ;\nX\n$$\nSET TERM ; $$\n".to_string(),
        ];
        assert_eq!(
            render_script(&statements),
            "CREATE DOMAIN A AS INTEGER;\n\nSET TERM $$ ;\nX\n$$\nSET TERM ; $$\n\n"
        );
        assert_eq!(render_script(&[]), "");
    }

    #[tokio::test]
    async fn test_export_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut catalog = crate::catalog::SnapshotCatalog::new(CatalogSnapshot::new());

        let summary = export_scripts(&mut catalog, &out).await.unwrap();

        let names: Vec<_> = summary
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["01_DOMAINS.sql", "02_TABLES.sql", "03_PROCEDURES.sql"]);
        assert!(summary.files.iter().all(|f| f.statements == 0 && f.path.exists()));
    }

    #[tokio::test]
    async fn test_failed_class_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_scripts(&mut FlakyCatalog, dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            DdlError::CatalogQuery {
                object_class: ObjectClass::Tables,
                ..
            }
        ));
        assert!(dir.path().join("01_DOMAINS.sql").exists());
        assert!(!dir.path().join("02_TABLES.sql").exists());
        assert!(!dir.path().join("03_PROCEDURES.sql").exists());
    }
}
