//! Catalog-to-DDL generation.
//!
//! One generator per object class. Each turns catalog rows into complete,
//! ordered DDL statements that [`crate::script::split_statements`] reads
//! back unchanged.
//!
//! [`SchemaIntrospector`] runs the queries through a [`Catalog`] and feeds the
//! rows to the renderers; the renderers themselves are pure and usable on
//! their own.

mod domains;
mod routines;
mod tables;

use std::fmt;

use tracing::debug;

pub use domains::render_domain;
pub use routines::{render_routine, ROUTINE_TERMINATOR};
pub use tables::{group_tables, render_table, render_tables};

use crate::catalog::Catalog;
use crate::error::{DdlError, Result};

/// The kinds of schema object exported, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// `CREATE DOMAIN`.
    Domains,
    /// `CREATE TABLE`.
    Tables,
    /// `CREATE PROCEDURE`.
    Routines,
}

impl ObjectClass {
    /// All classes in the order they must be created.
    pub const ALL: [Self; 3] = [Self::Domains, Self::Tables, Self::Routines];

    /// The export file name; the numeric prefix encodes execution order.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Domains => "01_DOMAINS.sql",
            Self::Tables => "02_TABLES.sql",
            Self::Routines => "03_PROCEDURES.sql",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Domains => "domains",
            Self::Tables => "tables",
            Self::Routines => "routines",
        })
    }
}

/// Generates DDL for the objects found in a catalog.
#[derive(Debug)]
pub struct SchemaIntrospector<'c, C: Catalog> {
    catalog: &'c mut C,
}

impl<'c, C: Catalog> SchemaIntrospector<'c, C> {
    /// Creates an introspector over `catalog`.
    pub fn new(catalog: &'c mut C) -> Self {
        Self { catalog }
    }

    /// Generates the statements for one object class.
    pub async fn generate(&mut self, class: ObjectClass) -> Result<Vec<String>> {
        match class {
            ObjectClass::Domains => self.domain_scripts().await,
            ObjectClass::Tables => self.table_scripts().await,
            ObjectClass::Routines => self.routine_scripts().await,
        }
    }

    /// `CREATE DOMAIN` statements, ordered by domain name.
    pub async fn domain_scripts(&mut self) -> Result<Vec<String>> {
        let domains = self
            .catalog
            .domains()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Domains, e))?;
        debug!(count = domains.len(), "Generating domains");
        Ok(domains.iter().map(render_domain).collect())
    }

    /// `CREATE TABLE` statements, one per table.
    pub async fn table_scripts(&mut self) -> Result<Vec<String>> {
        let columns = self
            .catalog
            .table_columns()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Tables, e))?;
        debug!(columns = columns.len(), "Generating tables");
        Ok(render_tables(columns))
    }

    /// `CREATE PROCEDURE` blocks, one per routine with a body.
    ///
    /// Routines without source are skipped.
    pub async fn routine_scripts(&mut self) -> Result<Vec<String>> {
        let routines = self
            .catalog
            .routines()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Routines, e))?;

        let mut scripts = Vec::with_capacity(routines.len());
        for routine in &routines {
            if routine.body().is_none() {
                debug!(routine = %routine.name, "No source, skipping");
                continue;
            }
            let parameters = self
                .catalog
                .routine_parameters(&routine.name)
                .await
                .map_err(|e| DdlError::catalog(ObjectClass::Routines, e))?;
            scripts.extend(render_routine(routine, &parameters));
        }
        debug!(count = scripts.len(), "Generating routines");
        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CatalogSnapshot, ColumnDescriptor, DomainDescriptor, ParameterDescriptor,
        ParameterDirection, RoutineDescriptor, SnapshotCatalog,
    };
    use crate::types::TypeDescriptor;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Broken;

    /// Fails every table query; everything else is empty.
    struct BrokenTables;

    impl Catalog for BrokenTables {
        type Error = Broken;

        async fn domains(&mut self) -> std::result::Result<Vec<DomainDescriptor>, Broken> {
            Ok(Vec::new())
        }

        async fn table_columns(&mut self) -> std::result::Result<Vec<ColumnDescriptor>, Broken> {
            Err(Broken)
        }

        async fn routines(&mut self) -> std::result::Result<Vec<RoutineDescriptor>, Broken> {
            Ok(vec![RoutineDescriptor::new("P", None)])
        }

        async fn routine_parameters(
            &mut self,
            _routine: &str,
        ) -> std::result::Result<Vec<ParameterDescriptor>, Broken> {
            Err(Broken)
        }
    }

    #[tokio::test]
    async fn test_generates_each_class() {
        let integer = TypeDescriptor::new(8, 0, 4, 0, 0);
        let snapshot = CatalogSnapshot::new()
            .domain(DomainDescriptor::new("D_ID", integer).not_null())
            .column(ColumnDescriptor::new("T", "ID", 0, integer).domain("D_ID"))
            .routine(RoutineDescriptor::new("EMPTY", None), Vec::new())
            .routine(
                RoutineDescriptor::new("P", Some("BEGIN END".into())),
                vec![ParameterDescriptor::new(
                    "X",
                    ParameterDirection::Input,
                    0,
                    "D_ID",
                    integer,
                )],
            );
        let mut catalog = SnapshotCatalog::new(snapshot);
        let mut introspector = SchemaIntrospector::new(&mut catalog);

        assert_eq!(
            introspector.generate(ObjectClass::Domains).await.unwrap(),
            vec!["CREATE DOMAIN D_ID AS INTEGER NOT NULL;"]
        );
        assert_eq!(
            introspector.generate(ObjectClass::Tables).await.unwrap(),
            vec!["CREATE TABLE T (\n    ID D_ID\n);"]
        );
        let routines = introspector.generate(ObjectClass::Routines).await.unwrap();
        assert_eq!(routines.len(), 1);
        assert!(routines[0].contains("CREATE PROCEDURE P (X D_ID) AS"));
    }

    #[tokio::test]
    async fn test_catalog_errors_name_the_object_class() {
        let mut catalog = BrokenTables;
        let mut introspector = SchemaIntrospector::new(&mut catalog);

        assert!(introspector.domain_scripts().await.unwrap().is_empty());

        let err = introspector.table_scripts().await.unwrap_err();
        assert!(matches!(
            err,
            DdlError::CatalogQuery {
                object_class: ObjectClass::Tables,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Catalog query for tables failed: connection reset"
        );
    }

    #[tokio::test]
    async fn test_missing_source_skips_parameter_query() {
        // The parameter query would fail; it must not be issued for a
        // routine without source.
        let mut catalog = BrokenTables;
        let mut introspector = SchemaIntrospector::new(&mut catalog);
        assert!(introspector.routine_scripts().await.unwrap().is_empty());
    }

    #[test]
    fn test_file_names_sort_in_creation_order() {
        let mut names: Vec<_> = ObjectClass::ALL.iter().map(|c| c.file_name()).collect();
        let expected = names.clone();
        names.sort_unstable();
        assert_eq!(names, expected);
    }
}
