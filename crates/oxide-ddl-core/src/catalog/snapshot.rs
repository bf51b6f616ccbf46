//! Recorded catalog contents.
//!
//! A [`CatalogSnapshot`] holds exactly what the introspection queries return,
//! so an export can be replayed later without a server.

use std::convert::Infallible;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Catalog, ColumnDescriptor, DomainDescriptor, ParameterDescriptor, RoutineDescriptor,
};
use crate::error::{DdlError, Result};
use crate::generate::ObjectClass;

/// A routine together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSnapshot {
    /// The routine row.
    #[serde(flatten)]
    pub routine: RoutineDescriptor,
    /// Parameters, in catalog order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// Everything the introspector reads from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Domain rows.
    #[serde(default)]
    pub domains: Vec<DomainDescriptor>,
    /// Column rows of all tables.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Routine rows with their parameters.
    #[serde(default)]
    pub routines: Vec<RoutineSnapshot>,
}

impl CatalogSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a domain row.
    #[must_use]
    pub fn domain(mut self, domain: DomainDescriptor) -> Self {
        self.domains.push(domain);
        self
    }

    /// Adds a column row.
    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a routine with its parameters.
    #[must_use]
    pub fn routine(mut self, routine: RoutineDescriptor, parameters: Vec<ParameterDescriptor>) -> Self {
        self.routines.push(RoutineSnapshot {
            routine,
            parameters,
        });
        self
    }

    /// Records the current contents of `catalog`.
    pub async fn capture<C: Catalog>(catalog: &mut C) -> Result<Self> {
        let domains = catalog
            .domains()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Domains, e))?;
        let columns = catalog
            .table_columns()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Tables, e))?;

        let mut routines = Vec::new();
        for routine in catalog
            .routines()
            .await
            .map_err(|e| DdlError::catalog(ObjectClass::Routines, e))?
        {
            let parameters = catalog
                .routine_parameters(&routine.name)
                .await
                .map_err(|e| DdlError::catalog(ObjectClass::Routines, e))?;
            routines.push(RoutineSnapshot {
                routine,
                parameters,
            });
        }

        debug!(
            domains = domains.len(),
            columns = columns.len(),
            routines = routines.len(),
            "Captured catalog snapshot"
        );

        Ok(Self {
            domains,
            columns,
            routines,
        })
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DdlError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Writes the snapshot to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| DdlError::io(path, e))
    }
}

/// A [`Catalog`] answering from a [`CatalogSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    snapshot: CatalogSnapshot,
}

impl SnapshotCatalog {
    /// Wraps a snapshot.
    #[must_use]
    pub const fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Returns the wrapped snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

impl From<CatalogSnapshot> for SnapshotCatalog {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl Catalog for SnapshotCatalog {
    type Error = Infallible;

    async fn domains(&mut self) -> std::result::Result<Vec<DomainDescriptor>, Self::Error> {
        let mut domains = self.snapshot.domains.clone();
        domains.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(domains)
    }

    async fn table_columns(&mut self) -> std::result::Result<Vec<ColumnDescriptor>, Self::Error> {
        Ok(self.snapshot.columns.clone())
    }

    async fn routines(&mut self) -> std::result::Result<Vec<RoutineDescriptor>, Self::Error> {
        let mut routines: Vec<_> = self
            .snapshot
            .routines
            .iter()
            .map(|r| r.routine.clone())
            .collect();
        routines.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(routines)
    }

    async fn routine_parameters(
        &mut self,
        routine: &str,
    ) -> std::result::Result<Vec<ParameterDescriptor>, Self::Error> {
        let mut parameters: Vec<_> = self
            .snapshot
            .routines
            .iter()
            .filter(|r| r.routine.name == routine)
            .flat_map(|r| r.parameters.iter().cloned())
            .collect();
        parameters.sort_by_key(|p| (p.direction, p.number));
        Ok(parameters)
    }
}
