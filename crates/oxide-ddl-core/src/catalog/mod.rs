//! Catalog access.
//!
//! Driver crates (oxide-ddl-firebird) implement [`Catalog`] on top of a live
//! connection. The core only defines the trait and the row types, plus
//! [`SnapshotCatalog`] for replaying a recorded [`CatalogSnapshot`].

mod model;
mod snapshot;

pub use model::{
    is_system_domain, ColumnDescriptor, DomainDescriptor, ParameterDescriptor, ParameterDirection,
    RoutineDescriptor, SYSTEM_DOMAIN_PREFIX,
};
pub use snapshot::{CatalogSnapshot, RoutineSnapshot, SnapshotCatalog};

/// Read access to the schema catalog.
///
/// Each method is one catalog query. Only non-system objects are returned.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Error type for query failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// User-defined domains, ordered by name.
    async fn domains(&mut self) -> Result<Vec<DomainDescriptor>, Self::Error>;

    /// Columns of every user table, ordered by table then position.
    async fn table_columns(&mut self) -> Result<Vec<ColumnDescriptor>, Self::Error>;

    /// Stored procedures, ordered by name.
    async fn routines(&mut self) -> Result<Vec<RoutineDescriptor>, Self::Error>;

    /// Parameters of one procedure, ordered by direction then number.
    async fn routine_parameters(
        &mut self,
        routine: &str,
    ) -> Result<Vec<ParameterDescriptor>, Self::Error>;
}
