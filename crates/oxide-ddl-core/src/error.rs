//! Error types for script execution and schema export.

use std::path::PathBuf;

use crate::generate::ObjectClass;

/// A backend error, boxed at the trait seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while running scripts or exporting DDL.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The scripts directory does not exist.
    #[error("Scripts directory not found: {0}")]
    ScriptDirectoryNotFound(PathBuf),

    /// The scripts directory holds no `*.sql` files.
    #[error("No *.sql files found in {0}")]
    ScriptDirectoryEmpty(PathBuf),

    /// IO error reading a script or writing an export file.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A statement failed; its unit of work was rolled back.
    #[error("SQL error in '{file}': {source}\nStatement: {statement}")]
    StatementExecution {
        /// Script file the statement came from.
        file: PathBuf,
        /// Trimmed statement text.
        statement: String,
        /// Engine error.
        #[source]
        source: BoxError,
    },

    /// Catalog query failed while exporting an object class.
    #[error("Catalog query for {object_class} failed: {source}")]
    CatalogQuery {
        /// Object class being exported.
        object_class: ObjectClass,
        /// Engine error.
        #[source]
        source: BoxError,
    },

    /// Malformed catalog snapshot.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl DdlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn catalog(
        object_class: ObjectClass,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::CatalogQuery {
            object_class,
            source: Box::new(source),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, DdlError>;
