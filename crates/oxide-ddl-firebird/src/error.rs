//! Error types for the Firebird driver.

use std::path::PathBuf;

use rsfbclient::FbError;

/// Errors raised by the Firebird driver.
#[derive(Debug, thiserror::Error)]
pub enum FirebirdError {
    /// Malformed connection string.
    #[error("Invalid connection string: {0}")]
    Config(String),

    /// The database file to create is already there.
    #[error("Database file already exists: {0}")]
    DatabaseExists(PathBuf),

    /// IO error preparing the database directory.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// Directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Error reported by the server or the wire client.
    #[error("Firebird error: {0}")]
    Client(#[from] FbError),
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, FirebirdError>;
