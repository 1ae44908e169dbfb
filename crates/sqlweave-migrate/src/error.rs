//! Migration errors.

use std::path::PathBuf;

use sqlweave_sqlx::DbError;

/// Errors raised while loading, creating or applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A statement or the bookkeeping write failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A bookkeeping row could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] sqlx::Error),

    /// Reading or writing migration files failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A `.down.sql` file has no `.up.sql` partner.
    #[error("Version {version} has no upgrade script next to '{path}'")]
    OrphanDownFile {
        /// Version shared by the file pair.
        version: String,
        /// Path of the down file.
        path: PathBuf,
    },

    /// A new migration would overwrite an existing file.
    #[error("Refusing to overwrite '{0}'")]
    FileExists(PathBuf),

    /// The class directory does not exist.
    #[error("No migration directory at '{0}'")]
    DirNotFound(PathBuf),

    /// Version absent from the loaded migration set.
    #[error("Unknown migration version: {0}")]
    UnknownVersion(String),

    /// Class or migration name that cannot be used as an identifier.
    #[error("Invalid name '{0}': use ASCII letters, digits and underscores")]
    InvalidName(String),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
