//! Error types for the executor.

use std::time::Duration;

use crate::transaction::TransactionInfo;

/// Errors raised while connecting or running statements.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading a config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed connection config.
    #[error("invalid connection config: {0}")]
    Config(#[from] serde_json::Error),

    /// URL scheme or driver name not handled.
    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Commit or rollback failed; `info` holds the lifecycle record with the
    /// error message.
    #[error("transaction {} failed: {source}", info.id)]
    Transaction {
        /// Record at the time of the failure.
        info: Box<TransactionInfo>,
        /// Driver error.
        source: sqlx::Error,
    },

    /// A transaction outlived its TTL and was rolled back.
    #[error("transaction {id} exceeded its TTL of {ttl:?} and was rolled back")]
    TransactionTimeout {
        /// Transaction id.
        id: u64,
        /// Configured TTL.
        ttl: Duration,
    },
}

/// Result type alias for executor operations.
pub type Result<T> = std::result::Result<T, DbError>;
