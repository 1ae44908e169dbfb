//! Transactions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlweave_core::{Executor, SqlValue};
use sqlx::any::AnyRow;
use sqlx::Any;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::{Driver, Options};
use crate::error::{DbError, Result};
use crate::statement::{bind_all, prepare};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle record of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    /// Process-wide unique id.
    pub id: u64,
    /// When the transaction was opened.
    pub begin_time: DateTime<Utc>,
    /// When a commit was attempted.
    pub commit_time: Option<DateTime<Utc>>,
    /// When a rollback was attempted.
    pub rollback_time: Option<DateTime<Utc>>,
    /// Last commit or rollback error.
    pub message: Option<String>,
}

impl TransactionInfo {
    fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            begin_time: Utc::now(),
            commit_time: None,
            rollback_time: None,
            message: None,
        }
    }
}

impl fmt::Display for TransactionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transaction {} (begin {}", self.id, self.begin_time.to_rfc3339())?;
        if let Some(time) = self.commit_time {
            write!(f, ", commit {}", time.to_rfc3339())?;
        }
        if let Some(time) = self.rollback_time {
            write!(f, ", rollback {}", time.to_rfc3339())?;
        }
        if let Some(message) = &self.message {
            write!(f, ", {message}")?;
        }
        f.write_str(")")
    }
}

/// An open transaction.
///
/// Dropping it without calling [`Transaction::commit`] rolls it back. With a
/// TTL in [`Options`], the first use after the deadline rolls it back and
/// fails with [`DbError::TransactionTimeout`].
pub struct Transaction {
    /// `None` once the TTL rollback happened.
    tx: Option<sqlx::Transaction<'static, Any>>,
    driver: Driver,
    options: Options,
    deadline: Option<Instant>,
    info: TransactionInfo,
}

impl Transaction {
    pub(crate) fn new(tx: sqlx::Transaction<'static, Any>, driver: Driver, options: Options) -> Self {
        let info = TransactionInfo::new();
        info!(transaction = info.id, "Transaction started");
        Self {
            tx: Some(tx),
            driver,
            deadline: options.transaction_ttl.map(|ttl| Instant::now() + ttl),
            options,
            info,
        }
    }

    /// Transaction id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.info.id
    }

    /// Lifecycle record so far.
    #[must_use]
    pub const fn info(&self) -> &TransactionInfo {
        &self.info
    }

    /// Backend the transaction runs on.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.driver
    }

    /// Returns `true` once the TTL elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Commits and returns the final lifecycle record.
    ///
    /// On failure the record, message included, travels in
    /// [`DbError::Transaction`].
    pub async fn commit(mut self) -> Result<TransactionInfo> {
        self.live().await?;
        let Some(tx) = self.tx.take() else {
            return Err(self.timeout());
        };
        self.info.commit_time = Some(Utc::now());
        match tx.commit().await {
            Ok(()) => {
                info!(transaction = self.info.id, "Transaction committed");
                Ok(self.info)
            }
            Err(e) => {
                self.info.message = Some(format!("Commit error: {e}"));
                warn!(transaction = self.info.id, error = %e, "Commit failed");
                Err(self.failure(e))
            }
        }
    }

    /// Rolls back and returns the final lifecycle record.
    ///
    /// A transaction already rolled back by its TTL just returns its record.
    pub async fn rollback(mut self) -> Result<TransactionInfo> {
        let Some(tx) = self.tx.take() else {
            return Ok(self.info);
        };
        self.info.rollback_time = Some(Utc::now());
        match tx.rollback().await {
            Ok(()) => {
                info!(transaction = self.info.id, "Transaction rolled back");
                Ok(self.info)
            }
            Err(e) => {
                self.info.message = Some(format!("Rollback error: {e}"));
                warn!(transaction = self.info.id, error = %e, "Rollback failed");
                Err(self.failure(e))
            }
        }
    }

    /// The open sqlx transaction, rolling it back first when the TTL elapsed.
    async fn live(&mut self) -> Result<&mut sqlx::Transaction<'static, Any>> {
        if self.is_expired() {
            if let Some(tx) = self.tx.take() {
                warn!(transaction = self.info.id, "Transaction TTL expired, rolling back");
                self.info.rollback_time = Some(Utc::now());
                self.info.message = Some(String::from("TTL expired"));
                if let Err(e) = tx.rollback().await {
                    self.info.message = Some(format!("Rollback error: {e}"));
                    return Err(self.failure(e));
                }
            }
        }
        let error = self.timeout();
        self.tx.as_mut().ok_or(error)
    }

    fn statement<'a>(&self, sql: &'a str, args: &[SqlValue]) -> std::borrow::Cow<'a, str> {
        prepare(
            sql,
            args,
            self.driver.placeholder_style(),
            &self.options,
            Some(self.info.id),
        )
    }

    fn timeout(&self) -> DbError {
        DbError::TransactionTimeout {
            id: self.info.id,
            ttl: self.options.transaction_ttl.unwrap_or(Duration::ZERO),
        }
    }

    fn failure(&self, source: sqlx::Error) -> DbError {
        DbError::Transaction {
            info: Box::new(self.info.clone()),
            source,
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("driver", &self.driver)
            .field("deadline", &self.deadline)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl Executor for Transaction {
    type Row = AnyRow;
    type Error = DbError;

    async fn execute(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<u64> {
        let sql = self.statement(sql, &args);
        let tx = self.live().await?;
        let done = bind_all(&sql, args).execute(&mut **tx).await?;
        Ok(done.rows_affected())
    }

    async fn query(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<Vec<AnyRow>> {
        let sql = self.statement(sql, &args);
        let tx = self.live().await?;
        Ok(bind_all(&sql, args).fetch_all(&mut **tx).await?)
    }

    async fn query_row(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<Option<AnyRow>> {
        let sql = self.statement(sql, &args);
        let tx = self.live().await?;
        Ok(bind_all(&sql, args).fetch_optional(&mut **tx).await?)
    }
}
