//! Connection pool.

use futures::future::BoxFuture;
use sqlweave_core::{Executor, SqlValue};
use sqlx::any::{install_default_drivers, AnyPoolOptions, AnyRow};
use sqlx::AnyPool;
use tracing::{info, warn};

use crate::config::{ConnectionConfig, Driver, Options};
use crate::error::{DbError, Result};
use crate::statement::{bind_all, prepare};
use crate::transaction::Transaction;

/// A pooled database handle.
///
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    driver: Driver,
    options: Options,
}

impl Database {
    /// Connects with default pool settings.
    pub async fn connect(url: &str, options: Options) -> Result<Self> {
        Self::connect_with(AnyPoolOptions::new(), url, options).await
    }

    /// Connects using the pool settings and URL of `config`.
    pub async fn from_config(config: &ConnectionConfig, options: Options) -> Result<Self> {
        let mut pool = AnyPoolOptions::new().idle_timeout(config.idle_lifetime());
        if config.max_connections > 0 {
            pool = pool.max_connections(config.max_connections);
        }
        let idle = config.max_idle_connections.min(pool.get_max_connections());
        pool = pool.min_connections(idle);
        Self::connect_with(pool, &config.url(), options).await
    }

    async fn connect_with(pool: AnyPoolOptions, url: &str, options: Options) -> Result<Self> {
        let driver = Driver::from_url(url)?;
        install_default_drivers();
        let pool = pool.connect(url).await?;
        info!(driver = %driver, "Connected to database");
        Ok(Self {
            pool,
            driver,
            options,
        })
    }

    /// Backend behind the pool.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.driver
    }

    /// Executor options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The underlying sqlx pool.
    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Opens a transaction.
    ///
    /// With a TTL configured, the transaction is rolled back by the first
    /// statement, commit or rollback issued after the TTL elapsed, which then
    /// fails with [`DbError::TransactionTimeout`].
    pub async fn begin(&self) -> Result<Transaction> {
        let tx = self.pool.begin().await?;
        Ok(Transaction::new(tx, self.driver, self.options))
    }

    /// Runs `callback` inside a transaction.
    ///
    /// Commits when the callback returns `Ok` and rolls back when it returns
    /// `Err`. With a TTL configured, a callback still running when it
    /// expires is cancelled, the transaction is rolled back and
    /// [`DbError::TransactionTimeout`] is returned.
    ///
    /// ```rust,no_run
    /// # use sqlweave_core::{params, Executor};
    /// # use sqlweave_sqlx::{Database, DbError};
    /// # async fn demo(db: &Database) -> Result<(), DbError> {
    /// let moved = db
    ///     .run_in_transaction(|tx| {
    ///         Box::pin(async move {
    ///             tx.execute("UPDATE accounts SET balance = balance - ? WHERE id = ?", params![10, 1])
    ///                 .await?;
    ///             tx.execute("UPDATE accounts SET balance = balance + ? WHERE id = ?", params![10, 2])
    ///                 .await
    ///         })
    ///     })
    ///     .await?;
    /// # let _: u64 = moved;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_in_transaction<T, E, F>(&self, callback: F) -> std::result::Result<T, E>
    where
        T: Send,
        E: From<DbError> + std::fmt::Display + Send,
        F: for<'t> FnOnce(&'t mut Transaction) -> BoxFuture<'t, std::result::Result<T, E>> + Send,
    {
        let mut tx = self.begin().await?;
        let id = tx.id();

        let outcome = match self.options.transaction_ttl {
            Some(ttl) => {
                let timed = tokio::time::timeout(ttl, callback(&mut tx)).await;
                if let Ok(outcome) = timed {
                    outcome
                } else {
                    warn!(transaction = id, ttl = ?ttl, "Transaction TTL expired, rolling back");
                    tx.rollback().await?;
                    return Err(DbError::TransactionTimeout { id, ttl }.into());
                }
            }
            None => callback(&mut tx).await,
        };

        match outcome {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                warn!(transaction = id, error = %e, "Callback error, rolling back");
                if let Err(rollback) = tx.rollback().await {
                    warn!(transaction = id, error = %rollback, "Rollback error");
                }
                Err(e)
            }
        }
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Executor for Database {
    type Row = AnyRow;
    type Error = DbError;

    async fn execute(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<u64> {
        let sql = prepare(sql, &args, self.driver.placeholder_style(), &self.options, None);
        let done = bind_all(&sql, args).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn query(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<Vec<AnyRow>> {
        let sql = prepare(sql, &args, self.driver.placeholder_style(), &self.options, None);
        Ok(bind_all(&sql, args).fetch_all(&self.pool).await?)
    }

    async fn query_row(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<Option<AnyRow>> {
        let sql = prepare(sql, &args, self.driver.placeholder_style(), &self.options, None);
        Ok(bind_all(&sql, args).fetch_optional(&self.pool).await?)
    }
}
