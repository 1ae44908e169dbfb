//! Applying and reverting migrations.
//!
//! Each migration class has its own bookkeeping table,
//! `migration_<class> (version, apply_time)`, holding one row per applied
//! version with its Unix apply time.

use chrono::{DateTime, Utc};
use sqlweave_core::{params, Executor, QueryBuilder, SqlValue};
use sqlweave_sqlx::{table_exists, Database};
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};
use crate::migration::{is_valid_name, Migration, MigrationSet};

/// Where a version stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration version.
    pub version: String,
    /// When it was applied, if it was.
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    /// Returns `true` once the version is recorded.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Runs the migrations of one class against a database.
#[derive(Debug, Clone)]
pub struct Migrator {
    db: Database,
    class: String,
    table: String,
}

impl Migrator {
    /// Creates a migrator for `class`.
    ///
    /// The class becomes part of a table name and must be a plain
    /// identifier.
    pub fn new(db: Database, class: &str) -> Result<Self> {
        if !is_valid_name(class) {
            return Err(MigrateError::InvalidName(class.to_string()));
        }
        Ok(Self {
            db,
            class: class.to_string(),
            table: format!("migration_{class}"),
        })
    }

    /// Migration class.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Name of the bookkeeping table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the bookkeeping table when it does not exist yet.
    pub async fn init(&mut self) -> Result<()> {
        if table_exists(&mut self.db, &self.table, None).await? {
            debug!(table = %self.table, "Migration table already exists");
            return Ok(());
        }
        let sql = format!(
            "CREATE TABLE {} (version TEXT NOT NULL PRIMARY KEY, apply_time BIGINT NOT NULL)",
            self.table
        );
        self.db.execute(&sql, params![]).await?;
        info!(table = %self.table, "Migration table created");
        Ok(())
    }

    /// Apply time of `version`, if recorded.
    pub async fn applied_at(&mut self, version: &str) -> Result<Option<DateTime<Utc>>> {
        let mut qb = QueryBuilder::new();
        qb.columns(&["apply_time"]).from(&[self.table.as_str()]);
        qb.where_mut().add_expression("version = ?", params![version]);

        match self.db.fetch_one(&qb).await? {
            Some(row) => Ok(DateTime::from_timestamp(row.try_get(0)?, 0)),
            None => Ok(None),
        }
    }

    /// Every recorded version with its apply time, in version order.
    pub async fn applied(&mut self) -> Result<Vec<MigrationStatus>> {
        let mut qb = QueryBuilder::new();
        qb.columns(&["version", "apply_time"])
            .from(&[self.table.as_str()])
            .add_order(&["version"]);

        let rows = self.db.fetch(&qb).await?;
        rows.iter()
            .map(|row| -> Result<MigrationStatus> {
                Ok(MigrationStatus {
                    version: row.try_get(0)?,
                    applied_at: DateTime::from_timestamp(row.try_get(1)?, 0),
                })
            })
            .collect()
    }

    /// Applies every migration of `set` not recorded yet, in version order.
    ///
    /// Each migration runs in its own transaction together with its
    /// bookkeeping row. Returns the versions applied.
    pub async fn upgrade(&mut self, set: &MigrationSet) -> Result<Vec<String>> {
        let mut applied = Vec::new();
        for migration in set {
            if self.applied_at(&migration.version).await?.is_some() {
                debug!(class = %self.class, version = %migration.version, "Already applied");
                continue;
            }
            info!(class = %self.class, version = %migration.version, "Applying migration");
            let record = format!(
                "INSERT INTO {} (version, apply_time) VALUES (?, ?)",
                self.table
            );
            self.run(
                migration.up.clone(),
                record,
                params![migration.version.as_str(), Utc::now().timestamp()],
            )
            .await?;
            applied.push(migration.version.clone());
        }
        info!(class = %self.class, count = applied.len(), "Upgrade finished");
        Ok(applied)
    }

    /// Reverts `version` and removes its bookkeeping row.
    ///
    /// Returns `false` when the version was never applied.
    pub async fn downgrade(&mut self, set: &MigrationSet, version: &str) -> Result<bool> {
        let migration: &Migration = set
            .get(version)
            .ok_or_else(|| MigrateError::UnknownVersion(version.to_string()))?;

        if self.applied_at(version).await?.is_none() {
            warn!(class = %self.class, version = %version, "No migration for downgrade");
            return Ok(false);
        }

        info!(class = %self.class, version = %version, "Reverting migration");
        let record = format!("DELETE FROM {} WHERE version = ?", self.table);
        self.run(migration.down.clone(), record, params![version])
            .await?;
        Ok(true)
    }

    /// Status of every migration in `set`.
    pub async fn status(&mut self, set: &MigrationSet) -> Result<Vec<MigrationStatus>> {
        let applied = self.applied().await?;
        Ok(set
            .iter()
            .map(|migration| MigrationStatus {
                version: migration.version.clone(),
                applied_at: applied
                    .iter()
                    .find(|a| a.version == migration.version)
                    .and_then(|a| a.applied_at),
            })
            .collect())
    }

    /// Runs `statements` then the bookkeeping statement in one transaction.
    async fn run(
        &self,
        statements: Vec<String>,
        record: String,
        record_args: Vec<SqlValue>,
    ) -> Result<()> {
        self.db
            .run_in_transaction::<_, MigrateError, _>(move |tx| {
                Box::pin(async move {
                    for sql in &statements {
                        tx.execute(sql, params![]).await?;
                    }
                    tx.execute(&record, record_args).await?;
                    Ok(())
                })
            })
            .await
    }
}
