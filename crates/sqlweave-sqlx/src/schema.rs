//! Schema lookups.

use sqlweave_core::{params, Executor, SqlFilter};
use sqlx::any::AnyRow;
use sqlx::Row;

use crate::config::Driver;
use crate::database::Database;
use crate::error::{DbError, Result};
use crate::transaction::Transaction;

/// An executor bound to a known backend.
pub trait Backend: Executor<Row = AnyRow, Error = DbError> {
    /// Backend the executor talks to.
    fn driver(&self) -> Driver;
}

impl Backend for Database {
    fn driver(&self) -> Driver {
        Self::driver(self)
    }
}

impl Backend for Transaction {
    fn driver(&self) -> Driver {
        Self::driver(self)
    }
}

/// Returns whether `table` exists, optionally restricted to `schema`.
///
/// SQLite looks the name up in `sqlite_master`; other backends use
/// `information_schema.tables`.
pub async fn table_exists<E: Backend>(
    executor: &mut E,
    table: &str,
    schema: Option<&str>,
) -> Result<bool> {
    let mut filter = SqlFilter::new();
    let sql = if executor.driver() == Driver::Sqlite {
        filter
            .add_field_filter("type", "=", "table")
            .add_field_filter("name", "=", table);
        format!("SELECT COUNT(*) FROM sqlite_master {}", filter.with_where())
    } else {
        filter.add_field_filter("table_name", "=", table);
        if let Some(schema) = schema {
            filter.add_field_filter("table_schema", "=", schema);
        }
        format!(
            "SELECT COUNT(*) FROM information_schema.tables {}",
            filter.with_where()
        )
    };
    let row = executor.query_row(&sql, filter.arguments()).await?;
    let count: i64 = match row {
        Some(row) => row.try_get(0)?,
        None => 0,
    };
    Ok(count > 0)
}
