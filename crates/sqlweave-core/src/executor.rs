//! The boundary between rendered statements and a database driver.
//!
//! The builders in this crate never execute anything. Driver crates implement
//! [`Executor`] for their pools and transactions; callers hand them the
//! `(sql, arguments)` pairs produced by [`QueryBuilder::build`] or
//! [`SqlFilter`](crate::SqlFilter).

use std::future::Future;

use crate::builder::{QueryBuilder, SqlValue};

/// Something that runs a statement with bound arguments.
///
/// Statements use `?` placeholders. Implementations targeting drivers that
/// need ordinal markers are expected to run them through
/// [`compile`](crate::compile()) themselves.
pub trait Executor: Send {
    /// Row type returned by queries.
    type Row: Send;
    /// Driver error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs a statement and returns the number of affected rows.
    fn execute(
        &mut self,
        sql: &str,
        args: Vec<SqlValue>,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Runs a query and returns every row.
    fn query(
        &mut self,
        sql: &str,
        args: Vec<SqlValue>,
    ) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;

    /// Runs a query and returns the first row, if any.
    fn query_row(
        &mut self,
        sql: &str,
        args: Vec<SqlValue>,
    ) -> impl Future<Output = Result<Option<Self::Row>, Self::Error>> + Send;

    /// Renders `query` and returns every row.
    fn fetch(
        &mut self,
        query: &QueryBuilder,
    ) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send {
        let (sql, args) = query.build();
        async move { self.query(&sql, args).await }
    }

    /// Renders `query` and returns the first row, if any.
    fn fetch_one(
        &mut self,
        query: &QueryBuilder,
    ) -> impl Future<Output = Result<Option<Self::Row>, Self::Error>> + Send {
        let (sql, args) = query.build();
        async move { self.query_row(&sql, args).await }
    }
}
