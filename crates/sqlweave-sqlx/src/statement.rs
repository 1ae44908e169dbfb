//! Statement preparation shared by pools and transactions.

use std::borrow::Cow;

use sqlweave_core::{compile, SqlValue};
use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::Any;
use tracing::debug;

use crate::config::{Options, PlaceholderStyle};

pub(crate) type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// Rewrites placeholders for the target driver and logs the statement when
/// debugging is on.
pub(crate) fn prepare<'a>(
    sql: &'a str,
    args: &[SqlValue],
    style: PlaceholderStyle,
    options: &Options,
    transaction: Option<u64>,
) -> Cow<'a, str> {
    let sql = match style {
        PlaceholderStyle::Ordinal => compile(sql),
        PlaceholderStyle::Question => Cow::Borrowed(sql),
    };
    if options.debug {
        let args = args
            .iter()
            .map(SqlValue::to_sql_inline)
            .collect::<Vec<_>>()
            .join(", ");
        match transaction {
            Some(id) => debug!(transaction = id, sql = %sql, args = %args, "Executing statement"),
            None => debug!(sql = %sql, args = %args, "Executing statement"),
        }
    }
    sql
}

/// Binds every argument in order.
pub(crate) fn bind_all(sql: &str, args: Vec<SqlValue>) -> AnyQuery<'_> {
    args.into_iter()
        .fold(sqlx::query(sql), |query, value| match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(b),
            SqlValue::Int(i) => query.bind(i),
            SqlValue::Float(f) => query.bind(f),
            SqlValue::Text(s) => query.bind(s),
            SqlValue::Blob(b) => query.bind(b),
        })
}
