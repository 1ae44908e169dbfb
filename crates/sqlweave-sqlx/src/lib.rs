//! # sqlweave-sqlx
//!
//! Runs statements built with `sqlweave-core` through sqlx's `Any` driver.
//!
//! - [`Database`] wraps a connection pool, [`Transaction`] an open
//!   transaction; both implement [`Executor`](sqlweave_core::Executor)
//! - statements are rewritten to `$n` placeholders for PostgreSQL
//! - [`ConnectionConfig`] loads connection settings from JSON
//! - [`Database::run_in_transaction`] commits or rolls back around a
//!   callback, with an optional TTL
//!
//! ```rust,no_run
//! use sqlweave_core::{params, Executor, QueryBuilder};
//! use sqlweave_sqlx::{Database, Options};
//!
//! # async fn demo() -> Result<(), sqlweave_sqlx::DbError> {
//! let mut db = Database::connect("postgres://app@localhost/app", Options::default()).await?;
//!
//! let mut qb = QueryBuilder::new();
//! qb.columns(&["id"]).from(&["users"]);
//! qb.where_mut().add_expression("email = ?", params!["a@b.c"]);
//!
//! // Sent as: SELECT id FROM users WHERE (email = $1)
//! let rows = db.fetch(&qb).await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod schema;
mod statement;
pub mod transaction;

pub use config::{ConnectionConfig, Driver, Options, PlaceholderStyle};
pub use database::Database;
pub use error::{DbError, Result};
pub use schema::{table_exists, Backend};
pub use transaction::{Transaction, TransactionInfo};
