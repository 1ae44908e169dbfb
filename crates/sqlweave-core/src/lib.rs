//! # sqlweave-core
//!
//! Composable SQL statements with bound arguments that always line up with
//! their placeholders.
//!
//! This crate provides:
//! - [`Condition`], a recursive predicate tree for `WHERE` and `HAVING`
//! - [`QueryBuilder`], a SELECT builder nestable as CTEs and set operations
//! - [`SqlFilter`], the filtering tail of a hand-written statement
//! - [`compile()`], a `?` to `$n` placeholder rewriter
//! - [`Executor`], the trait driver crates implement to run statements
//!
//! ## Building a query
//!
//! ```rust
//! use sqlweave_core::{compile, params, QueryBuilder};
//!
//! let mut qb = QueryBuilder::new();
//! qb.columns(&["id", "name"])
//!     .from(&["users"])
//!     .add_order(&["name"])
//!     .set_pagination(20, 40);
//! qb.where_mut()
//!     .add_expression("active = ?", params![true])
//!     .add_expression("age >= ?", params![18]);
//!
//! let (sql, args) = qb.build();
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM users WHERE (active = ? AND age >= ?) \
//!      ORDER BY name LIMIT 20 OFFSET 40"
//! );
//! assert_eq!(args, params![true, 18]);
//!
//! // PostgreSQL wants ordinal markers.
//! assert_eq!(
//!     compile(&sql),
//!     "SELECT id, name FROM users WHERE (active = $1 AND age >= $2) \
//!      ORDER BY name LIMIT 20 OFFSET 40"
//! );
//! ```
//!
//! ## Injection safety
//!
//! User input only ever travels as an argument. Fragments passed to the
//! builders are written verbatim into the statement, so they must be
//! trusted text.

pub mod builder;
pub mod compile;
pub mod executor;

pub use builder::{
    Condition, Operator, OrderBy, OrderDirection, Pagination, QueryBuilder, SqlFilter, SqlValue,
    ToSqlValue,
};
pub use compile::{compile, MAX_PARAMETERS};
pub use executor::Executor;
