//! Statement composition.
//!
//! - [`Condition`]: recursive `WHERE`/`HAVING` predicate trees
//! - [`QueryBuilder`]: full SELECT statements, nestable as CTEs and set
//!   operation operands
//! - [`SqlFilter`]: the filtering tail of hand-written statements
//!
//! All builders render `?` placeholders and return arguments in the order the
//! placeholders appear. Run the text through [`compile`](crate::compile()) for drivers
//! that need `$n` markers.

mod condition;
mod filter;
mod order;
mod query;
mod value;

pub use condition::Condition;
pub use filter::SqlFilter;
pub use order::{Operator, OrderBy, OrderDirection, Pagination};
pub use query::QueryBuilder;
pub use value::{SqlValue, ToSqlValue};
