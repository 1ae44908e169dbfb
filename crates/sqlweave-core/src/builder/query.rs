//! SELECT statement builder.
//!
//! [`QueryBuilder`] composes every clause of a SELECT out of raw text
//! fragments and two [`Condition`] trees. Nothing is mandatory: a clause is
//! emitted only when it has content, so a half-built statement still renders
//! without stray keywords or separators.
//!
//! Builders nest. A builder can be registered as a named `WITH` term or as a
//! `UNION`/`EXCEPT`/`INTERSECT` operand of another builder, and rendering and
//! argument collection simply recurse.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::{params, QueryBuilder};
//!
//! let mut recent = QueryBuilder::new();
//! recent.columns(&["id", "user_id"]).from(&["orders"]);
//! recent.where_mut().add_expression("created_at > ?", params!["2024-01-01"]);
//!
//! let mut qb = QueryBuilder::new();
//! qb.with("recent", recent)
//!     .columns(&["u.name", "COUNT(r.id)"])
//!     .from(&["users u"])
//!     .relate(&["JOIN recent r ON r.user_id = u.id"])
//!     .group_by(&["u.name"]);
//! qb.having_mut().add_expression("COUNT(r.id) > ?", params![3]);
//!
//! assert_eq!(
//!     qb.to_string(),
//!     "WITH recent AS (SELECT id, user_id FROM orders WHERE (created_at > ?)) \
//!      SELECT u.name, COUNT(r.id) FROM users u JOIN recent r ON r.user_id = u.id \
//!      GROUP BY u.name HAVING (COUNT(r.id) > ?)"
//! );
//! assert_eq!(qb.arguments(), params!["2024-01-01", 3]);
//! ```

use std::fmt;

use super::condition::Condition;
use super::order::{Operator, OrderBy, Pagination};
use super::value::SqlValue;
use crate::compile::compile;

/// A composable SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    with: Vec<(String, QueryBuilder)>,
    columns: Vec<String>,
    from: Vec<String>,
    join: Vec<String>,
    where_clause: Condition,
    group: Vec<String>,
    having: Condition,
    orders: Vec<String>,
    pagination: Option<Pagination>,
    union: Vec<QueryBuilder>,
    except: Vec<QueryBuilder>,
    intersect: Vec<QueryBuilder>,
    is_subquery: bool,
}

fn extend(target: &mut Vec<String>, items: &[&str]) {
    target.extend(items.iter().map(|s| String::from(*s)));
}

impl QueryBuilder {
    /// Creates an empty builder with AND-joined `WHERE` and `HAVING`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            with: Vec::new(),
            columns: Vec::new(),
            from: Vec::new(),
            join: Vec::new(),
            where_clause: Condition::new(Operator::And),
            group: Vec::new(),
            having: Condition::new(Operator::And),
            orders: Vec::new(),
            pagination: None,
            union: Vec::new(),
            except: Vec::new(),
            intersect: Vec::new(),
            is_subquery: false,
        }
    }

    /// Registers a named common table expression.
    ///
    /// Re-registering a name replaces the sub-query but keeps the slot of
    /// the first registration. Empty names are ignored.
    pub fn with(&mut self, name: &str, query: QueryBuilder) -> &mut Self {
        if name.is_empty() {
            return self;
        }
        match self.with.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = query,
            None => self.with.push((String::from(name), query)),
        }
        self
    }

    /// Returns the common table expression registered under `name`.
    #[must_use]
    pub fn get_with(&self, name: &str) -> Option<&QueryBuilder> {
        self.with.iter().find(|(n, _)| n == name).map(|(_, q)| q)
    }

    /// Mutable access to a registered common table expression.
    pub fn get_with_mut(&mut self, name: &str) -> Option<&mut QueryBuilder> {
        self.with.iter_mut().find(|(n, _)| n == name).map(|(_, q)| q)
    }

    /// Removes every common table expression.
    pub fn reset_with(&mut self) -> &mut Self {
        self.with.clear();
        self
    }

    /// Appends selected columns.
    pub fn columns(&mut self, columns: &[&str]) -> &mut Self {
        extend(&mut self.columns, columns);
        self
    }

    /// Removes every selected column.
    pub fn reset_columns(&mut self) -> &mut Self {
        self.columns.clear();
        self
    }

    /// Appends `FROM` items.
    pub fn from(&mut self, tables: &[&str]) -> &mut Self {
        extend(&mut self.from, tables);
        self
    }

    /// Removes every `FROM` item.
    pub fn reset_from(&mut self) -> &mut Self {
        self.from.clear();
        self
    }

    /// Appends join fragments, rendered verbatim after `FROM`.
    pub fn relate(&mut self, relations: &[&str]) -> &mut Self {
        extend(&mut self.join, relations);
        self
    }

    /// Removes every join fragment.
    pub fn reset_relations(&mut self) -> &mut Self {
        self.join.clear();
        self
    }

    /// The `WHERE` condition.
    pub fn where_mut(&mut self) -> &mut Condition {
        &mut self.where_clause
    }

    /// Read access to the `WHERE` condition.
    #[must_use]
    pub const fn where_condition(&self) -> &Condition {
        &self.where_clause
    }

    /// The `HAVING` condition.
    pub fn having_mut(&mut self) -> &mut Condition {
        &mut self.having
    }

    /// Read access to the `HAVING` condition.
    #[must_use]
    pub const fn having_condition(&self) -> &Condition {
        &self.having
    }

    /// Appends `GROUP BY` items.
    pub fn group_by(&mut self, fields: &[&str]) -> &mut Self {
        extend(&mut self.group, fields);
        self
    }

    /// Removes every `GROUP BY` item.
    pub fn reset_group_by(&mut self) -> &mut Self {
        self.group.clear();
        self
    }

    /// Appends raw `ORDER BY` items such as `"created_at DESC"`.
    pub fn add_order(&mut self, expressions: &[&str]) -> &mut Self {
        extend(&mut self.orders, expressions);
        self
    }

    /// Appends a typed `ORDER BY` item.
    pub fn order_by(&mut self, order: &OrderBy) -> &mut Self {
        self.orders.push(order.to_sql());
        self
    }

    /// Removes every `ORDER BY` item.
    pub fn reset_order(&mut self) -> &mut Self {
        self.orders.clear();
        self
    }

    /// Replaces the pagination. A `limit` of zero or less drops the clause.
    pub fn set_pagination(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.pagination = Some(Pagination::new(limit, offset));
        self
    }

    /// Current pagination, if one was set.
    #[must_use]
    pub const fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Appends a `UNION` operand.
    pub fn union(&mut self, query: QueryBuilder) -> &mut Self {
        self.union.push(query);
        self
    }

    /// Removes every `UNION` operand.
    pub fn reset_union(&mut self) -> &mut Self {
        self.union.clear();
        self
    }

    /// Appends an `EXCEPT` operand.
    pub fn except(&mut self, query: QueryBuilder) -> &mut Self {
        self.except.push(query);
        self
    }

    /// Removes every `EXCEPT` operand.
    pub fn reset_except(&mut self) -> &mut Self {
        self.except.clear();
        self
    }

    /// Appends an `INTERSECT` operand.
    pub fn intersect(&mut self, query: QueryBuilder) -> &mut Self {
        self.intersect.push(query);
        self
    }

    /// Removes every `INTERSECT` operand.
    pub fn reset_intersect(&mut self) -> &mut Self {
        self.intersect.clear();
        self
    }

    /// Wraps the rendered statement in parentheses when `true`, for use as a
    /// derived table or scalar sub-query.
    pub fn set_subquery(&mut self, is_subquery: bool) -> &mut Self {
        self.is_subquery = is_subquery;
        self
    }

    /// Whether the statement renders parenthesized.
    #[must_use]
    pub const fn is_subquery(&self) -> bool {
        self.is_subquery
    }

    /// Returns the bound values in placeholder order.
    ///
    /// `WITH` terms, then `WHERE`, `HAVING`, and the `UNION`, `EXCEPT` and
    /// `INTERSECT` operands, matching the clause order of the rendered text.
    #[must_use]
    pub fn arguments(&self) -> Vec<SqlValue> {
        let mut out = Vec::new();
        self.collect_arguments(&mut out);
        out
    }

    fn collect_arguments(&self, out: &mut Vec<SqlValue>) {
        for (_, query) in &self.with {
            query.collect_arguments(out);
        }
        self.where_clause.collect_arguments(out);
        self.having.collect_arguments(out);
        for query in self.union.iter().chain(&self.except).chain(&self.intersect) {
            query.collect_arguments(out);
        }
    }

    /// Renders the statement and collects its arguments.
    #[must_use]
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        (self.to_string(), self.arguments())
    }

    /// Like [`QueryBuilder::build`], with `?` placeholders rewritten to
    /// `$1`, `$2`, ...
    #[must_use]
    pub fn build_positional(&self) -> (String, Vec<SqlValue>) {
        let sql = self.to_string();
        let sql = compile(&sql).into_owned();
        (sql, self.arguments())
    }

    fn write_sql(&self, out: &mut String) {
        if self.is_subquery {
            out.push('(');
        }
        let body = out.len();
        // Opens a new clause, separated from the previous one by a space.
        let clause = |out: &mut String| {
            if out.len() > body {
                out.push(' ');
            }
        };

        if !self.with.is_empty() {
            out.push_str("WITH ");
            for (i, (name, query)) in self.with.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(" AS (");
                query.write_sql(out);
                out.push(')');
            }
        }
        if !self.columns.is_empty() {
            clause(out);
            out.push_str("SELECT ");
            out.push_str(&self.columns.join(", "));
        }
        if !self.from.is_empty() {
            clause(out);
            out.push_str("FROM ");
            out.push_str(&self.from.join(", "));
        }
        if !self.join.is_empty() {
            clause(out);
            out.push_str(&self.join.join(" "));
        }
        if !self.where_clause.is_empty() {
            clause(out);
            out.push_str("WHERE ");
            self.where_clause.write_sql(out);
        }
        if !self.group.is_empty() {
            clause(out);
            out.push_str("GROUP BY ");
            out.push_str(&self.group.join(", "));
        }
        if !self.having.is_empty() {
            clause(out);
            out.push_str("HAVING ");
            self.having.write_sql(out);
        }
        if !self.orders.is_empty() {
            clause(out);
            out.push_str("ORDER BY ");
            out.push_str(&self.orders.join(", "));
        }
        if let Some(limit) = self.pagination.and_then(|p| p.to_sql()) {
            clause(out);
            out.push_str(&limit);
        }
        for (keyword, operands) in [
            ("UNION", &self.union),
            ("EXCEPT", &self.except),
            ("INTERSECT", &self.intersect),
        ] {
            for query in operands {
                clause(out);
                out.push_str(keyword);
                out.push(' ');
                query.write_sql(out);
            }
        }

        if self.is_subquery {
            out.push(')');
        }
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_sql(&mut out);
        f.write_str(&out)
    }
}
