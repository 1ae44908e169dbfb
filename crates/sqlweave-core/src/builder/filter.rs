//! Statement tails for hand-written queries.
//!
//! [`SqlFilter`] renders everything that follows `FROM ...`: the `WHERE`
//! condition, grouping, `HAVING`, ordering and pagination. It suits callers
//! that keep the head of the statement as literal SQL.

use std::fmt;

use super::condition::Condition;
use super::order::{Operator, OrderBy, Pagination};
use super::value::{SqlValue, ToSqlValue};

/// The filtering tail of a SELECT, UPDATE or DELETE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    where_clause: Condition,
    having: Condition,
    group: Vec<String>,
    orders: Vec<String>,
    pagination: Option<Pagination>,
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

impl SqlFilter {
    /// Creates an empty filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            where_clause: Condition::new(Operator::And),
            having: Condition::new(Operator::And),
            group: Vec::new(),
            orders: Vec::new(),
            pagination: None,
        }
    }

    /// The `WHERE` condition.
    pub fn where_mut(&mut self) -> &mut Condition {
        &mut self.where_clause
    }

    /// The `HAVING` condition.
    pub fn having_mut(&mut self) -> &mut Condition {
        &mut self.having
    }

    /// Adds `field op ?` to the `WHERE` condition.
    pub fn add_field_filter(&mut self, field: &str, op: &str, value: impl ToSqlValue) -> &mut Self {
        self.where_clause
            .add_expression(format!("{field} {op} ?"), vec![value.to_sql_value()]);
        self
    }

    /// Adds `field IN (?,...)` with one placeholder per value.
    pub fn add_in_filter(&mut self, field: &str, values: Vec<SqlValue>) -> &mut Self {
        let expression = format!("{field} IN ({})", placeholders(values.len()));
        self.where_clause.add_expression(expression, values);
        self
    }

    /// Adds `field NOT IN (?,...)` with one placeholder per value.
    pub fn add_not_in_filter(&mut self, field: &str, values: Vec<SqlValue>) -> &mut Self {
        let expression = format!("{field} NOT IN ({})", placeholders(values.len()));
        self.where_clause.add_expression(expression, values);
        self
    }

    /// Adds the rendered tails of `filters`, OR-ed together, as one `WHERE`
    /// expression carrying all of their arguments.
    pub fn add_or_filters(&mut self, filters: &[SqlFilter]) -> &mut Self {
        let mut arguments = Vec::new();
        let mut parts = Vec::with_capacity(filters.len());
        for filter in filters {
            arguments.extend(filter.arguments());
            parts.push(filter.to_string());
        }
        self.where_clause
            .add_expression(format!("({})", parts.join(" OR ")), arguments);
        self
    }

    /// Appends raw `ORDER BY` items.
    pub fn add_order(&mut self, expressions: &[&str]) -> &mut Self {
        self.orders
            .extend(expressions.iter().map(|s| String::from(*s)));
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

    /// Appends `GROUP BY` items.
    pub fn group_by(&mut self, fields: &[&str]) -> &mut Self {
        self.group.extend(fields.iter().map(|s| String::from(*s)));
        self
    }

    /// Removes every `GROUP BY` item.
    pub fn reset_group_by(&mut self) -> &mut Self {
        self.group.clear();
        self
    }

    /// Replaces the pagination.
    pub fn set_pagination(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.pagination = Some(Pagination::new(limit, offset));
        self
    }

    /// `WHERE` arguments followed by `HAVING` arguments.
    #[must_use]
    pub fn arguments(&self) -> Vec<SqlValue> {
        let mut out = self.where_clause.arguments();
        self.having.collect_arguments(&mut out);
        out
    }

    /// The tail prefixed with `WHERE ` when the condition is not empty.
    #[must_use]
    pub fn with_where(&self) -> String {
        if self.where_clause.is_empty() {
            self.to_string()
        } else {
            format!("WHERE {self}")
        }
    }
}

impl fmt::Display for SqlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        if !self.where_clause.is_empty() {
            parts.push(self.where_clause.to_string());
        }
        if !self.group.is_empty() {
            parts.push(format!("GROUP BY {}", self.group.join(", ")));
        }
        if !self.having.is_empty() {
            parts.push(format!("HAVING {}", self.having));
        }
        if !self.orders.is_empty() {
            parts.push(format!("ORDER BY {}", self.orders.join(", ")));
        }
        if let Some(limit) = self.pagination.and_then(|p| p.to_sql()) {
            parts.push(limit);
        }
        f.write_str(&parts.join(" "))
    }
}
