//! Recursive predicate trees for `WHERE` and `HAVING`.
//!
//! A [`Condition`] holds raw predicate fragments joined by one operator and,
//! optionally, a list of child conditions joined by a second operator. The
//! node's own fragments take part in the merge as one more operand placed
//! after every child, so the placeholders of the rendered text and the
//! values returned by [`Condition::arguments`] always line up.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::{params, Condition, Operator};
//!
//! let mut condition = Condition::new(Operator::And);
//! condition.merge(
//!     Operator::And,
//!     [Condition::new(Operator::Or)
//!         .with_expression("one = ?", params![1])
//!         .with_expression("one = ?", params![2])],
//! );
//! condition.add_expression("two != ?", params![10]);
//!
//! assert_eq!(condition.to_string(), "((one = ? OR one = ?) AND (two != ?))");
//! assert_eq!(condition.arguments(), params![1, 2, 10]);
//! ```

use std::fmt;

use super::order::Operator;
use super::value::SqlValue;

/// Child conditions combined under one operator.
#[derive(Debug, Clone, PartialEq)]
struct Merge {
    operator: Operator,
    conditions: Vec<Condition>,
}

/// A boolean expression tree node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    operator: Operator,
    expressions: Vec<String>,
    arguments: Vec<SqlValue>,
    merge: Option<Merge>,
}

impl Condition {
    /// Creates an empty condition whose own fragments are joined by `operator`.
    #[must_use]
    pub const fn new(operator: Operator) -> Self {
        Self {
            operator,
            expressions: Vec::new(),
            arguments: Vec::new(),
            merge: None,
        }
    }

    /// Appends a predicate fragment and the values bound to its placeholders.
    ///
    /// Neither the fragment nor the argument count is checked.
    pub fn add_expression(
        &mut self,
        expression: impl Into<String>,
        arguments: Vec<SqlValue>,
    ) -> &mut Self {
        self.expressions.push(expression.into());
        self.arguments.extend(arguments);
        self
    }

    /// Consuming form of [`Condition::add_expression`].
    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>, arguments: Vec<SqlValue>) -> Self {
        self.add_expression(expression, arguments);
        self
    }

    /// Merges child conditions into this node.
    ///
    /// Empty children are skipped. The first call that brings at least one
    /// non-empty child fixes the merge operator; later calls append their
    /// children under that operator and their own `operator` argument is
    /// ignored.
    pub fn merge(
        &mut self,
        operator: Operator,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> &mut Self {
        for condition in conditions.into_iter().filter(|c| !c.is_empty()) {
            self.merge
                .get_or_insert_with(|| Merge {
                    operator,
                    conditions: Vec::new(),
                })
                .conditions
                .push(condition);
        }
        self
    }

    /// Consuming form of [`Condition::merge`].
    #[must_use]
    pub fn with_merge(
        mut self,
        operator: Operator,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Self {
        self.merge(operator, conditions);
        self
    }

    /// Returns `true` when the node has neither fragments nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty() && self.merge.is_none()
    }

    /// Operator joining this node's own fragments.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Operator joining the merged children, once a merge happened.
    #[must_use]
    pub fn merge_operator(&self) -> Option<Operator> {
        self.merge.as_ref().map(|m| m.operator)
    }

    /// This node's own fragments, in insertion order.
    #[must_use]
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// Merged children, in merge order.
    #[must_use]
    pub fn children(&self) -> &[Condition] {
        self.merge.as_ref().map_or(&[], |m| m.conditions.as_slice())
    }

    /// Returns the bound values in placeholder order: children first, then
    /// this node's own values.
    #[must_use]
    pub fn arguments(&self) -> Vec<SqlValue> {
        let mut out = Vec::new();
        self.collect_arguments(&mut out);
        out
    }

    pub(crate) fn collect_arguments(&self, out: &mut Vec<SqlValue>) {
        if let Some(merge) = &self.merge {
            for condition in &merge.conditions {
                condition.collect_arguments(out);
            }
        }
        out.extend(self.arguments.iter().cloned());
    }

    fn write_own(&self, out: &mut String) {
        out.push('(');
        for (i, expression) in self.expressions.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(self.operator.as_str());
                out.push(' ');
            }
            out.push_str(expression);
        }
        out.push(')');
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match &self.merge {
            None => {
                if !self.expressions.is_empty() {
                    self.write_own(out);
                }
            }
            Some(merge) => {
                out.push('(');
                for (i, condition) in merge.conditions.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                        out.push_str(merge.operator.as_str());
                        out.push(' ');
                    }
                    condition.write_sql(out);
                }
                if !self.expressions.is_empty() {
                    out.push(' ');
                    out.push_str(merge.operator.as_str());
                    out.push(' ');
                    self.write_own(out);
                }
                out.push(')');
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_sql(&mut out);
        f.write_str(&out)
    }
}
