#![allow(dead_code)]

use sqlweave_core::{Condition, Operator, QueryBuilder, SqlValue};

/// Counts unescaped `?` placeholders.
pub fn placeholder_count(sql: &str) -> usize {
    sql.replace("??", "").matches('?').count()
}

/// Labels of every `c<label> = ?` fragment, in text order.
pub fn labels(sql: &str) -> Vec<i64> {
    sql.split('c')
        .skip(1)
        .filter_map(|piece| {
            let digits: String = piece.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() || !piece[digits.len()..].starts_with(" = ?") {
                return None;
            }
            digits.parse().ok()
        })
        .collect()
}

/// Integer arguments, panicking on anything else.
pub fn ints(args: &[SqlValue]) -> Vec<i64> {
    args.iter()
        .map(|value| match value {
            SqlValue::Int(n) => *n,
            other => panic!("Expected integer argument, got {other:?}"),
        })
        .collect()
}

/// Every `$n` ordinal in text order.
pub fn ordinals(sql: &str) -> Vec<usize> {
    sql.split('$')
        .skip(1)
        .map(|piece| {
            let digits: String = piece.chars().take_while(char::is_ascii_digit).collect();
            digits
                .parse()
                .unwrap_or_else(|e| panic!("Bad marker in {sql}: {e}"))
        })
        .collect()
}

/// A leaf condition holding `c<label> = ?` bound to `label`.
pub fn labelled(operator: Operator, labels: &[i64]) -> Condition {
    let mut condition = Condition::new(operator);
    for label in labels {
        condition.add_expression(format!("c{label} = ?"), vec![SqlValue::Int(*label)]);
    }
    condition
}

/// `SELECT <columns> FROM <table>`.
pub fn select(columns: &[&str], table: &str) -> QueryBuilder {
    let mut qb = QueryBuilder::new();
    qb.columns(columns).from(&[table]);
    qb
}
