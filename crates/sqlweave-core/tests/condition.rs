//! Rendering and argument order of condition trees.

mod common;
use common::*;

use sqlweave_core::{params, Condition, Operator, QueryBuilder};

#[test]
fn merge_then_own_expression() {
    let mut c = Condition::new(Operator::And);
    c.merge(
        Operator::And,
        [Condition::new(Operator::Or)
            .with_expression("one = ?", params![1])
            .with_expression("one = ?", params![2])],
    );
    c.add_expression("two != ?", params![10]);

    assert_eq!(c.to_string(), "((one = ? OR one = ?) AND (two != ?))");
    assert_eq!(c.arguments(), params![1, 2, 10]);
}

#[test]
fn own_expressions_follow_children_regardless_of_call_order() {
    let mut before = Condition::new(Operator::And);
    before.add_expression("a = ?", params![1]);
    before.merge(Operator::Or, [Condition::new(Operator::And).with_expression("b = ?", params![2])]);

    let mut after = Condition::new(Operator::And);
    after.merge(Operator::Or, [Condition::new(Operator::And).with_expression("b = ?", params![2])]);
    after.add_expression("a = ?", params![1]);

    assert_eq!(before, after);
    assert_eq!(before.to_string(), "((b = ?) OR (a = ?))");
    assert_eq!(before.arguments(), params![2, 1]);
}

#[test]
fn fragments_without_placeholders() {
    let c = Condition::new(Operator::Or)
        .with_expression("deleted_at IS NULL", params![])
        .with_expression("c1 = ?", params![1]);
    assert_eq!(c.to_string(), "(deleted_at IS NULL OR c1 = ?)");
    assert_eq!(placeholder_count(&c.to_string()), c.arguments().len());
}

#[test]
fn empty_children_leave_no_trace() {
    let c = Condition::new(Operator::And)
        .with_merge(
            Operator::Or,
            [Condition::new(Operator::And), Condition::new(Operator::Xor)],
        )
        .with_expression("a = ?", params![1]);
    assert!(c.children().is_empty());
    assert_eq!(c.to_string(), "(a = ?)");
    assert_eq!(c.arguments(), params![1]);

    let mut qb = QueryBuilder::new();
    qb.columns(&["id"]).from(&["t"]);
    qb.where_mut().merge(Operator::Or, [Condition::new(Operator::And)]);
    let hollow = Condition::new(Operator::And).with_merge(Operator::And, [Condition::new(Operator::Or)]);
    qb.having_mut().merge(Operator::Or, [hollow]);
    let sql = qb.to_string();
    assert_eq!(sql, "SELECT id FROM t");
    assert!(!sql.contains("()"));
    assert!(!sql.contains("WHERE"));
    assert!(!sql.contains("HAVING"));
}

#[test]
fn deep_nesting_keeps_label_order() {
    let level3 = labelled(Operator::And, &[1, 2]);
    let level2 = labelled(Operator::Or, &[3]).with_merge(Operator::And, [level3]);
    let level1 = labelled(Operator::Xor, &[5])
        .with_merge(Operator::Or, [level2, labelled(Operator::And, &[4])]);

    let sql = level1.to_string();
    assert_eq!(
        sql,
        "(((c1 = ? AND c2 = ?) AND (c3 = ?)) OR (c4 = ?) OR (c5 = ?))"
    );
    assert_eq!(labels(&sql), ints(&level1.arguments()));
}

#[test]
fn accessors() {
    let c = labelled(Operator::Or, &[1, 2])
        .with_merge(Operator::And, [labelled(Operator::And, &[3])]);
    assert_eq!(c.operator(), Operator::Or);
    assert_eq!(c.merge_operator(), Some(Operator::And));
    assert_eq!(c.expressions(), ["c1 = ?", "c2 = ?"]);
    assert_eq!(c.children()[0].expressions(), ["c3 = ?"]);
}
