//! Statement rendering by `QueryBuilder`.

mod common;
use common::*;

use sqlweave_core::{compile, params, Operator, QueryBuilder, SqlValue};

#[test]
fn with_terms_joins_and_where() {
    let mut rights = select(&["id", "contract_id", "object_id"], "mv_right");
    rights
        .where_mut()
        .add_expression("object_id = ANY(?)", params!["{84f3ba22,81297e48}"]);
    rights.add_order(&["territory_name"]).set_pagination(10, 0);

    let mut contracts = select(&["id", "contract_name"], "mv_contracts");
    contracts
        .where_mut()
        .add_expression("contract_sum > ?", params![23.45]);
    contracts.set_pagination(5, 0);

    let mut qb = QueryBuilder::new();
    qb.with("mv_right_items", rights)
        .with("mv_contracts_items", contracts)
        .from(&["mv_object mo"])
        .columns(&["mo.id", "mo.title", "mo.rightholder_ids", "mr.id", "mr.contract_id"])
        .relate(&["JOIN mv_right_items AS mr ON mr.object_id = mo.id"])
        .relate(&["LEFT JOIN mv_contracts_items AS ci ON ci.id = mr.contract_id"]);
    qb.where_mut()
        .add_expression("mr.object_id IS NOT NULL", params![]);

    assert_eq!(
        qb.to_string(),
        "WITH mv_right_items AS (SELECT id, contract_id, object_id FROM mv_right \
         WHERE (object_id = ANY(?)) ORDER BY territory_name LIMIT 10 OFFSET 0), \
         mv_contracts_items AS (SELECT id, contract_name FROM mv_contracts \
         WHERE (contract_sum > ?) LIMIT 5 OFFSET 0) \
         SELECT mo.id, mo.title, mo.rightholder_ids, mr.id, mr.contract_id \
         FROM mv_object mo \
         JOIN mv_right_items AS mr ON mr.object_id = mo.id \
         LEFT JOIN mv_contracts_items AS ci ON ci.id = mr.contract_id \
         WHERE (mr.object_id IS NOT NULL)"
    );
    assert_eq!(
        qb.arguments(),
        vec![
            SqlValue::Text(String::from("{84f3ba22,81297e48}")),
            SqlValue::Float(23.45)
        ]
    );
}

#[test]
fn every_clause_in_fixed_order() {
    let mut cte = select(&["id"], "t0");
    cte.where_mut().add_expression("c1 = ?", params![1]);

    let mut qb = QueryBuilder::new();
    qb.intersect({
        let mut q = select(&["id"], "t3");
        q.where_mut().add_expression("c6 = ?", params![6]);
        q
    });
    qb.except({
        let mut q = select(&["id"], "t2");
        q.where_mut().add_expression("c5 = ?", params![5]);
        q
    });
    qb.union({
        let mut q = select(&["id"], "t1");
        q.where_mut().add_expression("c4 = ?", params![4]);
        q
    });
    qb.set_pagination(50, 100)
        .add_order(&["id DESC"])
        .group_by(&["id"])
        .relate(&["JOIN w ON w.id = t.id"])
        .from(&["t"])
        .columns(&["id"])
        .with("w", cte);
    qb.having_mut().add_expression("c3 = ?", params![3]);
    qb.where_mut().add_expression("c2 = ?", params![2]);

    let sql = qb.to_string();
    assert_eq!(
        sql,
        "WITH w AS (SELECT id FROM t0 WHERE (c1 = ?)) SELECT id FROM t \
         JOIN w ON w.id = t.id WHERE (c2 = ?) GROUP BY id HAVING (c3 = ?) \
         ORDER BY id DESC LIMIT 50 OFFSET 100 \
         UNION SELECT id FROM t1 WHERE (c4 = ?) \
         EXCEPT SELECT id FROM t2 WHERE (c5 = ?) \
         INTERSECT SELECT id FROM t3 WHERE (c6 = ?)"
    );
    assert_eq!(labels(&sql), ints(&qb.arguments()));
    assert_eq!(labels(&sql), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn no_stray_separators_when_clauses_are_missing() {
    let mut qb = QueryBuilder::new();
    qb.from(&["t"]);
    assert_eq!(qb.to_string(), "FROM t");

    let mut qb = QueryBuilder::new();
    qb.having_mut().add_expression("c1 = ?", params![1]);
    assert_eq!(qb.to_string(), "HAVING (c1 = ?)");

    let mut qb = QueryBuilder::new();
    qb.union(select(&["1"], "a"));
    assert_eq!(qb.to_string(), "UNION SELECT 1 FROM a");
}

#[test]
fn subquery_wraps_once() {
    let mut inner = select(&["user_id"], "orders");
    inner
        .where_mut()
        .add_expression("total > ?", params![100]);
    inner.set_subquery(true);

    let mut qb = select(&["name"], "users");
    qb.where_mut()
        .add_expression(format!("id IN {inner}"), inner.arguments());
    assert_eq!(
        qb.to_string(),
        "SELECT name FROM users WHERE (id IN (SELECT user_id FROM orders WHERE (total > ?)))"
    );
    assert_eq!(qb.arguments(), params![100]);
    assert!(inner.is_subquery());
}

#[test]
fn subquery_operand() {
    let mut derived = select(&["id"], "a");
    derived.set_subquery(true);

    let mut qb = select(&["id"], "b");
    qb.union(derived);
    assert_eq!(qb.to_string(), "SELECT id FROM b UNION (SELECT id FROM a)");
}

#[test]
fn with_term_can_be_edited_in_place() {
    let mut qb = QueryBuilder::new();
    qb.with("recent", select(&["id"], "orders"))
        .columns(&["*"])
        .from(&["recent"]);
    qb.get_with_mut("recent")
        .expect("registered")
        .where_mut()
        .add_expression("c7 = ?", params![7]);

    assert_eq!(
        qb.to_string(),
        "WITH recent AS (SELECT id FROM orders WHERE (c7 = ?)) SELECT * FROM recent"
    );
    assert_eq!(qb.arguments(), params![7]);

    qb.reset_with();
    assert_eq!(qb.to_string(), "SELECT * FROM recent");
    assert!(qb.arguments().is_empty());
}

#[test]
fn or_where_condition() {
    let mut qb = select(&["id"], "t");
    *qb.where_mut() = labelled(Operator::Or, &[1, 2]);
    assert_eq!(qb.to_string(), "SELECT id FROM t WHERE (c1 = ? OR c2 = ?)");
    assert_eq!(qb.where_condition().operator(), Operator::Or);
}

#[test]
fn positional_build_matches_compile() {
    let mut qb = select(&["id"], "t");
    *qb.where_mut() = labelled(Operator::And, &[1, 2, 3]);
    qb.union({
        let mut q = select(&["id"], "u");
        *q.where_mut() = labelled(Operator::And, &[4]);
        q
    });

    let (sql, args) = qb.build();
    let (positional, positional_args) = qb.build_positional();
    assert_eq!(compile(&sql), positional);
    assert_eq!(args, positional_args);
    assert_eq!(ordinals(&positional), vec![1, 2, 3, 4]);
}

#[test]
fn set_operation_resets() {
    let mut qb = select(&["id"], "a");
    qb.union(select(&["id"], "b"))
        .except(select(&["id"], "c"))
        .intersect(select(&["id"], "d"));
    qb.reset_union().reset_except().reset_intersect();
    assert_eq!(qb.to_string(), "SELECT id FROM a");
}
