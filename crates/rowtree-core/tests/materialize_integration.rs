//! Integration tests for join trees, materialization and cursors.

use std::sync::Arc;

use rowtree_core::proto::{flat_row, FlatRow, Value};
use rowtree_core::{
    Cursor, Error, JoinConfig, JoinMatching, JoinNode, JoinSpec, RecordCursor, SelectionCursor,
};

/// Customer -> orders -> lines, plus customer -> addresses.
fn shop_tree() -> JoinNode {
    let lines = JoinNode::tabular("l", ["id"]).unwrap();
    let orders = JoinNode::tabular("o", ["id"])
        .unwrap()
        .with_join("order_lines", lines)
        .unwrap();
    let addresses = JoinNode::tabular("a", ["id"]).unwrap();

    JoinNode::tabular("cu", ["id"])
        .unwrap()
        .with_join("Orders", orders)
        .unwrap()
        .with_join("addresses", addresses)
        .unwrap()
}

fn shop_row(
    customer: i64,
    order: Option<i64>,
    line: Option<i64>,
    address: Option<i64>,
) -> FlatRow {
    flat_row([
        ("cu_T_id", Value::Int64(customer)),
        ("cu_T_name", Value::String(format!("customer {customer}"))),
        ("o_T_id", order.into()),
        ("o_T_total", order.map(|o| o * 100).into()),
        ("l_T_id", line.into()),
        ("l_T_sku", line.map(|l| format!("sku-{l}")).into()),
        ("a_T_id", address.into()),
        ("a_T_city", address.map(|a| format!("city-{a}")).into()),
    ])
}

fn shop_rows() -> Vec<FlatRow> {
    vec![
        shop_row(1, Some(10), Some(100), Some(7)),
        shop_row(1, Some(10), Some(101), Some(7)),
        shop_row(1, Some(11), Some(110), Some(7)),
        shop_row(1, Some(10), Some(100), Some(8)),
        shop_row(2, None, None, Some(9)),
        shop_row(3, Some(30), None, None),
    ]
}

fn keys(cursor: &RecordCursor) -> Vec<String> {
    cursor.records().keys().cloned().collect()
}

#[test]
fn test_three_level_dedup() {
    let tree = shop_tree();
    let arranged = tree.arrange_flat_data(&shop_rows()).unwrap();

    let customers: Vec<_> = arranged.keys().cloned().collect();
    assert_eq!(customers, vec!["1", "2", "3"]);

    let orders = arranged["1"].joint("Orders").unwrap();
    let order_ids: Vec<_> = orders.keys().cloned().collect();
    assert_eq!(order_ids, vec!["10", "11"]);

    // Lines of order 10 gathered across non-adjacent rows, no duplicates.
    let lines = orders["10"].joint("order_lines").unwrap();
    let line_ids: Vec<_> = lines.keys().cloned().collect();
    assert_eq!(line_ids, vec!["100", "101"]);

    let addresses = arranged["1"].joint("addresses").unwrap();
    let address_ids: Vec<_> = addresses.keys().cloned().collect();
    assert_eq!(address_ids, vec!["7", "8"]);
}

#[test]
fn test_outer_join_branches_present_but_empty() {
    let tree = shop_tree();
    let arranged = tree.arrange_flat_data(&shop_rows()).unwrap();

    assert!(arranged["2"].joint("Orders").unwrap().is_empty());
    assert_eq!(arranged["2"].joint("addresses").unwrap().len(), 1);

    let orders = arranged["3"].joint("Orders").unwrap();
    assert_eq!(orders.len(), 1);
    assert!(orders["30"].joint("order_lines").unwrap().is_empty());

    // Joins that were never registered are absent, not empty.
    assert!(arranged["3"].joint("payments").is_none());
}

#[test]
fn test_materialization_is_deterministic() {
    let rows = shop_rows();
    let a = shop_tree().arrange_flat_data(&rows).unwrap();
    let b = shop_tree().arrange_flat_data(&rows).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cursor_tree_stays_in_sync() {
    let mut cursor = RecordCursor::from_rows(Arc::new(shop_tree()), &shop_rows()).unwrap();
    let arranged = Arc::clone(cursor.records());

    while cursor.is_valid() {
        let key = cursor.key().unwrap().to_string();
        let record = &arranged[key.as_str()];

        let orders = cursor.child("orders").unwrap();
        assert_eq!(**orders.records(), **record.joint("Orders").unwrap());

        while orders.is_valid() {
            let order_key = orders.key().unwrap().to_string();
            let expected = record.joint("Orders").unwrap()[order_key.as_str()]
                .joint("order_lines")
                .unwrap()
                .clone();

            let lines = orders.child("OrderLines").unwrap();
            assert_eq!(**lines.records(), *expected);
            orders.advance();
        }

        let addresses = cursor.child("Addresses").unwrap();
        assert_eq!(**addresses.records(), **record.joint("addresses").unwrap());

        cursor.advance();
    }

    // Past the end every child is empty.
    assert!(cursor.child("orders").unwrap().is_empty());
    assert!(cursor.child("orders").unwrap().child("order_lines").unwrap().is_empty());
}

#[test]
fn test_grandchild_resets_when_parent_moves() {
    let mut cursor = RecordCursor::from_rows(Arc::new(shop_tree()), &shop_rows()).unwrap();

    {
        let orders = cursor.child("orders").unwrap();
        orders.advance();
        assert_eq!(orders.key(), Some("11"));
        assert_eq!(keys(orders.child("order_lines").unwrap()), vec!["110"]);
    }

    cursor.rewind();
    let orders = cursor.child("orders").unwrap();
    assert_eq!(orders.key(), Some("10"));
    assert_eq!(keys(orders.child("order_lines").unwrap()), vec!["100", "101"]);
}

#[test]
fn test_exact_match_precedence() {
    let config = JoinConfig::new().with_matching(JoinMatching::ExactOnly);
    let tree = JoinNode::tabular_with_config("p", ["id"], config)
        .unwrap()
        .with_join("Two_Word", JoinNode::tabular("a", ["id"]).unwrap())
        .unwrap()
        .with_join("twoWord", JoinNode::tabular("b", ["id"]).unwrap())
        .unwrap();

    assert_eq!(tree.join("Two_Word").unwrap().table(), "a");
    assert_eq!(tree.join("twoWord").unwrap().table(), "b");
    assert!(matches!(tree.join("TwoWord"), Err(Error::JoinNotFound { .. })));
}

#[test]
fn test_fuzzy_lookup_distinct_canonical_forms() {
    // Fuzzy nodes reject canonical collisions at registration, so every
    // loosely-cased name maps to a single join.
    let fuzzy = JoinNode::tabular("p", ["id"])
        .unwrap()
        .with_join("posts", JoinNode::tabular("a", ["id"]).unwrap())
        .unwrap()
        .with_join("Post_s2", JoinNode::tabular("b", ["id"]).unwrap())
        .unwrap();
    assert_eq!(fuzzy.join_id("posts").unwrap(), "posts");
    assert_eq!(fuzzy.join_id("POSTS").unwrap(), "posts");
    assert_eq!(fuzzy.join_id("posts2").unwrap(), "Post_s2");
}

#[test]
fn test_ambiguous_join_names() {
    let result = JoinNode::tabular("p", ["id"])
        .unwrap()
        .with_join("Two_Word", JoinNode::tabular("a", ["id"]).unwrap())
        .unwrap()
        .with_join("twoWord", JoinNode::tabular("b", ["id"]).unwrap());

    match result {
        Err(Error::AmbiguousJoin { candidates, .. }) => {
            assert_eq!(candidates, vec!["Two_Word", "twoWord"]);
        }
        other => panic!("expected ambiguous join, got {other:?}"),
    }
}

#[test]
fn test_columnar_composite_key() {
    let tree = JoinNode::columnar("orders", ["k1", "k2"], ["note"]).unwrap();
    let rows = vec![
        flat_row([("k1", Value::Int64(5)), ("k2", Value::Int64(6)), ("note", "first".into())]),
        flat_row([("k1", Value::Int64(5)), ("k2", Value::Int64(6)), ("note", "second".into())]),
    ];

    let arranged = tree.arrange_flat_data(&rows).unwrap();
    assert_eq!(arranged.len(), 1);
    assert_eq!(arranged["5_6"].get("note"), Some(&Value::String("first".into())));
}

#[test]
fn test_columnar_tree() {
    let items = JoinNode::columnar("items", ["item_id"], ["item_name"]).unwrap();
    let tree = JoinNode::columnar("baskets", ["basket_id"], ["owner"])
        .unwrap()
        .with_join("items", items)
        .unwrap();

    let rows = vec![
        flat_row([
            ("basket_id", Value::Int64(1)),
            ("owner", "ann".into()),
            ("item_id", Value::Int64(4)),
            ("item_name", "pear".into()),
        ]),
        flat_row([
            ("basket_id", Value::Int64(1)),
            ("owner", "ann".into()),
            ("item_id", Value::Int64(5)),
            ("item_name", "plum".into()),
        ]),
        flat_row([
            ("basket_id", Value::Int64(2)),
            ("owner", "bob".into()),
            ("item_id", Value::Null),
            ("item_name", Value::Null),
        ]),
    ];

    let mut cursor = RecordCursor::from_rows(Arc::new(tree), &rows).unwrap();
    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.get("owner").unwrap(), &Value::String("ann".into()));
    assert_eq!(keys(cursor.child("items").unwrap()), vec!["4", "5"]);

    cursor.advance();
    assert!(cursor.child("items").unwrap().is_empty());
}

#[test]
fn test_spec_driven_tree() {
    let spec = JoinSpec::from_json(
        r#"{
            "table": "p",
            "keys": ["id"],
            "joint_data_field": "children",
            "joins": [{"id": "c", "node": {"table": "c", "keys": ["id"]}}]
        }"#,
    )
    .unwrap();
    let tree = spec.build().unwrap();

    let rows = vec![
        flat_row([("p_T_id", 1i64), ("c_T_id", 10i64), ("c_T_val", 3i64)]),
        flat_row([("p_T_id", 1i64), ("c_T_id", 11i64), ("c_T_val", 4i64)]),
    ];
    let arranged = tree.arrange_flat_data(&rows).unwrap();

    assert_eq!(
        tree.export(&arranged),
        serde_json::json!({"1": {"children": {"c": {"10": {"val": 3}, "11": {"val": 4}}}}})
    );
}

#[test]
fn test_selection_over_cursor_tree() {
    let inner = RecordCursor::from_rows(Arc::new(shop_tree()), &shop_rows()).unwrap();
    let mut cursor = SelectionCursor::new(inner);

    cursor.advance();
    cursor.select_current().unwrap();
    assert_eq!(cursor.key(), Some("2"));

    cursor.rewind();
    assert!(!cursor.is_selected_record());
    assert_eq!(cursor.child("orders").unwrap().len(), 2);

    cursor.advance();
    assert!(cursor.is_selected_record());
    assert!(cursor.child("orders").unwrap().is_empty());
}

#[test]
fn test_missing_key_is_data_error() {
    let strict = JoinConfig::new().with_require_all_tabular_fields(true);
    let tree = JoinNode::tabular_with_config("p", ["id"], strict).unwrap();
    let rows = vec![flat_row([("p_T_name", "orphan")])];

    let mut cursor = RecordCursor::new(Arc::new(tree));
    let err = cursor.populate(&rows).unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref field, ref table } if field == "id" && table == "p"));

    let lenient = JoinNode::tabular("p", ["id"]).unwrap();
    assert!(lenient.arrange_flat_data(&rows).unwrap().is_empty());
}
