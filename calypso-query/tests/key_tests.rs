use calypso_query::{KeyOptions, normalize};
use calypso_types::{Query, ScopeId};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeMap;

// ── Order independence ───────────────────────────────────────────

#[test]
fn parameter_order_is_irrelevant() {
    let a = Query::new().with("a", 1).with("b", 2);
    let b = Query::new().with("b", 2).with("a", 1);
    assert_eq!(normalize(&a, None), normalize(&b, None));
}

#[test]
fn unordered_arrays_are_sorted() {
    let a = Query::new().with("filter", json!(["dark", "blog"]));
    let b = Query::new().with("filter", json!(["blog", "dark"]));
    assert_eq!(normalize(&a, None), normalize(&b, None));
    assert_eq!(normalize(&a, None).as_str(), r#"{"filter":["blog","dark"]}"#);
}

#[test]
fn ordered_arrays_keep_their_order() {
    let options = KeyOptions {
        ordered_params: vec!["order_by".to_string()],
        ..KeyOptions::default()
    };
    let a = Query::new().with("order_by", json!(["date", "title"]));
    let b = Query::new().with("order_by", json!(["title", "date"]));
    assert_ne!(options.normalize(&a, None), options.normalize(&b, None));
}

// ── Absent parameters ────────────────────────────────────────────

#[test]
fn null_parameters_are_absent() {
    let a = Query::new().with("search", "x").with("tier", Value::Null);
    let b = Query::new().with("search", "x");
    assert_eq!(normalize(&a, None), normalize(&b, None));
    assert!(!normalize(&a, None).as_str().contains("null"));
}

#[test]
fn default_values_are_absent() {
    let mut defaults = BTreeMap::new();
    defaults.insert("search".to_string(), json!(""));
    defaults.insert("tier".to_string(), json!(""));
    let options = KeyOptions {
        defaults,
        ..KeyOptions::default()
    };

    let explicit = Query::new().with("search", "").with("tier", "").with("filter", "blog");
    let implicit = Query::new().with("filter", "blog");
    assert_eq!(options.normalize(&explicit, None), options.normalize(&implicit, None));

    let searched = Query::new().with("search", "x").with("filter", "blog");
    assert_ne!(options.normalize(&searched, None), options.normalize(&implicit, None));
}

// ── Scopes ───────────────────────────────────────────────────────

#[test]
fn scopes_never_collide() {
    let q = Query::new().with("search", "x");
    let s1 = ScopeId::from(1u64);
    let s2 = ScopeId::from(2u64);
    assert_ne!(normalize(&q, Some(&s1)), normalize(&q, Some(&s2)));
    assert_ne!(normalize(&q, Some(&s1)), normalize(&q, None));
}

#[test]
fn value_types_are_distinguished() {
    let number = Query::new().with("page", 1);
    let string = Query::new().with("page", "1");
    assert_ne!(normalize(&number, None), normalize(&string, None));
}

// ── Properties ───────────────────────────────────────────────────

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(Value::from),
        (0i64..1000).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        prop::collection::vec("[a-z]{1,4}", 0..4).prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn normalization_is_insertion_order_independent(
        pairs in prop::collection::btree_map("[a-z]{1,6}", value_strategy(), 0..6)
    ) {
        let forward: Query = pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let backward: Query = pairs.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();
        prop_assert_eq!(normalize(&forward, None), normalize(&backward, None));
    }

    #[test]
    fn shuffled_array_values_normalize_equally(
        mut items in prop::collection::vec("[a-z]{1,4}", 0..6)
    ) {
        let original = Query::new().with("filter", items.clone());
        items.reverse();
        let reversed = Query::new().with("filter", items);
        prop_assert_eq!(normalize(&original, None), normalize(&reversed, None));
    }

    #[test]
    fn normalized_keys_are_valid_json(
        pairs in prop::collection::btree_map("[a-z\"\\\\]{1,6}", value_strategy(), 0..6)
    ) {
        let query: Query = pairs.into_iter().collect();
        let key = normalize(&query, None);
        prop_assert!(serde_json::from_str::<Value>(key.as_str()).is_ok());
    }
}
