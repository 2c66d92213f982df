use calypso_types::{ItemKey, ScopeId};
use serde_json::json;
use std::collections::HashSet;
use std::str::FromStr;

// ── ItemKey ───────────────────────────────────────────────────────

#[test]
fn item_key_new_rejects_empty() {
    assert!(ItemKey::new("").is_none());
    assert_eq!(ItemKey::new("abc").unwrap().as_str(), "abc");
}

#[test]
fn item_key_number_and_string_forms_match() {
    assert_eq!(ItemKey::from_value(&json!(7)), ItemKey::from_value(&json!("7")));
}

#[test]
fn item_key_from_str() {
    assert_eq!(ItemKey::from_str("x").unwrap().to_string(), "x");
    assert!(ItemKey::from_str("").is_err());
}

#[test]
fn item_key_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(ItemKey::from(1));
    set.insert(ItemKey::new("1").unwrap());
    assert_eq!(set.len(), 1);
}

#[test]
fn item_key_serializes_as_plain_string() {
    let key = ItemKey::from(12);
    assert_eq!(serde_json::to_string(&key).unwrap(), "\"12\"");
}

// ── ScopeId ───────────────────────────────────────────────────────

#[test]
fn scope_id_from_site_number() {
    let scope = ScopeId::from(2916284u64);
    assert_eq!(scope.as_str(), "2916284");
    assert_eq!(scope, ScopeId::from("2916284"));
}

#[test]
fn scope_id_display() {
    assert_eq!(ScopeId::new("wpcom").to_string(), "wpcom");
}

#[test]
fn scope_id_serialization_roundtrip() {
    let scope = ScopeId::from(77u64);
    let json = serde_json::to_string(&scope).unwrap();
    let parsed: ScopeId = serde_json::from_str(&json).unwrap();
    assert_eq!(scope, parsed);
}

#[test]
fn scope_ids_order_as_strings() {
    let mut scopes = vec![ScopeId::from("b"), ScopeId::from("a")];
    scopes.sort();
    assert_eq!(scopes[0].as_str(), "a");
}

// ── Deserialization ───────────────────────────────────────────────

#[test]
fn ids_deserialize_from_numbers_and_strings() {
    let scope: ScopeId = serde_json::from_value(json!(2916284)).unwrap();
    assert_eq!(scope, ScopeId::from(2916284u64));
    let key: ItemKey = serde_json::from_value(json!("twentysixteen")).unwrap();
    assert_eq!(key.as_str(), "twentysixteen");
    let numeric: ItemKey = serde_json::from_value(json!(3)).unwrap();
    assert_eq!(numeric, ItemKey::from(3));
}

#[test]
fn empty_item_key_fails_to_deserialize() {
    assert!(serde_json::from_value::<ItemKey>(json!("")).is_err());
    assert!(serde_json::from_value::<ItemKey>(json!(null)).is_err());
}

#[test]
fn ids_work_as_map_keys() {
    let map: std::collections::BTreeMap<ScopeId, ItemKey> =
        serde_json::from_value(json!({"12": "mayland"})).unwrap();
    assert_eq!(map.get(&ScopeId::from(12u64)).unwrap().as_str(), "mayland");
}
