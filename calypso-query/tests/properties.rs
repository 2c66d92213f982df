//! Property-based tests for the query manager and registry.
//!
//! These verify the invariants consumers rely on:
//! - Idempotence: receiving the same batch twice changes nothing the second time
//! - No dangling references: every indexed key resolves to a stored entity
//! - Bare receives never touch the query index
//! - Scope isolation: writes under one scope never alter another

use calypso_query::{ManagerOptions, ManagerRegistry, PaginationOptions, QueryManager};
use calypso_types::{Entity, Query, QueryContext, ScopeId};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (0u64..12, "[a-z]{1,5}")
        .prop_map(|(id, name)| Entity::from_value(json!({ "id": id, "name": name })).unwrap())
}

fn unique_batch_strategy() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_map(0u64..12, "[a-z]{1,5}", 0..6).prop_map(|m| {
        m.into_iter()
            .map(|(id, name)| Entity::from_value(json!({ "id": id, "name": name })).unwrap())
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = Query> {
    (prop::sample::select(vec!["", "blog", "dark"]), 1u64..4)
        .prop_map(|(search, page)| Query::new().with("search", search).with("page", page).with("number", 3))
}

fn context_strategy() -> impl Strategy<Value = Option<QueryContext>> {
    prop::option::of(
        (query_strategy(), prop::option::of(0u64..15)).prop_map(|(query, found)| QueryContext {
            query,
            found,
        }),
    )
}

fn op_strategy() -> impl Strategy<Value = (Vec<Entity>, Option<QueryContext>)> {
    (prop::collection::vec(entity_strategy(), 0..5), context_strategy())
}

fn options_strategy() -> impl Strategy<Value = ManagerOptions> {
    any::<bool>().prop_map(|paged| {
        if paged {
            ManagerOptions::default().paginated(PaginationOptions::default())
        } else {
            ManagerOptions::default()
        }
    })
}

fn assert_no_dangling(manager: &QueryManager) -> Result<(), TestCaseError> {
    for (query, result) in manager.queries() {
        for key in result.item_keys() {
            prop_assert!(manager.get(key).is_some(), "{query} references missing {key}");
        }
    }
    Ok(())
}

fn snapshot(manager: &QueryManager) -> (BTreeMap<String, Entity>, BTreeMap<String, String>) {
    let data = manager
        .items()
        .map(|(k, e)| (k.to_string(), e.clone()))
        .collect();
    let queries = manager
        .queries()
        .map(|(k, r)| (k.to_string(), format!("{r:?}")))
        .collect();
    (data, queries)
}

// =============================================================================
// MANAGER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn no_dangling_references(options in options_strategy(), ops in prop::collection::vec(op_strategy(), 0..12)) {
        let mut manager = Arc::new(QueryManager::new(options));
        for (items, context) in &ops {
            manager = manager.receive(items, context.as_ref()).unwrap();
            assert_no_dangling(&manager)?;
        }
    }

    #[test]
    fn receive_is_idempotent(
        options in options_strategy(),
        seed in prop::collection::vec(op_strategy(), 0..4),
        items in prop::collection::vec(entity_strategy(), 0..5),
        context in context_strategy(),
    ) {
        let mut manager = Arc::new(QueryManager::new(options));
        for (seed_items, seed_context) in &seed {
            manager = manager.receive(seed_items, seed_context.as_ref()).unwrap();
        }

        let once = manager.receive(&items, context.as_ref()).unwrap();
        let twice = once.receive(&items, context.as_ref()).unwrap();
        prop_assert_eq!(snapshot(&once), snapshot(&twice));
    }

    #[test]
    fn unique_batches_are_identity_stable(
        items in unique_batch_strategy(),
        context in context_strategy(),
    ) {
        let once = Arc::new(QueryManager::new(ManagerOptions::default()))
            .receive(&items, context.as_ref())
            .unwrap();
        let twice = once.receive(&items, context.as_ref()).unwrap();
        prop_assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn bare_receive_preserves_index(
        options in options_strategy(),
        seed in prop::collection::vec(op_strategy(), 1..6),
        items in prop::collection::vec(entity_strategy(), 0..5),
    ) {
        let mut manager = Arc::new(QueryManager::new(options));
        for (seed_items, seed_context) in &seed {
            manager = manager.receive(seed_items, seed_context.as_ref()).unwrap();
        }

        let next = manager.receive(&items, None).unwrap();
        prop_assert_eq!(snapshot(&manager).1, snapshot(&next).1);
        for entity in &items {
            let key = entity.item_key("id").unwrap();
            prop_assert!(next.get(&key).is_some());
        }
    }
}

// =============================================================================
// REGISTRY PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn scope_isolation(
        seed in prop::collection::vec(op_strategy(), 0..4),
        ops in prop::collection::vec(op_strategy(), 0..6),
    ) {
        let s1 = ScopeId::from(1u64);
        let s2 = ScopeId::from(2u64);

        let mut registry = ManagerRegistry::new(ManagerOptions::default());
        for (items, context) in &seed {
            registry = registry.receive(&s2, items, context.as_ref()).unwrap();
        }
        let before = registry.get(&s2).cloned();

        for (items, context) in &ops {
            registry = registry.receive(&s1, items, context.as_ref()).unwrap();
        }

        match (before, registry.get(&s2)) {
            (Some(before), Some(after)) => prop_assert!(Arc::ptr_eq(&before, after)),
            (None, None) => {}
            _ => prop_assert!(false, "scope 2 appeared or vanished"),
        }
    }

    #[test]
    fn round_trip_preserves_entities(
        ops in prop::collection::vec((0u64..3, op_strategy()), 0..8),
        include_queries in any::<bool>(),
    ) {
        let mut registry = ManagerRegistry::new(ManagerOptions::default());
        for (scope, (items, context)) in &ops {
            registry = registry.receive(&ScopeId::from(*scope), items, context.as_ref()).unwrap();
        }

        let restored = ManagerRegistry::try_deserialize(
            &registry.serialize(include_queries).unwrap(),
            ManagerOptions::default(),
        ).unwrap();

        prop_assert_eq!(restored.len(), registry.len());
        for (scope, manager) in registry.iter() {
            let other = restored.get(scope).unwrap();
            prop_assert_eq!(snapshot(manager).0, snapshot(other).0);
            if include_queries {
                prop_assert_eq!(snapshot(manager).1, snapshot(other).1);
            }
        }
    }
}
