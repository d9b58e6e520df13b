//! Property tests for `EntityStore`/`EntityAllocator` operation sequences.
//!
//! Generates random sequences of create/despawn/get operations and checks
//! that generational-id invariants hold after every step, regardless of
//! order.

use direwood_core::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum StoreOp {
    Create,
    Despawn(usize),
    Get(usize),
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => Just(StoreOp::Create),
        2 => (0..64usize).prop_map(StoreOp::Despawn),
        2 => (0..64usize).prop_map(StoreOp::Get),
    ]
}

fn header() -> EntityHeader {
    EntityHeader::new(Vec2::new(1.0, 1.0), 0.5, 10.0, 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn store_random_ops_preserve_generational_invariants(ops in prop::collection::vec(store_op_strategy(), 1..80)) {
        let mut store = EntityStore::new();
        let mut spawned: Vec<EntityId> = Vec::new();
        let mut despawned: Vec<EntityId> = Vec::new();

        for op in ops {
            match op {
                StoreOp::Create => {
                    let id = store.create(header(), EntityKind::Enemy(EnemyData::default()));
                    prop_assert!(!id.is_invalid());
                    prop_assert!(store.get(id).is_some());
                    spawned.push(id);
                }
                StoreOp::Despawn(idx) => {
                    if !spawned.is_empty() {
                        let idx = idx % spawned.len();
                        let id = spawned.remove(idx);
                        let removed = store.remove(id);
                        prop_assert!(removed);
                        prop_assert!(store.get(id).is_none());
                        despawned.push(id);
                    }
                }
                StoreOp::Get(idx) => {
                    if !spawned.is_empty() {
                        let idx = idx % spawned.len();
                        prop_assert!(store.get(spawned[idx]).is_some());
                    }
                }
            }

            // Every id still considered live resolves; every despawned id
            // stays stale even if its index got recycled by a later create.
            for &id in &spawned {
                prop_assert!(store.contains(id));
            }
            for &id in &despawned {
                prop_assert!(!store.contains(id));
            }
            prop_assert_eq!(store.len(), spawned.len());
        }
    }
}
