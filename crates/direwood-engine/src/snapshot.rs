//! Engine-level snapshot with BLAKE3 hashing (spec §8 invariant 6 / scenario
//! S5 determinism). Unlike the teacher's `EngineSnapshot`, there is no
//! restore-for-branching use case in this spec -- the hash alone is what the
//! determinism tests need, so this module stays a thin read-only export
//! rather than a full capture/restore pair.

use serde::Serialize;

use direwood_core::entity::EntityId;
use direwood_core::store::{Entity, EntityStore};

/// Everything that must be identical between two ticks for their snapshots
/// to hash equal (spec §5 "same dt, same input sequence, same seed ->
/// identical snapshots").
#[derive(Serialize)]
struct HashableState<'a> {
    tick_count: u64,
    wave: u32,
    score: u64,
    entities: Vec<(EntityId, &'a Entity)>,
}

/// Hex-encoded BLAKE3 digest of the engine's full observable state.
pub fn compute_hash(store: &EntityStore, tick_count: u64, wave: u32, score: u64) -> String {
    let mut entities: Vec<(EntityId, &Entity)> = store.iter_active().collect();
    entities.sort_by_key(|(id, _)| id.to_raw());

    let state = HashableState {
        tick_count,
        wave,
        score,
        entities,
    };
    let bytes = serde_json::to_vec(&state).expect("snapshot state is always serializable");
    blake3::hash(&bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use direwood_core::kinds::{EnemyData, EntityKind};
    use direwood_core::math::Vec2;
    use direwood_core::store::EntityHeader;

    #[test]
    fn identical_state_hashes_equal() {
        let mut store = EntityStore::new();
        store.create(
            EntityHeader::new(Vec2::new(1.0, 2.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );
        let mut other = EntityStore::new();
        other.create(
            EntityHeader::new(Vec2::new(1.0, 2.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );

        assert_eq!(
            compute_hash(&store, 10, 1, 0),
            compute_hash(&other, 10, 1, 0)
        );
    }

    #[test]
    fn differing_position_hashes_differently() {
        let mut store = EntityStore::new();
        store.create(
            EntityHeader::new(Vec2::new(1.0, 2.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );
        let mut other = EntityStore::new();
        other.create(
            EntityHeader::new(Vec2::new(1.0, 3.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );

        assert_ne!(
            compute_hash(&store, 10, 1, 0),
            compute_hash(&other, 10, 1, 0)
        );
    }
}
