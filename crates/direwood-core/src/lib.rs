//! Direwood Core -- entity storage, math, and spatial indexing for the
//! Direwood simulation.
//!
//! Entities are a fixed tagged union (see [`kinds::EntityKind`]) rather than
//! an open archetype/component set: the simulation's entity set is small and
//! closed (player, enemy, wolf, projectile, power-up, obstacle), so
//! [`store::EntityStore`] keeps a single `Vec<Option<Entity>>` slot array and
//! systems dispatch on the variant tag directly.
//!
//! # Quick Start
//!
//! ```
//! use direwood_core::prelude::*;
//!
//! let mut store = EntityStore::new();
//! let header = EntityHeader::new(Vec2::new(0.0, 0.0), 0.5, 100.0, 0);
//! let id = store.create(header, EntityKind::Enemy(EnemyData::default()));
//! assert!(store.get(id).is_some());
//! ```

#![deny(unsafe_code)]

pub mod constants;
pub mod entity;
pub mod error;
pub mod kinds;
pub mod math;
pub mod rng;
pub mod spatial;
pub mod store;

pub use error::CoreError;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::error::CoreError;
    pub use crate::kinds::{
        EnemyData, EntityKind, EntityType, LungeState, ObstacleData, ObstacleShape, PlayerData,
        PowerUpData, PowerUpType, ProjectileData, WolfCooldowns, WolfData, WolfRole, WolfState,
    };
    pub use crate::math::Vec2;
    pub use crate::rng::SimRng;
    pub use crate::spatial::SpatialIndex;
    pub use crate::store::{Entity, EntityHeader, EntityStore};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn spawn_enemy(store: &mut EntityStore, pos: Vec2) -> EntityId {
        store.create(
            EntityHeader::new(pos, 0.5, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        )
    }

    #[test]
    fn spawn_entities_and_query_back() {
        let mut store = EntityStore::new();
        let e = spawn_enemy(&mut store, Vec2::new(1.0, 2.0));
        assert_eq!(store.get(e).unwrap().header.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn despawn_entity_verify_gone() {
        let mut store = EntityStore::new();
        let e = spawn_enemy(&mut store, Vec2::ZERO);
        assert!(store.remove(e));
        assert!(!store.contains(e));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn stale_entity_remove_returns_false() {
        let mut store = EntityStore::new();
        let e = spawn_enemy(&mut store, Vec2::ZERO);
        assert!(store.remove(e));
        assert!(!store.remove(e));
    }

    #[test]
    fn multiple_entities_independent() {
        let mut store = EntityStore::new();
        let e1 = spawn_enemy(&mut store, Vec2::new(1.0, 1.0));
        let e2 = spawn_enemy(&mut store, Vec2::new(2.0, 2.0));
        let e3 = spawn_enemy(&mut store, Vec2::new(3.0, 3.0));

        store.mark_removed(e2);
        store.compact();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(e1).unwrap().header.position, Vec2::new(1.0, 1.0));
        assert_eq!(store.get(e3).unwrap().header.position, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn spatial_index_finds_nearby_entities_after_rebuild() {
        let mut store = EntityStore::new();
        spawn_enemy(&mut store, Vec2::new(10.0, 10.0));
        spawn_enemy(&mut store, Vec2::new(9000.0, 9000.0));

        let mut index = SpatialIndex::new();
        index.rebuild(&store);
        let nearby = index.query_near(Vec2::new(10.0, 10.0), 5.0);
        assert_eq!(nearby.len(), 1);
    }

    #[test]
    fn wolf_entity_carries_wolf_data() {
        let mut store = EntityStore::new();
        let wolf_data = WolfData::new(Vec2::new(0.0, 0.0), WolfRole::Alpha);
        let id = store.create(
            EntityHeader::new(Vec2::ZERO, 0.6, WOLF_HEALTH, 0),
            EntityKind::Wolf(wolf_data),
        );
        let entity = store.get(id).unwrap();
        assert_eq!(entity.kind.entity_type(), EntityType::Wolf);
        assert_eq!(entity.kind.as_wolf().unwrap().role, WolfRole::Alpha);
    }
}
